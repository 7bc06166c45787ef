/// Template pattern tokenizer: splits a pattern into literal text and slots.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    #[error("pattern parse error: {0}")]
    Parse(String),
    #[error("unknown slot '{{{0}}}'")]
    UnknownSlot(String),
}

/// The kinds of placeholder a pattern may contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SlotKind {
    Verb,
    Adjective,
    Noun,
    Ending,
}

impl SlotKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Verb => "verb",
            Self::Adjective => "adjective",
            Self::Noun => "noun",
            Self::Ending => "ending",
        }
    }

    fn from_name(name: &str) -> Option<SlotKind> {
        match name {
            "verb" => Some(Self::Verb),
            "adjective" => Some(Self::Adjective),
            "noun" => Some(Self::Noun),
            "ending" => Some(Self::Ending),
            _ => None,
        }
    }
}

impl fmt::Display for SlotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A segment of a parsed pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Segment {
    /// Literal text, emitted as-is.
    Literal(String),
    /// A placeholder resolved independently at fill time.
    Slot(SlotKind),
}

/// A parsed pattern, a sequence of segments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pattern {
    pub segments: Vec<Segment>,
}

impl Pattern {
    /// Parse a pattern string into segments.
    ///
    /// Syntax:
    /// - `{verb}`, `{adjective}`, `{noun}`, `{ending}` → `Slot`
    /// - `{{` / `}}` → literal `{` / `}`
    /// - Everything else → `Literal`
    pub fn parse(input: &str) -> Result<Pattern, PatternError> {
        let mut segments = Vec::new();
        let mut literal_buf = String::new();
        let chars: Vec<char> = input.chars().collect();
        let len = chars.len();
        let mut i = 0;

        while i < len {
            match chars[i] {
                '{' => {
                    if i + 1 < len && chars[i + 1] == '{' {
                        literal_buf.push('{');
                        i += 2;
                        continue;
                    }

                    if !literal_buf.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal_buf)));
                    }

                    let start = i + 1;
                    let mut end = start;
                    while end < len && chars[end] != '}' {
                        if chars[end] == '{' {
                            return Err(PatternError::Parse(
                                "nested braces are not allowed".to_string(),
                            ));
                        }
                        end += 1;
                    }
                    if end == len {
                        return Err(PatternError::Parse("unclosed brace".to_string()));
                    }

                    let content: String = chars[start..end].iter().collect();
                    let name = content.trim();
                    if name.is_empty() {
                        return Err(PatternError::Parse("empty braces".to_string()));
                    }
                    let kind = SlotKind::from_name(name)
                        .ok_or_else(|| PatternError::UnknownSlot(name.to_string()))?;
                    segments.push(Segment::Slot(kind));
                    i = end + 1;
                }
                '}' => {
                    if i + 1 < len && chars[i + 1] == '}' {
                        literal_buf.push('}');
                        i += 2;
                        continue;
                    }
                    return Err(PatternError::Parse(
                        "unmatched closing brace".to_string(),
                    ));
                }
                c => {
                    literal_buf.push(c);
                    i += 1;
                }
            }
        }

        if !literal_buf.is_empty() {
            segments.push(Segment::Literal(literal_buf));
        }

        Ok(Pattern { segments })
    }

    /// Slots in order of appearance, repeats included.
    pub fn slots(&self) -> impl Iterator<Item = SlotKind> + '_ {
        self.segments.iter().filter_map(|seg| match seg {
            Segment::Slot(kind) => Some(*kind),
            Segment::Literal(_) => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_literal_only() {
        let p = Pattern::parse("You mean everything to me.").unwrap();
        assert_eq!(
            p.segments,
            vec![Segment::Literal("You mean everything to me.".to_string())]
        );
    }

    #[test]
    fn parse_all_slot_kinds() {
        let p = Pattern::parse("I {verb} my {adjective} {noun}, {ending}").unwrap();
        let slots: Vec<SlotKind> = p.slots().collect();
        assert_eq!(
            slots,
            vec![SlotKind::Verb, SlotKind::Adjective, SlotKind::Noun, SlotKind::Ending]
        );
        assert_eq!(p.segments[0], Segment::Literal("I ".to_string()));
        assert_eq!(p.segments[4], Segment::Literal(" ".to_string()));
    }

    #[test]
    fn repeated_slots_stay_separate() {
        let p = Pattern::parse("{noun} and {noun}").unwrap();
        assert_eq!(p.slots().filter(|k| *k == SlotKind::Noun).count(), 2);
        assert_eq!(p.segments.len(), 3);
    }

    #[test]
    fn slot_glued_to_suffix() {
        let p = Pattern::parse("like {verb}ing in").unwrap();
        assert_eq!(
            p.segments,
            vec![
                Segment::Literal("like ".to_string()),
                Segment::Slot(SlotKind::Verb),
                Segment::Literal("ing in".to_string()),
            ]
        );
    }

    #[test]
    fn parse_escaped_braces() {
        let p = Pattern::parse("Use {{braces}} here.").unwrap();
        assert_eq!(
            p.segments,
            vec![Segment::Literal("Use {braces} here.".to_string())]
        );
    }

    #[test]
    fn unknown_slot_error() {
        assert_eq!(
            Pattern::parse("Hello {name}").unwrap_err(),
            PatternError::UnknownSlot("name".to_string())
        );
    }

    #[test]
    fn malformed_patterns_error() {
        assert!(Pattern::parse("Bad {} here").is_err());
        assert!(Pattern::parse("Bad {outer{noun}} here").is_err());
        assert!(Pattern::parse("Bad {noun here").is_err());
        assert!(Pattern::parse("Bad } here").is_err());
    }
}
