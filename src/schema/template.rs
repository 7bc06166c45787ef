use serde::{Deserialize, Serialize};
use std::fmt;

use super::occasion::{Intensity, Occasion};
use crate::core::pattern::{Pattern, PatternError};

/// Newtype wrapper for template IDs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TemplateId(pub u32);

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Compliment,
    Devotion,
    Comparison,
    Affection,
    Commitment,
}

/// Which occasions a template may serve. A template applies when it lists
/// the occasion by name or lists the occasion's intensity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Applicability {
    #[serde(default)]
    pub occasions: Vec<String>,
    #[serde(default)]
    pub intensities: Vec<Intensity>,
}

impl Applicability {
    pub fn serves(&self, occasion: &str, intensity: Intensity) -> bool {
        self.intensities.contains(&intensity) || self.occasions.iter().any(|o| o == occasion)
    }
}

/// A message template. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub id: TemplateId,
    /// The pattern source text, e.g. `"You are my {adjective} {noun}, {ending}"`.
    pub text: String,
    pub pattern: Pattern,
    pub category: Category,
    pub intensity: Intensity,
    pub applies_to: Applicability,
}

impl Template {
    pub fn new(
        id: u32,
        text: &str,
        category: Category,
        intensity: Intensity,
        applies_to: Applicability,
    ) -> Result<Template, PatternError> {
        Ok(Template {
            id: TemplateId(id),
            text: text.to_string(),
            pattern: Pattern::parse(text)?,
            category,
            intensity,
            applies_to,
        })
    }

    pub fn serves(&self, occasion: &Occasion, intensity: Intensity) -> bool {
        self.applies_to.serves(&occasion.name, intensity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::occasion::{Mood, Sentiment};

    fn occasion(name: &str, intensity: Intensity) -> Occasion {
        Occasion {
            name: name.to_string(),
            intensity,
            sentiment: Sentiment::Present,
            style: Mood::Classic,
        }
    }

    #[test]
    fn template_new_parses_pattern() {
        let t = Template::new(
            3,
            "Your {noun} makes my heart {verb}, {ending}",
            Category::Affection,
            Intensity::High,
            Applicability::default(),
        )
        .unwrap();
        assert_eq!(t.id, TemplateId(3));
        assert_eq!(t.pattern.slots().count(), 3);
    }

    #[test]
    fn template_new_rejects_bad_pattern() {
        assert!(Template::new(
            1,
            "Hey {recipient}",
            Category::Compliment,
            Intensity::Low,
            Applicability::default()
        )
        .is_err());
    }

    #[test]
    fn applicability_by_intensity_or_name() {
        let applies = Applicability {
            occasions: vec!["apology".to_string()],
            intensities: vec![Intensity::High],
        };
        let t = Template::new(0, "x", Category::Devotion, Intensity::High, applies).unwrap();

        assert!(t.serves(&occasion("anniversary", Intensity::High), Intensity::High));
        assert!(t.serves(&occasion("apology", Intensity::Medium), Intensity::Medium));
        assert!(!t.serves(&occasion("general", Intensity::Medium), Intensity::Medium));
        // An intensity override can make a template applicable
        assert!(t.serves(&occasion("general", Intensity::Medium), Intensity::High));
    }
}
