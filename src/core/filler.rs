/// Template filling: resolves every slot of a pattern against a word bank.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::core::pattern::{Segment, SlotKind};
use crate::core::wordbank::{WordBank, WordBankError};
use crate::schema::occasion::{Mood, Sentiment};
use crate::schema::template::{Template, TemplateId};

/// Inputs for one fill, resolved by the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct FillContext<'a> {
    pub mood: &'a Mood,
    pub sentiment: Sentiment,
    pub occasion: &'a str,
}

/// A fully substituted template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilledTemplate {
    pub template_id: TemplateId,
    pub occasion: String,
    pub text: String,
}

pub struct TemplateFiller;

impl TemplateFiller {
    /// Substitute every slot of `template`. Each occurrence is drawn
    /// independently, so two `{noun}` slots may resolve to different words.
    ///
    /// Missing mood buckets and sentiments fall back inside the word bank;
    /// an error means a whole table is empty.
    pub fn fill<R: Rng + ?Sized>(
        template: &Template,
        ctx: &FillContext<'_>,
        bank: &WordBank,
        rng: &mut R,
    ) -> Result<FilledTemplate, WordBankError> {
        let mut text = String::with_capacity(template.text.len() + 32);

        for segment in &template.pattern.segments {
            match segment {
                Segment::Literal(lit) => text.push_str(lit),
                Segment::Slot(kind) => {
                    let candidates = match kind {
                        SlotKind::Ending => bank.endings(ctx.sentiment)?,
                        _ => bank.words(*kind, ctx.mood)?,
                    };
                    let choice = candidates
                        .choose(rng)
                        .ok_or(WordBankError::EmptyTable(*kind))?;
                    text.push_str(choice);
                }
            }
        }

        Ok(FilledTemplate {
            template_id: template.id,
            occasion: ctx.occasion.to_string(),
            text,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::occasion::Intensity;
    use crate::schema::template::{Applicability, Category};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn bank() -> WordBank {
        WordBank::parse_ron(
            r#"(
                verbs: { "classic": ["dance"], "passionate": ["burn"] },
                adjectives: { "classic": ["lovely"] },
                nouns: { "classic": ["star", "moon", "sun", "comet", "pearl"] },
                endings: { "present": ["today."], "future": ["tomorrow."] },
            )"#,
        )
        .unwrap()
    }

    fn template(text: &str) -> Template {
        Template::new(
            42,
            text,
            Category::Compliment,
            Intensity::Medium,
            Applicability::default(),
        )
        .unwrap()
    }

    #[test]
    fn fills_every_slot() {
        let t = template("I {verb} my {adjective} {noun}, {ending}");
        let ctx = FillContext {
            mood: &Mood::Classic,
            sentiment: Sentiment::Future,
            occasion: "general",
        };
        let mut rng = StdRng::seed_from_u64(7);
        let filled = TemplateFiller::fill(&t, &ctx, &bank(), &mut rng).unwrap();

        assert_eq!(filled.template_id, TemplateId(42));
        assert_eq!(filled.occasion, "general");
        assert!(filled.text.starts_with("I dance my lovely "));
        assert!(filled.text.ends_with(", tomorrow."));
        assert!(!filled.text.contains('{'));
    }

    #[test]
    fn missing_mood_and_sentiment_fall_back() {
        let t = template("{verb} {adjective}, {ending}");
        let ctx = FillContext {
            mood: &Mood::Tender,
            sentiment: Sentiment::Eternal,
            occasion: "general",
        };
        let mut rng = StdRng::seed_from_u64(1);
        let filled = TemplateFiller::fill(&t, &ctx, &bank(), &mut rng).unwrap();
        // "classic" sorts first among the verb buckets
        assert_eq!(filled.text, "dance lovely, today.");
    }

    #[test]
    fn repeated_slots_resolve_independently() {
        let t = template("{noun} {noun} {noun} {noun}");
        let ctx = FillContext {
            mood: &Mood::Classic,
            sentiment: Sentiment::Present,
            occasion: "general",
        };
        let mut rng = StdRng::seed_from_u64(99);
        let mut saw_mixed = false;
        for _ in 0..20 {
            let filled = TemplateFiller::fill(&t, &ctx, &bank(), &mut rng).unwrap();
            let words: Vec<&str> = filled.text.split(' ').collect();
            assert_eq!(words.len(), 4);
            if words.iter().any(|w| *w != words[0]) {
                saw_mixed = true;
                break;
            }
        }
        assert!(saw_mixed, "expected independent draws for repeated slots");
    }

    #[test]
    fn same_seed_same_output() {
        let t = template("My {adjective} {noun}, {ending}");
        let ctx = FillContext {
            mood: &Mood::Classic,
            sentiment: Sentiment::Present,
            occasion: "general",
        };
        let a = TemplateFiller::fill(&t, &ctx, &bank(), &mut StdRng::seed_from_u64(5)).unwrap();
        let b = TemplateFiller::fill(&t, &ctx, &bank(), &mut StdRng::seed_from_u64(5)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn empty_table_errors() {
        let t = template("a {noun}");
        let ctx = FillContext {
            mood: &Mood::Classic,
            sentiment: Sentiment::Present,
            occasion: "general",
        };
        let mut rng = StdRng::seed_from_u64(0);
        assert!(TemplateFiller::fill(&t, &ctx, &WordBank::default(), &mut rng).is_err());
    }
}
