/// Mood resolution: intensity plus optional explicit style to a mood bucket.

use crate::schema::occasion::{Intensity, Mood};

pub struct MoodResolver;

impl MoodResolver {
    /// An explicit style wins verbatim (no check against known buckets; the
    /// word bank falls back for unknown ones). Otherwise high → passionate,
    /// low → tender, medium → classic.
    pub fn resolve(intensity: Intensity, explicit_style: Option<&Mood>) -> Mood {
        if let Some(style) = explicit_style {
            return style.clone();
        }
        match intensity {
            Intensity::High => Mood::Passionate,
            Intensity::Low => Mood::Tender,
            Intensity::Medium => Mood::Classic,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intensity_mapping() {
        assert_eq!(MoodResolver::resolve(Intensity::High, None), Mood::Passionate);
        assert_eq!(MoodResolver::resolve(Intensity::Medium, None), Mood::Classic);
        assert_eq!(MoodResolver::resolve(Intensity::Low, None), Mood::Tender);
    }

    #[test]
    fn explicit_style_is_verbatim() {
        let custom = Mood::Custom("moonlit".to_string());
        assert_eq!(MoodResolver::resolve(Intensity::High, Some(&custom)), custom);
        assert_eq!(
            MoodResolver::resolve(Intensity::Low, Some(&Mood::Dreamy)),
            Mood::Dreamy
        );
    }
}
