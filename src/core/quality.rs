/// Heuristic message quality score.
///
/// This is a cheap estimate from surface features (length, keyword density,
/// emoji presence, adjacent repeats), not a real measure of writing quality.

/// Keywords that earn credit when they appear inside a token.
pub const ROMANTIC_KEYWORDS: &[&str] = &["beautiful", "love", "heart", "forever", "dream"];
/// Emoji that earn the emoji bonus.
pub const SCORED_EMOJI: &[&str] = &["💖", "❤️", "💕"];

const BASE_SCORE: u32 = 50;
const LENGTH_BONUS: u32 = 15;
const KEYWORD_POINTS: u32 = 5;
const KEYWORD_CAP: u32 = 20;
const EMOJI_BONUS: u32 = 10;
const COHERENCE_CREDIT: i32 = 10;
const REPEAT_PENALTY: i32 = 5;

pub struct QualityScorer;

impl QualityScorer {
    /// Score a finished message in `0..=100`. Deterministic in the message text.
    ///
    /// - base 50
    /// - +15 when the length is strictly between 80 and 200 characters
    /// - +5 per space-separated token containing a keyword, capped at +20
    /// - +10 when any scored emoji is present
    /// - coherence credit 10, minus 5 per pair of identical adjacent tokens,
    ///   floored at 0
    ///
    /// Tokens are lowercased before keyword and repeat checks.
    pub fn score(message: &str) -> u8 {
        let mut score = BASE_SCORE;

        let len = message.chars().count();
        if len > 80 && len < 200 {
            score += LENGTH_BONUS;
        }

        let lowered = message.to_lowercase();
        let tokens: Vec<&str> = lowered.split(' ').collect();

        let keyword_tokens = tokens
            .iter()
            .filter(|tok| ROMANTIC_KEYWORDS.iter().any(|kw| tok.contains(kw)))
            .count() as u32;
        score += (keyword_tokens * KEYWORD_POINTS).min(KEYWORD_CAP);

        if SCORED_EMOJI.iter().any(|e| message.contains(e)) {
            score += EMOJI_BONUS;
        }

        let repeats = tokens.windows(2).filter(|pair| pair[0] == pair[1]).count() as i32;
        let coherence = (COHERENCE_CREDIT - repeats * REPEAT_PENALTY).max(0);

        (score + coherence as u32).min(100) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_plain_message() {
        // base + coherence only
        assert_eq!(QualityScorer::score("hello there"), 60);
    }

    #[test]
    fn length_bonus_bounds() {
        let exactly_80 = "a".repeat(80);
        let just_over = "a".repeat(81);
        let at_200 = "a".repeat(200);
        assert_eq!(QualityScorer::score(&exactly_80), 60);
        assert_eq!(QualityScorer::score(&just_over), 75);
        assert_eq!(QualityScorer::score(&at_200), 60);
    }

    #[test]
    fn keyword_credit_is_capped() {
        assert_eq!(QualityScorer::score("love"), 65);
        assert_eq!(QualityScorer::score("Lovely heart"), 70);
        let many = "love heart dream forever beautiful loving";
        assert_eq!(QualityScorer::score(many), 80);
    }

    #[test]
    fn emoji_bonus() {
        assert_eq!(QualityScorer::score("hi 💖"), 70);
        assert_eq!(QualityScorer::score("hi 🔥"), 60);
    }

    #[test]
    fn adjacent_repeats_reduce_coherence() {
        assert_eq!(QualityScorer::score("so so"), 55);
        assert_eq!(QualityScorer::score("so So so"), 50);
        // floor at zero
        assert_eq!(QualityScorer::score("a a a a a"), 50);
    }

    #[test]
    fn score_is_clamped_to_100() {
        let msg = format!(
            "{} love heart dream forever beautiful 💖",
            "x".repeat(100)
        );
        assert_eq!(QualityScorer::score(&msg), 100);
    }

    #[test]
    fn deterministic() {
        let msg = "Hey Sarah, you are my beautiful star, forever and always. 💖";
        assert_eq!(QualityScorer::score(msg), QualityScorer::score(msg));
        assert!(QualityScorer::score(msg) <= 100);
    }
}
