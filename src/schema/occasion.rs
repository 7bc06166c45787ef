use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::options::ValidationError;

/// How strong a message should be. Occasions carry a default level
/// (0 = low, 1 = medium, 2 = high).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Intensity {
    Low,
    Medium,
    High,
}

impl Default for Intensity {
    fn default() -> Self {
        Self::Medium
    }
}

impl Intensity {
    pub fn level(&self) -> u8 {
        match self {
            Self::Low => 0,
            Self::Medium => 1,
            Self::High => 2,
        }
    }

    pub fn from_level(level: u8) -> Option<Intensity> {
        match level {
            0 => Some(Self::Low),
            1 => Some(Self::Medium),
            2 => Some(Self::High),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl FromStr for Intensity {
    type Err = ValidationError;

    /// Accepts a name ("low", "medium", "high") or a level ("0", "1", "2").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" | "0" => Ok(Self::Low),
            "medium" | "mid" | "1" => Ok(Self::Medium),
            "high" | "2" => Ok(Self::High),
            other => Err(ValidationError(format!("invalid intensity '{}'", other))),
        }
    }
}

impl fmt::Display for Intensity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which family of ending phrases closes the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sentiment {
    Eternal,
    Present,
    Future,
}

impl Default for Sentiment {
    fn default() -> Self {
        Self::Present
    }
}

impl Sentiment {
    pub const ALL: [Sentiment; 3] = [Sentiment::Eternal, Sentiment::Present, Sentiment::Future];

    /// Key used for the ending tables in the word banks.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Eternal => "eternal",
            Self::Present => "present",
            Self::Future => "future",
        }
    }
}

impl FromStr for Sentiment {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "eternal" => Ok(Self::Eternal),
            "present" => Ok(Self::Present),
            "future" => Ok(Self::Future),
            other => Err(ValidationError(format!("invalid sentiment '{}'", other))),
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A mood bucket label used to pick a word-bank sublist.
///
/// Unknown labels are carried verbatim as `Custom`; the word bank falls back
/// to another bucket when a label has no entries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Mood {
    Tender,
    Classic,
    Passionate,
    Dreamy,
    Gentle,
    Custom(String),
}

impl Mood {
    pub fn name(&self) -> &str {
        match self {
            Self::Tender => "tender",
            Self::Classic => "classic",
            Self::Passionate => "passionate",
            Self::Dreamy => "dreamy",
            Self::Gentle => "gentle",
            Self::Custom(name) => name,
        }
    }

    pub fn from_name(name: &str) -> Mood {
        match name {
            "tender" => Self::Tender,
            "classic" => Self::Classic,
            "passionate" => Self::Passionate,
            "dreamy" => Self::Dreamy,
            "gentle" => Self::Gentle,
            other => Self::Custom(other.to_string()),
        }
    }
}

impl From<String> for Mood {
    fn from(name: String) -> Self {
        Mood::from_name(&name)
    }
}

impl From<Mood> for String {
    fn from(mood: Mood) -> Self {
        mood.name().to_string()
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A named context for a message, e.g. an anniversary or an apology.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Occasion {
    pub name: String,
    pub intensity: Intensity,
    pub sentiment: Sentiment,
    pub style: Mood,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intensity_levels() {
        assert_eq!(Intensity::Low.level(), 0);
        assert_eq!(Intensity::High.level(), 2);
        assert_eq!(Intensity::from_level(1), Some(Intensity::Medium));
        assert_eq!(Intensity::from_level(3), None);
    }

    #[test]
    fn intensity_parse() {
        assert_eq!("HIGH".parse::<Intensity>().unwrap(), Intensity::High);
        assert_eq!("0".parse::<Intensity>().unwrap(), Intensity::Low);
        assert!("extreme".parse::<Intensity>().is_err());
    }

    #[test]
    fn sentiment_parse() {
        assert_eq!("future".parse::<Sentiment>().unwrap(), Sentiment::Future);
        assert!("past".parse::<Sentiment>().is_err());
    }

    #[test]
    fn mood_names_round_trip() {
        for mood in [Mood::Tender, Mood::Classic, Mood::Passionate, Mood::Dreamy, Mood::Gentle] {
            assert_eq!(Mood::from_name(mood.name()), mood);
        }
        assert_eq!(Mood::from_name("wistful"), Mood::Custom("wistful".to_string()));
    }

    #[test]
    fn mood_serializes_as_string() {
        let serialized = ron::to_string(&Mood::Passionate).unwrap();
        assert_eq!(serialized, "\"passionate\"");
        let parsed: Mood = ron::from_str("\"wistful\"").unwrap();
        assert_eq!(parsed, Mood::Custom("wistful".to_string()));
    }
}
