use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::language::Language;
use super::occasion::{Intensity, Mood, Sentiment};

/// A rejected option value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("validation error: {0}")]
pub struct ValidationError(pub String);

pub const DEFAULT_RECIPIENT: &str = "Love";
pub const DEFAULT_OCCASION: &str = "general";
/// Upper bound on recipient name length. A resource guard, far above any
/// real name; anything shorter is echoed verbatim.
pub const MAX_NAME_CHARS: usize = 1024;

/// Per-request generation options. Every field is optional; unset fields
/// fall back to the occasion's defaults or the generator configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GenerateOptions {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub occasion: Option<String>,
    #[serde(default)]
    pub language: Option<Language>,
    /// Overrides the occasion's intensity for mood resolution and template filtering.
    #[serde(default)]
    pub intensity: Option<Intensity>,
    /// Explicit mood bucket; used verbatim when set.
    #[serde(default)]
    pub style: Option<Mood>,
    #[serde(default)]
    pub sentiment: Option<Sentiment>,
    #[serde(default)]
    pub emoji_style: Option<Mood>,
    #[serde(default)]
    pub include_emoji: Option<bool>,
}

impl GenerateOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn occasion(mut self, occasion: &str) -> Self {
        self.occasion = Some(occasion.to_string());
        self
    }

    pub fn language(mut self, language: Language) -> Self {
        self.language = Some(language);
        self
    }

    pub fn intensity(mut self, intensity: Intensity) -> Self {
        self.intensity = Some(intensity);
        self
    }

    pub fn style(mut self, style: Mood) -> Self {
        self.style = Some(style);
        self
    }

    pub fn sentiment(mut self, sentiment: Sentiment) -> Self {
        self.sentiment = Some(sentiment);
        self
    }

    pub fn emoji_style(mut self, style: Mood) -> Self {
        self.emoji_style = Some(style);
        self
    }

    pub fn include_emoji(mut self, include: bool) -> Self {
        self.include_emoji = Some(include);
        self
    }

    /// Set an option from its string form, as received from a text or JSON
    /// caller. Keys use snake_case field names; `emojiStyle`-style camelCase
    /// is accepted too.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ValidationError> {
        match key {
            "name" => self.name = Some(value.to_string()),
            "occasion" => self.occasion = Some(value.trim().to_string()),
            "language" => {
                let lang = Language::from_code(value).map_err(|e| ValidationError(e.to_string()))?;
                self.language = Some(lang);
            }
            "intensity" => self.intensity = Some(value.parse()?),
            "style" => self.style = Some(parse_mood(value)?),
            "sentiment" => self.sentiment = Some(value.parse()?),
            "emoji_style" | "emojiStyle" => self.emoji_style = Some(parse_mood(value)?),
            "include_emoji" | "includeEmoji" => self.include_emoji = Some(parse_bool(value)?),
            other => return Err(ValidationError(format!("unknown option '{}'", other))),
        }
        Ok(())
    }

    /// Check field values that the type system cannot rule out.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(ref name) = self.name {
            if name.chars().count() > MAX_NAME_CHARS {
                return Err(ValidationError(format!(
                    "name longer than {} characters",
                    MAX_NAME_CHARS
                )));
            }
            if name.chars().any(char::is_control) {
                return Err(ValidationError(
                    "name contains control characters".to_string(),
                ));
            }
        }
        if let Some(ref occasion) = self.occasion {
            if occasion.trim().is_empty() {
                return Err(ValidationError("empty occasion name".to_string()));
            }
        }
        for mood in [&self.style, &self.emoji_style].into_iter().flatten() {
            if mood.name().trim().is_empty() {
                return Err(ValidationError("empty style name".to_string()));
            }
        }
        Ok(())
    }

    /// Recipient name with the default applied. The name is used exactly as
    /// given; only an empty or all-whitespace name counts as unset.
    pub fn resolved_name(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => DEFAULT_RECIPIENT,
        }
    }

    pub fn resolved_occasion(&self) -> &str {
        self.occasion.as_deref().unwrap_or(DEFAULT_OCCASION)
    }
}

fn parse_mood(value: &str) -> Result<Mood, ValidationError> {
    let name = value.trim().to_ascii_lowercase();
    if name.is_empty() {
        return Err(ValidationError("empty style name".to_string()));
    }
    Ok(Mood::from_name(&name))
}

fn parse_bool(value: &str) -> Result<bool, ValidationError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        other => Err(ValidationError(format!("expected a boolean, got '{}'", other))),
    }
}
