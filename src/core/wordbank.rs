/// Word banks: per-language word tables keyed by slot kind and mood bucket,
/// ending phrases keyed by sentiment, and emoji sets keyed by style.

use log::debug;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::collections::hash_map::Entry;
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

use crate::core::pattern::SlotKind;
use crate::schema::language::Language;
use crate::schema::occasion::{Mood, Sentiment};

#[derive(Debug, Error)]
pub enum WordBankError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
    #[error("word bank has no {0} entries")]
    EmptyTable(SlotKind),
    #[error("word bank has no ending phrases")]
    NoEndings,
    #[error("no emoji sets defined")]
    NoEmoji,
}

mod data {
    pub const EN: &str = include_str!("../../lexicon/en.ron");
    pub const ES: &str = include_str!("../../lexicon/es.ron");
    pub const FR: &str = include_str!("../../lexicon/fr.ron");
    pub const DE: &str = include_str!("../../lexicon/de.ron");
    pub const PT: &str = include_str!("../../lexicon/pt.ron");
    pub const EMOJI: &str = include_str!("../../lexicon/emoji.ron");
}

/// Bucket name → ordered candidate list. Ordered so that the fallback
/// bucket is stable across runs.
pub type BucketTable = BTreeMap<String, Vec<String>>;

/// One language's vocabulary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WordBank {
    #[serde(default)]
    pub verbs: BucketTable,
    #[serde(default)]
    pub adjectives: BucketTable,
    #[serde(default)]
    pub nouns: BucketTable,
    /// Sentiment name → ending phrases.
    #[serde(default)]
    pub endings: BucketTable,
}

impl WordBank {
    /// Parse a word bank from a RON string.
    pub fn parse_ron(input: &str) -> Result<WordBank, WordBankError> {
        Ok(ron::from_str(input)?)
    }

    /// Load a word bank from a RON file.
    pub fn load_from_ron(path: &Path) -> Result<WordBank, WordBankError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse_ron(&contents)
    }

    /// The word bank compiled into the binary for `lang`.
    pub fn builtin(lang: Language) -> Result<WordBank, WordBankError> {
        let source = match lang {
            Language::En => data::EN,
            Language::Es => data::ES,
            Language::Fr => data::FR,
            Language::De => data::DE,
            Language::Pt => data::PT,
        };
        Self::parse_ron(source)
    }

    /// The bucket table for a word slot. `Ending` maps to the ending table.
    pub fn table(&self, kind: SlotKind) -> &BucketTable {
        match kind {
            SlotKind::Verb => &self.verbs,
            SlotKind::Adjective => &self.adjectives,
            SlotKind::Noun => &self.nouns,
            SlotKind::Ending => &self.endings,
        }
    }

    /// Candidates for a word slot in the given mood bucket.
    ///
    /// A missing or empty bucket falls back to the first non-empty bucket of
    /// the same kind; only a table with no words at all is an error.
    pub fn words(&self, kind: SlotKind, mood: &Mood) -> Result<&[String], WordBankError> {
        let table = self.table(kind);
        match table.get(mood.name()) {
            Some(words) if !words.is_empty() => Ok(words),
            _ => first_non_empty(table).ok_or(WordBankError::EmptyTable(kind)),
        }
    }

    /// Ending phrases for a sentiment, falling back to "present" and then to
    /// any non-empty sentiment.
    pub fn endings(&self, sentiment: Sentiment) -> Result<&[String], WordBankError> {
        for key in [sentiment.name(), Sentiment::Present.name()] {
            if let Some(phrases) = self.endings.get(key) {
                if !phrases.is_empty() {
                    return Ok(phrases);
                }
            }
        }
        first_non_empty(&self.endings).ok_or(WordBankError::NoEndings)
    }
}

fn first_non_empty(table: &BucketTable) -> Option<&[String]> {
    table
        .values()
        .find(|words| !words.is_empty())
        .map(|words| words.as_slice())
}

/// Emoji sets keyed by style, shared by every language.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmojiSets {
    pub sets: BucketTable,
}

pub const FALLBACK_EMOJI_STYLE: &str = "classic";

impl EmojiSets {
    pub fn parse_ron(input: &str) -> Result<EmojiSets, WordBankError> {
        let sets: BucketTable = ron::from_str(input)?;
        Ok(EmojiSets { sets })
    }

    pub fn builtin() -> Result<EmojiSets, WordBankError> {
        Self::parse_ron(data::EMOJI)
    }

    /// The set for `style`, else the classic set, else any non-empty set.
    pub fn for_style(&self, style: &Mood) -> Result<&[String], WordBankError> {
        for key in [style.name(), FALLBACK_EMOJI_STYLE] {
            if let Some(set) = self.sets.get(key) {
                if !set.is_empty() {
                    return Ok(set);
                }
            }
        }
        first_non_empty(&self.sets).ok_or(WordBankError::NoEmoji)
    }

    /// Returns true if `emoji` belongs to any set.
    pub fn contains(&self, emoji: &str) -> bool {
        self.sets.values().any(|set| set.iter().any(|e| e == emoji))
    }
}

/// Lazily materialized word banks. A language is parsed on first use and
/// kept for the owner's lifetime; the supported set is fixed, so the cache
/// is bounded.
#[derive(Debug, Clone, Default)]
pub struct LanguageCache {
    banks: FxHashMap<Language, WordBank>,
}

impl LanguageCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate a language with a custom bank (for testing or
    /// application-supplied vocabularies).
    pub fn insert(&mut self, lang: Language, bank: WordBank) {
        self.banks.insert(lang, bank);
    }

    pub fn get_or_load(&mut self, lang: Language) -> Result<&WordBank, WordBankError> {
        match self.banks.entry(lang) {
            Entry::Occupied(entry) => Ok(&*entry.into_mut()),
            Entry::Vacant(entry) => {
                let bank = WordBank::builtin(lang)?;
                debug!("materialized word bank for '{}'", lang);
                Ok(&*entry.insert(bank))
            }
        }
    }

    pub fn is_loaded(&self, lang: Language) -> bool {
        self.banks.contains_key(&lang)
    }

    pub fn loaded_count(&self) -> usize {
        self.banks.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_bank() -> WordBank {
        WordBank::parse_ron(
            r#"(
                verbs: { "classic": ["dance"], "tender": [] },
                adjectives: { "passionate": ["fiery", "bold"] },
                nouns: {},
                endings: { "present": ["today."], "eternal": [] },
            )"#,
        )
        .unwrap()
    }

    #[test]
    fn builtin_banks_parse() {
        for lang in Language::ALL {
            let bank = WordBank::builtin(lang).unwrap();
            assert!(!bank.verbs.is_empty(), "{} has no verbs", lang);
            assert!(!bank.endings.is_empty(), "{} has no endings", lang);
        }
    }

    #[test]
    fn words_exact_bucket() {
        let bank = WordBank::builtin(Language::En).unwrap();
        let words = bank.words(SlotKind::Noun, &Mood::Passionate).unwrap();
        assert!(words.contains(&"flame".to_string()));
    }

    #[test]
    fn words_missing_bucket_falls_back() {
        let bank = small_bank();
        let words = bank.words(SlotKind::Adjective, &Mood::Classic).unwrap();
        assert_eq!(words, ["fiery".to_string(), "bold".to_string()]);
        let custom = bank
            .words(SlotKind::Adjective, &Mood::Custom("wistful".to_string()))
            .unwrap();
        assert_eq!(custom.len(), 2);
    }

    #[test]
    fn words_empty_bucket_falls_back() {
        let bank = small_bank();
        let words = bank.words(SlotKind::Verb, &Mood::Tender).unwrap();
        assert_eq!(words, ["dance".to_string()]);
    }

    #[test]
    fn words_empty_table_errors() {
        let bank = small_bank();
        assert!(matches!(
            bank.words(SlotKind::Noun, &Mood::Classic),
            Err(WordBankError::EmptyTable(SlotKind::Noun))
        ));
    }

    #[test]
    fn endings_fall_back_to_present() {
        let bank = small_bank();
        assert_eq!(bank.endings(Sentiment::Eternal).unwrap(), ["today.".to_string()]);
        assert_eq!(bank.endings(Sentiment::Future).unwrap(), ["today.".to_string()]);
        assert!(WordBank::default().endings(Sentiment::Present).is_err());
    }

    #[test]
    fn emoji_for_style_with_fallback() {
        let emoji = EmojiSets::builtin().unwrap();
        assert!(emoji.for_style(&Mood::Passionate).unwrap().contains(&"🔥".to_string()));
        let fallback = emoji.for_style(&Mood::Custom("unknown".to_string())).unwrap();
        assert_eq!(fallback, emoji.sets["classic"].as_slice());
        assert!(emoji.contains("💖"));
        assert!(!emoji.contains("🐍"));
    }

    #[test]
    fn language_cache_loads_lazily() {
        let mut cache = LanguageCache::new();
        assert!(!cache.is_loaded(Language::Fr));
        let bank = cache.get_or_load(Language::Fr).unwrap();
        assert!(bank.nouns.contains_key("classic"));
        assert!(cache.is_loaded(Language::Fr));
        cache.get_or_load(Language::Fr).unwrap();
        assert_eq!(cache.loaded_count(), 1);
    }

    #[test]
    fn language_cache_prefers_inserted_bank() {
        let mut cache = LanguageCache::new();
        cache.insert(Language::En, small_bank());
        let bank = cache.get_or_load(Language::En).unwrap();
        assert_eq!(bank, &small_bank());
    }
}
