/// Usage analytics: generation counters, word frequencies, and a rolling
/// window of quality scores.
///
/// The quality average covers only the most recent `quality_window` scores;
/// older scores are overwritten, keeping memory bounded at the cost of an
/// all-time average.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::hash::Hash;

use crate::core::ring::RingBuffer;
use crate::schema::language::Language;
use crate::schema::template::TemplateId;

/// Words shorter than this are not counted.
pub const MIN_WORD_CHARS: usize = 3;
pub const TOP_TEMPLATES: usize = 5;
pub const TOP_WORDS: usize = 10;

/// Counters that remember first-seen order, used to break ties.
#[derive(Debug, Clone)]
struct Tally<K> {
    index: FxHashMap<K, usize>,
    counts: Vec<(K, u64)>,
}

impl<K> Default for Tally<K> {
    fn default() -> Self {
        Self {
            index: FxHashMap::default(),
            counts: Vec::new(),
        }
    }
}

impl<K: Eq + Hash + Clone> Tally<K> {
    fn bump(&mut self, key: K) {
        match self.index.get(&key) {
            Some(&i) => self.counts[i].1 += 1,
            None => {
                self.index.insert(key.clone(), self.counts.len());
                self.counts.push((key, 1));
            }
        }
    }

    fn get(&self, key: &K) -> u64 {
        self.index.get(key).map(|&i| self.counts[i].1).unwrap_or(0)
    }

    /// Highest counts first; equal counts keep first-seen order.
    fn top(&self, n: usize) -> Vec<(K, u64)> {
        let mut sorted = self.counts.clone();
        sorted.sort_by(|a, b| b.1.cmp(&a.1));
        sorted.truncate(n);
        sorted
    }

    fn in_order(&self) -> Vec<(K, u64)> {
        self.counts.clone()
    }

    fn clear(&mut self) {
        self.index.clear();
        self.counts.clear();
    }
}

/// A point-in-time view of the aggregated counters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsSnapshot {
    pub generated_count: u64,
    /// Mean of the scores in the rolling window, rounded to two decimals.
    pub average_quality: f64,
    pub quality_samples: usize,
    /// Top five templates by use.
    pub top_templates: Vec<(TemplateId, u64)>,
    /// Every occasion, in first-used order.
    pub occasions: Vec<(String, u64)>,
    /// Top ten words by frequency.
    pub top_words: Vec<(String, u64)>,
    pub languages: Vec<(Language, u64)>,
    /// Records currently held in the recipient history.
    #[serde(default)]
    pub history_size: usize,
}

#[derive(Debug, Clone)]
pub struct AnalyticsAggregator {
    generated: u64,
    templates: Tally<TemplateId>,
    occasions: Tally<String>,
    words: Tally<String>,
    languages: Tally<Language>,
    quality: RingBuffer<u8>,
}

impl AnalyticsAggregator {
    pub fn new(quality_window: usize) -> Self {
        Self {
            generated: 0,
            templates: Tally::default(),
            occasions: Tally::default(),
            words: Tally::default(),
            languages: Tally::default(),
            quality: RingBuffer::new(quality_window),
        }
    }

    /// Count one generation.
    pub fn update(&mut self, template_id: TemplateId, occasion: &str, text: &str) {
        self.generated += 1;
        self.templates.bump(template_id);
        self.occasions.bump(occasion.to_string());
        for word in tokenize(text) {
            self.words.bump(word);
        }
    }

    pub fn record_language(&mut self, language: Language) {
        self.languages.bump(language);
    }

    pub fn record_quality(&mut self, score: u8) {
        self.quality.push(score);
    }

    pub fn generated_count(&self) -> u64 {
        self.generated
    }

    pub fn template_count(&self, id: TemplateId) -> u64 {
        self.templates.get(&id)
    }

    pub fn word_count(&self, word: &str) -> u64 {
        self.words.get(&word.to_lowercase())
    }

    pub fn average_quality(&self) -> f64 {
        if self.quality.is_empty() {
            return 0.0;
        }
        let sum: u64 = self.quality.iter().map(|&s| u64::from(s)).sum();
        let mean = sum as f64 / self.quality.len() as f64;
        (mean * 100.0).round() / 100.0
    }

    pub fn snapshot(&self) -> AnalyticsSnapshot {
        AnalyticsSnapshot {
            generated_count: self.generated,
            average_quality: self.average_quality(),
            quality_samples: self.quality.len(),
            top_templates: self.templates.top(TOP_TEMPLATES),
            occasions: self.occasions.in_order(),
            top_words: self.words.top(TOP_WORDS),
            languages: self.languages.in_order(),
            history_size: 0,
        }
    }

    pub fn reset(&mut self) {
        self.generated = 0;
        self.templates.clear();
        self.occasions.clear();
        self.words.clear();
        self.languages.clear();
        self.quality.clear();
    }
}

/// Lowercased alphanumeric runs of at least [`MIN_WORD_CHARS`] characters.
pub fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|run| run.chars().count() >= MIN_WORD_CHARS)
        .map(str::to_lowercase)
}
