/// The message generator: options → finished message orchestration.
///
/// Wires together occasion lookup, the result cache, template selection,
/// mood resolution, template filling, quality scoring, history, and
/// analytics. Built via `MessageGenerator::builder()`.
///
/// A generator is a single-owner value: every operation takes `&mut self`
/// and runs to completion. To share one across threads, wrap it in a
/// `Mutex`.

use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use chrono::{DateTime, Utc};

use crate::core::analytics::{AnalyticsAggregator, AnalyticsSnapshot};
use crate::core::cache::ResultCache;
use crate::core::catalog::{CatalogError, OccasionTable, TemplateCatalog};
use crate::core::clock::{Clock, SystemClock};
use crate::core::config::{ConfigError, GeneratorConfig};
use crate::core::filler::{FillContext, TemplateFiller};
use crate::core::history::{HistoryRecord, RecencyBuffer};
use crate::core::mood::MoodResolver;
use crate::core::quality::QualityScorer;
use crate::core::ring::RingBuffer;
use crate::core::wordbank::{EmojiSets, LanguageCache, WordBank, WordBankError};
use crate::schema::language::{Language, UnsupportedLanguage};
use crate::schema::occasion::Occasion;
use crate::schema::options::{GenerateOptions, ValidationError, DEFAULT_RECIPIENT};
#[cfg(test)]
use crate::schema::options::MAX_NAME_CHARS;

/// Emoji appended to the fallback message.
pub const FALLBACK_EMOJI: &str = "💖";
/// History records included in [`StateExport::sample_history`].
pub const EXPORT_HISTORY_SAMPLE: usize = 10;
const ERROR_LOG_CAPACITY: usize = 16;

#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    UnsupportedLanguage(#[from] UnsupportedLanguage),
    #[error("unknown occasion: {0}")]
    UnknownOccasion(String),
    #[error("word bank error: {0}")]
    WordBank(#[from] WordBankError),
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("template catalog is empty")]
    EmptyCatalog,
}

/// A generated message, with its quality score when scoring is enabled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedMessage {
    pub message: String,
    pub quality: Option<u8>,
}

impl fmt::Display for GeneratedMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Every option after defaults are applied. Identical requests produce
/// identical keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey(GenerateOptions);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// 1-based position among this recipient's messages.
    pub index: usize,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipientHistory {
    pub recipient: String,
    pub total: usize,
    pub messages: Vec<HistoryEntry>,
}

/// A point-in-time diagnostic blob for external reporting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateExport {
    pub timestamp: DateTime<Utc>,
    pub current_language: Language,
    pub analytics: AnalyticsSnapshot,
    pub config: GeneratorConfig,
    pub sample_history: Vec<HistoryRecord>,
}

/// The top-level generator. Owns every component it uses.
pub struct MessageGenerator {
    config: GeneratorConfig,
    catalog: TemplateCatalog,
    occasions: OccasionTable,
    languages: LanguageCache,
    emoji: EmojiSets,
    current_language: Language,
    cache: ResultCache<CacheKey, GeneratedMessage>,
    history: RecencyBuffer,
    analytics: AnalyticsAggregator,
    errors: RingBuffer<String>,
    rng: StdRng,
    clock: Box<dyn Clock>,
}

/// Builder for constructing a `MessageGenerator`.
pub struct MessageGeneratorBuilder {
    config: GeneratorConfig,
    seed: Option<u64>,
    clock: Option<Box<dyn Clock>>,
    /// Directly provided templates (replaces the built-in catalog).
    templates: Option<TemplateCatalog>,
    /// Directly provided occasions (replaces the built-in table).
    occasions: Option<OccasionTable>,
    /// Word banks that take the place of the built-in ones.
    word_banks: Vec<(Language, WordBank)>,
    emoji: Option<EmojiSets>,
}

impl MessageGenerator {
    pub fn builder() -> MessageGeneratorBuilder {
        MessageGeneratorBuilder {
            config: GeneratorConfig::default(),
            seed: None,
            clock: None,
            templates: None,
            occasions: None,
            word_banks: Vec::new(),
            emoji: None,
        }
    }

    /// Generate a message. Never fails: any error is logged, kept in
    /// [`recent_errors`](Self::recent_errors), and replaced by a fixed
    /// fallback message. A failed call leaves caches and analytics untouched.
    pub fn generate(&mut self, options: &GenerateOptions) -> GeneratedMessage {
        match self.run(options, true) {
            Ok(message) => message,
            Err(e) => self.fallback(options, e),
        }
    }

    /// Generate a message, returning errors instead of the fallback.
    pub fn generate_strict(
        &mut self,
        options: &GenerateOptions,
    ) -> Result<GeneratedMessage, GeneratorError> {
        self.run(options, true)
    }

    /// Generate up to `count` distinct messages.
    ///
    /// Makes at most `count * batch_attempt_multiplier` attempts and returns
    /// fewer items when the attempts run out. Attempts skip the cache lookup,
    /// otherwise every attempt after the first would repeat the cached text.
    pub fn generate_batch(
        &mut self,
        count: usize,
        options: &GenerateOptions,
    ) -> Vec<GeneratedMessage> {
        let max_attempts = count.saturating_mul(self.config.batch_attempt_multiplier);
        let mut seen = FxHashSet::default();
        let mut results = Vec::with_capacity(count);
        let mut attempts = 0;

        while results.len() < count && attempts < max_attempts {
            attempts += 1;
            let message = match self.run(options, false) {
                Ok(message) => message,
                Err(e) => self.fallback(options, e),
            };
            if seen.insert(message.message.clone()) {
                results.push(message);
            }
        }

        if results.len() < count {
            debug!(
                "batch filled {}/{} after {} attempts",
                results.len(),
                count,
                attempts
            );
        }
        results
    }

    /// Switch the default language. An unknown code leaves the current
    /// language unchanged.
    pub fn set_language(&mut self, code: &str) -> Result<(), GeneratorError> {
        let lang = Language::from_code(code)?;
        self.languages.get_or_load(lang)?;
        if lang != self.current_language {
            info!("language switched from '{}' to '{}'", self.current_language, lang);
        }
        self.current_language = lang;
        Ok(())
    }

    pub fn current_language(&self) -> Language {
        self.current_language
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn catalog(&self) -> &TemplateCatalog {
        &self.catalog
    }

    pub fn occasions(&self) -> &OccasionTable {
        &self.occasions
    }

    pub fn analytics_snapshot(&self) -> AnalyticsSnapshot {
        let mut snapshot = self.analytics.snapshot();
        snapshot.history_size = self.history.len();
        snapshot
    }

    /// Messages sent to `name` (case-insensitive), oldest first.
    /// `"*"` lists every recipient.
    pub fn recipient_history(&self, name: &str) -> RecipientHistory {
        let records = self.history.query(name);
        let messages: Vec<HistoryEntry> = records
            .into_iter()
            .enumerate()
            .map(|(i, r)| HistoryEntry {
                index: i + 1,
                text: r.text,
                timestamp: r.timestamp,
            })
            .collect();
        RecipientHistory {
            recipient: name.to_string(),
            total: messages.len(),
            messages,
        }
    }

    pub fn export_state(&self) -> StateExport {
        StateExport {
            timestamp: self.clock.now(),
            current_language: self.current_language,
            analytics: self.analytics_snapshot(),
            config: self.config.clone(),
            sample_history: self.history.latest(EXPORT_HISTORY_SAMPLE),
        }
    }

    /// Failures converted to the fallback message, oldest first.
    pub fn recent_errors(&self) -> Vec<String> {
        self.errors.to_vec()
    }

    /// Clear the result cache, history, analytics, and error log. Loaded
    /// word banks are kept.
    pub fn reset(&mut self) {
        self.cache.clear();
        self.history.clear();
        self.analytics.reset();
        self.errors.clear();
        info!("generator state reset");
    }

    fn run(
        &mut self,
        options: &GenerateOptions,
        read_cache: bool,
    ) -> Result<GeneratedMessage, GeneratorError> {
        options.validate()?;

        let name = options.resolved_name().to_string();
        let occasion_name = options.resolved_occasion();
        let occasion: Occasion = self
            .occasions
            .get(occasion_name)
            .cloned()
            .ok_or_else(|| GeneratorError::UnknownOccasion(occasion_name.to_string()))?;
        let language = options.language.unwrap_or(self.current_language);
        let intensity = options.intensity.unwrap_or(occasion.intensity);
        let sentiment = options.sentiment.unwrap_or(occasion.sentiment);
        let include_emoji = options.include_emoji.unwrap_or(true);

        let key = CacheKey(GenerateOptions {
            name: Some(name.clone()),
            occasion: Some(occasion.name.clone()),
            language: Some(language),
            intensity: Some(intensity),
            style: options.style.clone(),
            sentiment: Some(sentiment),
            emoji_style: options.emoji_style.clone(),
            include_emoji: Some(include_emoji),
        });
        let now = self.clock.now();

        if self.config.enable_cache && read_cache {
            if let Some(hit) = self.cache.get(&key, now) {
                debug!("cache hit for '{}' ({})", name, occasion.name);
                return Ok(hit);
            }
        }

        // 1. Resolve mood and word bank
        let mood = MoodResolver::resolve(intensity, options.style.as_ref());
        let bank = self.languages.get_or_load(language)?;

        // 2. Pick a template, falling back to the whole catalog
        let applicable = self.catalog.applicable(&occasion, intensity);
        let template = if applicable.is_empty() {
            debug!(
                "no template serves '{}' at {}; choosing from full catalog",
                occasion.name, intensity
            );
            self.catalog.all().choose(&mut self.rng)
        } else {
            applicable.choose(&mut self.rng).copied()
        }
        .ok_or(GeneratorError::EmptyCatalog)?;

        // 3. Fill slots
        let ctx = FillContext {
            mood: &mood,
            sentiment,
            occasion: &occasion.name,
        };
        let filled = TemplateFiller::fill(template, &ctx, bank, &mut self.rng)?;

        // 4. Compose envelope
        let emoji = if include_emoji {
            let style = options.emoji_style.as_ref().unwrap_or(&occasion.style);
            self.emoji
                .for_style(style)?
                .choose(&mut self.rng)
                .cloned()
                .unwrap_or_default()
        } else {
            String::new()
        };
        let message = format!("Hey {}, {} {}", name, filled.text, emoji)
            .trim_end()
            .to_string();

        let quality = if self.config.enable_quality_scoring {
            Some(QualityScorer::score(&message))
        } else {
            None
        };
        let result = GeneratedMessage { message, quality };

        // 5. Record. Nothing below can fail.
        if self.config.enable_analytics {
            self.analytics
                .update(filled.template_id, &filled.occasion, &filled.text);
            self.analytics.record_language(language);
            if let Some(score) = quality {
                self.analytics.record_quality(score);
            }
        }
        if self.config.enable_cache {
            self.cache.put(key, result.clone(), now);
        }
        if self.config.enable_history {
            self.history.push(HistoryRecord {
                recipient: name,
                text: result.message.clone(),
                timestamp: now,
            });
        }

        Ok(result)
    }

    fn fallback(&mut self, options: &GenerateOptions, error: GeneratorError) -> GeneratedMessage {
        warn!("generation failed, using fallback message: {}", error);
        self.errors.push(error.to_string());

        // A rejected name is not echoed back.
        let name = match error {
            GeneratorError::Validation(_) => DEFAULT_RECIPIENT,
            _ => options.resolved_name(),
        };
        GeneratedMessage {
            message: format!("Hey {}, you mean everything to me! {}", name, FALLBACK_EMOJI),
            quality: None,
        }
    }
}

impl MessageGeneratorBuilder {
    pub fn config(mut self, config: GeneratorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Some(Box::new(clock));
        self
    }

    /// Provide templates directly instead of the built-in catalog.
    pub fn with_templates(mut self, templates: TemplateCatalog) -> Self {
        self.templates = Some(templates);
        self
    }

    /// Provide occasions directly instead of the built-in table.
    pub fn with_occasions(mut self, occasions: OccasionTable) -> Self {
        self.occasions = Some(occasions);
        self
    }

    /// Use `bank` for `lang` instead of the built-in word bank.
    pub fn with_word_bank(mut self, lang: Language, bank: WordBank) -> Self {
        self.word_banks.push((lang, bank));
        self
    }

    pub fn with_emoji(mut self, emoji: EmojiSets) -> Self {
        self.emoji = Some(emoji);
        self
    }

    pub fn build(self) -> Result<MessageGenerator, GeneratorError> {
        self.config.validate()?;

        let catalog = match self.templates {
            Some(catalog) => catalog,
            None => TemplateCatalog::builtin()?,
        };
        if catalog.is_empty() {
            return Err(GeneratorError::EmptyCatalog);
        }
        let occasions = match self.occasions {
            Some(occasions) => occasions,
            None => OccasionTable::builtin()?,
        };
        let emoji = match self.emoji {
            Some(emoji) => emoji,
            None => EmojiSets::builtin()?,
        };

        let mut languages = LanguageCache::new();
        for (lang, bank) in self.word_banks {
            languages.insert(lang, bank);
        }
        let current_language = self.config.default_language;
        languages.get_or_load(current_language)?;

        let rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(MessageGenerator {
            cache: ResultCache::new(self.config.max_cache_size, self.config.cache_staleness()),
            history: RecencyBuffer::new(self.config.max_history_size),
            analytics: AnalyticsAggregator::new(self.config.quality_window),
            errors: RingBuffer::new(ERROR_LOG_CAPACITY),
            clock: self.clock.unwrap_or_else(|| Box::new(SystemClock)),
            config: self.config,
            catalog,
            occasions,
            languages,
            emoji,
            current_language,
            rng,
        })
    }
}
