/// Generator integration tests: end-to-end options-to-message generation.

use chrono::{Duration, TimeZone, Utc};
use love_note_engine::core::clock::ManualClock;
use love_note_engine::core::config::GeneratorConfig;
use love_note_engine::core::generator::{GeneratorError, MessageGenerator};
use love_note_engine::core::quality::QualityScorer;
use love_note_engine::core::wordbank::{EmojiSets, WordBank};
use love_note_engine::schema::language::Language;
use love_note_engine::schema::occasion::{Intensity, Mood};
use love_note_engine::schema::options::GenerateOptions;
use std::collections::HashSet;

fn clock() -> ManualClock {
    ManualClock::new(Utc.with_ymd_and_hms(2024, 2, 14, 20, 0, 0).unwrap())
}

fn generator(seed: u64, clock: &ManualClock) -> MessageGenerator {
    MessageGenerator::builder()
        .seed(seed)
        .clock(clock.clone())
        .build()
        .unwrap()
}

#[test]
fn every_combination_names_the_recipient() {
    let clock = clock();
    let mut generator = generator(7, &clock);
    let occasions: Vec<String> = generator.occasions().names().to_vec();

    for lang in Language::ALL {
        for occasion in &occasions {
            for intensity in [Intensity::Low, Intensity::Medium, Intensity::High] {
                let opts = GenerateOptions::new()
                    .name("Sarah")
                    .occasion(occasion)
                    .language(lang)
                    .intensity(intensity);
                let msg = generator.generate_strict(&opts).unwrap();
                assert!(
                    msg.message.starts_with("Hey Sarah, "),
                    "{} / {} / {}: {}",
                    lang,
                    occasion,
                    intensity,
                    msg.message
                );
                assert!(!msg.message.contains('{'), "unfilled slot: {}", msg.message);
            }
        }
    }
    assert!(generator.recent_errors().is_empty());
}

#[test]
fn identical_options_hit_cache_until_stale() {
    let clock = clock();
    let mut generator = generator(11, &clock);
    let opts = GenerateOptions::new().name("Sarah").occasion("poetic");

    let first = generator.generate(&opts);
    clock.advance(Duration::minutes(30));
    assert_eq!(generator.generate(&opts), first);
    assert_eq!(generator.analytics_snapshot().generated_count, 1);

    clock.advance(Duration::minutes(31));
    generator.generate(&opts);
    assert_eq!(generator.analytics_snapshot().generated_count, 2);
}

#[test]
fn different_options_miss_cache() {
    let clock = clock();
    let mut generator = generator(11, &clock);
    generator.generate(&GenerateOptions::new().name("Sarah"));
    generator.generate(&GenerateOptions::new().name("Sarah").include_emoji(false));
    generator.generate(&GenerateOptions::new().name("Sarah").language(Language::De));
    assert_eq!(generator.analytics_snapshot().generated_count, 3);
}

#[test]
fn batch_items_are_distinct_and_attempts_bounded() {
    let clock = clock();
    let mut generator = generator(3, &clock);
    let opts = GenerateOptions::new().name("Sarah").occasion("anniversary");

    let batch = generator.generate_batch(8, &opts);
    assert!(batch.len() <= 8);
    assert!(!batch.is_empty());
    let texts: HashSet<&str> = batch.iter().map(|m| m.message.as_str()).collect();
    assert_eq!(texts.len(), batch.len());
    assert!(generator.analytics_snapshot().generated_count <= 24);
}

#[test]
fn batch_of_zero_is_empty() {
    let clock = clock();
    let mut generator = generator(3, &clock);
    assert!(generator
        .generate_batch(0, &GenerateOptions::new())
        .is_empty());
    assert_eq!(generator.analytics_snapshot().generated_count, 0);
}

#[test]
fn history_keeps_last_capacity_records() {
    let config = GeneratorConfig {
        max_history_size: 4,
        ..GeneratorConfig::default()
    };
    let mut generator = MessageGenerator::builder()
        .seed(1)
        .config(config)
        .build()
        .unwrap();
    for i in 0..7 {
        generator.generate(&GenerateOptions::new().name(&format!("N{}", i)));
    }
    let all = generator.recipient_history("*");
    assert_eq!(all.total, 4);
    let names: Vec<String> = all
        .messages
        .iter()
        .map(|m| m.text.split(',').next().unwrap_or_default().to_string())
        .collect();
    assert_eq!(names, vec!["Hey N3", "Hey N4", "Hey N5", "Hey N6"]);
    assert_eq!(generator.analytics_snapshot().history_size, 4);
}

#[test]
fn quality_scores_are_stable_and_bounded() {
    let clock = clock();
    let mut generator = generator(21, &clock);
    for occasion in ["general", "anniversary", "apology", "proposal"] {
        let msg = generator.generate(&GenerateOptions::new().name("Sam").occasion(occasion));
        let score = msg.quality.unwrap();
        assert!(score <= 100);
        assert_eq!(QualityScorer::score(&msg.message), score);
    }
}

#[test]
fn anniversary_for_sarah_is_passionate() {
    let clock = clock();
    let mut generator = generator(42, &clock);
    let opts = GenerateOptions::new()
        .name("Sarah")
        .occasion("anniversary")
        .language(Language::En);
    let msg = generator.generate_strict(&opts).unwrap();
    assert!(msg.message.starts_with("Hey Sarah, "), "got: {}", msg.message);

    let emoji = EmojiSets::builtin().unwrap();
    let passionate = emoji.for_style(&Mood::Passionate).unwrap();
    assert!(
        passionate.iter().any(|e| msg.message.ends_with(e.as_str())),
        "expected a passionate emoji: {}",
        msg.message
    );

    let bank = WordBank::builtin(Language::En).unwrap();
    let nouns = &bank.nouns["passionate"];
    assert!(
        nouns.iter().any(|n| msg.message.contains(n.as_str())),
        "expected a passionate noun: {}",
        msg.message
    );
}

#[test]
fn explicit_style_overrides_occasion_mood() {
    let clock = clock();
    let mut generator = generator(42, &clock);
    let opts = GenerateOptions::new()
        .name("Sarah")
        .occasion("anniversary")
        .style(Mood::Dreamy)
        .include_emoji(false);
    let msg = generator.generate_strict(&opts).unwrap();

    let bank = WordBank::builtin(Language::En).unwrap();
    let nouns = &bank.nouns["dreamy"];
    assert!(
        nouns.iter().any(|n| msg.message.contains(n.as_str())),
        "expected a dreamy noun: {}",
        msg.message
    );
}

#[test]
fn unsupported_language_leaves_current_unchanged() {
    let clock = clock();
    let mut generator = generator(5, &clock);
    generator.set_language("pt").unwrap();

    let err = generator.set_language("xx").unwrap_err();
    assert!(matches!(err, GeneratorError::UnsupportedLanguage(_)));
    assert_eq!(err.to_string(), "unsupported language: xx");
    assert_eq!(generator.current_language(), Language::Pt);

    // new requests use the current language
    generator.generate(&GenerateOptions::new().name("Ana"));
    assert_eq!(
        generator.analytics_snapshot().languages,
        vec![(Language::Pt, 1)]
    );
}

#[test]
fn reset_empties_analytics() {
    let clock = clock();
    let mut generator = generator(9, &clock);
    generator.generate_batch(5, &GenerateOptions::new().name("Sarah"));
    assert!(generator.analytics_snapshot().generated_count > 0);

    generator.reset();
    let snapshot = generator.analytics_snapshot();
    assert_eq!(snapshot.generated_count, 0);
    assert!(snapshot.top_templates.is_empty());
    assert!(snapshot.top_words.is_empty());
    assert!(snapshot.occasions.is_empty());
    assert_eq!(snapshot.average_quality, 0.0);
}

#[test]
fn analytics_track_occasions_and_words() {
    let clock = clock();
    let mut generator = generator(13, &clock);
    generator.generate(&GenerateOptions::new().name("A").occasion("apology"));
    generator.generate(&GenerateOptions::new().name("B").occasion("apology"));
    generator.generate(&GenerateOptions::new().name("C").occasion("proposal"));

    let snapshot = generator.analytics_snapshot();
    assert_eq!(
        snapshot.occasions,
        vec![("apology".to_string(), 2), ("proposal".to_string(), 1)]
    );
    // envelope text is not counted
    assert!(snapshot.top_words.iter().all(|(w, _)| w != "hey"));
    assert!(snapshot.average_quality > 0.0);
    assert_eq!(snapshot.quality_samples, 3);
}

#[test]
fn config_loaded_from_ron_applies() {
    let config = GeneratorConfig::parse_ron("(default_language: fr, enable_history: false)").unwrap();
    let mut generator = MessageGenerator::builder().config(config).build().unwrap();
    assert_eq!(generator.current_language(), Language::Fr);
    generator.generate(&GenerateOptions::new().name("Luc"));
    assert_eq!(generator.recipient_history("Luc").total, 0);
}

#[test]
fn long_multi_part_name_is_kept_verbatim() {
    let c = clock();
    let mut g = generator(7, &c);
    let name = "Maria de los Angeles Fernandez Gutierrez Rodriguez y Santamaria Lopez";
    let msg = g
        .generate_strict(&GenerateOptions::new().name(name))
        .unwrap();
    assert!(
        msg.message.starts_with(&format!("Hey {}, ", name)),
        "got: {}",
        msg.message
    );
    assert!(g.recent_errors().is_empty());
}

#[test]
fn padded_name_is_echoed_as_given() {
    let c = clock();
    let mut g = generator(7, &c);
    let msg = g.generate(&GenerateOptions::new().name(" Sarah "));
    assert!(msg.message.starts_with("Hey  Sarah , "), "got: {}", msg.message);
}
