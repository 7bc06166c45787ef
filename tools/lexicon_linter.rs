/// Lexicon Linter: validates template, occasion, emoji, and word bank coverage.
///
/// Usage: lexicon_linter <lexicon_dir>

use love_note_engine::core::catalog::{OccasionTable, TemplateCatalog};
use love_note_engine::core::pattern::SlotKind;
use love_note_engine::core::wordbank::{EmojiSets, WordBank, FALLBACK_EMOJI_STYLE};
use love_note_engine::schema::language::Language;
use love_note_engine::schema::occasion::{Intensity, Mood, Sentiment};
use std::collections::HashSet;
use std::path::Path;
use std::process;

/// Buckets the mood resolver can produce without an explicit style.
const RESOLVED_MOODS: [Mood; 3] = [Mood::Tender, Mood::Classic, Mood::Passionate];
const MIN_BUCKET_WORDS: usize = 3;

fn main() {
    env_logger::init();
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        println!("Usage: lexicon_linter <lexicon_dir>");
        process::exit(0);
    }

    let dir = Path::new(&args[1]);
    if !dir.is_dir() {
        eprintln!("ERROR: Path '{}' is not a directory", dir.display());
        process::exit(1);
    }

    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    let catalog = match TemplateCatalog::load_from_ron(&dir.join("templates.ron")) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("ERROR: Failed to load templates: {}", e);
            process::exit(1);
        }
    };
    let occasions = match OccasionTable::load_from_ron(&dir.join("occasions.ron")) {
        Ok(o) => o,
        Err(e) => {
            eprintln!("ERROR: Failed to load occasions: {}", e);
            process::exit(1);
        }
    };
    let emoji = match std::fs::read_to_string(dir.join("emoji.ron")) {
        Ok(source) => match EmojiSets::parse_ron(&source) {
            Ok(sets) => Some(sets),
            Err(e) => {
                errors.push(format!("emoji.ron: {}", e));
                None
            }
        },
        Err(e) => {
            errors.push(format!("emoji.ron: {}", e));
            None
        }
    };

    println!(
        "Loaded {} templates, {} occasions",
        catalog.len(),
        occasions.len()
    );

    lint_catalog(&catalog, &occasions, &mut errors, &mut warnings);
    if let Some(ref emoji) = emoji {
        lint_emoji(emoji, &occasions, &mut errors, &mut warnings);
    }

    let used_slots: HashSet<SlotKind> = catalog
        .all()
        .iter()
        .flat_map(|t| t.pattern.slots())
        .collect();
    for lang in Language::ALL {
        let path = dir.join(format!("{}.ron", lang.code()));
        match WordBank::load_from_ron(&path) {
            Ok(bank) => {
                println!("  Loaded: {}", path.display());
                lint_bank(lang, &bank, &used_slots, &mut errors, &mut warnings);
            }
            Err(e) => errors.push(format!("{}: {}", path.display(), e)),
        }
    }

    println!("\n=== Lexicon Lint Report ===\n");

    if errors.is_empty() && warnings.is_empty() {
        println!("All checks passed!");
    }

    for warning in &warnings {
        println!("WARNING: {}", warning);
    }

    for error in &errors {
        println!("ERROR: {}", error);
    }

    println!(
        "\nSummary: {} errors, {} warnings",
        errors.len(),
        warnings.len()
    );

    if errors.is_empty() {
        process::exit(0);
    } else {
        process::exit(1);
    }
}

fn lint_catalog(
    catalog: &TemplateCatalog,
    occasions: &OccasionTable,
    errors: &mut Vec<String>,
    warnings: &mut Vec<String>,
) {
    for template in catalog.all() {
        for name in &template.applies_to.occasions {
            if occasions.get(name).is_none() {
                errors.push(format!(
                    "Template {} applies to unknown occasion '{}'",
                    template.id, name
                ));
            }
        }
        if template.applies_to.occasions.is_empty() && template.applies_to.intensities.is_empty() {
            warnings.push(format!(
                "Template {} applies to nothing and is only reachable as a fallback",
                template.id
            ));
        }
        if !template.pattern.slots().any(|s| s == SlotKind::Ending) {
            warnings.push(format!("Template {} has no {{ending}} slot", template.id));
        }
    }

    for occasion in occasions.iter() {
        for intensity in [Intensity::Low, Intensity::Medium, Intensity::High] {
            if catalog.applicable(occasion, intensity).is_empty() {
                let message = format!(
                    "No template serves occasion '{}' at {} intensity",
                    occasion.name, intensity
                );
                // The occasion's own intensity is the common case.
                if intensity == occasion.intensity {
                    errors.push(message);
                } else {
                    warnings.push(message);
                }
            }
        }
    }
}

fn lint_emoji(
    emoji: &EmojiSets,
    occasions: &OccasionTable,
    errors: &mut Vec<String>,
    warnings: &mut Vec<String>,
) {
    if !emoji.sets.contains_key(FALLBACK_EMOJI_STYLE) {
        errors.push(format!("No '{}' emoji set", FALLBACK_EMOJI_STYLE));
    }
    for (style, set) in &emoji.sets {
        if set.is_empty() {
            warnings.push(format!("Emoji set '{}' is empty", style));
        }
    }
    for occasion in occasions.iter() {
        if !emoji.sets.contains_key(occasion.style.name()) {
            warnings.push(format!(
                "Occasion '{}' uses style '{}' which has no emoji set",
                occasion.name,
                occasion.style.name()
            ));
        }
    }
}

fn lint_bank(
    lang: Language,
    bank: &WordBank,
    used_slots: &HashSet<SlotKind>,
    errors: &mut Vec<String>,
    warnings: &mut Vec<String>,
) {
    for kind in [SlotKind::Verb, SlotKind::Adjective, SlotKind::Noun] {
        let table = bank.table(kind);
        if table.values().all(|words| words.is_empty()) {
            if used_slots.contains(&kind) {
                errors.push(format!("[{}] No {} words at all", lang, kind));
            }
            continue;
        }
        for mood in &RESOLVED_MOODS {
            if !table.contains_key(mood.name()) {
                warnings.push(format!(
                    "[{}] No '{}' {} bucket (falls back)",
                    lang,
                    mood.name(),
                    kind
                ));
            }
        }
        for (bucket, words) in table {
            if words.len() < MIN_BUCKET_WORDS {
                warnings.push(format!(
                    "[{}] {} bucket '{}' has only {} words (minimum {} recommended)",
                    lang,
                    kind,
                    bucket,
                    words.len(),
                    MIN_BUCKET_WORDS
                ));
            }
        }
    }

    if bank.endings.values().all(|phrases| phrases.is_empty()) {
        errors.push(format!("[{}] No endings at all", lang));
        return;
    }
    for sentiment in Sentiment::ALL {
        if !bank.endings.contains_key(sentiment.name()) {
            warnings.push(format!(
                "[{}] No endings for sentiment '{}' (falls back)",
                lang,
                sentiment.name()
            ));
        }
    }
}
