/// Preview: interactive generation shell for trying occasions, languages, and styles.
///
/// Usage: preview [--config <path>] [--lexicon <dir>] [--seed <n>]
///
/// Commands:
///   gen [key=value ...]        generate one message
///   batch <n> [key=value ...]  generate n distinct messages
///   lang <code>                switch the default language
///   history <name|*>           show messages sent to a recipient
///   stats                      show the analytics snapshot
///   export                     dump the full state as RON
///   errors                     show recent failures
///   reset                      clear cache, history, and analytics
///   seed <n>                   rebuild the generator with a new seed
///   help                       list commands
///   quit                       exit

use love_note_engine::core::catalog::{OccasionTable, TemplateCatalog};
use love_note_engine::core::config::GeneratorConfig;
use love_note_engine::core::generator::{GeneratorError, MessageGenerator};
use love_note_engine::schema::options::GenerateOptions;
use std::io::{self, BufRead, Write};
use std::path::Path;

fn main() {
    env_logger::init();
    let args: Vec<String> = std::env::args().collect();

    if args.len() > 1 && (args[1] == "--help" || args[1] == "-h") {
        print_usage();
        return;
    }

    let mut config_path = None;
    let mut lexicon_dir = None;
    let mut seed: u64 = 42;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" if i + 1 < args.len() => {
                i += 1;
                config_path = Some(args[i].clone());
            }
            "--lexicon" if i + 1 < args.len() => {
                i += 1;
                lexicon_dir = Some(args[i].clone());
            }
            "--seed" if i + 1 < args.len() => {
                i += 1;
                seed = match parse_seed(&args[i]) {
                    Ok(n) => n,
                    Err(e) => {
                        eprintln!("{}", e);
                        print_usage();
                        std::process::exit(1);
                    }
                };
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                print_usage();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    let config = match config_path {
        Some(ref path) => match GeneratorConfig::load_from_ron(Path::new(path)) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("ERROR: Failed to load config: {}", e);
                std::process::exit(1);
            }
        },
        None => GeneratorConfig::default(),
    };

    let mut generator = match build_generator(&config, lexicon_dir.as_deref(), seed) {
        Ok(g) => g,
        Err(e) => {
            eprintln!("ERROR: {}", e);
            std::process::exit(1);
        }
    };

    println!(
        "Loaded {} templates, {} occasions",
        generator.catalog().len(),
        generator.occasions().len()
    );
    println!("Seed: {}", seed);
    println!("Type 'help' for commands.\n");

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("preview [{}]> ", generator.current_language());
        stdout.flush().ok();

        let mut line = String::new();
        if stdin.lock().read_line(&mut line).is_err() || line.is_empty() {
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let parts: Vec<&str> = line.split_whitespace().collect();
        let cmd = parts[0].to_lowercase();

        match cmd.as_str() {
            "quit" | "exit" | "q" => {
                println!("Goodbye.");
                break;
            }
            "help" | "h" | "?" => {
                print_help(&generator);
            }
            "gen" | "g" => {
                let opts = match parse_options(&parts[1..]) {
                    Ok(o) => o,
                    Err(e) => {
                        println!("ERROR: {}", e);
                        continue;
                    }
                };
                match generator.generate_strict(&opts) {
                    Ok(msg) => {
                        println!("\n{}", msg.message);
                        if let Some(q) = msg.quality {
                            println!("  quality: {}", q);
                        }
                        println!();
                    }
                    Err(e) => println!("ERROR: {}", e),
                }
            }
            "batch" => {
                let count: usize = match parts.get(1).map(|s| s.parse()) {
                    Some(Ok(n)) => n,
                    _ => {
                        println!("Usage: batch <n> [key=value ...]");
                        continue;
                    }
                };
                let opts = match parse_options(&parts[2..]) {
                    Ok(o) => o,
                    Err(e) => {
                        println!("ERROR: {}", e);
                        continue;
                    }
                };
                let batch = generator.generate_batch(count, &opts);
                println!("\n=== Batch: {} / {} distinct ===\n", batch.len(), count);
                for (n, msg) in batch.iter().enumerate() {
                    match msg.quality {
                        Some(q) => println!("{:>3}. [{:>3}] {}", n + 1, q, msg.message),
                        None => println!("{:>3}. {}", n + 1, msg.message),
                    }
                }
                println!();
            }
            "lang" => match parts.get(1) {
                Some(code) => match generator.set_language(code) {
                    Ok(()) => println!("Language set to {}", generator.current_language()),
                    Err(e) => println!("ERROR: {}", e),
                },
                None => println!("Current language: {}", generator.current_language()),
            },
            "history" => {
                let name = parts.get(1).copied().unwrap_or("*");
                let history = generator.recipient_history(name);
                println!("\n{} message(s) for '{}':", history.total, history.recipient);
                for entry in &history.messages {
                    println!(
                        "  {:>3}. {}  {}",
                        entry.index,
                        entry.timestamp.format("%H:%M:%S"),
                        entry.text
                    );
                }
                println!();
            }
            "stats" => {
                let snapshot = generator.analytics_snapshot();
                println!("\n=== Analytics ===\n");
                println!("Generated: {}", snapshot.generated_count);
                println!(
                    "Average quality: {:.2} ({} samples)",
                    snapshot.average_quality, snapshot.quality_samples
                );
                println!("History size: {}", snapshot.history_size);
                println!("\nTop templates:");
                for (id, count) in &snapshot.top_templates {
                    println!("  #{}: {}", id, count);
                }
                println!("\nOccasions:");
                for (occasion, count) in &snapshot.occasions {
                    println!("  {}: {}", occasion, count);
                }
                println!("\nLanguages:");
                for (lang, count) in &snapshot.languages {
                    println!("  {}: {}", lang, count);
                }
                println!("\nTop 10 words:");
                for (word, count) in &snapshot.top_words {
                    println!("  {}: {}", word, count);
                }
                println!();
            }
            "export" => {
                let pretty = ron::ser::PrettyConfig::default();
                match ron::ser::to_string_pretty(&generator.export_state(), pretty) {
                    Ok(text) => println!("{}", text),
                    Err(e) => println!("ERROR: {}", e),
                }
            }
            "errors" => {
                let errors = generator.recent_errors();
                if errors.is_empty() {
                    println!("No recent errors.");
                }
                for e in errors {
                    println!("  {}", e);
                }
            }
            "reset" => {
                generator.reset();
                println!("State cleared.");
            }
            "seed" => match parts.get(1).map(|s| parse_seed(s)) {
                Some(Ok(n)) => {
                    let language = generator.current_language();
                    match build_generator(&config, lexicon_dir.as_deref(), n) {
                        Ok(mut g) => {
                            if let Err(e) = g.set_language(language.code()) {
                                println!("ERROR: {}", e);
                            }
                            generator = g;
                            println!("Seed set to {} (state cleared)", n);
                        }
                        Err(e) => println!("ERROR: {}", e),
                    }
                }
                _ => println!("Usage: seed <n>"),
            },
            _ => {
                println!("Unknown command: '{}'. Type 'help' for available commands.", cmd);
            }
        }
    }
}

fn build_generator(
    config: &GeneratorConfig,
    lexicon_dir: Option<&str>,
    seed: u64,
) -> Result<MessageGenerator, GeneratorError> {
    let mut builder = MessageGenerator::builder().config(config.clone()).seed(seed);
    if let Some(dir) = lexicon_dir {
        let dir = Path::new(dir);
        builder = builder
            .with_templates(TemplateCatalog::load_from_ron(&dir.join("templates.ron"))?)
            .with_occasions(OccasionTable::load_from_ron(&dir.join("occasions.ron"))?);
    }
    builder.build()
}

fn parse_seed(text: &str) -> Result<u64, String> {
    text.parse()
        .map_err(|_| format!("Invalid seed '{}': expected a non-negative integer", text))
}

/// Parse `key=value` pairs into options.
fn parse_options(pairs: &[&str]) -> Result<GenerateOptions, String> {
    let mut opts = GenerateOptions::new();
    for pair in pairs {
        let (key, value) = pair
            .split_once('=')
            .ok_or_else(|| format!("expected key=value, got '{}'", pair))?;
        opts.set(key, value).map_err(|e| e.to_string())?;
    }
    Ok(opts)
}

fn print_usage() {
    println!("Preview: interactive generation shell for trying occasions, languages, and styles.");
    println!();
    println!("Usage: preview [--config <path>] [--lexicon <dir>] [--seed <n>]");
    println!();
    println!("  --config <path>   Generator config RON file (optional)");
    println!("  --lexicon <dir>   Directory with templates.ron and occasions.ron (optional)");
    println!("  --seed <n>        Initial RNG seed (default: 42)");
}

fn print_help(generator: &MessageGenerator) {
    println!("Commands:");
    println!("  gen [key=value ...]        Generate one message");
    println!("  batch <n> [key=value ...]  Generate n distinct messages");
    println!("  lang <code>                Switch default language (en, es, fr, de, pt)");
    println!("  history <name|*>           Show messages sent to a recipient");
    println!("  stats                      Show analytics");
    println!("  export                     Dump full state as RON");
    println!("  errors                     Show recent failures");
    println!("  reset                      Clear cache, history, and analytics");
    println!("  seed <n>                   Rebuild with a new seed");
    println!("  help                       Show this help");
    println!("  quit                       Exit");
    println!();
    println!("Option keys:");
    println!("  name, occasion, language, intensity (low|medium|high),");
    println!("  style, sentiment (eternal|present|future), emoji_style, include_emoji");
    println!();
    println!("Occasions:");
    println!("  {}", generator.occasions().names().join(", "));
    println!();
}
