//! WASM bindings for love-note-engine, powering the interactive web demo.

use serde_json::Value;
use std::collections::BTreeMap;
use wasm_bindgen::prelude::*;

use love_note_engine::core::generator::MessageGenerator;
use love_note_engine::schema::language::Language;
use love_note_engine::schema::options::{GenerateOptions, ValidationError};

// ---------------------------------------------------------------------------
// JSON helpers for communication across the WASM boundary
// ---------------------------------------------------------------------------

/// Options arrive as a flat JSON object, e.g.
/// `{"name": "Sarah", "occasion": "anniversary", "includeEmoji": false}`.
///
/// Each key takes one JSON type: `includeEmoji` a bool, `intensity` a number
/// or string, everything else a string. `null` leaves the option unset.
fn options_from_json(options_json: &str) -> Result<GenerateOptions, ValidationError> {
    let mut opts = GenerateOptions::new();
    if options_json.trim().is_empty() {
        return Ok(opts);
    }
    let fields: BTreeMap<String, Value> = serde_json::from_str(options_json)
        .map_err(|e| ValidationError(format!("invalid options JSON: {e}")))?;
    for (key, value) in fields {
        let text = match (key.as_str(), value) {
            (_, Value::Null) => continue,
            ("include_emoji" | "includeEmoji", Value::Bool(b)) => b.to_string(),
            ("include_emoji" | "includeEmoji", _) => {
                return Err(ValidationError(format!("option '{key}' expects a boolean")))
            }
            ("intensity", Value::Number(n)) => n.to_string(),
            (_, Value::String(s)) => s,
            ("intensity", _) => {
                return Err(ValidationError(format!(
                    "option '{key}' expects a number or string"
                )))
            }
            _ => return Err(ValidationError(format!("option '{key}' expects a string"))),
        };
        opts.set(&key, &text)?;
    }
    Ok(opts)
}

fn parse_options(options_json: &str) -> Result<GenerateOptions, JsError> {
    options_from_json(options_json).map_err(|e| JsError::new(&e.to_string()))
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, JsError> {
    serde_json::to_string(value).map_err(|e| JsError::new(&format!("Serialization error: {e}")))
}

// ---------------------------------------------------------------------------
// LoveNoteDemo: the main exported struct
// ---------------------------------------------------------------------------
#[wasm_bindgen]
pub struct LoveNoteDemo {
    generator: MessageGenerator,
}

#[wasm_bindgen]
impl LoveNoteDemo {
    /// Create a new demo instance with the built-in lexicon.
    #[wasm_bindgen(constructor)]
    pub fn new(seed: u64) -> Result<LoveNoteDemo, JsError> {
        let generator = MessageGenerator::builder()
            .seed(seed)
            .build()
            .map_err(|e| JsError::new(&format!("Generator build error: {e}")))?;
        Ok(LoveNoteDemo { generator })
    }

    /// Generate one message. Returns `{"message": ..., "quality": ...}`.
    pub fn generate(&mut self, options_json: &str) -> Result<String, JsError> {
        let opts = parse_options(options_json)?;
        to_json(&self.generator.generate(&opts))
    }

    /// Generate up to `count` distinct messages. Returns a JSON array.
    pub fn generate_batch(&mut self, options_json: &str, count: usize) -> Result<String, JsError> {
        let opts = parse_options(options_json)?;
        to_json(&self.generator.generate_batch(count, &opts))
    }

    pub fn set_language(&mut self, code: &str) -> Result<(), JsError> {
        self.generator
            .set_language(code)
            .map_err(|e| JsError::new(&e.to_string()))
    }

    pub fn current_language(&self) -> String {
        self.generator.current_language().code().to_string()
    }

    /// Return the analytics snapshot as JSON.
    pub fn analytics(&self) -> Result<String, JsError> {
        to_json(&self.generator.analytics_snapshot())
    }

    /// Return the messages sent to `name` as JSON. `"*"` lists everyone.
    pub fn history(&self, name: &str) -> Result<String, JsError> {
        to_json(&self.generator.recipient_history(name))
    }

    pub fn export_state(&self) -> Result<String, JsError> {
        to_json(&self.generator.export_state())
    }

    /// Return JSON array of recent failures that produced the fallback message.
    pub fn recent_errors(&self) -> Result<String, JsError> {
        to_json(&self.generator.recent_errors())
    }

    /// Return JSON array of occasion names.
    pub fn occasions(&self) -> Result<String, JsError> {
        to_json(&self.generator.occasions().names())
    }

    /// Return JSON array of supported language codes.
    pub fn languages() -> String {
        let codes: Vec<&str> = Language::ALL.iter().map(|l| l.code()).collect();
        serde_json::to_string(&codes).unwrap_or_else(|_| "[]".to_string())
    }

    /// Clear cache, history, and analytics.
    pub fn reset(&mut self) {
        self.generator.reset();
    }

    /// Rebuild the generator with a new seed. All state is cleared.
    pub fn reseed(&mut self, seed: u64) -> Result<(), JsError> {
        let language = self.generator.current_language();
        let mut fresh = LoveNoteDemo::new(seed)?;
        fresh.set_language(language.code())?;
        self.generator = fresh.generator;
        Ok(())
    }
}
