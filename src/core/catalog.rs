/// Template catalog and occasion table: the fixed, read-only lookup data.

use rustc_hash::FxHashMap;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

use crate::core::pattern::PatternError;
use crate::schema::occasion::{Intensity, Occasion};
use crate::schema::template::{Applicability, Category, Template, TemplateId};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("template {id}: {source}")]
    Pattern { id: u32, source: PatternError },
    #[error("duplicate template id {0}")]
    DuplicateTemplate(u32),
    #[error("duplicate occasion '{0}'")]
    DuplicateOccasion(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
}

mod data {
    pub const TEMPLATES: &str = include_str!("../../lexicon/templates.ron");
    pub const OCCASIONS: &str = include_str!("../../lexicon/occasions.ron");
}

// The RON format flattens applicability into the template entry.
#[derive(Debug, Deserialize)]
struct RonTemplate {
    id: u32,
    text: String,
    category: Category,
    intensity: Intensity,
    #[serde(default)]
    occasions: Vec<String>,
    #[serde(default)]
    intensities: Vec<Intensity>,
}

/// Ordered list of message templates.
#[derive(Debug, Clone, Default)]
pub struct TemplateCatalog {
    templates: Vec<Template>,
}

impl TemplateCatalog {
    pub fn new(templates: Vec<Template>) -> Result<TemplateCatalog, CatalogError> {
        let mut seen = Vec::with_capacity(templates.len());
        for t in &templates {
            if seen.contains(&t.id) {
                return Err(CatalogError::DuplicateTemplate(t.id.0));
            }
            seen.push(t.id);
        }
        Ok(TemplateCatalog { templates })
    }

    pub fn parse_ron(input: &str) -> Result<TemplateCatalog, CatalogError> {
        let raw: Vec<RonTemplate> = ron::from_str(input)?;
        let mut templates = Vec::with_capacity(raw.len());
        for entry in raw {
            let applies_to = Applicability {
                occasions: entry.occasions,
                intensities: entry.intensities,
            };
            let template = Template::new(
                entry.id,
                &entry.text,
                entry.category,
                entry.intensity,
                applies_to,
            )
            .map_err(|source| CatalogError::Pattern {
                id: entry.id,
                source,
            })?;
            templates.push(template);
        }
        Self::new(templates)
    }

    pub fn load_from_ron(path: &Path) -> Result<TemplateCatalog, CatalogError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse_ron(&contents)
    }

    /// The catalog compiled into the binary.
    pub fn builtin() -> Result<TemplateCatalog, CatalogError> {
        Self::parse_ron(data::TEMPLATES)
    }

    pub fn all(&self) -> &[Template] {
        &self.templates
    }

    pub fn get(&self, id: TemplateId) -> Option<&Template> {
        self.templates.iter().find(|t| t.id == id)
    }

    /// Templates that serve `occasion` at `intensity`, in catalog order.
    pub fn applicable(&self, occasion: &Occasion, intensity: Intensity) -> Vec<&Template> {
        self.templates
            .iter()
            .filter(|t| t.serves(occasion, intensity))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

/// Occasion name → occasion settings.
#[derive(Debug, Clone, Default)]
pub struct OccasionTable {
    occasions: FxHashMap<String, Occasion>,
    /// Names in definition order.
    order: Vec<String>,
}

impl OccasionTable {
    pub fn new(occasions: Vec<Occasion>) -> Result<OccasionTable, CatalogError> {
        let mut table = OccasionTable::default();
        for occasion in occasions {
            if table.occasions.contains_key(&occasion.name) {
                return Err(CatalogError::DuplicateOccasion(occasion.name));
            }
            table.order.push(occasion.name.clone());
            table.occasions.insert(occasion.name.clone(), occasion);
        }
        Ok(table)
    }

    pub fn parse_ron(input: &str) -> Result<OccasionTable, CatalogError> {
        let raw: Vec<Occasion> = ron::from_str(input)?;
        Self::new(raw)
    }

    pub fn load_from_ron(path: &Path) -> Result<OccasionTable, CatalogError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse_ron(&contents)
    }

    pub fn builtin() -> Result<OccasionTable, CatalogError> {
        Self::parse_ron(data::OCCASIONS)
    }

    pub fn get(&self, name: &str) -> Option<&Occasion> {
        self.occasions.get(name)
    }

    /// Occasions in definition order.
    pub fn iter(&self) -> impl Iterator<Item = &Occasion> + '_ {
        self.order.iter().filter_map(|name| self.occasions.get(name))
    }

    pub fn names(&self) -> &[String] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
