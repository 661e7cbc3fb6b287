//! Game template catalog.
//!
//! A [`Catalog`] is an immutable, validated set of game templates keyed
//! by id. Templates are defined in code (see [`builtin`]) or loaded
//! from TOML files, and every template passes its integrity checks
//! before the catalog is handed out. Engines hold the catalog behind an
//! `Arc` and look templates up per play.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::credits::Credits;
use crate::error::{Error, Result};

pub mod builtin;
pub mod scratch;
pub mod slots;
pub mod wheel;

pub use builtin::builtin;
pub use scratch::{ScratchKind, ScratchPrize, ScratchTemplate};
pub use slots::{PayRule, Payline, SlotSymbol, SlotTemplate};
pub use wheel::{WheelFeatures, WheelSegment, WheelTemplate};

/// Probability tables must sum to 1.0 within this tolerance.
pub const PROBABILITY_TOLERANCE: f64 = 1e-6;

/// Check a probability table: each entry in `[0, 1]`, total within
/// [`PROBABILITY_TOLERANCE`] of 1.0.
pub(crate) fn validate_probability_sum(template_id: &str, probabilities: &[f64]) -> Result<()> {
    for &p in probabilities {
        if !p.is_finite() || !(0.0..=1.0).contains(&p) {
            return Err(Error::CatalogIntegrity(format!(
                "template '{}' has probability {} outside [0, 1]",
                template_id, p
            )));
        }
    }
    let sum: f64 = probabilities.iter().sum();
    if (sum - 1.0).abs() > PROBABILITY_TOLERANCE {
        return Err(Error::CatalogIntegrity(format!(
            "template '{}' probabilities sum to {}, expected 1.0",
            template_id, sum
        )));
    }
    Ok(())
}

/// Which game a template drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameKind {
    Scratch,
    Slots,
    Wheel,
}

impl std::fmt::Display for GameKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameKind::Scratch => write!(f, "scratch"),
            GameKind::Slots => write!(f, "slots"),
            GameKind::Wheel => write!(f, "wheel"),
        }
    }
}

/// A single game template of any family.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "game", rename_all = "snake_case")]
pub enum Template {
    Scratch(ScratchTemplate),
    Slots(SlotTemplate),
    Wheel(WheelTemplate),
}

impl Template {
    pub fn id(&self) -> &str {
        match self {
            Template::Scratch(t) => &t.id,
            Template::Slots(t) => &t.id,
            Template::Wheel(t) => &t.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Template::Scratch(t) => &t.name,
            Template::Slots(t) => &t.name,
            Template::Wheel(t) => &t.name,
        }
    }

    pub fn cost(&self) -> Credits {
        match self {
            Template::Scratch(t) => t.cost,
            Template::Slots(t) => t.cost,
            Template::Wheel(t) => t.cost,
        }
    }

    pub fn theme(&self) -> &str {
        match self {
            Template::Scratch(t) => &t.theme,
            Template::Slots(t) => &t.theme,
            Template::Wheel(t) => &t.theme,
        }
    }

    pub fn kind(&self) -> GameKind {
        match self {
            Template::Scratch(_) => GameKind::Scratch,
            Template::Slots(_) => GameKind::Slots,
            Template::Wheel(_) => GameKind::Wheel,
        }
    }

    /// Run the family-specific integrity checks.
    pub fn validate(&self) -> Result<()> {
        match self {
            Template::Scratch(t) => t.validate(),
            Template::Slots(t) => t.validate(),
            Template::Wheel(t) => t.validate(),
        }
    }
}

/// One row of a catalog listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateSummary {
    pub id: String,
    pub name: String,
    pub game: GameKind,
    pub cost: Credits,
    pub theme: String,
}

/// Validated, immutable set of templates.
#[derive(Debug, Clone)]
pub struct Catalog {
    templates: HashMap<String, Template>,
}

impl Catalog {
    /// Look up a template by id.
    pub fn get(&self, template_id: &str) -> Result<&Template> {
        self.templates
            .get(template_id)
            .ok_or_else(|| Error::UnknownTemplate(template_id.to_string()))
    }

    /// Look up a scratch-card template, rejecting other families.
    pub fn scratch(&self, template_id: &str) -> Result<&ScratchTemplate> {
        match self.get(template_id)? {
            Template::Scratch(t) => Ok(t),
            _ => Err(Error::UnknownTemplate(format!(
                "{} (not a scratch template)",
                template_id
            ))),
        }
    }

    /// Look up a slot-machine template, rejecting other families.
    pub fn slots(&self, template_id: &str) -> Result<&SlotTemplate> {
        match self.get(template_id)? {
            Template::Slots(t) => Ok(t),
            _ => Err(Error::UnknownTemplate(format!(
                "{} (not a slots template)",
                template_id
            ))),
        }
    }

    /// Look up a wheel template, rejecting other families.
    pub fn wheel(&self, template_id: &str) -> Result<&WheelTemplate> {
        match self.get(template_id)? {
            Template::Wheel(t) => Ok(t),
            _ => Err(Error::UnknownTemplate(format!(
                "{} (not a wheel template)",
                template_id
            ))),
        }
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Summaries of every template, sorted by id for stable listings.
    pub fn summaries(&self) -> Vec<TemplateSummary> {
        let mut rows: Vec<TemplateSummary> = self
            .templates
            .values()
            .map(|t| TemplateSummary {
                id: t.id().to_string(),
                name: t.name().to_string(),
                game: t.kind(),
                cost: t.cost(),
                theme: t.theme().to_string(),
            })
            .collect();
        rows.sort_by(|a, b| a.id.cmp(&b.id));
        rows
    }

    pub fn template_ids(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(|k| k.as_str())
    }
}

/// Accumulates templates, then validates the whole set at once.
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    templates: Vec<Template>,
}

impl CatalogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn template(mut self, template: Template) -> Self {
        self.templates.push(template);
        self
    }

    pub fn scratch(self, template: ScratchTemplate) -> Self {
        self.template(Template::Scratch(template))
    }

    pub fn slots(self, template: SlotTemplate) -> Self {
        self.template(Template::Slots(template))
    }

    pub fn wheel(self, template: WheelTemplate) -> Self {
        self.template(Template::Wheel(template))
    }

    /// Validate every template and reject duplicate ids.
    pub fn build(self) -> Result<Catalog> {
        let mut templates = HashMap::with_capacity(self.templates.len());
        for template in self.templates {
            template.validate()?;
            let id = template.id().to_string();
            if templates.insert(id.clone(), template).is_some() {
                return Err(Error::CatalogIntegrity(format!(
                    "duplicate template id '{}'",
                    id
                )));
            }
        }
        info!("Built game catalog with {} templates", templates.len());
        Ok(Catalog { templates })
    }
}

/// On-disk catalog layout: a list of `[[template]]` tables.
#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    template: Vec<Template>,
}

impl Catalog {
    /// Load and validate a catalog from a TOML file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Catalog> {
        let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            Error::Config(format!(
                "failed to read catalog file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        Self::load_from_str(&contents)
    }

    /// Parse and validate a catalog from TOML text.
    pub fn load_from_str(contents: &str) -> Result<Catalog> {
        let file: CatalogFile = toml::from_str(contents)
            .map_err(|e| Error::Config(format!("failed to parse catalog: {}", e)))?;
        let mut builder = CatalogBuilder::new();
        for template in file.template {
            builder = builder.template(template);
        }
        builder.build()
    }
}
