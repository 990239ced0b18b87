mod fallback;
mod normalizer;
mod sheet;

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::dimension::Dimension;

pub use sheet::SpreadsheetCatalog;

/// Urgency tier attached to every goal template, most severe first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalPriority {
    Critical,
    High,
    Medium,
    Low,
}

impl GoalPriority {
    pub const fn label(self) -> &'static str {
        match self {
            GoalPriority::Critical => "critical",
            GoalPriority::High => "high",
            GoalPriority::Medium => "medium",
            GoalPriority::Low => "low",
        }
    }
}

impl FromStr for GoalPriority {
    type Err = String;

    /// Accepts the English tiers and the Portuguese labels used in the
    /// mentoring spreadsheets.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match normalizer::normalize_token(value).as_str() {
            "critical" | "critica" => Ok(GoalPriority::Critical),
            "high" | "alta" => Ok(GoalPriority::High),
            "medium" | "media" => Ok(GoalPriority::Medium),
            "low" | "baixa" => Ok(GoalPriority::Low),
            _ => Err(format!("unknown priority '{value}'")),
        }
    }
}

/// A goal that can be suggested for a vulnerable dimension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalTemplate {
    pub id: String,
    pub dimension: Dimension,
    pub title: String,
    pub question: String,
    pub priority: GoalPriority,
}

/// Where a catalog came from; recommendations carry it as provenance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogSource {
    Bundled,
    Spreadsheet,
}

/// Immutable goal templates grouped by dimension. Within a dimension the
/// order given at construction is kept and is read as priority order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GoalTemplateCatalog {
    templates: BTreeMap<Dimension, Vec<GoalTemplate>>,
}

impl GoalTemplateCatalog {
    /// The table shipped with the service.
    pub fn bundled() -> Self {
        Self::from_templates(fallback::bundled_templates())
    }

    pub fn from_templates<I>(templates: I) -> Self
    where
        I: IntoIterator<Item = GoalTemplate>,
    {
        let mut grouped: BTreeMap<Dimension, Vec<GoalTemplate>> = BTreeMap::new();
        for template in templates {
            grouped.entry(template.dimension).or_default().push(template);
        }
        Self { templates: grouped }
    }

    pub fn templates_for(&self, dimension: Dimension) -> &[GoalTemplate] {
        self.templates
            .get(&dimension)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Every template, dimensions in catalog order.
    pub fn templates(&self) -> impl Iterator<Item = &GoalTemplate> + '_ {
        self.templates.values().flatten()
    }

    pub fn find(&self, template_id: &str) -> Option<&GoalTemplate> {
        self.templates()
            .find(|template| template.id == template_id)
    }

    pub fn len(&self) -> usize {
        self.templates.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Catalog paired with its provenance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedCatalog {
    pub catalog: GoalTemplateCatalog,
    pub source: CatalogSource,
}

impl ResolvedCatalog {
    pub fn bundled() -> Self {
        Self {
            catalog: GoalTemplateCatalog::bundled(),
            source: CatalogSource::Bundled,
        }
    }
}

/// External goal catalog, loaded once at startup.
pub trait GoalCatalogLoader: Send + Sync {
    fn source(&self) -> CatalogSource;
    fn load(&self) -> Result<GoalTemplateCatalog, CatalogError>;
}

/// Use the external catalog when it loads with at least one template,
/// otherwise fall back to the bundled table.
pub fn resolve_catalog(loader: Option<&dyn GoalCatalogLoader>) -> ResolvedCatalog {
    let Some(loader) = loader else {
        debug!("no external goal catalog configured; using bundled templates");
        return ResolvedCatalog::bundled();
    };

    match loader.load() {
        Ok(catalog) if !catalog.is_empty() => {
            debug!(templates = catalog.len(), "loaded external goal catalog");
            ResolvedCatalog {
                catalog,
                source: loader.source(),
            }
        }
        Ok(_) => {
            warn!("external goal catalog is empty; using bundled templates");
            ResolvedCatalog::bundled()
        }
        Err(err) => {
            warn!(error = %err, "external goal catalog unavailable; using bundled templates");
            ResolvedCatalog::bundled()
        }
    }
}

#[derive(Debug)]
pub enum CatalogError {
    Io(std::io::Error),
    Csv(csv::Error),
    Row { line: u64, message: String },
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::Io(err) => write!(f, "failed to read goal catalog: {}", err),
            CatalogError::Csv(err) => write!(f, "invalid goal catalog CSV: {}", err),
            CatalogError::Row { line, message } => {
                write!(f, "goal catalog row {}: {}", line, message)
            }
        }
    }
}

impl std::error::Error for CatalogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CatalogError::Io(err) => Some(err),
            CatalogError::Csv(err) => Some(err),
            CatalogError::Row { .. } => None,
        }
    }
}

impl From<std::io::Error> for CatalogError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for CatalogError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}
