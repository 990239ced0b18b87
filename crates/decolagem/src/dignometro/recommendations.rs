use chrono::{DateTime, Utc};
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use super::catalog::{CatalogSource, GoalTemplate, GoalTemplateCatalog, ResolvedCatalog};
use super::dimension::Dimension;
use super::domain::FamilyId;

/// Lifecycle of a generated suggestion. Transitions happen only on mentor
/// action; see [`Recommendation::select`] and [`Recommendation::reject`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationStatus {
    PendingSelection,
    Selected,
    Rejected,
}

impl RecommendationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            RecommendationStatus::PendingSelection => "pending_selection",
            RecommendationStatus::Selected => "selected",
            RecommendationStatus::Rejected => "rejected",
        }
    }
}

/// Transient goal suggestion for one family and one vulnerable dimension.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub id: String,
    pub family_id: FamilyId,
    pub dimension: Dimension,
    pub template: GoalTemplate,
    pub source: CatalogSource,
    pub generated_at: DateTime<Utc>,
    pub status: RecommendationStatus,
}

impl Recommendation {
    pub fn template_id(&self) -> &str {
        &self.template.id
    }
}

/// How recommendation ids are minted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RecommendationIdStrategy {
    /// `<family>-<dimension>-<unix millis>-<random suffix>`; unique per call.
    #[default]
    Random,
    /// Hash of family, dimension, and template id; stable across calls.
    ContentHash,
}

impl RecommendationIdStrategy {
    pub fn mint(
        self,
        family_id: &FamilyId,
        template: &GoalTemplate,
        generated_at: DateTime<Utc>,
    ) -> String {
        match self {
            RecommendationIdStrategy::Random => {
                let suffix = Uuid::new_v4().simple().to_string();
                format!(
                    "{}-{}-{}-{}",
                    family_id,
                    template.dimension.key(),
                    generated_at.timestamp_millis(),
                    &suffix[..8]
                )
            }
            RecommendationIdStrategy::ContentHash => {
                let mut hasher = Sha256::new();
                hasher.update(family_id.as_str().as_bytes());
                hasher.update(b"|");
                hasher.update(template.dimension.key().as_bytes());
                hasher.update(b"|");
                hasher.update(template.id.as_bytes());
                let digest = hex::encode(hasher.finalize());
                format!("rec-{}", &digest[..16])
            }
        }
    }
}

/// Recommendations grouped by dimension, in insertion order of the
/// dimensions. Serializes as a JSON object keyed by dimension.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecommendationsByDimension {
    groups: Vec<(Dimension, Vec<Recommendation>)>,
}

impl RecommendationsByDimension {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends to an existing group or opens a new one at the end.
    pub fn push(&mut self, recommendation: Recommendation) {
        let dimension = recommendation.dimension;
        match self.group_mut(dimension) {
            Some(group) => group.push(recommendation),
            None => self.groups.push((dimension, vec![recommendation])),
        }
    }

    pub(crate) fn insert_group(&mut self, dimension: Dimension, recommendations: Vec<Recommendation>) {
        match self.group_mut(dimension) {
            Some(group) => group.extend(recommendations),
            None => self.groups.push((dimension, recommendations)),
        }
    }

    pub fn get(&self, dimension: Dimension) -> Option<&[Recommendation]> {
        self.groups
            .iter()
            .find(|(key, _)| *key == dimension)
            .map(|(_, group)| group.as_slice())
    }

    pub fn dimensions(&self) -> impl Iterator<Item = Dimension> + '_ {
        self.groups.iter().map(|(dimension, _)| *dimension)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Dimension, &[Recommendation])> + '_ {
        self.groups
            .iter()
            .map(|(dimension, group)| (*dimension, group.as_slice()))
    }

    pub fn recommendations(&self) -> impl Iterator<Item = &Recommendation> + '_ {
        self.groups.iter().flat_map(|(_, group)| group.iter())
    }

    pub fn total(&self) -> usize {
        self.groups.iter().map(|(_, group)| group.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn into_groups(self) -> Vec<(Dimension, Vec<Recommendation>)> {
        self.groups
    }

    fn group_mut(&mut self, dimension: Dimension) -> Option<&mut Vec<Recommendation>> {
        self.groups
            .iter_mut()
            .find(|(key, _)| *key == dimension)
            .map(|(_, group)| group)
    }
}

impl Serialize for RecommendationsByDimension {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.groups.len()))?;
        for (dimension, group) in &self.groups {
            map.serialize_entry(dimension.key(), group)?;
        }
        map.end()
    }
}

/// Maps vulnerable dimensions to goal suggestions from an injected catalog.
#[derive(Debug, Clone)]
pub struct RecommendationGenerator {
    catalog: ResolvedCatalog,
    ids: RecommendationIdStrategy,
}

impl RecommendationGenerator {
    pub fn new(catalog: ResolvedCatalog, ids: RecommendationIdStrategy) -> Self {
        Self { catalog, ids }
    }

    pub fn catalog(&self) -> &GoalTemplateCatalog {
        &self.catalog.catalog
    }

    pub fn source(&self) -> CatalogSource {
        self.catalog.source
    }

    /// One pending recommendation per template of each vulnerable dimension.
    /// Dimensions keep the order they were given in (repeats are dropped);
    /// templates keep catalog order. A dimension without templates yields an
    /// empty group.
    pub fn generate(
        &self,
        family_id: &FamilyId,
        vulnerable: &[Dimension],
        generated_at: DateTime<Utc>,
    ) -> RecommendationsByDimension {
        let mut grouped = RecommendationsByDimension::new();

        for dimension in vulnerable {
            if grouped.get(*dimension).is_some() {
                continue;
            }

            let recommendations = self
                .catalog
                .catalog
                .templates_for(*dimension)
                .iter()
                .map(|template| self.recommend(family_id, template, generated_at))
                .collect();
            grouped.insert_group(*dimension, recommendations);
        }

        grouped
    }

    /// Pending recommendation for a single template.
    pub fn recommend(
        &self,
        family_id: &FamilyId,
        template: &GoalTemplate,
        generated_at: DateTime<Utc>,
    ) -> Recommendation {
        Recommendation {
            id: self.ids.mint(family_id, template, generated_at),
            family_id: family_id.clone(),
            dimension: template.dimension,
            template: template.clone(),
            source: self.catalog.source,
            generated_at,
            status: RecommendationStatus::PendingSelection,
        }
    }
}

/// Generate with random ids at the current time from a bundled-provenance catalog.
pub fn generate_recommendations(
    family_id: &FamilyId,
    vulnerable: &[Dimension],
    catalog: &GoalTemplateCatalog,
) -> RecommendationsByDimension {
    let generator = RecommendationGenerator::new(
        ResolvedCatalog {
            catalog: catalog.clone(),
            source: CatalogSource::Bundled,
        },
        RecommendationIdStrategy::Random,
    );
    generator.generate(family_id, vulnerable, Utc::now())
}
