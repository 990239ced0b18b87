//! Dignômetro: multidimensional poverty scoring and goal recommendations.
//!
//! Answers flow through [`score`] for the poverty level and through
//! [`diff_vulnerabilities`] for the dimensions that newly became vulnerable.
//! Those dimensions are turned into goal suggestions by
//! [`RecommendationGenerator`] and filtered against already assigned goals by
//! [`deduplicate`]. The engine functions are pure; [`DignometroService`] wires
//! them to the assessment and goal stores.

mod answers;
mod assignment;
pub mod catalog;
mod dedup;
mod diff;
mod dimension;
mod domain;
mod recommendations;
pub mod repository;
pub mod router;
mod scoring;
pub mod service;
mod validation;

#[cfg(test)]
mod tests;

pub use answers::AnswerSet;
pub use assignment::{GoalAssignment, GoalAssignmentId, GoalStatus, LifecycleError};
pub use catalog::{
    resolve_catalog, CatalogError, CatalogSource, GoalCatalogLoader, GoalPriority, GoalTemplate,
    GoalTemplateCatalog, ResolvedCatalog, SpreadsheetCatalog,
};
pub use dedup::deduplicate;
pub use diff::{diff_vulnerabilities, VulnerabilityDiff};
pub use dimension::Dimension;
pub use domain::{Assessment, AssessmentId, FamilyId};
pub use recommendations::{
    generate_recommendations, Recommendation, RecommendationGenerator, RecommendationIdStrategy,
    RecommendationStatus, RecommendationsByDimension,
};
pub use repository::{AssessmentRepository, GoalAssignmentRepository, RepositoryError};
pub use router::dignometro_router;
pub use scoring::{score, PovertyLevel, ScoreResult};
pub use service::{
    AcceptRecommendation, AssessmentOutcome, DignometroService, DignometroServiceError,
    RecommendationPolicy, ScoreHistoryEntry,
};
pub use validation::ValidationError;
