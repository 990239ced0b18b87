use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};
use uuid::Uuid;

use super::answers::AnswerSet;
use super::assignment::{GoalAssignment, GoalAssignmentId, LifecycleError};
use super::catalog::{CatalogSource, GoalTemplateCatalog, ResolvedCatalog};
use super::dedup::deduplicate;
use super::diff::{diff_vulnerabilities, VulnerabilityDiff};
use super::dimension::Dimension;
use super::domain::{Assessment, AssessmentId, FamilyId};
use super::recommendations::{
    RecommendationGenerator, RecommendationIdStrategy, RecommendationsByDimension,
};
use super::repository::{AssessmentRepository, GoalAssignmentRepository, RepositoryError};
use super::scoring::{score, ScoreResult};
use super::validation::ValidationError;
use crate::config::DignometroConfig;

/// Knobs applied when surfacing recommendations to a mentor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecommendationPolicy {
    pub max_per_dimension: Option<usize>,
    pub ids: RecommendationIdStrategy,
}

impl Default for RecommendationPolicy {
    fn default() -> Self {
        Self {
            max_per_dimension: Some(3),
            ids: RecommendationIdStrategy::Random,
        }
    }
}

impl From<&DignometroConfig> for RecommendationPolicy {
    fn from(config: &DignometroConfig) -> Self {
        Self {
            max_per_dimension: config.recommendations_per_dimension,
            ids: if config.stable_recommendation_ids {
                RecommendationIdStrategy::ContentHash
            } else {
                RecommendationIdStrategy::Random
            },
        }
    }
}

/// Result of recording a new questionnaire.
#[derive(Debug, Clone, Serialize)]
pub struct AssessmentOutcome {
    pub assessment: Assessment,
    pub score: ScoreResult,
    pub diff: VulnerabilityDiff,
    pub recommendations: RecommendationsByDimension,
}

/// One point on a family's score timeline.
#[derive(Debug, Clone, Serialize)]
pub struct ScoreHistoryEntry {
    pub assessment_id: AssessmentId,
    pub submitted_at: DateTime<Utc>,
    #[serde(flatten)]
    pub score: ScoreResult,
}

/// Mentor's acceptance of a suggested goal.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AcceptRecommendation {
    pub template_id: String,
    pub target_date: NaiveDate,
}

/// Service composing the scorer, differ, generator, and deduplicator with
/// the assessment and goal stores.
pub struct DignometroService<A, G> {
    assessments: Arc<A>,
    goals: Arc<G>,
    generator: Arc<RecommendationGenerator>,
    policy: RecommendationPolicy,
}

impl<A, G> DignometroService<A, G>
where
    A: AssessmentRepository + 'static,
    G: GoalAssignmentRepository + 'static,
{
    pub fn new(
        assessments: Arc<A>,
        goals: Arc<G>,
        catalog: ResolvedCatalog,
        policy: RecommendationPolicy,
    ) -> Self {
        let generator = Arc::new(RecommendationGenerator::new(catalog, policy.ids));
        Self {
            assessments,
            goals,
            generator,
            policy,
        }
    }

    pub fn catalog(&self) -> &GoalTemplateCatalog {
        self.generator.catalog()
    }

    pub fn catalog_source(&self) -> CatalogSource {
        self.generator.source()
    }

    pub fn policy(&self) -> RecommendationPolicy {
        self.policy
    }

    /// Validate and score answers without touching any store.
    pub fn score_answers(&self, raw: &Value) -> Result<ScoreResult, DignometroServiceError> {
        let answers = AnswerSet::from_json(raw)?;
        Ok(score(&answers))
    }

    /// Record a questionnaire and surface goals for newly vulnerable dimensions.
    pub fn submit_assessment(
        &self,
        family_id: &str,
        raw: &Value,
        submitted_at: DateTime<Utc>,
    ) -> Result<AssessmentOutcome, DignometroServiceError> {
        let family_id = FamilyId::parse(family_id)?;
        let answers = AnswerSet::from_json(raw)?;

        let previous = match self.assessments.latest_before(&family_id, submitted_at) {
            Ok(previous) => previous,
            Err(err) => {
                warn!(family = %family_id, error = %err, "previous assessment unavailable; diffing as first assessment");
                None
            }
        };

        let assessment = self.assessments.append(Assessment {
            id: AssessmentId(format!("asm-{}", Uuid::new_v4().simple())),
            family_id: family_id.clone(),
            answers,
            submitted_at,
        })?;

        let score = score(&assessment.answers);
        let diff = diff_vulnerabilities(
            &assessment.answers,
            previous.as_ref().map(|previous| &previous.answers),
        );
        let recommendations = self.surface(
            &family_id,
            &diff.vulnerable_dimensions,
            submitted_at,
            self.policy.max_per_dimension,
        );

        info!(
            family = %family_id,
            score = score.score,
            level = score.level.label(),
            newly_vulnerable = diff.vulnerable_dimensions.len(),
            recommendations = recommendations.total(),
            "assessment recorded"
        );

        Ok(AssessmentOutcome {
            assessment,
            score,
            diff,
            recommendations,
        })
    }

    /// Recommendations for every vulnerable dimension of the latest assessment.
    /// `cap` overrides the policy; `Some(0)` lifts the cap.
    pub fn current_recommendations(
        &self,
        family_id: &str,
        cap: Option<usize>,
    ) -> Result<RecommendationsByDimension, DignometroServiceError> {
        let family_id = FamilyId::parse(family_id)?;
        let latest = self
            .assessments
            .latest(&family_id)?
            .ok_or_else(|| DignometroServiceError::NoAssessment(family_id.to_string()))?;

        let diff = diff_vulnerabilities(&latest.answers, None);
        let cap = match cap {
            Some(0) => None,
            Some(cap) => Some(cap),
            None => self.policy.max_per_dimension,
        };

        Ok(self.surface(&family_id, &diff.vulnerable_dimensions, Utc::now(), cap))
    }

    /// Persist a mentor-selected goal. The template must exist in the catalog
    /// and must not already be assigned to the family.
    pub fn accept_recommendation(
        &self,
        family_id: &str,
        request: AcceptRecommendation,
    ) -> Result<GoalAssignment, DignometroServiceError> {
        let family_id = FamilyId::parse(family_id)?;
        let template = self
            .generator
            .catalog()
            .find(&request.template_id)
            .ok_or_else(|| DignometroServiceError::UnknownTemplate(request.template_id.clone()))?;

        let assigned = self.goals.assigned_template_ids(&family_id)?;
        if assigned.contains(&template.id) {
            return Err(DignometroServiceError::AlreadyAssigned(template.id.clone()));
        }

        let now = Utc::now();
        let mut recommendation = self.generator.recommend(&family_id, template, now);
        recommendation.select()?;
        let assignment = recommendation.into_assignment(request.target_date, now)?;
        let stored = match self.goals.insert(assignment) {
            Ok(stored) => stored,
            // Another accept for the same template won the race.
            Err(RepositoryError::Conflict) => {
                return Err(DignometroServiceError::AlreadyAssigned(template.id.clone()))
            }
            Err(err) => return Err(err.into()),
        };

        info!(
            family = %family_id,
            template = %stored.template_id,
            dimension = stored.dimension.key(),
            "goal assigned"
        );

        Ok(stored)
    }

    pub fn goal_assignments(
        &self,
        family_id: &str,
    ) -> Result<Vec<GoalAssignment>, DignometroServiceError> {
        let family_id = FamilyId::parse(family_id)?;
        Ok(self.goals.list(&family_id)?)
    }

    pub fn update_goal_progress(
        &self,
        family_id: &str,
        goal_id: &GoalAssignmentId,
        progress: u8,
    ) -> Result<GoalAssignment, DignometroServiceError> {
        let family_id = FamilyId::parse(family_id)?;
        let mut assignment = self
            .goals
            .fetch(&family_id, goal_id)?
            .ok_or_else(|| DignometroServiceError::GoalNotFound(goal_id.0.clone()))?;

        assignment.record_progress(progress);
        self.goals.update(assignment.clone())?;
        Ok(assignment)
    }

    /// Scores of every assessment, oldest first.
    pub fn score_history(
        &self,
        family_id: &str,
    ) -> Result<Vec<ScoreHistoryEntry>, DignometroServiceError> {
        let family_id = FamilyId::parse(family_id)?;
        let mut history = self.assessments.history(&family_id)?;
        history.sort_by_key(|assessment| assessment.submitted_at);

        Ok(history
            .into_iter()
            .map(|assessment| ScoreHistoryEntry {
                score: score(&assessment.answers),
                assessment_id: assessment.id,
                submitted_at: assessment.submitted_at,
            })
            .collect())
    }

    fn surface(
        &self,
        family_id: &FamilyId,
        vulnerable: &[Dimension],
        generated_at: DateTime<Utc>,
        cap: Option<usize>,
    ) -> RecommendationsByDimension {
        let existing = match self.goals.assigned_template_ids(family_id) {
            Ok(existing) => existing,
            Err(err) => {
                warn!(family = %family_id, error = %err, "goal assignments unavailable; skipping deduplication");
                HashSet::new()
            }
        };

        let generated = self.generator.generate(family_id, vulnerable, generated_at);
        deduplicate(generated, &existing, cap)
    }
}

/// Error raised by the Dignômetro service.
#[derive(Debug, thiserror::Error)]
pub enum DignometroServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error("family '{0}' has no assessment yet")]
    NoAssessment(String),
    #[error("unknown goal template '{0}'")]
    UnknownTemplate(String),
    #[error("goal template '{0}' is already assigned to this family")]
    AlreadyAssigned(String),
    #[error("goal '{0}' not found")]
    GoalNotFound(String),
}
