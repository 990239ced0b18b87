use std::collections::HashSet;

use chrono::{DateTime, Utc};

use super::assignment::{GoalAssignment, GoalAssignmentId};
use super::domain::{Assessment, FamilyId};

/// Append-only questionnaire history per family.
pub trait AssessmentRepository: Send + Sync {
    fn append(&self, assessment: Assessment) -> Result<Assessment, RepositoryError>;
    fn latest(&self, family_id: &FamilyId) -> Result<Option<Assessment>, RepositoryError>;
    fn history(&self, family_id: &FamilyId) -> Result<Vec<Assessment>, RepositoryError>;

    /// Most recent assessment submitted strictly before `before`. A backdated
    /// submission is compared with what preceded it, not with later records.
    fn latest_before(
        &self,
        family_id: &FamilyId,
        before: DateTime<Utc>,
    ) -> Result<Option<Assessment>, RepositoryError> {
        Ok(self
            .history(family_id)?
            .into_iter()
            .filter(|assessment| assessment.submitted_at < before)
            .max_by_key(|assessment| assessment.submitted_at))
    }
}

/// Store of goals accepted by mentors.
pub trait GoalAssignmentRepository: Send + Sync {
    /// Must fail with [`RepositoryError::Conflict`] when the id, or the
    /// family and template pair, is already stored. The check and the write
    /// happen atomically.
    fn insert(&self, assignment: GoalAssignment) -> Result<GoalAssignment, RepositoryError>;
    fn update(&self, assignment: GoalAssignment) -> Result<(), RepositoryError>;
    fn fetch(
        &self,
        family_id: &FamilyId,
        id: &GoalAssignmentId,
    ) -> Result<Option<GoalAssignment>, RepositoryError>;
    fn list(&self, family_id: &FamilyId) -> Result<Vec<GoalAssignment>, RepositoryError>;

    fn assigned_template_ids(&self, family_id: &FamilyId) -> Result<HashSet<String>, RepositoryError> {
        Ok(self
            .list(family_id)?
            .into_iter()
            .map(|assignment| assignment.template_id)
            .collect())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
