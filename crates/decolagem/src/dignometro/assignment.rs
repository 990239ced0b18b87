use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::catalog::GoalPriority;
use super::dimension::Dimension;
use super::domain::FamilyId;
use super::recommendations::{Recommendation, RecommendationStatus};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GoalAssignmentId(pub String);

impl GoalAssignmentId {
    pub fn generate() -> Self {
        Self(format!("goal-{}", Uuid::new_v4().simple()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalStatus {
    Pendente,
    EmAndamento,
    Concluida,
}

impl GoalStatus {
    pub const fn label(self) -> &'static str {
        match self {
            GoalStatus::Pendente => "pendente",
            GoalStatus::EmAndamento => "em_andamento",
            GoalStatus::Concluida => "concluida",
        }
    }

    fn from_progress(progress: u8) -> Self {
        match progress {
            0 => GoalStatus::Pendente,
            100 => GoalStatus::Concluida,
            _ => GoalStatus::EmAndamento,
        }
    }
}

/// Goal accepted by a mentor and persisted for the family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalAssignment {
    pub id: GoalAssignmentId,
    pub family_id: FamilyId,
    pub template_id: String,
    pub dimension: Dimension,
    pub title: String,
    pub priority: GoalPriority,
    pub target_date: NaiveDate,
    pub status: GoalStatus,
    pub progress: u8,
    pub created_at: DateTime<Utc>,
}

impl GoalAssignment {
    /// Clamp to 0..=100 and derive the status from the new value.
    pub fn record_progress(&mut self, progress: u8) {
        self.progress = progress.min(100);
        self.status = GoalStatus::from_progress(self.progress);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LifecycleError {
    #[error("recommendation cannot move from {from} to {to}")]
    InvalidTransition {
        from: &'static str,
        to: &'static str,
    },
}

impl Recommendation {
    pub fn select(&mut self) -> Result<(), LifecycleError> {
        self.transition(RecommendationStatus::Selected)
    }

    pub fn reject(&mut self) -> Result<(), LifecycleError> {
        self.transition(RecommendationStatus::Rejected)
    }

    /// Turn a selected recommendation into a goal assignment carrying the same
    /// dimension and template.
    pub fn into_assignment(
        self,
        target_date: NaiveDate,
        created_at: DateTime<Utc>,
    ) -> Result<GoalAssignment, LifecycleError> {
        if self.status != RecommendationStatus::Selected {
            return Err(LifecycleError::InvalidTransition {
                from: self.status.label(),
                to: "assigned",
            });
        }

        Ok(GoalAssignment {
            id: GoalAssignmentId::generate(),
            family_id: self.family_id,
            template_id: self.template.id,
            dimension: self.dimension,
            title: self.template.title,
            priority: self.template.priority,
            target_date,
            status: GoalStatus::Pendente,
            progress: 0,
            created_at,
        })
    }

    fn transition(&mut self, to: RecommendationStatus) -> Result<(), LifecycleError> {
        if self.status != RecommendationStatus::PendingSelection {
            return Err(LifecycleError::InvalidTransition {
                from: self.status.label(),
                to: to.label(),
            });
        }
        self.status = to;
        Ok(())
    }
}
