use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde_json::{json, Value};

use crate::dignometro::assignment::{GoalAssignment, GoalAssignmentId};
use crate::dignometro::catalog::ResolvedCatalog;
use crate::dignometro::domain::{Assessment, FamilyId};
use crate::dignometro::repository::{
    AssessmentRepository, GoalAssignmentRepository, RepositoryError,
};
use crate::dignometro::service::{DignometroService, RecommendationPolicy};
use crate::dignometro::{dignometro_router, RecommendationIdStrategy};

pub(super) const FAMILY: &str = "fam-001";

pub(super) fn all_answers(value: bool) -> Value {
    json!({
        "agua": value,
        "saneamento": value,
        "educacao": value,
        "saude": value,
        "moradia": value,
        "alimentacao": value,
        "renda_estavel": value,
        "renda_diversificada": value,
        "poupanca": value,
        "bens_conectividade": value,
    })
}

pub(super) fn at(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, day, 14, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn target_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 9, 30).expect("valid date")
}

pub(super) fn policy(max_per_dimension: Option<usize>) -> RecommendationPolicy {
    RecommendationPolicy {
        max_per_dimension,
        ids: RecommendationIdStrategy::ContentHash,
    }
}

pub(super) type MemoryService = DignometroService<MemoryAssessments, MemoryGoals>;

pub(super) fn build_service(
    max_per_dimension: Option<usize>,
) -> (MemoryService, Arc<MemoryAssessments>, Arc<MemoryGoals>) {
    let assessments = Arc::new(MemoryAssessments::default());
    let goals = Arc::new(MemoryGoals::default());
    let service = DignometroService::new(
        assessments.clone(),
        goals.clone(),
        ResolvedCatalog::bundled(),
        policy(max_per_dimension),
    );
    (service, assessments, goals)
}

pub(super) fn router_with_service(service: MemoryService) -> axum::Router {
    dignometro_router(Arc::new(service))
}

#[derive(Default, Clone)]
pub(super) struct MemoryAssessments {
    records: Arc<Mutex<HashMap<FamilyId, Vec<Assessment>>>>,
}

impl MemoryAssessments {
    pub(super) fn count(&self, family_id: &FamilyId) -> usize {
        self.records
            .lock()
            .expect("assessment mutex poisoned")
            .get(family_id)
            .map(Vec::len)
            .unwrap_or(0)
    }
}

impl AssessmentRepository for MemoryAssessments {
    fn append(&self, assessment: Assessment) -> Result<Assessment, RepositoryError> {
        let mut guard = self.records.lock().expect("assessment mutex poisoned");
        guard
            .entry(assessment.family_id.clone())
            .or_default()
            .push(assessment.clone());
        Ok(assessment)
    }

    fn latest(&self, family_id: &FamilyId) -> Result<Option<Assessment>, RepositoryError> {
        let guard = self.records.lock().expect("assessment mutex poisoned");
        Ok(guard.get(family_id).and_then(|history| {
            history
                .iter()
                .max_by_key(|assessment| assessment.submitted_at)
                .cloned()
        }))
    }

    fn history(&self, family_id: &FamilyId) -> Result<Vec<Assessment>, RepositoryError> {
        let guard = self.records.lock().expect("assessment mutex poisoned");
        Ok(guard.get(family_id).cloned().unwrap_or_default())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryGoals {
    records: Arc<Mutex<Vec<GoalAssignment>>>,
}

impl MemoryGoals {
    pub(super) fn seed(&self, assignment: GoalAssignment) {
        self.records
            .lock()
            .expect("goal mutex poisoned")
            .push(assignment);
    }
}

impl GoalAssignmentRepository for MemoryGoals {
    fn insert(&self, assignment: GoalAssignment) -> Result<GoalAssignment, RepositoryError> {
        let mut guard = self.records.lock().expect("goal mutex poisoned");
        if guard.iter().any(|existing| {
            existing.id == assignment.id
                || (existing.family_id == assignment.family_id
                    && existing.template_id == assignment.template_id)
        }) {
            return Err(RepositoryError::Conflict);
        }
        guard.push(assignment.clone());
        Ok(assignment)
    }

    fn update(&self, assignment: GoalAssignment) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("goal mutex poisoned");
        match guard.iter_mut().find(|existing| existing.id == assignment.id) {
            Some(existing) => {
                *existing = assignment;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn fetch(
        &self,
        family_id: &FamilyId,
        id: &GoalAssignmentId,
    ) -> Result<Option<GoalAssignment>, RepositoryError> {
        let guard = self.records.lock().expect("goal mutex poisoned");
        Ok(guard
            .iter()
            .find(|assignment| &assignment.family_id == family_id && &assignment.id == id)
            .cloned())
    }

    fn list(&self, family_id: &FamilyId) -> Result<Vec<GoalAssignment>, RepositoryError> {
        let guard = self.records.lock().expect("goal mutex poisoned");
        Ok(guard
            .iter()
            .filter(|assignment| &assignment.family_id == family_id)
            .cloned()
            .collect())
    }
}

/// Every read and write fails, as when the hosted database is offline.
pub(super) struct OfflineStore;

impl AssessmentRepository for OfflineStore {
    fn append(&self, _assessment: Assessment) -> Result<Assessment, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn latest(&self, _family_id: &FamilyId) -> Result<Option<Assessment>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn history(&self, _family_id: &FamilyId) -> Result<Vec<Assessment>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

impl GoalAssignmentRepository for OfflineStore {
    fn insert(&self, _assignment: GoalAssignment) -> Result<GoalAssignment, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _assignment: GoalAssignment) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(
        &self,
        _family_id: &FamilyId,
        _id: &GoalAssignmentId,
    ) -> Result<Option<GoalAssignment>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list(&self, _family_id: &FamilyId) -> Result<Vec<GoalAssignment>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

/// Assessment reads fail but writes succeed.
#[derive(Default)]
pub(super) struct FlakyAssessments {
    inner: MemoryAssessments,
}

impl AssessmentRepository for FlakyAssessments {
    fn append(&self, assessment: Assessment) -> Result<Assessment, RepositoryError> {
        self.inner.append(assessment)
    }

    fn latest(&self, _family_id: &FamilyId) -> Result<Option<Assessment>, RepositoryError> {
        Err(RepositoryError::Unavailable("read replica lagging".to_string()))
    }

    fn latest_before(
        &self,
        _family_id: &FamilyId,
        _before: DateTime<Utc>,
    ) -> Result<Option<Assessment>, RepositoryError> {
        Err(RepositoryError::Unavailable("read replica lagging".to_string()))
    }

    fn history(&self, family_id: &FamilyId) -> Result<Vec<Assessment>, RepositoryError> {
        self.inner.history(family_id)
    }
}

/// Goal store whose assignment reads lag behind its writes, so the service's
/// duplicate check always sees an empty set and only `insert` can refuse.
#[derive(Default)]
pub(super) struct LaggingGoals {
    pub(super) inner: MemoryGoals,
}

impl GoalAssignmentRepository for LaggingGoals {
    fn insert(&self, assignment: GoalAssignment) -> Result<GoalAssignment, RepositoryError> {
        self.inner.insert(assignment)
    }

    fn update(&self, assignment: GoalAssignment) -> Result<(), RepositoryError> {
        self.inner.update(assignment)
    }

    fn fetch(
        &self,
        family_id: &FamilyId,
        id: &GoalAssignmentId,
    ) -> Result<Option<GoalAssignment>, RepositoryError> {
        self.inner.fetch(family_id, id)
    }

    fn list(&self, family_id: &FamilyId) -> Result<Vec<GoalAssignment>, RepositoryError> {
        self.inner.list(family_id)
    }

    fn assigned_template_ids(
        &self,
        _family_id: &FamilyId,
    ) -> Result<HashSet<String>, RepositoryError> {
        Ok(HashSet::new())
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
