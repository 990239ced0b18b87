use decolagem::config::DignometroConfig;
use decolagem::dignometro::{
    resolve_catalog, Assessment, AssessmentRepository, FamilyId, GoalAssignment,
    GoalAssignmentId, GoalAssignmentRepository, GoalCatalogLoader, RepositoryError,
    ResolvedCatalog, SpreadsheetCatalog,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Spreadsheet catalog when configured, bundled table otherwise.
pub(crate) fn load_catalog(config: &DignometroConfig) -> ResolvedCatalog {
    match &config.catalog_csv {
        Some(path) => {
            let loader = SpreadsheetCatalog::new(path);
            resolve_catalog(Some(&loader as &dyn GoalCatalogLoader))
        }
        None => resolve_catalog(None),
    }
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, RepositoryError> {
    mutex
        .lock()
        .map_err(|_| RepositoryError::Unavailable("in-memory store lock poisoned".to_string()))
}

/// Assessment history kept per family in submission order.
#[derive(Default, Clone)]
pub(crate) struct InMemoryAssessmentRepository {
    records: Arc<Mutex<HashMap<FamilyId, Vec<Assessment>>>>,
}

impl AssessmentRepository for InMemoryAssessmentRepository {
    fn append(&self, assessment: Assessment) -> Result<Assessment, RepositoryError> {
        let mut guard = lock(&self.records)?;
        let history = guard.entry(assessment.family_id.clone()).or_default();
        if history.iter().any(|existing| existing.id == assessment.id) {
            return Err(RepositoryError::Conflict);
        }
        history.push(assessment.clone());
        Ok(assessment)
    }

    fn latest(&self, family_id: &FamilyId) -> Result<Option<Assessment>, RepositoryError> {
        let guard = lock(&self.records)?;
        Ok(guard
            .get(family_id)
            .and_then(|history| history.iter().max_by_key(|assessment| assessment.submitted_at))
            .cloned())
    }

    fn history(&self, family_id: &FamilyId) -> Result<Vec<Assessment>, RepositoryError> {
        let guard = lock(&self.records)?;
        Ok(guard.get(family_id).cloned().unwrap_or_default())
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryGoalRepository {
    goals: Arc<Mutex<HashMap<GoalAssignmentId, GoalAssignment>>>,
}

impl GoalAssignmentRepository for InMemoryGoalRepository {
    fn insert(&self, assignment: GoalAssignment) -> Result<GoalAssignment, RepositoryError> {
        let mut guard = lock(&self.goals)?;
        let duplicate_template = guard.values().any(|existing| {
            existing.family_id == assignment.family_id
                && existing.template_id == assignment.template_id
        });
        if duplicate_template || guard.contains_key(&assignment.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(assignment.id.clone(), assignment.clone());
        Ok(assignment)
    }

    fn update(&self, assignment: GoalAssignment) -> Result<(), RepositoryError> {
        let mut guard = lock(&self.goals)?;
        if guard.contains_key(&assignment.id) {
            guard.insert(assignment.id.clone(), assignment);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch(
        &self,
        family_id: &FamilyId,
        id: &GoalAssignmentId,
    ) -> Result<Option<GoalAssignment>, RepositoryError> {
        let guard = lock(&self.goals)?;
        Ok(guard
            .get(id)
            .filter(|assignment| &assignment.family_id == family_id)
            .cloned())
    }

    fn list(&self, family_id: &FamilyId) -> Result<Vec<GoalAssignment>, RepositoryError> {
        let guard = lock(&self.goals)?;
        let mut goals: Vec<_> = guard
            .values()
            .filter(|assignment| &assignment.family_id == family_id)
            .cloned()
            .collect();
        goals.sort_by_key(|assignment| assignment.created_at);
        Ok(goals)
    }
}
