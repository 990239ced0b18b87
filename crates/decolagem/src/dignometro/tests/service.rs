use std::sync::Arc;

use super::common::*;
use crate::dignometro::catalog::ResolvedCatalog;
use crate::dignometro::domain::FamilyId;
use crate::dignometro::repository::{GoalAssignmentRepository, RepositoryError};
use crate::dignometro::service::{
    AcceptRecommendation, DignometroService, DignometroServiceError,
};
use crate::dignometro::{
    Dimension, GoalAssignmentId, GoalStatus, PovertyLevel, ValidationError,
};
use serde_json::json;

fn accept(template_id: &str) -> AcceptRecommendation {
    AcceptRecommendation {
        template_id: template_id.to_string(),
        target_date: target_date(),
    }
}

#[test]
fn first_submission_recommends_for_every_false_answer() {
    let (service, assessments, _) = build_service(Some(2));

    let outcome = service
        .submit_assessment(
            FAMILY,
            &json!({ "agua": false, "saude": true, "moradia": false }),
            at(1),
        )
        .expect("assessment recorded");

    assert_eq!(outcome.score.score, 3.3);
    assert_eq!(outcome.score.level, PovertyLevel::Pobreza);
    assert_eq!(
        outcome.diff.vulnerable_dimensions,
        vec![Dimension::Agua, Dimension::Moradia]
    );
    assert_eq!(
        outcome.recommendations.dimensions().collect::<Vec<_>>(),
        vec![Dimension::Agua, Dimension::Moradia]
    );
    assert_eq!(outcome.recommendations.total(), 4);
    assert_eq!(
        assessments.count(&FamilyId::parse(FAMILY).expect("family")),
        1
    );
}

#[test]
fn persistent_vulnerability_is_not_re_recommended_on_next_submission() {
    let (service, _, _) = build_service(None);

    service
        .submit_assessment(FAMILY, &json!({ "agua": false, "saude": true }), at(1))
        .expect("first assessment");
    let outcome = service
        .submit_assessment(FAMILY, &json!({ "agua": false, "saude": false }), at(8))
        .expect("second assessment");

    assert_eq!(outcome.diff.vulnerable_dimensions, vec![Dimension::Saude]);
    assert!(outcome.recommendations.get(Dimension::Agua).is_none());
    assert_eq!(
        outcome
            .recommendations
            .get(Dimension::Saude)
            .map(|group| group.len()),
        Some(3)
    );
}

#[test]
fn backdated_submission_is_diffed_against_the_assessment_before_it() {
    let (service, _, _) = build_service(None);

    service
        .submit_assessment(FAMILY, &json!({ "agua": true }), at(1))
        .expect("day 1");
    service
        .submit_assessment(FAMILY, &json!({ "agua": false }), at(20))
        .expect("day 20");
    let backdated = service
        .submit_assessment(FAMILY, &json!({ "agua": false }), at(10))
        .expect("day 10");

    assert_eq!(backdated.diff.vulnerable_dimensions, vec![Dimension::Agua]);
    assert_eq!(
        backdated
            .recommendations
            .get(Dimension::Agua)
            .map(|group| group.len()),
        Some(3)
    );
}

#[test]
fn submit_rejects_invalid_input_without_persisting() {
    let (service, assessments, _) = build_service(None);

    match service.submit_assessment("  ", &json!({ "agua": true }), at(1)) {
        Err(DignometroServiceError::Validation(ValidationError::MissingFamilyId)) => {}
        other => panic!("expected missing family id, got {other:?}"),
    }

    match service.submit_assessment(FAMILY, &json!({ "agua": "nao" }), at(1)) {
        Err(DignometroServiceError::Validation(ValidationError::NonBooleanAnswer {
            key, ..
        })) => assert_eq!(key, "agua"),
        other => panic!("expected non boolean answer, got {other:?}"),
    }

    assert_eq!(
        assessments.count(&FamilyId::parse(FAMILY).expect("family")),
        0
    );
}

#[test]
fn unavailable_previous_assessment_degrades_to_first_assessment() {
    let assessments = Arc::new(FlakyAssessments::default());
    let goals = Arc::new(MemoryGoals::default());
    let service = DignometroService::new(
        assessments,
        goals,
        ResolvedCatalog::bundled(),
        policy(None),
    );

    let outcome = service
        .submit_assessment(FAMILY, &json!({ "poupanca": false }), at(2))
        .expect("degrades instead of failing");

    assert_eq!(outcome.diff.vulnerable_dimensions, vec![Dimension::Poupanca]);
}

#[test]
fn unavailable_goal_store_skips_deduplication_but_write_failures_propagate() {
    let service = DignometroService::new(
        Arc::new(MemoryAssessments::default()),
        Arc::new(OfflineStore),
        ResolvedCatalog::bundled(),
        policy(None),
    );

    let outcome = service
        .submit_assessment(FAMILY, &json!({ "agua": false }), at(2))
        .expect("recommendations still generated");
    assert_eq!(outcome.recommendations.total(), 3);

    match service.accept_recommendation(FAMILY, accept("agua_1")) {
        Err(DignometroServiceError::Repository(RepositoryError::Unavailable(_))) => {}
        other => panic!("expected repository error, got {other:?}"),
    }

    let offline = DignometroService::new(
        Arc::new(OfflineStore),
        Arc::new(MemoryGoals::default()),
        ResolvedCatalog::bundled(),
        policy(None),
    );
    match offline.submit_assessment(FAMILY, &json!({ "agua": false }), at(2)) {
        Err(DignometroServiceError::Repository(RepositoryError::Unavailable(_))) => {}
        other => panic!("expected append failure, got {other:?}"),
    }
}

#[test]
fn current_recommendations_use_latest_snapshot_and_cap_override() {
    let (service, _, _) = build_service(Some(1));

    match service.current_recommendations(FAMILY, None) {
        Err(DignometroServiceError::NoAssessment(family)) => assert_eq!(family, FAMILY),
        other => panic!("expected no assessment, got {other:?}"),
    }

    service
        .submit_assessment(FAMILY, &json!({ "agua": false, "saude": false }), at(1))
        .expect("first assessment");
    service
        .submit_assessment(FAMILY, &json!({ "agua": false, "saude": true }), at(5))
        .expect("second assessment");

    let capped = service
        .current_recommendations(FAMILY, None)
        .expect("snapshot");
    assert_eq!(capped.dimensions().collect::<Vec<_>>(), vec![Dimension::Agua]);
    assert_eq!(capped.total(), 1);

    let uncapped = service
        .current_recommendations(FAMILY, Some(0))
        .expect("snapshot");
    assert_eq!(uncapped.total(), 3);
}

#[test]
fn accept_creates_assignment_and_blocks_duplicates() {
    let (service, _, goals) = build_service(None);

    let assignment = service
        .accept_recommendation(FAMILY, accept("educacao_1"))
        .expect("goal accepted");
    assert_eq!(assignment.dimension, Dimension::Educacao);
    assert_eq!(assignment.template_id, "educacao_1");
    assert_eq!(assignment.status, GoalStatus::Pendente);
    assert_eq!(assignment.target_date, target_date());

    match service.accept_recommendation(FAMILY, accept("educacao_1")) {
        Err(DignometroServiceError::AlreadyAssigned(id)) => assert_eq!(id, "educacao_1"),
        other => panic!("expected duplicate rejection, got {other:?}"),
    }

    match service.accept_recommendation(FAMILY, accept("lazer_1")) {
        Err(DignometroServiceError::UnknownTemplate(id)) => assert_eq!(id, "lazer_1"),
        other => panic!("expected unknown template, got {other:?}"),
    }

    let family = FamilyId::parse(FAMILY).expect("family");
    let mut other_family = assignment.clone();
    other_family.id = GoalAssignmentId("goal-other".to_string());
    other_family.family_id = FamilyId::parse("fam-002").expect("family");
    goals.seed(other_family);

    let listed = service.goal_assignments(FAMILY).expect("list goals");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].family_id, family);
}

#[test]
fn store_conflict_on_insert_is_reported_as_already_assigned() {
    let goals = Arc::new(LaggingGoals::default());
    let service = DignometroService::new(
        Arc::new(MemoryAssessments::default()),
        goals.clone(),
        ResolvedCatalog::bundled(),
        policy(None),
    );

    service
        .accept_recommendation(FAMILY, accept("agua_1"))
        .expect("first accept");
    match service.accept_recommendation(FAMILY, accept("agua_1")) {
        Err(DignometroServiceError::AlreadyAssigned(id)) => assert_eq!(id, "agua_1"),
        other => panic!("expected duplicate rejection, got {other:?}"),
    }

    let family = FamilyId::parse(FAMILY).expect("family");
    assert_eq!(goals.inner.list(&family).expect("list").len(), 1);
}

#[test]
fn progress_updates_status_and_reports_missing_goals() {
    let (service, _, _) = build_service(None);
    let assignment = service
        .accept_recommendation(FAMILY, accept("poupanca_2"))
        .expect("goal accepted");

    let updated = service
        .update_goal_progress(FAMILY, &assignment.id, 60)
        .expect("progress recorded");
    assert_eq!(updated.progress, 60);
    assert_eq!(updated.status, GoalStatus::EmAndamento);

    let stored = service.goal_assignments(FAMILY).expect("list goals");
    assert_eq!(stored[0].progress, 60);

    match service.update_goal_progress(FAMILY, &GoalAssignmentId("goal-x".to_string()), 10) {
        Err(DignometroServiceError::GoalNotFound(id)) => assert_eq!(id, "goal-x"),
        other => panic!("expected goal not found, got {other:?}"),
    }
}

#[test]
fn score_history_is_ordered_oldest_first() {
    let (service, _, _) = build_service(None);

    service
        .submit_assessment(FAMILY, &all_answers(true), at(20))
        .expect("later assessment");
    service
        .submit_assessment(FAMILY, &all_answers(false), at(2))
        .expect("backdated assessment");

    let history = service.score_history(FAMILY).expect("history");
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].submitted_at, at(2));
    assert_eq!(history[0].score.level, PovertyLevel::PobrezaExtrema);
    assert_eq!(history[1].score.score, 10.0);
}

#[test]
fn score_answers_is_pure() {
    let (service, assessments, _) = build_service(None);

    let result = service
        .score_answers(&json!({ "agua": true, "saude": false }))
        .expect("scored");

    assert_eq!(result.score, 5.0);
    assert_eq!(result.level, PovertyLevel::Dignidade);
    assert_eq!(
        assessments.count(&FamilyId::parse(FAMILY).expect("family")),
        0
    );
}
