use crate::infra::load_catalog;
use chrono::Utc;
use clap::Args;
use decolagem::config::AppConfig;
use decolagem::dignometro::{
    deduplicate, diff_vulnerabilities, score, AnswerSet, FamilyId, RecommendationGenerator,
    RecommendationPolicy, RecommendationsByDimension, ScoreResult, VulnerabilityDiff,
};
use decolagem::error::AppError;
use serde_json::Value;
use std::collections::HashSet;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// JSON file with the questionnaire answers (`{"agua": true, ...}`)
    #[arg(long)]
    pub(crate) answers: PathBuf,
}

#[derive(Args, Debug)]
pub(crate) struct RecommendArgs {
    /// JSON file with the current questionnaire answers
    #[arg(long)]
    pub(crate) answers: PathBuf,
    /// JSON file with the previous questionnaire answers
    #[arg(long)]
    pub(crate) previous: Option<PathBuf>,
    /// Family the recommendations are generated for
    #[arg(long, default_value = "cli")]
    pub(crate) family: String,
    /// Template ids already assigned to the family (repeatable)
    #[arg(long)]
    pub(crate) assigned: Vec<String>,
    /// Recommendations per dimension; 0 shows all (defaults to the configured cap)
    #[arg(long)]
    pub(crate) cap: Option<usize>,
    /// Spreadsheet export to use instead of the configured catalog
    #[arg(long)]
    pub(crate) catalog: Option<PathBuf>,
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let answers = read_answers(&args.answers)?;
    print!("{}", render_score(&score(&answers)));
    Ok(())
}

pub(crate) fn run_recommend(args: RecommendArgs) -> Result<(), AppError> {
    let RecommendArgs {
        answers,
        previous,
        family,
        assigned,
        cap,
        catalog,
    } = args;

    let mut config = AppConfig::load()?.dignometro;
    if catalog.is_some() {
        config.catalog_csv = catalog;
    }
    if let Some(cap) = cap {
        config.recommendations_per_dimension = (cap > 0).then_some(cap);
    }

    let family = FamilyId::parse(&family)?;
    let current = read_answers(&answers)?;
    let previous = previous.as_deref().map(read_answers).transpose()?;

    let result = score(&current);
    let diff = diff_vulnerabilities(&current, previous.as_ref());

    let policy = RecommendationPolicy::from(&config);
    let generator = RecommendationGenerator::new(load_catalog(&config), policy.ids);
    let generated = generator.generate(&family, &diff.vulnerable_dimensions, Utc::now());
    let existing: HashSet<String> = assigned.into_iter().collect();
    let recommendations = deduplicate(generated, &existing, policy.max_per_dimension);

    print!("{}", render_score(&result));
    print!("{}", render_recommendations(&diff, &recommendations));
    Ok(())
}

/// Answers are read either as a bare object or wrapped as `{"answers": {...}}`.
pub(crate) fn read_answers(path: &Path) -> Result<AnswerSet, AppError> {
    let raw = std::fs::read_to_string(path)?;
    let value: Value = serde_json::from_str(&raw)?;
    let answers = match value.get("answers") {
        Some(inner) if inner.is_object() => inner,
        _ => &value,
    };
    Ok(AnswerSet::from_json(answers)?)
}

pub(crate) fn render_score(result: &ScoreResult) -> String {
    let mut out = String::new();
    if !result.assessed {
        let _ = writeln!(out, "Dignômetro: no dimension answered");
        return out;
    }

    let _ = writeln!(
        out,
        "Dignômetro: {:.1} ({})",
        result.score,
        result.level.label()
    );
    let _ = writeln!(
        out,
        "- {} of {} answered dimensions met",
        result.positive, result.answered
    );
    out
}

pub(crate) fn render_recommendations(
    diff: &VulnerabilityDiff,
    recommendations: &RecommendationsByDimension,
) -> String {
    let mut out = String::new();
    if !diff.has_new_vulnerability {
        let _ = writeln!(out, "No new vulnerabilities since the previous assessment.");
        return out;
    }

    let labels: Vec<_> = diff
        .vulnerable_dimensions
        .iter()
        .map(|dimension| dimension.label())
        .collect();
    let _ = writeln!(out, "New vulnerabilities: {}", labels.join(", "));

    if recommendations.is_empty() {
        let _ = writeln!(out, "No goals left to suggest.");
        return out;
    }

    for (dimension, group) in recommendations.iter() {
        let _ = writeln!(out, "\n{}", dimension.label());
        for recommendation in group {
            let _ = writeln!(
                out,
                "  - [{}] {} ({})",
                recommendation.template.priority.label(),
                recommendation.template.title,
                recommendation.template_id()
            );
        }
    }
    out
}
