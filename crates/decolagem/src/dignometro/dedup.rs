use std::collections::HashSet;

use super::recommendations::RecommendationsByDimension;

/// Drop recommendations whose template is already assigned to the family,
/// then keep at most `cap_per_dimension` survivors per dimension. Dimensions
/// left without recommendations are removed from the grouping.
///
/// The cap is applied after filtering, so assigned templates never take a
/// slot. Applying the function twice with the same inputs is a no-op.
pub fn deduplicate(
    recommendations: RecommendationsByDimension,
    existing_template_ids: &HashSet<String>,
    cap_per_dimension: Option<usize>,
) -> RecommendationsByDimension {
    let mut filtered = RecommendationsByDimension::new();

    for (dimension, group) in recommendations.into_groups() {
        let survivors: Vec<_> = group
            .into_iter()
            .filter(|recommendation| !existing_template_ids.contains(recommendation.template_id()))
            .take(cap_per_dimension.unwrap_or(usize::MAX))
            .collect();

        if !survivors.is_empty() {
            filtered.insert_group(dimension, survivors);
        }
    }

    filtered
}
