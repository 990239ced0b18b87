use serde::Serialize;

use super::answers::AnswerSet;
use super::dimension::Dimension;

/// Dimensions that became vulnerable in the current submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VulnerabilityDiff {
    pub vulnerable_dimensions: Vec<Dimension>,
    pub has_new_vulnerability: bool,
}

impl VulnerabilityDiff {
    fn from_dimensions(vulnerable_dimensions: Vec<Dimension>) -> Self {
        let has_new_vulnerability = !vulnerable_dimensions.is_empty();
        Self {
            vulnerable_dimensions,
            has_new_vulnerability,
        }
    }
}

/// Compare `current` with the previous assessment's answers.
///
/// Without a previous assessment every `false` answer is new. Otherwise a
/// dimension is flagged only when it is `false` now and was `true` or
/// unanswered before. Dimensions absent from `current` are not evaluated.
///
/// Flagged dimensions come back in catalog order ([`Dimension::ALL`]), not in
/// the key order of the submitted JSON, since [`AnswerSet`] is keyed by
/// dimension. Recommendation groups follow the same order.
pub fn diff_vulnerabilities(current: &AnswerSet, previous: Option<&AnswerSet>) -> VulnerabilityDiff {
    let vulnerable = current
        .vulnerable()
        .filter(|dimension| match previous {
            Some(previous) => previous.get(*dimension) != Some(false),
            None => true,
        })
        .collect();

    VulnerabilityDiff::from_dimensions(vulnerable)
}
