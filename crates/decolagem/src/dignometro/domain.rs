use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::answers::AnswerSet;
use super::validation::ValidationError;

/// Identifier of the family that owns assessments and goals.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FamilyId(String);

impl FamilyId {
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::MissingFamilyId);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FamilyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssessmentId(pub String);

/// A completed questionnaire. Assessments are append-only; the latest by
/// `submitted_at` is the family's current one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assessment {
    pub id: AssessmentId,
    pub family_id: FamilyId,
    pub answers: AnswerSet,
    pub submitted_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn family_id_is_trimmed_and_required() {
        let id = FamilyId::parse("  fam-01 ").expect("valid id");
        assert_eq!(id.as_str(), "fam-01");
        assert_eq!(FamilyId::parse("   "), Err(ValidationError::MissingFamilyId));
        assert_eq!(FamilyId::parse(""), Err(ValidationError::MissingFamilyId));
    }
}
