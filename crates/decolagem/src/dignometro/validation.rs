/// Rejections raised while accepting questionnaire input at the boundary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("family identifier is required")]
    MissingFamilyId,
    #[error("unknown dimension '{key}'")]
    UnknownDimension { key: String },
    #[error("answer for '{key}' must be a boolean, found {found}")]
    NonBooleanAnswer { key: String, found: &'static str },
    #[error("answers must be a JSON object keyed by dimension")]
    NotAnObject,
}
