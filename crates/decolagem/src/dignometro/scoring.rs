use serde::{Deserialize, Serialize};

use super::answers::AnswerSet;

/// Poverty classification, ordered from most to least vulnerable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PovertyLevel {
    #[serde(rename = "pobreza extrema")]
    PobrezaExtrema,
    #[serde(rename = "pobreza")]
    Pobreza,
    #[serde(rename = "dignidade")]
    Dignidade,
    #[serde(rename = "prosperidade em desenvolvimento")]
    ProsperidadeEmDesenvolvimento,
    #[serde(rename = "quebra de ciclo da pobreza")]
    QuebraDeCicloDaPobreza,
}

// Lower bounds in tenths of a point; each band is closed-open.
const POBREZA_FLOOR: u32 = 30;
const DIGNIDADE_FLOOR: u32 = 50;
const PROSPERIDADE_FLOOR: u32 = 70;
const QUEBRA_DE_CICLO_FLOOR: u32 = 90;

impl PovertyLevel {
    pub const fn label(self) -> &'static str {
        match self {
            PovertyLevel::PobrezaExtrema => "pobreza extrema",
            PovertyLevel::Pobreza => "pobreza",
            PovertyLevel::Dignidade => "dignidade",
            PovertyLevel::ProsperidadeEmDesenvolvimento => "prosperidade em desenvolvimento",
            PovertyLevel::QuebraDeCicloDaPobreza => "quebra de ciclo da pobreza",
        }
    }

    /// Classify a persisted score. Non-finite or negative input falls in the
    /// lowest band.
    pub fn from_score(score: f64) -> Self {
        if !score.is_finite() || score <= 0.0 {
            return Self::from_tenths(0);
        }
        Self::from_tenths((score * 10.0).round() as u32)
    }

    fn from_tenths(tenths: u32) -> Self {
        if tenths >= QUEBRA_DE_CICLO_FLOOR {
            PovertyLevel::QuebraDeCicloDaPobreza
        } else if tenths >= PROSPERIDADE_FLOOR {
            PovertyLevel::ProsperidadeEmDesenvolvimento
        } else if tenths >= DIGNIDADE_FLOOR {
            PovertyLevel::Dignidade
        } else if tenths >= POBREZA_FLOOR {
            PovertyLevel::Pobreza
        } else {
            PovertyLevel::PobrezaExtrema
        }
    }
}

/// Score derived from one answer set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub score: f64,
    pub level: PovertyLevel,
    pub answered: usize,
    pub positive: usize,
    /// False when no dimension was answered; the score is then reported as 0.
    pub assessed: bool,
}

/// `score = round(10 * positive / answered, 1)`, computed in integer tenths so
/// band boundaries such as 5.0 are exact.
pub fn score(answers: &AnswerSet) -> ScoreResult {
    let answered = answers.answered();
    let positive = answers.positives();

    if answered == 0 {
        return ScoreResult {
            score: 0.0,
            level: PovertyLevel::PobrezaExtrema,
            answered,
            positive,
            assessed: false,
        };
    }

    let tenths = score_in_tenths(positive, answered);

    ScoreResult {
        score: f64::from(tenths) / 10.0,
        level: PovertyLevel::from_tenths(tenths),
        answered,
        positive,
        assessed: true,
    }
}

// Half-up rounding of 100 * positive / answered.
fn score_in_tenths(positive: usize, answered: usize) -> u32 {
    let numerator = 200 * positive as u64 + answered as u64;
    let denominator = 2 * answered as u64;
    (numerator / denominator) as u32
}
