use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::validation::ValidationError;

/// Assessment dimensions in catalog order.
///
/// The derived `Ord` follows declaration order, so ordered collections keyed
/// by `Dimension` iterate in catalog order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Agua,
    Saneamento,
    Saude,
    Educacao,
    Moradia,
    Alimentacao,
    RendaEstavel,
    RendaDiversificada,
    Poupanca,
    BensConectividade,
}

impl Dimension {
    pub const ALL: [Dimension; 10] = [
        Dimension::Agua,
        Dimension::Saneamento,
        Dimension::Saude,
        Dimension::Educacao,
        Dimension::Moradia,
        Dimension::Alimentacao,
        Dimension::RendaEstavel,
        Dimension::RendaDiversificada,
        Dimension::Poupanca,
        Dimension::BensConectividade,
    ];

    pub const fn key(self) -> &'static str {
        match self {
            Dimension::Agua => "agua",
            Dimension::Saneamento => "saneamento",
            Dimension::Saude => "saude",
            Dimension::Educacao => "educacao",
            Dimension::Moradia => "moradia",
            Dimension::Alimentacao => "alimentacao",
            Dimension::RendaEstavel => "renda_estavel",
            Dimension::RendaDiversificada => "renda_diversificada",
            Dimension::Poupanca => "poupanca",
            Dimension::BensConectividade => "bens_conectividade",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Dimension::Agua => "Água",
            Dimension::Saneamento => "Saneamento",
            Dimension::Saude => "Saúde",
            Dimension::Educacao => "Educação",
            Dimension::Moradia => "Moradia",
            Dimension::Alimentacao => "Alimentação",
            Dimension::RendaEstavel => "Renda estável",
            Dimension::RendaDiversificada => "Renda diversificada",
            Dimension::Poupanca => "Poupança",
            Dimension::BensConectividade => "Bens e conectividade",
        }
    }

    /// Zero-based position in the catalog.
    pub fn position(self) -> usize {
        self as usize
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|dimension| dimension.key() == key)
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Dimension {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::from_key(value.trim()).ok_or_else(|| ValidationError::UnknownDimension {
            key: value.to_string(),
        })
    }
}
