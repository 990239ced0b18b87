use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer};

use super::normalizer::normalize_token;
use super::{
    CatalogError, CatalogSource, GoalCatalogLoader, GoalPriority, GoalTemplate,
    GoalTemplateCatalog,
};
use crate::dignometro::dimension::Dimension;

/// Goal catalog exported from the mentoring spreadsheet as CSV with the
/// columns `id,dimensao,objetivo,pergunta,prioridade`.
#[derive(Debug, Clone)]
pub struct SpreadsheetCatalog {
    path: PathBuf,
}

impl SpreadsheetCatalog {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Rows without an `id` get `<dimension>_<position in dimension>`,
    /// bumped past any id the sheet already uses. Explicit ids must be unique.
    pub fn from_reader<R: Read>(reader: R) -> Result<GoalTemplateCatalog, CatalogError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut rows = Vec::new();
        let mut taken: HashMap<String, u64> = HashMap::new();
        let mut per_dimension: HashMap<Dimension, usize> = HashMap::new();

        for (index, row) in csv_reader.deserialize::<SheetRow>().enumerate() {
            let row = row?;
            // Header is line 1.
            let line = index as u64 + 2;

            if row.is_blank() {
                continue;
            }

            let dimension = parse_dimension(&row.dimension).ok_or_else(|| CatalogError::Row {
                line,
                message: format!("unknown dimension '{}'", row.dimension),
            })?;

            let title = row.title.ok_or_else(|| CatalogError::Row {
                line,
                message: "missing goal title".to_string(),
            })?;

            let priority = match row.priority.as_deref() {
                Some(raw) => raw
                    .parse::<GoalPriority>()
                    .map_err(|message| CatalogError::Row { line, message })?,
                None => GoalPriority::Medium,
            };

            if let Some(id) = &row.id {
                if let Some(first) = taken.insert(id.clone(), line) {
                    return Err(CatalogError::Row {
                        line,
                        message: format!("duplicate goal id '{id}' (first used on line {first})"),
                    });
                }
            }

            let ordinal = per_dimension.entry(dimension).or_insert(0);
            *ordinal += 1;

            rows.push(ParsedRow {
                id: row.id,
                ordinal: *ordinal,
                dimension,
                question: row.question.unwrap_or_else(|| title.clone()),
                title,
                priority,
                line,
            });
        }

        let templates = rows
            .into_iter()
            .map(|row| {
                let id = match row.id {
                    Some(id) => id,
                    None => mint_id(row.dimension, row.ordinal, row.line, &mut taken),
                };
                GoalTemplate {
                    id,
                    dimension: row.dimension,
                    title: row.title,
                    question: row.question,
                    priority: row.priority,
                }
            })
            .collect::<Vec<_>>();

        Ok(GoalTemplateCatalog::from_templates(templates))
    }
}

struct ParsedRow {
    id: Option<String>,
    ordinal: usize,
    dimension: Dimension,
    title: String,
    question: String,
    priority: GoalPriority,
    line: u64,
}

fn mint_id(
    dimension: Dimension,
    ordinal: usize,
    line: u64,
    taken: &mut HashMap<String, u64>,
) -> String {
    let mut ordinal = ordinal;
    loop {
        let candidate = format!("{}_{}", dimension.key(), ordinal);
        if !taken.contains_key(&candidate) {
            taken.insert(candidate.clone(), line);
            return candidate;
        }
        ordinal += 1;
    }
}

impl GoalCatalogLoader for SpreadsheetCatalog {
    fn source(&self) -> CatalogSource {
        CatalogSource::Spreadsheet
    }

    fn load(&self) -> Result<GoalTemplateCatalog, CatalogError> {
        let file = std::fs::File::open(&self.path)?;
        Self::from_reader(file)
    }
}

#[derive(Debug, Deserialize)]
struct SheetRow {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    id: Option<String>,
    #[serde(rename = "dimensao", default)]
    dimension: String,
    #[serde(rename = "objetivo", default, deserialize_with = "empty_string_as_none")]
    title: Option<String>,
    #[serde(rename = "pergunta", default, deserialize_with = "empty_string_as_none")]
    question: Option<String>,
    #[serde(rename = "prioridade", default, deserialize_with = "empty_string_as_none")]
    priority: Option<String>,
}

impl SheetRow {
    fn is_blank(&self) -> bool {
        self.dimension.trim().is_empty()
            && self.title.is_none()
            && self.question.is_none()
            && self.id.is_none()
    }
}

fn parse_dimension(raw: &str) -> Option<Dimension> {
    Dimension::from_key(&normalize_token(raw))
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn parses_rows_and_keeps_sheet_order() {
        let csv = "id,dimensao,objetivo,pergunta,prioridade\n\
agua_a,Água,Instalar caixa d'água,A família armazena água?,Crítica\n\
,agua,Filtrar água,A água é filtrada?,alta\n\
saude_a,Saúde,Cartão SUS,Todos têm cartão SUS?,\n";

        let catalog = SpreadsheetCatalog::from_reader(Cursor::new(csv)).expect("parse sheet");

        let agua = catalog.templates_for(Dimension::Agua);
        assert_eq!(agua.len(), 2);
        assert_eq!(agua[0].id, "agua_a");
        assert_eq!(agua[0].priority, GoalPriority::Critical);
        assert_eq!(agua[1].id, "agua_2");
        assert_eq!(agua[1].priority, GoalPriority::High);

        let saude = catalog.templates_for(Dimension::Saude);
        assert_eq!(saude[0].priority, GoalPriority::Medium);
    }

    #[test]
    fn minted_ids_skip_ids_used_elsewhere_in_the_sheet() {
        let csv = "id,dimensao,objetivo,pergunta,prioridade\n\
agua_2,agua,Meta A,,alta\n\
,agua,Meta B,,media\n\
,agua,Meta C,,baixa\n\
agua_4,agua,Meta D,,baixa\n";

        let catalog = SpreadsheetCatalog::from_reader(Cursor::new(csv)).expect("parse sheet");

        let ids: Vec<_> = catalog
            .templates_for(Dimension::Agua)
            .iter()
            .map(|template| template.id.as_str())
            .collect();
        assert_eq!(ids, vec!["agua_2", "agua_3", "agua_5", "agua_4"]);
        assert_eq!(catalog.find("agua_3").map(|t| t.title.as_str()), Some("Meta B"));
    }

    #[test]
    fn rejects_duplicate_explicit_ids() {
        let csv = "id,dimensao,objetivo,pergunta,prioridade\nmeta_x,agua,Meta A,,alta\nmeta_x,saude,Meta B,,alta\n";
        match SpreadsheetCatalog::from_reader(Cursor::new(csv)) {
            Err(CatalogError::Row { line, message }) => {
                assert_eq!(line, 3);
                assert!(message.contains("meta_x"));
                assert!(message.contains("line 2"));
            }
            other => panic!("expected duplicate id error, got {other:?}"),
        }
    }

    #[test]
    fn skips_blank_rows() {
        let csv = "id,dimensao,objetivo,pergunta,prioridade\n,,,,\nx,moradia,Reformar telhado,,baixa\n";
        let catalog = SpreadsheetCatalog::from_reader(Cursor::new(csv)).expect("parse sheet");
        assert_eq!(catalog.len(), 1);
        let template = &catalog.templates_for(Dimension::Moradia)[0];
        assert_eq!(template.question, "Reformar telhado");
    }

    #[test]
    fn reports_unknown_dimension_with_line() {
        let csv = "id,dimensao,objetivo,pergunta,prioridade\nx,agua,Meta,,alta\ny,lazer,Meta,,alta\n";
        match SpreadsheetCatalog::from_reader(Cursor::new(csv)) {
            Err(CatalogError::Row { line, message }) => {
                assert_eq!(line, 3);
                assert!(message.contains("lazer"));
            }
            other => panic!("expected row error, got {other:?}"),
        }
    }

    #[test]
    fn load_propagates_io_errors() {
        let loader = SpreadsheetCatalog::new("./missing-goal-catalog.csv");
        match loader.load() {
            Err(CatalogError::Io(_)) => {}
            other => panic!("expected io error, got {other:?}"),
        }
    }
}
