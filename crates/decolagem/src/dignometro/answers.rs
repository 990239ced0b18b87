use std::collections::BTreeMap;

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};

use super::dimension::Dimension;
use super::validation::ValidationError;

/// Boolean answers keyed by dimension. `true` meets the dignity bar and
/// `false` marks the dimension as vulnerable; absent keys carry no data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerSet {
    answers: BTreeMap<Dimension, bool>,
}

impl AnswerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate a raw JSON payload. JSON `null` is read as "not answered".
    pub fn from_json(value: &Value) -> Result<Self, ValidationError> {
        match value {
            Value::Object(map) => Self::from_map(map),
            _ => Err(ValidationError::NotAnObject),
        }
    }

    pub fn from_map(map: &Map<String, Value>) -> Result<Self, ValidationError> {
        let mut answers = BTreeMap::new();

        for (key, value) in map {
            let dimension: Dimension = key.parse()?;
            match value {
                Value::Bool(answer) => {
                    answers.insert(dimension, *answer);
                }
                Value::Null => {}
                other => {
                    return Err(ValidationError::NonBooleanAnswer {
                        key: key.clone(),
                        found: json_kind(other),
                    })
                }
            }
        }

        Ok(Self { answers })
    }

    pub fn with(mut self, dimension: Dimension, answer: bool) -> Self {
        self.answers.insert(dimension, answer);
        self
    }

    pub fn insert(&mut self, dimension: Dimension, answer: bool) -> Option<bool> {
        self.answers.insert(dimension, answer)
    }

    pub fn get(&self, dimension: Dimension) -> Option<bool> {
        self.answers.get(&dimension).copied()
    }

    /// Answers in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = (Dimension, bool)> + '_ {
        self.answers
            .iter()
            .map(|(dimension, answer)| (*dimension, *answer))
    }

    pub fn answered(&self) -> usize {
        self.answers.len()
    }

    pub fn positives(&self) -> usize {
        self.answers.values().filter(|answer| **answer).count()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    pub fn vulnerable(&self) -> impl Iterator<Item = Dimension> + '_ {
        self.iter()
            .filter(|(_, answer)| !answer)
            .map(|(dimension, _)| dimension)
    }
}

impl FromIterator<(Dimension, bool)> for AnswerSet {
    fn from_iter<I: IntoIterator<Item = (Dimension, bool)>>(iter: I) -> Self {
        Self {
            answers: iter.into_iter().collect(),
        }
    }
}

impl Serialize for AnswerSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.answers.len()))?;
        for (dimension, answer) in &self.answers {
            map.serialize_entry(dimension.key(), answer)?;
        }
        map.end()
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
