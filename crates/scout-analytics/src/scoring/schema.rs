use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// Match phase a scoring element belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    Auto,
    Teleop,
    Endgame,
}

impl Period {
    pub const fn ordered() -> [Self; 3] {
        [Self::Auto, Self::Teleop, Self::Endgame]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Auto => "Auto",
            Self::Teleop => "Teleop",
            Self::Endgame => "Endgame",
        }
    }
}

/// How a raw field value converts into points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    #[serde(alias = "number")]
    Counter,
    Boolean,
    MultipleChoice,
    Rating,
    Text,
}

impl ElementKind {
    /// Rating and free-text fields are recorded but never scored.
    pub const fn is_scored(self) -> bool {
        matches!(self, Self::Counter | Self::Boolean | Self::MultipleChoice)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoiceOption {
    pub name: String,
    #[serde(default)]
    pub points: f64,
}

/// One measurable field of the scouting form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringElement {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ElementKind,
    #[serde(default)]
    pub points: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<ChoiceOption>,
}

impl ScoringElement {
    pub fn counter(id: impl Into<String>, points: f64) -> Self {
        Self {
            id: id.into(),
            kind: ElementKind::Counter,
            points,
            min: None,
            max: None,
            options: Vec::new(),
        }
    }

    pub fn boolean(id: impl Into<String>, points: f64) -> Self {
        Self {
            kind: ElementKind::Boolean,
            ..Self::counter(id, points)
        }
    }

    pub fn multiple_choice(id: impl Into<String>, options: Vec<ChoiceOption>) -> Self {
        Self {
            kind: ElementKind::MultipleChoice,
            options,
            ..Self::counter(id, 0.0)
        }
    }

    pub fn option_points(&self, name: &str) -> Option<f64> {
        self.options
            .iter()
            .find(|option| option.name == name)
            .map(|option| option.points)
    }
}

/// User-defined scouting form grouped by match period.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringSchema {
    #[serde(default)]
    pub auto_elements: Vec<ScoringElement>,
    #[serde(default)]
    pub teleop_elements: Vec<ScoringElement>,
    #[serde(default)]
    pub endgame_elements: Vec<ScoringElement>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub post_match_elements: Vec<ScoringElement>,
}

impl ScoringSchema {
    pub fn elements(&self, period: Period) -> &[ScoringElement] {
        match period {
            Period::Auto => &self.auto_elements,
            Period::Teleop => &self.teleop_elements,
            Period::Endgame => &self.endgame_elements,
        }
    }

    pub fn element_count(&self) -> usize {
        Period::ordered()
            .into_iter()
            .map(|period| self.elements(period).len())
            .sum()
    }

    /// Checks the invariants a loaded schema must satisfy before it is scored against.
    pub fn validate(&self) -> Result<(), SchemaError> {
        for period in Period::ordered() {
            let mut seen = HashSet::new();
            for element in self.elements(period) {
                if !seen.insert(element.id.as_str()) {
                    return Err(SchemaError::DuplicateElement {
                        period,
                        id: element.id.clone(),
                    });
                }

                if element.kind == ElementKind::MultipleChoice && element.options.is_empty() {
                    return Err(SchemaError::MissingOptions {
                        id: element.id.clone(),
                    });
                }
            }
        }

        Ok(())
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum SchemaError {
    #[error("element id '{id}' appears more than once in the {} period", .period.label())]
    DuplicateElement { period: Period, id: String },
    #[error("multiple choice element '{id}' defines no options")]
    MissingOptions { id: String },
}
