use super::evaluator::{evaluate_period, evaluate_total, ScoringEvaluator};
use super::schema::{Period, ScoringSchema};
use super::value::{numeric_coerce, Fields};
use serde::{Deserialize, Serialize};
use std::fmt;

/// What a statistic or graph measures.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    TotalPoints,
    AutoPoints,
    TeleopPoints,
    EndgamePoints,
    /// Team-level stability score; per observation it reads the total points it is derived from.
    Consistency,
    /// A raw schema field id.
    Field(String),
}

impl Metric {
    /// Resolves an identifier, accepting the short aliases case-insensitively.
    pub fn parse(id: &str) -> Self {
        match id.trim().to_ascii_lowercase().as_str() {
            "total_points" | "tot" => Self::TotalPoints,
            "auto_points" | "apt" => Self::AutoPoints,
            "teleop_points" | "tpt" => Self::TeleopPoints,
            "endgame_points" | "ept" => Self::EndgamePoints,
            "consistency" => Self::Consistency,
            _ => Self::Field(id.trim().to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::TotalPoints => "Total Points",
            Self::AutoPoints => "Auto Points",
            Self::TeleopPoints => "Teleop Points",
            Self::EndgamePoints => "Endgame Points",
            Self::Consistency => "Consistency",
            Self::Field(id) => id,
        }
    }

    pub fn is_computed(&self) -> bool {
        !matches!(self, Self::Field(_))
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Maps a metric to a number for one observation.
#[derive(Debug, Clone, Copy)]
pub struct MetricResolver<'a> {
    schema: &'a ScoringSchema,
}

impl<'a> MetricResolver<'a> {
    pub fn new(evaluator: &'a ScoringEvaluator) -> Self {
        Self::for_schema(evaluator.schema())
    }

    pub fn for_schema(schema: &'a ScoringSchema) -> Self {
        Self { schema }
    }

    /// Never fails: anything unresolvable reads as 0.
    pub fn resolve(&self, metric: &Metric, fields: &Fields) -> f64 {
        self.resolve_present(metric, fields).unwrap_or(0.0)
    }

    /// Like [`MetricResolver::resolve`], but `None` when a raw field is not recorded at all.
    ///
    /// Computed point metrics are always present.
    pub fn resolve_present(&self, metric: &Metric, fields: &Fields) -> Option<f64> {
        let value = match metric {
            Metric::TotalPoints | Metric::Consistency => evaluate_total(self.schema, fields),
            Metric::AutoPoints => self.period_points(Period::Auto, fields),
            Metric::TeleopPoints => self.period_points(Period::Teleop, fields),
            Metric::EndgamePoints => self.period_points(Period::Endgame, fields),
            Metric::Field(id) => return resolve_field(id, fields),
        };
        Some(value)
    }

    fn period_points(&self, period: Period, fields: &Fields) -> f64 {
        evaluate_period(self.schema.elements(period), fields)
    }
}

/// Resolves a metric id against a schema without building an evaluator first.
pub fn resolve(metric_id: &str, fields: &Fields, schema: &ScoringSchema) -> f64 {
    MetricResolver::for_schema(schema).resolve(&Metric::parse(metric_id), fields)
}

/// Exact key first, then the first key (in key order) that contains the id
/// case-insensitively and reads as non-zero. Matching keys that all read zero give 0;
/// no recorded key at all gives `None`.
///
/// The substring pass is best-effort: it tolerates ids drifting between form versions
/// and can pick up an unrelated field whose key happens to contain the id.
fn resolve_field(id: &str, fields: &Fields) -> Option<f64> {
    if let Some(value) = fields.get(id).filter(|value| !value.is_missing()) {
        return Some(numeric_coerce(value));
    }

    let needle = id.to_ascii_lowercase();
    if needle.is_empty() {
        return None;
    }

    let mut matched = false;
    for (key, value) in fields {
        if value.is_missing() || !key.to_ascii_lowercase().contains(&needle) {
            continue;
        }
        matched = true;
        let number = numeric_coerce(value);
        if number != 0.0 {
            return Some(number);
        }
    }

    matched.then_some(0.0)
}
