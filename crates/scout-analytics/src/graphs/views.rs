use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GraphShape {
    Line,
    Bar,
    Radar,
    Scatter,
    Hist,
    Box,
    Violin,
    Sunburst,
    Waterfall,
}

impl GraphShape {
    pub const fn ordered() -> [Self; 9] {
        [
            Self::Line,
            Self::Bar,
            Self::Radar,
            Self::Scatter,
            Self::Hist,
            Self::Box,
            Self::Violin,
            Self::Sunburst,
            Self::Waterfall,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Line => "line",
            Self::Bar => "bar",
            Self::Radar => "radar",
            Self::Scatter => "scatter",
            Self::Hist => "hist",
            Self::Box => "box",
            Self::Violin => "violin",
            Self::Sunburst => "sunburst",
            Self::Waterfall => "waterfall",
        }
    }

    /// Shapes plotted from per-team aggregates, whatever the requested mode.
    pub const fn is_team_level(self) -> bool {
        matches!(self, Self::Radar | Self::Sunburst | Self::Waterfall)
    }
}

impl fmt::Display for GraphShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for GraphShape {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        let normalized = match normalized.as_str() {
            "histogram" => "hist",
            other => other,
        };

        Self::ordered()
            .into_iter()
            .find(|shape| shape.label() == normalized)
            .ok_or_else(|| format!("unknown graph shape '{value}'"))
    }
}

/// Whether each team contributes one aggregate or one value per match.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GraphMode {
    #[default]
    Averages,
    MatchByMatch,
}

impl GraphMode {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Averages => "averages",
            Self::MatchByMatch => "match_by_match",
        }
    }
}

impl fmt::Display for GraphMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for GraphMode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "averages" | "average" => Ok(Self::Averages),
            "match_by_match" | "matches" => Ok(Self::MatchByMatch),
            _ => Err(format!("unknown graph mode '{value}'")),
        }
    }
}

/// One plotted series. `NaN` values mark gaps and serialize as `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphDataset {
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_number: Option<u32>,
    pub values: Vec<f64>,
    pub color: &'static str,
}

/// Shared radial axis for radar plots.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RadialAxis {
    pub range: f64,
    pub tick_spacing: f64,
}

/// Sunburst tree as parallel arrays; `parents` reference `ids`, the root's parent is empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SunburstHierarchy {
    pub ids: Vec<String>,
    pub labels: Vec<String>,
    pub parents: Vec<String>,
    pub values: Vec<f64>,
    pub branch_values: &'static str,
}

impl SunburstHierarchy {
    pub(crate) fn push(&mut self, id: String, label: String, parent: String, value: f64) {
        self.ids.push(id);
        self.labels.push(label);
        self.parents.push(parent);
        self.values.push(value);
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Sum of the values whose parent is `id`.
    pub fn children_total(&self, id: &str) -> f64 {
        self.parents
            .iter()
            .zip(&self.values)
            .filter(|(parent, _)| parent.as_str() == id)
            .map(|(_, value)| value)
            .sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WaterfallMeasure {
    Relative,
    Total,
}

/// Rendering-agnostic chart payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphData {
    pub shape: GraphShape,
    pub mode: GraphMode,
    pub metric: String,
    pub category_labels: Vec<String>,
    pub datasets: Vec<GraphDataset>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radial_axis: Option<RadialAxis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hierarchy: Option<SunburstHierarchy>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub measures: Vec<WaterfallMeasure>,
    /// Colour of each category for single-series shapes (waterfall), so a team keeps
    /// the colour it has in the other shapes.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub category_colors: Vec<&'static str>,
}

impl GraphData {
    pub fn empty(shape: GraphShape, mode: GraphMode, metric: impl Into<String>) -> Self {
        Self {
            shape,
            mode,
            metric: metric.into(),
            category_labels: Vec::new(),
            datasets: Vec::new(),
            radial_axis: None,
            hierarchy: None,
            measures: Vec::new(),
            category_colors: Vec::new(),
        }
    }

    /// Nothing to render; not a failure.
    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }

    pub fn dataset_for(&self, team_number: u32) -> Option<&GraphDataset> {
        self.datasets
            .iter()
            .find(|dataset| dataset.team_number == Some(team_number))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shapes_parse_from_labels() {
        for shape in GraphShape::ordered() {
            assert_eq!(shape.label().parse::<GraphShape>(), Ok(shape));
        }
        assert_eq!("Histogram".parse::<GraphShape>(), Ok(GraphShape::Hist));
        assert!("pie".parse::<GraphShape>().is_err());
    }

    #[test]
    fn modes_parse_with_dashes() {
        assert_eq!("match-by-match".parse::<GraphMode>(), Ok(GraphMode::MatchByMatch));
        assert_eq!("Averages".parse::<GraphMode>(), Ok(GraphMode::Averages));
        assert!("weekly".parse::<GraphMode>().is_err());
    }

    #[test]
    fn gaps_serialize_as_null() {
        let dataset = GraphDataset {
            label: "Team 7".to_string(),
            team_number: Some(7),
            values: vec![1.0, f64::NAN],
            color: "#1f77b4",
        };
        let json = serde_json::to_value(&dataset).expect("dataset serializes");
        assert_eq!(json["values"], serde_json::json!([1.0, null]));
    }
}
