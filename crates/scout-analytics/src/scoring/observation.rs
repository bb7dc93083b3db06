use super::value::{FieldValue, Fields};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One team's recorded performance in one match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub team_number: u32,
    pub match_number: u32,
    #[serde(default)]
    pub fields: Fields,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scouted_at: Option<DateTime<Utc>>,
}

impl Observation {
    pub fn new(team_number: u32, match_number: u32) -> Self {
        Self {
            team_number,
            match_number,
            fields: Fields::new(),
            scouted_at: None,
        }
    }

    pub fn with_field(mut self, id: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(id.into(), value.into());
        self
    }
}

/// Observations gathered for one selected team.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamObservations {
    pub team_number: u32,
    #[serde(default)]
    pub observations: Vec<Observation>,
}

impl TeamObservations {
    pub fn new(team_number: u32, observations: Vec<Observation>) -> Self {
        Self {
            team_number,
            observations,
        }
    }

    /// Groups observations by team, keeping only the requested teams in the requested order.
    ///
    /// Teams without any observation still get an (empty) entry.
    pub fn select(observations: &[Observation], team_numbers: &[u32]) -> Vec<Self> {
        team_numbers
            .iter()
            .map(|&team_number| Self {
                team_number,
                observations: observations
                    .iter()
                    .filter(|observation| observation.team_number == team_number)
                    .cloned()
                    .collect(),
            })
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }
}
