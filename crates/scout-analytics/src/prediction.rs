use crate::stats::TeamStatistics;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Win probability used when neither alliance shows any variance.
const NO_VARIANCE_FAVORITE: f64 = 0.75;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Alliance {
    Red,
    Blue,
}

impl Alliance {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Red => "Red",
            Self::Blue => "Blue",
        }
    }
}

/// Expected contribution of one team, taken from its historical means.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamMatchPrediction {
    pub team_number: u32,
    pub alliance: Alliance,
    pub auto: f64,
    pub teleop: f64,
    pub endgame: f64,
    pub total: f64,
    pub std_dev: f64,
    pub has_data: bool,
}

impl TeamMatchPrediction {
    fn from_statistics(
        team_number: u32,
        alliance: Alliance,
        stats: Option<&TeamStatistics>,
    ) -> Self {
        match stats.filter(|stats| stats.has_data()) {
            Some(stats) => Self {
                team_number,
                alliance,
                auto: stats.auto.mean,
                teleop: stats.teleop.mean,
                endgame: stats.endgame.mean,
                total: stats.total.mean,
                std_dev: stats.total.std_dev,
                has_data: true,
            },
            None => Self {
                team_number,
                alliance,
                auto: 0.0,
                teleop: 0.0,
                endgame: 0.0,
                total: 0.0,
                std_dev: 0.0,
                has_data: false,
            },
        }
    }
}

/// Summed expectation for one alliance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AllianceProjection {
    pub teams: Vec<u32>,
    pub auto: f64,
    pub teleop: f64,
    pub endgame: f64,
    pub total: f64,
    /// Teammates are treated as independent: the root of summed variances.
    pub std_dev: f64,
}

impl AllianceProjection {
    fn from_members(teams: &[u32], members: &[&TeamMatchPrediction]) -> Self {
        Self {
            teams: teams.to_vec(),
            auto: members.iter().map(|team| team.auto).sum(),
            teleop: members.iter().map(|team| team.teleop).sum(),
            endgame: members.iter().map(|team| team.endgame).sum(),
            total: members.iter().map(|team| team.total).sum(),
            std_dev: members
                .iter()
                .map(|team| team.std_dev.powi(2))
                .sum::<f64>()
                .sqrt(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchPrediction {
    pub red_teams: Vec<u32>,
    pub blue_teams: Vec<u32>,
    pub per_team_prediction: Vec<TeamMatchPrediction>,
    pub red: AllianceProjection,
    pub blue: AllianceProjection,
    pub red_total: f64,
    pub blue_total: f64,
    pub red_win_probability: f64,
    pub blue_win_probability: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub teams_without_data: Vec<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl MatchPrediction {
    /// The alliance with the higher win probability, `None` on an even split.
    pub fn favored(&self) -> Option<Alliance> {
        if self.red_win_probability > self.blue_win_probability {
            Some(Alliance::Red)
        } else if self.blue_win_probability > self.red_win_probability {
            Some(Alliance::Blue)
        } else {
            None
        }
    }

    pub fn team(&self, team_number: u32) -> Option<&TeamMatchPrediction> {
        self.per_team_prediction
            .iter()
            .find(|team| team.team_number == team_number)
    }
}

/// Normal-approximation predictor over team point statistics.
#[derive(Debug, Default, Clone, Copy)]
pub struct MatchPredictor;

impl MatchPredictor {
    pub fn new() -> Self {
        Self
    }

    pub fn predict(
        &self,
        red_teams: &[u32],
        blue_teams: &[u32],
        stats_by_team: &HashMap<u32, TeamStatistics>,
    ) -> MatchPrediction {
        let per_team: Vec<TeamMatchPrediction> = red_teams
            .iter()
            .map(|team| (team, Alliance::Red))
            .chain(blue_teams.iter().map(|team| (team, Alliance::Blue)))
            .map(|(&team, alliance)| {
                TeamMatchPrediction::from_statistics(team, alliance, stats_by_team.get(&team))
            })
            .collect();

        let members = |alliance: Alliance| -> Vec<&TeamMatchPrediction> {
            per_team
                .iter()
                .filter(|team| team.alliance == alliance)
                .collect()
        };
        let red = AllianceProjection::from_members(red_teams, &members(Alliance::Red));
        let blue = AllianceProjection::from_members(blue_teams, &members(Alliance::Blue));

        let (red_win_probability, blue_win_probability) =
            win_probabilities(red.total, blue.total, red.std_dev, blue.std_dev);

        let teams_without_data: Vec<u32> = per_team
            .iter()
            .filter(|team| !team.has_data)
            .map(|team| team.team_number)
            .collect();
        let warning = missing_data_warning(&teams_without_data);
        if let Some(message) = &warning {
            warn!(teams = ?teams_without_data, "{message}");
        }

        debug!(
            red_total = red.total,
            blue_total = blue.total,
            red_win_probability,
            "predicted match outcome"
        );

        MatchPrediction {
            red_teams: red_teams.to_vec(),
            blue_teams: blue_teams.to_vec(),
            red_total: red.total,
            blue_total: blue.total,
            per_team_prediction: per_team,
            red,
            blue,
            red_win_probability,
            blue_win_probability,
            teams_without_data,
            warning,
        }
    }
}

/// `(red, blue)` win probabilities from alliance totals and deviations.
pub fn win_probabilities(
    red_total: f64,
    blue_total: f64,
    red_std: f64,
    blue_std: f64,
) -> (f64, f64) {
    let score_diff = red_total - blue_total;
    let combined_std = (red_std.powi(2) + blue_std.powi(2)).sqrt();

    if combined_std > 0.0 {
        let red = normal_cdf(score_diff / combined_std);
        return (red, 1.0 - red);
    }

    if score_diff > 0.0 {
        (NO_VARIANCE_FAVORITE, 1.0 - NO_VARIANCE_FAVORITE)
    } else if score_diff < 0.0 {
        (1.0 - NO_VARIANCE_FAVORITE, NO_VARIANCE_FAVORITE)
    } else {
        (0.5, 0.5)
    }
}

/// Standard normal CDF.
pub fn normal_cdf(z: f64) -> f64 {
    0.5 * (1.0 + erf(z / std::f64::consts::SQRT_2))
}

/// Abramowitz & Stegun 7.1.26; absolute error below 1.5e-7.
pub fn erf(x: f64) -> f64 {
    const A1: f64 = 0.254829592;
    const A2: f64 = -0.284496736;
    const A3: f64 = 1.421413741;
    const A4: f64 = -1.453152027;
    const A5: f64 = 1.061405429;
    const P: f64 = 0.3275911;

    // The polynomial leaves ~1e-9 at the origin; keep erf odd and exact there.
    if x == 0.0 {
        return 0.0;
    }

    let sign = if x < 0.0 { -1.0 } else { 1.0 };
    let x = x.abs();
    let t = 1.0 / (1.0 + P * x);
    let y = 1.0 - (((((A5 * t + A4) * t) + A3) * t + A2) * t + A1) * t * (-x * x).exp();

    sign * y
}

fn missing_data_warning(teams: &[u32]) -> Option<String> {
    if teams.is_empty() {
        return None;
    }

    let listed: Vec<String> = teams.iter().map(u32::to_string).collect();
    Some(format!(
        "No scouting data for team{} {}; prediction confidence is reduced",
        if teams.len() == 1 { "" } else { "s" },
        listed.join(", ")
    ))
}
