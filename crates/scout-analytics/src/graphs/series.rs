use super::palette::color_for;
use super::views::{GraphDataset, GraphMode};
use crate::scoring::{Metric, TeamObservations};
use crate::stats::{MetricStatistics, StatisticsAggregator, TeamStatistics};
use std::collections::{BTreeMap, BTreeSet};

/// Everything the shape transforms need about one selected team with data.
#[derive(Debug, Clone)]
pub(crate) struct TeamSnapshot {
    pub team_number: u32,
    pub label: String,
    pub color: &'static str,
    pub metric: MetricStatistics,
    pub periods: TeamStatistics,
    pub per_match: BTreeMap<u32, f64>,
}

impl TeamSnapshot {
    /// The team's single aggregate for the selected metric.
    pub fn value(&self) -> f64 {
        match self.metric.metric {
            Metric::Consistency => self.metric.consistency,
            _ => self.metric.mean,
        }
    }
}

pub(crate) fn team_label(team_number: u32) -> String {
    format!("Team {team_number}")
}

/// Summarises each selected team once. Teams without usable observations are dropped,
/// but colours stay tied to the original selection index.
pub(crate) fn snapshots(
    aggregator: &StatisticsAggregator<'_>,
    teams: &[TeamObservations],
    metric: &Metric,
) -> Vec<TeamSnapshot> {
    teams
        .iter()
        .enumerate()
        .filter_map(|(index, team)| {
            let per_match = aggregator.per_match(&team.observations, metric);
            if per_match.is_empty() {
                return None;
            }

            Some(TeamSnapshot {
                team_number: team.team_number,
                label: team_label(team.team_number),
                color: color_for(index),
                metric: aggregator.metric_statistics(
                    team.team_number,
                    &team.observations,
                    metric,
                ),
                periods: aggregator.team_statistics(team.team_number, &team.observations),
                per_match,
            })
        })
        .collect()
}

/// Category axis plus one aligned series per team.
#[derive(Debug, Clone, Default)]
pub(crate) struct SeriesTable {
    pub category_labels: Vec<String>,
    pub datasets: Vec<GraphDataset>,
}

pub(crate) fn series_table(snapshots: &[TeamSnapshot], mode: GraphMode) -> SeriesTable {
    match mode {
        GraphMode::Averages => averages_table(snapshots),
        GraphMode::MatchByMatch => match_table(snapshots),
    }
}

/// Teams form the category axis; each team's value sits at its own category.
fn averages_table(snapshots: &[TeamSnapshot]) -> SeriesTable {
    let category_labels = snapshots.iter().map(|team| team.label.clone()).collect();
    let datasets = snapshots
        .iter()
        .enumerate()
        .map(|(position, team)| {
            let mut values = vec![f64::NAN; snapshots.len()];
            values[position] = team.value();
            dataset(team, values)
        })
        .collect();

    SeriesTable {
        category_labels,
        datasets,
    }
}

/// Union of played matches in ascending order; unplayed matches are `NaN`.
fn match_table(snapshots: &[TeamSnapshot]) -> SeriesTable {
    let matches: BTreeSet<u32> = snapshots
        .iter()
        .flat_map(|team| team.per_match.keys().copied())
        .collect();

    let category_labels = matches
        .iter()
        .map(|match_number| format!("Match {match_number}"))
        .collect();
    let datasets = snapshots
        .iter()
        .map(|team| {
            let values = matches
                .iter()
                .map(|match_number| {
                    team.per_match
                        .get(match_number)
                        .copied()
                        .unwrap_or(f64::NAN)
                })
                .collect();
            dataset(team, values)
        })
        .collect();

    SeriesTable {
        category_labels,
        datasets,
    }
}

fn dataset(team: &TeamSnapshot, values: Vec<f64>) -> GraphDataset {
    GraphDataset {
        label: team.label.clone(),
        team_number: Some(team.team_number),
        values,
        color: team.color,
    }
}
