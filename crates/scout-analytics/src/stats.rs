use crate::scoring::{Metric, MetricResolver, Observation, Period, ScoringEvaluator};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Mean, sample deviation and peak of a series with non-finite entries excluded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SeriesSummary {
    pub sample_count: usize,
    pub mean: f64,
    pub std_dev: f64,
    pub max: f64,
}

impl SeriesSummary {
    pub fn has_data(&self) -> bool {
        self.sample_count > 0
    }

    /// Coefficient-of-variation heuristic in `[0, 1]`; only meaningful for point totals.
    pub fn consistency(&self) -> f64 {
        consistency_score(self.mean, self.std_dev)
    }
}

/// Summarises `values`, ignoring NaN and infinite entries.
///
/// An empty series has mean 0 and a single sample has deviation 0.
pub fn aggregate(values: &[f64]) -> SeriesSummary {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() {
        return SeriesSummary::default();
    }

    let n = finite.len() as f64;
    let mean = finite.iter().sum::<f64>() / n;
    let std_dev = if finite.len() < 2 {
        0.0
    } else {
        let squared: f64 = finite.iter().map(|v| (v - mean).powi(2)).sum();
        (squared / (n - 1.0)).sqrt()
    };
    let max = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    SeriesSummary {
        sample_count: finite.len(),
        mean,
        std_dev,
        max,
    }
}

/// `1 / (1 + cv)` clamped to `[0, 1]`; zero when the mean is not positive.
pub fn consistency_score(mean: f64, std_dev: f64) -> f64 {
    if mean <= 0.0 || !mean.is_finite() {
        return 0.0;
    }

    let cv = std_dev / mean;
    if !cv.is_finite() {
        return 0.0;
    }

    (1.0 / (1.0 + cv)).clamp(0.0, 1.0)
}

/// One metric summarised for one team.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricStatistics {
    pub team_number: u32,
    pub metric: Metric,
    pub sample_count: usize,
    pub mean: f64,
    pub std_dev: f64,
    pub max: f64,
    /// Derived from total points regardless of `metric`.
    pub consistency: f64,
}

/// Per-period point summaries for one team, the input to match prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamStatistics {
    pub team_number: u32,
    pub sample_count: usize,
    pub auto: SeriesSummary,
    pub teleop: SeriesSummary,
    pub endgame: SeriesSummary,
    pub total: SeriesSummary,
    pub consistency: f64,
}

impl TeamStatistics {
    pub fn has_data(&self) -> bool {
        self.sample_count > 0
    }

    pub fn period(&self, period: Period) -> &SeriesSummary {
        match period {
            Period::Auto => &self.auto,
            Period::Teleop => &self.teleop,
            Period::Endgame => &self.endgame,
        }
    }
}

/// Turns observations into team summaries using one schema.
#[derive(Debug, Clone, Copy)]
pub struct StatisticsAggregator<'a> {
    evaluator: &'a ScoringEvaluator,
}

impl<'a> StatisticsAggregator<'a> {
    pub fn new(evaluator: &'a ScoringEvaluator) -> Self {
        Self { evaluator }
    }

    pub fn team_statistics(
        &self,
        team_number: u32,
        observations: &[Observation],
    ) -> TeamStatistics {
        let breakdowns: Vec<_> = observations
            .iter()
            .map(|observation| self.evaluator.breakdown(&observation.fields))
            .collect();

        let series = |pick: fn(&crate::scoring::PointBreakdown) -> f64| -> Vec<f64> {
            breakdowns.iter().map(pick).collect()
        };

        let total = aggregate(&series(|b| b.total));

        TeamStatistics {
            team_number,
            sample_count: total.sample_count,
            auto: aggregate(&series(|b| b.auto)),
            teleop: aggregate(&series(|b| b.teleop)),
            endgame: aggregate(&series(|b| b.endgame)),
            total,
            consistency: total.consistency(),
        }
    }

    pub fn metric_statistics(
        &self,
        team_number: u32,
        observations: &[Observation],
        metric: &Metric,
    ) -> MetricStatistics {
        let resolver = MetricResolver::new(self.evaluator);
        let values: Vec<f64> = observations
            .iter()
            .filter_map(|observation| resolver.resolve_present(metric, &observation.fields))
            .collect();
        let totals: Vec<f64> = observations
            .iter()
            .map(|observation| self.evaluator.total(&observation.fields))
            .collect();

        let summary = aggregate(&values);
        let consistency = aggregate(&totals).consistency();

        MetricStatistics {
            team_number,
            metric: metric.clone(),
            sample_count: summary.sample_count,
            mean: summary.mean,
            std_dev: summary.std_dev,
            max: summary.max,
            consistency,
        }
    }

    /// Metric value per match number; several observations of one match are averaged.
    ///
    /// Observations that never recorded a raw-field metric are left out, so a field no
    /// observation carries yields an empty map.
    pub fn per_match(&self, observations: &[Observation], metric: &Metric) -> BTreeMap<u32, f64> {
        let resolver = MetricResolver::new(self.evaluator);
        let mut grouped: BTreeMap<u32, Vec<f64>> = BTreeMap::new();
        for observation in observations {
            if let Some(value) = resolver.resolve_present(metric, &observation.fields) {
                grouped
                    .entry(observation.match_number)
                    .or_default()
                    .push(value);
            }
        }

        grouped
            .into_iter()
            .filter_map(|(match_number, values)| {
                let summary = aggregate(&values);
                summary.has_data().then_some((match_number, summary.mean))
            })
            .collect()
    }
}

/// Orders teams by mean total points, best first; ties fall back to team number.
pub fn rank_teams(mut statistics: Vec<TeamStatistics>) -> Vec<TeamStatistics> {
    statistics.sort_by(|a, b| {
        b.total
            .mean
            .partial_cmp(&a.total.mean)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.team_number.cmp(&b.team_number))
    });
    statistics
}
