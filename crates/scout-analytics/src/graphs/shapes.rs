use super::palette::color_for;
use super::series::{SeriesTable, TeamSnapshot};
use super::views::{GraphDataset, RadialAxis, SunburstHierarchy, WaterfallMeasure};
use crate::scoring::{Metric, Period};

pub(crate) const RADAR_AXES: [&str; 3] = ["Consistency", "Average", "Max"];
pub(crate) const SUNBURST_ROOT: &str = "All Teams";

const RADAR_MIN_RANGE: f64 = 100.0;
const RADAR_MIN_TICK: f64 = 25.0;
const RADAR_RINGS: f64 = 8.0;

fn ceil_to(value: f64, step: f64) -> f64 {
    (value / step).ceil() * step
}

/// Shared radial extent: the largest team max rounded up to a hundred, never below 100.
pub fn radar_range(max_values: impl IntoIterator<Item = f64>) -> f64 {
    let peak = max_values
        .into_iter()
        .filter(|value| value.is_finite())
        .fold(RADAR_MIN_RANGE, f64::max);
    ceil_to(peak, 100.0)
}

/// Ring spacing that keeps roughly eight rings on the axis.
pub fn radar_tick_spacing(range: f64) -> f64 {
    ceil_to(range / RADAR_RINGS, 25.0).max(RADAR_MIN_TICK)
}

/// Consistency is rescaled onto the point axis so all three spokes share one radius.
pub(crate) fn radar(
    snapshots: &[TeamSnapshot],
) -> (Vec<String>, Vec<GraphDataset>, Option<RadialAxis>) {
    if snapshots.is_empty() {
        return (Vec::new(), Vec::new(), None);
    }

    let range = radar_range(snapshots.iter().map(|team| team.metric.max));
    let datasets = snapshots
        .iter()
        .map(|team| GraphDataset {
            label: team.label.clone(),
            team_number: Some(team.team_number),
            values: vec![
                team.metric.consistency.clamp(0.0, 1.0) * range,
                team.metric.mean,
                team.metric.max,
            ],
            color: team.color,
        })
        .collect();

    let axis = RadialAxis {
        range,
        tick_spacing: radar_tick_spacing(range),
    };

    (
        RADAR_AXES.iter().map(|axis| axis.to_string()).collect(),
        datasets,
        Some(axis),
    )
}

/// Drops gaps from every series and removes series left empty.
pub(crate) fn violin(table: SeriesTable) -> SeriesTable {
    let datasets = table
        .datasets
        .into_iter()
        .filter_map(|mut dataset| {
            dataset.values.retain(|value| value.is_finite());
            (!dataset.values.is_empty()).then_some(dataset)
        })
        .collect();

    SeriesTable {
        category_labels: table.category_labels,
        datasets,
    }
}

/// Periods a metric is made of; only these become a team's sunburst children.
fn child_periods(metric: &Metric) -> &'static [Period] {
    match metric {
        Metric::TotalPoints => &[Period::Auto, Period::Teleop, Period::Endgame],
        Metric::AutoPoints => &[Period::Auto],
        Metric::TeleopPoints => &[Period::Teleop],
        Metric::EndgamePoints => &[Period::Endgame],
        Metric::Consistency | Metric::Field(_) => &[],
    }
}

/// Root, one node per team and up to three period children per team.
///
/// Children are the period averages the metric is built from, so a team node keeps
/// the metric's own value. It is only raised to the children's sum to absorb rounding,
/// so "total" branch values always hold.
pub(crate) fn sunburst(
    snapshots: &[TeamSnapshot],
) -> (Vec<String>, Vec<GraphDataset>, Option<SunburstHierarchy>) {
    if snapshots.is_empty() {
        return (Vec::new(), Vec::new(), None);
    }

    let mut hierarchy = SunburstHierarchy {
        branch_values: "total",
        ..SunburstHierarchy::default()
    };
    hierarchy.push(
        SUNBURST_ROOT.to_string(),
        SUNBURST_ROOT.to_string(),
        String::new(),
        0.0,
    );

    let mut datasets = Vec::with_capacity(snapshots.len());
    let mut root_total = 0.0;
    for team in snapshots {
        let children: Vec<(Period, f64)> = child_periods(&team.metric.metric)
            .iter()
            .map(|&period| (period, team.periods.period(period).mean))
            .filter(|(_, value)| *value > 0.0)
            .collect();
        let children_total: f64 = children.iter().map(|(_, value)| value).sum();
        let team_value = team.value().max(children_total).max(0.0);

        hierarchy.push(
            team.label.clone(),
            team.label.clone(),
            SUNBURST_ROOT.to_string(),
            team_value,
        );
        for (period, value) in children {
            hierarchy.push(
                format!("{} - {}", team.label, period.label()),
                period.label().to_string(),
                team.label.clone(),
                value,
            );
        }

        root_total += team_value;
        datasets.push(GraphDataset {
            label: team.label.clone(),
            team_number: Some(team.team_number),
            values: vec![team_value],
            color: team.color,
        });
    }
    hierarchy.values[0] = root_total;

    debug_assert!(hierarchy
        .ids
        .iter()
        .zip(&hierarchy.values)
        .all(|(id, value)| *value + 1e-9 >= hierarchy.children_total(id)));

    let labels = snapshots.iter().map(|team| team.label.clone()).collect();
    (labels, datasets, Some(hierarchy))
}

/// Waterfall payload: one category, measure and colour per step.
pub(crate) struct WaterfallSteps {
    pub labels: Vec<String>,
    pub datasets: Vec<GraphDataset>,
    pub measures: Vec<WaterfallMeasure>,
    pub colors: Vec<&'static str>,
}

/// One relative step per team; the final step always closes as a total.
pub(crate) fn waterfall(snapshots: &[TeamSnapshot], metric_label: &str) -> WaterfallSteps {
    if snapshots.is_empty() {
        return WaterfallSteps {
            labels: Vec::new(),
            datasets: Vec::new(),
            measures: Vec::new(),
            colors: Vec::new(),
        };
    }

    let mut measures = vec![WaterfallMeasure::Relative; snapshots.len()];
    if let Some(last) = measures.last_mut() {
        *last = WaterfallMeasure::Total;
    }

    let dataset = GraphDataset {
        label: metric_label.to_string(),
        team_number: None,
        values: snapshots.iter().map(TeamSnapshot::value).collect(),
        color: color_for(0),
    };

    WaterfallSteps {
        labels: snapshots.iter().map(|team| team.label.clone()).collect(),
        datasets: vec![dataset],
        measures,
        colors: snapshots.iter().map(|team| team.color).collect(),
    }
}
