mod palette;
mod series;
mod shapes;
pub mod views;

pub use palette::{color_for, PALETTE};
pub use shapes::{radar_range, radar_tick_spacing};
pub use views::{
    GraphData, GraphDataset, GraphMode, GraphShape, RadialAxis, SunburstHierarchy,
    WaterfallMeasure,
};

use crate::scoring::{Metric, ScoringEvaluator, TeamObservations};
use crate::stats::StatisticsAggregator;
use series::{series_table, snapshots, TeamSnapshot};
use tracing::debug;

/// Turns selected teams' observations into chart-ready data for one metric.
pub struct ComparisonGraphBuilder<'a> {
    aggregator: StatisticsAggregator<'a>,
}

impl<'a> ComparisonGraphBuilder<'a> {
    pub fn new(evaluator: &'a ScoringEvaluator) -> Self {
        Self {
            aggregator: StatisticsAggregator::new(evaluator),
        }
    }

    pub fn build(
        &self,
        shape: GraphShape,
        teams: &[TeamObservations],
        metric: &Metric,
        mode: GraphMode,
    ) -> GraphData {
        let snapshots = snapshots(&self.aggregator, teams, metric);
        render(shape, &snapshots, metric, mode)
    }

    /// Builds several shapes from one pass over the observations.
    pub fn build_all(
        &self,
        shapes: &[GraphShape],
        teams: &[TeamObservations],
        metric: &Metric,
        mode: GraphMode,
    ) -> Vec<GraphData> {
        let snapshots = snapshots(&self.aggregator, teams, metric);
        shapes
            .iter()
            .map(|shape| render(*shape, &snapshots, metric, mode))
            .collect()
    }
}

fn render(
    shape: GraphShape,
    snapshots: &[TeamSnapshot],
    metric: &Metric,
    mode: GraphMode,
) -> GraphData {
    let mut graph = GraphData::empty(shape, mode, metric.label());

    match shape {
        GraphShape::Line
        | GraphShape::Bar
        | GraphShape::Scatter
        | GraphShape::Hist
        | GraphShape::Box => {
            let table = series_table(snapshots, mode);
            graph.category_labels = table.category_labels;
            graph.datasets = table.datasets;
        }
        GraphShape::Violin => {
            let table = shapes::violin(series_table(snapshots, mode));
            graph.category_labels = table.category_labels;
            graph.datasets = table.datasets;
        }
        GraphShape::Radar => {
            let (labels, datasets, axis) = shapes::radar(snapshots);
            graph.category_labels = labels;
            graph.datasets = datasets;
            graph.radial_axis = axis;
        }
        GraphShape::Sunburst => {
            let (labels, datasets, hierarchy) = shapes::sunburst(snapshots);
            graph.category_labels = labels;
            graph.datasets = datasets;
            graph.hierarchy = hierarchy;
        }
        GraphShape::Waterfall => {
            let steps = shapes::waterfall(snapshots, metric.label());
            graph.category_labels = steps.labels;
            graph.datasets = steps.datasets;
            graph.measures = steps.measures;
            graph.category_colors = steps.colors;
        }
    }

    if graph.is_empty() {
        graph.category_labels.clear();
    }

    debug!(
        shape = %shape,
        mode = %mode,
        metric = %metric,
        teams = snapshots.len(),
        datasets = graph.datasets.len(),
        "built comparison graph"
    );

    graph
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::{Observation, ScoringElement, ScoringSchema};

    fn evaluator() -> ScoringEvaluator {
        ScoringEvaluator::new(ScoringSchema {
            auto_elements: vec![ScoringElement::counter("a1", 4.0)],
            teleop_elements: vec![ScoringElement::counter("t1", 2.0)],
            endgame_elements: vec![ScoringElement::boolean("e1", 10.0)],
            post_match_elements: Vec::new(),
        })
    }

    fn observation(team: u32, match_number: u32, a1: i64, t1: i64, e1: bool) -> Observation {
        Observation::new(team, match_number)
            .with_field("a1", a1)
            .with_field("t1", t1)
            .with_field("e1", e1)
    }

    fn teams() -> Vec<TeamObservations> {
        vec![
            TeamObservations::new(
                254,
                vec![observation(254, 1, 3, 10, true), observation(254, 4, 2, 8, true)],
            ),
            TeamObservations::new(
                1678,
                vec![observation(1678, 2, 1, 5, false), observation(1678, 4, 2, 6, true)],
            ),
        ]
    }

    #[test]
    fn averages_place_each_team_on_its_own_category() {
        let evaluator = evaluator();
        let builder = ComparisonGraphBuilder::new(&evaluator);
        let graph = builder.build(
            GraphShape::Scatter,
            &teams(),
            &Metric::TotalPoints,
            GraphMode::Averages,
        );

        assert_eq!(graph.category_labels, vec!["Team 254", "Team 1678"]);
        let first = graph.dataset_for(254).expect("team 254 plotted");
        assert_eq!(first.values[0], 38.0);
        assert!(first.values[1].is_nan());
        let second = graph.dataset_for(1678).expect("team 1678 plotted");
        assert!(second.values[0].is_nan());
        assert_eq!(second.values[1], 22.0);
    }

    #[test]
    fn match_mode_aligns_sparse_matches() {
        let evaluator = evaluator();
        let builder = ComparisonGraphBuilder::new(&evaluator);
        let graph = builder.build(
            GraphShape::Line,
            &teams(),
            &Metric::AutoPoints,
            GraphMode::MatchByMatch,
        );

        assert_eq!(graph.category_labels, vec!["Match 1", "Match 2", "Match 4"]);
        for dataset in &graph.datasets {
            assert_eq!(dataset.values.len(), graph.category_labels.len());
        }
        let first = graph.dataset_for(254).expect("team 254 plotted");
        assert_eq!(first.values[0], 12.0);
        assert!(first.values[1].is_nan());
        assert_eq!(first.values[2], 8.0);
    }

    #[test]
    fn violin_filters_gaps() {
        let evaluator = evaluator();
        let builder = ComparisonGraphBuilder::new(&evaluator);
        let graph = builder.build(
            GraphShape::Violin,
            &teams(),
            &Metric::TotalPoints,
            GraphMode::MatchByMatch,
        );

        assert_eq!(graph.datasets.len(), 2);
        assert!(graph
            .datasets
            .iter()
            .all(|dataset| dataset.values.len() == 2
                && dataset.values.iter().all(|value| value.is_finite())));
    }

    #[test]
    fn colours_follow_selection_order_across_shapes() {
        let evaluator = evaluator();
        let builder = ComparisonGraphBuilder::new(&evaluator);
        let mut selection = teams();
        selection.insert(0, TeamObservations::new(118, Vec::new()));

        let graphs = builder.build_all(
            &[GraphShape::Bar, GraphShape::Radar, GraphShape::Sunburst],
            &selection,
            &Metric::TotalPoints,
            GraphMode::Averages,
        );

        for graph in &graphs {
            assert!(graph.dataset_for(118).is_none());
            assert_eq!(graph.dataset_for(254).map(|d| d.color), Some(color_for(1)));
            assert_eq!(graph.dataset_for(1678).map(|d| d.color), Some(color_for(2)));
        }

        let waterfall = builder.build(
            GraphShape::Waterfall,
            &selection,
            &Metric::TotalPoints,
            GraphMode::Averages,
        );
        assert_eq!(waterfall.category_labels, vec!["Team 254", "Team 1678"]);
        assert_eq!(waterfall.category_colors, vec![color_for(1), color_for(2)]);
    }

    #[test]
    fn consistency_metric_plots_team_consistency() {
        let evaluator = evaluator();
        let builder = ComparisonGraphBuilder::new(&evaluator);
        let graph = builder.build(
            GraphShape::Bar,
            &teams(),
            &Metric::Consistency,
            GraphMode::Averages,
        );

        let value = graph.dataset_for(254).expect("team 254 plotted").values[0];
        assert!(value > 0.0 && value <= 1.0);
    }

    #[test]
    fn empty_selection_yields_no_datasets() {
        let evaluator = evaluator();
        let builder = ComparisonGraphBuilder::new(&evaluator);
        for shape in GraphShape::ordered() {
            for mode in [GraphMode::Averages, GraphMode::MatchByMatch] {
                let none = builder.build(shape, &[], &Metric::TotalPoints, mode);
                assert!(none.is_empty(), "{shape} with no teams");
                assert!(none.category_labels.is_empty());

                let idle = builder.build(
                    shape,
                    &[TeamObservations::new(7, Vec::new())],
                    &Metric::TotalPoints,
                    mode,
                );
                assert!(idle.is_empty(), "{shape} with empty observations");
            }
        }
    }
}
