use scout_analytics::graphs::{
    color_for, ComparisonGraphBuilder, GraphMode, GraphShape, WaterfallMeasure,
};
use scout_analytics::scoring::{
    Metric, Observation, ScoringElement, ScoringEvaluator, ScoringSchema, TeamObservations,
};

fn evaluator() -> ScoringEvaluator {
    ScoringEvaluator::new(ScoringSchema {
        auto_elements: vec![ScoringElement::counter("auto_notes", 5.0)],
        teleop_elements: vec![ScoringElement::counter("teleop_notes", 2.0)],
        endgame_elements: vec![ScoringElement::boolean("climb", 15.0)],
        post_match_elements: Vec::new(),
    })
}

fn entry(team: u32, match_number: u32, auto: i64, teleop: i64, climb: bool) -> Observation {
    Observation::new(team, match_number)
        .with_field("auto_notes", auto)
        .with_field("teleop_notes", teleop)
        .with_field("climb", climb)
}

fn selection() -> Vec<TeamObservations> {
    vec![
        TeamObservations::new(
            2056,
            vec![
                entry(2056, 1, 4, 40, true),
                entry(2056, 5, 5, 50, true),
                entry(2056, 9, 3, 45, true),
            ],
        ),
        TeamObservations::new(
            1114,
            vec![entry(1114, 2, 2, 20, false), entry(1114, 5, 1, 30, true)],
        ),
        TeamObservations::new(4917, Vec::new()),
        TeamObservations::new(
            610,
            vec![entry(610, 9, 0, 5, false), entry(610, 12, 0, 0, false)],
        ),
    ]
}

#[test]
fn radar_rescales_consistency_onto_point_axis() {
    let evaluator = evaluator();
    let graph = ComparisonGraphBuilder::new(&evaluator).build(
        GraphShape::Radar,
        &selection(),
        &Metric::TotalPoints,
        GraphMode::MatchByMatch,
    );

    assert_eq!(graph.category_labels, vec!["Consistency", "Average", "Max"]);
    let axis = graph.radial_axis.expect("radar carries a radial axis");
    // 2056 peaks at 5*5 + 50*2 + 15 = 140.
    assert_eq!(axis.range, 200.0);
    assert_eq!(axis.tick_spacing, 25.0);
    assert!(axis.range >= 100.0);

    for dataset in &graph.datasets {
        assert_eq!(dataset.values.len(), 3);
        assert!(dataset.values[0] >= 0.0 && dataset.values[0] <= axis.range);
    }

    let top = graph.dataset_for(2056).expect("2056 plotted");
    assert_eq!(top.values[2], 140.0);
    assert!((top.values[1] - (115.0 + 140.0 + 120.0) / 3.0).abs() < 1e-9);
}

#[test]
fn radar_range_never_drops_below_one_hundred() {
    let evaluator = evaluator();
    let graph = ComparisonGraphBuilder::new(&evaluator).build(
        GraphShape::Radar,
        &[TeamObservations::new(610, vec![entry(610, 9, 0, 5, false)])],
        &Metric::TotalPoints,
        GraphMode::Averages,
    );

    let axis = graph.radial_axis.expect("radar carries a radial axis");
    assert_eq!(axis.range, 100.0);
    // 10 points with no variance is perfectly consistent.
    assert_eq!(graph.datasets[0].values[0], 100.0);
}

#[test]
fn distribution_shapes_reuse_line_series() {
    let evaluator = evaluator();
    let builder = ComparisonGraphBuilder::new(&evaluator);
    let graphs = builder.build_all(
        &[GraphShape::Line, GraphShape::Hist, GraphShape::Box],
        &selection(),
        &Metric::TeleopPoints,
        GraphMode::MatchByMatch,
    );

    let line = &graphs[0];
    assert_eq!(
        line.category_labels,
        vec!["Match 1", "Match 2", "Match 5", "Match 9", "Match 12"]
    );
    for graph in &graphs[1..] {
        assert_eq!(graph.category_labels, line.category_labels);
        assert_eq!(graph.datasets.len(), line.datasets.len());
        for (left, right) in graph.datasets.iter().zip(&line.datasets) {
            assert_eq!(left.label, right.label);
            assert_eq!(left.color, right.color);
            assert_eq!(left.values.len(), right.values.len());
            for (a, b) in left.values.iter().zip(&right.values) {
                assert!(a == b || (a.is_nan() && b.is_nan()));
            }
        }
    }
}

#[test]
fn violin_drops_series_that_filter_to_nothing() {
    let evaluator = evaluator();
    let graph = ComparisonGraphBuilder::new(&evaluator).build(
        GraphShape::Violin,
        &selection(),
        &Metric::AutoPoints,
        GraphMode::MatchByMatch,
    );

    // 4917 has no observations; everyone else keeps only real matches.
    assert_eq!(graph.datasets.len(), 3);
    assert_eq!(graph.dataset_for(2056).map(|d| d.values.len()), Some(3));
    assert_eq!(graph.dataset_for(1114).map(|d| d.values.len()), Some(2));
}

#[test]
fn sunburst_parents_cover_their_children() {
    let evaluator = evaluator();
    let graph = ComparisonGraphBuilder::new(&evaluator).build(
        GraphShape::Sunburst,
        &selection(),
        &Metric::TotalPoints,
        GraphMode::Averages,
    );

    let hierarchy = graph.hierarchy.as_ref().expect("sunburst hierarchy");
    assert_eq!(hierarchy.branch_values, "total");
    assert_eq!(hierarchy.labels[0], "All Teams");
    assert_eq!(hierarchy.parents[0], "");

    for (id, value) in hierarchy.ids.iter().zip(&hierarchy.values) {
        assert!(*value + 1e-9 >= hierarchy.children_total(id), "{id} covers children");
    }

    // 610 never scores in auto or endgame, so it only gets a teleop child.
    let children_of_610: Vec<&String> = hierarchy
        .parents
        .iter()
        .zip(&hierarchy.labels)
        .filter(|(parent, _)| parent.as_str() == "Team 610")
        .map(|(_, label)| label)
        .collect();
    assert_eq!(children_of_610, vec!["Teleop"]);

    // 2056: auto 20, teleop 90, endgame 15.
    let index = hierarchy
        .ids
        .iter()
        .position(|id| id == "Team 2056")
        .expect("team node present");
    assert!((hierarchy.values[index] - 125.0).abs() < 1e-9);
}

#[test]
fn sunburst_team_value_covers_children_for_raw_metrics() {
    let evaluator = evaluator();
    let graph = ComparisonGraphBuilder::new(&evaluator).build(
        GraphShape::Sunburst,
        &selection(),
        &Metric::parse("auto_notes"),
        GraphMode::Averages,
    );

    let hierarchy = graph.hierarchy.as_ref().expect("sunburst hierarchy");
    for (id, value) in hierarchy.ids.iter().zip(&hierarchy.values) {
        assert!(*value + 1e-9 >= hierarchy.children_total(id), "{id} covers children");
    }
}

#[test]
fn waterfall_closes_with_a_total_step() {
    let evaluator = evaluator();
    let graph = ComparisonGraphBuilder::new(&evaluator).build(
        GraphShape::Waterfall,
        &selection(),
        &Metric::TotalPoints,
        GraphMode::Averages,
    );

    assert_eq!(
        graph.category_labels,
        vec!["Team 2056", "Team 1114", "Team 610"]
    );
    assert_eq!(
        graph.measures,
        vec![
            WaterfallMeasure::Relative,
            WaterfallMeasure::Relative,
            WaterfallMeasure::Total
        ]
    );
    assert_eq!(graph.datasets.len(), 1);
    assert_eq!(graph.datasets[0].values.len(), 3);
}

#[test]
fn sunburst_children_follow_the_selected_metric() {
    let evaluator = evaluator();
    let graph = ComparisonGraphBuilder::new(&evaluator).build(
        GraphShape::Sunburst,
        &selection(),
        &Metric::AutoPoints,
        GraphMode::Averages,
    );

    let hierarchy = graph.hierarchy.as_ref().expect("sunburst hierarchy");
    let index = hierarchy
        .ids
        .iter()
        .position(|id| id == "Team 2056")
        .expect("team node present");
    // Auto only: (20 + 25 + 15) / 3.
    assert!((hierarchy.values[index] - 20.0).abs() < 1e-9);

    let children: Vec<&String> = hierarchy
        .parents
        .iter()
        .zip(&hierarchy.labels)
        .filter(|(parent, _)| parent.as_str() == "Team 2056")
        .map(|(_, label)| label)
        .collect();
    assert_eq!(children, vec!["Auto"]);
}

#[test]
fn metric_missing_from_every_observation_draws_nothing() {
    let evaluator = evaluator();
    let builder = ComparisonGraphBuilder::new(&evaluator);
    let metric = Metric::parse("no_such_field");

    for mode in [GraphMode::Averages, GraphMode::MatchByMatch] {
        for graph in builder.build_all(&GraphShape::ordered(), &selection(), &metric, mode) {
            assert!(graph.is_empty(), "{} should have no datasets", graph.shape);
            assert!(graph.category_labels.is_empty());
            assert!(graph.radial_axis.is_none());
            assert!(graph.hierarchy.is_none());
            assert!(graph.measures.is_empty());
        }
    }
}

#[test]
fn teams_without_the_metric_drop_out() {
    let evaluator = evaluator();
    let teams = vec![
        TeamObservations::new(7, vec![Observation::new(7, 1).with_field("a1", 3_i64)]),
        TeamObservations::new(
            118,
            vec![Observation::new(118, 2).with_field("defense", 4_i64)],
        ),
    ];

    let graph = ComparisonGraphBuilder::new(&evaluator).build(
        GraphShape::Radar,
        &teams,
        &Metric::parse("defense"),
        GraphMode::MatchByMatch,
    );
    assert_eq!(graph.datasets.len(), 1);
    assert!(graph.dataset_for(7).is_none());
    assert_eq!(graph.dataset_for(118).map(|d| d.color), Some(color_for(1)));
}

#[test]
fn colours_are_tied_to_selection_index() {
    let evaluator = evaluator();
    let graph = ComparisonGraphBuilder::new(&evaluator).build(
        GraphShape::Bar,
        &selection(),
        &Metric::TotalPoints,
        GraphMode::Averages,
    );

    assert_eq!(graph.dataset_for(2056).map(|d| d.color), Some(color_for(0)));
    assert_eq!(graph.dataset_for(1114).map(|d| d.color), Some(color_for(1)));
    assert_eq!(graph.dataset_for(610).map(|d| d.color), Some(color_for(3)));

    let waterfall = ComparisonGraphBuilder::new(&evaluator).build(
        GraphShape::Waterfall,
        &selection(),
        &Metric::TotalPoints,
        GraphMode::Averages,
    );
    assert_eq!(
        waterfall.category_colors,
        vec![color_for(0), color_for(1), color_for(3)]
    );
}

#[test]
fn graph_serializes_gaps_as_null() {
    let evaluator = evaluator();
    let graph = ComparisonGraphBuilder::new(&evaluator).build(
        GraphShape::Line,
        &selection(),
        &Metric::TotalPoints,
        GraphMode::MatchByMatch,
    );

    let json = serde_json::to_value(&graph).expect("graph serializes");
    assert_eq!(json["shape"], "line");
    assert_eq!(json["mode"], "match_by_match");
    assert!(json["datasets"][0]["values"][1].is_null());
    assert!(json.get("radial_axis").is_none());
}
