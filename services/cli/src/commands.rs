use crate::sources::load_observations;
use chrono::Local;
use clap::Args;
use scout_analytics::config::AppConfig;
use scout_analytics::error::AppError;
use scout_analytics::graphs::{ComparisonGraphBuilder, GraphMode, GraphShape};
use scout_analytics::ingest::load_schema;
use scout_analytics::prediction::{Alliance, MatchPrediction, MatchPredictor};
use scout_analytics::scoring::{Metric, Observation, ScoringEvaluator, TeamObservations};
use scout_analytics::stats::{rank_teams, MetricStatistics, StatisticsAggregator, TeamStatistics};
use std::collections::{BTreeSet, HashMap};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct DataArgs {
    /// Scoring schema (JSON) listing every element and its point value
    #[arg(long)]
    pub(crate) schema: PathBuf,
    /// Observation export (CSV or JSON); repeat to merge several sources
    #[arg(long = "observations", required = true)]
    pub(crate) observations: Vec<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    #[command(flatten)]
    pub(crate) data: DataArgs,
    /// Only score observations of this team
    #[arg(long)]
    pub(crate) team: Option<u32>,
    /// List the points contributed by every element
    #[arg(long)]
    pub(crate) explain: bool,
    /// Print JSON instead of a text report
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct StatsArgs {
    #[command(flatten)]
    pub(crate) data: DataArgs,
    /// Teams to include (comma separated). Defaults to every scouted team.
    #[arg(long, value_delimiter = ',')]
    pub(crate) teams: Vec<u32>,
    /// Metric summarised next to the period breakdown (defaults to SCOUT_DEFAULT_METRIC)
    #[arg(long)]
    pub(crate) metric: Option<String>,
    /// Print JSON instead of a text report
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct GraphArgs {
    #[command(flatten)]
    pub(crate) data: DataArgs,
    /// Teams to compare in colour order (comma separated). Defaults to every scouted team.
    #[arg(long, value_delimiter = ',')]
    pub(crate) teams: Vec<u32>,
    /// Shape to build; repeat for several. Defaults to every shape.
    #[arg(long = "shape", value_parser = parse_shape)]
    pub(crate) shapes: Vec<GraphShape>,
    /// Metric to plot (defaults to SCOUT_DEFAULT_METRIC)
    #[arg(long)]
    pub(crate) metric: Option<String>,
    /// `averages` or `match_by_match` (defaults to SCOUT_DEFAULT_MODE)
    #[arg(long, value_parser = parse_mode)]
    pub(crate) mode: Option<GraphMode>,
}

#[derive(Args, Debug)]
pub(crate) struct PredictArgs {
    #[command(flatten)]
    pub(crate) data: DataArgs,
    /// Red alliance team numbers (comma separated)
    #[arg(long, value_delimiter = ',', required = true)]
    pub(crate) red: Vec<u32>,
    /// Blue alliance team numbers (comma separated)
    #[arg(long, value_delimiter = ',', required = true)]
    pub(crate) blue: Vec<u32>,
    /// Print JSON instead of a text report
    #[arg(long)]
    pub(crate) json: bool,
}

fn parse_shape(raw: &str) -> Result<GraphShape, String> {
    raw.parse()
}

fn parse_mode(raw: &str) -> Result<GraphMode, String> {
    raw.parse()
}

async fn prepare(
    data: &DataArgs,
    config: &AppConfig,
) -> Result<(ScoringEvaluator, Vec<Observation>), AppError> {
    let schema = load_schema(&data.schema)?;
    let observations =
        load_observations(&data.observations, config.analytics.load_timeout()).await?;
    Ok((ScoringEvaluator::new(schema), observations))
}

/// Requested teams, or every team present in ascending order.
fn team_selection(requested: &[u32], observations: &[Observation]) -> Vec<u32> {
    if !requested.is_empty() {
        return requested.to_vec();
    }

    observations
        .iter()
        .map(|observation| observation.team_number)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), AppError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub(crate) async fn run_score(args: ScoreArgs, config: &AppConfig) -> Result<(), AppError> {
    let (evaluator, observations) = prepare(&args.data, config).await?;

    let scored: Vec<_> = observations
        .iter()
        .filter(|observation| args.team.map_or(true, |team| observation.team_number == team))
        .map(|observation| evaluator.score(observation))
        .collect();

    if args.json {
        return print_json(&scored);
    }

    println!(
        "Scored {} observation(s) | generated {}",
        scored.len(),
        Local::now().format("%Y-%m-%d %H:%M")
    );
    for row in &scored {
        let points = &row.breakdown;
        println!(
            "- Team {} match {}: auto {} | teleop {} | endgame {} | total {}",
            row.team_number,
            row.match_number,
            points.auto,
            points.teleop,
            points.endgame,
            points.total
        );
        if args.explain {
            for component in &row.components {
                println!(
                    "    [{}] {}: {}",
                    component.period.label(),
                    component.element_id,
                    component.points
                );
            }
        }
    }

    Ok(())
}

pub(crate) async fn run_stats(args: StatsArgs, config: &AppConfig) -> Result<(), AppError> {
    let (evaluator, observations) = prepare(&args.data, config).await?;
    let metric = Metric::parse(
        args.metric
            .as_deref()
            .unwrap_or(&config.analytics.default_metric),
    );

    let selection = team_selection(&args.teams, &observations);
    let teams = TeamObservations::select(&observations, &selection);
    let aggregator = StatisticsAggregator::new(&evaluator);
    let ranked = rank_teams(
        teams
            .iter()
            .map(|team| aggregator.team_statistics(team.team_number, &team.observations))
            .collect(),
    );
    let by_metric: HashMap<u32, MetricStatistics> = teams
        .iter()
        .map(|team| {
            (
                team.team_number,
                aggregator.metric_statistics(team.team_number, &team.observations, &metric),
            )
        })
        .collect();

    if args.json {
        let metric_rows: Vec<&MetricStatistics> = ranked
            .iter()
            .filter_map(|stats| by_metric.get(&stats.team_number))
            .collect();
        return print_json(&serde_json::json!({
            "ranking": ranked,
            "metric": metric_rows,
        }));
    }

    render_stats(&ranked, &by_metric, &metric);
    Ok(())
}

fn render_stats(
    ranked: &[TeamStatistics],
    by_metric: &HashMap<u32, MetricStatistics>,
    metric: &Metric,
) {
    println!(
        "Team rankings ({} team(s), metric: {}) | generated {}",
        ranked.len(),
        metric,
        Local::now().format("%Y-%m-%d %H:%M")
    );
    for (rank, stats) in ranked.iter().enumerate() {
        if !stats.has_data() {
            println!("{:>3}. Team {}: no scouting data", rank + 1, stats.team_number);
            continue;
        }

        println!(
            "{:>3}. Team {}: {:.1} ± {:.1} pts over {} observation(s) | consistency {:.0}%",
            rank + 1,
            stats.team_number,
            stats.total.mean,
            stats.total.std_dev,
            stats.sample_count,
            stats.consistency * 100.0
        );
        println!(
            "     auto {:.1} | teleop {:.1} | endgame {:.1} | best {:.0}",
            stats.auto.mean, stats.teleop.mean, stats.endgame.mean, stats.total.max
        );
        if let Some(summary) = by_metric.get(&stats.team_number) {
            println!(
                "     {}: mean {:.2} | std {:.2} | max {:.2}",
                metric, summary.mean, summary.std_dev, summary.max
            );
        }
    }
}

pub(crate) async fn run_graph(args: GraphArgs, config: &AppConfig) -> Result<(), AppError> {
    let (evaluator, observations) = prepare(&args.data, config).await?;
    let metric = Metric::parse(
        args.metric
            .as_deref()
            .unwrap_or(&config.analytics.default_metric),
    );
    let mode = args.mode.unwrap_or(config.analytics.default_mode);
    let shapes = if args.shapes.is_empty() {
        GraphShape::ordered().to_vec()
    } else {
        args.shapes
    };

    let selection = team_selection(&args.teams, &observations);
    let teams = TeamObservations::select(&observations, &selection);
    let graphs = ComparisonGraphBuilder::new(&evaluator).build_all(&shapes, &teams, &metric, mode);
    print_json(&graphs)
}

pub(crate) async fn run_predict(args: PredictArgs, config: &AppConfig) -> Result<(), AppError> {
    let (evaluator, observations) = prepare(&args.data, config).await?;

    let participants: Vec<u32> = args.red.iter().chain(&args.blue).copied().collect();
    let aggregator = StatisticsAggregator::new(&evaluator);
    let stats: HashMap<u32, TeamStatistics> =
        TeamObservations::select(&observations, &participants)
            .into_iter()
            .map(|team| {
                (
                    team.team_number,
                    aggregator.team_statistics(team.team_number, &team.observations),
                )
            })
            .collect();

    let prediction = MatchPredictor::new().predict(&args.red, &args.blue, &stats);
    if args.json {
        return print_json(&prediction);
    }

    render_prediction(&prediction);
    Ok(())
}

fn render_prediction(prediction: &MatchPrediction) {
    println!(
        "Match prediction | generated {}",
        Local::now().format("%Y-%m-%d %H:%M")
    );

    for (alliance, projection, probability) in [
        (Alliance::Red, &prediction.red, prediction.red_win_probability),
        (Alliance::Blue, &prediction.blue, prediction.blue_win_probability),
    ] {
        let roster: Vec<String> = projection.teams.iter().map(u32::to_string).collect();
        println!(
            "{} alliance ({}): {:.1} ± {:.1} pts | win {:.1}%",
            alliance.label(),
            roster.join(", "),
            projection.total,
            projection.std_dev,
            probability * 100.0
        );
        for team in prediction
            .per_team_prediction
            .iter()
            .filter(|team| team.alliance == alliance)
        {
            if team.has_data {
                println!(
                    "  - Team {}: auto {:.1} | teleop {:.1} | endgame {:.1} | total {:.1} ± {:.1}",
                    team.team_number, team.auto, team.teleop, team.endgame, team.total, team.std_dev
                );
            } else {
                println!("  - Team {}: no scouting data", team.team_number);
            }
        }
    }

    match prediction.favored() {
        Some(alliance) => println!("Favored: {}", alliance.label()),
        None => println!("Favored: even"),
    }
    if let Some(warning) = &prediction.warning {
        println!("Warning: {warning}");
    }
}
