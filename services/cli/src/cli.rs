use crate::commands::{
    run_graph, run_predict, run_score, run_stats, GraphArgs, PredictArgs, ScoreArgs, StatsArgs,
};
use clap::{Parser, Subcommand};
use scout_analytics::config::AppConfig;
use scout_analytics::error::AppError;
use scout_analytics::telemetry;
use tracing::debug;

#[derive(Parser, Debug)]
#[command(
    name = "scout",
    about = "Score scouting data, compare teams and predict match outcomes",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Score every observation against the schema
    Score(ScoreArgs),
    /// Rank teams by average points with per-period statistics
    Stats(StatsArgs),
    /// Build comparison graph payloads as JSON
    Graph(GraphArgs),
    /// Project an alliance-versus-alliance match
    Predict(PredictArgs),
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    debug!(environment = ?config.environment, "configuration loaded");

    match cli.command {
        Command::Score(args) => run_score(args, &config).await,
        Command::Stats(args) => run_stats(args, &config).await,
        Command::Graph(args) => run_graph(args, &config).await,
        Command::Predict(args) => run_predict(args, &config).await,
    }
}
