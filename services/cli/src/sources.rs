use scout_analytics::error::AppError;
use scout_analytics::ingest::{IngestError, ObservationImporter, SourceFormat};
use scout_analytics::scoring::Observation;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::task::JoinSet;
use tracing::{info, warn};

#[derive(Debug)]
enum SourceFailure {
    Read(std::io::Error),
    Parse(IngestError),
    TimedOut(Duration),
}

impl fmt::Display for SourceFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceFailure::Read(err) => write!(f, "could not read source: {err}"),
            SourceFailure::Parse(err) => write!(f, "{err}"),
            SourceFailure::TimedOut(limit) => {
                write!(f, "gave up after {} ms", limit.as_millis())
            }
        }
    }
}

async fn load_source(path: &Path, limit: Duration) -> Result<Vec<Observation>, SourceFailure> {
    let bytes = tokio::time::timeout(limit, tokio::fs::read(path))
        .await
        .map_err(|_| SourceFailure::TimedOut(limit))?
        .map_err(SourceFailure::Read)?;

    ObservationImporter::from_format(bytes.as_slice(), SourceFormat::for_path(path))
        .map_err(SourceFailure::Parse)
}

/// Reads every source concurrently and merges whatever arrives in time.
///
/// A source that fails or exceeds `limit` is logged and skipped. The call only
/// fails when no source at all could be loaded.
pub(crate) async fn load_observations(
    paths: &[PathBuf],
    limit: Duration,
) -> Result<Vec<Observation>, AppError> {
    let mut tasks = JoinSet::new();
    for path in paths.iter().cloned() {
        tasks.spawn(async move {
            let outcome = load_source(&path, limit).await;
            (path, outcome)
        });
    }

    let mut observations = Vec::new();
    let mut loaded_sources = 0usize;
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((path, Ok(rows))) => {
                info!(source = %path.display(), rows = rows.len(), "loaded observations");
                loaded_sources += 1;
                observations.extend(rows);
            }
            Ok((path, Err(failure))) => {
                warn!(source = %path.display(), error = %failure, "skipping observation source");
            }
            Err(err) => warn!(error = %err, "observation loader task aborted"),
        }
    }

    if loaded_sources == 0 {
        return Err(AppError::NoObservations);
    }

    observations.sort_by_key(|observation| (observation.team_number, observation.match_number));
    Ok(observations)
}
