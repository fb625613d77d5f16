//! # JSON Collaborators
//!
//! File-backed roster and team sink.
//!
//! - Participants file: JSON array of `{"id": .., "score": ..}`
//! - Votes file: JSON array of `{"participant": .., "goals": [{"id": .., "team_size": ..}]}`
//! - Output: JSON array of persisted teams, to a file or stdout

use crate::AppError;
use serde::de::DeserializeOwned;
use std::io::Write;
use std::path::{Path, PathBuf};
use teamform_core::{
    ChapterId, CycleId, FormationConfig, FormedTeam, MemoryRoster, Participant, PersistedTeam,
    TeamSink, Vote, form_cycle,
};

// =============================================================================
// FILE SIZE LIMITS
// =============================================================================

/// Maximum size of a participants or votes file (50 MB).
pub const MAX_INPUT_FILE_SIZE: u64 = 50 * 1024 * 1024;

async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, AppError> {
    let io_error = |source| AppError::Io {
        path: path.to_path_buf(),
        source,
    };

    let size = tokio::fs::metadata(path).await.map_err(io_error)?.len();
    if size > MAX_INPUT_FILE_SIZE {
        return Err(AppError::TooLarge {
            path: path.to_path_buf(),
            size,
            limit: MAX_INPUT_FILE_SIZE,
        });
    }

    let bytes = tokio::fs::read(path).await.map_err(io_error)?;
    serde_json::from_slice(&bytes).map_err(|source| AppError::Json {
        path: path.to_path_buf(),
        source,
    })
}

// =============================================================================
// ROSTER
// =============================================================================

/// Participants and votes stored as two JSON files.
#[derive(Debug, Clone)]
pub struct JsonRoster {
    participants: PathBuf,
    votes: PathBuf,
}

impl JsonRoster {
    /// Create a roster over the two files.
    #[must_use]
    pub fn new(participants: impl Into<PathBuf>, votes: impl Into<PathBuf>) -> Self {
        Self {
            participants: participants.into(),
            votes: votes.into(),
        }
    }

    /// Read both files concurrently. Both must succeed.
    pub async fn load(&self) -> Result<(Vec<Participant>, Vec<Vote>), AppError> {
        let (participants, votes) = tokio::try_join!(
            read_json::<Vec<Participant>>(&self.participants),
            read_json::<Vec<Vote>>(&self.votes),
        )?;

        tracing::info!(
            participants = participants.len(),
            votes = votes.len(),
            "loaded roster"
        );
        Ok((participants, votes))
    }

    /// Load both files into an in-memory roster for one chapter and cycle.
    pub async fn fetch(
        &self,
        chapter: &ChapterId,
        cycle: &CycleId,
    ) -> Result<MemoryRoster, AppError> {
        let (participants, votes) = self.load().await?;
        Ok(MemoryRoster::new()
            .with_participants(chapter.clone(), participants)
            .with_votes(cycle.clone(), votes))
    }
}

// =============================================================================
// SINK
// =============================================================================

/// Writes persisted teams as a JSON array.
///
/// Writes block the calling thread. Inside the runtime, drive it through
/// [`form_and_persist`].
#[derive(Debug, Clone)]
pub struct JsonSink {
    output: Option<PathBuf>,
    pretty: bool,
}

impl JsonSink {
    /// Write to `output`, or stdout when `None`.
    #[must_use]
    pub fn new(output: Option<PathBuf>, pretty: bool) -> Self {
        Self { output, pretty }
    }

    fn encode(&self, records: &[PersistedTeam]) -> Result<Vec<u8>, serde_json::Error> {
        if self.pretty {
            serde_json::to_vec_pretty(records)
        } else {
            serde_json::to_vec(records)
        }
    }
}

impl TeamSink for JsonSink {
    type Error = AppError;

    fn persist_teams(
        &mut self,
        chapter: &ChapterId,
        cycle: &CycleId,
        teams: Vec<FormedTeam>,
    ) -> Result<Vec<PersistedTeam>, AppError> {
        let records: Vec<PersistedTeam> = teams
            .into_iter()
            .map(|team| PersistedTeam::new(chapter, cycle, team))
            .collect();

        let target = self
            .output
            .clone()
            .unwrap_or_else(|| PathBuf::from("<stdout>"));
        let mut bytes = self.encode(&records).map_err(|source| AppError::Json {
            path: target.clone(),
            source,
        })?;
        bytes.push(b'\n');

        let io_error = |source| AppError::Io {
            path: target.clone(),
            source,
        };
        match &self.output {
            Some(path) => std::fs::write(path, &bytes).map_err(io_error)?,
            None => std::io::stdout().lock().write_all(&bytes).map_err(io_error)?,
        }

        tracing::info!(teams = records.len(), output = %target.display(), "persisted teams");
        Ok(records)
    }
}

// =============================================================================
// CYCLE
// =============================================================================

/// Form and persist one cycle on the blocking thread pool.
///
/// Formation and the sink's file write are both synchronous, so the whole
/// cycle runs under `spawn_blocking`.
pub async fn form_and_persist(
    roster: MemoryRoster,
    mut sink: JsonSink,
    chapter: ChapterId,
    cycle: CycleId,
    config: FormationConfig,
) -> Result<Vec<PersistedTeam>, AppError> {
    tokio::task::spawn_blocking(move || {
        form_cycle::<_, _, AppError>(&roster, &mut sink, &chapter, &cycle, &config)
    })
    .await?
}
