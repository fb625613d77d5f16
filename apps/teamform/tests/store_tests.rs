//! Tests for the JSON roster, the JSON sink and config loading.

// Allow unwrap and panic in tests - these are standard for test code
#![allow(clippy::unwrap_used, clippy::panic)]

use std::path::Path;
use teamform::{AppConfig, AppError, JsonRoster, JsonSink, form_and_persist};
use teamform_core::{ChapterId, CycleId, FormationConfig, PersistedTeam, form_cycle};

const PARTICIPANTS: &str = r#"[
    {"id": "a0", "score": 140},
    {"id": "r0", "score": "30"},
    {"id": "r1"},
    {"id": "r2", "ecc": 12.5},
    {"id": "r3", "score": null}
]"#;

const VOTES: &str = r#"[
    {"participant": "r0", "goals": [{"id": "g1", "team_size": 5}]},
    {"playerId": "r1", "goals": [{"url": "g1"}]},
    {"participant": "r2", "goals": [{"id": "g2"}, {"id": "g1"}]},
    {"participant": "r3", "goals": []}
]"#;

fn write(dir: &Path, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

// =============================================================================
// ROSTER TESTS
// =============================================================================

#[tokio::test]
async fn test_roster_loads_both_files() {
    let dir = tempfile::tempdir().unwrap();
    let participants = write(dir.path(), "participants.json", PARTICIPANTS);
    let votes = write(dir.path(), "votes.json", VOTES);

    let (participants, votes) = JsonRoster::new(participants, votes).load().await.unwrap();

    assert_eq!(participants.len(), 5);
    assert_eq!(participants[1].score.value(), 30);
    assert_eq!(participants[2].score.value(), 0);
    assert_eq!(participants[3].score.value(), 12);
    assert_eq!(votes.len(), 4);
    assert_eq!(votes[1].participant.as_str(), "r1");
}

#[tokio::test]
async fn test_roster_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let participants = write(dir.path(), "participants.json", PARTICIPANTS);

    let result = JsonRoster::new(participants, dir.path().join("missing.json"))
        .load()
        .await;

    assert!(matches!(result, Err(AppError::Io { .. })));
}

#[tokio::test]
async fn test_roster_bad_json_is_json_error() {
    let dir = tempfile::tempdir().unwrap();
    let participants = write(dir.path(), "participants.json", "{not json");
    let votes = write(dir.path(), "votes.json", VOTES);

    let result = JsonRoster::new(participants, votes).load().await;

    assert!(matches!(result, Err(AppError::Json { .. })));
}

// =============================================================================
// END-TO-END TESTS
// =============================================================================

#[tokio::test]
async fn test_form_cycle_writes_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let participants = write(dir.path(), "participants.json", PARTICIPANTS);
    let votes = write(dir.path(), "votes.json", VOTES);
    let output = dir.path().join("teams.json");
    let chapter = ChapterId::new("ch");
    let cycle = CycleId::new("c7");

    let roster = JsonRoster::new(participants, votes)
        .fetch(&chapter, &cycle)
        .await
        .unwrap();
    let mut sink = JsonSink::new(Some(output.clone()), false);

    let persisted = form_cycle::<_, _, AppError>(
        &roster,
        &mut sink,
        &chapter,
        &cycle,
        &FormationConfig::default(),
    )
    .unwrap();

    // one goal group (one advanced), four regulars plus one advanced
    assert_eq!(persisted.len(), 1);
    assert_eq!(persisted[0].goal.id.as_str(), "g1");
    assert_eq!(persisted[0].members.len(), 5);

    let written: Vec<PersistedTeam> =
        serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(written, persisted);
}

#[tokio::test]
async fn test_form_and_persist_runs_off_the_runtime() {
    let dir = tempfile::tempdir().unwrap();
    let participants = write(dir.path(), "participants.json", PARTICIPANTS);
    let votes = write(dir.path(), "votes.json", VOTES);
    let output = dir.path().join("teams.json");
    let chapter = ChapterId::new("ch");
    let cycle = CycleId::new("c7");

    let roster = JsonRoster::new(participants, votes)
        .fetch(&chapter, &cycle)
        .await
        .unwrap();

    let persisted = form_and_persist(
        roster,
        JsonSink::new(Some(output.clone()), true),
        chapter,
        cycle,
        FormationConfig::default(),
    )
    .await
    .unwrap();

    let written: Vec<PersistedTeam> =
        serde_json::from_str(&tokio::fs::read_to_string(&output).await.unwrap()).unwrap();
    assert_eq!(written, persisted);
    assert_eq!(persisted[0].chapter.as_str(), "ch");
}

#[tokio::test]
async fn test_form_cycle_failure_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let participants = write(dir.path(), "participants.json", r#"[{"id": "r0", "score": 1}]"#);
    let votes = write(dir.path(), "votes.json", VOTES);
    let output = dir.path().join("teams.json");
    let chapter = ChapterId::new("ch");
    let cycle = CycleId::new("c7");

    let roster = JsonRoster::new(participants, votes)
        .fetch(&chapter, &cycle)
        .await
        .unwrap();
    let mut sink = JsonSink::new(Some(output.clone()), true);

    let result = form_cycle::<_, _, AppError>(
        &roster,
        &mut sink,
        &chapter,
        &cycle,
        &FormationConfig::default(),
    );

    assert!(matches!(result, Err(AppError::Formation(_))));
    assert!(!output.exists());
}

// =============================================================================
// CONFIG TESTS
// =============================================================================

#[test]
fn test_config_from_toml_partial() {
    let config = AppConfig::from_toml(
        "[formation]\ndefault_team_size = 4\n",
        Path::new("teamform.toml"),
    )
    .unwrap();

    assert_eq!(config.formation, FormationConfig::new(100, 4));
    assert!(config.output.pretty);
}

#[test]
fn test_config_from_toml_rejects_wrong_types() {
    let result = AppConfig::from_toml(
        "[formation]\nadvanced_threshold = \"high\"\n",
        Path::new("teamform.toml"),
    );

    assert!(matches!(result, Err(AppError::Config { .. })));
}

#[test]
fn test_config_load_explicit_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let result = AppConfig::load(Some(dir.path().join("absent.toml").as_path()));

    assert!(matches!(result, Err(AppError::Io { .. })));
}

#[test]
fn test_config_load_explicit_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(
        dir.path(),
        "custom.toml",
        "[formation]\nadvanced_threshold = 80\n\n[output]\npretty = false\n",
    );

    let config = AppConfig::load(Some(path.as_path())).unwrap();

    // environment may override; only check values it does not touch
    assert!(!config.output.pretty);
}

#[test]
fn test_config_load_rejects_invalid_team_size() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "tiny.toml", "[formation]\ndefault_team_size = 1\n");

    let result = AppConfig::load(Some(path.as_path()));

    assert!(matches!(result, Err(AppError::Formation(_))));
}
