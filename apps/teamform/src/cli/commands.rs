//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.

use std::path::{Path, PathBuf};
use teamform::{AppConfig, AppError, JsonRoster, JsonSink, form_and_persist};
use teamform_core::{ChapterId, CycleId, PersistedTeam, team_sizes};

// =============================================================================
// FORM COMMAND
// =============================================================================

/// Form teams for a cycle and persist them.
pub async fn cmd_form(
    config: &AppConfig,
    json_mode: bool,
    participants: &Path,
    votes: &Path,
    cycle: &str,
    chapter: &str,
    output: Option<PathBuf>,
) -> Result<(), AppError> {
    let chapter = ChapterId::new(chapter);
    let cycle = CycleId::new(cycle);

    let roster = JsonRoster::new(participants, votes)
        .fetch(&chapter, &cycle)
        .await?;

    let output_path = output.clone();
    let sink = JsonSink::new(output, config.output.pretty);
    let persisted = form_and_persist(
        roster,
        sink,
        chapter.clone(),
        cycle.clone(),
        config.formation,
    )
    .await?;

    // Without an output file the records already went to stdout.
    let Some(output_path) = output_path else {
        return Ok(());
    };

    if json_mode {
        let output = serde_json::json!({
            "chapter": chapter,
            "cycle": cycle,
            "teams": persisted.len(),
            "participants": persisted.iter().map(|t| t.members.len()).sum::<usize>(),
            "output": output_path.to_string_lossy(),
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&output).unwrap_or_default()
        );
        return Ok(());
    }

    print_teams(&cycle, &persisted);
    println!();
    println!("Written to {}", output_path.display());
    Ok(())
}

fn print_teams(cycle: &CycleId, teams: &[PersistedTeam]) {
    println!("Teams for cycle {}", cycle);
    println!("================");
    for (i, team) in teams.iter().enumerate() {
        let members: Vec<&str> = team.members.iter().map(|m| m.as_str()).collect();
        println!(
            "{:>3}. {} ({} members): {}",
            i + 1,
            team.goal.id,
            members.len(),
            members.join(", ")
        );
    }
}

// =============================================================================
// SIZES COMMAND
// =============================================================================

/// Show the partition of one goal group.
pub fn cmd_sizes(
    json_mode: bool,
    team_size: usize,
    regular: usize,
    advanced: usize,
) -> Result<(), AppError> {
    let partition = team_sizes(team_size, regular, advanced)?;

    if json_mode {
        println!(
            "{}",
            serde_json::to_string_pretty(&partition).unwrap_or_default()
        );
        return Ok(());
    }

    println!("Team Sizes");
    println!("==========");
    println!("Recommended: {}", team_size);
    println!("Regular:     {}", regular);
    println!("Advanced:    {}", advanced);
    println!("Strategy:    {}", partition.strategy);
    println!();
    for (i, size) in partition.sizes.iter().enumerate() {
        let marker = if partition.in_band(*size) { "" } else { "  (outside band)" };
        println!(
            "{:>3}. {} regular + {} advanced = {}{}",
            i + 1,
            size.regular,
            size.advanced,
            size.total(),
            marker
        );
    }

    Ok(())
}

// =============================================================================
// CONFIG COMMAND
// =============================================================================

/// Show the effective configuration.
pub fn cmd_config(config: &AppConfig, json_mode: bool) -> Result<(), AppError> {
    if json_mode {
        println!(
            "{}",
            serde_json::to_string_pretty(config).unwrap_or_default()
        );
        return Ok(());
    }

    println!("Teamform Configuration");
    println!("======================");
    println!(
        "Advanced threshold: {}",
        config.formation.advanced_threshold
    );
    println!("Default team size:  {}", config.formation.default_team_size);
    println!("Pretty output:      {}", config.output.pretty);
    Ok(())
}
