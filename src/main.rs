use anyhow::{Context, Result, anyhow};
use log::info;

use nba_milestones::config::{RunConfig, init_env};
use nba_milestones::nba_stats::NbaStatsClient;
use nba_milestones::pipeline::{Pipeline, PipelineOptions};
use nba_milestones::provider::RetryingProvider;
use nba_milestones::report::render_all;
use nba_milestones::resolve::IdentityResolver;
use nba_milestones::retry::ThreadSleeper;
use nba_milestones::roster::PlayerIndex;
use nba_milestones::roster_source::{apply_run_cap, load_or_generate};
use nba_milestones::sinks::{write_json, write_unresolved};
use nba_milestones::workbook_export::export_workbook;

fn main() -> Result<()> {
    init_env();
    let cfg = RunConfig::from_env().context("invalid configuration")?;
    let thresholds = cfg.thresholds()?;
    let aliases = cfg.alias_table()?;
    let manual = cfg.manual_overrides()?;
    info!(
        "season {} | last {} games | {} aliases | {} manual ids",
        cfg.season,
        cfg.recent_window,
        aliases.len(),
        manual.len()
    );

    let client = NbaStatsClient::new(&cfg.season)?;
    let sleeper = ThreadSleeper;
    let players = RetryingProvider::new(&client, cfg.retry, &sleeper)
        .all_players()
        .context("failed to load the player listing")?;
    if players.is_empty() {
        return Err(anyhow!("player listing for {} is empty", cfg.season));
    }
    let index = PlayerIndex::new(players);
    info!("{} players in listing", index.len());

    let roster = load_or_generate(&cfg.input_csv, &index)?;
    let roster = apply_run_cap(roster, cfg.max_players);

    let resolver = IdentityResolver::new(index, aliases, manual);
    let mut pipeline = Pipeline::new(
        &client,
        resolver,
        thresholds,
        PipelineOptions::from(&cfg),
        &sleeper,
    );
    let outcome = pipeline.run(&roster);

    let wrote_unresolved = write_unresolved(&cfg.not_found_csv, &outcome.unresolved)?;
    let tables = render_all(&outcome.groups, pipeline.thresholds(), cfg.recent_window);
    let export = export_workbook(&cfg.output_xlsx, &tables)?;
    let wrote_json = write_json(&cfg.output_json, &outcome.groups, cfg.headless)?;

    println!("Milestone run complete");
    println!("Season: {}", cfg.season);
    println!(
        "Players: {} processed, {} unresolved, {} failed (of {})",
        outcome.processed(),
        outcome.unresolved.len(),
        outcome.failed.len(),
        roster.len()
    );
    println!(
        "Workbook: {} ({} sheets, {} rows)",
        cfg.output_xlsx.display(),
        export.sheets,
        export.rows
    );
    if wrote_json {
        println!("JSON: {}", cfg.output_json.display());
    }
    if wrote_unresolved {
        println!("Unresolved names: {}", cfg.not_found_csv.display());
        for name in outcome.unresolved.iter().take(10) {
            println!("   - {name}");
        }
    }
    for failed in outcome.failed.iter().take(6) {
        println!("   ! {}: {}", failed.raw_name, failed.error);
    }

    Ok(())
}
