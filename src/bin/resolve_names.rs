use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};

use nba_milestones::config::{RunConfig, init_env};
use nba_milestones::nba_stats::{NbaStatsClient, parse_all_players_json};
use nba_milestones::provider::RetryingProvider;
use nba_milestones::resolve::IdentityResolver;
use nba_milestones::retry::ThreadSleeper;
use nba_milestones::roster::PlayerIndex;

/// Prints which matching step resolves each name given on the command line.
///
/// `--listing <file>` reads a saved `commonallplayers` response instead of
/// calling the API for the player listing.
fn main() -> Result<()> {
    init_env();
    let (listing, names) = parse_args();
    if names.is_empty() {
        return Err(anyhow!(
            "usage: resolve_names [--listing commonallplayers.json] <name>..."
        ));
    }

    let cfg = RunConfig::from_env().context("invalid configuration")?;
    let client = NbaStatsClient::new(&cfg.season)?;
    let sleeper = ThreadSleeper;
    let provider = RetryingProvider::new(&client, cfg.retry, &sleeper);

    let players = match listing {
        Some(path) => {
            let raw = fs::read_to_string(&path)
                .with_context(|| format!("read {}", path.display()))?;
            parse_all_players_json(&raw).with_context(|| format!("parse {}", path.display()))?
        }
        None => provider
            .all_players()
            .context("failed to load the player listing")?,
    };
    let index = PlayerIndex::new(players);
    let resolver = IdentityResolver::new(index, cfg.alias_table()?, cfg.manual_overrides()?);

    for name in &names {
        let (query, via_alias) = resolver.query(name);
        match resolver.resolve(name, &provider) {
            Some(hit) => println!(
                "{name:<28} -> {} [{}] via {}{}",
                hit.full_name,
                hit.id,
                hit.step,
                if via_alias { " (alias)" } else { "" }
            ),
            None => println!("{name:<28} -> not found (normalized '{}')", query.normalized),
        }
    }
    Ok(())
}

fn parse_args() -> (Option<PathBuf>, Vec<String>) {
    let mut listing = None;
    let mut names = Vec::new();
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--listing" {
            listing = args.next().map(PathBuf::from);
        } else if let Some(path) = arg.strip_prefix("--listing=") {
            listing = Some(PathBuf::from(path));
        } else {
            names.push(arg);
        }
    }
    (listing, names)
}
