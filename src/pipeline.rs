use std::collections::HashMap;
use std::time::Duration;

use log::{error, info, warn};

use crate::config::RunConfig;
use crate::error::PlayerError;
use crate::milestones::{MilestoneThresholds, count_milestones, recent_window};
use crate::provider::{CachedProfiles, RetryingProvider, StatsProvider};
use crate::report::{PlayerReport, TeamGroups};
use crate::resolve::{IdentityResolver, ResolvedPlayer};
use crate::retry::{RetryPolicy, Sleeper};
use crate::team::TeamAffiliationResolver;

#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub season: String,
    pub recent_window: usize,
    pub call_delay: Duration,
    pub retry: RetryPolicy,
}

impl From<&RunConfig> for PipelineOptions {
    fn from(cfg: &RunConfig) -> Self {
        Self {
            season: cfg.season.clone(),
            recent_window: cfg.recent_window,
            call_delay: cfg.call_delay,
            retry: cfg.retry,
        }
    }
}

/// A roster entry that produced no report.
#[derive(Debug)]
pub struct FailedPlayer {
    pub raw_name: String,
    pub error: PlayerError,
}

#[derive(Debug, Default)]
pub struct RunOutcome {
    pub groups: TeamGroups,
    pub unresolved: Vec<String>,
    pub failed: Vec<FailedPlayer>,
}

impl RunOutcome {
    pub fn processed(&self) -> usize {
        self.groups.player_count()
    }
}

/// Walks a roster in order, one player at a time.
///
/// Owns the per-run caches: raw name to identity, player id to profile and
/// player id to team.
pub struct Pipeline<'a> {
    provider: CachedProfiles<RetryingProvider<'a, dyn StatsProvider + 'a>>,
    resolver: IdentityResolver,
    teams: TeamAffiliationResolver,
    identities: HashMap<String, Option<ResolvedPlayer>>,
    thresholds: MilestoneThresholds,
    options: PipelineOptions,
    sleeper: &'a dyn Sleeper,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        provider: &'a (dyn StatsProvider + 'a),
        resolver: IdentityResolver,
        thresholds: MilestoneThresholds,
        options: PipelineOptions,
        sleeper: &'a dyn Sleeper,
    ) -> Self {
        Self {
            provider: CachedProfiles::new(RetryingProvider::new(provider, options.retry, sleeper)),
            resolver,
            teams: TeamAffiliationResolver::new(),
            identities: HashMap::new(),
            thresholds,
            options,
            sleeper,
        }
    }

    pub fn resolver(&self) -> &IdentityResolver {
        &self.resolver
    }

    pub fn thresholds(&self) -> &MilestoneThresholds {
        &self.thresholds
    }

    pub fn teams(&self) -> &TeamAffiliationResolver {
        &self.teams
    }

    pub fn run(&mut self, roster: &[String]) -> RunOutcome {
        let mut outcome = RunOutcome::default();
        let total = roster.len();
        for (idx, raw) in roster.iter().enumerate() {
            match self.process(raw) {
                Ok(report) => {
                    info!(
                        "[{}/{total}] {} ({}, {} games)",
                        idx + 1,
                        report.resolved_name,
                        report.team_abbrev,
                        report.games_played
                    );
                    outcome.groups.push(report);
                    self.sleeper.sleep(self.options.call_delay);
                }
                Err(PlayerError::Unresolved(name)) => {
                    warn!("[{}/{total}] no match for '{name}'", idx + 1);
                    outcome.unresolved.push(name);
                }
                Err(err) => {
                    error!("[{}/{total}] skipping '{raw}': {err}", idx + 1);
                    outcome.failed.push(FailedPlayer {
                        raw_name: raw.clone(),
                        error: err,
                    });
                }
            }
        }
        outcome
    }

    /// Resolves, fetches and counts one roster entry.
    pub fn process(&mut self, raw: &str) -> Result<PlayerReport, PlayerError> {
        let player = self
            .identify(raw)
            .ok_or_else(|| PlayerError::Unresolved(raw.to_string()))?;
        let games = self
            .provider
            .inner()
            .game_log(player.id, &self.options.season)?;
        let team_abbrev = self.teams.resolve_team(player.id, &games, &self.provider);

        let recent = recent_window(&games, self.options.recent_window);
        Ok(PlayerReport {
            resolved_name: player.full_name,
            team_abbrev,
            games_played: games.len(),
            recent_counts: count_milestones(recent, &self.thresholds),
            full_counts: count_milestones(&games, &self.thresholds),
        })
    }

    fn identify(&mut self, raw: &str) -> Option<ResolvedPlayer> {
        if let Some(cached) = self.identities.get(raw) {
            return cached.clone();
        }
        let resolved = self.resolver.resolve(raw, &self.provider);
        self.identities.insert(raw.to_string(), resolved.clone());
        resolved
    }
}
