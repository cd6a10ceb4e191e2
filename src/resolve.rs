use std::fmt;

use log::{debug, info};

use crate::aliases::{AliasTable, ManualOverrideTable};
use crate::normalize::{normalize_name, surname_token};
use crate::provider::ProfileLookup;
use crate::roster::{CanonicalPlayer, PlayerId, PlayerIndex, pick_preferred};
use crate::similarity::closest_match;

pub const FUZZY_CUTOFF: f64 = 0.82;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStep {
    Manual,
    Exact,
    Fuzzy,
    Surname,
}

impl fmt::Display for MatchStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MatchStep::Manual => "manual id",
            MatchStep::Exact => "exact",
            MatchStep::Fuzzy => "fuzzy",
            MatchStep::Surname => "surname",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPlayer {
    pub id: PlayerId,
    pub full_name: String,
    pub step: MatchStep,
    /// Set when an alias rewrote the input before matching.
    pub via_alias: bool,
}

/// A roster name on its way through the chain.
#[derive(Debug, Clone)]
pub struct NameQuery<'a> {
    pub raw: &'a str,
    pub normalized: String,
}

pub struct MatchContext<'a> {
    pub index: &'a PlayerIndex,
    pub profiles: &'a dyn ProfileLookup,
}

/// One link of the resolution chain.
pub trait MatchStrategy {
    fn step(&self) -> MatchStep;

    fn find(&self, query: &NameQuery<'_>, ctx: &MatchContext<'_>) -> Option<ResolvedPlayer>;
}

pub struct ManualOverride {
    table: ManualOverrideTable,
}

impl ManualOverride {
    pub fn new(table: ManualOverrideTable) -> Self {
        Self { table }
    }
}

impl MatchStrategy for ManualOverride {
    fn step(&self) -> MatchStep {
        MatchStep::Manual
    }

    fn find(&self, query: &NameQuery<'_>, ctx: &MatchContext<'_>) -> Option<ResolvedPlayer> {
        let id = self.table.get(&query.normalized)?;
        let full_name = match ctx.profiles.profile(id) {
            Ok(profile) => profile
                .display_name
                .filter(|name| !name.trim().is_empty())
                .unwrap_or_else(|| query.raw.to_string()),
            Err(err) => {
                debug!("display name lookup for {id} failed: {err}");
                query.raw.to_string()
            }
        };
        Some(ResolvedPlayer {
            id,
            full_name,
            step: MatchStep::Manual,
            via_alias: false,
        })
    }
}

pub struct ExactMatch;

impl MatchStrategy for ExactMatch {
    fn step(&self) -> MatchStep {
        MatchStep::Exact
    }

    fn find(&self, query: &NameQuery<'_>, ctx: &MatchContext<'_>) -> Option<ResolvedPlayer> {
        let candidates = ctx.index.get(&query.normalized);
        pick_preferred(&candidates).map(|p| found(p, MatchStep::Exact))
    }
}

pub struct FuzzyMatch {
    pub cutoff: f64,
}

impl Default for FuzzyMatch {
    fn default() -> Self {
        Self {
            cutoff: FUZZY_CUTOFF,
        }
    }
}

impl MatchStrategy for FuzzyMatch {
    fn step(&self) -> MatchStep {
        MatchStep::Fuzzy
    }

    fn find(&self, query: &NameQuery<'_>, ctx: &MatchContext<'_>) -> Option<ResolvedPlayer> {
        let (key, _) = closest_match(&query.normalized, ctx.index.keys(), self.cutoff)?;
        let candidates = ctx.index.get(key);
        pick_preferred(&candidates).map(|p| found(p, MatchStep::Fuzzy))
    }
}

pub struct SurnameFallback;

impl MatchStrategy for SurnameFallback {
    fn step(&self) -> MatchStep {
        MatchStep::Surname
    }

    fn find(&self, query: &NameQuery<'_>, ctx: &MatchContext<'_>) -> Option<ResolvedPlayer> {
        let surname = surname_token(&query.normalized)?;
        let candidates = ctx.index.with_surname(surname);
        pick_preferred(&candidates).map(|p| found(p, MatchStep::Surname))
    }
}

fn found(player: &CanonicalPlayer, step: MatchStep) -> ResolvedPlayer {
    ResolvedPlayer {
        id: player.id,
        full_name: player.full_name.clone(),
        step,
        via_alias: false,
    }
}

/// Maps raw roster names to canonical players.
///
/// An alias rewrite is applied first; the rewritten name then goes through
/// manual ids, exact match, fuzzy match and surname fallback in that order.
pub struct IdentityResolver {
    index: PlayerIndex,
    aliases: AliasTable,
    strategies: Vec<Box<dyn MatchStrategy>>,
}

impl IdentityResolver {
    pub fn new(index: PlayerIndex, aliases: AliasTable, manual: ManualOverrideTable) -> Self {
        Self::with_strategies(
            index,
            aliases,
            vec![
                Box::new(ManualOverride::new(manual)),
                Box::new(ExactMatch),
                Box::new(FuzzyMatch::default()),
                Box::new(SurnameFallback),
            ],
        )
    }

    pub fn with_strategies(
        index: PlayerIndex,
        aliases: AliasTable,
        strategies: Vec<Box<dyn MatchStrategy>>,
    ) -> Self {
        Self {
            index,
            aliases,
            strategies,
        }
    }

    pub fn index(&self) -> &PlayerIndex {
        &self.index
    }

    pub fn steps(&self) -> Vec<MatchStep> {
        self.strategies.iter().map(|s| s.step()).collect()
    }

    pub fn query<'a>(&self, raw: &'a str) -> (NameQuery<'a>, bool) {
        let normalized = normalize_name(raw);
        match self.aliases.rewrite(&normalized) {
            Some(target) => (
                NameQuery {
                    raw,
                    normalized: target,
                },
                true,
            ),
            None => (NameQuery { raw, normalized }, false),
        }
    }

    pub fn resolve(&self, raw: &str, profiles: &dyn ProfileLookup) -> Option<ResolvedPlayer> {
        let (query, via_alias) = self.query(raw);
        let ctx = MatchContext {
            index: &self.index,
            profiles,
        };
        for strategy in &self.strategies {
            if let Some(mut hit) = strategy.find(&query, &ctx) {
                hit.via_alias = via_alias;
                if matches!(hit.step, MatchStep::Fuzzy | MatchStep::Surname) {
                    info!("'{raw}' -> '{}' ({})", hit.full_name, hit.step);
                }
                return Some(hit);
            }
        }
        None
    }
}
