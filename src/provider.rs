use std::cell::RefCell;
use std::collections::HashMap;

use crate::error::{PlayerError, ProviderError};
use crate::game_log::GameRecord;
use crate::retry::{RetryPolicy, Sleeper};
use crate::roster::{CanonicalPlayer, PlayerId};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayerProfile {
    pub id: PlayerId,
    pub display_name: Option<String>,
    pub team_abbrev: Option<String>,
}

/// Remote source of players, profiles and game logs.
pub trait StatsProvider {
    fn all_players(&self) -> Result<Vec<CanonicalPlayer>, ProviderError>;

    fn player_profile(&self, id: PlayerId) -> Result<PlayerProfile, ProviderError>;

    /// Games for one season, newest first.
    fn game_log(&self, id: PlayerId, season: &str) -> Result<Vec<GameRecord>, ProviderError>;
}

/// Profile lookups as seen by the resolvers.
pub trait ProfileLookup {
    fn profile(&self, id: PlayerId) -> Result<PlayerProfile, PlayerError>;
}

/// A provider whose calls go through a retry policy.
pub struct RetryingProvider<'a, P: ?Sized> {
    inner: &'a P,
    policy: RetryPolicy,
    sleeper: &'a dyn Sleeper,
}

impl<'a, P: StatsProvider + ?Sized> RetryingProvider<'a, P> {
    pub fn new(inner: &'a P, policy: RetryPolicy, sleeper: &'a dyn Sleeper) -> Self {
        Self {
            inner,
            policy,
            sleeper,
        }
    }

    pub fn all_players(&self) -> Result<Vec<CanonicalPlayer>, PlayerError> {
        self.policy
            .run(self.sleeper, "player listing", || self.inner.all_players())
    }

    pub fn game_log(&self, id: PlayerId, season: &str) -> Result<Vec<GameRecord>, PlayerError> {
        self.policy.run(self.sleeper, &format!("game log {id} ({season})"), || {
            self.inner.game_log(id, season)
        })
    }
}

impl<P: StatsProvider + ?Sized> ProfileLookup for RetryingProvider<'_, P> {
    fn profile(&self, id: PlayerId) -> Result<PlayerProfile, PlayerError> {
        self.policy.run(self.sleeper, &format!("player info {id}"), || {
            self.inner.player_profile(id)
        })
    }
}

/// Keeps successful profile lookups for the rest of the run, so the display
/// name and the team of one id come from a single request.
pub struct CachedProfiles<L> {
    inner: L,
    cache: RefCell<HashMap<PlayerId, PlayerProfile>>,
}

impl<L> CachedProfiles<L> {
    pub fn new(inner: L) -> Self {
        Self {
            inner,
            cache: RefCell::new(HashMap::new()),
        }
    }

    pub fn inner(&self) -> &L {
        &self.inner
    }
}

impl<L: ProfileLookup> ProfileLookup for CachedProfiles<L> {
    fn profile(&self, id: PlayerId) -> Result<PlayerProfile, PlayerError> {
        if let Some(profile) = self.cache.borrow().get(&id) {
            return Ok(profile.clone());
        }
        let profile = self.inner.profile(id)?;
        self.cache.borrow_mut().insert(id, profile.clone());
        Ok(profile)
    }
}
