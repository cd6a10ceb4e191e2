use std::collections::HashMap;

use log::debug;

use crate::game_log::GameRecord;
use crate::provider::ProfileLookup;
use crate::roster::PlayerId;

pub const FREE_AGENT: &str = "FA";

/// Current team per player, looked up at most once per id for the run.
#[derive(Debug, Default)]
pub struct TeamAffiliationResolver {
    cache: HashMap<PlayerId, String>,
}

impl TeamAffiliationResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Profile team, else the team on the newest game, else `"FA"`.
    pub fn resolve_team(
        &mut self,
        id: PlayerId,
        games: &[GameRecord],
        profiles: &dyn ProfileLookup,
    ) -> String {
        if let Some(team) = self.cache.get(&id) {
            return team.clone();
        }

        let from_profile = match profiles.profile(id) {
            Ok(profile) => profile.team_abbrev.map(|t| t.trim().to_string()),
            Err(err) => {
                debug!("team lookup for {id} failed: {err}");
                None
            }
        };

        let team = from_profile
            .filter(|t| !t.is_empty())
            .or_else(|| {
                games
                    .first()
                    .map(|g| g.team_abbrev.trim().to_string())
                    .filter(|t| !t.is_empty())
            })
            .unwrap_or_else(|| FREE_AGENT.to_string());

        self.cache.insert(id, team.clone());
        team
    }

    pub fn cached(&self, id: PlayerId) -> Option<&str> {
        self.cache.get(&id).map(String::as_str)
    }
}
