use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::normalize::normalize_name;

pub type PlayerId = u32;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalPlayer {
    pub id: PlayerId,
    pub full_name: String,
    pub is_active: bool,
}

/// All known players keyed by normalized full name.
///
/// Several players can share a normalized name; each bucket and the key list
/// keep the order players were inserted in.
#[derive(Debug, Clone, Default)]
pub struct PlayerIndex {
    players: Vec<CanonicalPlayer>,
    normalized: Vec<String>,
    by_name: HashMap<String, Vec<usize>>,
    keys: Vec<String>,
}

impl PlayerIndex {
    pub fn new(players: Vec<CanonicalPlayer>) -> Self {
        let mut index = Self::default();
        for player in players {
            index.push(player);
        }
        index
    }

    fn push(&mut self, player: CanonicalPlayer) {
        let norm = normalize_name(&player.full_name);
        let slot = self.players.len();
        match self.by_name.get_mut(&norm) {
            Some(bucket) => bucket.push(slot),
            None => {
                self.keys.push(norm.clone());
                self.by_name.insert(norm.clone(), vec![slot]);
            }
        }
        self.normalized.push(norm);
        self.players.push(player);
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn players(&self) -> &[CanonicalPlayer] {
        &self.players
    }

    pub fn active_players(&self) -> impl Iterator<Item = &CanonicalPlayer> {
        self.players.iter().filter(|p| p.is_active)
    }

    /// Normalized names in first-seen order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }

    pub fn get(&self, normalized: &str) -> Vec<&CanonicalPlayer> {
        self.by_name
            .get(normalized)
            .map(|slots| slots.iter().map(|&slot| &self.players[slot]).collect())
            .unwrap_or_default()
    }

    /// Players whose normalized name ends with `" " + surname`.
    pub fn with_surname(&self, surname: &str) -> Vec<&CanonicalPlayer> {
        let suffix = format!(" {surname}");
        self.players
            .iter()
            .zip(&self.normalized)
            .filter(|(_, norm)| norm.ends_with(&suffix))
            .map(|(player, _)| player)
            .collect()
    }

    pub fn by_id(&self, id: PlayerId) -> Option<&CanonicalPlayer> {
        self.players.iter().find(|p| p.id == id)
    }
}

/// First active candidate, otherwise the first candidate.
pub fn pick_preferred<'a>(candidates: &[&'a CanonicalPlayer]) -> Option<&'a CanonicalPlayer> {
    candidates
        .iter()
        .find(|c| c.is_active)
        .or_else(|| candidates.first())
        .copied()
}
