use std::collections::HashMap;

use anyhow::Result;
use reqwest::StatusCode;
use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::Value;

use crate::error::ProviderError;
use crate::game_log::{GameRecord, order_newest_first};
use crate::http_client::http_client;
use crate::provider::{PlayerProfile, StatsProvider};
use crate::roster::{CanonicalPlayer, PlayerId};

const NBA_STATS_URL: &str = "https://stats.nba.com/stats";
const LEAGUE_ID: &str = "00";

/// A row of a stats.nba.com result set, keyed by column header.
pub type StatRow = HashMap<String, Value>;

pub struct NbaStatsClient {
    client: &'static Client,
    base_url: String,
    season: String,
}

impl NbaStatsClient {
    /// `season` scopes the player listing (e.g. `"2025-26"`).
    pub fn new(season: &str) -> Result<Self> {
        Ok(Self {
            client: http_client()?,
            base_url: NBA_STATS_URL.to_string(),
            season: season.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    fn get(&self, endpoint: &str, query: &[(&str, &str)]) -> Result<String, ProviderError> {
        let url = format!("{}/{endpoint}", self.base_url);
        let resp = self.client.get(&url).query(query).send()?;
        let status = resp.status();
        let body = resp.text()?;
        if status == StatusCode::GATEWAY_TIMEOUT || status == StatusCode::REQUEST_TIMEOUT {
            return Err(ProviderError::Timeout(format!("{endpoint}: http {status}")));
        }
        if !status.is_success() {
            return Err(ProviderError::Http {
                status: status.as_u16(),
                body,
            });
        }
        Ok(body)
    }
}

impl StatsProvider for NbaStatsClient {
    fn all_players(&self) -> Result<Vec<CanonicalPlayer>, ProviderError> {
        let body = self.get(
            "commonallplayers",
            &[
                ("LeagueID", LEAGUE_ID),
                ("Season", self.season.as_str()),
                ("IsOnlyCurrentSeason", "0"),
            ],
        )?;
        parse_all_players_json(&body)
    }

    fn player_profile(&self, id: PlayerId) -> Result<PlayerProfile, ProviderError> {
        let id_str = id.to_string();
        let body = self.get(
            "commonplayerinfo",
            &[("PlayerID", id_str.as_str()), ("LeagueID", LEAGUE_ID)],
        )?;
        parse_player_info_json(id, &body)
    }

    fn game_log(&self, id: PlayerId, season: &str) -> Result<Vec<GameRecord>, ProviderError> {
        let id_str = id.to_string();
        let body = self.get(
            "playergamelog",
            &[
                ("PlayerID", id_str.as_str()),
                ("Season", season),
                ("SeasonType", "Regular Season"),
                ("LeagueID", LEAGUE_ID),
            ],
        )?;
        parse_game_log_json(&body)
    }
}

pub fn parse_all_players_json(raw: &str) -> Result<Vec<CanonicalPlayer>, ProviderError> {
    let rows = parse_result_set(raw, "CommonAllPlayers")?;
    let mut players = Vec::with_capacity(rows.len());
    for row in rows {
        let Some(id) = row.get("PERSON_ID").and_then(id_value) else {
            continue;
        };
        let full_name = row
            .get("DISPLAY_FIRST_LAST")
            .and_then(Value::as_str)
            .map(|s| s.trim().to_string())
            .unwrap_or_default();
        if full_name.is_empty() {
            continue;
        }
        let is_active = row.get("ROSTERSTATUS").is_some_and(flag_value);
        players.push(CanonicalPlayer {
            id,
            full_name,
            is_active,
        });
    }
    Ok(players)
}

pub fn parse_player_info_json(id: PlayerId, raw: &str) -> Result<PlayerProfile, ProviderError> {
    let rows = parse_result_set(raw, "CommonPlayerInfo")?;
    let row = rows
        .first()
        .ok_or(ProviderError::Missing { what: "player info", id })?;
    let text = |key: &str| {
        row.get(key)
            .and_then(Value::as_str)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    };
    Ok(PlayerProfile {
        id,
        display_name: text("DISPLAY_FIRST_LAST"),
        team_abbrev: text("TEAM_ABBREVIATION"),
    })
}

pub fn parse_game_log_json(raw: &str) -> Result<Vec<GameRecord>, ProviderError> {
    let rows = parse_result_set(raw, "PlayerGameLog")?;
    let mut games: Vec<GameRecord> = rows.iter().map(GameRecord::from_row).collect();
    order_newest_first(&mut games);
    Ok(games)
}

/// Rows of the named result set, or of the first one when no name matches.
pub fn parse_result_set(raw: &str, name: &str) -> Result<Vec<StatRow>, ProviderError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Err(ProviderError::Decode("empty stats response".to_string()));
    }
    let parsed: StatsResponse = serde_json::from_str(trimmed)?;
    let mut sets = parsed.result_sets.unwrap_or_default();
    if let Some(single) = parsed.result_set {
        sets.push(single);
    }
    let position = sets
        .iter()
        .position(|set| set.name.as_deref() == Some(name))
        .unwrap_or(0);
    if position >= sets.len() {
        return Err(ProviderError::Decode(format!("no result set in response for {name}")));
    }
    let set = sets.swap_remove(position);

    let rows = set
        .row_set
        .into_iter()
        .map(|values| {
            set.headers
                .iter()
                .cloned()
                .zip(values)
                .collect::<StatRow>()
        })
        .collect();
    Ok(rows)
}

fn id_value(value: &Value) -> Option<PlayerId> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|v| PlayerId::try_from(v).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn flag_value(value: &Value) -> bool {
    match value {
        Value::Number(n) => n.as_i64().is_some_and(|v| v != 0),
        Value::String(s) => matches!(s.trim().to_ascii_lowercase().as_str(), "1" | "active"),
        Value::Bool(b) => *b,
        _ => false,
    }
}

#[derive(Debug, Deserialize)]
struct StatsResponse {
    #[serde(rename = "resultSets")]
    result_sets: Option<Vec<ResultSet>>,
    #[serde(rename = "resultSet")]
    result_set: Option<ResultSet>,
}

#[derive(Debug, Deserialize)]
struct ResultSet {
    name: Option<String>,
    #[serde(default)]
    headers: Vec<String>,
    #[serde(rename = "rowSet", default)]
    row_set: Vec<Vec<Value>>,
}
