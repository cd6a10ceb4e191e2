use std::collections::HashMap;

use chrono::NaiveDate;
use serde_json::Value;

/// One row of a player's game log.
///
/// Two-point makes are not stored; they are derived from `fgm` and `fg3m`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameRecord {
    pub game_date: Option<NaiveDate>,
    pub team_abbrev: String,
    pub pts: u32,
    pub reb: u32,
    pub ast: u32,
    pub stl: u32,
    pub blk: u32,
    pub fgm: u32,
    pub fg3m: u32,
    pub ftm: u32,
    pub tov: u32,
}

impl GameRecord {
    pub fn fg2m(&self) -> u32 {
        self.fgm.saturating_sub(self.fg3m)
    }

    /// Builds a record from a header-keyed provider row. Missing or
    /// non-numeric stat columns read as zero.
    pub fn from_row(row: &HashMap<String, Value>) -> Self {
        let stat = |key: &str| row.get(key).map(count_value).unwrap_or(0);
        let turnovers = match row.get("TO") {
            Some(value) => count_value(value),
            None => stat("TOV"),
        };
        Self {
            game_date: row.get("GAME_DATE").and_then(parse_game_date),
            team_abbrev: team_from_row(row),
            pts: stat("PTS"),
            reb: stat("REB"),
            ast: stat("AST"),
            stl: stat("STL"),
            blk: stat("BLK"),
            fgm: stat("FGM"),
            fg3m: stat("FG3M"),
            ftm: stat("FTM"),
            tov: turnovers,
        }
    }
}

/// Sorts games newest first when every game carries a date; otherwise keeps
/// the provider's order, which is newest first already.
pub fn order_newest_first(games: &mut [GameRecord]) {
    if games.iter().all(|g| g.game_date.is_some()) {
        games.sort_by(|a, b| b.game_date.cmp(&a.game_date));
    }
}

// Game logs carry the team only inside MATCHUP ("PHI vs. BOS", "PHI @ BOS").
fn team_from_row(row: &HashMap<String, Value>) -> String {
    let explicit = row
        .get("TEAM_ABBREVIATION")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty());
    let from_matchup = || {
        row.get("MATCHUP")
            .and_then(Value::as_str)
            .and_then(|m| m.split_whitespace().next())
    };
    explicit
        .or_else(from_matchup)
        .map(str::to_string)
        .unwrap_or_default()
}

fn count_value(value: &Value) -> u32 {
    let raw = match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };
    if raw.is_finite() && raw > 0.0 {
        raw.round().min(u32::MAX as f64) as u32
    } else {
        0
    }
}

fn parse_game_date(value: &Value) -> Option<NaiveDate> {
    let raw = value.as_str()?.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%b %d, %Y") {
        return Some(date);
    }
    let day = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}
