use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use log::{info, warn};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::milestones::MilestoneCounts;
use crate::report::TeamGroups;

pub const NOT_FOUND_COLUMN: &str = "not_found";

/// Writes the raw names nobody could be matched to. Nothing is written when
/// the list is empty.
pub fn write_unresolved(path: &Path, names: &[String]) -> Result<bool> {
    if names.is_empty() {
        return Ok(false);
    }
    ensure_parent(path)?;
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("failed creating {}", path.display()))?;
    writer.write_record([NOT_FOUND_COLUMN])?;
    for name in names {
        writer.write_record([name.as_str()])?;
    }
    writer.flush().context("flush unresolved names")?;
    Ok(true)
}

/// A JSON object whose keys keep insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderedMap<V>(pub Vec<(String, V)>);

impl<V> OrderedMap<V> {
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(k, _)| k.as_str())
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }
}

impl<V: Serialize> Serialize for OrderedMap<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in &self.0 {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Threshold label (`"10+"`) to game count, in threshold order.
pub type JsonCounts = OrderedMap<OrderedMap<u32>>;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct JsonPlayer {
    pub player: String,
    pub gp: usize,
    #[serde(rename = "lastN")]
    pub last_n: JsonCounts,
    pub season: JsonCounts,
}

/// Teams in roster resolution order, metrics in threshold-table order.
pub type JsonPayload = OrderedMap<Vec<JsonPlayer>>;

pub fn json_payload(groups: &TeamGroups) -> JsonPayload {
    let teams = groups
        .iter()
        .map(|group| {
            let players = group
                .players
                .iter()
                .map(|p| JsonPlayer {
                    player: p.resolved_name.clone(),
                    gp: p.games_played,
                    last_n: counts_json(&p.recent_counts),
                    season: counts_json(&p.full_counts),
                })
                .collect();
            (group.team_abbrev.clone(), players)
        })
        .collect();
    OrderedMap(teams)
}

fn counts_json(counts: &MilestoneCounts) -> JsonCounts {
    let metrics = counts
        .iter()
        .map(|(metric, per_threshold)| {
            let inner = per_threshold
                .iter()
                .map(|(threshold, count)| (format!("{threshold}+"), *count))
                .collect();
            (metric.label().to_string(), OrderedMap(inner))
        })
        .collect();
    OrderedMap(metrics)
}

/// Writes the web payload. In a headless run an empty result leaves the
/// previous file in place.
pub fn write_json(path: &Path, groups: &TeamGroups, headless: bool) -> Result<bool> {
    if groups.is_empty() && headless && path.exists() {
        warn!(
            "no players processed, keeping existing {}",
            path.display()
        );
        return Ok(false);
    }
    ensure_parent(path)?;
    let json = serde_json::to_string(&json_payload(groups)).context("serialize milestones json")?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json).with_context(|| format!("write {}", tmp.display()))?;
    fs::rename(&tmp, path).with_context(|| format!("swap {}", path.display()))?;
    info!("json written -> {}", path.display());
    Ok(true)
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    }
    Ok(())
}
