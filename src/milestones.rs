use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::error::ConfigError;
use crate::game_log::GameRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Metric {
    Pts,
    Reb,
    Ast,
    Stl,
    Blk,
    StlBlk,
    Fg3m,
    Fg2m,
    Ftm,
    To,
}

impl Metric {
    pub fn label(self) -> &'static str {
        match self {
            Metric::Pts => "PTS",
            Metric::Reb => "REB",
            Metric::Ast => "AST",
            Metric::Stl => "STL",
            Metric::Blk => "BLK",
            Metric::StlBlk => "STL+BLK",
            Metric::Fg3m => "FG3M",
            Metric::Fg2m => "FG2M",
            Metric::Ftm => "FTM",
            Metric::To => "TO",
        }
    }

    pub fn value(self, game: &GameRecord) -> u32 {
        match self {
            Metric::Pts => game.pts,
            Metric::Reb => game.reb,
            Metric::Ast => game.ast,
            Metric::Stl => game.stl,
            Metric::Blk => game.blk,
            Metric::StlBlk => game.stl.saturating_add(game.blk),
            Metric::Fg3m => game.fg3m,
            Metric::Fg2m => game.fg2m(),
            Metric::Ftm => game.ftm,
            Metric::To => game.tov,
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Metric {
    type Err = ConfigError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let key = s.trim().to_ascii_uppercase().replace(' ', "");
        let metric = match key.as_str() {
            "PTS" => Metric::Pts,
            "REB" => Metric::Reb,
            "AST" => Metric::Ast,
            "STL" => Metric::Stl,
            "BLK" => Metric::Blk,
            "STL+BLK" => Metric::StlBlk,
            "FG3M" => Metric::Fg3m,
            "FG2M" => Metric::Fg2m,
            "FTM" => Metric::Ftm,
            "TO" | "TOV" => Metric::To,
            _ => return Err(ConfigError::UnknownMetric(s.to_string())),
        };
        Ok(metric)
    }
}

/// Ordered milestone table. Metric order is the report's row order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MilestoneThresholds {
    entries: Vec<(Metric, Vec<u32>)>,
}

impl MilestoneThresholds {
    pub fn new(entries: Vec<(Metric, Vec<u32>)>) -> std::result::Result<Self, ConfigError> {
        for (idx, (metric, values)) in entries.iter().enumerate() {
            if entries[..idx].iter().any(|(seen, _)| seen == metric) {
                return Err(ConfigError::DuplicateMetric(metric.label().to_string()));
            }
            let ascending = values.windows(2).all(|w| w[0] < w[1]);
            if !ascending || values.first().is_some_and(|&v| v == 0) {
                return Err(ConfigError::Thresholds {
                    metric: metric.label().to_string(),
                    values: values.clone(),
                });
            }
        }
        Ok(Self { entries })
    }

    pub fn iter(&self) -> impl Iterator<Item = (Metric, &[u32])> {
        self.entries.iter().map(|(m, v)| (*m, v.as_slice()))
    }

    /// Every (metric, threshold) pair in report order.
    pub fn pairs(&self) -> impl Iterator<Item = (Metric, u32)> + '_ {
        self.entries
            .iter()
            .flat_map(|(m, v)| v.iter().map(move |t| (*m, *t)))
    }

    pub fn row_count(&self) -> usize {
        self.entries.iter().map(|(_, v)| v.len()).sum()
    }

    /// Reads `[{"metric": "PTS", "thresholds": [10, 20]}, ...]`.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("read milestones file {}", path.display()))?;
        Self::from_json_str(&raw).with_context(|| format!("milestones file {}", path.display()))
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        let parsed: Vec<ThresholdEntry> =
            serde_json::from_str(raw).context("invalid milestones json")?;
        let mut entries = Vec::with_capacity(parsed.len());
        for entry in parsed {
            entries.push((entry.metric.parse::<Metric>()?, entry.thresholds));
        }
        Ok(Self::new(entries)?)
    }
}

impl Default for MilestoneThresholds {
    fn default() -> Self {
        Self {
            entries: vec![
                (Metric::Pts, vec![3, 5, 7, 10, 12, 14, 17, 20]),
                (Metric::Reb, (1..=10).collect()),
                (Metric::Ast, (1..=10).collect()),
                (Metric::Stl, vec![1, 2]),
                (Metric::Blk, vec![1, 2]),
                (Metric::StlBlk, vec![1, 2, 3]),
                (Metric::Fg3m, vec![1, 2, 3]),
                (Metric::Fg2m, vec![2, 4, 6, 8, 10, 12]),
                (Metric::Ftm, vec![2, 4, 6, 8, 10]),
                (Metric::To, vec![1, 2, 3, 4, 5]),
            ],
        }
    }
}

#[derive(Debug, Deserialize)]
struct ThresholdEntry {
    metric: String,
    thresholds: Vec<u32>,
}

/// Games reaching each threshold of one metric.
pub type MilestoneCount = BTreeMap<u32, u32>;

/// Counts for every configured metric over one window of games.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MilestoneCounts {
    by_metric: Vec<(Metric, MilestoneCount)>,
}

impl MilestoneCounts {
    pub fn get(&self, metric: Metric) -> Option<&MilestoneCount> {
        self.by_metric
            .iter()
            .find(|(m, _)| *m == metric)
            .map(|(_, counts)| counts)
    }

    pub fn count(&self, metric: Metric, threshold: u32) -> u32 {
        self.get(metric)
            .and_then(|c| c.get(&threshold))
            .copied()
            .unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Metric, &MilestoneCount)> {
        self.by_metric.iter().map(|(m, c)| (*m, c))
    }
}

pub fn count_milestones(games: &[GameRecord], thresholds: &MilestoneThresholds) -> MilestoneCounts {
    let by_metric = thresholds
        .iter()
        .map(|(metric, limits)| {
            let counts = limits
                .iter()
                .map(|&limit| {
                    let hits = games.iter().filter(|g| metric.value(g) >= limit).count();
                    (limit, hits as u32)
                })
                .collect();
            (metric, counts)
        })
        .collect();
    MilestoneCounts { by_metric }
}

/// The most recent `window` games, assuming newest-first order.
pub fn recent_window(games: &[GameRecord], window: usize) -> &[GameRecord] {
    &games[..window.min(games.len())]
}

/// `count / denominator`, or zero when there is nothing to divide by.
pub fn share(count: u32, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        f64::from(count) / denominator as f64
    }
}

#[cfg(test)]
mod tests {
    use super::{
        Metric, MilestoneThresholds, count_milestones, recent_window, share,
    };
    use crate::error::ConfigError;
    use crate::game_log::GameRecord;

    fn game(pts: u32, stl: u32, blk: u32) -> GameRecord {
        GameRecord {
            pts,
            stl,
            blk,
            ..GameRecord::default()
        }
    }

    #[test]
    fn counts_games_at_or_above_each_threshold() {
        let thresholds = MilestoneThresholds::new(vec![(Metric::Pts, vec![10, 20])]).unwrap();
        let counts = count_milestones(&[game(25, 0, 0), game(15, 0, 0)], &thresholds);
        assert_eq!(counts.count(Metric::Pts, 10), 2);
        assert_eq!(counts.count(Metric::Pts, 20), 1);
    }

    #[test]
    fn composite_adds_steals_and_blocks() {
        let thresholds =
            MilestoneThresholds::new(vec![(Metric::StlBlk, vec![1, 2, 3])]).unwrap();
        let counts = count_milestones(
            &[game(0, 1, 1), game(0, 0, 1), game(0, 2, 1), game(0, 0, 0)],
            &thresholds,
        );
        assert_eq!(counts.count(Metric::StlBlk, 1), 3);
        assert_eq!(counts.count(Metric::StlBlk, 2), 2);
        assert_eq!(counts.count(Metric::StlBlk, 3), 1);
    }

    #[test]
    fn counts_are_non_increasing_for_default_table() {
        let games: Vec<GameRecord> = (0..30)
            .map(|i| GameRecord {
                pts: i * 3 % 31,
                reb: i % 11,
                ast: (i * 7) % 12,
                stl: i % 3,
                blk: (i + 1) % 3,
                fgm: i % 14,
                fg3m: i % 5,
                ftm: i % 9,
                tov: i % 6,
                ..GameRecord::default()
            })
            .collect();
        let counts = count_milestones(&games, &MilestoneThresholds::default());
        for (metric, per_threshold) in counts.iter() {
            let values: Vec<u32> = per_threshold.values().copied().collect();
            assert!(
                values.windows(2).all(|w| w[0] >= w[1]),
                "{metric} not monotone: {values:?}"
            );
        }
    }

    #[test]
    fn empty_game_list_counts_zero() {
        let counts = count_milestones(&[], &MilestoneThresholds::default());
        assert_eq!(counts.count(Metric::Pts, 3), 0);
        assert_eq!(counts.get(Metric::To).map(|c| c.len()), Some(5));
    }

    #[test]
    fn rejects_unsorted_or_zero_thresholds() {
        assert!(matches!(
            MilestoneThresholds::new(vec![(Metric::Pts, vec![10, 10])]),
            Err(ConfigError::Thresholds { .. })
        ));
        assert!(MilestoneThresholds::new(vec![(Metric::Pts, vec![0, 1])]).is_err());
        assert!(MilestoneThresholds::new(vec![(Metric::Pts, vec![])]).is_ok());
    }

    #[test]
    fn rejects_metric_listed_twice() {
        let err = MilestoneThresholds::new(vec![(Metric::Pts, vec![10]), (Metric::Pts, vec![20])])
            .unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateMetric(ref m) if m == "PTS"));
        assert!(MilestoneThresholds::from_json_str(
            r#"[{"metric": "TO", "thresholds": [1]}, {"metric": "TOV", "thresholds": [2]}]"#
        )
        .is_err());
    }

    #[test]
    fn parses_json_table_in_order() {
        let table = MilestoneThresholds::from_json_str(
            r#"[{"metric": "TOV", "thresholds": [1]}, {"metric": "stl+blk", "thresholds": [2, 4]}]"#,
        )
        .unwrap();
        let pairs: Vec<_> = table.pairs().collect();
        assert_eq!(
            pairs,
            vec![(Metric::To, 1), (Metric::StlBlk, 2), (Metric::StlBlk, 4)]
        );
        assert!(MilestoneThresholds::from_json_str(r#"[{"metric": "XYZ", "thresholds": [1]}]"#).is_err());
    }

    #[test]
    fn recent_window_is_a_bounded_prefix() {
        let games: Vec<GameRecord> = (0..5).map(|i| game(i, 0, 0)).collect();
        assert_eq!(recent_window(&games, 8).len(), 5);
        assert_eq!(recent_window(&games, 2).iter().map(|g| g.pts).collect::<Vec<_>>(), vec![0, 1]);
        assert!(recent_window(&games, 0).is_empty());
    }

    #[test]
    fn share_is_zero_without_denominator() {
        assert_eq!(share(3, 0), 0.0);
        assert_eq!(share(4, 8), 0.5);
        assert_eq!(share(8, 8), 1.0);
    }
}
