use crate::milestones::{Metric, MilestoneCounts, MilestoneThresholds, share};

pub const STRONG_TIER_MIN: f64 = 1.0;
pub const LIGHT_TIER_MIN: f64 = 0.85;

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerReport {
    pub resolved_name: String,
    pub team_abbrev: String,
    pub games_played: usize,
    pub recent_counts: MilestoneCounts,
    pub full_counts: MilestoneCounts,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TeamGroup {
    pub team_abbrev: String,
    pub players: Vec<PlayerReport>,
}

/// Reports grouped by team; teams and players keep arrival order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TeamGroups {
    groups: Vec<TeamGroup>,
}

impl TeamGroups {
    pub fn push(&mut self, report: PlayerReport) {
        match self
            .groups
            .iter_mut()
            .find(|g| g.team_abbrev == report.team_abbrev)
        {
            Some(group) => group.players.push(report),
            None => self.groups.push(TeamGroup {
                team_abbrev: report.team_abbrev.clone(),
                players: vec![report],
            }),
        }
    }

    pub fn get(&self, team_abbrev: &str) -> Option<&TeamGroup> {
        self.groups.iter().find(|g| g.team_abbrev == team_abbrev)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TeamGroup> {
        self.groups.iter()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn player_count(&self) -> usize {
        self.groups.iter().map(|g| g.players.len()).sum()
    }
}

pub fn assemble(reports: impl IntoIterator<Item = PlayerReport>) -> TeamGroups {
    let mut groups = TeamGroups::default();
    for report in reports {
        groups.push(report);
    }
    groups
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HighlightTier {
    Strong,
    Light,
}

impl HighlightTier {
    pub fn for_share(full_pct: f64) -> Option<Self> {
        if full_pct >= STRONG_TIER_MIN {
            Some(HighlightTier::Strong)
        } else if full_pct >= LIGHT_TIER_MIN {
            Some(HighlightTier::Light)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportCell {
    pub text: String,
    pub recent_count: u32,
    pub recent_pct: f64,
    pub full_count: u32,
    pub full_pct: f64,
    pub tier: Option<HighlightTier>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    pub label: String,
    pub metric: Metric,
    pub threshold: u32,
    pub cells: Vec<ReportCell>,
}

/// One team's sheet: a row per milestone, a column per player.
#[derive(Debug, Clone, PartialEq)]
pub struct TeamTable {
    pub team_abbrev: String,
    pub players: Vec<String>,
    pub rows: Vec<ReportRow>,
}

pub fn render_cell(
    report: &PlayerReport,
    metric: Metric,
    threshold: u32,
    window: usize,
) -> ReportCell {
    let recent_count = report.recent_counts.count(metric, threshold);
    let full_count = report.full_counts.count(metric, threshold);
    let recent_pct = share(recent_count, window);
    let full_pct = share(full_count, report.games_played);
    ReportCell {
        text: format!(
            "{recent_count} ({:.2}%) / {full_count} ({:.2}%)",
            recent_pct * 100.0,
            full_pct * 100.0
        ),
        recent_count,
        recent_pct,
        full_count,
        full_pct,
        tier: HighlightTier::for_share(full_pct),
    }
}

pub fn render_team(group: &TeamGroup, thresholds: &MilestoneThresholds, window: usize) -> TeamTable {
    let rows = thresholds
        .pairs()
        .map(|(metric, threshold)| ReportRow {
            label: format!("{metric} {threshold}+"),
            metric,
            threshold,
            cells: group
                .players
                .iter()
                .map(|p| render_cell(p, metric, threshold, window))
                .collect(),
        })
        .collect();
    TeamTable {
        team_abbrev: group.team_abbrev.clone(),
        players: group.players.iter().map(|p| p.resolved_name.clone()).collect(),
        rows,
    }
}

pub fn render_all(
    groups: &TeamGroups,
    thresholds: &MilestoneThresholds,
    window: usize,
) -> Vec<TeamTable> {
    groups
        .iter()
        .map(|g| render_team(g, thresholds, window))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{HighlightTier, PlayerReport, assemble};
    use crate::milestones::MilestoneCounts;

    fn report(name: &str, team: &str) -> PlayerReport {
        PlayerReport {
            resolved_name: name.to_string(),
            team_abbrev: team.to_string(),
            games_played: 0,
            recent_counts: MilestoneCounts::default(),
            full_counts: MilestoneCounts::default(),
        }
    }

    #[test]
    fn groups_keep_first_seen_team_and_player_order() {
        let groups = assemble(vec![
            report("a", "BOS"),
            report("b", "PHI"),
            report("c", "BOS"),
            report("d", "FA"),
        ]);
        let teams: Vec<&str> = groups.iter().map(|g| g.team_abbrev.as_str()).collect();
        assert_eq!(teams, vec!["BOS", "PHI", "FA"]);
        let bos: Vec<&str> = groups
            .get("BOS")
            .map(|g| g.players.iter().map(|p| p.resolved_name.as_str()).collect())
            .unwrap_or_default();
        assert_eq!(bos, vec!["a", "c"]);
        assert_eq!(groups.player_count(), 4);
    }

    #[test]
    fn tiers_split_at_85_and_100_percent() {
        assert_eq!(HighlightTier::for_share(1.0), Some(HighlightTier::Strong));
        assert_eq!(HighlightTier::for_share(0.85), Some(HighlightTier::Light));
        assert_eq!(HighlightTier::for_share(0.999), Some(HighlightTier::Light));
        assert_eq!(HighlightTier::for_share(0.849), None);
        assert_eq!(HighlightTier::for_share(0.0), None);
    }
}
