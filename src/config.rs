use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use chrono::{Datelike, NaiveDate, Utc};

use crate::aliases::{AliasTable, ManualOverrideTable};
use crate::error::ConfigError;
use crate::milestones::MilestoneThresholds;
use crate::retry::{DEFAULT_ATTEMPTS, RetryPolicy};

pub const DEFAULT_WINDOW: usize = 8;
pub const DEFAULT_CALL_DELAY_MS: u64 = 100;

#[derive(Debug, Clone)]
pub struct RunConfig {
    pub season: String,
    pub recent_window: usize,
    pub call_delay: Duration,
    pub retry: RetryPolicy,
    pub max_players: Option<usize>,
    pub headless: bool,
    pub input_csv: PathBuf,
    pub output_xlsx: PathBuf,
    pub not_found_csv: PathBuf,
    pub output_json: PathBuf,
    pub aliases_json: Option<PathBuf>,
    pub manual_ids_json: Option<PathBuf>,
    pub milestones_json: Option<PathBuf>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            season: season_for(Utc::now().date_naive()),
            recent_window: DEFAULT_WINDOW,
            call_delay: Duration::from_millis(DEFAULT_CALL_DELAY_MS),
            retry: RetryPolicy::default(),
            max_players: None,
            headless: false,
            input_csv: PathBuf::from("PlayerNames.csv"),
            output_xlsx: PathBuf::from("TeamStatistiken_Meilensteine.xlsx"),
            not_found_csv: PathBuf::from("not_found_names.csv"),
            output_json: PathBuf::from("public/data/milestones.json"),
            aliases_json: None,
            manual_ids_json: None,
            milestones_json: None,
        }
    }
}

impl RunConfig {
    /// Defaults overridden by environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let mut cfg = Self::default();

        if let Some(season) = get("SEASON") {
            cfg.season = parse_season(&season)?;
        }
        if let Some(window) = get("LAST_N") {
            cfg.recent_window = parse_number("LAST_N", &window)?;
        }
        if let Some(ms) = get("SLEEP_BETWEEN_CALLS_MS") {
            cfg.call_delay = Duration::from_millis(parse_number("SLEEP_BETWEEN_CALLS_MS", &ms)?);
        }
        let attempts = match get("RETRY_ATTEMPTS") {
            Some(v) => parse_number("RETRY_ATTEMPTS", &v)?,
            None => DEFAULT_ATTEMPTS,
        };
        let delay = match get("RETRY_DELAY_MS") {
            Some(v) => Duration::from_millis(parse_number("RETRY_DELAY_MS", &v)?),
            None => cfg.retry.delay,
        };
        cfg.retry = RetryPolicy::new(attempts, delay);

        cfg.headless = get("CI").is_some() || get("GITHUB_ACTIONS").is_some();
        if cfg.headless {
            if let Some(cap) = get("MAX_PLAYERS") {
                cfg.max_players = Some(parse_number("MAX_PLAYERS", &cap)?);
            }
        }

        if let Some(path) = get("INPUT_CSV") {
            cfg.input_csv = PathBuf::from(path);
        }
        if let Some(path) = get("OUTPUT_XLSX") {
            cfg.output_xlsx = PathBuf::from(path);
        }
        if let Some(path) = get("NOT_FOUND_CSV") {
            cfg.not_found_csv = PathBuf::from(path);
        }
        if let Some(path) = get("OUTPUT_JSON") {
            cfg.output_json = PathBuf::from(path);
        }
        cfg.aliases_json = get("ALIASES_JSON").map(PathBuf::from);
        cfg.manual_ids_json = get("MANUAL_IDS_JSON").map(PathBuf::from);
        cfg.milestones_json = get("MILESTONES_JSON").map(PathBuf::from);
        Ok(cfg)
    }

    pub fn alias_table(&self) -> Result<AliasTable> {
        let mut table = AliasTable::builtin();
        if let Some(path) = &self.aliases_json {
            table.extend_from_json_file(path)?;
        }
        Ok(table)
    }

    pub fn manual_overrides(&self) -> Result<ManualOverrideTable> {
        let mut table = ManualOverrideTable::default();
        if let Some(path) = &self.manual_ids_json {
            table.extend_from_json_file(path)?;
        }
        Ok(table)
    }

    pub fn thresholds(&self) -> Result<MilestoneThresholds> {
        match &self.milestones_json {
            Some(path) => MilestoneThresholds::from_json_file(path),
            None => Ok(MilestoneThresholds::default()),
        }
    }
}

/// env_logger filter for `LOG_LEVEL`: 0, 1 and 2 pick error, warn and info;
/// anything else is passed through as a filter string.
pub fn log_filter(level: Option<&str>) -> String {
    match level.map(str::trim) {
        None | Some("") => "info".to_string(),
        Some("0") => "error".to_string(),
        Some("1") => "warn".to_string(),
        Some("2") => "info".to_string(),
        Some(other) => other.to_string(),
    }
}

/// Loads `.env.local` then `.env`, and installs the logger.
pub fn init_env() {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    let filter = log_filter(env::var("LOG_LEVEL").ok().as_deref());
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter))
        .format_timestamp_secs()
        .try_init();
}

/// Season token for a date; seasons roll over in October.
pub fn season_for(date: NaiveDate) -> String {
    let start = if date.month() >= 10 {
        date.year()
    } else {
        date.year() - 1
    };
    format!("{start}-{:02}", (start + 1).rem_euclid(100))
}

fn parse_season(raw: &str) -> Result<String, ConfigError> {
    let invalid = || ConfigError::InvalidValue {
        key: "SEASON",
        value: raw.to_string(),
    };
    let (start, end) = raw.split_once('-').ok_or_else(invalid)?;
    let start: i32 = start.parse().map_err(|_| invalid())?;
    let end: i32 = end.parse().map_err(|_| invalid())?;
    if end.to_string().len() > 2 || (start + 1).rem_euclid(100) != end {
        return Err(invalid());
    }
    Ok(raw.to_string())
}

fn parse_number<T: std::str::FromStr>(key: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.parse::<T>().map_err(|_| ConfigError::InvalidValue {
        key,
        value: raw.to_string(),
    })
}
