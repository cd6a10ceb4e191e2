pub mod aliases;
pub mod config;
pub mod error;
pub mod game_log;
pub mod http_client;
pub mod milestones;
pub mod nba_stats;
pub mod normalize;
pub mod pipeline;
pub mod provider;
pub mod report;
pub mod resolve;
pub mod retry;
pub mod roster;
pub mod roster_source;
pub mod similarity;
pub mod sinks;
pub mod team;
pub mod workbook_export;
