use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, WriterBuilder};
use log::info;

use crate::error::RosterError;
use crate::roster::PlayerIndex;

pub const PLAYER_COLUMN: &str = "Player";
const DELIMITER: u8 = b';';

/// Player names from a `;`-separated roster with a `Player` column.
pub fn read_roster(path: &Path) -> Result<Vec<String>, RosterError> {
    let reader = ReaderBuilder::new()
        .delimiter(DELIMITER)
        .quote(b'"')
        .flexible(true)
        .from_path(path)
        .map_err(|source| RosterError::Read {
            path: path.to_path_buf(),
            source,
        })?;
    names_from_reader(reader, path)
}

pub fn parse_roster<R: Read>(rdr: R, label: &Path) -> Result<Vec<String>, RosterError> {
    let reader = ReaderBuilder::new()
        .delimiter(DELIMITER)
        .quote(b'"')
        .flexible(true)
        .from_reader(rdr);
    names_from_reader(reader, label)
}

fn names_from_reader<R: Read>(
    mut reader: csv::Reader<R>,
    path: &Path,
) -> Result<Vec<String>, RosterError> {
    let read_err = |source| RosterError::Read {
        path: path.to_path_buf(),
        source,
    };
    let headers = reader.headers().map_err(read_err)?.clone();
    let column = headers
        .iter()
        .position(|h| h.trim_start_matches('\u{feff}').trim() == PLAYER_COLUMN)
        .ok_or_else(|| RosterError::MissingPlayerColumn {
            path: path.to_path_buf(),
            found: headers.iter().collect::<Vec<_>>().join(", "),
        })?;

    let mut names = Vec::new();
    for record in reader.records() {
        let record = record.map_err(read_err)?;
        let name = record.get(column).unwrap_or("").trim();
        if !name.is_empty() {
            names.push(name.to_string());
        }
    }
    Ok(names)
}

pub fn write_roster(path: &Path, names: &[String]) -> Result<(), RosterError> {
    let write_err = |source| RosterError::Write {
        path: path.to_path_buf(),
        source,
    };
    let mut writer = WriterBuilder::new()
        .delimiter(DELIMITER)
        .from_path(path)
        .map_err(write_err)?;
    writer.write_record([PLAYER_COLUMN]).map_err(write_err)?;
    for name in names {
        writer.write_record([name.as_str()]).map_err(write_err)?;
    }
    writer.flush().map_err(|e| write_err(e.into()))?;
    Ok(())
}

/// Reads the roster, or writes one listing every active player when the file
/// does not exist yet.
pub fn load_or_generate(path: &Path, index: &PlayerIndex) -> Result<Vec<String>, RosterError> {
    if path.exists() {
        return read_roster(path);
    }
    let names: Vec<String> = index
        .active_players()
        .map(|p| p.full_name.clone())
        .collect();
    info!(
        "{} not found, generating it from {} active players",
        path.display(),
        names.len()
    );
    write_roster(path, &names)?;
    Ok(names)
}

pub fn apply_run_cap(mut names: Vec<String>, cap: Option<usize>) -> Vec<String> {
    if let Some(cap) = cap {
        if names.len() > cap {
            info!("limiting roster to {cap} of {} players", names.len());
            names.truncate(cap);
        }
    }
    names
}
