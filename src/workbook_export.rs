use std::path::Path;

use anyhow::{Context, Result};
use rust_xlsxwriter::{Color, Format, Workbook, Worksheet};

use crate::report::{HighlightTier, TeamTable};
use crate::team::FREE_AGENT;

const SHEET_NAME_MAX: usize = 31;
const STRONG_GREEN: u32 = 0x99FF99;
const LIGHT_GREEN: u32 = 0xCCFFCC;
const HELPER_PREFIX: &str = "__helper_";

pub struct ExportReport {
    pub sheets: usize,
    pub players: usize,
    pub rows: usize,
}

/// One sheet per team. Every player column is followed by a hidden helper
/// column holding the season share as a fraction.
pub fn export_workbook(path: &Path, tables: &[TeamTable]) -> Result<ExportReport> {
    let strong = Format::new().set_background_color(Color::RGB(STRONG_GREEN));
    let light = Format::new().set_background_color(Color::RGB(LIGHT_GREEN));
    let header = Format::new().set_bold();

    let mut workbook = Workbook::new();
    let mut players = 0usize;
    let mut rows = 0usize;
    for table in tables {
        let sheet = workbook.add_worksheet();
        sheet
            .set_name(sheet_name(&table.team_abbrev))
            .with_context(|| format!("invalid sheet name for {}", table.team_abbrev))?;
        write_header(sheet, table, &header)?;

        for (row_idx, row) in table.rows.iter().enumerate() {
            let r = (row_idx + 1) as u32;
            sheet
                .write_string(r, 0, &row.label)
                .with_context(|| format!("write label ({r},0)"))?;
            for (player_idx, cell) in row.cells.iter().enumerate() {
                let (visible, helper) = player_columns(player_idx);
                match cell.tier {
                    Some(HighlightTier::Strong) => {
                        sheet.write_string_with_format(r, visible, &cell.text, &strong)
                    }
                    Some(HighlightTier::Light) => {
                        sheet.write_string_with_format(r, visible, &cell.text, &light)
                    }
                    None => sheet.write_string(r, visible, &cell.text),
                }
                .with_context(|| format!("write cell ({r},{visible})"))?;
                sheet
                    .write_number(r, helper, cell.full_pct)
                    .with_context(|| format!("write helper ({r},{helper})"))?;
            }
        }

        for player_idx in 0..table.players.len() {
            let (visible, helper) = player_columns(player_idx);
            sheet.set_column_width(visible, 26)?;
            sheet.set_column_hidden(helper)?;
        }
        sheet.set_column_width(0, 14)?;

        players += table.players.len();
        rows += table.rows.len();
    }

    workbook
        .save(path)
        .with_context(|| format!("failed writing workbook to {}", path.display()))?;

    Ok(ExportReport {
        sheets: tables.len(),
        players,
        rows,
    })
}

fn write_header(sheet: &mut Worksheet, table: &TeamTable, format: &Format) -> Result<()> {
    sheet.write_string_with_format(0, 0, "Milestones", format)?;
    for (player_idx, name) in table.players.iter().enumerate() {
        let (visible, helper) = player_columns(player_idx);
        sheet.write_string_with_format(0, visible, name, format)?;
        sheet.write_string(0, helper, format!("{HELPER_PREFIX}{name}"))?;
    }
    Ok(())
}

fn player_columns(player_idx: usize) -> (u16, u16) {
    let visible = (1 + 2 * player_idx) as u16;
    (visible, visible + 1)
}

pub fn sheet_name(team_abbrev: &str) -> String {
    let trimmed = team_abbrev.trim();
    let base = if trimmed.is_empty() { FREE_AGENT } else { trimmed };
    base.chars().take(SHEET_NAME_MAX).collect()
}

#[cfg(test)]
mod tests {
    use super::{player_columns, sheet_name};

    #[test]
    fn sheet_names_are_bounded() {
        assert_eq!(sheet_name(""), "FA");
        assert_eq!(sheet_name(" PHI "), "PHI");
        assert_eq!(sheet_name(&"X".repeat(40)).len(), 31);
    }

    #[test]
    fn helper_column_follows_player_column() {
        assert_eq!(player_columns(0), (1, 2));
        assert_eq!(player_columns(2), (5, 6));
    }
}
