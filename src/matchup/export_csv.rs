//! Matchup table CSV: one row per weapon in ranked order, one column per
//! opponent plus the four summary fields.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::matchup::ranking::MatchupSummary;

pub const SUMMARY_COLUMNS: [&str; 4] = [
    "average_matchup",
    "winning_matchups",
    "losing_matchups",
    "tied_matchups",
];

pub fn matchup_header(rows: &[MatchupSummary]) -> Vec<String> {
    std::iter::once("name".to_string())
        .chain(rows.iter().map(|row| row.name.clone()))
        .chain(SUMMARY_COLUMNS.iter().map(|c| c.to_string()))
        .collect()
}

fn row_cells(row: &MatchupSummary, opponents: &[MatchupSummary]) -> Vec<String> {
    let mut cells = Vec::with_capacity(opponents.len() + 5);
    cells.push(row.name.clone());
    for opponent in opponents {
        cells.push(
            row.score_against(&opponent.name)
                .map(|score| score.to_string())
                .unwrap_or_default(),
        );
    }
    cells.push(row.average_matchup.to_string());
    cells.push(row.winning_matchups.to_string());
    cells.push(row.losing_matchups.to_string());
    cells.push(row.tied_matchups.to_string());
    cells
}

pub fn write_matchup_table<W: Write>(rows: &[MatchupSummary], writer: W) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(matchup_header(rows))?;
    for row in rows {
        writer.write_record(row_cells(row, rows))?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_matchup_csv(path: impl AsRef<Path>, rows: &[MatchupSummary]) -> Result<(), csv::Error> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    write_matchup_table(rows, File::create(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matchup::ranking::summarize_row;

    #[test]
    fn header_lists_ranked_names_then_summary_fields() {
        let names = vec!["Mace".to_string(), "Axe".to_string()];
        let rows = vec![
            summarize_row("Mace", &names, &[0.0, 2.0]),
            summarize_row("Axe", &names, &[-2.0, 0.0]),
        ];

        let mut out = Vec::new();
        write_matchup_table(&rows, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("name,Mace,Axe,average_matchup,winning_matchups,losing_matchups,tied_matchups")
        );
        assert_eq!(lines.next(), Some("Mace,0,2,1,1,0,1"));
        assert_eq!(lines.next(), Some("Axe,-2,0,-1,0,1,1"));
    }
}
