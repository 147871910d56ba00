//! Raw balance export reader. The export is a data table dump whose `Rows`
//! object maps dotted row names (`Weapon_Messer.SlashHeavy`) to flat stat rows.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to read export '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse export JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("export contains no data table")]
    Empty,
}

#[derive(Debug, Deserialize)]
struct ExportTable {
    #[serde(rename = "Rows")]
    rows: Map<String, Value>,
}

/// Older dumps are a single table, newer ones wrap it in a list.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ExportLayout {
    Table(ExportTable),
    Tables(Vec<ExportTable>),
}

/// Export rows in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawExport {
    pub rows: Vec<(String, Map<String, Value>)>,
}

impl RawExport {
    pub fn from_rows(rows: Map<String, Value>) -> Self {
        let rows = rows
            .into_iter()
            .filter_map(|(name, row)| match row {
                Value::Object(fields) => Some((name, fields)),
                other => {
                    tracing::debug!(row = %name, value = %other, "skipping non-object export row");
                    None
                }
            })
            .collect();
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

pub fn parse_export(input: &str) -> Result<RawExport, ExportError> {
    let table = match serde_json::from_str::<ExportLayout>(input)? {
        ExportLayout::Table(table) => table,
        ExportLayout::Tables(tables) => tables.into_iter().next().ok_or(ExportError::Empty)?,
    };
    Ok(RawExport::from_rows(table.rows))
}

pub fn load_export(path: impl AsRef<Path>) -> Result<RawExport, ExportError> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).map_err(|source| ExportError::Read {
        path: path.display().to_string(),
        source,
    })?;
    parse_export(&raw)
}
