//! CSV ingestion for tabular datasets.
//!
//! Supported format:
//! - UTF-8, comma-separated
//! - Mandatory header row naming the columns
//! - Double-quoted fields with embedded commas are handled correctly
//! - Cells that do not parse as numbers (dates, text) become NaN

use crate::error::{EngineError, Result};
use crate::data::table::Table;

/// Parses CSV bytes into a [`Table`]. Blank lines are skipped; every data
/// row must match the header width.
pub fn parse_table(data: &[u8]) -> Result<Table> {
    let text = std::str::from_utf8(data)
        .map_err(|_| EngineError::Dataset("CSV file is not valid UTF-8".into()))?;

    let mut lines = text.lines().filter(|line| !line.trim().is_empty());

    let header = lines
        .next()
        .ok_or_else(|| EngineError::Dataset("CSV file is empty".into()))?;
    let columns: Vec<String> = parse_csv_row(header)
        .into_iter()
        .map(|c| c.trim().to_string())
        .collect();

    let mut rows: Vec<Vec<f64>> = Vec::new();
    for (row_idx, line) in lines.enumerate() {
        let cells = parse_csv_row(line);
        if cells.len() != columns.len() {
            return Err(EngineError::Dataset(format!(
                "row {}: expected {} cells, got {}",
                row_idx + 1,
                columns.len(),
                cells.len()
            )));
        }
        rows.push(
            cells.iter()
                .map(|c| c.trim().parse::<f64>().unwrap_or(f64::NAN))
                .collect(),
        );
    }

    Table::new(columns, rows)
}

/// Parses a single CSV row, handling double-quoted fields.
fn parse_csv_row(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let chars: Vec<char> = line.chars().collect();
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            '"' => {
                if in_quotes && i + 1 < chars.len() && chars[i + 1] == '"' {
                    // Escaped quote inside quoted field.
                    current.push('"');
                    i += 2;
                    continue;
                }
                in_quotes = !in_quotes;
            }
            ',' if !in_quotes => {
                fields.push(current.clone());
                current.clear();
            }
            c => current.push(c),
        }
        i += 1;
    }
    fields.push(current);
    fields
}
