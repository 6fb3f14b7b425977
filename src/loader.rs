//! Reads card operation exports (CSV or XLSX) into memory.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{bail, Context, Result};
use calamine::{Data, Reader};
use tracing::warn;

use crate::models::{columns, Operation};

/// Load operations from an export file, dispatching on the extension.
///
/// A missing or unreadable file is not fatal: the problem is logged and an
/// empty set comes back, so reports render empty output instead of failing.
/// Rows that do not deserialize are skipped the same way.
pub fn load_operations(path: &Path, delimiter: u8) -> Vec<Operation> {
    let loaded = match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("csv") => read_csv(path, delimiter),
        Some(ext) if ext.eq_ignore_ascii_case("xlsx") || ext.eq_ignore_ascii_case("xls") => {
            read_xlsx(path)
        }
        other => {
            warn!(
                path = %path.display(),
                extension = ?other,
                "unsupported operations file extension"
            );
            return Vec::new();
        }
    };
    match loaded {
        Ok(operations) => operations,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to read operations file");
            Vec::new()
        }
    }
}

fn read_csv(path: &Path, delimiter: u8) -> Result<Vec<Operation>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("failed to open {}", path.display()))?;

    let mut operations = Vec::new();
    for record in reader.deserialize::<Operation>() {
        match record {
            Ok(operation) => operations.push(operation),
            Err(e) => warn!(error = %e, "skipping malformed export row"),
        }
    }
    Ok(operations)
}

fn read_xlsx(path: &Path) -> Result<Vec<Operation>> {
    let mut workbook = calamine::open_workbook_auto(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    let sheet = match workbook.sheet_names().first() {
        Some(name) => name.clone(),
        None => bail!("workbook has no sheets"),
    };
    let range = workbook
        .worksheet_range(&sheet)
        .with_context(|| format!("failed to read sheet {sheet:?}"))?;

    let mut rows = range.rows();
    let header = match rows.next() {
        Some(header) => header,
        None => return Ok(Vec::new()),
    };
    let index: HashMap<String, usize> = header
        .iter()
        .enumerate()
        .map(|(i, cell)| (cell_text(cell), i))
        .collect();
    for required in [columns::OCCURRED_AT, columns::AMOUNT] {
        if !index.contains_key(required) {
            bail!("missing column {required:?} in sheet {sheet:?}");
        }
    }
    let field = |row: &[Data], name: &str| -> String {
        index
            .get(name)
            .and_then(|&i| row.get(i))
            .map(cell_text)
            .unwrap_or_default()
    };

    let mut operations = Vec::new();
    for row in rows {
        let occurred_at = field(row, columns::OCCURRED_AT);
        if occurred_at.is_empty() {
            continue;
        }
        let cashback = field(row, columns::CASHBACK);
        operations.push(Operation {
            occurred_at,
            card: field(row, columns::CARD),
            status: field(row, columns::STATUS),
            amount: field(row, columns::AMOUNT),
            currency: field(row, columns::CURRENCY),
            cashback: (!cashback.is_empty()).then_some(cashback),
            category: field(row, columns::CATEGORY),
            description: field(row, columns::DESCRIPTION),
        });
    }
    Ok(operations)
}

/// Render a cell in the string form the rest of the pipeline expects.
/// Numeric cells print like Rust floats, so `100.0` becomes `100` and
/// fractional amounts keep a `.` separator.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.trim().to_string(),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}
