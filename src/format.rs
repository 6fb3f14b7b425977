use anyhow::{Context, Result};
use chrono::NaiveDate;

/// Date format used throughout the operation exports and the report output.
pub const DATE_FORMAT: &str = "%d.%m.%Y";

/// Parse an export date, ignoring any trailing time of day.
///
/// Exports write `31.12.2021 16:44:00` in the operation column and plain
/// `31.12.2021` in report arguments; both forms parse to the same date.
pub fn parse_export_date(raw: &str) -> Result<NaiveDate> {
    let date_part = raw.trim().split_whitespace().next().unwrap_or("");
    NaiveDate::parse_from_str(date_part, DATE_FORMAT)
        .with_context(|| format!("invalid export date: {raw:?}"))
}

/// Render a date back into the export's `dd.mm.yyyy` form.
pub fn render_export_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parse an amount that may use a decimal comma (`1234,56`).
pub fn parse_amount(raw: &str) -> Result<f64> {
    let normalized = raw.trim().replace(',', ".");
    normalized
        .parse::<f64>()
        .with_context(|| format!("invalid amount: {raw:?}"))
}

/// Round to two decimal places, the precision every report publishes.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
