//! Ranks categories by cashback earned in one calendar month.

use std::collections::BTreeMap;

use anyhow::{ensure, Context, Result};
use chrono::NaiveDate;

use crate::format::{parse_amount, parse_export_date, round2};
use crate::models::Operation;

/// Upper-bound day per month. February stays at 28 in leap years too: the
/// published totals have always cut a leap February at the 28th, and
/// consumers reconcile against those totals.
const DAYS_IN_MONTH: [u32; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// Total cashback per category over one calendar month, keyed by category.
///
/// Rows without a cashback value count as zero, so every category active in
/// the month appears in the result. No rows in the month yields an empty
/// mapping.
pub fn increased_cashback_categories(
    operations: &[Operation],
    year: i32,
    month: u32,
) -> Result<BTreeMap<String, f64>> {
    ensure!((1..=12).contains(&month), "invalid month: {month}");
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .with_context(|| format!("invalid year: {year}"))?;
    let last = NaiveDate::from_ymd_opt(year, month, DAYS_IN_MONTH[(month - 1) as usize])
        .with_context(|| format!("invalid year: {year}"))?;

    let mut totals: BTreeMap<String, f64> = BTreeMap::new();
    for operation in operations {
        let day = parse_export_date(&operation.occurred_at)?;
        if day < first || day > last {
            continue;
        }
        let cashback = match operation.cashback.as_deref() {
            None => 0.0,
            Some(raw) if raw.trim().is_empty() => 0.0,
            Some(raw) => parse_amount(raw)?,
        };
        *totals.entry(operation.category.clone()).or_insert(0.0) += cashback;
    }

    for total in totals.values_mut() {
        *total = round2(*total);
    }
    Ok(totals)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn operation(date: &str, category: &str, cashback: Option<&str>) -> Operation {
        let operation = Operation::new(date, "-100").with_category(category);
        match cashback {
            Some(value) => operation.with_cashback(value),
            None => operation,
        }
    }

    #[test]
    fn sums_cashback_per_category_within_the_month() {
        let operations = vec![
            operation("05.04.2023 10:00:00", "Супермаркеты", Some("10,5")),
            operation("20.04.2023 11:00:00", "Супермаркеты", Some("4.5")),
            operation("21.04.2023 12:00:00", "Такси", Some("3")),
            operation("01.05.2023 09:00:00", "Такси", Some("99")),
        ];

        let totals = increased_cashback_categories(&operations, 2023, 4).unwrap();

        assert_eq!(totals.len(), 2);
        assert_eq!(totals["Супермаркеты"], 15.0);
        assert_eq!(totals["Такси"], 3.0);
    }

    #[test]
    fn missing_cashback_counts_as_zero() {
        let operations = vec![
            operation("05.04.2023", "Аптеки", None),
            operation("06.04.2023", "Аптеки", Some("")),
            operation("07.04.2023", "Аптеки", Some("2")),
        ];

        let totals = increased_cashback_categories(&operations, 2023, 4).unwrap();

        assert_eq!(totals["Аптеки"], 2.0);
    }

    #[test]
    fn leap_february_still_ends_on_the_twenty_eighth() {
        let operations = vec![
            operation("28.02.2024", "Супермаркеты", Some("5")),
            operation("29.02.2024", "Супермаркеты", Some("7")),
        ];

        let totals = increased_cashback_categories(&operations, 2024, 2).unwrap();

        assert_eq!(totals["Супермаркеты"], 5.0);
    }

    #[test]
    fn month_without_operations_is_empty() {
        let operations = vec![operation("05.04.2023", "Такси", Some("3"))];

        let totals = increased_cashback_categories(&operations, 2023, 7).unwrap();
        assert!(totals.is_empty());

        assert!(increased_cashback_categories(&operations, 2023, 13).is_err());
    }
}
