//! Spending reports over a rolling three-month window.

mod types;

pub use types::{CategorySpendingRow, DailyMeanRow, WorkdaySplit};

use std::collections::BTreeMap;

use anyhow::Result;
use chrono::{Datelike, Duration, NaiveDate};

use crate::clock::Clock;
use crate::format::{parse_amount, parse_export_date, render_export_date, round2};
use crate::models::{Operation, STATUS_OK};

/// Default lookback of the spending reports, in calendar months.
pub const DEFAULT_MONTHS_BACK: u32 = 3;

/// Days covered by `months` calendar months, as a fixed day count
/// (`months * 365.25 / 12`, rounded). Downstream consumers expect exactly
/// these boundaries, so the window does not follow true calendar months.
fn lookback_days(months: u32) -> i64 {
    (f64::from(months) * 365.25 / 12.0).round() as i64
}

/// Inclusive date window ending at a reference date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecentWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl RecentWindow {
    pub fn ending_at(reference: NaiveDate, months_back: u32) -> Self {
        Self {
            start: reference - Duration::days(lookback_days(months_back)),
            end: reference,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Reference date for a report: an explicit `dd.mm.yyyy` argument, or today.
fn resolve_reference(date: Option<&str>, clock: &dyn Clock) -> Result<NaiveDate> {
    match date {
        Some(raw) => parse_export_date(raw),
        None => Ok(clock.today()),
    }
}

/// Settled operations of one category in the three months ending at `date`,
/// newest first.
///
/// An empty category is a passthrough: every input row comes back projected
/// but otherwise untouched. No status or window filter, no reordering, and
/// the date string stays exactly as the export wrote it.
pub fn spending_by_category(
    operations: &[Operation],
    category: &str,
    date: Option<&str>,
    clock: &dyn Clock,
) -> Result<Vec<CategorySpendingRow>> {
    if category.trim().is_empty() {
        return Ok(operations.iter().map(passthrough_row).collect());
    }

    let window = RecentWindow::ending_at(resolve_reference(date, clock)?, DEFAULT_MONTHS_BACK);

    let mut dated: Vec<(NaiveDate, CategorySpendingRow)> = Vec::new();
    for operation in operations {
        if operation.status != STATUS_OK || operation.category != category {
            continue;
        }
        let day = parse_export_date(&operation.occurred_at)?;
        if !window.contains(day) {
            continue;
        }
        dated.push((
            day,
            CategorySpendingRow {
                date: render_export_date(day),
                card: operation.card.clone(),
                status: operation.status.clone(),
                amount: operation.amount.clone(),
                currency: operation.currency.clone(),
                category: operation.category.clone(),
            },
        ));
    }

    dated.sort_by(|a, b| b.0.cmp(&a.0));
    Ok(dated.into_iter().map(|(_, row)| row).collect())
}

fn passthrough_row(operation: &Operation) -> CategorySpendingRow {
    CategorySpendingRow {
        date: operation.occurred_at.clone(),
        card: operation.card.clone(),
        status: operation.status.clone(),
        amount: operation.amount.clone(),
        currency: operation.currency.clone(),
        category: operation.category.clone(),
    }
}

/// Mean settled spend per operation date in the window, earliest date first.
///
/// Despite the name, the grouping key is the calendar date, not the day of
/// week. Consumers key on the dates in the output and rely on that.
pub fn spending_by_weekday(
    operations: &[Operation],
    date: Option<&str>,
    clock: &dyn Clock,
) -> Result<Vec<DailyMeanRow>> {
    let window = RecentWindow::ending_at(resolve_reference(date, clock)?, DEFAULT_MONTHS_BACK);

    let mut groups: BTreeMap<NaiveDate, MeanAccumulator> = BTreeMap::new();
    for operation in operations {
        if operation.status != STATUS_OK {
            continue;
        }
        let day = parse_export_date(&operation.occurred_at)?;
        if !window.contains(day) {
            continue;
        }
        groups
            .entry(day)
            .or_default()
            .add(parse_amount(&operation.amount)?);
    }

    Ok(groups
        .into_iter()
        .filter_map(|(day, acc)| {
            acc.mean().map(|mean| DailyMeanRow {
                date: render_export_date(day),
                mean_amount: round2(mean),
            })
        })
        .collect())
}

/// Mean settled spend split into workday and weekend partitions.
///
/// Monday through Friday count as workdays. A partition that received no
/// operations reports `None` rather than a zero mean.
pub fn spending_by_workday(
    operations: &[Operation],
    date: Option<&str>,
    clock: &dyn Clock,
) -> Result<WorkdaySplit> {
    let window = RecentWindow::ending_at(resolve_reference(date, clock)?, DEFAULT_MONTHS_BACK);

    let mut workday = MeanAccumulator::default();
    let mut weekend = MeanAccumulator::default();
    for operation in operations {
        if operation.status != STATUS_OK {
            continue;
        }
        let day = parse_export_date(&operation.occurred_at)?;
        if !window.contains(day) {
            continue;
        }
        let amount = parse_amount(&operation.amount)?;
        if day.weekday().num_days_from_monday() < 5 {
            workday.add(amount);
        } else {
            weekend.add(amount);
        }
    }

    Ok(WorkdaySplit {
        workday: workday.mean().map(round2),
        weekend: weekend.mean().map(round2),
    })
}

#[derive(Debug, Default)]
struct MeanAccumulator {
    total: f64,
    count: usize,
}

impl MeanAccumulator {
    fn add(&mut self, value: f64) {
        self.total += value;
        self.count += 1;
    }

    fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.total / self.count as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;

    fn food(date: &str, amount: &str) -> Operation {
        Operation::new(date, amount).with_category("Супермаркеты")
    }

    #[test]
    fn recent_window_spans_ninety_one_days() {
        let reference = NaiveDate::from_ymd_opt(2024, 10, 3).unwrap();
        let window = RecentWindow::ending_at(reference, DEFAULT_MONTHS_BACK);
        assert_eq!(window.start, NaiveDate::from_ymd_opt(2024, 7, 4).unwrap());
        assert_eq!(window.end, reference);
        assert!(window.contains(window.start));
        assert!(window.contains(window.end));
        assert!(!window.contains(window.start - Duration::days(1)));
        assert!(!window.contains(window.end + Duration::days(1)));
    }

    #[test]
    fn category_report_filters_sorts_and_renders() {
        let operations = vec![
            food("01.07.2024 09:00:00", "-100").with_status("FAILED"),
            food("15.08.2024 12:00:00", "-200"),
            Operation::new("20.09.2024 18:00:00", "-300").with_category("Такси"),
            food("01.10.2024 09:30:00", "-400"),
            food("20.05.2024 18:00:00", "-500"),
        ];
        let clock = FixedClock::at(2024, 10, 3, 12, 0, 0);

        let rows = spending_by_category(&operations, "Супермаркеты", None, &clock).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].date, "01.10.2024");
        assert_eq!(rows[0].amount, "-400");
        assert_eq!(rows[1].date, "15.08.2024");
        assert_eq!(rows[1].amount, "-200");
    }

    #[test]
    fn category_report_honors_explicit_reference_date() {
        let operations = vec![food("20.05.2024", "-100")];
        let clock = FixedClock::at(2025, 1, 1, 0, 0, 0);

        let rows =
            spending_by_category(&operations, "Супермаркеты", Some("01.06.2024"), &clock).unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].date, "20.05.2024");
    }

    #[test]
    fn category_report_excludes_non_settled_operations() {
        let operations = vec![
            food("01.10.2024", "-400"),
            food("02.10.2024", "-400").with_status("FAILED"),
            food("02.10.2024", "-400").with_status(""),
        ];
        let clock = FixedClock::at(2024, 10, 3, 12, 0, 0);

        let rows = spending_by_category(&operations, "Супермаркеты", None, &clock).unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].date, "01.10.2024");
    }

    #[test]
    fn empty_category_passes_input_through_untouched() {
        let operations = vec![
            food("01.10.2024 10:00:00", "-400").with_status("FAILED"),
            food("20.05.2020 10:00:00", "-100"),
        ];
        let clock = FixedClock::at(2024, 10, 3, 12, 0, 0);

        let rows = spending_by_category(&operations, "", None, &clock).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].date, "01.10.2024 10:00:00");
        assert_eq!(rows[0].status, "FAILED");
        assert_eq!(rows[1].date, "20.05.2020 10:00:00");
    }

    #[test]
    fn no_matches_yield_an_empty_table() {
        let operations = vec![food("01.10.2024", "-400")];
        let clock = FixedClock::at(2024, 10, 3, 12, 0, 0);

        let rows = spending_by_category(&operations, "Аптеки", None, &clock).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn empty_input_yields_empty_reports() {
        let clock = FixedClock::at(2024, 10, 3, 12, 0, 0);

        assert!(spending_by_category(&[], "Супермаркеты", None, &clock)
            .unwrap()
            .is_empty());
        assert!(spending_by_weekday(&[], None, &clock).unwrap().is_empty());
    }

    #[test]
    fn weekday_report_groups_by_date_not_day_of_week() {
        // 01.10.2024 and 08.10.2024 are both Tuesdays; they must stay
        // separate rows.
        let operations = vec![
            food("01.10.2024", "-100"),
            food("01.10.2024", "-200"),
            food("08.10.2024", "-300"),
        ];
        let clock = FixedClock::at(2024, 10, 10, 12, 0, 0);

        let rows = spending_by_weekday(&operations, None, &clock).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].date, "01.10.2024");
        assert_eq!(rows[0].mean_amount, -150.0);
        assert_eq!(rows[1].date, "08.10.2024");
        assert_eq!(rows[1].mean_amount, -300.0);
    }

    #[test]
    fn weekday_report_skips_non_settled_and_rounds() {
        let operations = vec![
            food("01.10.2024", "-100"),
            food("01.10.2024", "-100"),
            food("01.10.2024", "-101"),
            food("01.10.2024", "-999").with_status("FAILED"),
        ];
        let clock = FixedClock::at(2024, 10, 10, 12, 0, 0);

        let rows = spending_by_weekday(&operations, None, &clock).unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].mean_amount, -100.33);
    }

    #[test]
    fn workday_report_splits_on_the_weekend_boundary() {
        // 04.10.2024 is a Friday, 05.10.2024 a Saturday.
        let operations = vec![
            food("04.10.2024", "-100"),
            food("04.10.2024", "-200"),
            food("05.10.2024", "-500"),
        ];
        let clock = FixedClock::at(2024, 10, 10, 12, 0, 0);

        let split = spending_by_workday(&operations, None, &clock).unwrap();

        assert_eq!(split.workday, Some(-150.0));
        assert_eq!(split.weekend, Some(-500.0));
    }

    #[test]
    fn workday_report_leaves_empty_partitions_undefined() {
        let operations = vec![food("04.10.2024", "-100")];
        let clock = FixedClock::at(2024, 10, 10, 12, 0, 0);

        let split = spending_by_workday(&operations, None, &clock).unwrap();

        assert_eq!(split.workday, Some(-100.0));
        assert_eq!(split.weekend, None);

        let empty = spending_by_workday(&[], None, &clock).unwrap();
        assert_eq!(empty.workday, None);
        assert_eq!(empty.weekend, None);
    }
}
