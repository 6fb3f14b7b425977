//! The landing-page payload: greeting, per-card spending, largest payments,
//! currency rates and stock prices for one reference moment.

mod types;

pub use types::{CardSummary, CurrencyRate, Dashboard, StockPrice, TopTransaction};

use std::cmp::Ordering;
use std::collections::BTreeMap;

use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};
use tracing::warn;

use crate::config::ResolvedConfig;
use crate::format::{parse_amount, parse_export_date, render_export_date, round2};
use crate::market::{CurrencyRateSource, StockPriceSource};
use crate::models::Operation;

/// Wire format of the dashboard's reference moment.
pub const MOMENT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Parses the reference moment (`YYYY-MM-DD HH:MM:SS`).
pub fn parse_moment(raw: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw.trim(), MOMENT_FORMAT)
        .with_context(|| format!("invalid dashboard moment: {raw:?}"))
}

/// First day of the moment's month through the moment's day, rendered in
/// the export's date format.
pub fn date_interval(moment: NaiveDateTime) -> (String, String) {
    let day = moment.date();
    let first = NaiveDate::from_ymd_opt(day.year(), day.month(), 1).expect("first of month");
    (render_export_date(first), render_export_date(day))
}

/// Greeting for the moment's time of day.
///
/// The day parts are open on the left: exactly 04:00:00, 12:00:00 and
/// 17:00:00 all fall through to the night greeting. Callers depend on
/// those boundary answers.
pub fn greeting(time: NaiveTime) -> &'static str {
    let at = |h, m, s| NaiveTime::from_hms_opt(h, m, s).expect("valid time of day");
    if time > at(4, 0, 0) && time <= at(11, 59, 59) {
        "Доброе утро"
    } else if time > at(12, 0, 0) && time <= at(16, 59, 59) {
        "Добрый день"
    } else if time > at(17, 0, 0) && time <= at(23, 59, 59) {
        "Добрый вечер"
    } else {
        "Доброй ночи"
    }
}

/// Card spending aggregates over an inclusive `dd.mm.yyyy` interval.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CardSpending {
    /// Total payment amount per card label.
    pub sums_by_card: BTreeMap<String, f64>,
    /// Reward per card label, one unit per hundred spent.
    pub cashback_by_card: BTreeMap<String, f64>,
    /// The five largest payments, largest first.
    pub top_transactions: Vec<TopTransaction>,
}

/// Aggregates operations per card between `first_date` and `last_date`,
/// both inclusive. Operations are counted regardless of status.
pub fn spending_by_card_numbers(
    operations: &[Operation],
    first_date: &str,
    last_date: &str,
) -> Result<CardSpending> {
    let first = parse_export_date(first_date)?;
    let last = parse_export_date(last_date)?;

    struct Row<'a> {
        day: NaiveDate,
        amount: f64,
        operation: &'a Operation,
    }

    let mut rows: Vec<Row> = Vec::new();
    for operation in operations {
        let day = parse_export_date(&operation.occurred_at)?;
        if day < first || day > last {
            continue;
        }
        rows.push(Row {
            day,
            amount: parse_amount(&operation.amount)?,
            operation,
        });
    }

    rows.sort_by(|a, b| b.amount.partial_cmp(&a.amount).unwrap_or(Ordering::Equal));

    let top_transactions = rows
        .iter()
        .take(5)
        .map(|row| TopTransaction {
            date: render_export_date(row.day),
            amount: row.amount,
            category: row.operation.category.clone(),
            description: row.operation.description.clone(),
        })
        .collect();

    let mut spending = CardSpending {
        top_transactions,
        ..CardSpending::default()
    };
    for row in &rows {
        *spending
            .sums_by_card
            .entry(row.operation.card.clone())
            .or_insert(0.0) += row.amount;
        *spending
            .cashback_by_card
            .entry(row.operation.card.clone())
            .or_insert(0.0) += row.amount / 100.0;
    }
    for total in spending.sums_by_card.values_mut() {
        *total = round2(*total);
    }
    for reward in spending.cashback_by_card.values_mut() {
        *reward = round2(*reward);
    }

    Ok(spending)
}

/// Final four characters of a card label (`*7197` reads back as `7197`).
fn last_digits(card: &str) -> String {
    let chars: Vec<char> = card.chars().collect();
    let start = chars.len().saturating_sub(4);
    chars[start..].iter().collect()
}

/// Assembles the dashboard payload for the moment in `date_string`
/// (`YYYY-MM-DD HH:MM:SS`).
///
/// Rate and price lookups run one request per tracked item, sequentially.
/// A failed lookup degrades that entry to a null value and the batch
/// continues.
pub async fn build_dashboard(
    operations: &[Operation],
    config: &ResolvedConfig,
    rates: &dyn CurrencyRateSource,
    stocks: &dyn StockPriceSource,
    date_string: &str,
) -> Result<Dashboard> {
    let moment = parse_moment(date_string)?;
    let (first_date, last_date) = date_interval(moment);

    let spending = spending_by_card_numbers(operations, &first_date, &last_date)?;

    let cards = spending
        .sums_by_card
        .iter()
        .map(|(card, total)| CardSummary {
            last_digits: last_digits(card),
            total_spent: *total,
            cashback: spending
                .cashback_by_card
                .get(card)
                .copied()
                .unwrap_or_default(),
        })
        .collect();

    let mut currency_rates = Vec::with_capacity(config.currencies.len());
    for currency in &config.currencies {
        let rate = match rates.fetch_rate(currency, &config.home_currency).await {
            Ok(rate) => Some(rate),
            Err(e) => {
                warn!(
                    provider = rates.name(),
                    currency = %currency,
                    error = %e,
                    "currency rate lookup failed"
                );
                None
            }
        };
        currency_rates.push(CurrencyRate {
            currency: currency.clone(),
            rate,
        });
    }

    let mut stock_prices = Vec::with_capacity(config.stocks.len());
    for symbol in &config.stocks {
        let price = match stocks.fetch_price(symbol).await {
            Ok(price) => price,
            Err(e) => {
                warn!(
                    provider = stocks.name(),
                    stock = %symbol,
                    error = %e,
                    "stock price lookup failed"
                );
                None
            }
        };
        stock_prices.push(StockPrice {
            stock: symbol.clone(),
            price,
        });
    }

    Ok(Dashboard {
        greeting: greeting(moment.time()).to_string(),
        cards,
        top_transactions: spending.top_transactions,
        currency_rates,
        stock_prices,
    })
}
