use serde::Serialize;

/// Per-card aggregate over the dashboard's date interval.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CardSummary {
    pub last_digits: String,
    pub total_spent: f64,
    pub cashback: f64,
}

/// One of the five largest payments in the interval.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TopTransaction {
    pub date: String,
    pub amount: f64,
    pub category: String,
    pub description: String,
}

/// Conversion rate of one tracked currency into the home currency.
/// `rate` is null when the lookup failed; a failure never drops the entry.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CurrencyRate {
    pub currency: String,
    pub rate: Option<f64>,
}

/// Latest quote for one tracked symbol. `price` is null when the provider
/// had nothing for it.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StockPrice {
    pub stock: String,
    pub price: Option<f64>,
}

/// The full dashboard payload.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Dashboard {
    pub greeting: String,
    pub cards: Vec<CardSummary>,
    pub top_transactions: Vec<TopTransaction>,
    pub currency_rates: Vec<CurrencyRate>,
    pub stock_prices: Vec<StockPrice>,
}
