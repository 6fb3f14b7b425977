//! External market lookups feeding the dashboard: currency conversion rates
//! and stock quotes.

mod apilayer;
mod fmp;

pub use apilayer::ApilayerRateSource;
pub use fmp::FmpPriceSource;

use anyhow::Result;

/// Why a currency-rate lookup produced no rate.
///
/// A rejection carries the provider's reason phrase so callers can show it
/// in place of a rate; transport and decoding failures keep their own
/// context chain.
#[derive(Debug, thiserror::Error)]
pub enum RateLookupError {
    #[error("{0}")]
    Rejected(String),
    #[error(transparent)]
    Transport(#[from] anyhow::Error),
}

/// Source of conversion rates for one unit of a currency.
#[async_trait::async_trait]
pub trait CurrencyRateSource: Send + Sync {
    /// Rate converting one unit of `from` into `to`.
    async fn fetch_rate(&self, from: &str, to: &str) -> Result<f64, RateLookupError>;

    /// Short identifier for logs.
    fn name(&self) -> &str;
}

/// Source of latest quoted prices for ticker symbols.
#[async_trait::async_trait]
pub trait StockPriceSource: Send + Sync {
    /// Latest price for `symbol`. `Ok(None)` means the provider had no
    /// quote; unknown symbols land here rather than in the error path.
    async fn fetch_price(&self, symbol: &str) -> Result<Option<f64>>;

    /// Short identifier for logs.
    fn name(&self) -> &str;
}
