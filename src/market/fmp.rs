//! Stock quotes from the Financial Modeling Prep `quote-short` endpoint.

use anyhow::{Context, Result};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::StockPriceSource;

const BASE_URL: &str = "https://financialmodelingprep.com/api/v3";

/// Latest-price provider backed by Financial Modeling Prep.
pub struct FmpPriceSource {
    api_key: String,
    base_url: String,
    client: Client,
}

impl FmpPriceSource {
    /// Creates a new price source with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: BASE_URL.to_string(),
            client: Client::new(),
        }
    }

    /// Creates a new price source with a custom reqwest client.
    pub fn with_client(api_key: impl Into<String>, client: Client) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: BASE_URL.to_string(),
            client,
        }
    }

    /// Overrides the API base URL. Tests point this at a local mock server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait::async_trait]
impl StockPriceSource for FmpPriceSource {
    async fn fetch_price(&self, symbol: &str) -> Result<Option<f64>> {
        let url = format!(
            "{}/quote-short/{}?apikey={}",
            self.base_url,
            symbol.to_uppercase(),
            self.api_key
        );

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .context("Failed to send request to FMP")?;

        if !response.status().is_success() {
            // Unknown symbols answer with an error status; they count as
            // "no quote", not as a failed batch.
            debug!(symbol = %symbol, status = %response.status(), "no quote from FMP");
            return Ok(None);
        }

        let quotes: Vec<QuoteShort> = response
            .json()
            .await
            .context("Failed to parse FMP response")?;

        Ok(quotes.first().and_then(|quote| quote.price))
    }

    fn name(&self) -> &str {
        "fmp"
    }
}

/// One element of the `quote-short` response array.
#[derive(Debug, Deserialize)]
struct QuoteShort {
    #[allow(dead_code)]
    symbol: Option<String>,
    price: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RESPONSE: &str = r#"[
        {
            "symbol": "AAPL",
            "price": 150.12,
            "volume": 42076700
        }
    ]"#;

    #[test]
    fn parse_quote_short_response() {
        let quotes: Vec<QuoteShort> = serde_json::from_str(SAMPLE_RESPONSE).unwrap();

        assert_eq!(quotes.len(), 1);
        assert_eq!(quotes[0].symbol.as_deref(), Some("AAPL"));
        assert_eq!(quotes[0].price, Some(150.12));
    }

    #[test]
    fn parse_empty_response() {
        let quotes: Vec<QuoteShort> = serde_json::from_str("[]").unwrap();
        assert!(quotes.first().and_then(|q| q.price).is_none());
    }

    #[test]
    fn provider_name() {
        let provider = FmpPriceSource::new("test_key");
        assert_eq!(provider.name(), "fmp");
    }
}
