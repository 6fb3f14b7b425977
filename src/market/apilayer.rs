//! Currency conversion rates from the apilayer Exchange Rates Data API.
//!
//! Uses the `/convert` endpoint with an amount of one, so the conversion
//! result doubles as the rate. The API key travels in the `apikey` header.

use anyhow::Context;
use reqwest::Client;
use serde::Deserialize;

use super::{CurrencyRateSource, RateLookupError};

const BASE_URL: &str = "https://api.apilayer.com/exchangerates_data";

/// Conversion-rate provider backed by apilayer.
pub struct ApilayerRateSource {
    api_key: String,
    base_url: String,
    client: Client,
}

impl ApilayerRateSource {
    /// Creates a new rate source with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: BASE_URL.to_string(),
            client: Client::new(),
        }
    }

    /// Creates a new rate source with a custom reqwest client.
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
impl CurrencyRateSource for ApilayerRateSource {
    async fn fetch_rate(&self, from: &str, to: &str) -> Result<f64, RateLookupError> {
        let url = format!(
            "{}/convert?to={}&from={}&amount=1",
            self.base_url,
            to.to_uppercase(),
            from.to_uppercase()
        );

        let response = self
            .client
            .get(&url)
            .header("apikey", &self.api_key)
            .send()
            .await
            .context("Failed to send request to apilayer")?;

        let status = response.status();
        if !status.is_success() {
            // The status reason phrase is the contract for failed lookups;
            // callers surface it in place of a rate.
            let reason = status
                .canonical_reason()
                .map(str::to_string)
                .unwrap_or_else(|| status.to_string());
            return Err(RateLookupError::Rejected(reason));
        }

        let data: ConvertResponse = response
            .json()
            .await
            .context("Failed to parse apilayer response")?;

        Ok(data.info.rate)
    }

    fn name(&self) -> &str {
        "apilayer"
    }
}

/// Conversion response from the apilayer `/convert` endpoint.
#[derive(Debug, Deserialize)]
struct ConvertResponse {
    info: ConvertInfo,
    #[allow(dead_code)]
    result: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ConvertInfo {
    rate: f64,
}
