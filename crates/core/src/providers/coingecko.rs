use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;

use crate::errors::CoreError;
use crate::models::coin::{Coin, CoinDetails, PriceHistory};
use crate::models::settings::Settings;
use super::traits::MarketDataProvider;

/// Public and demo keys share a host; pro keys have their own.
const PUBLIC_BASE_URL: &str = "https://api.coingecko.com/api/v3";
const PRO_BASE_URL: &str = "https://pro-api.coingecko.com/api/v3";

const PROVIDER: &str = "CoinGecko";

/// CoinGecko API provider for listings, coin details and price history.
///
/// - **Free**: works without a key (roughly 10-30 calls/minute).
/// - **Demo keys** (`CG-...`) go to the public host with `x-cg-demo-api-key`.
/// - **Pro keys** go to the pro host with `x-cg-pro-api-key`.
pub struct CoinGeckoProvider {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    vs_currency: String,
    per_page: u32,
    price_change_windows: String,
}

impl CoinGeckoProvider {
    pub fn new(settings: &Settings) -> Self {
        let base_url = match settings.api_key.as_deref() {
            Some(key) if !key.starts_with("CG-") => PRO_BASE_URL,
            _ => PUBLIC_BASE_URL,
        };

        let builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(Duration::from_secs(settings.request_timeout_secs));
        Self {
            client: builder.build().unwrap_or_else(|_| Client::new()),
            base_url: base_url.to_string(),
            api_key: settings.api_key.clone(),
            vs_currency: settings.vs_currency.to_lowercase(),
            per_page: settings.effective_per_page(),
            price_change_windows: settings.price_change_windows.clone(),
        }
    }

    /// Point the provider at another host (proxies, test servers).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn markets_url(&self) -> String {
        format!(
            "{}/coins/markets?vs_currency={}&order=market_cap_desc&per_page={}&page=1&sparkline=false&price_change_percentage={}",
            self.base_url, self.vs_currency, self.per_page, self.price_change_windows
        )
    }

    /// `/coins/{id}` for the detail page. The id is percent-encoded as a single
    /// path segment, so `/`, `?` or `#` cannot reach another endpoint.
    pub fn detail_url(&self, coin_id: &str) -> Result<String, CoreError> {
        let mut url = self.coin_url(coin_id, &[])?;
        url.set_query(Some(
            "localization=false&tickers=false&market_data=true&community_data=false&developer_data=false&sparkline=false",
        ));
        Ok(url.into())
    }

    pub fn history_url(&self, coin_id: &str, days: u32) -> Result<String, CoreError> {
        let mut url = self.coin_url(coin_id, &["market_chart"])?;
        url.query_pairs_mut()
            .append_pair("vs_currency", &self.vs_currency)
            .append_pair("days", &days.to_string());
        Ok(url.into())
    }

    fn coin_url(&self, coin_id: &str, tail: &[&str]) -> Result<Url, CoreError> {
        // Dot segments would be resolved away instead of encoded
        if coin_id.is_empty() || coin_id.chars().all(|c| c == '.') {
            return Err(CoreError::NotFound(coin_id.to_string()));
        }
        let invalid_base = || CoreError::Api {
            provider: PROVIDER.into(),
            message: format!("Invalid base URL: {}", self.base_url),
        };
        let mut url = Url::parse(&self.base_url).map_err(|_| invalid_base())?;
        url.path_segments_mut()
            .map_err(|_| invalid_base())?
            .push("coins")
            .push(coin_id)
            .extend(tail);
        Ok(url)
    }

    fn get(&self, url: &str) -> RequestBuilder {
        let request = self.client.get(url).header("Accept", "application/json");
        match self.api_key.as_deref() {
            Some(key) if key.starts_with("CG-") => request.header("x-cg-demo-api-key", key),
            Some(key) => request.header("x-cg-pro-api-key", key),
            None => request,
        }
    }

    /// Turn a non-success status into an `Http` error carrying the status code.
    async fn check_status(response: Response, what: &str) -> Result<Response, CoreError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        log::warn!("{PROVIDER} returned {status} for {what}");
        Err(CoreError::Http {
            provider: PROVIDER.into(),
            status: status.as_u16(),
            message: format!("{what}: {}", truncate(&body, 200)),
        })
    }
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl MarketDataProvider for CoinGeckoProvider {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn list_coins(&self) -> Result<Vec<Coin>, CoreError> {
        let url = self.markets_url();
        log::debug!("Fetching {PROVIDER} market listing ({} coins)", self.per_page);

        let response = self.get(&url).send().await?;
        let response = Self::check_status(response, "market listing").await?;

        response.json().await.map_err(|e| CoreError::Api {
            provider: PROVIDER.into(),
            message: format!("Failed to parse market listing: {e}"),
        })
    }

    async fn get_coin_detail(&self, coin_id: &str) -> Result<CoinDetails, CoreError> {
        let url = self.detail_url(coin_id)?;
        log::debug!("Fetching {PROVIDER} details for {coin_id}");

        let response = self.get(&url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(CoreError::NotFound(coin_id.to_string()));
        }
        let response = Self::check_status(response, coin_id).await?;

        response.json().await.map_err(|e| CoreError::Api {
            provider: PROVIDER.into(),
            message: format!("Failed to parse details for {coin_id}: {e}"),
        })
    }

    async fn get_price_history(&self, coin_id: &str, days: u32) -> Result<PriceHistory, CoreError> {
        let url = self.history_url(coin_id, days)?;
        log::debug!("Fetching {PROVIDER} {days}d history for {coin_id}");

        let response = self.get(&url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(CoreError::NotFound(coin_id.to_string()));
        }
        let response = Self::check_status(response, coin_id).await?;

        response.json().await.map_err(|e| CoreError::Api {
            provider: PROVIDER.into(),
            message: format!("Failed to parse history for {coin_id}: {e}"),
        })
    }
}
