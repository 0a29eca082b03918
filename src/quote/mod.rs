//! Swap quotes from the 0x price aggregation API
//!
//! The aggregator is treated as a black box: we send sell/buy tokens, an amount
//! and the sources to exclude, and get back pricing plus pre-encoded router
//! calldata.

mod sources;

pub use sources::{excluded_sources, LiquiditySource};

use crate::config::QuoteConfig;
use crate::error::SwapResult;

use async_trait::async_trait;
use ethers::types::{Address, Bytes, U256};
use reqwest::Client;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

/// Parameters of a single quote request
#[derive(Debug, Clone)]
pub struct QuoteRequest {
    pub sell_token: String,
    pub buy_token: String,
    /// Amount in the sell token's base units
    pub sell_amount: U256,
    pub allowed_sources: Option<Vec<LiquiditySource>>,
}

impl QuoteRequest {
    pub fn new(sell_token: impl Into<String>, buy_token: impl Into<String>, sell_amount: U256) -> Self {
        Self {
            sell_token: sell_token.into(),
            buy_token: buy_token.into(),
            sell_amount,
            allowed_sources: None,
        }
    }

    pub fn allowed_sources(mut self, sources: Vec<LiquiditySource>) -> Self {
        self.allowed_sources = Some(sources);
        self
    }

    /// Query string pairs in the order the API documents them
    pub fn query_pairs(&self, slippage_percentage: f64) -> Vec<(&'static str, String)> {
        let excluded = excluded_sources(self.allowed_sources.as_deref())
            .iter()
            .map(LiquiditySource::as_str)
            .collect::<Vec<_>>()
            .join(",");

        vec![
            ("sellToken", self.sell_token.clone()),
            ("buyToken", self.buy_token.clone()),
            ("sellAmount", self.sell_amount.to_string()),
            ("slippagePercentage", slippage_percentage.to_string()),
            ("excludedSources", excluded),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FillData {
    #[serde(default)]
    pub token_address_path: Vec<Address>,
    #[serde(default)]
    pub router: Option<Address>,
}

/// One leg of the aggregator's route
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub maker_token: Address,
    pub taker_token: Address,
    pub maker_amount: String,
    pub taker_amount: String,
    #[serde(default)]
    pub fill_data: Option<FillData>,
    pub source: String,
    #[serde(default)]
    pub source_path_id: Option<String>,
    #[serde(rename = "type")]
    pub order_type: u8,
}

/// Aggregator quote with router calldata
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub price: String,
    pub guaranteed_price: String,
    pub buy_token_address: Address,
    pub sell_token_address: Address,
    #[serde(deserialize_with = "decimal_u256")]
    pub buy_amount: U256,
    #[serde(deserialize_with = "decimal_u256")]
    pub sell_amount: U256,
    pub data: Bytes,
    #[serde(default)]
    pub orders: Vec<Order>,
}

fn decimal_u256<'de, D: Deserializer<'de>>(deserializer: D) -> Result<U256, D::Error> {
    let raw = String::deserialize(deserializer)?;
    U256::from_dec_str(&raw).map_err(serde::de::Error::custom)
}

/// Anything that can price a swap
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuoteSource: Send + Sync {
    async fn get_quote(&self, request: &QuoteRequest) -> SwapResult<Quote>;
}

/// HTTP client for `GET /swap/v1/quote`
pub struct ZeroExClient {
    client: Client,
    config: QuoteConfig,
}

impl ZeroExClient {
    pub fn new(config: QuoteConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    fn quote_url(&self) -> String {
        format!("{}/swap/v1/quote", self.config.api_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl QuoteSource for ZeroExClient {
    async fn get_quote(&self, request: &QuoteRequest) -> SwapResult<Quote> {
        let query = request.query_pairs(self.config.slippage_percentage);
        debug!(
            "Requesting quote {} -> {} for {}",
            request.sell_token, request.buy_token, request.sell_amount
        );

        let quote = self
            .client
            .get(self.quote_url())
            .query(&query)
            .send()
            .await?
            .error_for_status()?
            .json::<Quote>()
            .await?;

        crate::metrics::record_quote();
        debug!(
            "Quote received: sell {} buy {} at {}",
            quote.sell_amount, quote.buy_amount, quote.price
        );
        Ok(quote)
    }
}
