//! Configuration management for the swap submitter
//!
//! Loads configuration from TOML files with environment variable substitution.

use crate::quote::LiquiditySource;
use crate::wallet::BrowserKind;

use anyhow::{Context, Result};
use ethers::types::{Address, U256};
use serde::Deserialize;
use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};

/// Root configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub wallet: WalletConfig,
    #[serde(default)]
    pub quote: QuoteConfig,
    pub router: RouterConfig,
    #[serde(default)]
    pub gas: GasConfig,
    pub swap: SwapConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WalletConfig {
    pub rpc_url: String,
    /// Wallet announces itself as the injected extension needing the eth_sign workaround
    #[serde(default)]
    pub extension_wallet: bool,
    #[serde(default)]
    pub browser: BrowserKind,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuoteConfig {
    #[serde(default = "default_quote_api_url")]
    pub api_url: String,
    #[serde(default = "default_slippage")]
    pub slippage_percentage: f64,
}

impl Default for QuoteConfig {
    fn default() -> Self {
        Self {
            api_url: default_quote_api_url(),
            slippage_percentage: default_slippage(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RouterConfig {
    /// Router address keyed by chain ID
    pub addresses: HashMap<String, String>,
    #[serde(default = "default_router_method")]
    pub method: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GasConfig {
    #[serde(default = "default_limit_buffer")]
    pub limit_buffer_percent: u64,
    #[serde(default = "default_estimation_hint")]
    pub estimation_gas_hint: u64,
    #[serde(default = "default_priority_fee_gwei")]
    pub priority_fee_gwei: f64,
}

impl Default for GasConfig {
    fn default() -> Self {
        Self {
            limit_buffer_percent: default_limit_buffer(),
            estimation_gas_hint: default_estimation_hint(),
            priority_fee_gwei: default_priority_fee_gwei(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SwapConfig {
    pub sell_token: String,
    pub buy_token: String,
    /// Decimal amount in the sell token's base units
    pub sell_amount: String,
    pub fee_token: String,
    #[serde(default = "default_fee_amount")]
    pub fee_amount: String,
    #[serde(default)]
    pub allowed_sources: Vec<LiquiditySource>,
    #[serde(default)]
    pub broadcast: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MetricsConfig {
    pub enabled: bool,
}

fn default_quote_api_url() -> String {
    "https://api.0x.org".to_string()
}

fn default_slippage() -> f64 {
    0.01
}

fn default_router_method() -> String {
    "proxiedSwap".to_string()
}

fn default_limit_buffer() -> u64 {
    20
}

fn default_estimation_hint() -> u64 {
    350_000
}

fn default_priority_fee_gwei() -> f64 {
    1.5
}

fn default_fee_amount() -> String {
    "0".to_string()
}

impl Settings {
    /// Load settings from the file named by `SWAP_SUBMITTER_CONFIG`
    pub fn load() -> Result<Self> {
        let config_path = env::var("SWAP_SUBMITTER_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("config/default.toml"));

        Self::load_from(&config_path)
    }

    /// Load settings from an explicit path
    pub fn load_from(config_path: &Path) -> Result<Self> {
        let config_str = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {:?}", config_path))?;

        // Substitute environment variables
        let config_str = substitute_env_vars(&config_str);

        let settings: Settings =
            toml::from_str(&config_str).with_context(|| "Failed to parse configuration")?;

        settings.validate()?;

        Ok(settings)
    }

    /// Validate configuration
    fn validate(&self) -> Result<()> {
        if self.wallet.rpc_url.is_empty() {
            anyhow::bail!("wallet.rpc_url must be set");
        }

        if self.router.addresses.is_empty() {
            anyhow::bail!("At least one router address must be configured");
        }

        for (chain, address) in &self.router.addresses {
            chain
                .parse::<u64>()
                .with_context(|| format!("Router key {} is not a chain ID", chain))?;
            address
                .parse::<Address>()
                .with_context(|| format!("Router address for chain {} is invalid", chain))?;
        }

        if !(0.0..1.0).contains(&self.quote.slippage_percentage) {
            anyhow::bail!(
                "quote.slippage_percentage must be in [0, 1), got {}",
                self.quote.slippage_percentage
            );
        }

        U256::from_dec_str(&self.swap.sell_amount)
            .with_context(|| format!("swap.sell_amount {} is not a decimal", self.swap.sell_amount))?;
        U256::from_dec_str(&self.swap.fee_amount)
            .with_context(|| format!("swap.fee_amount {} is not a decimal", self.swap.fee_amount))?;
        self.swap
            .fee_token
            .parse::<Address>()
            .with_context(|| "swap.fee_token is not an address")?;

        if self.gas.limit_buffer_percent > 100 {
            tracing::warn!(
                "Gas limit buffer of {}% is unusually large",
                self.gas.limit_buffer_percent
            );
        }

        Ok(())
    }

    /// Router address for a chain, if configured
    pub fn router_address(&self, chain_id: u64) -> Option<Address> {
        self.router
            .addresses
            .get(&chain_id.to_string())
            .and_then(|address| address.parse().ok())
    }
}

/// Substitute environment variables in the format ${VAR_NAME}
fn substitute_env_vars(input: &str) -> String {
    lazy_static::lazy_static! {
        static ref ENV_VAR: regex::Regex =
            regex::Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").expect("valid env var pattern");
    }

    let mut result = input.to_string();
    for cap in ENV_VAR.captures_iter(input) {
        let var_value = env::var(&cap[1]).unwrap_or_default();
        result = result.replace(&cap[0], &var_value);
    }

    result
}
