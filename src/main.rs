//! Swap Submitter - fetch an aggregator quote and submit it through the
//! user's wallet
//!
//! Connects to the wallet, snapshots fees from the latest block, fetches a
//! quote, then estimates, signs and optionally broadcasts the router call.

use anyhow::{Context, Result};
use ethers::types::{Address, Bytes, U256};
use ethers::utils::parse_units;
use std::sync::Arc;
use tracing::{info, warn};

use swap_submitter::config::Settings;
use swap_submitter::quote::{QuoteRequest, QuoteSource, ZeroExClient};
use swap_submitter::router::{RouterContract, SignerKind, SwapArguments};
use swap_submitter::tx::{SubmitParams, TransactionSubmitter};
use swap_submitter::wallet::WalletProvider;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    init_logging();

    info!("Starting Swap Submitter v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let settings = Settings::load()?;
    info!(
        "Loaded configuration with {} router deployment(s)",
        settings.router.addresses.len()
    );

    let wallet = Arc::new(WalletProvider::connect(&settings.wallet)?);

    let accounts = match wallet.request_accounts().await {
        Ok(accounts) => accounts,
        Err(e) if e.is_user_rejection() => {
            info!("Please connect to wallet.");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };
    let Some(account) = accounts.first().copied() else {
        warn!("Wallet returned no accounts");
        return Ok(());
    };

    let chain_id = wallet.chain_id().await?;
    let Some(router_address) = settings.router_address(chain_id) else {
        warn!("No router deployed for chain {}", chain_id);
        return Ok(());
    };
    info!("Using router {:?} on chain {}", router_address, chain_id);

    let priority_fee: U256 = parse_units(settings.gas.priority_fee_gwei.to_string(), "gwei")
        .context("Invalid gas.priority_fee_gwei")?
        .into();
    let fees = wallet.fee_schedule(priority_fee).await?;

    // Fetch quote
    let sell_amount = U256::from_dec_str(&settings.swap.sell_amount)?;
    let request = QuoteRequest::new(
        settings.swap.sell_token.clone(),
        settings.swap.buy_token.clone(),
        sell_amount,
    )
    .allowed_sources(settings.swap.allowed_sources.clone());
    let quote = ZeroExClient::new(settings.quote.clone())
        .get_quote(&request)
        .await?;
    info!(
        "Quote: price {} (guaranteed {}), buy amount {}",
        quote.price, quote.guaranteed_price, quote.buy_amount
    );

    let fee_token: Address = settings.swap.fee_token.parse()?;
    let fee_amount = U256::from_dec_str(&settings.swap.fee_amount)?;
    let swap = SwapArguments::from_quote(&quote, fee_token, fee_amount);
    let value = swap.native_value();

    let contract = RouterContract::new(router_address, SignerKind::JsonRpc(account))?;
    let params = SubmitParams::new(swap)
        .contract(contract)
        .chain_id(chain_id)
        .wallet(wallet.clone())
        .account(account)
        .fees(fees)
        .value(value);

    let submitter = TransactionSubmitter::new(settings.gas.clone()).with_method(settings.router.method.clone());
    let signed = match submitter.submit_transaction(params).await {
        Ok(Some(signed)) => signed,
        Ok(None) => {
            warn!("Submission skipped, wallet state incomplete");
            return Ok(());
        }
        Err(e) if e.is_user_rejection() => {
            info!("Transaction cancelled in wallet");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };
    println!("{}", signed);

    if settings.swap.broadcast {
        let raw: Bytes = signed.parse().context("Signed transaction is not hex")?;
        let tx_hash = wallet.send_raw_transaction(raw).await?;
        info!("Swap submitted: {:?}", tx_hash);
    }

    if settings.metrics.enabled {
        info!("Metrics snapshot:\n{}", swap_submitter::metrics::render());
    }

    info!("Swap Submitter finished");
    Ok(())
}

fn init_logging() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("info,swap_submitter=debug,hyper=warn,reqwest=warn")
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true).with_thread_ids(true))
        .init();
}
