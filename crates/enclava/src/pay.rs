use alloy::network::EthereumWallet;
use alloy::providers::ProviderBuilder;
use alloy::transports::http::reqwest::Url;

use enclava::units::format_units;
use enclava::{
    AppConfig, PaymentData, PaymentError, PaymentSession, ProviderSender, SubmissionState,
    AMOUNT_DECIMALS,
};

const USAGE: &str = "usage: enclava-pay [--dry-run] <token_id>=<amount_hbar>...\n\
                     example: enclava-pay 1=1.5 2=2.5";

/// Parse `id=amount` pairs into index-aligned vectors.
fn parse_selection<I>(args: I) -> Result<PaymentData, PaymentError>
where
    I: IntoIterator<Item = String>,
{
    let mut data = PaymentData::new(vec![], vec![]);
    for arg in args {
        let (id, amount) = arg.split_once('=').ok_or_else(|| {
            PaymentError::InvalidRequest(format!("expected <token_id>=<amount>, got '{arg}'"))
        })?;
        let id: u64 = id
            .trim()
            .parse()
            .map_err(|e| PaymentError::InvalidRequest(format!("invalid token id '{id}': {e}")))?;
        let amount: f64 = amount
            .trim()
            .parse()
            .map_err(|e| PaymentError::InvalidRequest(format!("invalid amount '{amount}': {e}")))?;
        data.token_ids.push(id);
        data.amounts.push(amount);
    }
    Ok(data)
}

async fn run() -> Result<(), PaymentError> {
    let mut dry_run = false;
    let mut selection = Vec::new();
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--dry-run" => dry_run = true,
            "-h" | "--help" => {
                println!("{USAGE}");
                return Ok(());
            }
            _ => selection.push(arg),
        }
    }

    let config = AppConfig::from_env()?;
    let data = parse_selection(selection)?;

    if dry_run || !config.has_signer() {
        if !dry_run {
            tracing::warn!("EVM_PRIVATE_KEY not set, printing the call instead of sending it");
        }
        let call = enclava::assemble(config.contract, &data)?;
        let json = serde_json::to_string_pretty(&call)
            .map_err(|e| PaymentError::InvalidRequest(format!("failed to render call: {e}")))?;
        println!("{json}");
        println!("calldata: {}", call.calldata());
        return Ok(());
    }

    let signer = config.signer()?;
    let buyer = signer.address();
    let rpc_url: Url = config
        .chain
        .primary_rpc_url()
        .parse()
        .map_err(|e| PaymentError::Config(format!("invalid RPC_URL: {e}")))?;
    let provider = ProviderBuilder::new()
        .wallet(EthereumWallet::from(signer))
        .connect_http(rpc_url);

    let sender = ProviderSender::new(provider).with_receipt_timeout(config.receipt_timeout);
    let session = PaymentSession::new(sender, config.contract);

    let preview = enclava::assemble(config.contract, &data)?;
    let total = format_units(preview.total_units(), AMOUNT_DECIMALS);
    let symbol = &config.chain.native_currency.symbol;

    println!("Paying for {} dataset(s)...", data.token_ids.len());
    println!("  Buyer:    {buyer}");
    println!("  Contract: {}", config.contract);
    println!("  Network:  {} ({})", config.chain.name, config.chain.chain_id);
    println!("  Total:    {total} {symbol}");

    session.pay_for_datasets(&data)?;
    let settled = session.wait_settled().await;

    match settled.state {
        SubmissionState::Succeeded => {
            if let Some(receipt) = &settled.receipt {
                println!("Payment confirmed.");
                println!("  tx:    {}", config.chain.tx_url(receipt.transaction_hash));
                if let Some(block) = receipt.block_number {
                    println!("  block: {block}");
                }
            }
            Ok(())
        }
        _ => Err(settled.error.unwrap_or_else(|| {
            PaymentError::DispatchFailure("submission ended without a result".to_string())
        })),
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();

    if let Err(e) = run().await {
        tracing::error!(error = %e, "payment failed");
        eprintln!("ERROR: {e}");
        if e.is_validation() {
            eprintln!("{USAGE}");
        }
        std::process::exit(1);
    }
}
