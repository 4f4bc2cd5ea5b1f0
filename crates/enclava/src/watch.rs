use alloy::providers::RootProvider;
use alloy::transports::http::reqwest::Url;

use enclava::events::run_with_backoff;
use enclava::units::format_units;
use enclava::{AppConfig, DatasetEvent, EventWatcher, PaymentError, AMOUNT_DECIMALS};

fn log_event(event: DatasetEvent) {
    match &event {
        DatasetEvent::Minted {
            to,
            token_id,
            dataset_id,
            tx_hash,
            ..
        } => tracing::info!(%to, %token_id, dataset_id = %dataset_id, tx = ?tx_hash, "dataset minted"),
        DatasetEvent::Used {
            token_id,
            user,
            amount,
            tx_hash,
            ..
        } => tracing::info!(
            %token_id,
            %user,
            amount = %format_units(*amount, AMOUNT_DECIMALS),
            tx = ?tx_hash,
            "dataset purchased"
        ),
        DatasetEvent::Claimed {
            token_id,
            owner,
            amount,
            tx_hash,
            ..
        } => tracing::info!(
            %token_id,
            %owner,
            amount = %format_units(*amount, AMOUNT_DECIMALS),
            tx = ?tx_hash,
            "earnings claimed"
        ),
    }

    match serde_json::to_string(&event) {
        Ok(line) => println!("{line}"),
        Err(e) => tracing::warn!(error = %e, "failed to render event"),
    }
}

fn setup() -> Result<EventWatcher<RootProvider>, PaymentError> {
    let config = AppConfig::from_env()?;
    let rpc_url: Url = config
        .chain
        .primary_rpc_url()
        .parse()
        .map_err(|e| PaymentError::Config(format!("invalid RPC_URL: {e}")))?;

    tracing::info!(
        network = %config.chain.name,
        contract = %config.contract,
        poll_secs = config.poll_interval.as_secs(),
        "watching dataset contract"
    );

    let provider: RootProvider = RootProvider::new_http(rpc_url);
    Ok(EventWatcher::new(provider, config.contract).with_poll_interval(config.poll_interval))
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();

    let watcher = match setup() {
        Ok(watcher) => watcher,
        Err(e) => {
            eprintln!("ERROR: {e}");
            std::process::exit(1);
        }
    };

    run_with_backoff(|| watcher.run(log_event)).await;
}
