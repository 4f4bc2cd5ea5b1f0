use enclava::WalletConfig;
use leptos::prelude::*;

#[component]
pub fn Hero(wallet: WalletConfig) -> impl IntoView {
    let connectors = wallet
        .available_connectors()
        .map(|c| c.label())
        .collect::<Vec<_>>()
        .join(" \u{00B7} ");

    view! {
        <header class="hero">
            <div class="hero-left">
                <span class="hero-title">
                    <span class="accent-red">{wallet.app_name.to_uppercase()}</span>
                </span>
                <span class="hero-tagline">"Own your data. Sell it on-chain. Query it with agents."</span>
            </div>
            <div class="hero-right">
                <span class="hero-wallets">{connectors}</span>
            </div>
        </header>
    }
}
