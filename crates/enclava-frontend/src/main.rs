use enclava::{ChainConfig, WalletConfig};
use leptos::prelude::*;

mod components;
use components::*;

fn main() {
    console_log::init_with_level(log::Level::Debug).expect("console_log init");
    leptos::mount::mount_to_body(App);
}

#[component]
fn App() -> impl IntoView {
    let chain = ChainConfig::default();
    let wallet = WalletConfig::default();
    log::debug!("rendering landing page for {} ({})", chain.name, chain.chain_id);

    view! {
        <div class="app-shell">
            <Hero wallet=wallet />
            <ChainSection chain=chain.clone() />
            <CtaSection />
            <Footer chain=chain />
        </div>
    }
}
