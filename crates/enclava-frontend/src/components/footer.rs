use enclava::ChainConfig;
use leptos::prelude::*;

#[component]
pub fn Footer(chain: ChainConfig) -> impl IntoView {
    let network = if chain.testnet {
        format!("{} (testnet)", chain.name)
    } else {
        chain.name.clone()
    };

    view! {
        <footer class="footer-compact">
            "Payments settle on "
            {network}
            " \u{00B7} "
            <a href=chain.explorer_url.clone() target="_blank" rel="noopener">
                {chain.explorer_name.clone()}
            </a>
        </footer>
    }
}
