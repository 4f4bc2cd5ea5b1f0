use enclava::ChainConfig;
use leptos::prelude::*;

const FEATURES: [&str; 3] = [
    "Sub-400ms finality",
    "Agent-ready infrastructure",
    "High-performance marketplaces",
];

const METRICS: [(&str, &str); 3] = [
    ("<400ms", "Transaction Finality"),
    ("22K+", "TPS Capacity"),
    ("100%", "Data Ownership"),
];

#[component]
pub fn ChainSection(chain: ChainConfig) -> impl IntoView {
    view! {
        <section class="chain-section">
            <div class="chain-row">
                <div class="chain-copy">
                    <h2 class="chain-title">
                        "Built on"
                        <span class="accent-red">" "{chain.display_name.clone()}</span>
                    </h2>
                    <div class="chain-features">
                        {FEATURES
                            .into_iter()
                            .map(|feature| {
                                view! {
                                    <div class="chain-feature">
                                        <span class="accent-red">"[\u{2713}]"</span>
                                        <span class="feature-label">{feature}</span>
                                    </div>
                                }
                            })
                            .collect_view()}
                    </div>
                    <div class="chain-banner">
                        <p>"Machine-speed data economy"</p>
                    </div>
                </div>
                <div class="chain-visual">
                    <img src="/images/hedera.png" alt=chain.name.clone() />
                </div>
            </div>

            <div class="chain-metrics">
                {METRICS
                    .into_iter()
                    .map(|(value, label)| {
                        view! {
                            <div class="metric">
                                <div class="metric-value">{value}</div>
                                <div class="metric-label">{label}</div>
                            </div>
                        }
                    })
                    .collect_view()}
            </div>
        </section>
    }
}
