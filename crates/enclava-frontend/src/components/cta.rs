use leptos::prelude::*;

const SOCIALS: [(&str, &str, &str); 3] = [
    ("Twitter/X", "\u{1D54F}", "Twitter"),
    ("GitHub", "GH", "GitHub"),
    ("Telegram", "TG", "Telegram"),
];

const FOOTER_ART: &str = "\
\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}
          ENCLAVA \u{00A9} 2026
\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}";

#[component]
pub fn CtaSection() -> impl IntoView {
    view! {
        <section class="cta-section">
            <div class="cta-block">
                <h2 class="cta-title">
                    "Be part of the data"
                    <br />
                    "ownership revolution."
                </h2>
                <button class="cta-button">"Join Waitlist"</button>
            </div>

            <div class="social-links">
                {SOCIALS
                    .into_iter()
                    .map(|(aria, glyph, label)| {
                        view! {
                            <a href="#" class="social-link" aria-label=aria>
                                <div class="social-icon">{glyph}</div>
                                <span class="social-label">{label}</span>
                            </a>
                        }
                    })
                    .collect_view()}
            </div>

            <div class="cta-footer">
                <pre>{FOOTER_ART}</pre>
            </div>
        </section>
    }
}
