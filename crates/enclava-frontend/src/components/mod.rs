mod chain_section;
mod cta;
mod footer;
mod hero;

pub use chain_section::ChainSection;
pub use cta::CtaSection;
pub use footer::Footer;
pub use hero::Hero;
