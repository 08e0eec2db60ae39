//! Site-specific title rules for publishers whose markup defeats the generic
//! strategies. Each rule is an ordinary [`TitleStrategy`]; add new ones here
//! and slot them into [`default_title_strategies`](super::default_title_strategies).

use nt_core::Result;

use super::TitleStrategy;

/// Le Journal des Entreprises interview pages keep the headline in a span.
pub fn interviewed_title() -> Result<TitleStrategy> {
    TitleStrategy::text("interviewed-title", "span.interviewed-title")
}

/// Le Journal des Entreprises page-title block, used when nothing else matched.
pub fn jde_page_title() -> Result<TitleStrategy> {
    TitleStrategy::nested("jde2 page title", "div#block-jde2-page-title", "span")
}
