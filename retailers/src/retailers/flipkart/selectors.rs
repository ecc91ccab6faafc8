//! CSS selectors for Flipkart product pages.
//!
//! There are no fallbacks, a layout change shows up as empty fields
//! or a missing price.

use std::sync::LazyLock;

use scraper::Selector;

pub(crate) const TITLE_QUERY: &str = "span.B_NuCI";
pub(crate) const DESCRIPTION_QUERY: &str = "div._1mXcCf";
pub(crate) const PRICE_QUERY: &str = "div._30jeq3._16Jk6d";
/// "12,345 Ratings & 1,234 Reviews"
pub(crate) const RATING_SUMMARY_QUERY: &str = "span._2_R_DZ";

pub(crate) static TITLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(TITLE_QUERY).expect("valid title selector"));

pub(crate) static DESCRIPTION: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(DESCRIPTION_QUERY).expect("valid description selector"));

pub(crate) static PRICE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(PRICE_QUERY).expect("valid price selector"));

pub(crate) static RATING_SUMMARY: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(RATING_SUMMARY_QUERY).expect("valid rating summary selector")
});
