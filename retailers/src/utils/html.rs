use scraper::{ElementRef, Html, Selector};
use tracing::debug;

pub(crate) fn element_to_text(element: ElementRef) -> String {
    element.text().collect::<String>().trim().into()
}

/// Text of the first element matching `selector`, `None` when nothing matches.
pub(crate) fn select_first_text(html: &Html, selector: &Selector) -> Option<String> {
    let Some(element) = html.select(selector).next() else {
        debug!("No element found for {:?}", selector);
        return None;
    };

    Some(element_to_text(element))
}
