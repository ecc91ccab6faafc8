use tracing::debug;

const CURRENCY_SYMBOL: char = '₹';

/// Is capable of parsing the following into a plain number:
/// 1. "₹1,999"
/// 2. "1,23,456.50"
/// 3. "999"
///
/// Only the rupee symbol is stripped, other currencies are rejected.
pub fn parse_localized_price(price: &str) -> Option<f64> {
    let trimmed_price: String = price
        .trim()
        .trim_start_matches(CURRENCY_SYMBOL)
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();

    if trimmed_price.is_empty() {
        debug!("Empty price after stripping: {:?}", price);
        return None;
    }

    // f64::from_str happily accepts "NaN" and "inf"
    if !trimmed_price
        .chars()
        .all(|c| c.is_ascii_digit() || c == '.')
    {
        debug!("Non numeric price: {:?}", price);
        return None;
    }

    let parsed_price = trimmed_price.parse::<f64>().ok()?;

    debug!("Converted {} into {}", price, parsed_price);

    Some(parsed_price)
}
