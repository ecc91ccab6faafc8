use serde::{Deserialize, Deserializer, de::Error};
use serde_json::{Map, Value};
use serde_with::{NoneAsEmptyString, serde_as};
use tracing::debug;

use crate::price::parse_localized_price;

#[serde_as]
#[derive(Debug, Default, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub title: Option<String>,
    #[serde(deserialize_with = "string_to_price")]
    #[serde(default)]
    pub min_price: Option<f64>,
    #[serde(deserialize_with = "string_to_price")]
    #[serde(default)]
    pub max_price: Option<f64>,
}

impl SearchParams {
    /// Builds the params from raw query pairs. Keys other than the three
    /// filters are ignored and a repeated key keeps its first value.
    pub fn from_query_pairs(
        pairs: impl IntoIterator<Item = (String, String)>,
    ) -> Result<Self, serde_json::Error> {
        let mut fields = Map::new();

        for (key, value) in pairs {
            fields.entry(key).or_insert(Value::String(value));
        }

        serde_json::from_value(Value::Object(fields))
    }

    /// Case-insensitive substring match on the title, no filter matches everything.
    pub fn matches_title(&self, title: &str) -> bool {
        match &self.title {
            Some(needle) => title.to_lowercase().contains(&needle.to_lowercase()),
            None => true,
        }
    }

    /// Inclusive range check, each bound is optional on its own.
    pub fn matches_price(&self, price: f64) -> bool {
        if let Some(min_price) = self.min_price
            && price < min_price
        {
            return false;
        }

        if let Some(max_price) = self.max_price
            && price > max_price
        {
            return false;
        }

        true
    }
}

// responsible for turning a String input, into an optional number
fn string_to_price<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let input_string: Option<String> = Option::deserialize(deserializer)?;

    let Some(string_price) = input_string else {
        return Ok(None);
    };

    if string_price.trim().is_empty() {
        return Ok(None);
    }

    let Some(price) = parse_localized_price(&string_price) else {
        debug!("Invalid price: {:?}", string_price);
        return Err(Error::custom("invalid price"));
    };

    Ok(Some(price))
}
