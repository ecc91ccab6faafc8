pub(crate) const COLLECTION_PRODUCTS_NAME: &str = "products";
pub(crate) const COLLECTION_PRODUCTS_PRICE_INDEX: &str = "current_price_index";
