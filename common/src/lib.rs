pub mod deserialize_disallow_empty_string;
pub mod price;
pub mod product;
pub mod search_params;
pub mod utils;
