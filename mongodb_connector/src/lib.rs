pub(crate) mod collections;
pub mod connector;
pub(crate) mod constants;
pub mod errors;
pub mod memory_store;
pub mod traits;
