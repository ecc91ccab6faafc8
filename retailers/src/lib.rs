pub mod errors;
pub mod retailers;
pub mod traits;
pub(crate) mod utils;
