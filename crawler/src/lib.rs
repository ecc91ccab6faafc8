pub mod errors;
pub mod request;
pub mod traits;
pub mod unprotected;

// linked for the vendored TLS backend used by reqwest
use openssl as _;
