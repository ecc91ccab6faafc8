use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database operation failed: {0}")]
    Database(#[from] mongodb::error::Error),
    #[error("Failed to convert value into BSON: {0}")]
    Serialization(#[from] mongodb::bson::ser::Error),
    #[error("Stored document {0} is invalid: {1}")]
    InvalidDocument(String, String),
}
