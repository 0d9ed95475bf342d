use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Cache store is unavailable: {0}")]
    Unavailable(String),

    #[error("Cache store lock was poisoned")]
    Poisoned,

    #[error("Error encoding cache entry")]
    Encode(#[from] serde_json::Error),
}
