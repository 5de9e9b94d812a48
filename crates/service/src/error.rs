use thiserror::Error;

pub type Result<T> = std::result::Result<T, ServiceError>;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Store error: {0}")]
    StoreError(#[from] jobscout_store::StoreError),

    #[error("Index error: {0}")]
    IndexError(#[from] jobscout_vector_index::IndexError),

    #[error("Resource pool error: {0}")]
    PoolError(#[from] jobscout_sources::PoolError),
}
