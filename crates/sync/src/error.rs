use rankbook_core::CoreError;
use rankbook_store::StoreError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SyncError>;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Merge error: {0}")]
    Core(#[from] CoreError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Group report {0:?} collides with the overall report")]
    NameCollision(String),

    #[error("Report task failed: {0}")]
    Join(String),
}
