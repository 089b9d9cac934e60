//! Record store accessors for the `applications` table.

pub mod memory;
pub mod postgres;

use crate::domain::application::{AppId, ApplicationRecord};
use async_trait::async_trait;
use thiserror::Error;

pub use memory::MemoryApplicationStore;
pub use postgres::PostgresApplicationStore;

#[derive(Debug, Error)]
pub enum StoreError {
    /// A primary key or unique constraint rejected the write; the transaction was rolled back.
    #[error("constraint violation: {0}")]
    Conflict(String),
    #[error("database error: {0}")]
    Backend(#[from] sqlx::Error),
}

/// Persistence contract used by the registration service.
#[async_trait]
pub trait ApplicationStore: Send + Sync {
    /// Cheap liveness check of the backing store.
    async fn ping(&self) -> Result<(), StoreError>;

    async fn contains(&self, id: &AppId) -> Result<bool, StoreError>;

    async fn find(&self, id: &AppId) -> Result<Option<ApplicationRecord>, StoreError>;

    async fn insert(&self, record: &ApplicationRecord) -> Result<(), StoreError>;

    /// Overwrites the mutable fields of an existing record. Returns `false` if it vanished.
    async fn update(&self, record: &ApplicationRecord) -> Result<bool, StoreError>;

    /// Returns `false` if nothing was deleted.
    async fn delete(&self, id: &AppId) -> Result<bool, StoreError>;
}
