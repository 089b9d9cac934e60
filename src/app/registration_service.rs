//! The registration service.
//!
//! Sits between the HTTP layer and the record store:
//! 1.  Assigns fresh app ids on registration, retrying until one is unused.
//! 2.  Loads records by id and checks the caller's ownership proof before any
//!     read, update or delete.
//! 3.  Translates store failures into [`ServiceError`]s.

use crate::domain::application::validation::{ValidatedLookup, ValidatedUpdate};
use crate::domain::application::{AppId, ApplicationRecord, NewApplication};
use crate::storage::{ApplicationStore, StoreError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("application not found")]
    NotFound,
    #[error("ownership proof does not match the stored application")]
    OwnershipMismatch,
    #[error("storage conflict: {0}")]
    Conflict(String),
    #[error("storage failure: {0}")]
    Storage(#[source] StoreError),
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(reason) => ServiceError::Conflict(reason),
            other => ServiceError::Storage(other),
        }
    }
}

#[derive(Clone)]
pub struct RegistrationService {
    store: Arc<dyn ApplicationStore>,
}

impl RegistrationService {
    pub fn new(store: Arc<dyn ApplicationStore>) -> Self {
        Self { store }
    }

    pub async fn health(&self) -> Result<(), ServiceError> {
        Ok(self.store.ping().await?)
    }

    pub async fn generate_unused_id(&self) -> Result<AppId, ServiceError> {
        self.generate_unused_id_with(&mut StdRng::from_entropy()).await
    }

    /// Draws ids from `rng` until one is not present in the store.
    pub async fn generate_unused_id_with<R: Rng>(
        &self,
        rng: &mut R,
    ) -> Result<AppId, ServiceError> {
        loop {
            let candidate = AppId::generate(rng);
            if !self.store.contains(&candidate).await? {
                return Ok(candidate);
            }
            debug!(app_id = %candidate, "generated app id already in use, retrying");
        }
    }

    pub async fn register(&self, new_app: NewApplication) -> Result<AppId, ServiceError> {
        let app_id = self.generate_unused_id().await?;
        let record = new_app.into_record(app_id.clone());
        self.store.insert(&record).await?;
        info!(app_id = %app_id, "application registered");
        Ok(app_id)
    }

    /// Applies a partial update once either the email or the wallet proves ownership.
    pub async fn update(&self, request: ValidatedUpdate) -> Result<AppId, ServiceError> {
        let mut record = self.load(&request.app_id).await?;
        if !request.proof.verifies_any(&record) {
            warn!(app_id = %request.app_id, "update rejected: ownership proof mismatch");
            return Err(ServiceError::OwnershipMismatch);
        }

        if !request.changes.apply_to(&mut record) {
            debug!(app_id = %request.app_id, "update carried no changes");
            return Ok(request.app_id);
        }
        if !self.store.update(&record).await? {
            return Err(ServiceError::NotFound);
        }
        info!(app_id = %request.app_id, "application updated");
        Ok(request.app_id)
    }

    pub async fn get(&self, request: ValidatedLookup) -> Result<ApplicationRecord, ServiceError> {
        let record = self.load(&request.app_id).await?;
        if !request.proof.verifies_exactly(&record) {
            warn!(app_id = %request.app_id, "read rejected: ownership proof mismatch");
            return Err(ServiceError::OwnershipMismatch);
        }
        Ok(record)
    }

    pub async fn remove(&self, request: ValidatedLookup) -> Result<(), ServiceError> {
        let record = self.load(&request.app_id).await?;
        if !request.proof.verifies_exactly(&record) {
            warn!(app_id = %request.app_id, "removal rejected: ownership proof mismatch");
            return Err(ServiceError::OwnershipMismatch);
        }
        if !self.store.delete(&record.id).await? {
            return Err(ServiceError::NotFound);
        }
        info!(app_id = %record.id, "application removed");
        Ok(())
    }

    async fn load(&self, app_id: &AppId) -> Result<ApplicationRecord, ServiceError> {
        self.store
            .find(app_id)
            .await?
            .ok_or(ServiceError::NotFound)
    }
}
