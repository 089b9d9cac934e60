//! In-process application store with the same uniqueness rules as the table.
//! Used by the unit and HTTP test suites.

use crate::domain::application::{AppId, ApplicationRecord};
use crate::storage::{ApplicationStore, StoreError};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Default)]
pub struct MemoryApplicationStore {
    records: RwLock<HashMap<AppId, ApplicationRecord>>,
}

impl MemoryApplicationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

/// Checks email/wallet uniqueness against every record except `skip`.
fn check_unique(
    records: &HashMap<AppId, ApplicationRecord>,
    candidate: &ApplicationRecord,
    skip: Option<&AppId>,
) -> Result<(), StoreError> {
    for existing in records.values() {
        if Some(&existing.id) == skip {
            continue;
        }
        if existing.email == candidate.email {
            return Err(StoreError::Conflict("duplicate email".to_string()));
        }
        if candidate.public_wallet.is_some() && existing.public_wallet == candidate.public_wallet {
            return Err(StoreError::Conflict("duplicate public_wallet".to_string()));
        }
    }
    Ok(())
}

#[async_trait]
impl ApplicationStore for MemoryApplicationStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn contains(&self, id: &AppId) -> Result<bool, StoreError> {
        Ok(self.records.read().await.contains_key(id))
    }

    async fn find(&self, id: &AppId) -> Result<Option<ApplicationRecord>, StoreError> {
        Ok(self.records.read().await.get(id).cloned())
    }

    async fn insert(&self, record: &ApplicationRecord) -> Result<(), StoreError> {
        if record.id.is_reserved() {
            return Err(StoreError::Conflict("reserved id".to_string()));
        }
        let mut records = self.records.write().await;
        if records.contains_key(&record.id) {
            return Err(StoreError::Conflict("duplicate id".to_string()));
        }
        check_unique(&records, record, None)?;
        records.insert(record.id.clone(), record.clone());
        Ok(())
    }

    async fn update(&self, record: &ApplicationRecord) -> Result<bool, StoreError> {
        let mut records = self.records.write().await;
        if !records.contains_key(&record.id) {
            return Ok(false);
        }
        check_unique(&records, record, Some(&record.id))?;
        records.insert(record.id.clone(), record.clone());
        Ok(true)
    }

    async fn delete(&self, id: &AppId) -> Result<bool, StoreError> {
        Ok(self.records.write().await.remove(id).is_some())
    }
}
