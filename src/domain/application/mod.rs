//! The application record and the validated inputs that create or change it.

pub mod id;
pub mod ownership;
pub mod validation;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub use id::{AppId, APP_ID_LENGTH, RESERVED_APP_ID};
pub use ownership::OwnershipProof;
pub use validation::{
    LookupRequest, RegistrationRequest, UpdateRequest, ValidationError, MAX_FIELD_LENGTH,
    PUBLIC_WALLET_LENGTH,
};

/// A registered application as stored in the `applications` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ApplicationRecord {
    #[schema(value_type = String)]
    pub id: AppId,
    pub email: String,
    pub name: String,
    pub app_name: String,
    pub public_wallet: Option<String>,
}

/// Validated registration data, before an id has been assigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewApplication {
    pub email: String,
    pub name: String,
    pub app_name: String,
    pub public_wallet: Option<String>,
}

impl NewApplication {
    pub fn into_record(self, id: AppId) -> ApplicationRecord {
        ApplicationRecord {
            id,
            email: self.email,
            name: self.name,
            app_name: self.app_name,
            public_wallet: self.public_wallet,
        }
    }
}

/// Field-by-field changes for an existing record; `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplicationChanges {
    pub email: Option<String>,
    pub public_wallet: Option<String>,
    pub name: Option<String>,
    pub app_name: Option<String>,
}

impl ApplicationChanges {
    /// Applies the changes, returning whether anything actually differed.
    pub fn apply_to(&self, record: &mut ApplicationRecord) -> bool {
        let mut changed = false;
        if let Some(email) = &self.email {
            changed |= replace(&mut record.email, email);
        }
        if let Some(wallet) = &self.public_wallet {
            if record.public_wallet.as_deref() != Some(wallet.as_str()) {
                record.public_wallet = Some(wallet.clone());
                changed = true;
            }
        }
        if let Some(name) = &self.name {
            changed |= replace(&mut record.name, name);
        }
        if let Some(app_name) = &self.app_name {
            changed |= replace(&mut record.app_name, app_name);
        }
        changed
    }
}

fn replace(slot: &mut String, value: &str) -> bool {
    if slot == value {
        return false;
    }
    *slot = value.to_string();
    true
}
