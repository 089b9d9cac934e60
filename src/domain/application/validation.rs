//! Request validation.
//!
//! Every inbound request arrives as query parameters that may be absent, empty or
//! malformed. The `validate` methods turn them into domain values or a single
//! [`ValidationError`]; callers report all failures to clients the same way.

use super::{AppId, ApplicationChanges, NewApplication, OwnershipProof};
use regex::Regex;
use serde::Deserialize;
use std::sync::LazyLock;
use thiserror::Error;
use utoipa::IntoParams;

pub const MIN_FIELD_LENGTH: usize = 1;
pub const MAX_FIELD_LENGTH: usize = 250;
pub const PUBLIC_WALLET_LENGTH: usize = 56;

static PUBLIC_WALLET_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^G[A-Z0-9]{55}$").expect("wallet pattern compiles"));

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s.]+(\.[^@\s.]+)+$").expect("email pattern compiles")
});

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("missing required field `{0}`")]
    Missing(&'static str),
    #[error("field `{field}` must be {min}..={max} characters")]
    Length {
        field: &'static str,
        min: usize,
        max: usize,
    },
    #[error("field `{0}` is malformed")]
    Malformed(&'static str),
    #[error("either `email` or `public_wallet` must be supplied as ownership proof")]
    NoOwnershipProof,
}

/// Query parameters of `POST /register`.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RegistrationRequest {
    /// Contact email, unique across registrations.
    pub email: Option<String>,
    /// Display name of the registrant.
    pub name: Option<String>,
    /// Name of the application being registered.
    pub app_name: Option<String>,
    /// Optional public wallet address (`G` followed by 55 uppercase alphanumerics).
    pub public_wallet: Option<String>,
}

/// Query parameters of `PATCH /update`.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UpdateRequest {
    pub app_id: Option<String>,
    /// Ownership proof and, when the wallet proves ownership, the new email.
    pub email: Option<String>,
    /// Ownership proof and, when the email proves ownership, the new wallet.
    pub public_wallet: Option<String>,
    pub name: Option<String>,
    pub app_name: Option<String>,
}

/// Query parameters of `GET /get_app` and `DELETE /remove`.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LookupRequest {
    pub app_id: Option<String>,
    pub email: Option<String>,
    pub public_wallet: Option<String>,
}

/// A validated update: which record, how ownership is proven, and what changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedUpdate {
    pub app_id: AppId,
    pub proof: OwnershipProof,
    pub changes: ApplicationChanges,
}

/// A validated lookup (get or remove).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedLookup {
    pub app_id: AppId,
    pub proof: OwnershipProof,
}

impl RegistrationRequest {
    pub fn validate(self) -> Result<NewApplication, ValidationError> {
        let email = required("email", self.email)?;
        let name = required("name", self.name)?;
        let app_name = required("app_name", self.app_name)?;
        let public_wallet = present(self.public_wallet);

        Ok(NewApplication {
            email: check_email(email)?,
            name: check_length("name", name)?,
            app_name: check_length("app_name", app_name)?,
            public_wallet: public_wallet.map(check_wallet).transpose()?,
        })
    }
}

impl UpdateRequest {
    pub fn validate(self) -> Result<ValidatedUpdate, ValidationError> {
        let app_id = check_app_id(required("app_id", self.app_id)?)?;
        let email = present(self.email).map(check_email).transpose()?;
        let public_wallet = present(self.public_wallet).map(check_wallet).transpose()?;
        let name = present(self.name)
            .map(|v| check_length("name", v))
            .transpose()?;
        let app_name = present(self.app_name)
            .map(|v| check_length("app_name", v))
            .transpose()?;

        let proof = OwnershipProof::new(email.clone(), public_wallet.clone())
            .ok_or(ValidationError::NoOwnershipProof)?;

        Ok(ValidatedUpdate {
            app_id,
            proof,
            changes: ApplicationChanges {
                email,
                public_wallet,
                name,
                app_name,
            },
        })
    }
}

impl LookupRequest {
    pub fn validate(self) -> Result<ValidatedLookup, ValidationError> {
        let app_id = check_app_id(required("app_id", self.app_id)?)?;
        let email = present(self.email).map(check_email).transpose()?;
        let public_wallet = present(self.public_wallet).map(check_wallet).transpose()?;
        let proof =
            OwnershipProof::new(email, public_wallet).ok_or(ValidationError::NoOwnershipProof)?;
        Ok(ValidatedLookup { app_id, proof })
    }
}

/// Treats missing, empty and whitespace-only values alike.
fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn required(field: &'static str, value: Option<String>) -> Result<String, ValidationError> {
    present(value).ok_or(ValidationError::Missing(field))
}

fn check_length(field: &'static str, value: String) -> Result<String, ValidationError> {
    let len = value.chars().count();
    if (MIN_FIELD_LENGTH..=MAX_FIELD_LENGTH).contains(&len) {
        Ok(value)
    } else {
        Err(ValidationError::Length {
            field,
            min: MIN_FIELD_LENGTH,
            max: MAX_FIELD_LENGTH,
        })
    }
}

fn check_email(value: String) -> Result<String, ValidationError> {
    let value = check_length("email", value)?;
    if EMAIL_PATTERN.is_match(&value) {
        Ok(value)
    } else {
        Err(ValidationError::Malformed("email"))
    }
}

fn check_wallet(value: String) -> Result<String, ValidationError> {
    if value.len() != PUBLIC_WALLET_LENGTH {
        return Err(ValidationError::Length {
            field: "public_wallet",
            min: PUBLIC_WALLET_LENGTH,
            max: PUBLIC_WALLET_LENGTH,
        });
    }
    if PUBLIC_WALLET_PATTERN.is_match(&value) {
        Ok(value)
    } else {
        Err(ValidationError::Malformed("public_wallet"))
    }
}

fn check_app_id(value: String) -> Result<AppId, ValidationError> {
    AppId::parse(&value).ok_or(ValidationError::Malformed("app_id"))
}
