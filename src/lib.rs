pub mod app;
pub mod domain;
pub mod infra;
pub mod storage;
pub mod transport;

// Convenience re-exports (keeps call-sites clean)
pub use app::registration_service::{RegistrationService, ServiceError};
pub use domain::application::{AppId, ApplicationRecord, OwnershipProof, ValidationError};
pub use infra::config::Config;
pub use storage::{ApplicationStore, MemoryApplicationStore, PostgresApplicationStore, StoreError};
