pub mod auth;
pub mod router;
pub mod types;
pub mod handlers {
    pub mod applications;
    pub mod health;
}

pub use router::{create_router, ApiDoc};
pub use types::{ApiError, AppState, API_KEY_HEADER};
