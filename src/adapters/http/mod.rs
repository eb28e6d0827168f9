//! HTTP API for the advisory endpoints.

pub mod error;
pub mod handlers;
pub mod server;
pub mod state;

pub use error::{ApiError, ErrorResponse};
pub use server::{build_router, ApiServer};
pub use state::{AppComponents, AppState};
