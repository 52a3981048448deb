//! REST client for the marketplace backend.
//!
//! Serves as the remote [`lancer_stats::WorkspaceSource`] for dashboard
//! refreshes and as a [`lancer_profile::MediaEncoder`] that uploads
//! profile images instead of inlining them.

mod client;
mod error;
pub mod upload;
mod user;

pub use client::{BackendClient, BackendConfig, DEFAULT_BASE_URL, DEFAULT_UPLOAD_FIELD};
pub use error::{ApiError, ApiResult};
pub use upload::extract_uploaded_url;
pub use user::UserSummary;
