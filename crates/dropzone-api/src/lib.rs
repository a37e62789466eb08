//! Dropzone API Library
//!
//! HTTP handlers, middleware, and application setup for the single-file upload form.

pub mod constants;
pub mod error;
mod handlers;
mod middleware;
pub mod pages;
pub mod services;
pub mod setup;
pub mod state;
mod telemetry;
mod utils;

pub use error::{upload_error_response, InvalidRedirect};
pub use services::{UploadRedirect, UploadService};
pub use state::AppState;
