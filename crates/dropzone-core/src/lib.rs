//! Dropzone Core Library
//!
//! This crate provides the domain models, validation policy, error types, configuration
//! and content sniffing shared by the storage and API crates.

pub mod config;
pub mod error;
pub mod filename;
pub mod models;
pub mod policy;
pub mod sniff;

// Re-export commonly used types
pub use config::{Config, LogFormat};
pub use error::{ErrorMetadata, LogLevel, TransportError, UploadError};
pub use models::{StoredFile, UploadRequest};
pub use policy::ValidationPolicy;
