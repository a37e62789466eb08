//! Dropzone Storage Library
//!
//! This crate provides the storage abstraction for accepted uploads and its local
//! filesystem implementation.
//!
//! # Storage key format
//!
//! A storage key is the sanitized base filename of the upload. Keys are flat: they must
//! not contain path separators, NUL bytes, or be `.`/`..`. Storing under an existing key
//! replaces the previous file.

pub mod local;
pub mod traits;

// Re-export commonly used types
pub use local::LocalStorage;
pub use traits::{Storage, StorageError, StorageResult};
