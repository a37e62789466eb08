pub mod upload;

pub use upload::{UploadRedirect, UploadService};
