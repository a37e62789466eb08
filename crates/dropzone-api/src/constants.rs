//! Route constants

/// Upload endpoint: GET renders the form, POST receives the file
pub const UPLOAD_ROUTE: &str = "/upload";

/// Multipart field that carries the file
pub const FILE_FIELD: &str = "file";

pub const HEALTH_LIVE_ROUTE: &str = "/health/live";
pub const HEALTH_READY_ROUTE: &str = "/health/ready";
