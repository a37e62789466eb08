//! Upload validation policy.
//!
//! The policy is a whitelist: an extension is accepted only together with the exact
//! declared content type registered for it. It is built once from configuration and
//! shared read-only.

use crate::error::UploadError;
use crate::filename;
use crate::sniff::{self, SniffVerdict};
use std::collections::BTreeMap;

pub const DEFAULT_MAX_SIZE_BYTES: u64 = 10 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationPolicy {
    allowed_types: BTreeMap<String, String>,
    max_size_bytes: u64,
    content_sniffing: bool,
}

impl Default for ValidationPolicy {
    /// CSV only, 10 MiB, no sniffing.
    fn default() -> Self {
        Self::new(
            [("csv".to_string(), "text/csv".to_string())],
            DEFAULT_MAX_SIZE_BYTES,
        )
    }
}

impl ValidationPolicy {
    pub fn new(
        allowed_types: impl IntoIterator<Item = (String, String)>,
        max_size_bytes: u64,
    ) -> Self {
        Self {
            allowed_types: allowed_types.into_iter().collect(),
            max_size_bytes,
            content_sniffing: false,
        }
    }

    pub fn with_content_sniffing(mut self, enabled: bool) -> Self {
        self.content_sniffing = enabled;
        self
    }

    /// Parse `ext=mime` pairs separated by commas, e.g. `csv=text/csv,tsv=text/tab-separated-values`.
    pub fn parse_allowed_types(spec: &str) -> Result<BTreeMap<String, String>, anyhow::Error> {
        let mut allowed = BTreeMap::new();
        for pair in spec.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let (ext, mime) = pair.split_once('=').ok_or_else(|| {
                anyhow::anyhow!("Invalid allowed type '{}': expected ext=mime", pair)
            })?;
            let (ext, mime) = (ext.trim(), mime.trim());
            if ext.is_empty() || mime.is_empty() {
                return Err(anyhow::anyhow!(
                    "Invalid allowed type '{}': extension and content type must be non-empty",
                    pair
                ));
            }
            allowed.insert(ext.to_string(), mime.to_string());
        }
        Ok(allowed)
    }

    pub fn allowed_types(&self) -> &BTreeMap<String, String> {
        &self.allowed_types
    }

    pub fn max_size_bytes(&self) -> u64 {
        self.max_size_bytes
    }

    pub fn content_sniffing(&self) -> bool {
        self.content_sniffing
    }

    pub fn required_content_type(&self, extension: &str) -> Option<&str> {
        self.allowed_types.get(extension).map(String::as_str)
    }

    /// Label used in user-facing messages, e.g. "CSV" or "CSV/TSV".
    pub fn accepted_label(&self) -> String {
        self.allowed_types
            .keys()
            .map(|ext| ext.to_uppercase())
            .collect::<Vec<_>>()
            .join("/")
    }

    /// Value for the form's `accept` attribute, e.g. ".csv".
    pub fn accept_attribute(&self) -> String {
        self.allowed_types
            .keys()
            .map(|ext| format!(".{}", ext))
            .collect::<Vec<_>>()
            .join(",")
    }

    fn invalid_type(&self, extension: &str, content_type: &str) -> UploadError {
        UploadError::InvalidType {
            extension: extension.to_string(),
            content_type: content_type.to_string(),
            accepted: self.accepted_label(),
        }
    }

    /// Extension and declared content type must both match a whitelist entry exactly.
    ///
    /// With sniffing enabled, `head` must also be consistent with the declared type.
    pub fn validate_type(
        &self,
        original_filename: &str,
        declared_content_type: &str,
        head: &[u8],
    ) -> Result<(), UploadError> {
        let extension = filename::extension(original_filename).unwrap_or_default();

        let required = self
            .required_content_type(extension)
            .ok_or_else(|| self.invalid_type(extension, declared_content_type))?;

        if declared_content_type != required {
            return Err(self.invalid_type(extension, declared_content_type));
        }

        if self.content_sniffing {
            if let SniffVerdict::Mismatch(detected) = sniff::check(declared_content_type, head) {
                tracing::debug!(
                    declared = %declared_content_type,
                    detected = detected,
                    "Content does not match declared type"
                );
                return Err(self.invalid_type(extension, declared_content_type));
            }
        }

        Ok(())
    }

    pub fn validate_size(&self, size: u64) -> Result<(), UploadError> {
        if size > self.max_size_bytes {
            return Err(UploadError::TooLarge {
                size,
                max: self.max_size_bytes,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy_accepts_csv() {
        let policy = ValidationPolicy::default();
        assert!(policy.validate_type("data.csv", "text/csv", b"a,b").is_ok());
        assert_eq!(policy.max_size_bytes(), 10 * 1024 * 1024);
        assert_eq!(policy.accepted_label(), "CSV");
        assert_eq!(policy.accept_attribute(), ".csv");
    }

    #[test]
    fn test_unknown_extension_rejected() {
        let policy = ValidationPolicy::default();
        let err = policy
            .validate_type("data.txt", "text/plain", b"")
            .unwrap_err();
        assert!(matches!(err, UploadError::InvalidType { ref extension, .. } if extension == "txt"));
    }

    #[test]
    fn test_mime_mismatch_rejected() {
        let policy = ValidationPolicy::default();
        assert!(policy
            .validate_type("data.csv", "application/vnd.ms-excel", b"")
            .is_err());
        // Exact match only: parameters and case variants are mismatches
        assert!(policy
            .validate_type("data.csv", "text/csv; charset=utf-8", b"")
            .is_err());
        assert!(policy.validate_type("data.csv", "", b"").is_err());
    }

    #[test]
    fn test_extension_case_is_not_normalized() {
        let policy = ValidationPolicy::default();
        assert!(policy.validate_type("DATA.CSV", "text/csv", b"").is_err());
    }

    #[test]
    fn test_missing_extension_rejected() {
        let policy = ValidationPolicy::default();
        assert!(policy.validate_type("data", "text/csv", b"").is_err());
    }

    #[test]
    fn test_size_limit_inclusive() {
        let policy = ValidationPolicy::default();
        assert!(policy.validate_size(10 * 1024 * 1024).is_ok());
        let err = policy.validate_size(10 * 1024 * 1024 + 1).unwrap_err();
        assert!(matches!(err, UploadError::TooLarge { .. }));
    }

    #[test]
    fn test_sniffing_rejects_disguised_binary() {
        let policy = ValidationPolicy::default().with_content_sniffing(true);
        assert!(policy
            .validate_type("data.csv", "text/csv", b"PK\x03\x04payload")
            .is_err());
        assert!(policy
            .validate_type("data.csv", "text/csv", b"a,b\n1,2\n")
            .is_ok());
    }

    #[test]
    fn test_parse_allowed_types() {
        let allowed =
            ValidationPolicy::parse_allowed_types("csv=text/csv, tsv = text/tab-separated-values")
                .unwrap();
        assert_eq!(allowed.get("csv").map(String::as_str), Some("text/csv"));
        assert_eq!(
            allowed.get("tsv").map(String::as_str),
            Some("text/tab-separated-values")
        );

        let policy = ValidationPolicy::new(allowed, 1024);
        assert_eq!(policy.accepted_label(), "CSV/TSV");
    }

    #[test]
    fn test_parse_allowed_types_rejects_malformed() {
        assert!(ValidationPolicy::parse_allowed_types("csv").is_err());
        assert!(ValidationPolicy::parse_allowed_types("=text/csv").is_err());
        assert!(ValidationPolicy::parse_allowed_types("csv=").is_err());
    }
}
