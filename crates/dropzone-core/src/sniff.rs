//! Content sniffing.
//!
//! The declared content type is only a client claim. When sniffing is enabled the first
//! bytes of the upload are checked against what the declared type implies: text types
//! must look like text, and binary types with a well-known signature must start with it.
//! Types with no known signature pass.

/// Magic number check result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SniffVerdict {
    Consistent,
    Mismatch(&'static str),
}

const SIGNATURES: &[(&str, &[u8])] = &[
    ("application/pdf", b"%PDF-"),
    ("application/zip", b"PK\x03\x04"),
    ("image/png", b"\x89PNG\r\n\x1a\n"),
    ("image/jpeg", b"\xFF\xD8\xFF"),
    ("image/gif", b"GIF8"),
    ("application/gzip", b"\x1F\x8B"),
    ("application/x-executable", b"\x7FELF"),
    ("application/x-msdownload", b"MZ"),
];

/// Detect a known binary format from its leading bytes
fn detect_binary(head: &[u8]) -> Option<&'static str> {
    SIGNATURES
        .iter()
        .find(|(_, magic)| head.starts_with(magic))
        .map(|(mime, _)| *mime)
}

fn looks_like_text(head: &[u8]) -> bool {
    if head.contains(&0) {
        return false;
    }
    match std::str::from_utf8(head) {
        Ok(_) => true,
        // The head may cut a multi-byte character in half
        Err(e) => e.error_len().is_none(),
    }
}

/// Check the leading bytes of an upload against its declared content type.
pub fn check(declared_content_type: &str, head: &[u8]) -> SniffVerdict {
    if head.is_empty() {
        return SniffVerdict::Consistent;
    }

    if declared_content_type.starts_with("text/") {
        if let Some(detected) = detect_binary(head) {
            return SniffVerdict::Mismatch(detected);
        }
        if !looks_like_text(head) {
            return SniffVerdict::Mismatch("binary data");
        }
        return SniffVerdict::Consistent;
    }

    let expected = SIGNATURES
        .iter()
        .find(|(mime, _)| *mime == declared_content_type);

    match expected {
        Some((_, magic)) if !head.starts_with(magic) => {
            SniffVerdict::Mismatch(detect_binary(head).unwrap_or("unrecognized data"))
        }
        _ => SniffVerdict::Consistent,
    }
}
