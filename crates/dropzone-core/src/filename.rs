//! Client filename handling.
//!
//! Client filenames are untrusted. Only the last path component is ever used as a
//! storage key; both `/` and `\` count as separators because some browsers submit the
//! full local path.

fn is_separator(c: char) -> bool {
    c == '/' || c == '\\'
}

/// Strip every directory component from a client-supplied filename.
///
/// Trailing separators are ignored, so `"reports/"` yields `"reports"`.
pub fn basename(filename: &str) -> &str {
    let trimmed = filename.trim_end_matches(is_separator);
    match trimmed.rfind(is_separator) {
        Some(idx) => &trimmed[idx + 1..],
        None => trimmed,
    }
}

/// Extension of the base filename: the substring after the last `.`, case preserved.
///
/// Returns `None` when there is no dot or nothing follows it.
pub fn extension(filename: &str) -> Option<&str> {
    basename(filename)
        .rsplit_once('.')
        .map(|(_, ext)| ext)
        .filter(|ext| !ext.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basename_strips_traversal() {
        assert_eq!(basename("../../etc/passthrough.csv"), "passthrough.csv");
        assert_eq!(basename("/abs/path/data.csv"), "data.csv");
        assert_eq!(basename("C:\\Users\\me\\data.csv"), "data.csv");
        assert_eq!(basename("data.csv"), "data.csv");
    }

    #[test]
    fn test_basename_trailing_separator() {
        assert_eq!(basename("reports/"), "reports");
        assert_eq!(basename("/"), "");
        assert_eq!(basename(""), "");
    }

    #[test]
    fn test_extension_after_last_dot() {
        assert_eq!(extension("data.csv"), Some("csv"));
        assert_eq!(extension("archive.tar.gz"), Some("gz"));
        assert_eq!(extension(".csv"), Some("csv"));
        assert_eq!(extension("DATA.CSV"), Some("CSV"));
    }

    #[test]
    fn test_extension_missing() {
        assert_eq!(extension("README"), None);
        assert_eq!(extension("trailing."), None);
        // Dots in directory names do not count
        assert_eq!(extension("v1.2/README"), None);
    }
}
