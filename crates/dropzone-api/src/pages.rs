//! HTML for the upload page.
//!
//! Only the form itself is rendered here; site chrome is not part of this service.

use crate::constants::UPLOAD_ROUTE;

/// Escape text for inclusion in HTML element content or attribute values
pub fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn form(accept: &str, label: &str) -> String {
    format!(
        r#"    <main>
        <form action="{action}" method="post" enctype="multipart/form-data">
            <label for="file">Choose a {label} file to upload:</label>
            <input type="file" name="file" id="file" accept="{accept}" required>
            <button type="submit">Upload</button>
        </form>
    </main>
"#,
        action = UPLOAD_ROUTE,
        label = escape_html(label),
        accept = escape_html(accept),
    )
}

fn document(body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n    <meta charset=\"utf-8\">\n    <title>Upload</title>\n</head>\n<body>\n{}</body>\n</html>\n",
        body
    )
}

/// The upload form page.
pub fn upload_page(accept: &str, label: &str) -> String {
    document(&form(accept, label))
}

/// Error output that stops the page: only the message is sent.
pub fn halted_page(message: &str) -> String {
    format!("Error: {}", escape_html(message))
}

/// Error message followed by the upload form.
pub fn inline_error_page(message: &str, accept: &str, label: &str) -> String {
    let body = format!(
        "    <p class=\"error\">Error: {}</p>\n{}",
        escape_html(message),
        form(accept, label)
    );
    document(&body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">'&'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;&#39;&amp;&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_upload_page_has_single_file_field() {
        let page = upload_page(".csv", "CSV");
        assert!(page.contains(r#"enctype="multipart/form-data""#));
        assert!(page.contains(r#"name="file""#));
        assert!(page.contains(r#"accept=".csv""#));
        assert_eq!(page.matches("<input").count(), 1);
    }

    #[test]
    fn test_halted_page_is_message_only() {
        let page = halted_page("Please select a valid CSV file.");
        assert_eq!(page, "Error: Please select a valid CSV file.");
    }

    #[test]
    fn test_inline_error_page_keeps_form() {
        let page = inline_error_page("no file was uploaded (code 4)", ".csv", "CSV");
        assert!(page.contains("Error: no file was uploaded (code 4)"));
        assert!(page.contains("<form"));
    }
}
