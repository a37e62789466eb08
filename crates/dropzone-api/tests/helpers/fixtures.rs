//! Test fixtures: CSV payloads and multipart forms.

use axum_test::multipart::{MultipartForm, Part};

/// A small CSV document of roughly `rows` lines.
pub fn csv_rows(rows: usize) -> Vec<u8> {
    let mut csv = String::from("id,name,score\n");
    for i in 0..rows {
        csv.push_str(&format!("{},row-{},{}\n", i, i, i * 7 % 100));
    }
    csv.into_bytes()
}

/// Exactly `len` bytes of CSV-looking filler.
pub fn csv_of_len(len: usize) -> Vec<u8> {
    b"a,b,c\n".iter().copied().cycle().take(len).collect()
}

/// A form with one `file` part.
pub fn file_form(file_name: &str, mime_type: &str, content: Vec<u8>) -> MultipartForm {
    MultipartForm::new().add_part(
        "file",
        Part::bytes(content)
            .file_name(file_name.to_string())
            .mime_type(mime_type.to_string()),
    )
}
