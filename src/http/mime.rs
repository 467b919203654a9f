//! Content type lookup.

use std::path::Path;

/// Sent when the extension is unknown or missing.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

const EXTENSIONS: &[(&str, &str)] = &[
    ("bin", "application/octet-stream"),
    ("pdf", "application/pdf"),
    ("dvi", "application/x-dvi"),
    ("tex", "application/x-tex"),
    ("mp3", "audio/x-mpeg"),
    ("sh", "application/x-sh"),
    // images
    ("gif", "image/gif"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("png", "image/png"),
    // archives
    ("zip", "application/zip"),
    ("gz", "application/x-gzip"),
    ("gzip", "application/x-gzip"),
    ("tar", "application/x-tar"),
    ("jar", "application/java-archive"),
    // text
    ("htm", "text/html"),
    ("html", "text/html"),
    ("c", "text/plain"),
    ("cc", "text/plain"),
    ("h", "text/plain"),
    ("txt", "text/plain"),
];

/// Looks up the content type for an extension (case-sensitive).
pub fn lookup(ext: &str) -> Option<&'static str> {
    EXTENSIONS
        .iter()
        .find(|(known, _)| *known == ext)
        .map(|(_, content_type)| *content_type)
}

/// Content type for a file, keyed by the text after the last `.` of its name.
///
/// `Makefile` and `makefile` are plain text. A name ending in `.` has no
/// extension.
pub fn content_type_for(path: &Path) -> &'static str {
    let name = match path.file_name() {
        Some(name) => name.to_string_lossy(),
        None => return DEFAULT_CONTENT_TYPE,
    };

    if name == "Makefile" || name == "makefile" {
        return "text/plain";
    }

    name.rsplit_once('.')
        .and_then(|(_, ext)| lookup(ext))
        .unwrap_or(DEFAULT_CONTENT_TYPE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_dot_has_no_extension() {
        assert_eq!(content_type_for(Path::new("./notes.")), DEFAULT_CONTENT_TYPE);
    }

    #[test]
    fn only_last_extension_counts() {
        assert_eq!(content_type_for(Path::new("./a.tar.gz")), "application/x-gzip");
    }
}
