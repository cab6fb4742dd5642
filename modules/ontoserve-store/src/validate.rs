//! Path-segment and filename validation for uploaded content.
//!
//! Every segment that ends up in a filesystem path is checked before any
//! directory is created or file is written. Violations surface as 400s.

use regex::Regex;

/// File extensions the upload endpoint accepts.
pub const SUPPORTED_EXTENSIONS: &[&str] =
    &["ttl", "html", "png", "pdf", "eap", "xsd", "jpg", "docx"];

/// A single path segment: no traversal, no separators, conservative
/// character set, must not start with a dot or dash.
pub fn valid_segment(segment: &str) -> bool {
    let re = Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._ -]*$").expect("valid regex");
    re.is_match(segment) && !segment.contains("..")
}

/// An uploaded filename. May carry `/`-separated sub-folders (packaging
/// tools upload e.g. `images/diagram.png`); each segment is validated on
/// its own.
pub fn valid_upload_filename(name: &str) -> bool {
    if name.is_empty() || name.starts_with('/') || name.ends_with('/') || name.contains('\\') {
        return false;
    }
    name.split('/').all(valid_segment)
}

pub fn valid_extension(extension: &str) -> bool {
    SUPPORTED_EXTENSIONS.contains(&extension.to_ascii_lowercase().as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_segments_are_valid() {
        assert!(valid_segment("vocabularies"));
        assert!(valid_segment("audience-type"));
        assert!(valid_segment("v1.0.2"));
    }

    #[test]
    fn traversal_and_separators_are_rejected() {
        assert!(!valid_segment(".."));
        assert!(!valid_segment("a/../b"));
        assert!(!valid_segment("a/b"));
        assert!(!valid_segment(".hidden"));
        assert!(!valid_segment(""));
        assert!(!valid_segment("-dash-first"));
    }

    #[test]
    fn filenames_may_carry_subfolders() {
        assert!(valid_upload_filename("audience-type-en.html"));
        assert!(valid_upload_filename("images/diagram.png"));
        assert!(!valid_upload_filename("/etc/passwd"));
        assert!(!valid_upload_filename("images/../../secret"));
        assert!(!valid_upload_filename("images\\diagram.png"));
        assert!(!valid_upload_filename("images/"));
    }

    #[test]
    fn extensions_are_case_insensitive() {
        assert!(valid_extension("ttl"));
        assert!(valid_extension("HTML"));
        assert!(!valid_extension("exe"));
    }
}
