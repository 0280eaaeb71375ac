//! Common utilities for upload and download handlers

const MAX_FILENAME_LENGTH: usize = 255;

/// Reduce an uploader-supplied filename to something safe to embed in a
/// Content-Disposition header. The stored artifact name never derives from
/// user input, so this is purely about header hygiene.
pub fn header_safe_filename(filename: &str) -> String {
    let sanitized: String = filename
        .chars()
        .take(MAX_FILENAME_LENGTH)
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '.' | '-' | '_' | ' ') {
                c
            } else {
                '_'
            }
        })
        .collect();

    let trimmed = sanitized.trim();
    if trimmed.is_empty() {
        "video".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keeps_ordinary_names() {
        assert_eq!(header_safe_filename("holiday.mov"), "holiday.mov");
        assert_eq!(header_safe_filename("my-file_1.mp4"), "my-file_1.mp4");
        assert_eq!(header_safe_filename("two words.mp4"), "two words.mp4");
    }

    #[test]
    fn test_replaces_header_breaking_characters() {
        assert_eq!(header_safe_filename("a\"b.mp4"), "a_b.mp4");
        assert_eq!(header_safe_filename("line\r\nbreak.mp4"), "line__break.mp4");
        assert_eq!(header_safe_filename("semi;colon.mp4"), "semi_colon.mp4");
    }

    #[test]
    fn test_empty_falls_back() {
        assert_eq!(header_safe_filename(""), "video");
        assert_eq!(header_safe_filename("   "), "video");
    }

    #[test]
    fn test_truncates_long_names() {
        let long = "a".repeat(1000) + ".mp4";
        assert_eq!(header_safe_filename(&long).len(), MAX_FILENAME_LENGTH);
    }
}
