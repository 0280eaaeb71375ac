/// Container format every stored video is normalized to.
pub const CANONICAL_EXTENSION: &str = "mp4";

/// Validation errors for uploaded video files
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("File too large: {size} bytes (max: {max} bytes)")]
    FileTooLarge { size: usize, max: usize },

    #[error("Invalid file extension: {extension} (allowed: {allowed:?})")]
    InvalidExtension {
        extension: String,
        allowed: Vec<String>,
    },

    #[error("Missing file extension: {0}")]
    MissingExtension(String),

    #[error("Empty file")]
    EmptyFile,
}

/// Video file validator
///
/// The sole gate before any upload bytes touch storage: extension
/// allow-listing and size limits, with no side effects.
#[derive(Clone)]
pub struct VideoValidator {
    max_file_size: usize,
    allowed_extensions: Vec<String>,
}

impl VideoValidator {
    pub fn new(max_file_size: usize, allowed_extensions: Vec<String>) -> Self {
        Self {
            max_file_size,
            allowed_extensions: allowed_extensions
                .into_iter()
                .map(|e| e.to_lowercase())
                .collect(),
        }
    }

    /// Validate file size
    pub fn validate_file_size(&self, size: usize) -> Result<(), ValidationError> {
        if size == 0 {
            return Err(ValidationError::EmptyFile);
        }

        if size > self.max_file_size {
            return Err(ValidationError::FileTooLarge {
                size,
                max: self.max_file_size,
            });
        }

        Ok(())
    }

    /// Validate the filename's extension and return it normalized.
    ///
    /// The extension is the substring after the last `.`, compared
    /// case-insensitively against the allow-list. Filenames without a `.`
    /// are rejected.
    pub fn validate_extension(&self, filename: &str) -> Result<String, ValidationError> {
        let extension = match filename.rsplit_once('.') {
            Some((_, ext)) => ext.to_lowercase(),
            None => return Err(ValidationError::MissingExtension(filename.to_string())),
        };

        if !self.allowed_extensions.contains(&extension) {
            return Err(ValidationError::InvalidExtension {
                extension,
                allowed: self.allowed_extensions.clone(),
            });
        }

        Ok(extension)
    }

    /// True iff the filename carries an allow-listed extension.
    pub fn is_allowed(&self, filename: &str) -> bool {
        self.validate_extension(filename).is_ok()
    }
}

/// True when a container with this (normalized) extension must be
/// transcoded before it is ready for playback.
pub fn needs_transcode(extension: &str) -> bool {
    extension != CANONICAL_EXTENSION
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_validator() -> VideoValidator {
        VideoValidator::new(
            1024 * 1024,
            vec![
                "mp4".to_string(),
                "mov".to_string(),
                "avi".to_string(),
                "mkv".to_string(),
            ],
        )
    }

    #[test]
    fn test_is_allowed_iff_suffix_in_allow_list() {
        let validator = test_validator();

        assert!(validator.is_allowed("clip.mp4"));
        assert!(validator.is_allowed("clip.MOV")); // case insensitive
        assert!(validator.is_allowed("clip.Avi"));
        assert!(validator.is_allowed("archive.tar.mkv")); // last suffix wins
        assert!(validator.is_allowed(".mov")); // suffix after the last dot

        assert!(!validator.is_allowed("clip"));
        assert!(!validator.is_allowed("clip."));
        assert!(!validator.is_allowed("clip.mp3"));
        assert!(!validator.is_allowed("clip.mp4.exe"));
        assert!(!validator.is_allowed(""));
    }

    #[test]
    fn test_validate_extension_normalizes() {
        let validator = test_validator();
        assert_eq!(validator.validate_extension("clip.MOV").unwrap(), "mov");
        assert_eq!(validator.validate_extension("clip.mp4").unwrap(), "mp4");
    }

    #[test]
    fn test_validate_extension_missing_dot() {
        let validator = test_validator();
        assert!(matches!(
            validator.validate_extension("noextension"),
            Err(ValidationError::MissingExtension(_))
        ));
    }

    #[test]
    fn test_validate_extension_not_allowed() {
        let validator = test_validator();
        assert!(matches!(
            validator.validate_extension("clip.webm"),
            Err(ValidationError::InvalidExtension { .. })
        ));
    }

    #[test]
    fn test_allow_list_normalized_at_construction() {
        let validator = VideoValidator::new(1024, vec!["MP4".to_string()]);
        assert!(validator.is_allowed("clip.mp4"));
        assert!(validator.is_allowed("clip.MP4"));
    }

    #[test]
    fn test_validate_file_size() {
        let validator = test_validator();
        assert!(validator.validate_file_size(512 * 1024).is_ok());
        assert!(matches!(
            validator.validate_file_size(0),
            Err(ValidationError::EmptyFile)
        ));
        assert!(matches!(
            validator.validate_file_size(2 * 1024 * 1024),
            Err(ValidationError::FileTooLarge { .. })
        ));
    }

    #[test]
    fn test_needs_transcode() {
        assert!(!needs_transcode("mp4"));
        assert!(needs_transcode("mov"));
        assert!(needs_transcode("avi"));
        assert!(needs_transcode("mkv"));
    }
}
