//! Error types for sshsync-config

use std::fmt;

/// Result type for sshsync-config operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading, editing or persisting a config
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Duplicate start marker in config on line {}", .line + 1)]
    DuplicateBeginMarker { line: usize },

    #[error("Mismatched markers. Begin marker missing; end marker at line {}", .end + 1)]
    MissingBeginMarker { end: usize },

    #[error("Mismatched markers. End marker missing; begin marker at line {}", .begin + 1)]
    MissingEndMarker { begin: usize },

    #[error(
        "Mismatched markers. End marker at line {} precedes begin marker at line {}",
        .end + 1,
        .begin + 1
    )]
    EndBeforeBegin { end: usize, begin: usize },

    #[error("Invalid host template: {}", FieldErrors(.0))]
    Validation(Vec<FieldError>),

    #[error("Invalid keyword argument '{0}': must be Keyword=Argument")]
    InvalidKeywordArgument(String),

    #[error("Invalid instance pattern '{pattern}': {message}")]
    InvalidGlob { pattern: String, message: String },

    #[error("Config document was not loaded from a file and cannot be persisted")]
    Detached,

    #[error(transparent)]
    Fs(#[from] sshsync_fs::Error),
}

impl Error {
    /// Whether this is one of the fatal marker errors raised while parsing.
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            Self::DuplicateBeginMarker { .. }
                | Self::MissingBeginMarker { .. }
                | Self::MissingEndMarker { .. }
                | Self::EndBeforeBegin { .. }
        )
    }
}

/// One rejected template field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub keyword: String,
    pub kind: FieldErrorKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldErrorKind {
    /// Not an ssh_config(5) keyword we know about
    Unsupported,
    /// Value doesn't fit the keyword's type
    InvalidValue { value: String, expected: String },
}

impl FieldError {
    pub fn unsupported(keyword: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            kind: FieldErrorKind::Unsupported,
        }
    }

    pub fn invalid(
        keyword: impl Into<String>,
        value: impl Into<String>,
        expected: impl Into<String>,
    ) -> Self {
        Self {
            keyword: keyword.into(),
            kind: FieldErrorKind::InvalidValue {
                value: value.into(),
                expected: expected.into(),
            },
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            FieldErrorKind::Unsupported => write!(f, "field {} is not supported", self.keyword),
            FieldErrorKind::InvalidValue { value, expected } => write!(
                f,
                "invalid value '{}' in field {}: expected {}",
                value, self.keyword, expected
            ),
        }
    }
}

struct FieldErrors<'a>(&'a [FieldError]);

impl fmt::Display for FieldErrors<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{err}")?;
        }
        Ok(())
    }
}
