//! Filename safety checks for the download portal.
//!
//! Every name coming from a request or from the manifest goes through
//! [`validate_filename`] before it is allowed anywhere near the filesystem.

use std::fmt;
use thiserror::Error;

/// Reasons a filename is refused.
///
/// The messages are deliberately generic, they never repeat the rejected input.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum FilenameError {
    #[error("Filename is empty")]
    Empty,

    #[error("Filename contains a parent directory segment")]
    ParentSegment,

    #[error("Filename contains a path separator")]
    Separator,

    #[error("Filename contains a NUL byte")]
    NulByte,
}

/// A filename that passed [`validate_filename`].
///
/// It is always a single path segment, so joining it to a directory can not
/// leave that directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SafeFilename(String);

impl SafeFilename {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for SafeFilename {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SafeFilename {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub fn validate_filename(filename: &str) -> Result<SafeFilename, FilenameError> {
    if filename.is_empty() {
        return Err(FilenameError::Empty);
    }
    if filename.contains("..") {
        return Err(FilenameError::ParentSegment);
    }
    if filename.contains('/') || filename.contains('\\') {
        return Err(FilenameError::Separator);
    }
    if filename.contains('\0') {
        return Err(FilenameError::NulByte);
    }
    Ok(SafeFilename(filename.to_owned()))
}
