//! Loading and saving markdown documents
//!
//! Files are validated before reading (existence, size, binary content)
//! and CRLF line endings are normalized to `\n` while editing, then
//! restored on save. Files mixing both styles are edited as they are.

use std::fs::{self, File};
use std::io::Read;
use std::path::Path;

/// Maximum file size in bytes (50 MB)
pub const MAX_FILE_SIZE: u64 = 50 * 1024 * 1024;

/// Errors that can occur when opening a document
#[derive(Debug, Clone)]
pub enum DocumentError {
    NotFound,
    PermissionDenied,
    IsDirectory,
    /// File appears to be binary (contains null bytes)
    BinaryFile,
    TooLarge { size_mb: f64 },
    /// File is not valid UTF-8
    InvalidUtf8,
    IoError(String),
}

impl std::fmt::Display for DocumentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound => write!(f, "file not found"),
            Self::PermissionDenied => write!(f, "permission denied"),
            Self::IsDirectory => write!(f, "is a directory"),
            Self::BinaryFile => write!(f, "binary file"),
            Self::TooLarge { size_mb } => write!(
                f,
                "file too large ({:.1} MB, max {} MB)",
                size_mb,
                MAX_FILE_SIZE / (1024 * 1024)
            ),
            Self::InvalidUtf8 => write!(f, "not valid UTF-8"),
            Self::IoError(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for DocumentError {}

impl From<std::io::Error> for DocumentError {
    fn from(e: std::io::Error) -> Self {
        match e.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound,
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied,
            std::io::ErrorKind::InvalidData => Self::InvalidUtf8,
            _ => Self::IoError(e.to_string()),
        }
    }
}

/// Line terminator style of a document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LineEnding {
    #[default]
    Lf,
    CrLf,
    /// Both styles occur; the text is edited as-is
    Mixed,
}

impl LineEnding {
    /// `CrLf` only if every line break in `text` is `\r\n`
    pub fn detect(text: &str) -> Self {
        let breaks = text.matches('\n').count();
        let crlf = text.matches("\r\n").count();
        match crlf {
            0 => Self::Lf,
            n if n == breaks => Self::CrLf,
            _ => Self::Mixed,
        }
    }
}

/// A document's text with `\n` line endings, plus its original style
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    pub text: String,
    pub line_ending: LineEnding,
}

impl Document {
    pub fn from_text(text: &str) -> Self {
        let line_ending = LineEnding::detect(text);
        let text = match line_ending {
            LineEnding::Lf | LineEnding::Mixed => text.to_string(),
            LineEnding::CrLf => text.replace("\r\n", "\n"),
        };
        Self { text, line_ending }
    }

    /// `text` rendered with the document's line endings
    pub fn render(&self, text: &str) -> String {
        match self.line_ending {
            LineEnding::Lf | LineEnding::Mixed => text.to_string(),
            LineEnding::CrLf => text.replace('\n', "\r\n"),
        }
    }

    /// Validate and read a document from disk
    pub fn load(path: &Path) -> Result<Self, DocumentError> {
        validate_file_for_opening(path)?;
        if is_likely_binary(path) {
            return Err(DocumentError::BinaryFile);
        }
        let text = fs::read_to_string(path)?;
        let document = Self::from_text(&text);
        tracing::debug!(
            path = %path.display(),
            bytes = text.len(),
            line_ending = ?document.line_ending,
            "loaded document"
        );
        Ok(document)
    }

    /// Write `text` to `path` with the document's line endings
    pub fn save(&self, path: &Path, text: &str) -> Result<(), DocumentError> {
        fs::write(path, self.render(text))?;
        tracing::debug!(path = %path.display(), "saved document");
        Ok(())
    }
}

/// Validate a file before attempting to open it
///
/// Checks that the file exists, is not a directory, and does not exceed
/// the size limit. Binary content is checked separately by
/// [`is_likely_binary`].
pub fn validate_file_for_opening(path: &Path) -> Result<(), DocumentError> {
    let metadata = fs::metadata(path)?;

    if metadata.is_dir() {
        return Err(DocumentError::IsDirectory);
    }

    if metadata.len() > MAX_FILE_SIZE {
        return Err(DocumentError::TooLarge {
            size_mb: metadata.len() as f64 / (1024.0 * 1024.0),
        });
    }

    Ok(())
}

/// Check if a file is likely binary by scanning the first 8KB for null bytes.
///
/// Returns `false` on any read error (let the actual read fail with a better error).
pub fn is_likely_binary(path: &Path) -> bool {
    let Ok(mut file) = File::open(path) else {
        return false;
    };

    let mut buffer = [0u8; 8192];
    let Ok(bytes_read) = file.read(&mut buffer) else {
        return false;
    };

    buffer[..bytes_read].contains(&0)
}
