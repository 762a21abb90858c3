use thiserror::Error;

/// Errors raised at the editor's I/O boundaries (image import and PNG export).
///
/// Editing operations themselves never fail: a violated precondition is a no-op.
#[derive(Debug, Error)]
pub enum EditorError {
    #[error("Failed to decode image: {0}")]
    ImageDecode(#[source] image::ImageError),

    #[error("Image decode was cancelled before completing")]
    DecodeCancelled,

    #[error("Decoded image has no pixels")]
    EmptyImage,

    #[error("No canvas is attached")]
    NoCanvas,

    #[error("Failed to encode PNG: {0}")]
    Encode(#[source] image::ImageError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Browser download failed: {0}")]
    Web(String),
}

pub type EditorResult<T> = Result<T, EditorError>;
