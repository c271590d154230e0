//! Error types for rendering.

use thiserror::Error;

/// Errors that can occur while shading a grid or writing the image.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The grid has no cells to shade.
    #[error("Cannot render an empty elevation grid")]
    EmptyGrid,

    /// The grid is larger than an image can hold.
    #[error("Grid of {rows}x{cols} cells is too large to render")]
    GridTooLarge {
        /// Grid rows.
        rows: usize,
        /// Grid columns.
        cols: usize,
    },

    /// Unknown texture name.
    #[error("Unknown texture '{0}' (expected one of imhof1, imhof2, imhof3, imhof4, desert, bw, unicorn)")]
    UnknownTexture(String),

    /// Image encoding failed.
    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),

    /// I/O error preparing the output location.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
