//! Error types for the DEM crate.

use thiserror::Error;

/// Errors that can occur while turning a query into an elevation grid.
#[derive(Debug, Error)]
pub enum DemError {
    /// A query coordinate is non-finite or outside its valid range.
    #[error("Invalid {name} {value} (must be within {min} to {max})")]
    InvalidCoordinate {
        /// Which input was rejected ("latitude" or "longitude").
        name: &'static str,
        /// The rejected value.
        value: f64,
        /// Lower bound of the accepted range.
        min: f64,
        /// Upper bound of the accepted range.
        max: f64,
    },

    /// The query radius is negative or non-finite.
    #[error("Invalid radius {0} miles (must be a finite value >= 0)")]
    InvalidRadius(f64),

    /// TIFF decoding error.
    #[error("TIFF decode error: {0}")]
    TiffDecode(#[from] tiff::TiffError),

    /// Tile decoded but its contents are not usable.
    #[error("Invalid GeoTIFF: {0}")]
    InvalidGeoTiff(String),

    /// Raster returned by an elevation source is internally inconsistent.
    #[error("Invalid raster: {0}")]
    InvalidRaster(String),

    /// HTTP request error when fetching tiles.
    #[error("HTTP request error: {0}")]
    HttpRequest(#[from] reqwest::Error),

    /// Failed to download tile from remote server.
    #[error("Failed to download tile z={z} x={x} y={y}: {reason}")]
    TileDownloadFailed {
        /// Zoom level.
        z: u8,
        /// X tile coordinate.
        x: u32,
        /// Y tile coordinate.
        y: u32,
        /// Reason for failure.
        reason: String,
    },

    /// Invalid zoom level.
    #[error("Invalid zoom level {0} (must be 1-14)")]
    InvalidZoomLevel(u8),

    /// The source cannot deliver rasters in the requested projection.
    #[error("Unsupported coordinate reference system: {0}")]
    UnsupportedCrs(String),

    /// Retrieval failed inside a custom elevation source.
    #[error("Elevation retrieval failed: {0}")]
    Retrieval(String),

    /// Retrieval succeeded but yielded no usable elevation samples.
    #[error("No elevation data returned for the requested bounds")]
    NoData,

    /// Sample count does not split evenly into the detected rows.
    #[error("Cannot reshape {samples} samples into {rows} rows")]
    ShapeMismatch {
        /// Total number of samples returned.
        samples: usize,
        /// Number of distinct row coordinates among them.
        rows: usize,
    },
}
