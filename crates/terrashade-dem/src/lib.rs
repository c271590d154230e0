//! # terrashade-dem
//!
//! Turns a center point and radius into a dense elevation grid.
//!
//! The pipeline has three steps:
//! - [`compute_bounds`] converts (lat, lon, radius in miles) into a
//!   [`GeoBoundingBox`] using a flat 69 miles per degree on both axes
//! - an [`ElevationSource`] returns a raster of samples clipped to the box;
//!   [`AwsTerrainSource`] fetches AWS Open Data terrain tiles
//! - [`ElevationGridBuilder`] flattens the raster and reshapes it into an
//!   [`ElevationGrid`] with one row per distinct sample row
//!
//! ### AWS Terrain Tiles
//!
//! AWS provides global 512x512 GeoTIFF tiles at various zoom levels:
//! - Zoom 14 (~5m resolution at equator) is used for every grid
//! - Tiles are fetched from: `https://s3.amazonaws.com/elevation-tiles-prod/geotiff/{z}/{x}/{y}.tif`
//! - Uses OpenStreetMap Slippy Map tiling convention
//!
//! ## Example
//!
//! ```no_run
//! use terrashade_dem::{AwsTerrainSource, ElevationGridBuilder, Query};
//!
//! let query = Query::new(46.8523, -121.7603, 2.0)?; // Mount Rainier
//! let builder = ElevationGridBuilder::new(AwsTerrainSource::new()?);
//!
//! let grid = builder.build_grid(&query.bounds())?;
//! println!("{} x {} samples", grid.rows(), grid.cols());
//! # Ok::<(), terrashade_dem::DemError>(())
//! ```

mod aws_tiles;
mod bounds;
mod builder;
mod error;
mod grid;
mod source;
mod tile;

pub use aws_tiles::{
    mosaic_tiles, validate_zoom, AwsTerrainSource, DownloadCallback, DownloadStats, TileCoord,
    TileSpan, AWS_TILE_BASE_URL, DEFAULT_TIMEOUT, DEFAULT_ZOOM, MAX_ZOOM, MIN_ZOOM,
};
pub use bounds::{compute_bounds, GeoBoundingBox, Query, MILES_PER_DEGREE};
pub use builder::ElevationGridBuilder;
pub use error::DemError;
pub use grid::{distinct_row_count, flatten, reshape_column_major, ElevationGrid, FlatSamples};
pub use source::{
    ClipMode, ElevationRaster, ElevationSource, RasterRequest, RawElevationSample, LONGLAT_WGS84,
};
pub use tile::DemTile;

/// Result type for DEM operations.
pub type Result<T> = std::result::Result<T, DemError>;
