//! Bounding box to elevation grid: acquire, flatten, reshape.

use crate::aws_tiles::{validate_zoom, DEFAULT_ZOOM};
use crate::grid::{flatten, reshape_column_major, ElevationGrid};
use crate::source::{ElevationSource, RasterRequest};
use crate::{DemError, GeoBoundingBox, Result};
use tracing::{debug, info};

/// Builds dense elevation grids from an [`ElevationSource`].
///
/// Every request uses the long/lat WGS84 projection, a bounding-box clip and
/// the same detail level, whatever the size of the box.
#[derive(Debug)]
pub struct ElevationGridBuilder<S> {
    source: S,
    zoom: u8,
    verbose: bool,
}

impl<S: ElevationSource> ElevationGridBuilder<S> {
    /// Create a builder at the default detail level (z=14).
    pub fn new(source: S) -> Self {
        Self {
            source,
            zoom: DEFAULT_ZOOM,
            verbose: false,
        }
    }

    /// Use a different fixed detail level.
    pub fn with_zoom(mut self, zoom: u8) -> Result<Self> {
        self.zoom = validate_zoom(zoom)?;
        Ok(self)
    }

    /// Ask the source for progress messages.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Detail level passed to the source.
    pub fn zoom(&self) -> u8 {
        self.zoom
    }

    /// The underlying elevation source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Fetch samples for `bounds` and reshape them into a grid.
    ///
    /// The grid is dense: every `(row, col)` holds a value. A cell whose
    /// source sample was the raster's no-data value holds `NaN`.
    ///
    /// # Errors
    /// - retrieval errors from the source are passed through untouched
    /// - [`DemError::NoData`] when no samples, or only no-data samples, come back
    /// - [`DemError::ShapeMismatch`] when samples do not split evenly into rows
    pub fn build_grid(&self, bounds: &GeoBoundingBox) -> Result<ElevationGrid> {
        let request = RasterRequest::for_bounds(bounds, self.zoom).with_verbose(self.verbose);
        let raster = self.source.fetch_raster(&request)?;

        if flatten(&raster).all(|s| s.elevation.is_nan()) {
            debug!(
                "No usable samples among {} for {:?}",
                raster.values().len(),
                bounds
            );
            return Err(DemError::NoData);
        }

        let grid = reshape_column_major(flatten(&raster))?;
        info!(
            "Built {}x{} elevation grid ({} missing cells)",
            grid.rows(),
            grid.cols(),
            grid.missing_count()
        );
        Ok(grid)
    }
}
