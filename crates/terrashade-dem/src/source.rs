//! Elevation retrieval interface.
//!
//! An [`ElevationSource`] turns a [`RasterRequest`] into an
//! [`ElevationRaster`]: a row-major block of samples plus the y coordinate of
//! every row and the x coordinate of every column.

use crate::{DemError, GeoBoundingBox, Result};

/// Long/lat on the WGS84 datum, the only projection the grid builder asks for.
pub const LONGLAT_WGS84: &str = "+proj=longlat +datum=WGS84 +no_defs";

/// How a source should trim its native raster to the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClipMode {
    /// Keep only samples whose centers fall inside the request box.
    #[default]
    BoundingBox,
    /// Return every sample of every tile touched by the request.
    Tile,
}

/// A request for elevation samples over a region.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterRequest {
    /// Corner points as `(x, y)` pairs in the request projection.
    pub corners: [(f64, f64); 4],
    /// Coordinate reference system of the corners and of the result.
    pub crs: String,
    /// Detail level (slippy map zoom).
    pub zoom: u8,
    /// Clipping applied to the result.
    pub clip: ClipMode,
    /// Emit progress messages while fetching.
    pub verbose: bool,
}

impl RasterRequest {
    /// Build a long/lat request for a bounding box, clipped to the box.
    pub fn for_bounds(bounds: &GeoBoundingBox, zoom: u8) -> Self {
        Self {
            corners: bounds.corners(),
            crs: LONGLAT_WGS84.to_string(),
            zoom,
            clip: ClipMode::BoundingBox,
            verbose: false,
        }
    }

    /// Enable or disable progress messages.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Box enclosing the request corners.
    pub fn bounds(&self) -> GeoBoundingBox {
        GeoBoundingBox::from_corners(&self.corners)
    }
}

/// One raster cell: position of its center and its elevation.
///
/// Cells holding the raster's no-data value carry `NaN`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawElevationSample {
    /// Column coordinate (longitude).
    pub x: f64,
    /// Row coordinate (latitude).
    pub y: f64,
    /// Elevation in meters.
    pub elevation: f64,
}

/// Elevation samples on a rectangular lattice.
#[derive(Debug, Clone, PartialEq)]
pub struct ElevationRaster {
    width: usize,
    height: usize,
    /// Row-major, north to south, west to east.
    values: Vec<f32>,
    row_coords: Vec<f64>,
    col_coords: Vec<f64>,
    no_data_value: Option<f32>,
}

impl ElevationRaster {
    /// Create a raster, checking that every buffer matches the dimensions.
    pub fn new(
        width: usize,
        height: usize,
        values: Vec<f32>,
        row_coords: Vec<f64>,
        col_coords: Vec<f64>,
        no_data_value: Option<f32>,
    ) -> Result<Self> {
        if values.len() != width * height {
            return Err(DemError::InvalidRaster(format!(
                "{} values for a {}x{} raster",
                values.len(),
                width,
                height
            )));
        }
        if row_coords.len() != height || col_coords.len() != width {
            return Err(DemError::InvalidRaster(format!(
                "{} row / {} column coordinates for a {}x{} raster",
                row_coords.len(),
                col_coords.len(),
                width,
                height
            )));
        }

        Ok(Self {
            width,
            height,
            values,
            row_coords,
            col_coords,
            no_data_value,
        })
    }

    /// A raster with no cells.
    pub fn empty() -> Self {
        Self {
            width: 0,
            height: 0,
            values: Vec::new(),
            row_coords: Vec::new(),
            col_coords: Vec::new(),
            no_data_value: None,
        }
    }

    /// Width and height in cells.
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Whether the raster holds no cells at all.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Raw cell values, row-major.
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Y coordinate of every row, top to bottom.
    pub fn row_coords(&self) -> &[f64] {
        &self.row_coords
    }

    /// X coordinate of every column, left to right.
    pub fn col_coords(&self) -> &[f64] {
        &self.col_coords
    }

    /// The no-data marker, if the source has one.
    pub fn no_data_value(&self) -> Option<f32> {
        self.no_data_value
    }

    /// Whether a raw value is the no-data marker (or not a number).
    pub fn is_no_data(&self, value: f32) -> bool {
        if value.is_nan() {
            return true;
        }
        match self.no_data_value {
            Some(nodata) => (value - nodata).abs() < 0.001,
            None => false,
        }
    }
}

/// Something that can retrieve elevation rasters.
pub trait ElevationSource {
    /// Fetch the samples covering `request`.
    fn fetch_raster(&self, request: &RasterRequest) -> Result<ElevationRaster>;
}

impl<S: ElevationSource + ?Sized> ElevationSource for &S {
    fn fetch_raster(&self, request: &RasterRequest) -> Result<ElevationRaster> {
        (**self).fetch_raster(request)
    }
}

impl<S: ElevationSource + ?Sized> ElevationSource for Box<S> {
    fn fetch_raster(&self, request: &RasterRequest) -> Result<ElevationRaster> {
        (**self).fetch_raster(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute_bounds;

    fn ramp_raster() -> ElevationRaster {
        // 4 columns at lon 0.5..3.5, 3 rows at lat 2.5, 1.5, 0.5
        ElevationRaster::new(
            4,
            3,
            (0..12).map(|v| v as f32).collect(),
            vec![2.5, 1.5, 0.5],
            vec![0.5, 1.5, 2.5, 3.5],
            Some(-9999.0),
        )
        .unwrap()
    }

    #[test]
    fn test_new_rejects_mismatched_buffers() {
        assert!(matches!(
            ElevationRaster::new(2, 2, vec![0.0; 3], vec![0.0; 2], vec![0.0; 2], None),
            Err(DemError::InvalidRaster(_))
        ));
        assert!(matches!(
            ElevationRaster::new(2, 2, vec![0.0; 4], vec![0.0; 3], vec![0.0; 2], None),
            Err(DemError::InvalidRaster(_))
        ));
    }

    #[test]
    fn test_no_data_detection() {
        let raster = ramp_raster();
        assert!(raster.is_no_data(-9999.0));
        assert!(raster.is_no_data(f32::NAN));
        assert!(!raster.is_no_data(0.0));
    }

    #[test]
    fn test_request_for_bounds() {
        let bounds = compute_bounds(46.85, -121.76, 2.0);
        let request = RasterRequest::for_bounds(&bounds, 14).with_verbose(true);
        assert_eq!(request.crs, LONGLAT_WGS84);
        assert_eq!(request.zoom, 14);
        assert_eq!(request.clip, ClipMode::BoundingBox);
        assert!(request.verbose);
        assert_eq!(request.bounds(), bounds);
    }
}
