//! AWS Terrain Tiles elevation source.
//!
//! Fetches 512x512 GeoTIFF elevation tiles from the AWS Open Data S3 bucket,
//! mosaics every tile touching the request, and clips the mosaic to the
//! request box. Tiles live in memory for the duration of one request only.
//!
//! Source: https://s3.amazonaws.com/elevation-tiles-prod/geotiff/{z}/{x}/{y}.tif
//!
//! ## Tile Coordinate System
//!
//! Uses the OpenStreetMap Slippy Map tile naming convention:
//! - `z` is the zoom level (1-14, default 14)
//! - `x` is the column (0 to 2^z - 1, from west to east)
//! - `y` is the row (0 to 2^z - 1, from north to south)
//!
//! At zoom level 14:
//! - 16384 x 16384 tiles globally
//! - Each tile covers ~0.022° of longitude (about 2.4 km at equator)
//! - Resolution is approximately 4.8m per pixel
//!
//! Rows of the mosaic are evenly spaced in Web Mercator, not in latitude; each
//! row reports the latitude of its pixel centers.

use crate::source::{ClipMode, ElevationRaster, ElevationSource, RasterRequest, LONGLAT_WGS84};
use crate::tile::DemTile;
use crate::{DemError, GeoBoundingBox, Result};
use rayon::prelude::*;
use std::f64::consts::PI;
use std::ops::Range;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;
use tracing::{debug, info};

/// AWS S3 base URL for elevation tiles.
pub const AWS_TILE_BASE_URL: &str = "https://s3.amazonaws.com/elevation-tiles-prod/geotiff";

/// Minimum valid zoom level.
pub const MIN_ZOOM: u8 = 1;

/// Maximum valid zoom level for AWS elevation tiles.
pub const MAX_ZOOM: u8 = 14;

/// Detail level used for every grid: full resolution regardless of radius.
pub const DEFAULT_ZOOM: u8 = 14;

/// Default per-request HTTP timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Largest latitude representable in Web Mercator.
const MAX_MERCATOR_LAT: f64 = 85.0511;

/// Check a zoom level against the range the tile set provides.
pub fn validate_zoom(zoom: u8) -> Result<u8> {
    if (MIN_ZOOM..=MAX_ZOOM).contains(&zoom) {
        Ok(zoom)
    } else {
        Err(DemError::InvalidZoomLevel(zoom))
    }
}

/// OSM-style tile coordinates (z, x, y).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileCoord {
    /// Zoom level (1-14).
    pub z: u8,
    /// X coordinate (column, 0 at 180°W, increases eastward).
    pub x: u32,
    /// Y coordinate (row, 0 at ~85.05°N, increases southward).
    pub y: u32,
}

impl TileCoord {
    /// Create a new tile coordinate.
    ///
    /// # Panics
    /// Panics if coordinates are out of range for the zoom level.
    pub fn new(z: u8, x: u32, y: u32) -> Self {
        let max_coord = 1u32 << z;
        assert!(x < max_coord, "x={} out of range for zoom {}", x, z);
        assert!(y < max_coord, "y={} out of range for zoom {}", y, z);
        Self { z, x, y }
    }

    /// Convert latitude/longitude to tile coordinates.
    ///
    /// Uses the OpenStreetMap Slippy Map tiling formula:
    /// - x = floor((lon + 180) / 360 * 2^z)
    /// - y = floor((1 - ln(tan(lat) + sec(lat)) / π) / 2 * 2^z)
    pub fn from_lat_lon(lat: f64, lon: f64, z: u8) -> Result<Self> {
        let z = validate_zoom(z)?;

        // The exact limit is ±85.0511287798° (arctan(sinh(π)))
        let lat_clamped = lat.clamp(-MAX_MERCATOR_LAT, MAX_MERCATOR_LAT);
        let lon_clamped = lon.clamp(-180.0, 180.0);

        let n = (1u32 << z) as f64;

        let x = ((lon_clamped + 180.0) / 360.0 * n).floor() as u32;

        let lat_rad = lat_clamped.to_radians();
        let y = ((1.0 - (lat_rad.tan() + 1.0 / lat_rad.cos()).ln() / PI) / 2.0 * n).floor() as u32;

        // Clamp to valid range (handles edge cases at exactly ±180°)
        let max_coord = (1u32 << z) - 1;
        let x = x.min(max_coord);
        let y = y.min(max_coord);

        Ok(Self { z, x, y })
    }

    /// Get the bounding box for this tile.
    ///
    /// Returns (min_lat, max_lat, min_lon, max_lon).
    pub fn bounds(&self) -> (f64, f64, f64, f64) {
        let n = (1u32 << self.z) as f64;

        let min_lon = self.x as f64 / n * 360.0 - 180.0;
        let max_lon = (self.x + 1) as f64 / n * 360.0 - 180.0;

        // Inverse of the Slippy Map formula
        let max_lat = mercator_row_to_lat(self.y as f64 / n);
        let min_lat = mercator_row_to_lat((self.y + 1) as f64 / n);

        (min_lat, max_lat, min_lon, max_lon)
    }

    /// Longitude of the center of pixel column `col` in a tile `width` pixels wide.
    pub fn pixel_lon(&self, col: u32, width: u32) -> f64 {
        let n = (1u32 << self.z) as f64;
        let global = self.x as f64 + (col as f64 + 0.5) / width as f64;
        global / n * 360.0 - 180.0
    }

    /// Latitude of the center of pixel row `row` in a tile `height` pixels tall.
    pub fn pixel_lat(&self, row: u32, height: u32) -> f64 {
        let n = (1u32 << self.z) as f64;
        let global = self.y as f64 + (row as f64 + 0.5) / height as f64;
        mercator_row_to_lat(global / n)
    }

    /// Get the tile URL under a base URL.
    pub fn url(&self, base_url: &str) -> String {
        format!("{}/{}/{}/{}.tif", base_url.trim_end_matches('/'), self.z, self.x, self.y)
    }

    /// Get the AWS S3 URL for this tile.
    pub fn aws_url(&self) -> String {
        self.url(AWS_TILE_BASE_URL)
    }
}

/// Latitude for a fractional Web Mercator row (0 = north edge, 1 = south edge).
fn mercator_row_to_lat(t: f64) -> f64 {
    (PI * (1.0 - 2.0 * t)).sinh().atan().to_degrees()
}

/// Rectangular block of tiles at one zoom level.
///
/// Only [`TileSpan::covering`] builds spans, so `x_min <= x_max` and
/// `y_min <= y_max` always hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileSpan {
    z: u8,
    x_min: u32,
    x_max: u32,
    y_min: u32,
    y_max: u32,
}

impl TileSpan {
    /// Tiles touching every corner of `bounds`.
    pub fn covering(bounds: &GeoBoundingBox, z: u8) -> Result<Self> {
        let tl = TileCoord::from_lat_lon(bounds.max_lat, bounds.min_lon, z)?;
        let br = TileCoord::from_lat_lon(bounds.min_lat, bounds.max_lon, z)?;

        Ok(Self {
            z: tl.z,
            x_min: tl.x.min(br.x),
            x_max: tl.x.max(br.x),
            y_min: tl.y.min(br.y),
            y_max: tl.y.max(br.y),
        })
    }

    /// Zoom level of every tile in the span.
    pub fn zoom(&self) -> u8 {
        self.z
    }

    /// Number of tile columns.
    pub fn columns(&self) -> u32 {
        self.x_max - self.x_min + 1
    }

    /// Number of tile rows.
    pub fn rows(&self) -> u32 {
        self.y_max - self.y_min + 1
    }

    /// Total tile count.
    pub fn len(&self) -> usize {
        self.columns() as usize * self.rows() as usize
    }

    /// A span always holds at least one tile.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Tile coordinates row by row, north to south, west to east.
    pub fn coords(&self) -> impl Iterator<Item = TileCoord> + '_ {
        (self.y_min..=self.y_max)
            .flat_map(move |y| (self.x_min..=self.x_max).map(move |x| TileCoord::new(self.z, x, y)))
    }
}

/// Stitch the tiles of a span into one raster.
///
/// `tiles` must be in [`TileSpan::coords`] order and share one pixel size.
/// With `clip`, only rows and columns whose pixel centers lie inside the box
/// are copied; without it every pixel of every tile is kept.
pub fn mosaic_tiles(
    span: &TileSpan,
    tiles: &[DemTile],
    clip: Option<&GeoBoundingBox>,
) -> Result<ElevationRaster> {
    if tiles.len() != span.len() {
        return Err(DemError::InvalidRaster(format!(
            "{} tiles for a span of {}",
            tiles.len(),
            span.len()
        )));
    }
    let Some(first) = tiles.first() else {
        return Ok(ElevationRaster::empty());
    };

    let (tile_w, tile_h) = first.dimensions();
    if let Some(odd) = tiles.iter().find(|t| t.dimensions() != (tile_w, tile_h)) {
        let (w, h) = odd.dimensions();
        return Err(DemError::InvalidGeoTiff(format!(
            "tile size {}x{} does not match {}x{}",
            w, h, tile_w, tile_h
        )));
    }

    // Coordinates are cheap; pixel values are only copied inside the window
    let row_coords: Vec<f64> = (0..span.rows())
        .flat_map(|tile_row| {
            let coord = TileCoord::new(span.z, span.x_min, span.y_min + tile_row);
            (0..tile_h).map(move |y| coord.pixel_lat(y, tile_h))
        })
        .collect();
    let col_coords: Vec<f64> = (0..span.columns())
        .flat_map(|tile_col| {
            let coord = TileCoord::new(span.z, span.x_min + tile_col, span.y_min);
            (0..tile_w).map(move |x| coord.pixel_lon(x, tile_w))
        })
        .collect();

    let (rows, cols) = match clip {
        Some(bounds) => (
            window(&row_coords, bounds.min_lat, bounds.max_lat),
            window(&col_coords, bounds.min_lon, bounds.max_lon),
        ),
        None => (0..row_coords.len(), 0..col_coords.len()),
    };
    if rows.is_empty() || cols.is_empty() {
        return Ok(ElevationRaster::empty());
    }

    let columns = span.columns() as usize;
    let (tile_w, tile_h) = (tile_w as usize, tile_h as usize);
    let first_tile_col = cols.start / tile_w;
    let last_tile_col = (cols.end - 1) / tile_w;

    let mut values = Vec::with_capacity(rows.len() * cols.len());
    for r in rows.clone() {
        let row_tiles = &tiles[(r / tile_h) * columns..(r / tile_h + 1) * columns];
        let y = (r % tile_h) as u32;
        for tile_col in first_tile_col..=last_tile_col {
            let offset = tile_col * tile_w;
            let from = cols.start.max(offset) - offset;
            let to = cols.end.min(offset + tile_w) - offset;
            // Dimensions were checked above, so every row exists
            if let Some(row) = row_tiles[tile_col].row(y) {
                values.extend_from_slice(&row[from..to]);
            }
        }
    }

    ElevationRaster::new(
        cols.len(),
        rows.len(),
        values,
        row_coords[rows].to_vec(),
        col_coords[cols].to_vec(),
        first.no_data_value(),
    )
}

/// Index range of the monotonic `coords` that fall within `[min, max]`.
fn window(coords: &[f64], min: f64, max: f64) -> Range<usize> {
    let inside = |v: f64| v >= min && v <= max;
    match coords.iter().position(|&v| inside(v)) {
        Some(start) => {
            let len = coords[start..].iter().take_while(|&&v| inside(v)).count();
            start..start + len
        }
        None => 0..0,
    }
}

/// Callback for tile download progress.
pub type DownloadCallback = Box<dyn Fn(&str) + Send + Sync>;

/// Download statistics for the source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DownloadStats {
    /// Number of tiles downloaded this session.
    pub tiles_downloaded: usize,
    /// Total bytes downloaded this session.
    pub bytes_downloaded: u64,
}

/// Elevation source backed by AWS terrain tiles.
///
/// Tiles for one request are downloaded in parallel and dropped once the
/// raster is assembled; nothing is cached between requests.
pub struct AwsTerrainSource {
    /// Base URL tiles are fetched from.
    base_url: String,
    /// HTTP client for downloading tiles.
    client: reqwest::blocking::Client,
    /// Optional progress sink used for verbose requests.
    callback: Option<DownloadCallback>,
    /// Number of tiles downloaded this session (atomic for thread safety).
    tiles_downloaded: AtomicUsize,
    /// Total bytes downloaded this session (atomic for thread safety).
    bytes_downloaded: AtomicU64,
}

impl std::fmt::Debug for AwsTerrainSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AwsTerrainSource")
            .field("base_url", &self.base_url)
            .field("callback", &self.callback.as_ref().map(|_| "<callback>"))
            .finish()
    }
}

impl AwsTerrainSource {
    /// Create a source for the public AWS bucket with the default timeout.
    pub fn new() -> Result<Self> {
        Self::with_options(AWS_TILE_BASE_URL, DEFAULT_TIMEOUT)
    }

    /// Create a source with a custom base URL and per-request timeout.
    pub fn with_options(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;

        Ok(Self {
            base_url: base_url.into(),
            client,
            callback: None,
            tiles_downloaded: AtomicUsize::new(0),
            bytes_downloaded: AtomicU64::new(0),
        })
    }

    /// Attach a progress callback, invoked for verbose requests.
    pub fn with_callback(mut self, callback: DownloadCallback) -> Self {
        self.callback = Some(callback);
        self
    }

    /// Get download statistics for this session.
    pub fn download_stats(&self) -> DownloadStats {
        DownloadStats {
            tiles_downloaded: self.tiles_downloaded.load(Ordering::Relaxed),
            bytes_downloaded: self.bytes_downloaded.load(Ordering::Relaxed),
        }
    }

    fn notify(&self, verbose: bool, message: &str) {
        if !verbose {
            return;
        }
        info!("{}", message);
        if let Some(cb) = &self.callback {
            cb(message);
        }
    }

    /// Download and decode one tile.
    pub fn download_tile(&self, coord: &TileCoord) -> Result<DemTile> {
        let url = coord.url(&self.base_url);
        debug!("Fetching tile {}", url);

        let response = self.client.get(&url).send()?;

        if !response.status().is_success() {
            return Err(DemError::TileDownloadFailed {
                z: coord.z,
                x: coord.x,
                y: coord.y,
                reason: format!("HTTP {}", response.status()),
            });
        }

        let bytes = response.bytes()?;

        self.tiles_downloaded.fetch_add(1, Ordering::Relaxed);
        self.bytes_downloaded.fetch_add(bytes.len() as u64, Ordering::Relaxed);

        DemTile::from_bytes(&bytes)
    }
}

impl ElevationSource for AwsTerrainSource {
    fn fetch_raster(&self, request: &RasterRequest) -> Result<ElevationRaster> {
        if request.crs != LONGLAT_WGS84 {
            return Err(DemError::UnsupportedCrs(request.crs.clone()));
        }

        let bounds = request.bounds();
        let span = TileSpan::covering(&bounds, request.zoom)?;
        self.notify(
            request.verbose,
            &format!("Fetching {} tiles at z={}...", span.len(), span.zoom()),
        );

        let coords: Vec<TileCoord> = span.coords().collect();
        let tiles = coords
            .par_iter()
            .map(|coord| self.download_tile(coord))
            .collect::<Result<Vec<_>>>()?;

        let stats = self.download_stats();
        self.notify(
            request.verbose,
            &format!(
                "Downloaded {} tiles ({} bytes this session)",
                tiles.len(),
                stats.bytes_downloaded
            ),
        );

        let clip = match request.clip {
            ClipMode::BoundingBox => Some(&bounds),
            ClipMode::Tile => None,
        };
        let raster = mosaic_tiles(&span, &tiles, clip)?;

        let (width, height) = raster.dimensions();
        debug!("Raster for {:?}: {}x{} samples", bounds, width, height);
        Ok(raster)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute_bounds;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_tile_coord_from_lat_lon() {
        let coord = TileCoord::from_lat_lon(47.6062, -122.3321, 14).unwrap();
        assert_eq!(coord.z, 14);
        let (min_lat, max_lat, min_lon, max_lon) = coord.bounds();
        assert!(47.6062 >= min_lat && 47.6062 <= max_lat);
        assert!(-122.3321 >= min_lon && -122.3321 <= max_lon);
    }

    #[test]
    fn test_tile_coord_equator() {
        let coord = TileCoord::from_lat_lon(0.0, 0.0, 12).unwrap();
        // At zoom 12, x=2048 is the tile just east of the prime meridian
        assert_eq!(coord.x, 2048);
        // y=2048 is at the equator
        assert_eq!(coord.y, 2048);
    }

    #[test]
    fn test_tile_coord_roundtrip() {
        let test_points = [
            (47.6062, -122.3321), // Seattle
            (40.7128, -74.0060),  // New York
            (51.5074, -0.1278),   // London
            (-33.8688, 151.2093), // Sydney
            (0.0, 0.0),           // Null Island
        ];

        for (lat, lon) in test_points {
            let coord = TileCoord::from_lat_lon(lat, lon, DEFAULT_ZOOM).unwrap();
            let (min_lat, max_lat, min_lon, max_lon) = coord.bounds();

            assert!(
                lat >= min_lat && lat <= max_lat,
                "lat {} not in [{}, {}] for tile {:?}",
                lat,
                min_lat,
                max_lat,
                coord
            );
            assert!(
                lon >= min_lon && lon <= max_lon,
                "lon {} not in [{}, {}] for tile {:?}",
                lon,
                min_lon,
                max_lon,
                coord
            );
        }
    }

    #[test]
    fn test_pixel_centers_inside_tile() {
        let coord = TileCoord::from_lat_lon(46.85, -121.76, 14).unwrap();
        let (min_lat, max_lat, min_lon, max_lon) = coord.bounds();

        let first_lat = coord.pixel_lat(0, 512);
        let last_lat = coord.pixel_lat(511, 512);
        assert!(first_lat < max_lat && first_lat > last_lat && last_lat > min_lat);

        let first_lon = coord.pixel_lon(0, 512);
        let last_lon = coord.pixel_lon(511, 512);
        assert!(first_lon > min_lon && first_lon < last_lon && last_lon < max_lon);
    }

    #[test]
    fn test_tile_url() {
        let coord = TileCoord::new(12, 655, 1407);
        assert_eq!(
            coord.aws_url(),
            "https://s3.amazonaws.com/elevation-tiles-prod/geotiff/12/655/1407.tif"
        );
        assert_eq!(
            coord.url("http://localhost:8080/tiles/"),
            "http://localhost:8080/tiles/12/655/1407.tif"
        );
    }

    #[test]
    fn test_invalid_zoom() {
        assert!(TileCoord::from_lat_lon(0.0, 0.0, 0).is_err());
        assert!(TileCoord::from_lat_lon(0.0, 0.0, 15).is_err());
        assert_eq!(validate_zoom(14).unwrap(), 14);
    }

    #[test]
    fn test_span_covers_corners() {
        let bounds = compute_bounds(46.85, -121.76, 3.0);
        let span = TileSpan::covering(&bounds, 14).unwrap();
        assert!(span.len() > 1);

        for (lon, lat) in bounds.corners() {
            let coord = TileCoord::from_lat_lon(lat, lon, 14).unwrap();
            assert!(coord.x >= span.x_min && coord.x <= span.x_max);
            assert!(coord.y >= span.y_min && coord.y <= span.y_max);
        }

        let coords: Vec<TileCoord> = span.coords().collect();
        assert_eq!(coords.len(), span.len());
        assert_eq!(coords[0], TileCoord::new(14, span.x_min, span.y_min));
        assert_eq!(
            coords[coords.len() - 1],
            TileCoord::new(14, span.x_max, span.y_max)
        );
    }

    #[test]
    fn test_mosaic_two_by_one() {
        let span = TileSpan {
            z: 10,
            x_min: 100,
            x_max: 101,
            y_min: 200,
            y_max: 200,
        };
        let west = DemTile::new(vec![1.0, 2.0, 3.0, 4.0], 2, 2, None).unwrap();
        let east = DemTile::new(vec![5.0, 6.0, 7.0, 8.0], 2, 2, None).unwrap();

        let raster = mosaic_tiles(&span, &[west, east], None).unwrap();
        assert_eq!(raster.dimensions(), (4, 2));
        assert_eq!(raster.values(), &[1.0, 2.0, 5.0, 6.0, 3.0, 4.0, 7.0, 8.0]);

        let rows = raster.row_coords();
        assert!(rows[0] > rows[1]);
        let cols = raster.col_coords();
        assert!(cols.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_mosaic_clips_while_stitching() {
        let span = TileSpan {
            z: 10,
            x_min: 100,
            x_max: 101,
            y_min: 200,
            y_max: 200,
        };
        let tiles = [
            DemTile::new(vec![1.0, 2.0, 3.0, 4.0], 2, 2, None).unwrap(),
            DemTile::new(vec![5.0, 6.0, 7.0, 8.0], 2, 2, None).unwrap(),
        ];
        let full = mosaic_tiles(&span, &tiles, None).unwrap();
        let lons = full.col_coords();
        let lats = full.row_coords();

        // Middle two columns across the tile seam, both rows
        let bounds = GeoBoundingBox {
            max_lat: lats[0] + 0.01,
            min_lat: lats[1] - 0.01,
            max_lon: (lons[2] + lons[3]) / 2.0,
            min_lon: (lons[0] + lons[1]) / 2.0,
        };
        let clipped = mosaic_tiles(&span, &tiles, Some(&bounds)).unwrap();
        assert_eq!(clipped.dimensions(), (2, 2));
        assert_eq!(clipped.values(), &[2.0, 5.0, 4.0, 7.0]);
        assert_eq!(clipped.col_coords(), &lons[1..3]);
        assert_eq!(clipped.row_coords(), lats);

        // Only the southern row
        let south = GeoBoundingBox {
            max_lat: (lats[0] + lats[1]) / 2.0,
            ..bounds
        };
        let clipped = mosaic_tiles(&span, &tiles, Some(&south)).unwrap();
        assert_eq!(clipped.values(), &[4.0, 7.0]);
        assert_eq!(clipped.row_coords(), &lats[1..]);
    }

    #[test]
    fn test_mosaic_clip_outside_is_empty() {
        let span = TileSpan {
            z: 10,
            x_min: 100,
            x_max: 100,
            y_min: 200,
            y_max: 200,
        };
        let tile = DemTile::new(vec![1.0; 4], 2, 2, Some(-9999.0)).unwrap();
        let raster = mosaic_tiles(&span, &[tile], Some(&compute_bounds(0.0, 0.0, 1.0))).unwrap();
        assert!(raster.is_empty());
        assert_eq!(raster.dimensions(), (0, 0));
    }

    #[test]
    fn test_window_selects_contiguous_range() {
        assert_eq!(window(&[0.5, 1.5, 2.5, 3.5], 1.0, 3.0), 1..3);
        assert_eq!(window(&[2.5, 1.5, 0.5], 0.0, 2.0), 1..3);
        assert_eq!(window(&[2.5, 1.5, 0.5], 5.0, 6.0), 0..0);
    }

    #[test]
    fn test_span_from_inverted_box_is_ordered() {
        let bounds = compute_bounds(46.85, -121.76, 3.0);
        let inverted = GeoBoundingBox {
            max_lat: bounds.min_lat,
            min_lat: bounds.max_lat,
            max_lon: bounds.min_lon,
            min_lon: bounds.max_lon,
        };

        let span = TileSpan::covering(&inverted, 14).unwrap();
        assert_eq!(span, TileSpan::covering(&bounds, 14).unwrap());
        assert!(span.x_min <= span.x_max && span.y_min <= span.y_max);
        assert_eq!(span.len(), span.coords().count());
    }

    #[test]
    fn test_mosaic_rejects_mixed_sizes() {
        let span = TileSpan {
            z: 10,
            x_min: 100,
            x_max: 101,
            y_min: 200,
            y_max: 200,
        };
        let a = DemTile::new(vec![0.0; 4], 2, 2, None).unwrap();
        let b = DemTile::new(vec![0.0; 9], 3, 3, None).unwrap();
        assert!(matches!(
            mosaic_tiles(&span, &[a, b], None),
            Err(DemError::InvalidGeoTiff(_))
        ));
    }

    #[test]
    fn test_unsupported_crs() {
        let source = AwsTerrainSource::with_options("http://127.0.0.1:9", Duration::from_secs(1))
            .unwrap();
        let mut request = RasterRequest::for_bounds(&compute_bounds(0.0, 0.0, 1.0), 14);
        request.crs = "EPSG:3857".to_string();

        assert!(matches!(
            source.fetch_raster(&request),
            Err(DemError::UnsupportedCrs(crs)) if crs == "EPSG:3857"
        ));
        assert_eq!(source.download_stats(), DownloadStats::default());
    }

    fn recording_source() -> (AwsTerrainSource, Arc<Mutex<Vec<String>>>) {
        let messages = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&messages);
        // Nothing listens on the discard port, so every download fails fast
        let source = AwsTerrainSource::with_options("http://127.0.0.1:9", Duration::from_secs(1))
            .unwrap()
            .with_callback(Box::new(move |msg: &str| {
                sink.lock().unwrap().push(msg.to_string());
            }));
        (source, messages)
    }

    #[test]
    fn test_verbose_reports_before_download_error() {
        let (source, messages) = recording_source();
        let request =
            RasterRequest::for_bounds(&compute_bounds(10.0, 10.0, 0.0), 14).with_verbose(true);

        assert!(source.fetch_raster(&request).is_err());

        let messages = messages.lock().unwrap();
        assert_eq!(messages.as_slice(), &["Fetching 1 tiles at z=14...".to_string()]);
        assert_eq!(source.download_stats().tiles_downloaded, 0);
    }

    #[test]
    fn test_quiet_request_skips_callback() {
        let (source, messages) = recording_source();
        let request = RasterRequest::for_bounds(&compute_bounds(10.0, 10.0, 0.0), 14);

        assert!(source.fetch_raster(&request).is_err());
        assert!(messages.lock().unwrap().is_empty());
    }
}
