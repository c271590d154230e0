//! Single terrain tile decoded from GeoTIFF bytes.

use crate::{DemError, Result};
use std::io::Cursor;
use tiff::decoder::{Decoder, DecodingResult, Limits};
use tiff::tags::Tag;

/// A single elevation tile held in memory.
///
/// AWS terrain tiles are 512 x 512 pixels of 32-bit float elevations in meters.
#[derive(Debug, Clone)]
pub struct DemTile {
    /// Elevation data in row-major order (north to south, west to east).
    data: Vec<f32>,
    /// Width of the tile in pixels.
    width: u32,
    /// Height of the tile in pixels.
    height: u32,
    /// No-data value (elevations equal to this should be treated as missing).
    no_data_value: Option<f32>,
}

impl DemTile {
    /// Create a tile from already-decoded pixels.
    pub fn new(data: Vec<f32>, width: u32, height: u32, no_data_value: Option<f32>) -> Result<Self> {
        if data.len() != width as usize * height as usize {
            return Err(DemError::InvalidGeoTiff(format!(
                "{} pixels for a {}x{} tile",
                data.len(),
                width,
                height
            )));
        }
        Ok(Self {
            data,
            width,
            height,
            no_data_value,
        })
    }

    /// Decode a tile from GeoTIFF bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut decoder = Decoder::new(Cursor::new(bytes))?;

        // 512x512 f32 is 1 MB; leave headroom for larger tile sizes
        let mut limits = Limits::default();
        limits.decoding_buffer_size = 256 * 1024 * 1024;
        limits.intermediate_buffer_size = 256 * 1024 * 1024;
        limits.ifd_value_size = 16 * 1024 * 1024;
        decoder = decoder.with_limits(limits);

        let (width, height) = decoder.dimensions()?;

        let data = Self::decode_elevation_data(&mut decoder)?;

        // GDAL_NODATA tag = 42113
        let no_data_value = Self::read_nodata_value(&mut decoder);

        Self::new(data, width, height, no_data_value)
    }

    /// Decode elevation data from the TIFF decoder.
    fn decode_elevation_data<R: std::io::Read + std::io::Seek>(
        decoder: &mut Decoder<R>,
    ) -> Result<Vec<f32>> {
        let result = decoder.read_image()?;

        match result {
            DecodingResult::F32(data) => Ok(data),
            DecodingResult::F64(data) => Ok(data.into_iter().map(|v| v as f32).collect()),
            DecodingResult::I16(data) => Ok(data.into_iter().map(|v| v as f32).collect()),
            DecodingResult::I32(data) => Ok(data.into_iter().map(|v| v as f32).collect()),
            DecodingResult::U16(data) => Ok(data.into_iter().map(|v| v as f32).collect()),
            DecodingResult::U32(data) => Ok(data.into_iter().map(|v| v as f32).collect()),
            DecodingResult::U8(data) => Ok(data.into_iter().map(|v| v as f32).collect()),
            DecodingResult::I8(data) => Ok(data.into_iter().map(|v| v as f32).collect()),
            DecodingResult::U64(data) => Ok(data.into_iter().map(|v| v as f32).collect()),
            DecodingResult::I64(data) => Ok(data.into_iter().map(|v| v as f32).collect()),
        }
    }

    /// Try to read the no-data value from GDAL_NODATA tag.
    fn read_nodata_value<R: std::io::Read + std::io::Seek>(decoder: &mut Decoder<R>) -> Option<f32> {
        decoder
            .get_tag_ascii_string(Tag::Unknown(42113))
            .ok()
            .and_then(|s| s.trim().trim_end_matches('\0').parse().ok())
    }

    /// One row of pixels, north row first.
    pub fn row(&self, y: u32) -> Option<&[f32]> {
        if y >= self.height {
            return None;
        }
        let start = y as usize * self.width as usize;
        Some(&self.data[start..start + self.width as usize])
    }

    /// The no-data marker, if the file declared one.
    pub fn no_data_value(&self) -> Option<f32> {
        self.no_data_value
    }

    /// Get the dimensions of this tile in pixels.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}
