//! Renderer interface and the PNG-writing sphere-shade renderer.

use crate::shade::{sphere_shade, ShadeParams};
use crate::{RenderError, Result};
use image::ImageFormat;
use std::fs;
use std::path::{Path, PathBuf};
use terrashade_dem::ElevationGrid;
use tracing::info;

/// File name of the image written by default.
pub const DEFAULT_OUTPUT_FILE: &str = "terrashade.png";

/// Well-known output location: the system temp directory.
pub fn default_output_path() -> PathBuf {
    std::env::temp_dir().join(DEFAULT_OUTPUT_FILE)
}

/// An image written by a renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedImage {
    /// Where the image was written.
    pub path: PathBuf,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

/// Something that turns an elevation grid into an image.
pub trait Renderer {
    /// Shade `grid` with `params` and write the result.
    fn render(&self, grid: &ElevationGrid, params: &ShadeParams) -> Result<RenderedImage>;
}

impl<R: Renderer + ?Sized> Renderer for &R {
    fn render(&self, grid: &ElevationGrid, params: &ShadeParams) -> Result<RenderedImage> {
        (**self).render(grid, params)
    }
}

/// Writes sphere-shaded PNGs to a fixed path; each render overwrites the last.
#[derive(Debug, Clone)]
pub struct SphereShadeRenderer {
    output_path: PathBuf,
}

impl Default for SphereShadeRenderer {
    fn default() -> Self {
        Self::new(default_output_path())
    }
}

impl SphereShadeRenderer {
    /// Create a renderer writing to `output_path`.
    pub fn new<P: AsRef<Path>>(output_path: P) -> Self {
        Self {
            output_path: output_path.as_ref().to_path_buf(),
        }
    }

    /// Where images are written.
    pub fn output_path(&self) -> &Path {
        &self.output_path
    }
}

impl Renderer for SphereShadeRenderer {
    fn render(&self, grid: &ElevationGrid, params: &ShadeParams) -> Result<RenderedImage> {
        if grid.is_empty() {
            return Err(RenderError::EmptyGrid);
        }
        let (rows, cols) = grid.shape();
        let too_large = || RenderError::GridTooLarge { rows, cols };
        let width = u32::try_from(cols).map_err(|_| too_large())?;
        let height = u32::try_from(rows).map_err(|_| too_large())?;

        let img = sphere_shade(grid, params);

        if let Some(parent) = self.output_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        img.save_with_format(&self.output_path, ImageFormat::Png)?;

        info!(
            "Rendered {}x{} image with texture {} (sun {:.0}°) to {}",
            width,
            height,
            params.texture,
            params.sun_angle,
            self.output_path.display()
        );

        Ok(RenderedImage {
            path: self.output_path.clone(),
            width,
            height,
        })
    }
}
