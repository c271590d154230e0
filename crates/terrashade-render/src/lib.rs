//! # terrashade-render
//!
//! Shades elevation grids into images.
//!
//! [`SphereShadeRenderer`] paints each cell with a color picked from a named
//! [`Texture`] according to where its surface normal points relative to the
//! sun, then writes a PNG to a fixed path.
//!
//! ```no_run
//! use terrashade_dem::ElevationGrid;
//! use terrashade_render::{Renderer, ShadeParams, SphereShadeRenderer};
//!
//! let grid = ElevationGrid::filled(4, 4, 0.0);
//! let image = SphereShadeRenderer::default().render(&grid, &ShadeParams::default())?;
//! println!("Wrote {}", image.path.display());
//! # Ok::<(), terrashade_render::RenderError>(())
//! ```

mod error;
mod renderer;
mod shade;
mod texture;

pub use error::RenderError;
pub use renderer::{default_output_path, RenderedImage, Renderer, SphereShadeRenderer, DEFAULT_OUTPUT_FILE};
pub use shade::{sphere_shade, ShadeParams, DEFAULT_SUN_ANGLE};
pub use texture::{Palette, Texture};

/// Result type for rendering operations.
pub type Result<T> = std::result::Result<T, RenderError>;
