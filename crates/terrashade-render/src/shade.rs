//! Sphere-mapped palette shading.
//!
//! Each cell's surface normal is rotated so that the sun sits "up", then the
//! normal picks a color off the texture palette as if it were a point on a
//! lit sphere: tilted toward the sun is `highlight`, away is `shadow`, across
//! is `left`/`right`, and flat is `center`.

use crate::texture::{Palette, Texture};
use image::{Rgb, Rgba, RgbaImage};
use terrashade_dem::ElevationGrid;

/// Default sun azimuth in degrees clockwise from north (northwest light).
pub const DEFAULT_SUN_ANGLE: f64 = 315.0;

/// Fixed shading parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadeParams {
    /// Palette to paint with.
    pub texture: Texture,
    /// Sun azimuth in degrees clockwise from north.
    pub sun_angle: f64,
}

impl Default for ShadeParams {
    fn default() -> Self {
        Self {
            texture: Texture::Desert,
            sun_angle: DEFAULT_SUN_ANGLE,
        }
    }
}

/// Unit surface normal at a cell as (east, north, up).
///
/// Uses central differences inside the grid and one-sided differences on
/// the edges. Missing neighbours fall back to the cell's own value.
fn surface_normal(grid: &ElevationGrid, row: usize, col: usize) -> (f64, f64, f64) {
    let (rows, cols) = grid.shape();
    let here = grid.get(row, col).unwrap_or(0.0);
    let at = |r: usize, c: usize| match grid.get(r, c) {
        Some(v) if !v.is_nan() => v,
        _ => here,
    };

    let (west, east) = (col.saturating_sub(1), (col + 1).min(cols - 1));
    let (north, south) = (row.saturating_sub(1), (row + 1).min(rows - 1));

    let dz_east = if east > west {
        (at(row, east) - at(row, west)) / (east - west) as f64
    } else {
        0.0
    };
    // Row index grows southward
    let dz_north = if south > north {
        (at(north, col) - at(south, col)) / (south - north) as f64
    } else {
        0.0
    };

    let (nx, ny, nz) = (-dz_east, -dz_north, 1.0);
    let len = (nx * nx + ny * ny + nz * nz).sqrt();
    (nx / len, ny / len, nz / len)
}

fn mix(a: Rgb<u8>, b: Rgb<u8>, t: f64) -> [f64; 3] {
    let t = t.clamp(0.0, 1.0);
    [0, 1, 2].map(|i| a[i] as f64 + (b[i] as f64 - a[i] as f64) * t)
}

fn blend(a: [f64; 3], b: [f64; 3], t: f64) -> [f64; 3] {
    let t = t.clamp(0.0, 1.0);
    [0, 1, 2].map(|i| a[i] + (b[i] - a[i]) * t)
}

/// Pick the palette color for a normal already expressed relative to the sun.
///
/// `toward` is the horizontal component pointing at the sun, `across` the
/// component to its right, both in [-1, 1].
fn sphere_color(palette: &Palette, toward: f64, across: f64) -> Rgba<u8> {
    let vertical = mix(palette.shadow, palette.highlight, (toward + 1.0) / 2.0);
    let horizontal = mix(palette.left, palette.right, (across + 1.0) / 2.0);

    let (wv, wh) = (toward.abs(), across.abs());
    let tilt = (toward * toward + across * across).sqrt();
    let center = palette.center.0.map(f64::from);
    if tilt < 1e-12 {
        return to_rgba(center);
    }

    let edge = blend(horizontal, vertical, wv / (wv + wh));
    to_rgba(blend(center, edge, tilt))
}

fn to_rgba(c: [f64; 3]) -> Rgba<u8> {
    Rgba([
        c[0].round() as u8,
        c[1].round() as u8,
        c[2].round() as u8,
        255,
    ])
}

/// Shade a grid into an RGBA image, one pixel per cell.
///
/// `NaN` cells become fully transparent pixels. The grid must not be empty.
pub fn sphere_shade(grid: &ElevationGrid, params: &ShadeParams) -> RgbaImage {
    let (rows, cols) = grid.shape();
    let palette = params.texture.palette();
    let (sin, cos) = params.sun_angle.to_radians().sin_cos();

    let mut img = RgbaImage::from_pixel(cols as u32, rows as u32, Rgba([0, 0, 0, 0]));
    for row in 0..rows {
        for col in 0..cols {
            if grid.get(row, col).map_or(true, f64::is_nan) {
                continue;
            }
            let (ne, nn, _) = surface_normal(grid, row, col);
            // Sun direction in (east, north) is (sin, cos)
            let toward = ne * sin + nn * cos;
            let across = ne * cos - nn * sin;
            img.put_pixel(col as u32, row as u32, sphere_color(&palette, toward, across));
        }
    }
    img
}
