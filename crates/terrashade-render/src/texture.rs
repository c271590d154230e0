//! Named shading palettes.

use crate::RenderError;
use image::Rgb;
use std::fmt;
use std::str::FromStr;

/// Five colors a lit sphere is painted with.
///
/// A cell facing the sun takes `highlight`, one facing away takes `shadow`,
/// slopes across the sun direction blend `left` and `right`, and flat ground
/// takes `center`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    /// Slopes facing the sun.
    pub highlight: Rgb<u8>,
    /// Slopes facing away from the sun.
    pub shadow: Rgb<u8>,
    /// Slopes facing left of the sun direction.
    pub left: Rgb<u8>,
    /// Slopes facing right of the sun direction.
    pub right: Rgb<u8>,
    /// Level ground.
    pub center: Rgb<u8>,
}

impl Palette {
    /// Build a palette from `#rrggbb` strings.
    fn from_hex(highlight: &str, shadow: &str, left: &str, right: &str, center: &str) -> Self {
        Self {
            highlight: parse_color(highlight),
            shadow: parse_color(shadow),
            left: parse_color(left),
            right: parse_color(right),
            center: parse_color(center),
        }
    }
}

/// Parse hex color string to RGB
fn parse_color(hex: &str) -> Rgb<u8> {
    let hex = hex.trim_start_matches('#');
    if hex.len() != 6 {
        return Rgb([0, 0, 0]);
    }

    let r = u8::from_str_radix(&hex[0..2], 16).unwrap_or(0);
    let g = u8::from_str_radix(&hex[2..4], 16).unwrap_or(0);
    let b = u8::from_str_radix(&hex[4..6], 16).unwrap_or(0);

    Rgb([r, g, b])
}

/// Built-in shading textures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Texture {
    /// Imhof-style yellow-green.
    Imhof1,
    /// Imhof-style cream with brown shadows and teal side slopes.
    Imhof2,
    /// Imhof-style yellow with red-brown shadows.
    Imhof3,
    /// Imhof-style pale sand with brown shadows and slate side slopes.
    Imhof4,
    /// Sand and brown; the default.
    #[default]
    Desert,
    /// Grayscale.
    Bw,
    /// Saturated primaries, mostly for checking orientation.
    Unicorn,
}

impl Texture {
    /// Every built-in texture.
    pub const ALL: [Texture; 7] = [
        Texture::Imhof1,
        Texture::Imhof2,
        Texture::Imhof3,
        Texture::Imhof4,
        Texture::Desert,
        Texture::Bw,
        Texture::Unicorn,
    ];

    /// Name used in configuration and on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            Texture::Imhof1 => "imhof1",
            Texture::Imhof2 => "imhof2",
            Texture::Imhof3 => "imhof3",
            Texture::Imhof4 => "imhof4",
            Texture::Desert => "desert",
            Texture::Bw => "bw",
            Texture::Unicorn => "unicorn",
        }
    }

    /// Colors for this texture.
    pub fn palette(&self) -> Palette {
        match self {
            Texture::Imhof1 => Palette::from_hex("#fff673", "#55967a", "#8fb28a", "#55967a", "#cfe0a9"),
            Texture::Imhof2 => Palette::from_hex("#f5dfca", "#63372c", "#dfa283", "#195f67", "#c9e3c5"),
            Texture::Imhof3 => Palette::from_hex("#e9e671", "#7f3231", "#cbb387", "#607080", "#7c9695"),
            Texture::Imhof4 => Palette::from_hex("#ffe3b3", "#6a463a", "#caa685", "#4e6b7b", "#bbc9bf"),
            Texture::Desert => Palette::from_hex("#ffe3b3", "#6a463a", "#caa685", "#caa685", "#ffe3b3"),
            Texture::Bw => Palette::from_hex("#ffffff", "#000000", "#bfbfbf", "#404040", "#ffffff"),
            Texture::Unicorn => Palette::from_hex("#ff0000", "#00ff00", "#0000ff", "#ffff00", "#ffffff"),
        }
    }
}

impl fmt::Display for Texture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Texture {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Texture::ALL
            .into_iter()
            .find(|t| t.name() == wanted)
            .ok_or_else(|| RenderError::UnknownTexture(s.to_string()))
    }
}
