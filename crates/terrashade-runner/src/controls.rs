//! Parsers for the three user controls: latitude, longitude and radius.
//!
//! These return `String` errors so they can be used directly as clap
//! `value_parser`s and by the interactive prompt.

/// Smallest radius the controls accept, in miles.
pub const MIN_RADIUS_MILES: f64 = 0.1;
/// Largest radius the controls accept, in miles.
pub const MAX_RADIUS_MILES: f64 = 10.0;
/// Initial radius offered by the controls.
pub const DEFAULT_RADIUS_MILES: f64 = 0.5;

fn parse_in_range(name: &str, s: &str, min: f64, max: f64) -> Result<f64, String> {
    let value: f64 = s
        .trim()
        .parse()
        .map_err(|_| format!("{} must be a number, got '{}'", name, s.trim()))?;
    if !value.is_finite() || value < min || value > max {
        return Err(format!("{} {} out of range [{}, {}]", name, value, min, max));
    }
    Ok(value)
}

/// Latitude in decimal degrees, [-90, 90].
pub fn parse_latitude(s: &str) -> Result<f64, String> {
    parse_in_range("latitude", s, -90.0, 90.0)
}

/// Longitude in decimal degrees, [-180, 180].
pub fn parse_longitude(s: &str) -> Result<f64, String> {
    parse_in_range("longitude", s, -180.0, 180.0)
}

/// Radius in miles, clamped to [0.1, 10]. Non-numbers are rejected.
pub fn parse_radius(s: &str) -> Result<f64, String> {
    let value = parse_in_range("radius", s, f64::MIN, f64::MAX)?;
    Ok(value.clamp(MIN_RADIUS_MILES, MAX_RADIUS_MILES))
}
