//! Query validation and center/radius to bounding-box conversion.
//!
//! The radius is turned into a degree delta with a flat 69 miles per degree.
//! The same delta is applied to longitude, so boxes away from the equator are
//! narrower on the ground east-west than north-south. This is a known
//! limitation kept for compatibility with existing renders.

use crate::{DemError, Result};

/// Approximate miles per degree of latitude, reused for longitude.
pub const MILES_PER_DEGREE: f64 = 69.0;

/// A validated user query: center point plus radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Query {
    /// Center latitude in degrees.
    pub center_lat: f64,
    /// Center longitude in degrees.
    pub center_lon: f64,
    /// Radius in statute miles.
    pub radius_miles: f64,
}

impl Query {
    /// Validate and build a query.
    ///
    /// Latitude must lie in [-90, 90], longitude in [-180, 180] and the
    /// radius must be finite and non-negative. A zero radius is accepted.
    pub fn new(center_lat: f64, center_lon: f64, radius_miles: f64) -> Result<Self> {
        check_range("latitude", center_lat, -90.0, 90.0)?;
        check_range("longitude", center_lon, -180.0, 180.0)?;
        if !radius_miles.is_finite() || radius_miles < 0.0 {
            return Err(DemError::InvalidRadius(radius_miles));
        }

        Ok(Self {
            center_lat,
            center_lon,
            radius_miles,
        })
    }

    /// Bounding box for this query.
    pub fn bounds(&self) -> GeoBoundingBox {
        compute_bounds(self.center_lat, self.center_lon, self.radius_miles)
    }
}

fn check_range(name: &'static str, value: f64, min: f64, max: f64) -> Result<()> {
    if value.is_finite() && value >= min && value <= max {
        Ok(())
    } else {
        Err(DemError::InvalidCoordinate {
            name,
            value,
            min,
            max,
        })
    }
}

/// A rectangle in latitude/longitude space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoBoundingBox {
    /// Maximum latitude (north edge).
    pub max_lat: f64,
    /// Minimum latitude (south edge).
    pub min_lat: f64,
    /// Maximum longitude (east edge).
    pub max_lon: f64,
    /// Minimum longitude (west edge).
    pub min_lon: f64,
}

impl GeoBoundingBox {
    /// Corner points as `(x, y)` = `(lon, lat)`, in NW, NE, SE, SW order.
    pub fn corners(&self) -> [(f64, f64); 4] {
        [
            (self.min_lon, self.max_lat),
            (self.max_lon, self.max_lat),
            (self.max_lon, self.min_lat),
            (self.min_lon, self.min_lat),
        ]
    }

    /// Smallest box enclosing a set of `(x, y)` corner points.
    pub fn from_corners(corners: &[(f64, f64); 4]) -> Self {
        let mut bounds = GeoBoundingBox {
            max_lat: f64::NEG_INFINITY,
            min_lat: f64::INFINITY,
            max_lon: f64::NEG_INFINITY,
            min_lon: f64::INFINITY,
        };
        for &(x, y) in corners {
            bounds.max_lat = bounds.max_lat.max(y);
            bounds.min_lat = bounds.min_lat.min(y);
            bounds.max_lon = bounds.max_lon.max(x);
            bounds.min_lon = bounds.min_lon.min(x);
        }
        bounds
    }

    /// Latitude extent in degrees.
    pub fn lat_span(&self) -> f64 {
        self.max_lat - self.min_lat
    }

    /// Longitude extent in degrees.
    pub fn lon_span(&self) -> f64 {
        self.max_lon - self.min_lon
    }
}

/// Convert a center point and radius in miles into a bounding box.
///
/// Pure and total: no validation happens here, see [`Query::new`].
pub fn compute_bounds(center_lat: f64, center_lon: f64, radius_miles: f64) -> GeoBoundingBox {
    let delta = radius_miles / MILES_PER_DEGREE;
    GeoBoundingBox {
        max_lat: center_lat + delta,
        min_lat: center_lat - delta,
        max_lon: center_lon + delta,
        min_lon: center_lon - delta,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_bounds_one_degree() {
        let bounds = compute_bounds(0.0, 0.0, 69.0);
        assert_eq!(
            bounds,
            GeoBoundingBox {
                max_lat: 1.0,
                min_lat: -1.0,
                max_lon: 1.0,
                min_lon: -1.0,
            }
        );
    }

    #[test]
    fn test_bounds_zero_radius() {
        let bounds = compute_bounds(45.0, -121.0, 0.0);
        assert_eq!(bounds.max_lat, 45.0);
        assert_eq!(bounds.min_lat, 45.0);
        assert_eq!(bounds.max_lon, -121.0);
        assert_eq!(bounds.min_lon, -121.0);
    }

    #[test]
    fn test_bounds_square_in_degrees() {
        let cases = [
            (47.6062, -122.3321, 0.1),
            (-33.8688, 151.2093, 5.0),
            (64.0, -150.0, 10.0),
            (0.0, 0.0, 2.5),
        ];

        for (lat, lon, radius) in cases {
            let bounds = compute_bounds(lat, lon, radius);
            assert!(bounds.max_lat >= bounds.min_lat);
            assert!(bounds.max_lon >= bounds.min_lon);
            assert_relative_eq!(bounds.lat_span(), 2.0 * radius / 69.0, epsilon = 1e-12);
            assert_relative_eq!(bounds.lon_span(), 2.0 * radius / 69.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_corners_round_trip() {
        let bounds = compute_bounds(46.85, -121.76, 3.0);
        let corners = bounds.corners();
        assert_eq!(corners[0], (bounds.min_lon, bounds.max_lat));
        assert_eq!(corners[2], (bounds.max_lon, bounds.min_lat));
        assert_eq!(GeoBoundingBox::from_corners(&corners), bounds);
    }

    #[test]
    fn test_query_validation() {
        assert!(Query::new(45.0, -121.0, 0.0).is_ok());
        assert!(Query::new(90.0, 180.0, 10.0).is_ok());
        // Longitudes beyond +-90 are valid
        assert!(Query::new(10.0, -150.0, 1.0).is_ok());

        assert!(matches!(
            Query::new(91.0, 0.0, 1.0),
            Err(DemError::InvalidCoordinate { name: "latitude", .. })
        ));
        assert!(matches!(
            Query::new(0.0, -180.5, 1.0),
            Err(DemError::InvalidCoordinate { name: "longitude", .. })
        ));
        assert!(matches!(
            Query::new(f64::NAN, 0.0, 1.0),
            Err(DemError::InvalidCoordinate { .. })
        ));
        assert!(matches!(
            Query::new(0.0, 0.0, -0.5),
            Err(DemError::InvalidRadius(_))
        ));
        assert!(matches!(
            Query::new(0.0, 0.0, f64::INFINITY),
            Err(DemError::InvalidRadius(_))
        ));
    }

    #[test]
    fn test_query_bounds_matches_compute_bounds() {
        let query = Query::new(46.85, -121.76, 5.0).unwrap();
        assert_eq!(query.bounds(), compute_bounds(46.85, -121.76, 5.0));
    }
}
