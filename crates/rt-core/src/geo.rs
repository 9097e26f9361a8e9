//! Geographic coordinate type and spatial utilities.
//!
//! `Location` uses `f64` latitude/longitude in degrees (WGS-84).  Values are
//! validated on construction so every `Location` held by the engine is a real
//! point on the globe.

use std::fmt;
use std::str::FromStr;

use crate::{CoreError, CoreResult};

/// Mean Earth radius in metres.
pub const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// A WGS-84 geographic coordinate.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawLocation"))]
pub struct Location {
    pub latitude:  f64,
    pub longitude: f64,
}

impl Location {
    /// Build a location, rejecting non-finite or out-of-range coordinates.
    pub fn new(latitude: f64, longitude: f64) -> CoreResult<Self> {
        let reason = if !latitude.is_finite() || !longitude.is_finite() {
            Some("coordinates must be finite")
        } else if !(-90.0..=90.0).contains(&latitude) {
            Some("latitude must be within [-90, 90]")
        } else if !(-180.0..=180.0).contains(&longitude) {
            Some("longitude must be within [-180, 180]")
        } else {
            None
        };
        match reason {
            Some(reason) => Err(CoreError::InvalidLocation { latitude, longitude, reason }),
            None => Ok(Self { latitude, longitude }),
        }
    }

    /// Build a location without range checks.
    ///
    /// For trusted sources (graph storage, test fixtures).  Out-of-range
    /// values are not rejected but still produce well-defined, if
    /// meaningless, distances.
    #[inline]
    pub const fn new_unchecked(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Haversine great-circle distance in metres.
    pub fn distance_m(self, other: Location) -> f64 {
        let d_lat = (other.latitude - self.latitude).to_radians();
        let d_lon = (other.longitude - self.longitude).to_radians();

        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();

        let a = (d_lat * 0.5).sin().powi(2)
            + lat1.cos() * lat2.cos() * (d_lon * 0.5).sin().powi(2);

        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        EARTH_RADIUS_M * c
    }

    /// Initial bearing from `self` towards `other`, in degrees `[0, 360)`
    /// clockwise from north.  Returns `0.0` for identical points.
    pub fn bearing_to(self, other: Location) -> f64 {
        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();
        let d_lon = (other.longitude - self.longitude).to_radians();

        let y = d_lon.sin() * lat2.cos();
        let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * d_lon.cos();
        if x == 0.0 && y == 0.0 {
            return 0.0;
        }
        (y.atan2(x).to_degrees() + 360.0) % 360.0
    }

    /// Position on the unit sphere as `[x, y, z]`.
    ///
    /// The Euclidean (chord) distance between two unit vectors grows strictly
    /// with their great-circle distance, with no seam at the antimeridian and
    /// no distortion near the poles.
    pub fn unit_vector(self) -> [f64; 3] {
        let lat = self.latitude.to_radians();
        let lon = self.longitude.to_radians();
        [lat.cos() * lon.cos(), lat.cos() * lon.sin(), lat.sin()]
    }
}

/// Absolute difference between two headings in degrees, in `[0, 180]`.
pub fn heading_change(from_deg: f64, to_deg: f64) -> f64 {
    let diff = (to_deg - from_deg).rem_euclid(360.0);
    if diff > 180.0 { 360.0 - diff } else { diff }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.7}, {:.7})", self.latitude, self.longitude)
    }
}

/// Parses `"latitude,longitude"`.
impl FromStr for Location {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        let (lat, lon) = s
            .split_once(',')
            .ok_or_else(|| CoreError::Parse("expected two items separated by comma".into()))?;
        let parse = |v: &str| {
            v.trim()
                .parse::<f64>()
                .map_err(|_| CoreError::Parse(format!("invalid number {:?}", v.trim())))
        };
        Location::new(parse(lat)?, parse(lon)?)
    }
}

// ── serde boundary validation ─────────────────────────────────────────────────

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawLocation {
    #[serde(alias = "y")]
    latitude:  f64,
    #[serde(alias = "x")]
    longitude: f64,
}

#[cfg(feature = "serde")]
impl TryFrom<RawLocation> for Location {
    type Error = CoreError;

    fn try_from(raw: RawLocation) -> CoreResult<Self> {
        Location::new(raw.latitude, raw.longitude)
    }
}
