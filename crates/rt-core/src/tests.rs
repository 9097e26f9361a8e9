//! Unit tests for rt-core primitives.

#[cfg(test)]
mod ids {
    use crate::{EdgeId, NodeId, NodeIdx};

    #[test]
    fn index_roundtrip() {
        let id = EdgeId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(EdgeId::try_from(42usize).unwrap(), id);
    }

    #[test]
    fn ordering() {
        assert!(NodeId(0) < NodeId(1));
        assert!(NodeIdx(100) > NodeIdx(99));
    }

    #[test]
    fn invalid_sentinels_are_max() {
        assert_eq!(NodeId::INVALID.0, u64::MAX);
        assert_eq!(NodeIdx::INVALID.0, u32::MAX);
        assert_eq!(EdgeId::default(), EdgeId::INVALID);
    }

    #[test]
    fn display() {
        assert_eq!(NodeId(1468922197).to_string(), "NodeId(1468922197)");
    }
}

#[cfg(test)]
mod geo {
    use crate::geo::heading_change;
    use crate::{CoreError, Location};

    #[test]
    fn validation_bounds() {
        assert!(Location::new(90.0, 180.0).is_ok());
        assert!(Location::new(-90.0, -180.0).is_ok());
        assert!(matches!(
            Location::new(90.1, 0.0),
            Err(CoreError::InvalidLocation { .. })
        ));
        assert!(Location::new(0.0, -180.5).is_err());
        assert!(Location::new(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn zero_distance() {
        let p = Location::new_unchecked(51.4996612, -2.6823825);
        assert!(p.distance_m(p) < 1e-9);
    }

    #[test]
    fn one_degree_latitude() {
        // ~1 degree of latitude ≈ 111 km
        let a = Location::new_unchecked(51.0, -2.0);
        let b = Location::new_unchecked(52.0, -2.0);
        let d = a.distance_m(b);
        assert!((d - 111_195.0).abs() < 100.0, "got {d}");
    }

    #[test]
    fn bearings() {
        let o = Location::new_unchecked(0.0, 0.0);
        assert!((o.bearing_to(Location::new_unchecked(1.0, 0.0)) - 0.0).abs() < 1e-9);
        assert!((o.bearing_to(Location::new_unchecked(0.0, 1.0)) - 90.0).abs() < 1e-9);
        assert!((o.bearing_to(Location::new_unchecked(-1.0, 0.0)) - 180.0).abs() < 1e-9);
        assert!((o.bearing_to(Location::new_unchecked(0.0, -1.0)) - 270.0).abs() < 1e-9);
    }

    #[test]
    fn heading_change_wraps() {
        assert_eq!(heading_change(350.0, 10.0), 20.0);
        assert_eq!(heading_change(10.0, 350.0), 20.0);
        assert_eq!(heading_change(0.0, 180.0), 180.0);
        assert_eq!(heading_change(90.0, 90.0), 0.0);
    }

    #[test]
    fn chord_distance_crosses_antimeridian() {
        // Two points 0.2° apart across the antimeridian must be closer than a
        // point 1° away on the same side.
        let sq = |a: [f64; 3], b: [f64; 3]| {
            (a[0] - b[0]).powi(2) + (a[1] - b[1]).powi(2) + (a[2] - b[2]).powi(2)
        };
        let east = Location::new_unchecked(10.0, 179.9).unit_vector();
        let west = Location::new_unchecked(10.0, -179.9).unit_vector();
        let same_side = Location::new_unchecked(10.0, 178.9).unit_vector();
        assert!(sq(east, west) < sq(east, same_side));
    }

    #[test]
    fn parse_location() {
        let loc: Location = "51.500427,-2.6741088".parse().unwrap();
        assert_eq!(loc.latitude, 51.500427);
        assert_eq!(loc.longitude, -2.6741088);
    }

    #[test]
    fn parse_location_rejects_garbage() {
        assert!("51.500427 -2.6741088".parse::<Location>().is_err());
        assert!("51.500427,-a.6741088".parse::<Location>().is_err());
        assert!("95.0,0.0".parse::<Location>().is_err());
    }
}
