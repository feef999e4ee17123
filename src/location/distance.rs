//! Great-circle distance.

/// Mean Earth radius used for the spherical model.
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Haversine distance in meters between two latitude/longitude pairs (degrees).
pub fn haversine_meters(from_lat: f64, from_lng: f64, to_lat: f64, to_lng: f64) -> f64 {
    let phi1 = from_lat.to_radians();
    let phi2 = to_lat.to_radians();
    let d_phi = (to_lat - from_lat).to_radians();
    let d_lambda = (to_lng - from_lng).to_radians();

    let a = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    // a can round slightly above 1 near antipodes
    let c = 2.0 * a.sqrt().min(1.0).asin();

    EARTH_RADIUS_METERS * c
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_point_is_zero() {
        assert_eq!(haversine_meters(-6.2395, 106.8553, -6.2395, 106.8553), 0.0);
    }

    #[test]
    fn test_symmetric() {
        let pairs = [
            ((-6.2395, 106.8553), (-6.2431, 106.8590)),
            ((51.5074, -0.1278), (48.8566, 2.3522)),
            ((0.0, 179.9), (0.0, -179.9)),
            ((89.9, 0.0), (-89.9, 180.0)),
        ];
        for ((a_lat, a_lng), (b_lat, b_lng)) in pairs {
            let ab = haversine_meters(a_lat, a_lng, b_lat, b_lng);
            let ba = haversine_meters(b_lat, b_lng, a_lat, a_lng);
            assert!((ab - ba).abs() <= ab.abs() * 1e-6 + 1e-9, "{ab} vs {ba}");
        }
    }

    #[test]
    fn test_known_distance_london_paris() {
        let d = haversine_meters(51.5074, -0.1278, 48.8566, 2.3522);
        // ~343.5 km on a 6371 km sphere
        assert!((d - 343_500.0).abs() < 1_000.0, "{d}");
    }

    #[test]
    fn test_one_degree_latitude() {
        let d = haversine_meters(0.0, 0.0, 1.0, 0.0);
        let expected = EARTH_RADIUS_METERS * 1f64.to_radians();
        assert!((d - expected).abs() < 1e-6);
    }

    #[test]
    fn test_antipodal_points() {
        let d = haversine_meters(0.0, 0.0, 0.0, 180.0);
        assert!((d - EARTH_RADIUS_METERS * std::f64::consts::PI).abs() < 1e-3);
    }
}
