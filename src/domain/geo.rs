use serde::Serialize;

use crate::domain::error::DomainError;

/// Mean Earth radius in meters, as used by the haversine formula.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A validated WGS84 point. Construction rejects out-of-range values, so
/// every `Coordinate` in the system is safe to feed to `distance`.
///
/// Deliberately not `Deserialize`: request DTOs carry raw floats and must go
/// through `Coordinate::new`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, DomainError> {
        // NaN fails both range checks.
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(DomainError::InvalidCoordinate);
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

/// Great-circle surface distance between two points in meters (haversine,
/// spherical Earth model). Returns 0 for identical points and up to roughly
/// half the Earth's circumference for antipodal ones; never panics.
pub fn distance(a: Coordinate, b: Coordinate) -> f64 {
    let phi1 = a.latitude.to_radians();
    let phi2 = b.latitude.to_radians();
    let delta_phi = (b.latitude - a.latitude).to_radians();
    let delta_lambda = (b.longitude - a.longitude).to_radians();

    let h = (delta_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (delta_lambda / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_M * h.sqrt().atan2((1.0 - h).sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    // KPPN Lhokseumawe office front gate.
    const OFFICE_LAT: f64 = 5.178827;
    const OFFICE_LON: f64 = 97.149306;

    // Moving north by this many degrees of latitude covers just under 100 m
    // of great-circle distance.
    const DEG_PER_100M: f64 = 0.000899321;

    fn office() -> Coordinate {
        Coordinate::new(OFFICE_LAT, OFFICE_LON).unwrap()
    }

    #[test]
    fn rejects_out_of_range_inputs() {
        assert_eq!(Coordinate::new(90.1, 0.0), Err(DomainError::InvalidCoordinate));
        assert_eq!(Coordinate::new(-90.1, 0.0), Err(DomainError::InvalidCoordinate));
        assert_eq!(Coordinate::new(0.0, 180.1), Err(DomainError::InvalidCoordinate));
        assert_eq!(Coordinate::new(0.0, -180.1), Err(DomainError::InvalidCoordinate));
        assert_eq!(Coordinate::new(f64::NAN, 0.0), Err(DomainError::InvalidCoordinate));
        assert!(Coordinate::new(90.0, -180.0).is_ok());
    }

    #[test]
    fn distance_to_self_is_zero() {
        assert_eq!(distance(office(), office()), 0.0);
    }

    #[test]
    fn distance_is_symmetric() {
        let a = office();
        let b = Coordinate::new(5.2, 97.2).unwrap();
        assert_eq!(distance(a, b), distance(b, a));
    }

    #[test]
    fn distance_grows_with_angular_separation() {
        let a = office();
        let mut previous = 0.0;
        for step in 1..=10 {
            let b = Coordinate::new(OFFICE_LAT + step as f64 * DEG_PER_100M, OFFICE_LON).unwrap();
            let d = distance(a, b);
            assert!(d > previous, "expected {} > {}", d, previous);
            previous = d;
        }
    }

    #[test]
    fn hundred_meters_north_of_the_office() {
        let reading = Coordinate::new(OFFICE_LAT + DEG_PER_100M, OFFICE_LON).unwrap();
        let d = distance(office(), reading);
        assert!((d - 100.0).abs() < 0.01, "got {}", d);
    }

    #[test]
    fn antipodal_points_stay_finite() {
        let a = Coordinate::new(0.0, 0.0).unwrap();
        let b = Coordinate::new(0.0, 180.0).unwrap();
        let d = distance(a, b);
        let half_circumference = std::f64::consts::PI * EARTH_RADIUS_M;
        assert!(d.is_finite());
        assert!((d - half_circumference).abs() < 1.0, "got {}", d);
    }
}
