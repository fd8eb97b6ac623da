use serde::Serialize;

use crate::domain::error::DomainError;
use crate::domain::geo::{self, Coordinate};

/// A named circular zone that gates location-dependent actions.
#[derive(Debug, Clone)]
pub struct Zone {
    name: String,
    center: Coordinate,
    radius_m: f64,
}

impl Zone {
    pub fn new(name: impl Into<String>, center: Coordinate, radius_m: f64) -> Result<Self, DomainError> {
        // radius_m > 0.0 is false for NaN as well.
        if !(radius_m > 0.0) {
            return Err(DomainError::InvalidZone);
        }
        Ok(Self {
            name: name.into(),
            center,
            radius_m,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Which rule let a reading through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchRule {
    WithinRadius,
    AddressAllowlist,
}

/// Outcome of a single geofence evaluation. Produced fresh per reading,
/// never persisted.
///
/// When no zone matches, `distance_m` is the nearest miss across all zones,
/// which the client shows as diagnostic text ("Jarak dari kantor: ... meter").
#[derive(Debug, Clone, Serialize)]
pub struct GeofenceVerdict {
    pub inside: bool,
    pub distance_m: f64,
    pub matched_zone: Option<String>,
    pub rule: Option<MatchRule>,
}

/// Evaluates readings against an ordered set of zones, with an optional
/// place-name allow-list fallback.
///
/// Zone order is significant: when several zones contain the reading, the
/// first configured match is reported.
#[derive(Debug, Clone)]
pub struct GeofenceValidator {
    zones: Vec<Zone>,
    allowed_places: Vec<String>,
}

impl GeofenceValidator {
    /// Fails fast on an empty zone list; zone radii were already validated
    /// by `Zone::new`.
    pub fn new(zones: Vec<Zone>) -> Result<Self, DomainError> {
        if zones.is_empty() {
            return Err(DomainError::NoZonesConfigured);
        }
        Ok(Self {
            zones,
            allowed_places: Vec::new(),
        })
    }

    /// Place-name fragments that mark an address as acceptable regardless of
    /// distance. Matching is case-insensitive substring containment.
    pub fn with_allowed_places<I, S>(mut self, places: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_places = places
            .into_iter()
            .map(|p| p.into().trim().to_lowercase())
            .filter(|p| !p.is_empty())
            .collect();
        self
    }

    /// Distance-only check. Inside means within (or exactly on) the radius
    /// of at least one zone.
    pub fn evaluate(&self, reading: Coordinate) -> GeofenceVerdict {
        let mut nearest = f64::INFINITY;

        for zone in &self.zones {
            let d = geo::distance(reading, zone.center);
            if d <= zone.radius_m {
                return GeofenceVerdict {
                    inside: true,
                    distance_m: d,
                    matched_zone: Some(zone.name.clone()),
                    rule: Some(MatchRule::WithinRadius),
                };
            }
            if d < nearest {
                nearest = d;
            }
        }

        GeofenceVerdict {
            inside: false,
            distance_m: nearest,
            matched_zone: None,
            rule: None,
        }
    }

    /// Distance check first; when it misses, a resolved address containing
    /// any allow-listed fragment forces the reading through. The verdict's
    /// `rule` records which path accepted it, so the two are observable
    /// independently.
    pub fn evaluate_with_address(&self, reading: Coordinate, address: &str) -> GeofenceVerdict {
        let verdict = self.evaluate(reading);
        if verdict.inside {
            return verdict;
        }

        let address = address.to_lowercase();
        if self.allowed_places.iter().any(|p| address.contains(p)) {
            return GeofenceVerdict {
                inside: true,
                rule: Some(MatchRule::AddressAllowlist),
                ..verdict
            };
        }

        verdict
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OFFICE_LAT: f64 = 5.178827;
    const OFFICE_LON: f64 = 97.149306;
    const DEG_PER_100M: f64 = 0.000899321;

    fn office() -> Coordinate {
        Coordinate::new(OFFICE_LAT, OFFICE_LON).unwrap()
    }

    fn office_validator(radius_m: f64) -> GeofenceValidator {
        GeofenceValidator::new(vec![Zone::new("kantor", office(), radius_m).unwrap()]).unwrap()
    }

    fn meters_north(m: f64) -> Coordinate {
        Coordinate::new(OFFICE_LAT + m / 100.0 * DEG_PER_100M, OFFICE_LON).unwrap()
    }

    #[test]
    fn rejects_non_positive_radius() {
        assert_eq!(
            Zone::new("kantor", office(), 0.0).unwrap_err(),
            DomainError::InvalidZone
        );
        assert_eq!(
            Zone::new("kantor", office(), -5.0).unwrap_err(),
            DomainError::InvalidZone
        );
    }

    #[test]
    fn rejects_empty_zone_list() {
        assert_eq!(
            GeofenceValidator::new(vec![]).unwrap_err(),
            DomainError::NoZonesConfigured
        );
    }

    #[test]
    fn reading_at_the_center_is_inside() {
        let verdict = office_validator(1.0).evaluate(office());
        assert!(verdict.inside);
        assert_eq!(verdict.distance_m, 0.0);
        assert_eq!(verdict.matched_zone.as_deref(), Some("kantor"));
        assert_eq!(verdict.rule, Some(MatchRule::WithinRadius));
    }

    #[test]
    fn boundary_is_inclusive() {
        // Build the radius from the measured distance so the test pins the
        // d <= r comparison rather than floating-point luck.
        let reading = meters_north(100.0);
        let d = geo::distance(office(), reading);
        let verdict = office_validator(d).evaluate(reading);
        assert!(verdict.inside);
        assert!((verdict.distance_m - d).abs() < f64::EPSILON);
    }

    #[test]
    fn reading_a_hundred_meters_out_with_hundred_meter_radius() {
        let verdict = office_validator(100.0).evaluate(meters_north(99.99));
        assert!(verdict.inside);
        assert!((verdict.distance_m - 100.0).abs() < 0.05, "got {}", verdict.distance_m);
    }

    #[test]
    fn reading_at_150_meters_is_outside() {
        let verdict = office_validator(100.0).evaluate(meters_north(150.0));
        assert!(!verdict.inside);
        assert!(verdict.matched_zone.is_none());
        assert!(verdict.rule.is_none());
        assert!((verdict.distance_m - 150.0).abs() < 0.05, "got {}", verdict.distance_m);
    }

    #[test]
    fn first_configured_zone_wins_on_overlap() {
        let validator = GeofenceValidator::new(vec![
            Zone::new("gerbang", office(), 500.0).unwrap(),
            Zone::new("kantor", office(), 1000.0).unwrap(),
        ])
        .unwrap();

        let verdict = validator.evaluate(meters_north(50.0));
        assert!(verdict.inside);
        assert_eq!(verdict.matched_zone.as_deref(), Some("gerbang"));
    }

    #[test]
    fn nearest_miss_is_reported_across_zones() {
        let far = Coordinate::new(OFFICE_LAT + 1.0, OFFICE_LON).unwrap();
        let validator = GeofenceValidator::new(vec![
            Zone::new("jauh", far, 100.0).unwrap(),
            Zone::new("kantor", office(), 100.0).unwrap(),
        ])
        .unwrap();

        let verdict = validator.evaluate(meters_north(150.0));
        assert!(!verdict.inside);
        assert!((verdict.distance_m - 150.0).abs() < 0.05, "got {}", verdict.distance_m);
    }

    #[test]
    fn address_allowlist_overrides_distance() {
        let validator = office_validator(100.0).with_allowed_places(["lhokseumawe"]);
        let reading = meters_north(5000.0);

        let verdict = validator.evaluate_with_address(
            reading,
            "Jalan Merdeka, Banda Sakti, Kota Lhokseumawe, Aceh, Indonesia",
        );
        assert!(verdict.inside);
        assert_eq!(verdict.rule, Some(MatchRule::AddressAllowlist));
        assert!(verdict.matched_zone.is_none());
        // Nearest-miss distance is still carried for display.
        assert!(verdict.distance_m > 100.0);
    }

    #[test]
    fn address_match_is_case_insensitive() {
        let validator = office_validator(100.0).with_allowed_places(["Lhokseumawe"]);
        let verdict = validator.evaluate_with_address(meters_north(1000.0), "KOTA LHOKSEUMAWE");
        assert!(verdict.inside);
        assert_eq!(verdict.rule, Some(MatchRule::AddressAllowlist));
    }

    #[test]
    fn distance_match_is_reported_even_when_address_also_matches() {
        let validator = office_validator(100.0).with_allowed_places(["lhokseumawe"]);
        let verdict = validator.evaluate_with_address(meters_north(50.0), "Kota Lhokseumawe");
        assert!(verdict.inside);
        assert_eq!(verdict.rule, Some(MatchRule::WithinRadius));
    }

    #[test]
    fn unlisted_address_does_not_override() {
        let validator = office_validator(100.0).with_allowed_places(["lhokseumawe"]);
        let verdict = validator.evaluate_with_address(meters_north(1000.0), "Kota Banda Aceh");
        assert!(!verdict.inside);
        assert!(verdict.rule.is_none());
    }
}
