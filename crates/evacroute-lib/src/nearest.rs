//! Nearest-facility lookup by great-circle distance.

use tracing::debug;

use crate::coords::{haversine_distance, GeoPoint};
use crate::error::{Error, Result};

/// Anything with an optional, validated position.
pub trait Located {
    /// `None` when the record has no usable coordinates.
    fn location(&self) -> Option<GeoPoint>;
}

impl Located for GeoPoint {
    fn location(&self) -> Option<GeoPoint> {
        Some(*self)
    }
}

/// The closest candidate and its distance from the origin.
#[derive(Debug, Clone, PartialEq)]
pub struct Nearest<'a, T> {
    pub candidate: &'a T,
    pub location: GeoPoint,
    pub distance_meters: f64,
}

/// Find the candidate closest to `origin`.
///
/// Candidates without a location are skipped. On equal distance the earlier
/// candidate wins.
///
/// # Errors
///
/// - [`Error::NoCenters`] when `candidates` is empty.
/// - [`Error::NoValidCenters`] when every candidate was skipped.
pub fn find_nearest<T: Located>(origin: GeoPoint, candidates: &[T]) -> Result<Nearest<'_, T>> {
    if candidates.is_empty() {
        return Err(Error::NoCenters);
    }

    let mut best: Option<Nearest<'_, T>> = None;
    let mut skipped = 0;

    for candidate in candidates {
        let Some(location) = candidate.location() else {
            skipped += 1;
            continue;
        };
        let distance_meters = haversine_distance(&origin, &location);
        if best.as_ref().map_or(true, |b| distance_meters < b.distance_meters) {
            best = Some(Nearest {
                candidate,
                location,
                distance_meters,
            });
        }
    }

    if skipped > 0 {
        debug!(skipped, total = candidates.len(), "skipped candidates without coordinates");
    }

    best.ok_or(Error::NoValidCenters { skipped })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Site {
        name: &'static str,
        at: Option<(f64, f64)>,
    }

    impl Located for Site {
        fn location(&self) -> Option<GeoPoint> {
            self.at.and_then(|(lng, lat)| GeoPoint::new(lng, lat).ok())
        }
    }

    fn origin() -> GeoPoint {
        GeoPoint::new(121.10, 14.65).unwrap()
    }

    #[test]
    fn picks_closest_candidate() {
        let sites = [
            Site { name: "far", at: Some((121.20, 14.75)) },
            Site { name: "near", at: Some((121.101, 14.651)) },
            Site { name: "mid", at: Some((121.12, 14.66)) },
        ];
        let nearest = find_nearest(origin(), &sites).unwrap();
        assert_eq!(nearest.candidate.name, "near");
        assert!(nearest.distance_meters > 0.0 && nearest.distance_meters < 200.0);
    }

    #[test]
    fn first_wins_on_tie() {
        let sites = [
            Site { name: "first", at: Some((121.11, 14.65)) },
            Site { name: "second", at: Some((121.11, 14.65)) },
        ];
        assert_eq!(find_nearest(origin(), &sites).unwrap().candidate.name, "first");
    }

    #[test]
    fn skips_candidates_without_coordinates() {
        let sites = [
            Site { name: "unmapped", at: None },
            Site { name: "mapped", at: Some((121.30, 14.90)) },
        ];
        let nearest = find_nearest(origin(), &sites).unwrap();
        assert_eq!(nearest.candidate.name, "mapped");
    }

    #[test]
    fn empty_and_all_invalid_are_distinct_errors() {
        let none: [Site; 0] = [];
        assert!(matches!(find_nearest(origin(), &none), Err(Error::NoCenters)));

        let unmapped = [
            Site { name: "a", at: None },
            Site { name: "b", at: Some((500.0, 0.0)) },
        ];
        assert!(matches!(
            find_nearest(origin(), &unmapped),
            Err(Error::NoValidCenters { skipped: 2 })
        ));
    }
}
