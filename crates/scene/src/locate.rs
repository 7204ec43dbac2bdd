use foundation::geo::LonLat;
use foundation::measure::{
    METERS_PER_DEGREE, haversine_m, nearest_vertex_m, ring_centroid, ring_intersects_disk,
};

use crate::store::ZoneStore;
use crate::zone::Zone;

/// The zone a position was resolved to.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneMatch {
    pub name: String,
    /// Index of the store the zone came from; lower wins.
    pub priority: usize,
    pub distance_to_centroid_m: f64,
}

/// Resolves a GPS fix against several zone stores.
///
/// A zone is a candidate when the accuracy disk around `point` touches it.
/// With several candidates only those from the lowest-indexed store remain
/// when `prioritize` is set (otherwise every store counts as priority 0), and
/// the zone with the closest vertex wins; ties go to the earlier zone.
/// Negative or non-finite accuracies are treated as an exact fix.
pub fn locate_zone(
    stores: &[&ZoneStore],
    point: LonLat,
    accuracy_m: f64,
    prioritize: bool,
) -> Option<ZoneMatch> {
    if !point.is_finite() {
        return None;
    }
    let radius_deg = if accuracy_m.is_finite() && accuracy_m > 0.0 {
        accuracy_m / METERS_PER_DEGREE
    } else {
        0.0
    };

    let candidates: Vec<(usize, &Zone)> = stores
        .iter()
        .enumerate()
        .flat_map(|(idx, store)| {
            let priority = if prioritize { idx } else { 0 };
            store.list().iter().map(move |zone| (priority, zone))
        })
        .filter(|(_, zone)| ring_intersects_disk(zone.vertices(), point, radius_deg))
        .collect();

    let best_priority = candidates.iter().map(|(p, _)| *p).min()?;
    let mut best: Option<(usize, &Zone, f64)> = None;
    for (priority, zone) in candidates.into_iter().filter(|(p, _)| *p == best_priority) {
        let distance = nearest_vertex_m(zone.vertices(), point);
        if best.is_none_or(|(_, _, d)| distance < d) {
            best = Some((priority, zone, distance));
        }
    }

    let (priority, zone, _) = best?;
    let centroid = ring_centroid(zone.vertices())?;
    Some(ZoneMatch {
        name: zone.name().to_string(),
        priority,
        distance_to_centroid_m: haversine_m(point, centroid),
    })
}

impl ZoneStore {
    /// The zone containing `point`, widened by `accuracy_m` meters.
    pub fn zone_at(&self, point: LonLat, accuracy_m: f64) -> Option<ZoneMatch> {
        locate_zone(&[self], point, accuracy_m, false)
    }
}

#[cfg(test)]
mod tests {
    use super::{ZoneMatch, locate_zone};
    use crate::store::ZoneStore;
    use crate::zone::Zone;
    use foundation::geo::LonLat;
    use foundation::measure::haversine_m;

    fn square(lon: f64, lat: f64, size: f64) -> Vec<LonLat> {
        vec![
            LonLat::new(lon, lat),
            LonLat::new(lon + size, lat),
            LonLat::new(lon + size, lat + size),
            LonLat::new(lon, lat + size),
        ]
    }

    fn store(zones: &[(&str, Vec<LonLat>)]) -> ZoneStore {
        let mut store = ZoneStore::new();
        let zones = zones
            .iter()
            .map(|(name, ring)| Zone::new(*name, ring.clone()).expect("zone"))
            .collect();
        store.replace_all(zones).expect("replace");
        store
    }

    #[test]
    fn single_containing_zone_reports_centroid_distance() {
        let store = store(&[("Home", square(6.0, 52.0, 0.01)), ("Work", square(7.0, 52.0, 0.01))]);
        let point = LonLat::new(6.002, 52.002);
        let found = store.zone_at(point, 0.0).expect("inside");
        assert_eq!(found.name, "Home");
        assert_eq!(found.priority, 0);
        let expected = haversine_m(point, LonLat::new(6.005, 52.005));
        assert!((found.distance_to_centroid_m - expected).abs() < 1e-6);
    }

    #[test]
    fn outside_every_zone_is_none() {
        let store = store(&[("Home", square(6.0, 52.0, 0.01))]);
        assert_eq!(store.zone_at(LonLat::new(6.1, 52.1), 10.0), None);
        assert_eq!(ZoneStore::new().zone_at(LonLat::new(6.0, 52.0), 10.0), None);
    }

    #[test]
    fn accuracy_widens_the_match() {
        let store = store(&[("Home", square(6.0, 52.0, 0.01))]);
        // About 111 m east of the edge.
        let point = LonLat::new(6.011, 52.005);
        assert_eq!(store.zone_at(point, 50.0), None);
        assert_eq!(store.zone_at(point, 200.0).map(|m| m.name), Some("Home".to_string()));
        assert_eq!(store.zone_at(point, f64::NAN), None);
        assert_eq!(store.zone_at(point, -500.0), None);
    }

    #[test]
    fn overlap_goes_to_zone_with_nearest_vertex() {
        let store = store(&[
            ("Big", square(0.0, 0.0, 1.0)),
            ("Corner", square(0.4, 0.4, 0.2)),
        ]);
        let found = store.zone_at(LonLat::new(0.45, 0.45), 0.0).expect("overlap");
        assert_eq!(found.name, "Corner");

        let found = store.zone_at(LonLat::new(0.05, 0.05), 0.0).expect("big only");
        assert_eq!(found.name, "Big");
    }

    #[test]
    fn equal_distances_keep_store_order() {
        let ring = square(0.0, 0.0, 1.0);
        let store = store(&[("First", ring.clone()), ("Second", ring)]);
        let found = store.zone_at(LonLat::new(0.5, 0.5), 0.0).expect("tie");
        assert_eq!(found.name, "First");
    }

    #[test]
    fn prioritized_stores_prefer_lower_index() {
        let primary = store(&[("Garden", square(0.0, 0.0, 1.0))]);
        let secondary = store(&[("Shed", square(0.4, 0.4, 0.2))]);
        let point = LonLat::new(0.45, 0.45);

        let found = locate_zone(&[&primary, &secondary], point, 0.0, true).expect("match");
        assert_eq!(found.name, "Garden");
        assert_eq!(found.priority, 0);

        let flat = locate_zone(&[&primary, &secondary], point, 0.0, false).expect("match");
        assert_eq!(flat.name, "Shed");

        let secondary_only = locate_zone(&[&primary, &secondary], LonLat::new(5.0, 5.0), 0.0, true);
        assert_eq!(secondary_only, None);
    }

    #[test]
    fn lone_candidate_from_later_store_keeps_its_priority() {
        let primary = store(&[("Garden", square(0.0, 0.0, 1.0))]);
        let secondary = store(&[("Far", square(10.0, 10.0, 1.0))]);
        let found: ZoneMatch =
            locate_zone(&[&primary, &secondary], LonLat::new(10.5, 10.5), 0.0, true).expect("far");
        assert_eq!(found.name, "Far");
        assert_eq!(found.priority, 1);
    }
}
