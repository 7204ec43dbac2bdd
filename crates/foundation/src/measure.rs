use crate::geo::LonLat;

/// Mean earth radius (meters) used for great-circle distances.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;
/// Length of one degree of latitude (meters), used to turn a GPS accuracy
/// into a planar radius in degrees.
pub const METERS_PER_DEGREE: f64 = 111_320.0;

/// Great-circle distance between two coordinates.
pub fn haversine_m(a: LonLat, b: LonLat) -> f64 {
    let (lat1, lat2) = (a.lat.to_radians(), b.lat.to_radians());
    let dlat = lat2 - lat1;
    let dlon = (b.lon - a.lon).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Even-odd containment test on an open ring, in planar degrees.
///
/// Points exactly on an edge may land on either side; callers that need the
/// boundary use `distance_to_ring_deg` as well.
pub fn ring_contains(ring: &[LonLat], p: LonLat) -> bool {
    let mut inside = false;
    let n = ring.len();
    for i in 0..n {
        let a = ring[i];
        let b = ring[(i + n - 1) % n];
        if (a.lat > p.lat) != (b.lat > p.lat) {
            let cross_lon = a.lon + (p.lat - a.lat) * (b.lon - a.lon) / (b.lat - a.lat);
            if p.lon < cross_lon {
                inside = !inside;
            }
        }
    }
    inside
}

/// Shortest planar distance (degrees) from `p` to any edge of the ring,
/// including the closing edge.
pub fn distance_to_ring_deg(ring: &[LonLat], p: LonLat) -> f64 {
    let n = ring.len();
    (0..n)
        .map(|i| distance_to_segment_deg(ring[i], ring[(i + 1) % n], p))
        .fold(f64::INFINITY, f64::min)
}

fn distance_to_segment_deg(a: LonLat, b: LonLat, p: LonLat) -> f64 {
    let (dx, dy) = (b.lon - a.lon, b.lat - a.lat);
    let len2 = dx * dx + dy * dy;
    let t = if len2 == 0.0 {
        0.0
    } else {
        (((p.lon - a.lon) * dx + (p.lat - a.lat) * dy) / len2).clamp(0.0, 1.0)
    };
    let (ex, ey) = (a.lon + t * dx - p.lon, a.lat + t * dy - p.lat);
    (ex * ex + ey * ey).sqrt()
}

/// True when a disk of `radius_deg` around `p` touches the ring's interior
/// or boundary. A zero radius tests the point itself.
pub fn ring_intersects_disk(ring: &[LonLat], p: LonLat, radius_deg: f64) -> bool {
    ring_contains(ring, p) || distance_to_ring_deg(ring, p) <= radius_deg
}

/// Area centroid of an open ring in planar degrees.
///
/// Degenerate (zero-area) rings fall back to the vertex mean.
pub fn ring_centroid(ring: &[LonLat]) -> Option<LonLat> {
    if ring.is_empty() {
        return None;
    }
    let origin = ring[0];
    let n = ring.len();
    let (mut area2, mut cx, mut cy) = (0.0, 0.0, 0.0);
    for i in 0..n {
        // Relative to the first vertex to keep large coordinates precise.
        let (x0, y0) = (ring[i].lon - origin.lon, ring[i].lat - origin.lat);
        let j = (i + 1) % n;
        let (x1, y1) = (ring[j].lon - origin.lon, ring[j].lat - origin.lat);
        let cross = x0 * y1 - x1 * y0;
        area2 += cross;
        cx += (x0 + x1) * cross;
        cy += (y0 + y1) * cross;
    }
    if area2.abs() <= f64::EPSILON {
        let count = n as f64;
        let lon = ring.iter().map(|v| v.lon).sum::<f64>() / count;
        let lat = ring.iter().map(|v| v.lat).sum::<f64>() / count;
        return Some(LonLat::new(lon, lat));
    }
    let scale = 3.0 * area2;
    Some(LonLat::new(origin.lon + cx / scale, origin.lat + cy / scale))
}

/// Great-circle distance from `p` to the closest vertex of the ring.
pub fn nearest_vertex_m(ring: &[LonLat], p: LonLat) -> f64 {
    ring.iter()
        .map(|v| haversine_m(p, *v))
        .fold(f64::INFINITY, f64::min)
}

#[cfg(test)]
mod tests {
    use super::{
        distance_to_ring_deg, haversine_m, nearest_vertex_m, ring_centroid, ring_contains,
        ring_intersects_disk,
    };
    use crate::geo::LonLat;

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    fn square() -> Vec<LonLat> {
        vec![
            LonLat::new(0.0, 0.0),
            LonLat::new(2.0, 0.0),
            LonLat::new(2.0, 2.0),
            LonLat::new(0.0, 2.0),
        ]
    }

    #[test]
    fn haversine_quarter_meridian() {
        let d = haversine_m(LonLat::new(0.0, 0.0), LonLat::new(0.0, 90.0));
        assert_close(d, std::f64::consts::FRAC_PI_2 * super::EARTH_RADIUS_M, 1e-6);
        assert_eq!(haversine_m(LonLat::new(5.0, 50.0), LonLat::new(5.0, 50.0)), 0.0);
    }

    #[test]
    fn haversine_uses_longitude_first() {
        // One degree of longitude shrinks with latitude; one of latitude does not.
        let east = haversine_m(LonLat::new(6.0, 60.0), LonLat::new(7.0, 60.0));
        let north = haversine_m(LonLat::new(6.0, 60.0), LonLat::new(6.0, 61.0));
        assert!(east < north * 0.6);
    }

    #[test]
    fn containment_of_square() {
        assert!(ring_contains(&square(), LonLat::new(1.0, 1.0)));
        assert!(!ring_contains(&square(), LonLat::new(3.0, 1.0)));
        assert!(!ring_contains(&square(), LonLat::new(1.0, -0.5)));
    }

    #[test]
    fn concave_ring_excludes_notch() {
        let ring = vec![
            LonLat::new(0.0, 0.0),
            LonLat::new(4.0, 0.0),
            LonLat::new(4.0, 4.0),
            LonLat::new(2.0, 1.0),
            LonLat::new(0.0, 4.0),
        ];
        assert!(ring_contains(&ring, LonLat::new(1.0, 0.5)));
        assert!(!ring_contains(&ring, LonLat::new(2.0, 3.0)));
    }

    #[test]
    fn edge_distance_and_disk() {
        let p = LonLat::new(3.0, 1.0);
        assert_close(distance_to_ring_deg(&square(), p), 1.0, 1e-12);
        assert!(!ring_intersects_disk(&square(), p, 0.5));
        assert!(ring_intersects_disk(&square(), p, 1.0));
        // On the boundary with no accuracy at all.
        assert!(ring_intersects_disk(&square(), LonLat::new(2.0, 1.0), 0.0));
    }

    #[test]
    fn centroid_of_square_and_degenerate_ring() {
        assert_eq!(ring_centroid(&square()), Some(LonLat::new(1.0, 1.0)));
        let flat = vec![
            LonLat::new(0.0, 0.0),
            LonLat::new(1.0, 0.0),
            LonLat::new(2.0, 0.0),
        ];
        assert_eq!(ring_centroid(&flat), Some(LonLat::new(1.0, 0.0)));
        assert_eq!(ring_centroid(&[]), None);
    }

    #[test]
    fn nearest_vertex_is_minimum() {
        let p = LonLat::new(2.0, 2.0);
        assert_eq!(nearest_vertex_m(&square(), p), 0.0);
        assert!(nearest_vertex_m(&[], p).is_infinite());
    }
}
