/// A geographic coordinate pair in degrees.
///
/// Field order follows GeoJSON: longitude first.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LonLat {
    pub lon: f64,
    pub lat: f64,
}

impl LonLat {
    pub const fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    pub fn is_finite(&self) -> bool {
        self.lon.is_finite() && self.lat.is_finite()
    }

    pub fn to_array(self) -> [f64; 2] {
        [self.lon, self.lat]
    }
}

impl From<[f64; 2]> for LonLat {
    fn from([lon, lat]: [f64; 2]) -> Self {
        Self { lon, lat }
    }
}

impl From<(f64, f64)> for LonLat {
    fn from((lon, lat): (f64, f64)) -> Self {
        Self { lon, lat }
    }
}

/// Drops every trailing vertex that repeats the first one.
///
/// Rings coming from GeoJSON are closed explicitly; zones keep them open.
/// The result never ends with its first vertex unless it has only one.
pub fn open_ring(mut ring: Vec<LonLat>) -> Vec<LonLat> {
    while ring.len() >= 2 && ring.first() == ring.last() {
        ring.pop();
    }
    ring
}

/// Appends the first vertex to the end unless the ring is already closed.
pub fn close_ring(ring: &[LonLat]) -> Vec<LonLat> {
    let mut out = ring.to_vec();
    if let (Some(first), Some(last)) = (ring.first(), ring.last())
        && (ring.len() == 1 || first != last)
    {
        out.push(*first);
    }
    out
}

/// Number of distinct vertices in a ring, comparing exact coordinates.
pub fn distinct_vertex_count(ring: &[LonLat]) -> usize {
    let mut seen: Vec<LonLat> = Vec::with_capacity(ring.len());
    for p in ring {
        if !seen.contains(p) {
            seen.push(*p);
        }
    }
    seen.len()
}
