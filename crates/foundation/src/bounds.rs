use crate::geo::LonLat;

/// Axis-aligned bounding box in lon/lat degrees.
///
/// `min` is the south-west corner, `max` the north-east corner.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Aabb2 {
    pub min: [f64; 2],
    pub max: [f64; 2],
}

impl Aabb2 {
    pub fn new(min: [f64; 2], max: [f64; 2]) -> Self {
        Aabb2 { min, max }
    }

    pub fn from_point(p: LonLat) -> Self {
        Aabb2 {
            min: [p.lon, p.lat],
            max: [p.lon, p.lat],
        }
    }

    /// Bounds of all points, or `None` for an empty slice.
    pub fn from_points(points: &[LonLat]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let mut out = Self::from_point(*first);
        for p in rest {
            out.extend(*p);
        }
        Some(out)
    }

    pub fn extend(&mut self, p: LonLat) {
        self.min[0] = self.min[0].min(p.lon);
        self.min[1] = self.min[1].min(p.lat);
        self.max[0] = self.max[0].max(p.lon);
        self.max[1] = self.max[1].max(p.lat);
    }

    pub fn union(&self, other: &Self) -> Self {
        Aabb2 {
            min: [self.min[0].min(other.min[0]), self.min[1].min(other.min[1])],
            max: [self.max[0].max(other.max[0]), self.max[1].max(other.max[1])],
        }
    }

    pub fn center(&self) -> LonLat {
        LonLat::new(
            (self.min[0] + self.max[0]) * 0.5,
            (self.min[1] + self.max[1]) * 0.5,
        )
    }

    pub fn contains(&self, p: LonLat) -> bool {
        p.lon >= self.min[0] && p.lon <= self.max[0] && p.lat >= self.min[1] && p.lat <= self.max[1]
    }
}
