use foundation::bounds::Aabb2;
use foundation::geo::{LonLat, open_ring};

use crate::zone::{Zone, ZoneError, validate_name, validate_vertices};

pub const DEFAULT_NAME_PREFIX: &str = "Zone";

/// Authoritative, insertion-ordered zone collection.
///
/// Ordering contract:
/// - `list()` yields zones in insertion order; a rename keeps the position.
///
/// Every mutating method either applies completely or returns an error with
/// the store untouched.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ZoneStore {
    zones: Vec<Zone>,
}

impl ZoneStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn list(&self) -> &[Zone] {
        &self.zones
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Zone> {
        self.zones.iter().find(|z| z.name() == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.zones.iter().map(Zone::name)
    }

    /// Name the next `add_zone` will try: `Zone {len + 1}`.
    ///
    /// Names freed by deletion are not reused, and a zone that was manually
    /// renamed to this name makes `add_zone` fail with a conflict.
    pub fn next_default_name(&self) -> String {
        format!("{DEFAULT_NAME_PREFIX} {}", self.zones.len() + 1)
    }

    pub fn add_zone(&mut self, vertices: Vec<LonLat>) -> Result<String, ZoneError> {
        let name = self.next_default_name();
        if self.contains(&name) {
            return Err(ZoneError::Conflict { name });
        }
        let zone = Zone::new(name.clone(), vertices)?;
        self.zones.push(zone);
        Ok(name)
    }

    pub fn remove_zone(&mut self, name: &str) -> Result<Zone, ZoneError> {
        let idx = self.position(name).ok_or_else(|| not_found(name))?;
        Ok(self.zones.remove(idx))
    }

    pub fn rename_zone(&mut self, old_name: &str, new_name: &str) -> Result<(), ZoneError> {
        let idx = self.check_rename(old_name, new_name)?;
        self.zones[idx].set_name(new_name.to_string());
        Ok(())
    }

    /// Renames and replaces the geometry of one zone as a single step.
    pub fn commit_edit(
        &mut self,
        old_name: &str,
        new_name: &str,
        vertices: Vec<LonLat>,
    ) -> Result<(), ZoneError> {
        let idx = self.check_rename(old_name, new_name)?;
        let vertices = open_ring(vertices);
        validate_vertices(&vertices)?;

        let zone = &mut self.zones[idx];
        zone.set_name(new_name.to_string());
        zone.set_vertices(vertices);
        Ok(())
    }

    /// Swaps the whole collection, keeping the given order.
    pub fn replace_all(&mut self, zones: Vec<Zone>) -> Result<(), ZoneError> {
        validate_collection(&zones)?;
        self.zones = zones;
        Ok(())
    }

    /// Union of all zone bounds.
    pub fn bounds(&self) -> Option<Aabb2> {
        self.zones
            .iter()
            .filter_map(Zone::bounds)
            .reduce(|acc, b| acc.union(&b))
    }

    pub fn clear(&mut self) {
        self.zones.clear();
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.zones.iter().position(|z| z.name() == name)
    }

    fn check_rename(&self, old_name: &str, new_name: &str) -> Result<usize, ZoneError> {
        let idx = self.position(old_name).ok_or_else(|| not_found(old_name))?;
        if new_name != old_name {
            validate_name(new_name)?;
            if self.contains(new_name) {
                return Err(ZoneError::Conflict {
                    name: new_name.to_string(),
                });
            }
        }
        Ok(idx)
    }
}

/// Checks that `zones` could be held by a store: names unique.
///
/// Individual zones are already valid by construction.
pub fn validate_collection(zones: &[Zone]) -> Result<(), ZoneError> {
    for (i, zone) in zones.iter().enumerate() {
        if zones[..i].iter().any(|z| z.name() == zone.name()) {
            return Err(ZoneError::Format(format!(
                "duplicate zone name \"{}\"",
                zone.name()
            )));
        }
    }
    Ok(())
}

fn not_found(name: &str) -> ZoneError {
    ZoneError::NotFound {
        name: name.to_string(),
    }
}
