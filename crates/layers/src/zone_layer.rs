use foundation::bounds::Aabb2;
use foundation::geo::{LonLat, open_ring};
use foundation::handles::Handle;
use scene::{EditSurface, Zone, ZoneError, ZoneStore};

use crate::layer::{Layer, LayerId};
use crate::map::MapSurface;
use crate::symbology::{IMPORTED_ZONE_STYLE, LayerStyle, ZONE_STYLE};

/// Keeps the rendered polygons of a `MapSurface` in step with a `ZoneStore`.
///
/// Handles are mapped by zone name; the store never sees them. Mapping order
/// mirrors store order after every full rebuild.
#[derive(Debug)]
pub struct ZoneLayer<M> {
    id: LayerId,
    map: M,
    handles: Vec<(String, Handle)>,
}

impl<M: MapSurface> ZoneLayer<M> {
    pub fn new(id: u64, map: M) -> Self {
        Self {
            id: LayerId(id),
            map,
            handles: Vec::new(),
        }
    }

    pub fn map(&self) -> &M {
        &self.map
    }

    pub fn map_mut(&mut self) -> &mut M {
        &mut self.map
    }

    pub fn into_map(self) -> M {
        self.map
    }

    pub fn handle_for(&self, name: &str) -> Option<Handle> {
        self.handles
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, h)| *h)
    }

    pub fn zone_for(&self, handle: Handle) -> Option<&str> {
        self.handles
            .iter()
            .find(|(_, h)| *h == handle)
            .map(|(n, _)| n.as_str())
    }

    pub fn rendered_count(&self) -> usize {
        self.map.polygon_count()
    }

    /// A completed draw gesture: registers the zone, then renders it.
    ///
    /// Nothing is rendered when the store rejects the ring or the default name.
    pub fn on_draw_created(
        &mut self,
        store: &mut ZoneStore,
        ring: Vec<LonLat>,
    ) -> Result<String, ZoneError> {
        let name = store.add_zone(ring)?;
        if let Some(zone) = store.get(&name) {
            self.render_zone(zone, ZONE_STYLE);
        }
        Ok(name)
    }

    /// A delete gesture on a rendered polygon.
    pub fn on_deleted(
        &mut self,
        store: &mut ZoneStore,
        handle: Handle,
    ) -> Result<Zone, ZoneError> {
        let Some(name) = self.zone_for(handle).map(str::to_string) else {
            return Err(ZoneError::NotFound {
                name: format!("<handle {}:{}>", handle.index(), handle.generation()),
            });
        };
        let removed = store.remove_zone(&name)?;
        self.map.remove_polygon(handle);
        self.handles.retain(|(_, h)| *h != handle);
        Ok(removed)
    }

    /// Bulk replace: the store is swapped first so a rejected collection
    /// leaves both the store and the rendered layers untouched.
    pub fn import(&mut self, store: &mut ZoneStore, zones: Vec<Zone>) -> Result<(), ZoneError> {
        store.replace_all(zones)?;
        self.rebuild_with(store, IMPORTED_ZONE_STYLE);
        Ok(())
    }

    pub fn reset(&mut self) {
        self.map.clear();
        self.handles.clear();
    }

    /// Clears every rendered polygon and renders the store again, then fits
    /// the view to all zones when there are any.
    fn rebuild_with(&mut self, store: &ZoneStore, style: LayerStyle) {
        self.reset();
        for zone in store.list() {
            self.render_zone(zone, style);
        }
        if let Some(bounds) = store.bounds() {
            self.map.fit_bounds(bounds);
        }
    }

    fn render_zone(&mut self, zone: &Zone, style: LayerStyle) {
        let handle = self.map.add_polygon(zone.vertices(), zone.name(), style);
        self.handles.push((zone.name().to_string(), handle));
    }
}

impl<M: MapSurface> EditSurface for ZoneLayer<M> {
    fn is_rendered(&self, name: &str) -> bool {
        self.handle_for(name)
            .is_some_and(|h| self.map.vertices(h).is_some())
    }

    fn disable_all_editing(&mut self) {
        for (_, handle) in &self.handles {
            self.map.set_editable(*handle, false);
        }
    }

    fn enable_editing(&mut self, name: &str) {
        if let Some(handle) = self.handle_for(name) {
            self.map.set_editable(handle, true);
        }
    }

    fn focus(&mut self, name: &str) {
        let bounds = self
            .handle_for(name)
            .and_then(|h| self.map.vertices(h))
            .and_then(|ring| Aabb2::from_points(&ring));
        if let Some(bounds) = bounds {
            self.map.fit_bounds(bounds);
        }
    }

    fn read_vertices(&self, name: &str) -> Option<Vec<LonLat>> {
        let handle = self.handle_for(name)?;
        self.map.vertices(handle).map(open_ring)
    }

    fn restore_vertices(&mut self, name: &str, vertices: &[LonLat]) {
        if let Some(handle) = self.handle_for(name) {
            self.map.set_vertices(handle, vertices);
        }
    }

    fn relabel(&mut self, old_name: &str, new_name: &str) {
        let Some(entry) = self.handles.iter_mut().find(|(n, _)| n == old_name) else {
            return;
        };
        entry.0 = new_name.to_string();
        let handle = entry.1;
        self.map.set_label(handle, new_name);
    }
}

impl<M> Layer for ZoneLayer<M> {
    fn id(&self) -> LayerId {
        self.id
    }
}
