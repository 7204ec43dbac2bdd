use foundation::bounds::Aabb2;
use foundation::geo::LonLat;
use foundation::handles::{Handle, HandleAllocator};

use crate::symbology::LayerStyle;

/// The rendering/drawing engine as seen by the zone layer.
///
/// Implementations own the rendered geometry; callers only keep handles.
/// Rings passed in and read back are open (no closing duplicate).
pub trait MapSurface {
    fn add_polygon(&mut self, ring: &[LonLat], label: &str, style: LayerStyle) -> Handle;
    /// Returns `false` for unknown or stale handles.
    fn remove_polygon(&mut self, handle: Handle) -> bool;
    fn clear(&mut self);
    fn set_label(&mut self, handle: Handle, label: &str);
    fn set_editable(&mut self, handle: Handle, editable: bool);
    fn vertices(&self, handle: Handle) -> Option<Vec<LonLat>>;
    fn set_vertices(&mut self, handle: Handle, ring: &[LonLat]);
    fn fit_bounds(&mut self, bounds: Aabb2);
    fn set_view(&mut self, center: LonLat, zoom: u8);
    fn polygon_count(&self) -> usize;
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderedPolygon {
    pub handle: Handle,
    pub ring: Vec<LonLat>,
    pub label: String,
    pub style: LayerStyle,
    pub editable: bool,
}

/// Headless `MapSurface` that keeps rendered polygons in memory.
///
/// Used by tests and by tooling that drives the editor without a map engine.
/// Vertex drags only apply while a polygon is editable, like edit handles.
#[derive(Debug, Default)]
pub struct InMemoryMap {
    handles: HandleAllocator,
    polygons: Vec<RenderedPolygon>,
    view: Option<Aabb2>,
    camera: Option<(LonLat, u8)>,
    fit_count: usize,
}

impl InMemoryMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn polygons(&self) -> &[RenderedPolygon] {
        &self.polygons
    }

    pub fn polygon(&self, handle: Handle) -> Option<&RenderedPolygon> {
        self.polygons.iter().find(|p| p.handle == handle)
    }

    pub fn labels(&self) -> Vec<&str> {
        self.polygons.iter().map(|p| p.label.as_str()).collect()
    }

    pub fn editable_labels(&self) -> Vec<&str> {
        self.polygons
            .iter()
            .filter(|p| p.editable)
            .map(|p| p.label.as_str())
            .collect()
    }

    pub fn view(&self) -> Option<Aabb2> {
        self.view
    }

    /// Last explicit center and zoom.
    pub fn camera(&self) -> Option<(LonLat, u8)> {
        self.camera
    }

    pub fn fit_count(&self) -> usize {
        self.fit_count
    }

    /// Moves one vertex as an edit handle drag would. Returns `false` unless
    /// the polygon exists, is editable and has that vertex.
    pub fn drag_vertex(&mut self, handle: Handle, index: usize, to: LonLat) -> bool {
        let Some(poly) = self.polygons.iter_mut().find(|p| p.handle == handle) else {
            return false;
        };
        if !poly.editable {
            return false;
        }
        match poly.ring.get_mut(index) {
            Some(v) => {
                *v = to;
                true
            }
            None => false,
        }
    }

    fn polygon_mut(&mut self, handle: Handle) -> Option<&mut RenderedPolygon> {
        self.polygons.iter_mut().find(|p| p.handle == handle)
    }
}

impl MapSurface for InMemoryMap {
    fn add_polygon(&mut self, ring: &[LonLat], label: &str, style: LayerStyle) -> Handle {
        let handle = self.handles.alloc();
        self.polygons.push(RenderedPolygon {
            handle,
            ring: ring.to_vec(),
            label: label.to_string(),
            style,
            editable: false,
        });
        handle
    }

    fn remove_polygon(&mut self, handle: Handle) -> bool {
        if !self.handles.release(handle) {
            return false;
        }
        self.polygons.retain(|p| p.handle != handle);
        true
    }

    fn clear(&mut self) {
        self.handles.clear();
        self.polygons.clear();
    }

    fn set_label(&mut self, handle: Handle, label: &str) {
        if let Some(p) = self.polygon_mut(handle) {
            p.label = label.to_string();
        }
    }

    fn set_editable(&mut self, handle: Handle, editable: bool) {
        if let Some(p) = self.polygon_mut(handle) {
            p.editable = editable;
        }
    }

    fn vertices(&self, handle: Handle) -> Option<Vec<LonLat>> {
        self.polygon(handle).map(|p| p.ring.clone())
    }

    fn set_vertices(&mut self, handle: Handle, ring: &[LonLat]) {
        if let Some(p) = self.polygon_mut(handle) {
            p.ring = ring.to_vec();
        }
    }

    fn fit_bounds(&mut self, bounds: Aabb2) {
        self.view = Some(bounds);
        self.fit_count += 1;
    }

    fn set_view(&mut self, center: LonLat, zoom: u8) {
        self.camera = Some((center, zoom));
    }

    fn polygon_count(&self) -> usize {
        self.polygons.len()
    }
}
