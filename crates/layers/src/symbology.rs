#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LayerStyle {
    pub visible: bool,
    pub color: [f32; 4],
    /// Stroke width in pixels.
    pub weight: f32,
}

/// Drawn zones: `#bada55`.
pub const ZONE_STYLE: LayerStyle = LayerStyle::new(true, [0.729, 0.855, 0.333, 1.0], 3.0);

/// Zones loaded from a document, matching the map engine's default path colour.
pub const IMPORTED_ZONE_STYLE: LayerStyle = LayerStyle::new(true, [0.2, 0.533, 1.0, 1.0], 3.0);

impl LayerStyle {
    pub const fn new(visible: bool, color: [f32; 4], weight: f32) -> Self {
        Self {
            visible,
            color,
            weight,
        }
    }
}

impl Default for LayerStyle {
    fn default() -> Self {
        ZONE_STYLE
    }
}
