pub mod layer;
pub mod list;
pub mod map;
pub mod symbology;
pub mod zone_layer;

pub use layer::*;
pub use list::{ZoneListEntry, ZoneListView};
pub use map::{InMemoryMap, MapSurface, RenderedPolygon};
pub use symbology::*;
pub use zone_layer::ZoneLayer;
