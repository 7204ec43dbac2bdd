pub mod event_bus;
pub mod indicator;
pub mod revision;

pub use event_bus::*;
pub use indicator::*;
pub use revision::*;
