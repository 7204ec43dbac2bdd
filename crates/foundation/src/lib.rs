pub mod bounds;
pub mod geo;
pub mod handles;
pub mod measure;

// Foundation crate: small, well-tested primitives only.
pub use bounds::*;
pub use geo::*;
pub use handles::*;
pub use measure::*;
