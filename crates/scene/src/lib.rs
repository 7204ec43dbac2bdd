pub mod editing;
pub mod locate;
pub mod store;
pub mod zone;

pub use editing::*;
pub use locate::*;
pub use store::*;
pub use zone::*;
