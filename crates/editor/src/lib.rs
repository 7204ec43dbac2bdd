//! Zone editor orchestration.
//!
//! `ZoneEditor` owns the zone store, the editing session and both views, and
//! turns user events into store mutations followed by a full view re-sync.

pub mod config;
pub mod editor;
pub mod error;
pub mod transport;

pub use config::EditorConfig;
pub use editor::{Completion, ImportTicket, SaveTicket, ZoneEditor};
pub use error::EditorError;
pub use transport::{BoxFuture, HttpTransport, MemoryTransport, TransportError, ZonesTransport};
