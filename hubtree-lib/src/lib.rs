//! Lazy catalog browser
//!
//! Exposes a remote hub → project → folder → item → version catalog as a
//! tree whose levels are fetched on demand and cached. A failed level only
//! affects its own node.

pub mod auth;
pub mod controller;
pub mod error;
pub mod model;
pub mod selection;
pub mod source;
pub mod store;

mod client;

pub use client::*;
pub use controller::ExpansionController;
pub use controller::ToggleOutcome;
pub use selection::SelectionEmitter;
pub use source::DataSource;
pub use store::TreeStore;
