//! Error types
//!
//! Fetch failures end up as node state, so browser operations only fail
//! with a [`TreeError`]. [`ApiError`] is what a [`DataSource`] reports.
//!
//! [`DataSource`]: crate::DataSource

mod api;
mod auth;
mod tree;

pub use api::*;
pub use auth::*;
pub use tree::*;
