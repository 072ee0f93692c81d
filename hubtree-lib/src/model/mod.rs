//! Catalog model
//!
//! Wire summaries as returned by the API and the nodes they materialize
//! into once stored.

mod node;
mod summary;

pub use node::*;
pub use summary::*;
