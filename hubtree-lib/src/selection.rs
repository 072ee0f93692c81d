//! Selection emitter

use std::fmt;
use std::sync::Arc;

use crate::model::VersionSummary;

type SelectHandler = Arc<dyn Fn(&VersionSummary) + Send + Sync>;

/// Hands a selected version to a single registered consumer.
///
/// Stateless: every call notifies, duplicates included. Deduplication, if
/// wanted, belongs to the consumer.
#[derive(Clone, Default)]
pub struct SelectionEmitter {
    handler: Option<SelectHandler>,
}

impl SelectionEmitter {
    /// Creates an emitter with no consumer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an emitter that forwards to `handler`.
    pub fn with_handler<F>(handler: F) -> Self
    where
        F: Fn(&VersionSummary) + Send + Sync + 'static,
    {
        Self {
            handler: Some(Arc::new(handler)),
        }
    }

    /// Replaces the consumer.
    pub fn set_handler<F>(&mut self, handler: F)
    where
        F: Fn(&VersionSummary) + Send + Sync + 'static,
    {
        self.handler = Some(Arc::new(handler));
    }

    pub fn has_handler(&self) -> bool {
        self.handler.is_some()
    }

    /// Notifies the consumer of a selected version.
    pub fn notify(&self, version: &VersionSummary) {
        match &self.handler {
            Some(handler) => handler(version),
            None => log::debug!("selected {} with no consumer registered", version.id),
        }
    }
}

impl fmt::Debug for SelectionEmitter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectionEmitter")
            .field("has_handler", &self.handler.is_some())
            .finish()
    }
}
