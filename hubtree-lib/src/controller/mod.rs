//! Expansion controller
//!
//! Drives the per-node state machine: decides with [`transition`], fetches
//! through the [`DataSource`] and writes results through the [`TreeStore`].
//!
//! The store lock is never held across an `.await`, so toggles and fetch
//! completions can interleave freely while each store operation stays
//! atomic.

mod transition;

pub use transition::Effect;
pub use transition::Event;
pub use transition::transition;

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;

use tokio::sync::broadcast;

use crate::error::ApiError;
use crate::error::FailureKind;
use crate::error::TreeError;
use crate::model::NodeId;
use crate::model::NodeState;
use crate::model::ResourceNode;
use crate::model::VersionSummary;
use crate::selection::SelectionEmitter;
use crate::source::DataSource;
use crate::store::RootState;
use crate::store::StoreEvent;
use crate::store::TreeStore;
use crate::store::VisibleRow;

/// What a toggle or collapse ended up doing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// Nothing changed: the node was loading, or another task owns the
    /// fetch.
    Ignored,
    /// The node is now expanded.
    Expanded {
        /// `false` when the cache was reused.
        fetched: bool,
    },
    Collapsed,
    /// Children were fetched but the node had been collapsed meanwhile.
    CachedCollapsed,
    /// The fetch failed and the node is in the error state.
    Failed { message: String, kind: FailureKind },
    /// A version was handed to the selection emitter.
    Selected(VersionSummary),
}

/// The lazy catalog browser.
///
/// # Example
///
/// ```ignore
/// use std::sync::Arc;
/// use hubtree_lib::{CatalogClient, ExpansionController, SelectionEmitter};
///
/// let client = CatalogClient::builder()
///     .url("http://localhost:8080")
///     .token_provider(provider)
///     .build();
/// let emitter = SelectionEmitter::with_handler(|v| println!("load {}", v.viewer_urn()));
/// let browser = ExpansionController::open(Arc::new(client), emitter).await;
///
/// for hub in browser.roots()? {
///     browser.toggle(hub).await?;
/// }
/// ```
pub struct ExpansionController {
    source: Arc<dyn DataSource>,
    store: Mutex<TreeStore>,
    emitter: SelectionEmitter,
}

impl ExpansionController {
    /// Creates a controller without loading anything.
    pub fn new(source: Arc<dyn DataSource>, emitter: SelectionEmitter) -> Self {
        Self {
            source,
            store: Mutex::new(TreeStore::new()),
            emitter,
        }
    }

    /// Creates a controller and loads the hub list.
    ///
    /// A failed hub fetch does not fail construction; it leaves the tree in
    /// [`RootState::Error`], retryable with [`retry_roots`](Self::retry_roots).
    pub async fn open(source: Arc<dyn DataSource>, emitter: SelectionEmitter) -> Self {
        let controller = Self::new(source, emitter);
        controller.load_roots().await;
        controller
    }

    /// Re-attempts the hub fetch after a failure.
    ///
    /// Does nothing once hubs are loaded.
    pub async fn retry_roots(&self) -> RootState {
        self.load_roots().await
    }

    async fn load_roots(&self) -> RootState {
        if !self.store().begin_root_fetch() {
            return self.root_state();
        }

        log::debug!("fetch_hubs");
        match self.source.fetch_hubs().await {
            Ok(hubs) => {
                log::debug!("fetch_hubs returned {} hubs", hubs.len());
                self.store().commit_roots(hubs);
            }
            Err(e) => {
                log::warn!("fetch_hubs failed: {}", e);
                self.store().commit_roots_error(e.to_string());
            }
        }
        self.root_state()
    }

    // =========================================================================
    // Read access
    // =========================================================================

    fn store(&self) -> MutexGuard<'_, TreeStore> {
        // Store operations never panic mid-update, so a poisoned lock still
        // holds a consistent tree.
        self.store.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Runs `f` with read-only access to the store.
    pub fn with_store<R>(&self, f: impl FnOnce(&TreeStore) -> R) -> R {
        f(&self.store())
    }

    pub fn root_state(&self) -> RootState {
        self.store().root_state().clone()
    }

    /// Hub ids, or the reason they are unavailable.
    pub fn roots(&self) -> Result<Vec<NodeId>, TreeError> {
        let store = self.store();
        match store.root_state() {
            RootState::Ready => Ok(store.roots().to_vec()),
            RootState::Error(msg) => Err(TreeError::RootsUnavailable(msg.clone())),
            RootState::Unloaded | RootState::Loading => {
                Err(TreeError::RootsUnavailable("not loaded yet".to_string()))
            }
        }
    }

    /// Snapshot of a node.
    pub fn node(&self, id: NodeId) -> Result<ResourceNode, TreeError> {
        self.store().get_node(id).cloned()
    }

    pub fn visible_rows(&self) -> Vec<VisibleRow> {
        self.store().visible_rows()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.store().subscribe()
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// Toggles a node: expand (fetching if needed), collapse, retry after an
    /// error, or select a version.
    pub async fn toggle(&self, id: NodeId) -> Result<ToggleOutcome, TreeError> {
        self.dispatch(id, Event::Toggle).await
    }

    /// Collapses a node.
    ///
    /// Unlike a toggle this also works on a loading node: the fetch still
    /// completes and fills the cache, but the node stays collapsed.
    pub async fn collapse(&self, id: NodeId) -> Result<ToggleOutcome, TreeError> {
        self.dispatch(id, Event::Collapse).await
    }

    async fn dispatch(&self, id: NodeId, event: Event) -> Result<ToggleOutcome, TreeError> {
        let mut queue = VecDeque::from([event]);
        let mut outcome = ToggleOutcome::Ignored;

        while let Some(event) = queue.pop_front() {
            let effects = {
                let store = self.store();
                transition(store.get_node(id)?, event)
            };

            for effect in effects {
                match effect {
                    Effect::BeginFetch => {
                        let request = {
                            let mut store = self.store();
                            let Some(request) = store.fetch_request(id)? else {
                                continue;
                            };
                            if !store.begin_fetch(id)? {
                                continue;
                            }
                            request
                        };

                        log::debug!("{} for {} ({:?})", request.method(), id, request);
                        let result = request.run(self.source.as_ref()).await;
                        queue.push_back(match result {
                            Ok(children) => Event::FetchSucceeded(children),
                            Err(e) => Event::FetchFailed(e),
                        });
                    }
                    Effect::ExpandCached => {
                        if self.store().expand_cached(id)? {
                            outcome = ToggleOutcome::Expanded { fetched: false };
                        }
                    }
                    Effect::Collapse => {
                        let mut store = self.store();
                        store.collapse(id)?;
                        if store.get_node(id)?.state == NodeState::Collapsed {
                            outcome = ToggleOutcome::Collapsed;
                        }
                    }
                    Effect::Select(version) => {
                        log::debug!("selected version {}", version.id);
                        self.emitter.notify(&version);
                        outcome = ToggleOutcome::Selected(version);
                    }
                    Effect::CommitChildren(children) => {
                        let mut store = self.store();
                        let ids = store.commit_children(id, children)?;
                        log::debug!("{} loaded {} children", id, ids.len());
                        outcome = match store.get_node(id)?.state {
                            NodeState::Expanded => ToggleOutcome::Expanded { fetched: true },
                            _ => ToggleOutcome::CachedCollapsed,
                        };
                    }
                    Effect::CommitError(error) => {
                        log::warn!("fetch for {} failed: {}", id, error);
                        outcome = failed(&error);
                        self.store().commit_error(id, error.to_string())?;
                    }
                }
            }
        }

        Ok(outcome)
    }
}

fn failed(error: &ApiError) -> ToggleOutcome {
    ToggleOutcome::Failed {
        message: error.to_string(),
        kind: error.kind(),
    }
}

impl std::fmt::Debug for ExpansionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (nodes, root_state) = {
            let store = self.store();
            (store.len(), store.root_state().clone())
        };
        f.debug_struct("ExpansionController")
            .field("nodes", &nodes)
            .field("root_state", &root_state)
            .field("emitter", &self.emitter)
            .finish()
    }
}
