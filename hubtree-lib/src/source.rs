//! The DataSource contract
//!
//! One method per hierarchy transition. Implementations are pure remote
//! reads with no caching and no retries.

use async_trait::async_trait;

use crate::error::ApiError;
use crate::model::FolderEntry;
use crate::model::FolderSummary;
use crate::model::HubSummary;
use crate::model::ProjectSummary;
use crate::model::Summary;
use crate::model::VersionSummary;

/// Fetches one level of the catalog given the parent's identity.
///
/// Empty lists are a valid result. Failures carry enough information for
/// [`ApiError::is_transient`] to classify them.
#[async_trait]
pub trait DataSource: Send + Sync {
    async fn fetch_hubs(&self) -> Result<Vec<HubSummary>, ApiError>;

    async fn fetch_projects(&self, hub_id: &str) -> Result<Vec<ProjectSummary>, ApiError>;

    async fn fetch_top_folders(
        &self,
        hub_id: &str,
        project_id: &str,
    ) -> Result<Vec<FolderSummary>, ApiError>;

    async fn fetch_folder_contents(
        &self,
        hub_id: &str,
        project_id: &str,
        folder_id: &str,
    ) -> Result<Vec<FolderEntry>, ApiError>;

    async fn fetch_versions(
        &self,
        hub_id: &str,
        project_id: &str,
        item_id: &str,
    ) -> Result<Vec<VersionSummary>, ApiError>;
}

/// The call needed to load a node's children, with its full scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchRequest {
    Projects {
        hub_id: String,
    },
    TopFolders {
        hub_id: String,
        project_id: String,
    },
    FolderContents {
        hub_id: String,
        project_id: String,
        folder_id: String,
    },
    Versions {
        hub_id: String,
        project_id: String,
        item_id: String,
    },
}

impl FetchRequest {
    /// Short name of the call, for logging.
    pub fn method(&self) -> &'static str {
        match self {
            Self::Projects { .. } => "fetch_projects",
            Self::TopFolders { .. } => "fetch_top_folders",
            Self::FolderContents { .. } => "fetch_folder_contents",
            Self::Versions { .. } => "fetch_versions",
        }
    }

    /// Issues the call and tags each result with the level it came from.
    ///
    /// Top-level project contents are always folders. Folder listings keep
    /// the per-entry discriminator.
    pub async fn run(&self, source: &dyn DataSource) -> Result<Vec<Summary>, ApiError> {
        let summaries = match self {
            Self::Projects { hub_id } => source
                .fetch_projects(hub_id)
                .await?
                .into_iter()
                .map(Summary::Project)
                .collect(),
            Self::TopFolders { hub_id, project_id } => source
                .fetch_top_folders(hub_id, project_id)
                .await?
                .into_iter()
                .map(Summary::Folder)
                .collect(),
            Self::FolderContents {
                hub_id,
                project_id,
                folder_id,
            } => source
                .fetch_folder_contents(hub_id, project_id, folder_id)
                .await?
                .into_iter()
                .map(Summary::from)
                .collect(),
            Self::Versions {
                hub_id,
                project_id,
                item_id,
            } => source
                .fetch_versions(hub_id, project_id, item_id)
                .await?
                .into_iter()
                .map(Summary::Version)
                .collect(),
        };
        Ok(summaries)
    }
}
