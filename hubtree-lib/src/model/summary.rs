//! Wire summaries returned by the catalog API

use base64::Engine;
use base64::engine::general_purpose::STANDARD_NO_PAD;
use serde::Deserialize;
use serde::Serialize;

use super::NodeKind;

/// Attributes of hubs and projects.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedAttributes {
    #[serde(default)]
    pub name: String,
}

/// Attributes of folders and items, which may carry a display name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayAttributes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(
        default,
        rename = "displayName",
        skip_serializing_if = "Option::is_none"
    )]
    pub display_name: Option<String>,
}

impl DisplayAttributes {
    /// The display name, falling back to the plain name.
    pub fn label(&self) -> &str {
        self.display_name
            .as_deref()
            .or(self.name.as_deref())
            .unwrap_or_default()
    }
}

/// Attributes of a version.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionAttributes {
    #[serde(rename = "versionNumber")]
    pub version_number: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(
        default,
        rename = "displayName",
        skip_serializing_if = "Option::is_none"
    )]
    pub display_name: Option<String>,
}

/// A hub (top-level account container).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HubSummary {
    pub id: String,
    #[serde(default)]
    pub attributes: NamedAttributes,
}

/// A project owned by a hub.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectSummary {
    pub id: String,
    #[serde(default)]
    pub attributes: NamedAttributes,
}

/// A folder inside a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderSummary {
    pub id: String,
    #[serde(default)]
    pub attributes: DisplayAttributes,
}

/// A document inside a folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemSummary {
    pub id: String,
    #[serde(default)]
    pub attributes: DisplayAttributes,
}

/// A numbered snapshot of an item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionSummary {
    pub id: String,
    pub attributes: VersionAttributes,
}

impl VersionSummary {
    /// Label in the `v{number}: {name}` form.
    pub fn label(&self) -> String {
        let name = self
            .attributes
            .display_name
            .as_deref()
            .or(self.attributes.name.as_deref())
            .unwrap_or_default();
        format!("v{}: {}", self.attributes.version_number, name)
    }

    /// The version id as the unpadded base64 URN the viewer loads.
    pub fn viewer_urn(&self) -> String {
        STANDARD_NO_PAD.encode(self.id.as_bytes())
    }
}

/// One entry of a folder listing, discriminated by the `type` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum FolderEntry {
    #[serde(rename = "folders")]
    Folder(FolderSummary),
    #[serde(rename = "items")]
    Item(ItemSummary),
}

/// Any summary, tagged with the level it was fetched from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Summary {
    Hub(HubSummary),
    Project(ProjectSummary),
    Folder(FolderSummary),
    Item(ItemSummary),
    Version(VersionSummary),
}

impl Summary {
    /// The node kind this summary materializes into.
    pub fn kind(&self) -> NodeKind {
        match self {
            Self::Hub(_) => NodeKind::Hub,
            Self::Project(_) => NodeKind::Project,
            Self::Folder(_) => NodeKind::Folder,
            Self::Item(_) => NodeKind::Item,
            Self::Version(_) => NodeKind::Version,
        }
    }

    /// The remote identifier.
    pub fn remote_id(&self) -> &str {
        match self {
            Self::Hub(s) => &s.id,
            Self::Project(s) => &s.id,
            Self::Folder(s) => &s.id,
            Self::Item(s) => &s.id,
            Self::Version(s) => &s.id,
        }
    }

    /// The human-readable label.
    pub fn label(&self) -> String {
        match self {
            Self::Hub(s) => s.attributes.name.clone(),
            Self::Project(s) => s.attributes.name.clone(),
            Self::Folder(s) => s.attributes.label().to_string(),
            Self::Item(s) => s.attributes.label().to_string(),
            Self::Version(s) => s.label(),
        }
    }
}

impl From<FolderEntry> for Summary {
    fn from(entry: FolderEntry) -> Self {
        match entry {
            FolderEntry::Folder(folder) => Self::Folder(folder),
            FolderEntry::Item(item) => Self::Item(item),
        }
    }
}
