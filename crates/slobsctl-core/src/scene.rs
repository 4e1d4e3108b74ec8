//! Scene graph records: scenes, items, folders and selections.
//!
//! A scene contains nodes; a node is either an item (a visible source) or a
//! folder grouping other nodes. Every record carries a `resourceId`, the
//! opaque handle the remote expects as the target of subsequent calls.

use serde::{Deserialize, Serialize};

/// Discriminator between the two scene node flavors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SceneNodeKind {
    Item,
    Folder,
}

/// A scene in the active scene collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    /// Remote type tag (`"Scene"`).
    #[serde(rename = "_type", default)]
    pub type_tag: String,

    /// Handle for calls targeting this scene (e.g. `getItems`).
    pub resource_id: String,

    /// Stable scene id, the argument to `makeSceneActive`.
    pub id: String,

    /// Display name; lookups match this exactly, case-sensitive.
    pub name: String,

    /// Child nodes of the scene.
    #[serde(default)]
    pub nodes: Vec<SceneNode>,
}

/// A node as embedded in a [`Scene`]'s `nodes` list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneNode {
    pub id: String,

    #[serde(default)]
    pub parent_id: String,

    #[serde(default)]
    pub scene_id: String,

    pub scene_node_type: SceneNodeKind,

    #[serde(default)]
    pub children_ids: Vec<String>,

    /// Source backing the node; empty for folders.
    #[serde(default)]
    pub source_id: String,

    /// Items only; folders have no own visibility.
    #[serde(default)]
    pub visible: bool,
}

/// A scene item (source placed in a scene), as returned by `getItems`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneItem {
    /// Remote type tag (`"SceneItem"`).
    #[serde(rename = "_type", default)]
    pub type_tag: String,

    /// Handle for calls targeting this item (e.g. `setVisibility`).
    pub resource_id: String,

    pub id: String,

    pub name: String,

    #[serde(default)]
    pub parent_id: String,

    #[serde(default)]
    pub scene_id: String,

    #[serde(default)]
    pub source_id: String,

    #[serde(default)]
    pub scene_node_type: Option<SceneNodeKind>,

    pub visible: bool,

    #[serde(default)]
    pub locked: bool,
}

/// A scene folder, as returned by `getFolders`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneFolder {
    /// Remote type tag (`"SceneItemFolder"`).
    #[serde(rename = "_type", default)]
    pub type_tag: String,

    /// Handle for calls targeting this folder (e.g. `getSelection`).
    pub resource_id: String,

    pub id: String,

    pub name: String,

    #[serde(default)]
    pub parent_id: String,

    #[serde(default)]
    pub scene_id: String,

    #[serde(default)]
    pub scene_node_type: Option<SceneNodeKind>,

    #[serde(default)]
    pub children_ids: Vec<String>,
}

/// A selection over scene nodes.
///
/// The remote resolves a folder's members into one of these; a single
/// mutation against `resource_id` (e.g. `setVisibility`) then applies to all
/// selected nodes atomically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    /// Remote type tag (`"Selection"`).
    #[serde(rename = "_type", default)]
    pub type_tag: String,

    /// Handle for calls applied to the whole selection.
    pub resource_id: String,

    #[serde(default)]
    pub selected_ids: Vec<String>,

    #[serde(default)]
    pub last_selected_id: Option<String>,
}
