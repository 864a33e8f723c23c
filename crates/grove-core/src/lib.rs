use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

pub mod authorship;
pub mod error;
pub mod heat;
pub mod settings;
pub mod tree;

pub use authorship::{Authorship, VoiceInfo, VoiceRegistry};
pub use error::GroveError;
pub use heat::Heat;
pub use settings::{
    CanvasSettings, FitSettings, LayoutSettings, REPEL_FORCE_RANGE, TimingSettings,
    TooltipSettings, clamp_repel_force,
};
pub use tree::{Preorder, TreeVisit};

/// Identifier of a thought in the tree. Ids are opaque strings chosen by the
/// document owner and are the identity key for every other structure.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for NodeId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A node of the thinking tree as delivered by the document owner.
///
/// Children are owned by their parent. A tree is always replaced as a whole
/// snapshot and is never patched in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThinkingNode {
    pub id: NodeId,
    #[serde(default, deserialize_with = "string_or_null")]
    pub label: String,
    #[serde(default, deserialize_with = "string_or_null")]
    pub prose: String,
    #[serde(default)]
    pub heat: Heat,
    #[serde(default)]
    pub by: Authorship,
    #[serde(default, deserialize_with = "bool_or_null")]
    pub seen: bool,
    #[serde(default, deserialize_with = "children_or_null")]
    pub children: Vec<ThinkingNode>,
}

impl ThinkingNode {
    pub fn new(id: impl Into<NodeId>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            prose: String::new(),
            heat: Heat::default(),
            by: Authorship::default(),
            seen: false,
            children: Vec::new(),
        }
    }

    pub fn with_prose(mut self, prose: impl Into<String>) -> Self {
        self.prose = prose.into();
        self
    }

    pub fn with_heat(mut self, heat: Heat) -> Self {
        self.heat = heat;
        self
    }

    pub fn with_by(mut self, by: Authorship) -> Self {
        self.by = by;
        self
    }

    pub fn with_seen(mut self, seen: bool) -> Self {
        self.seen = seen;
        self
    }

    pub fn with_child(mut self, child: ThinkingNode) -> Self {
        self.children.push(child);
        self
    }
}

/// Non-hierarchical relation between two thoughts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrossEdge {
    pub source: NodeId,
    pub target: NodeId,
    #[serde(default, deserialize_with = "string_or_null")]
    pub label: String,
}

impl CrossEdge {
    pub fn new(
        source: impl Into<NodeId>,
        target: impl Into<NodeId>,
        label: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            label: label.into(),
        }
    }
}

/// Everything the canvas consumes from the document collaborator in one
/// update: the tree (absent for an empty document) and its cross-edges.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentSnapshot {
    #[serde(default)]
    pub tree: Option<ThinkingNode>,
    #[serde(default, deserialize_with = "edges_or_null")]
    pub edges: Vec<CrossEdge>,
}

impl DocumentSnapshot {
    pub fn new(tree: Option<ThinkingNode>, edges: Vec<CrossEdge>) -> Self {
        Self { tree, edges }
    }

    pub fn from_json(raw: &str) -> Result<Self, GroveError> {
        serde_json::from_str(raw).map_err(GroveError::Snapshot)
    }

    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self, GroveError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| GroveError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&raw)
    }
}

fn string_or_null<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn bool_or_null<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or_default())
}

fn children_or_null<'de, D>(deserializer: D) -> Result<Vec<ThinkingNode>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<ThinkingNode>>::deserialize(deserializer)?.unwrap_or_default())
}

fn edges_or_null<'de, D>(deserializer: D) -> Result<Vec<CrossEdge>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<CrossEdge>>::deserialize(deserializer)?.unwrap_or_default())
}
