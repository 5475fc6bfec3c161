use serde::{Deserialize, Serialize};

pub type NodeId = String;
pub type EdgeId = String;
pub type CategoryId = String;

pub const DEFAULT_CATEGORY: &str = "default";
pub const FALLBACK_BACKGROUND: &str = "#eeeeee";
pub const FALLBACK_BORDER: &str = "1px solid #9e9e9e";
const NODE_ID_PREFIX: &str = "node-";

/// Formats the id minted from the counter value `n`.
pub fn node_id(n: u64) -> NodeId {
	format!("{NODE_ID_PREFIX}{n}")
}

/// Numeric suffix of a `node-<n>` id, if it has one.
pub fn node_id_suffix(id: &str) -> Option<u64> {
	id.strip_prefix(NODE_ID_PREFIX)?.parse().ok()
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
	pub x: f64,
	pub y: f64,
}

impl Position {
	pub fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}
}

/// What the node face shows: the human label or the formula source.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentMode {
	#[default]
	Label,
	Formula,
}

impl ContentMode {
	pub fn toggled(self) -> Self {
		match self {
			ContentMode::Label => ContentMode::Formula,
			ContentMode::Formula => ContentMode::Label,
		}
	}
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
	pub id: CategoryId,
	pub name: String,
	pub color: String,
}

impl Category {
	pub fn new(id: impl Into<String>, name: impl Into<String>, color: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			name: name.into(),
			color: color.into(),
		}
	}

	/// Accent border for the seed palette colors, gray for anything else.
	pub fn border(&self) -> String {
		let accent = match self.color.to_ascii_uppercase().as_str() {
			"#E3F2FD" => "#2196F3",
			"#FFEBEE" => "#F44336",
			"#E8F5E9" => "#4CAF50",
			_ => "#9e9e9e",
		};
		format!("1px solid {accent}")
	}
}

/// Stored per node; a payload without one decodes to the empty style and is
/// restyled from its category on load.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualStyle {
	pub background: String,
	pub border: String,
	pub width: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NodeData {
	pub label: String,
	pub formula: String,
	pub description: String,
	pub category: CategoryId,
	/// Display mode stamped by the store; rewritten on every load.
	pub content_type: ContentMode,
}

impl Default for NodeData {
	fn default() -> Self {
		Self {
			label: String::new(),
			formula: String::new(),
			description: String::new(),
			category: DEFAULT_CATEGORY.to_string(),
			content_type: ContentMode::default(),
		}
	}
}

impl VisualStyle {
	pub fn is_unset(&self) -> bool {
		self.background.is_empty() || self.width <= 0.0
	}
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Node {
	pub id: NodeId,
	#[serde(default)]
	pub position: Position,
	#[serde(default)]
	pub data: NodeData,
	#[serde(default)]
	pub style: VisualStyle,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
	pub id: EdgeId,
	pub source: NodeId,
	pub target: NodeId,
	/// Kept as written so ids outside the catalog survive a round trip.
	/// Missing on older payloads; the empty id resolves to `derivation`.
	#[serde(default)]
	pub type_id: String,
}

impl Edge {
	pub fn kind(&self) -> EdgeKind {
		EdgeKind::resolve(&self.type_id)
	}
}

/// The fixed catalog of relation kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EdgeKind {
	Derivation,
	Definition,
	Equivalence,
	Association,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArrowMarker {
	Closed,
	Open,
	None,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineKind {
	Straight,
	Step,
}

/// Catalog entry: the styling every edge of one kind shares.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgeType {
	pub kind: EdgeKind,
	pub name: &'static str,
	pub color: &'static str,
	pub dash: Option<(f64, f64)>,
	pub marker: ArrowMarker,
	pub label_text: Option<&'static str>,
	pub line_kind: LineKind,
}

impl EdgeKind {
	pub const ALL: [EdgeKind; 4] = [
		EdgeKind::Derivation,
		EdgeKind::Definition,
		EdgeKind::Equivalence,
		EdgeKind::Association,
	];

	pub fn id(self) -> &'static str {
		match self {
			EdgeKind::Derivation => "derivation",
			EdgeKind::Definition => "definition",
			EdgeKind::Equivalence => "equivalence",
			EdgeKind::Association => "association",
		}
	}

	pub fn from_id(id: &str) -> Option<Self> {
		Self::ALL.into_iter().find(|k| k.id() == id)
	}

	/// Catalog lookup with `derivation` as the fallback for unknown ids.
	pub fn resolve(id: &str) -> Self {
		Self::from_id(id).unwrap_or_else(|| {
			log::debug!("unknown edge type {id:?}, falling back to derivation");
			EdgeKind::Derivation
		})
	}

	pub fn definition(self) -> EdgeType {
		match self {
			EdgeKind::Derivation => EdgeType {
				kind: self,
				name: "導出",
				color: "#555555",
				dash: None,
				marker: ArrowMarker::Closed,
				label_text: None,
				line_kind: LineKind::Straight,
			},
			EdgeKind::Definition => EdgeType {
				kind: self,
				name: "定義",
				color: "#1976D2",
				dash: Some((6.0, 3.0)),
				marker: ArrowMarker::Closed,
				label_text: Some("def"),
				line_kind: LineKind::Straight,
			},
			EdgeKind::Equivalence => EdgeType {
				kind: self,
				name: "等価",
				color: "#388E3C",
				dash: None,
				marker: ArrowMarker::None,
				label_text: Some("⇔"),
				line_kind: LineKind::Straight,
			},
			EdgeKind::Association => EdgeType {
				kind: self,
				name: "関連",
				color: "#9E9E9E",
				dash: Some((2.0, 4.0)),
				marker: ArrowMarker::Open,
				label_text: None,
				line_kind: LineKind::Step,
			},
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn node_id_suffix_parses_only_counter_ids() {
		assert_eq!(node_id_suffix(&node_id(12)), Some(12));
		assert_eq!(node_id_suffix("node-x"), None);
		assert_eq!(node_id_suffix("1"), None);
	}

	#[test]
	fn unknown_edge_type_resolves_to_derivation() {
		assert_eq!(EdgeKind::resolve("equivalence"), EdgeKind::Equivalence);
		assert_eq!(EdgeKind::resolve("citation"), EdgeKind::Derivation);
		assert_eq!(
			EdgeKind::resolve("").definition(),
			EdgeKind::Derivation.definition()
		);
	}

	#[test]
	fn content_mode_uses_lowercase_wire_names() {
		let json = serde_json::to_string(&ContentMode::Formula).unwrap();
		assert_eq!(json, "\"formula\"");
		assert_eq!(ContentMode::Formula.toggled(), ContentMode::Label);
	}
}
