//! The persisted unit and its load-time migration.

use serde::{Deserialize, Serialize};

use super::error::{PersistError, PersistResult};
use super::model::{
	Category, ContentMode, DEFAULT_CATEGORY, Edge, EdgeKind, FALLBACK_BACKGROUND, FALLBACK_BORDER,
	Node, NodeData, Position, VisualStyle, node_id, node_id_suffix,
};

pub const NODE_WIDTH: f64 = 150.0;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphDocument {
	pub nodes: Vec<Node>,
	pub edges: Vec<Edge>,
	pub id_count: u64,
	pub categories: Vec<Category>,
}

/// Wire shape accepted on load; older payloads have no `categories`.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredDocument {
	#[serde(default)]
	nodes: Vec<Node>,
	#[serde(default)]
	edges: Vec<Edge>,
	#[serde(default = "first_id")]
	id_count: u64,
	categories: Option<Vec<Category>>,
}

fn first_id() -> u64 {
	1
}

pub fn default_categories() -> Vec<Category> {
	vec![
		Category::new(DEFAULT_CATEGORY, "未分類", FALLBACK_BACKGROUND),
		Category::new("mech", "力学", "#E3F2FD"),
		Category::new("em", "電磁気学", "#FFEBEE"),
		Category::new("therm", "熱力学", "#E8F5E9"),
	]
}

/// Node style for a category id: the category itself, then `default`, then gray.
pub fn style_for_category(categories: &[Category], category: &str, width: f64) -> VisualStyle {
	let found = categories
		.iter()
		.find(|c| c.id == category)
		.or_else(|| categories.iter().find(|c| c.id == DEFAULT_CATEGORY));
	match found {
		Some(c) => VisualStyle {
			background: c.color.clone(),
			border: c.border(),
			width,
		},
		None => VisualStyle {
			background: FALLBACK_BACKGROUND.to_string(),
			border: FALLBACK_BORDER.to_string(),
			width,
		},
	}
}

impl GraphDocument {
	/// Document used when storage holds nothing.
	pub fn seed(mode: ContentMode) -> Self {
		let categories = default_categories();
		let node = |n: u64, x: f64, y: f64, label: &str, formula: &str, description: &str| Node {
			id: node_id(n),
			position: Position::new(x, y),
			data: NodeData {
				label: label.to_string(),
				formula: formula.to_string(),
				description: description.to_string(),
				category: "mech".to_string(),
				content_type: mode,
			},
			style: style_for_category(&categories, "mech", NODE_WIDTH),
		};
		let nodes = vec![
			node(
				1,
				250.0,
				50.0,
				"運動方程式",
				"F = ma",
				"物体に働く力 F は、質量 m と加速度 a の積に等しい。ニュートン力学の基礎。",
			),
			node(
				2,
				100.0,
				200.0,
				"加速度の定義",
				r"a = \frac{dv}{dt}",
				"加速度 a は速度 v の時間微分である。",
			),
		];
		let edges = vec![Edge {
			id: "e2-1".to_string(),
			source: node_id(2),
			target: node_id(1),
			type_id: EdgeKind::Derivation.id().to_string(),
		}];
		Self {
			nodes,
			edges,
			id_count: 3,
			categories,
		}
	}

	pub fn to_json(&self) -> PersistResult<String> {
		serde_json::to_string(self).map_err(PersistError::Encode)
	}

	/// Decodes a stored payload and migrates it: missing categories are
	/// synthesized, every node is stamped with `mode`, and the id counter is
	/// raised past any restored `node-<n>` id.
	pub fn from_json(json: &str, mode: ContentMode) -> PersistResult<Self> {
		let stored: StoredDocument = serde_json::from_str(json).map_err(PersistError::Decode)?;
		let categories = stored.categories.unwrap_or_else(|| {
			log::info!("stored document has no categories, using defaults");
			default_categories()
		});
		let mut doc = Self {
			nodes: stored.nodes,
			edges: stored.edges,
			id_count: stored.id_count,
			categories,
		};
		doc.migrate(mode);
		Ok(doc)
	}

	fn migrate(&mut self, mode: ContentMode) {
		for node in &mut self.nodes {
			node.data.content_type = mode;
			if node.style.is_unset() {
				log::debug!("restyling {} from its category", node.id);
				node.style = style_for_category(&self.categories, &node.data.category, NODE_WIDTH);
			}
		}
		let floor = self
			.nodes
			.iter()
			.filter_map(|n| node_id_suffix(&n.id))
			.max()
			.map_or(1, |max| max + 1);
		if self.id_count < floor {
			log::debug!("raising id counter from {} to {floor}", self.id_count);
			self.id_count = floor;
		}
	}

	pub fn node(&self, id: &str) -> Option<&Node> {
		self.nodes.iter().find(|n| n.id == id)
	}

	pub fn category(&self, id: &str) -> Option<&Category> {
		self.categories.iter().find(|c| c.id == id)
	}
}
