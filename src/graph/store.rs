use super::document::{GraphDocument, NODE_WIDTH, style_for_category};
use super::model::{
	Category, CategoryId, ContentMode, DEFAULT_CATEGORY, Edge, EdgeId, EdgeKind, Node, NodeData,
	NodeId, Position, node_id,
};

pub const NEW_NODE_LABEL: &str = "新しい法則";
pub const NEW_NODE_FORMULA: &str = "x = ?";
pub const NEW_NODE_DESCRIPTION: &str = "ここに解説を入力してください。";

/// Sole owner of the graph document. Every mutation goes through here.
///
/// Operations never fail; the returned `bool` reports whether anything changed,
/// which is what the caller uses to decide whether a save is due.
#[derive(Clone, Debug)]
pub struct GraphStore {
	doc: GraphDocument,
	node_width: f64,
	last_category_stamp: u64,
}

impl GraphStore {
	pub fn new(doc: GraphDocument) -> Self {
		Self::with_node_width(doc, NODE_WIDTH)
	}

	pub fn with_node_width(doc: GraphDocument, node_width: f64) -> Self {
		Self {
			doc,
			node_width,
			last_category_stamp: 0,
		}
	}

	pub fn document(&self) -> &GraphDocument {
		&self.doc
	}

	pub fn nodes(&self) -> &[Node] {
		&self.doc.nodes
	}

	pub fn edges(&self) -> &[Edge] {
		&self.doc.edges
	}

	pub fn categories(&self) -> &[Category] {
		&self.doc.categories
	}

	pub fn id_count(&self) -> u64 {
		self.doc.id_count
	}

	pub fn node(&self, id: &str) -> Option<&Node> {
		self.doc.node(id)
	}

	pub fn edge(&self, id: &str) -> Option<&Edge> {
		self.doc.edges.iter().find(|e| e.id == id)
	}

	/// Replaces the whole document, e.g. after an import.
	pub fn replace(&mut self, doc: GraphDocument) {
		self.doc = doc;
	}

	pub fn add_node(&mut self, position: Position, mode: ContentMode) -> NodeId {
		let id = node_id(self.doc.id_count);
		let data = NodeData {
			label: NEW_NODE_LABEL.to_string(),
			formula: NEW_NODE_FORMULA.to_string(),
			description: NEW_NODE_DESCRIPTION.to_string(),
			category: DEFAULT_CATEGORY.to_string(),
			content_type: mode,
		};
		let style = style_for_category(&self.doc.categories, &data.category, self.node_width);
		self.doc.nodes.push(Node {
			id: id.clone(),
			position,
			data,
			style,
		});
		self.doc.id_count += 1;
		log::debug!("added node {id}");
		id
	}

	/// Removes the node only; edges that reference it are left in place.
	pub fn delete_node(&mut self, id: &str) -> bool {
		let before = self.doc.nodes.len();
		self.doc.nodes.retain(|n| n.id != id);
		before != self.doc.nodes.len()
	}

	pub fn move_node(&mut self, id: &str, position: Position) -> bool {
		match self.doc.nodes.iter_mut().find(|n| n.id == id) {
			Some(node) if node.position != position => {
				node.position = position;
				true
			}
			_ => false,
		}
	}

	pub fn update_node_data(&mut self, id: &str, data: NodeData) -> bool {
		let style = style_for_category(&self.doc.categories, &data.category, self.node_width);
		let Some(node) = self.doc.nodes.iter_mut().find(|n| n.id == id) else {
			return false;
		};
		node.data = data;
		node.style = style;
		true
	}

	/// Appends a `derivation` edge. The id comes from the connection gesture.
	pub fn add_edge(&mut self, id: EdgeId, source: NodeId, target: NodeId) -> EdgeId {
		log::debug!("connected {source} -> {target} as {id}");
		self.doc.edges.push(Edge {
			id: id.clone(),
			source,
			target,
			type_id: EdgeKind::Derivation.id().to_string(),
		});
		id
	}

	pub fn delete_edge(&mut self, id: &str) -> bool {
		let before = self.doc.edges.len();
		self.doc.edges.retain(|e| e.id != id);
		before != self.doc.edges.len()
	}

	/// Writes the type id as given; unknown ids resolve at projection time.
	pub fn set_edge_type(&mut self, id: &str, type_id: &str) -> bool {
		match self.doc.edges.iter_mut().find(|e| e.id == id) {
			Some(edge) if edge.type_id != type_id => {
				edge.type_id = type_id.to_string();
				true
			}
			_ => false,
		}
	}

	/// Replaces a category with a matching id in place, or appends the
	/// candidate under a fresh id derived from `stamp` (milliseconds).
	pub fn upsert_category(&mut self, candidate: Category, stamp: u64) -> CategoryId {
		if let Some(existing) = self.doc.categories.iter_mut().find(|c| c.id == candidate.id) {
			*existing = candidate;
			return existing.id.clone();
		}
		let mut stamp = stamp.max(self.last_category_stamp + 1);
		while self.doc.category(&format!("cat-{stamp}")).is_some() {
			stamp += 1;
		}
		self.last_category_stamp = stamp;
		let id = format!("cat-{stamp}");
		self.doc.categories.push(Category { id: id.clone(), ..candidate });
		log::debug!("created category {id}");
		id
	}

	/// Removes a category from the catalog without touching nodes that
	/// reference it. `default` is never removed.
	pub fn delete_category(&mut self, id: &str) -> bool {
		if id == DEFAULT_CATEGORY {
			log::warn!("refusing to delete the default category");
			return false;
		}
		let before = self.doc.categories.len();
		self.doc.categories.retain(|c| c.id != id);
		before != self.doc.categories.len()
	}

	pub fn set_node_content_type(&mut self, mode: ContentMode) -> bool {
		let mut changed = false;
		for node in &mut self.doc.nodes {
			changed |= node.data.content_type != mode;
			node.data.content_type = mode;
		}
		changed
	}
}
