//! Render-ready views derived from the document and session state.
//!
//! Everything here is a pure function of its inputs: nothing is cached and the
//! store is only ever borrowed immutably.

use super::document::{GraphDocument, style_for_category};
use super::model::{ContentMode, EdgeId, EdgeType, NodeId, Position, VisualStyle};
use super::relations::RelationInfo;

const MUTED_STROKE: &str = "#cfcfcf";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeClass {
	Selected,
	Highlighted,
	Dimmed,
}

/// What the node face renders, keyed by the node's display mode.
#[derive(Clone, Debug, PartialEq)]
pub enum NodeContent {
	Label(String),
	/// Formula markup, handed untouched to the typesetter.
	Formula(String),
}

impl NodeContent {
	pub fn text(&self) -> &str {
		match self {
			NodeContent::Label(s) | NodeContent::Formula(s) => s,
		}
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct NodeView {
	pub id: NodeId,
	pub position: Position,
	pub style: VisualStyle,
	pub class: Option<NodeClass>,
	pub content: NodeContent,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Emphasis {
	pub stroke_width: f64,
	pub opacity: f64,
	pub muted: bool,
}

impl Emphasis {
	pub const FULL: Emphasis = Emphasis {
		stroke_width: 2.0,
		opacity: 1.0,
		muted: false,
	};
	pub const MUTED: Emphasis = Emphasis {
		stroke_width: 1.0,
		opacity: 0.25,
		muted: true,
	};
}

#[derive(Clone, Debug, PartialEq)]
pub struct EdgeView {
	pub id: EdgeId,
	pub source: NodeId,
	pub target: NodeId,
	pub edge_type: EdgeType,
	pub emphasis: Emphasis,
	pub selected: bool,
	/// An endpoint no longer exists.
	pub broken: bool,
}

impl EdgeView {
	pub fn stroke(&self) -> &'static str {
		if self.emphasis.muted {
			MUTED_STROKE
		} else {
			self.edge_type.color
		}
	}

	pub fn label(&self) -> Option<&'static str> {
		self.edge_type.label_text
	}
}

/// Node views in document order. While `dragging`, classes are left off.
pub fn project_nodes(
	doc: &GraphDocument,
	focal: Option<&str>,
	info: &RelationInfo,
	dragging: bool,
) -> Vec<NodeView> {
	doc.nodes
		.iter()
		.map(|node| {
			let class = if dragging {
				None
			} else if focal == Some(node.id.as_str()) {
				Some(NodeClass::Selected)
			} else if info.is_highlighted(&node.id) {
				Some(NodeClass::Highlighted)
			} else if focal.is_some() {
				Some(NodeClass::Dimmed)
			} else {
				None
			};
			let content = match node.data.content_type {
				ContentMode::Label => NodeContent::Label(node.data.label.clone()),
				ContentMode::Formula => NodeContent::Formula(node.data.formula.clone()),
			};
			NodeView {
				id: node.id.clone(),
				position: node.position,
				style: style_for_category(&doc.categories, &node.data.category, node.style.width),
				class,
				content,
			}
		})
		.collect()
}

pub fn project_edges(
	doc: &GraphDocument,
	info: &RelationInfo,
	selected_edge: Option<&str>,
) -> Vec<EdgeView> {
	doc.edges
		.iter()
		.map(|edge| {
			let emphasis = if info.is_highlighted(&edge.source) && info.is_highlighted(&edge.target)
			{
				Emphasis::FULL
			} else {
				Emphasis::MUTED
			};
			EdgeView {
				id: edge.id.clone(),
				source: edge.source.clone(),
				target: edge.target.clone(),
				edge_type: edge.kind().definition(),
				emphasis,
				selected: selected_edge == Some(edge.id.as_str()),
				broken: doc.node(&edge.source).is_none() || doc.node(&edge.target).is_none(),
			}
		})
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::graph::model::{Edge, EdgeKind, FALLBACK_BACKGROUND};
	use crate::graph::relations::relations;

	fn seed() -> GraphDocument {
		GraphDocument::seed(ContentMode::Label)
	}

	#[test]
	fn nothing_dimmed_without_focus() {
		let doc = seed();
		let info = relations(&doc.nodes, &doc.edges, None);
		let nodes = project_nodes(&doc, None, &info, false);
		assert!(nodes.iter().all(|n| n.class == Some(NodeClass::Highlighted)));
		let edges = project_edges(&doc, &info, None);
		assert!(edges.iter().all(|e| e.emphasis == Emphasis::FULL));
	}

	#[test]
	fn focus_selects_highlights_and_dims() {
		let mut doc = seed();
		let mut extra = doc.nodes[0].clone();
		extra.id = "node-3".into();
		doc.nodes.push(extra);
		doc.edges.push(Edge {
			id: "e3-2".into(),
			source: "node-3".into(),
			target: "node-2".into(),
			type_id: "association".into(),
		});
		let info = relations(&doc.nodes, &doc.edges, Some("node-1"));
		let classes: Vec<_> = project_nodes(&doc, Some("node-1"), &info, false)
			.into_iter()
			.map(|n| n.class)
			.collect();
		assert_eq!(
			classes,
			[
				Some(NodeClass::Selected),
				Some(NodeClass::Highlighted),
				Some(NodeClass::Dimmed)
			]
		);
		let edges = project_edges(&doc, &info, None);
		assert_eq!(edges[0].emphasis, Emphasis::FULL);
		assert_eq!(edges[1].emphasis, Emphasis::MUTED);
		assert_eq!(edges[1].stroke(), MUTED_STROKE);
	}

	#[test]
	fn dragging_suppresses_classes() {
		let doc = seed();
		let info = relations(&doc.nodes, &doc.edges, Some("node-1"));
		let nodes = project_nodes(&doc, Some("node-1"), &info, true);
		assert!(nodes.iter().all(|n| n.class.is_none()));
	}

	#[test]
	fn unknown_type_projects_like_derivation() {
		let mut doc = seed();
		doc.edges[0].type_id = "nonsense".into();
		let info = RelationInfo::default();
		let edge = &project_edges(&doc, &info, None)[0];
		assert_eq!(edge.edge_type, EdgeKind::Derivation.definition());
	}

	#[test]
	fn orphaned_category_projects_gray() {
		let mut doc = seed();
		doc.categories.retain(|c| c.id != "mech");
		let nodes = project_nodes(&doc, None, &RelationInfo::default(), false);
		assert_eq!(nodes[0].style.background, FALLBACK_BACKGROUND);
	}

	#[test]
	fn projection_is_repeatable_and_does_not_touch_the_document() {
		let doc = seed();
		let before = doc.clone();
		let info = relations(&doc.nodes, &doc.edges, Some("node-2"));
		let first = (
			project_nodes(&doc, Some("node-2"), &info, false),
			project_edges(&doc, &info, Some("e2-1")),
		);
		let second = (
			project_nodes(&doc, Some("node-2"), &info, false),
			project_edges(&doc, &info, Some("e2-1")),
		);
		assert_eq!(first, second);
		assert_eq!(doc, before);
		assert!(first.1[0].selected);
	}

	#[test]
	fn formula_mode_renders_formula_and_flags_broken_edges() {
		let mut doc = GraphDocument::seed(ContentMode::Formula);
		doc.nodes.retain(|n| n.id != "node-2");
		let info = RelationInfo::default();
		let nodes = project_nodes(&doc, None, &info, false);
		assert_eq!(nodes[0].content, NodeContent::Formula("F = ma".into()));
		assert!(project_edges(&doc, &info, None)[0].broken);
	}
}
