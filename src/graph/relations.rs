use std::collections::HashSet;

use super::model::{Edge, Node, NodeId};

/// A neighbor as shown in the inspector's relation lists.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RelatedNode {
	pub id: NodeId,
	/// Empty when the neighbor no longer exists.
	pub formula: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RelationInfo {
	/// Nodes with an edge into the focal node, in edge order.
	pub sources: Vec<RelatedNode>,
	/// Nodes the focal node has an edge into, in edge order.
	pub targets: Vec<RelatedNode>,
	/// Focal node plus every neighbor. Empty means nothing is focal.
	pub highlight: HashSet<NodeId>,
}

impl RelationInfo {
	pub fn is_highlighted(&self, id: &str) -> bool {
		self.highlight.is_empty() || self.highlight.contains(id)
	}
}

/// Direct neighbors of `focal`, from one scan over `edges`.
///
/// Repeated edges yield repeated entries.
pub fn relations(nodes: &[Node], edges: &[Edge], focal: Option<&str>) -> RelationInfo {
	let Some(focal) = focal else {
		return RelationInfo::default();
	};
	let formula_of = |id: &str| {
		nodes
			.iter()
			.find(|n| n.id == id)
			.map(|n| n.data.formula.clone())
			.unwrap_or_default()
	};

	let mut info = RelationInfo::default();
	info.highlight.insert(focal.to_string());
	for edge in edges {
		if edge.target == focal {
			info.highlight.insert(edge.source.clone());
			info.sources.push(RelatedNode {
				id: edge.source.clone(),
				formula: formula_of(&edge.source),
			});
		}
		if edge.source == focal {
			info.highlight.insert(edge.target.clone());
			info.targets.push(RelatedNode {
				id: edge.target.clone(),
				formula: formula_of(&edge.target),
			});
		}
	}
	info
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::graph::document::GraphDocument;
	use crate::graph::model::ContentMode;

	fn edge(id: &str, source: &str, target: &str) -> Edge {
		Edge {
			id: id.into(),
			source: source.into(),
			target: target.into(),
			type_id: "derivation".into(),
		}
	}

	#[test]
	fn seed_relations_for_newtons_law() {
		let doc = GraphDocument::seed(ContentMode::Label);
		let info = relations(&doc.nodes, &doc.edges, Some("node-1"));
		assert_eq!(
			info.sources,
			[RelatedNode {
				id: "node-2".into(),
				formula: r"a = \frac{dv}{dt}".into(),
			}]
		);
		assert!(info.targets.is_empty());
		let expected = HashSet::from(["node-1".to_string(), "node-2".to_string()]);
		assert_eq!(info.highlight, expected);
	}

	#[test]
	fn counts_match_incident_edges_including_repeats() {
		let doc = GraphDocument::seed(ContentMode::Label);
		let edges = vec![
			edge("a", "node-2", "node-1"),
			edge("b", "node-2", "node-1"),
			edge("c", "node-1", "node-2"),
			edge("d", "node-3", "node-4"),
		];
		let info = relations(&doc.nodes, &edges, Some("node-1"));
		assert_eq!(info.sources.len(), 2);
		assert_eq!(info.targets.len(), 1);
		assert_eq!(info.targets[0].formula, r"a = \frac{dv}{dt}");
		assert!(!info.highlight.contains("node-3"));
	}

	#[test]
	fn no_focal_means_everything_highlighted() {
		let doc = GraphDocument::seed(ContentMode::Label);
		let info = relations(&doc.nodes, &doc.edges, None);
		assert!(info.highlight.is_empty());
		assert!(info.is_highlighted("node-42"));
	}

	#[test]
	fn missing_neighbor_keeps_its_entry() {
		let info = relations(&[], &[edge("x", "node-9", "node-1")], Some("node-1"));
		assert_eq!(info.sources[0].formula, "");
	}
}
