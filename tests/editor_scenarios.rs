use formula_graph::config::EditorConfig;
use formula_graph::graph::document::GraphDocument;
use formula_graph::graph::model::FALLBACK_BACKGROUND;
use formula_graph::graph::persist::DocumentSlot;
use formula_graph::graph::projection::Emphasis;
use formula_graph::graph::{
	ContentMode, DraftField, EdgeKind, Editor, MemorySlot, NodeClass, Position, RelatedNode,
};

fn fixed_clock() -> f64 {
	42_000.0
}

fn fresh() -> (Editor<MemorySlot>, MemorySlot) {
	let slot = MemorySlot::default();
	let editor = Editor::new(&EditorConfig::default(), slot.clone()).with_clock(fixed_clock);
	(editor, slot)
}

#[test]
fn selecting_newtons_law_lists_its_derivation_source() {
	let (mut ed, _) = fresh();
	ed.select_node("node-1");
	let info = ed.relation_info();
	assert_eq!(
		info.sources,
		vec![RelatedNode {
			id: "node-2".into(),
			formula: r"a = \frac{dv}{dt}".into(),
		}]
	);
	assert!(info.targets.is_empty());
	assert_eq!(info.highlight.len(), 2);
	assert!(info.highlight.contains("node-1") && info.highlight.contains("node-2"));
}

#[test]
fn add_node_at_counter_three_creates_node_three_in_edit_mode() {
	let (mut ed, _) = fresh();
	assert_eq!(ed.document().id_count, 3);
	let id = ed.add_node(Position::new(0.0, 0.0));
	assert_eq!(id, "node-3");
	assert_eq!(ed.document().id_count, 4);
	assert!(ed.session().is_editing());
	let draft = ed.session().draft().unwrap();
	assert_eq!(draft.label, "新しい法則");
	assert_eq!(draft.category, "default");
}

#[test]
fn ids_stay_unique_across_deletes() {
	let (mut ed, _) = fresh();
	let mut seen = Vec::new();
	for _ in 0..4 {
		let id = ed.add_node(Position::default());
		ed.delete_node(&id);
		seen.push(id);
	}
	let suffixes: Vec<u64> = seen
		.iter()
		.map(|id| id.trim_start_matches("node-").parse().unwrap())
		.collect();
	assert!(suffixes.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn deleting_a_category_grays_out_its_nodes_without_rewriting_them() {
	let (mut ed, _) = fresh();
	assert!(ed.delete_category("mech"));
	let node = ed.document().node("node-1").unwrap();
	assert_eq!(node.data.category, "mech");
	let view = ed.node_views().into_iter().find(|n| n.id == "node-1").unwrap();
	assert_eq!(view.style.background, FALLBACK_BACKGROUND);
}

#[test]
fn double_clicking_an_edge_removes_only_that_edge() {
	let (mut ed, _) = fresh();
	ed.connect("e1-2".into(), "node-1".into(), "node-2".into());
	let before_nodes = ed.document().nodes.clone();
	assert!(ed.double_click_edge("e2-1"));
	let ids: Vec<_> = ed.document().edges.iter().map(|e| e.id.as_str()).collect();
	assert_eq!(ids, ["e1-2"]);
	assert_eq!(ed.document().nodes, before_nodes);
}

#[test]
fn nothing_is_dimmed_without_a_focal_node() {
	let (ed, _) = fresh();
	assert!(ed
		.node_views()
		.iter()
		.all(|n| n.class == Some(NodeClass::Highlighted)));
	assert!(ed.edge_views().iter().all(|e| e.emphasis == Emphasis::FULL));
}

#[test]
fn unknown_edge_type_draws_like_derivation() {
	let (mut ed, _) = fresh();
	ed.connect("x".into(), "node-1".into(), "node-2".into());
	ed.set_edge_type("x", "not-a-type");
	let views = ed.edge_views();
	let derivation = views.iter().find(|e| e.id == "e2-1").unwrap();
	let unknown = views.iter().find(|e| e.id == "x").unwrap();
	assert_eq!(unknown.edge_type, derivation.edge_type);
	assert_eq!(unknown.edge_type.kind, EdgeKind::Derivation);
}

#[test]
fn edits_survive_a_reload() {
	let (mut ed, slot) = fresh();
	ed.select_node("node-2");
	ed.begin_edit();
	ed.edit_field(DraftField::Label(String::new()));
	ed.edit_field(DraftField::Category("em".into()));
	assert!(ed.save_edit());
	ed.connect("e1-2".into(), "node-1".into(), "node-2".into());
	assert!(ed.flush_save());

	let reloaded = Editor::new(&EditorConfig::default(), slot);
	let node = reloaded.document().node("node-2").unwrap();
	assert_eq!(node.data.label, "");
	assert_eq!(node.data.category, "em");
	assert_eq!(reloaded.document().edges.len(), 2);
	assert_eq!(reloaded.document().id_count, ed.document().id_count);
	assert_eq!(reloaded.document().categories, ed.document().categories);
}

#[test]
fn legacy_payload_without_categories_is_repaired_on_load() {
	let slot = MemorySlot::default();
	let mut legacy = serde_json::to_value(GraphDocument::seed(ContentMode::Formula)).unwrap();
	legacy.as_object_mut().unwrap().remove("categories");
	let config = EditorConfig::default();
	slot.write(&config.storage_key, &legacy.to_string()).unwrap();

	let ed = Editor::new(&config, slot);
	assert_eq!(ed.document().categories.len(), 4);
	assert!(ed
		.document()
		.nodes
		.iter()
		.all(|n| n.data.content_type == ContentMode::Label));
}

#[test]
fn untyped_edges_and_sparse_nodes_are_kept_across_load_and_save() {
	let slot = MemorySlot::default();
	let config = EditorConfig::default();
	let stored = r#"{
		"nodes":[{"id":"node-7","position":{"x":10,"y":20},"data":{"label":"速度","formula":"v = dx/dt"}}],
		"edges":[{"id":"e1","source":"node-7","target":"node-7"}],
		"idCount":8
	}"#;
	slot.write(&config.storage_key, stored).unwrap();

	let mut ed = Editor::new(&config, slot.clone()).with_clock(fixed_clock);
	let ids: Vec<_> = ed.document().nodes.iter().map(|n| n.id.as_str()).collect();
	assert_eq!(ids, ["node-7"]);
	assert_eq!(ed.edge_views()[0].edge_type.kind, EdgeKind::Derivation);

	assert!(ed.move_node("node-7", Position::new(30.0, 40.0)));
	assert!(ed.flush_save());
	let saved = slot.get(&config.storage_key).unwrap();
	let reloaded = GraphDocument::from_json(&saved, ContentMode::Label).unwrap();
	assert_eq!(reloaded.node("node-7").unwrap().position, Position::new(30.0, 40.0));
	assert_eq!(reloaded.edges.len(), 1);
}

#[test]
fn counter_is_raised_past_restored_ids() {
	let slot = MemorySlot::default();
	let config = EditorConfig::default();
	let mut doc = GraphDocument::seed(ContentMode::Label);
	doc.nodes[1].id = "node-17".into();
	doc.id_count = 2;
	slot.write(&config.storage_key, &doc.to_json().unwrap()).unwrap();

	let mut ed = Editor::new(&config, slot);
	assert_eq!(ed.add_node(Position::default()), "node-18");
}

#[test]
fn projection_does_not_touch_the_document() {
	let (mut ed, _) = fresh();
	ed.select_node("node-1");
	let before = ed.document().clone();
	let first = (ed.node_views(), ed.edge_views());
	let second = (ed.node_views(), ed.edge_views());
	assert_eq!(first, second);
	assert_eq!(ed.document(), &before);
}
