//! The single controller that owns the graph and everything transient about it.
//!
//! Gestures from the canvas and forms arrive as commands; the rendering side
//! reads back through the query methods. Every command that changes the
//! document arms a debounced save.

use super::document::GraphDocument;
use super::error::PersistResult;
use super::model::{Category, CategoryId, ContentMode, Edge, EdgeId, Node, NodeId, Position};
use super::persist::{DocumentSlot, Persistence, now_ms};
use super::projection::{EdgeView, NodeView, project_edges, project_nodes};
use super::relations::{RelationInfo, relations};
use super::session::{CategoryDraft, DraftField, EditSession};
use super::store::GraphStore;
use crate::config::EditorConfig;

pub struct Editor<S: DocumentSlot> {
	store: GraphStore,
	session: EditSession,
	mode: ContentMode,
	dragging: bool,
	persistence: Persistence<S>,
	save_generation: u64,
	clock: fn() -> f64,
}

impl<S: DocumentSlot> Editor<S> {
	/// Loads the stored document from `slot`, or the seed when there is none.
	pub fn new(config: &EditorConfig, slot: S) -> Self {
		let persistence = Persistence::new(slot, &config.storage_key, config.save_debounce_ms);
		let doc = persistence.load(config.default_content_mode);
		Self {
			store: GraphStore::with_node_width(doc, config.node_width),
			session: EditSession::default(),
			mode: config.default_content_mode,
			dragging: false,
			persistence,
			save_generation: 0,
			clock: now_ms,
		}
	}

	/// Replaces the time source used for save deadlines and category ids.
	pub fn with_clock(mut self, clock: fn() -> f64) -> Self {
		self.clock = clock;
		self
	}

	fn touched(&mut self, changed: bool) -> bool {
		if changed {
			let now = (self.clock)();
			self.persistence.schedule(now, self.store.document().clone());
			self.save_generation += 1;
		}
		changed
	}

	pub fn document(&self) -> &GraphDocument {
		self.store.document()
	}

	pub fn session(&self) -> &EditSession {
		&self.session
	}

	pub fn content_mode(&self) -> ContentMode {
		self.mode
	}

	pub fn is_dragging(&self) -> bool {
		self.dragging
	}

	pub fn categories(&self) -> &[Category] {
		self.store.categories()
	}

	pub fn focal_node(&self) -> Option<&Node> {
		self.session.focal().and_then(|id| self.store.node(id))
	}

	pub fn selected_edge(&self) -> Option<&Edge> {
		self.session.selected_edge().and_then(|id| self.store.edge(id))
	}

	pub fn relation_info(&self) -> RelationInfo {
		relations(self.store.nodes(), self.store.edges(), self.session.focal())
	}

	pub fn node_views(&self) -> Vec<NodeView> {
		let info = self.relation_info();
		project_nodes(self.document(), self.session.focal(), &info, self.dragging)
	}

	pub fn edge_views(&self) -> Vec<EdgeView> {
		let info = self.relation_info();
		project_edges(self.document(), &info, self.session.selected_edge())
	}

	/// Creates a node and opens it for editing straight away.
	pub fn add_node(&mut self, position: Position) -> NodeId {
		let id = self.store.add_node(position, self.mode);
		self.touched(true);
		if let Some(node) = self.store.node(&id) {
			self.session.select_node(id.clone());
			self.session.begin_edit(id.clone(), &node.data);
		}
		id
	}

	/// Focuses a node. Re-selecting the focal node keeps an open draft.
	pub fn select_node(&mut self, id: &str) {
		if self.session.focal() == Some(id) {
			return;
		}
		if self.store.node(id).is_some() {
			self.session.select_node(id.to_string());
		}
	}

	pub fn delete_node(&mut self, id: &str) -> bool {
		let changed = self.store.delete_node(id);
		self.session.forget_node(id);
		self.touched(changed)
	}

	pub fn delete_focal_node(&mut self) -> bool {
		match self.session.focal().map(str::to_string) {
			Some(id) => self.delete_node(&id),
			None => false,
		}
	}

	pub fn move_node(&mut self, id: &str, position: Position) -> bool {
		let changed = self.store.move_node(id, position);
		self.touched(changed)
	}

	pub fn begin_edit(&mut self) {
		let Some(node) = self.focal_node() else {
			return;
		};
		let (id, data) = (node.id.clone(), node.data.clone());
		self.session.begin_edit(id, &data);
	}

	pub fn edit_field(&mut self, field: DraftField) {
		self.session.edit_field(field);
	}

	pub fn save_edit(&mut self) -> bool {
		let Some((id, draft)) = self.session.take_draft() else {
			return false;
		};
		let changed = self.store.update_node_data(&id, draft);
		self.touched(changed)
	}

	pub fn cancel_edit(&mut self) {
		self.session.cancel_edit();
	}

	pub fn update_category_draft(&mut self, draft: CategoryDraft) {
		self.session.update_category_flow(draft);
	}

	pub fn cancel_category_flow(&mut self) {
		self.session.close_category_flow();
	}

	/// Creates the category from the open sub-flow and selects it in the draft.
	pub fn submit_category_flow(&mut self) -> Option<CategoryId> {
		let draft = self.session.close_category_flow()?;
		let id = self.upsert_category(Category::new("", draft.name, draft.color));
		self.session.category_created(id.clone());
		Some(id)
	}

	pub fn upsert_category(&mut self, candidate: Category) -> CategoryId {
		let stamp = (self.clock)().max(0.0) as u64;
		let id = self.store.upsert_category(candidate, stamp);
		self.touched(true);
		id
	}

	pub fn delete_category(&mut self, id: &str) -> bool {
		let changed = self.store.delete_category(id);
		self.touched(changed)
	}

	pub fn connect(&mut self, id: EdgeId, source: NodeId, target: NodeId) -> EdgeId {
		let id = self.store.add_edge(id, source, target);
		self.touched(true);
		id
	}

	pub fn click_edge(&mut self, id: &str) {
		self.session.toggle_edge(id);
	}

	/// Deletes the edge at once.
	pub fn double_click_edge(&mut self, id: &str) -> bool {
		self.delete_edge(id)
	}

	pub fn delete_edge(&mut self, id: &str) -> bool {
		let changed = self.store.delete_edge(id);
		self.session.forget_edge(id);
		self.touched(changed)
	}

	pub fn set_edge_type(&mut self, id: &str, type_id: &str) -> bool {
		let changed = self.store.set_edge_type(id, type_id);
		self.touched(changed)
	}

	pub fn pane_click(&mut self) {
		self.session.clear();
	}

	pub fn drag_start(&mut self) {
		self.dragging = true;
	}

	/// Ends a drag; the final position is the only one recorded.
	pub fn drag_stop(&mut self, id: &str, position: Position) -> bool {
		self.dragging = false;
		self.move_node(id, position)
	}

	pub fn set_content_mode(&mut self, mode: ContentMode) {
		self.mode = mode;
		let changed = self.store.set_node_content_type(mode);
		self.touched(changed);
	}

	pub fn toggle_content_mode(&mut self) {
		self.set_content_mode(self.mode.toggled());
	}

	pub fn export_json(&self) -> PersistResult<String> {
		self.document().to_json()
	}

	/// Replaces the whole graph with an imported one and clears the selection.
	pub fn import_json(&mut self, json: &str) -> PersistResult<()> {
		let doc = GraphDocument::from_json(json, self.mode)?;
		log::info!("imported graph with {} nodes", doc.nodes.len());
		self.store.replace(doc);
		self.session.clear();
		self.touched(true);
		Ok(())
	}

	pub fn save_pending(&self) -> bool {
		self.persistence.is_pending()
	}

	/// Bumped each time a mutation schedules a save; commands that change
	/// nothing leave it alone.
	pub fn save_generation(&self) -> u64 {
		self.save_generation
	}

	/// Milliseconds until the pending save is due, if one is pending.
	pub fn save_due_in(&self) -> Option<f64> {
		self.persistence.due_in((self.clock)())
	}

	/// Writes a pending save whose quiet period has elapsed.
	pub fn tick_save(&mut self) -> bool {
		let now = (self.clock)();
		self.persistence.tick(now)
	}

	pub fn flush_save(&mut self) -> bool {
		self.persistence.flush()
	}
}

#[cfg(test)]
mod tests {
	use std::cell::Cell;

	use super::*;
	use crate::graph::persist::MemorySlot;
	use crate::graph::session::{EditState, NEW_CATEGORY_OPTION};

	fn frozen() -> f64 {
		1_000.0
	}

	thread_local! {
		static NOW: Cell<f64> = const { Cell::new(0.0) };
	}

	fn manual() -> f64 {
		NOW.with(Cell::get)
	}

	fn editor() -> (Editor<MemorySlot>, MemorySlot) {
		let slot = MemorySlot::default();
		let editor = Editor::new(&EditorConfig::default(), slot.clone()).with_clock(frozen);
		(editor, slot)
	}

	#[test]
	fn add_node_enters_edit_mode_with_placeholders() {
		let (mut ed, _) = editor();
		let id = ed.add_node(Position::new(10.0, 20.0));
		assert_eq!(id, "node-3");
		assert_eq!(ed.document().id_count, 4);
		assert!(ed.session().is_editing());
		assert_eq!(ed.session().draft().unwrap().formula, "x = ?");
		assert!(ed.save_pending());
	}

	#[test]
	fn reselecting_the_focal_node_keeps_the_draft() {
		let (mut ed, _) = editor();
		ed.select_node("node-1");
		ed.begin_edit();
		ed.edit_field(DraftField::Label("draft".into()));
		ed.select_node("node-1");
		assert_eq!(ed.session().draft().unwrap().label, "draft");
		ed.select_node("node-2");
		assert!(!ed.session().is_editing());
	}

	#[test]
	fn selecting_a_missing_node_is_ignored() {
		let (mut ed, _) = editor();
		ed.select_node("node-99");
		assert_eq!(ed.session().state(), &EditState::Idle);
	}

	#[test]
	fn category_sub_flow_creates_and_selects() {
		let (mut ed, _) = editor();
		ed.select_node("node-1");
		ed.begin_edit();
		ed.edit_field(DraftField::Category(NEW_CATEGORY_OPTION.into()));
		ed.update_category_draft(CategoryDraft {
			name: "光学".into(),
			color: "#FFF8E1".into(),
		});
		let id = ed.submit_category_flow().unwrap();
		assert_eq!(id, "cat-1000");
		assert!(ed.save_edit());
		assert_eq!(ed.focal_node().unwrap().data.category, id);
		assert_eq!(ed.focal_node().unwrap().style.background, "#FFF8E1");
	}

	#[test]
	fn drag_suppresses_classes_until_stop() {
		let (mut ed, _) = editor();
		ed.select_node("node-1");
		ed.drag_start();
		assert!(ed.node_views().iter().all(|n| n.class.is_none()));
		assert!(ed.drag_stop("node-2", Position::new(5.0, 5.0)));
		assert!(ed.node_views().iter().all(|n| n.class.is_some()));
		assert_eq!(ed.session().focal(), Some("node-1"));
	}

	#[test]
	fn mutations_are_saved_once_after_the_quiet_period() {
		let (mut ed, slot) = editor();
		ed.move_node("node-1", Position::new(1.0, 1.0));
		ed.move_node("node-1", Position::new(2.0, 2.0));
		assert!(!ed.tick_save());
		assert!(ed.flush_save());
		assert_eq!(slot.writes(), 1);

		let reloaded = Editor::new(&EditorConfig::default(), slot);
		assert_eq!(
			reloaded.document().node("node-1").unwrap().position,
			Position::new(2.0, 2.0)
		);
	}

	#[test]
	fn only_mutations_bump_the_save_generation() {
		let (mut ed, _) = editor();
		assert_eq!(ed.save_generation(), 0);
		ed.select_node("node-1");
		ed.drag_start();
		ed.click_edge("e2-1");
		ed.pane_click();
		ed.cancel_edit();
		assert!(!ed.delete_node("node-99"));
		assert_eq!(ed.save_generation(), 0);
		assert!(!ed.save_pending());

		ed.move_node("node-1", Position::new(3.0, 4.0));
		assert_eq!(ed.save_generation(), 1);
		ed.select_node("node-2");
		assert_eq!(ed.save_generation(), 1);
		assert_eq!(ed.save_due_in(), Some(500.0));
	}

	#[test]
	fn selection_does_not_push_back_a_pending_save() {
		NOW.with(|n| n.set(0.0));
		let slot = MemorySlot::default();
		let mut ed = Editor::new(&EditorConfig::default(), slot.clone()).with_clock(manual);
		ed.move_node("node-1", Position::new(9.0, 9.0));

		NOW.with(|n| n.set(400.0));
		ed.select_node("node-2");
		assert_eq!(ed.save_due_in(), Some(100.0));
		assert!(!ed.tick_save());

		NOW.with(|n| n.set(500.0));
		assert!(ed.tick_save());
		assert_eq!(slot.writes(), 1);
		assert_eq!(ed.save_due_in(), None);
	}

	#[test]
	fn content_mode_switch_restamps_nodes() {
		let (mut ed, _) = editor();
		ed.toggle_content_mode();
		assert_eq!(ed.content_mode(), ContentMode::Formula);
		let id = ed.add_node(Position::default());
		assert_eq!(
			ed.document().node(&id).unwrap().data.content_type,
			ContentMode::Formula
		);
	}

	#[test]
	fn import_replaces_graph_and_clears_selection() {
		let (mut ed, _) = editor();
		ed.select_node("node-1");
		let json = r#"{"nodes":[],"edges":[],"idCount":9}"#;
		ed.import_json(json).unwrap();
		assert!(ed.document().nodes.is_empty());
		assert_eq!(ed.document().categories.len(), 4);
		assert_eq!(ed.session().focal(), None);
		assert!(ed.import_json("nope").is_err());
		assert_eq!(ed.document().id_count, 9);
	}
}
