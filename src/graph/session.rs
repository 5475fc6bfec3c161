//! Transient selection and form state. Never persisted.

use super::model::{CategoryId, EdgeId, NodeData, NodeId};

/// Category selector value that opens the category sub-flow instead of
/// selecting a category.
pub const NEW_CATEGORY_OPTION: &str = "__new__";
pub const NEW_CATEGORY_COLOR: &str = "#FFF3E0";

#[derive(Clone, Debug, Default, PartialEq)]
pub enum EditState {
	#[default]
	Idle,
	Viewing { node: NodeId },
	Editing { node: NodeId, draft: NodeData },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DraftField {
	Label(String),
	Formula(String),
	Description(String),
	Category(CategoryId),
}

/// Form backing the "new category" modal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategoryDraft {
	pub name: String,
	pub color: String,
}

impl Default for CategoryDraft {
	fn default() -> Self {
		Self {
			name: String::new(),
			color: NEW_CATEGORY_COLOR.to_string(),
		}
	}
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct EditSession {
	state: EditState,
	edge: Option<EdgeId>,
	category_flow: Option<CategoryDraft>,
}

impl EditSession {
	pub fn state(&self) -> &EditState {
		&self.state
	}

	pub fn focal(&self) -> Option<&str> {
		match &self.state {
			EditState::Idle => None,
			EditState::Viewing { node } | EditState::Editing { node, .. } => Some(node),
		}
	}

	pub fn is_editing(&self) -> bool {
		matches!(self.state, EditState::Editing { .. })
	}

	pub fn draft(&self) -> Option<&NodeData> {
		match &self.state {
			EditState::Editing { draft, .. } => Some(draft),
			_ => None,
		}
	}

	pub fn selected_edge(&self) -> Option<&str> {
		self.edge.as_deref()
	}

	pub fn category_flow(&self) -> Option<&CategoryDraft> {
		self.category_flow.as_ref()
	}

	/// Focus a node read-only. Any open draft or edge inspector is dropped.
	pub fn select_node(&mut self, id: NodeId) {
		self.state = EditState::Viewing { node: id };
		self.edge = None;
		self.category_flow = None;
	}

	/// Start editing with a copy of the node's current data.
	pub fn begin_edit(&mut self, id: NodeId, data: &NodeData) {
		self.state = EditState::Editing {
			node: id,
			draft: data.clone(),
		};
		self.edge = None;
	}

	pub fn edit_field(&mut self, field: DraftField) {
		let EditState::Editing { draft, .. } = &mut self.state else {
			return;
		};
		match field {
			DraftField::Label(v) => draft.label = v,
			DraftField::Formula(v) => draft.formula = v,
			DraftField::Description(v) => draft.description = v,
			DraftField::Category(v) if v == NEW_CATEGORY_OPTION => {
				self.category_flow = Some(CategoryDraft::default());
			}
			DraftField::Category(v) => draft.category = v,
		}
	}

	/// Hands back the draft for saving and returns to viewing.
	pub fn take_draft(&mut self) -> Option<(NodeId, NodeData)> {
		match std::mem::take(&mut self.state) {
			EditState::Editing { node, draft } => {
				self.state = EditState::Viewing { node: node.clone() };
				self.category_flow = None;
				Some((node, draft))
			}
			other => {
				self.state = other;
				None
			}
		}
	}

	pub fn cancel_edit(&mut self) {
		if let EditState::Editing { node, .. } = &self.state {
			self.state = EditState::Viewing { node: node.clone() };
		}
		self.category_flow = None;
	}

	/// Back to idle: deselect, delete, or a click on the empty canvas.
	pub fn clear(&mut self) {
		self.state = EditState::Idle;
		self.edge = None;
		self.category_flow = None;
	}

	/// Drops focus if `id` is the focal node.
	pub fn forget_node(&mut self, id: &str) {
		if self.focal() == Some(id) {
			self.state = EditState::Idle;
			self.category_flow = None;
		}
	}

	/// Clicking the open edge again closes the inspector. Node focus is kept.
	pub fn toggle_edge(&mut self, id: &str) {
		if self.edge.as_deref() == Some(id) {
			self.edge = None;
		} else {
			self.edge = Some(id.to_string());
		}
	}

	pub fn forget_edge(&mut self, id: &str) {
		if self.edge.as_deref() == Some(id) {
			self.edge = None;
		}
	}

	pub fn update_category_flow(&mut self, draft: CategoryDraft) {
		if self.category_flow.is_some() {
			self.category_flow = Some(draft);
		}
	}

	pub fn close_category_flow(&mut self) -> Option<CategoryDraft> {
		self.category_flow.take()
	}

	/// Value the category picker should show: the draft's category, or the
	/// new-category option while that sub-flow is open.
	pub fn category_choice(&self) -> Option<&str> {
		let draft = self.draft()?;
		Some(match self.category_flow {
			Some(_) => NEW_CATEGORY_OPTION,
			None => draft.category.as_str(),
		})
	}

	/// Selects a freshly created category in the open draft.
	pub fn category_created(&mut self, id: CategoryId) {
		if let EditState::Editing { draft, .. } = &mut self.state {
			draft.category = id;
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::graph::model::ContentMode;

	fn data() -> NodeData {
		NodeData {
			label: "運動方程式".into(),
			formula: "F = ma".into(),
			description: String::new(),
			category: "mech".into(),
			content_type: ContentMode::Label,
		}
	}

	#[test]
	fn edit_then_save_returns_to_viewing() {
		let mut s = EditSession::default();
		s.select_node("node-1".into());
		s.begin_edit("node-1".into(), &data());
		s.edit_field(DraftField::Formula("F = dp/dt".into()));
		let (id, draft) = s.take_draft().unwrap();
		assert_eq!(id, "node-1");
		assert_eq!(draft.formula, "F = dp/dt");
		assert_eq!(
			s.state(),
			&EditState::Viewing {
				node: "node-1".into()
			}
		);
		assert!(s.take_draft().is_none());
	}

	#[test]
	fn cancel_discards_the_draft() {
		let mut s = EditSession::default();
		s.begin_edit("node-1".into(), &data());
		s.edit_field(DraftField::Label("changed".into()));
		s.cancel_edit();
		assert!(!s.is_editing());
		assert_eq!(s.focal(), Some("node-1"));
	}

	#[test]
	fn new_category_option_opens_flow_without_touching_draft() {
		let mut s = EditSession::default();
		s.begin_edit("node-1".into(), &data());
		s.edit_field(DraftField::Category(NEW_CATEGORY_OPTION.into()));
		assert!(s.category_flow().is_some());
		assert_eq!(s.draft().unwrap().category, "mech");

		s.close_category_flow();
		s.category_created("cat-7".into());
		assert_eq!(s.draft().unwrap().category, "cat-7");
	}

	#[test]
	fn cancelled_category_flow_restores_the_picker() {
		let mut s = EditSession::default();
		assert_eq!(s.category_choice(), None);
		s.begin_edit("node-1".into(), &data());
		s.edit_field(DraftField::Category(NEW_CATEGORY_OPTION.into()));
		assert_eq!(s.category_choice(), Some(NEW_CATEGORY_OPTION));
		s.close_category_flow();
		assert_eq!(s.category_choice(), Some("mech"));
	}

	#[test]
	fn edge_toggle_keeps_node_focus() {
		let mut s = EditSession::default();
		s.select_node("node-1".into());
		s.toggle_edge("e2-1");
		assert_eq!(s.selected_edge(), Some("e2-1"));
		assert_eq!(s.focal(), Some("node-1"));
		s.toggle_edge("e2-1");
		assert_eq!(s.selected_edge(), None);
	}

	#[test]
	fn forgetting_focal_node_goes_idle() {
		let mut s = EditSession::default();
		s.select_node("node-1".into());
		s.forget_node("node-2");
		assert_eq!(s.focal(), Some("node-1"));
		s.forget_node("node-1");
		assert_eq!(s.state(), &EditState::Idle);
	}
}
