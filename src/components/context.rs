use std::time::Duration;

use leptos::prelude::*;

use super::graph_canvas::Gesture;
use crate::config::EditorConfig;
use crate::graph::{Editor, LocalStorageSlot, Position};

pub type AppEditor = Editor<LocalStorageSlot>;

/// Shared handle to the editor, provided once at the page root.
///
/// Commands go through [`EditorContext::update`]. When a command schedules a
/// save, the timer is re-armed for the new deadline and the previous one is
/// cancelled; commands that change nothing leave the timer alone.
#[derive(Clone, Copy)]
pub struct EditorContext {
	editor: RwSignal<AppEditor>,
	save_timer: StoredValue<Option<TimeoutHandle>>,
	viewport_center: RwSignal<Position>,
	node_width: f64,
}

impl EditorContext {
	pub fn new(config: &EditorConfig) -> Self {
		Self {
			editor: RwSignal::new(Editor::new(config, LocalStorageSlot)),
			save_timer: StoredValue::new(None),
			viewport_center: RwSignal::new(Position::default()),
			node_width: config.node_width,
		}
	}

	/// Tracked read access.
	pub fn with<R>(&self, f: impl FnOnce(&AppEditor) -> R) -> R {
		self.editor.with(f)
	}

	/// Untracked read access, for event handlers.
	pub fn peek<R>(&self, f: impl FnOnce(&AppEditor) -> R) -> R {
		self.editor.with_untracked(f)
	}

	pub fn update<R>(&self, f: impl FnOnce(&mut AppEditor) -> R) -> Option<R> {
		let before = self.editor.with_untracked(|e| e.save_generation());
		let out = self.editor.try_update(f);
		let due_in = self.editor.with_untracked(|e| {
			if e.save_generation() == before {
				None
			} else {
				e.save_due_in()
			}
		});
		if let Some(delay) = due_in {
			arm_save_timer(self.editor, self.save_timer, delay);
		}
		out
	}

	/// Writes any pending save now, e.g. when the page is closing.
	pub fn flush(&self) {
		if let Some(handle) = self.save_timer.get_value() {
			handle.clear();
		}
		self.save_timer.set_value(None);
		self.editor.update_untracked(|e| {
			e.flush_save();
		});
	}

	/// Adds a node centered on the visible part of the canvas.
	pub fn add_node_in_view(&self) {
		let center = self.viewport_center.get_untracked();
		let at = Position::new(center.x - self.node_width / 2.0, center.y - 22.0);
		self.update(|e| e.add_node(at));
	}

	pub fn gesture(&self, gesture: Gesture) {
		match gesture {
			Gesture::ViewportMoved(center) => self.viewport_center.set(center),
			Gesture::NodeSelected(id) => {
				self.update(|e| e.select_node(&id));
			}
			Gesture::DragStart(_) => {
				self.update(|e| e.drag_start());
			}
			Gesture::NodeMoved { id, position } => {
				self.update(|e| e.drag_stop(&id, position));
			}
			Gesture::Connected { id, source, target } => {
				self.update(|e| e.connect(id, source, target));
			}
			Gesture::EdgeSelected(id) => {
				self.update(|e| e.click_edge(&id));
			}
			Gesture::EdgeDoubleClicked(id) => {
				self.update(|e| e.double_click_edge(&id));
			}
			Gesture::EdgeRemoved(id) => {
				self.update(|e| e.delete_edge(&id));
			}
			Gesture::PaneClicked => {
				self.update(|e| e.pane_click());
			}
		}
	}
}

/// Replaces the save timer with one firing after `delay` ms. The callback
/// writes through the editor's own deadline check and re-arms if it ran early.
fn arm_save_timer(
	editor: RwSignal<AppEditor>,
	timer: StoredValue<Option<TimeoutHandle>>,
	delay: f64,
) {
	if let Some(handle) = timer.get_value() {
		handle.clear();
	}
	let fire = move || {
		timer.set_value(None);
		let remaining = editor
			.try_update_untracked(|e| {
				e.tick_save();
				e.save_due_in()
			})
			.flatten();
		if let Some(rest) = remaining {
			arm_save_timer(editor, timer, rest);
		}
	};
	match set_timeout_with_handle(fire, Duration::from_millis(delay.ceil().max(0.0) as u64)) {
		Ok(handle) => timer.set_value(Some(handle)),
		Err(_) => log::warn!("could not schedule graph save"),
	}
}
