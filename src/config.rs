//! Editor settings.

use crate::graph::ContentMode;
use crate::graph::document::NODE_WIDTH;

#[derive(Clone, Debug, PartialEq)]
pub struct EditorConfig {
	/// `localStorage` key holding the serialized graph.
	pub storage_key: String,
	/// Quiet period before a pending save is written.
	pub save_debounce_ms: f64,
	/// Display mode applied to every node at load time.
	pub default_content_mode: ContentMode,
	pub node_width: f64,
}

impl Default for EditorConfig {
	fn default() -> Self {
		Self {
			storage_key: "physics-formula-graph".to_string(),
			save_debounce_ms: 500.0,
			default_content_mode: ContentMode::Label,
			node_width: NODE_WIDTH,
		}
	}
}
