mod category_modal;
mod context;
mod edge_inspector;
mod formula;
pub mod graph_canvas;
mod inspector;
mod toolbar;

pub use category_modal::CategoryModal;
pub use context::EditorContext;
pub use edge_inspector::EdgeInspector;
pub use formula::Formula;
pub use graph_canvas::{Gesture, GraphCanvas};
pub use inspector::Inspector;
pub use toolbar::Toolbar;
