use crate::graph::Position;

/// Pointer gestures reported by the canvas. Positions are in graph space.
#[derive(Clone, Debug, PartialEq)]
pub enum Gesture {
	NodeSelected(String),
	DragStart(String),
	/// Node released after a drag; carries its final position.
	NodeMoved { id: String, position: Position },
	Connected { id: String, source: String, target: String },
	EdgeSelected(String),
	EdgeDoubleClicked(String),
	EdgeRemoved(String),
	PaneClicked,
	ViewportMoved(Position),
}
