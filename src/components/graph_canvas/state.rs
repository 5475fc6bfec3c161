use std::sync::atomic::{AtomicU64, Ordering};

use crate::graph::{EdgeView, NodeView, Position};

pub const NODE_HEIGHT: f64 = 44.0;
pub const EDGE_HIT: f64 = 6.0;
/// Pointer travel (screen px) before a press on a node becomes a drag.
pub const DRAG_THRESHOLD: f64 = 3.0;

static EDGE_SEQ: AtomicU64 = AtomicU64::new(0);

/// Id for a newly drawn edge. The per-session sequence keeps two connects
/// between the same pair within one millisecond apart.
pub fn mint_edge_id(source: &str, target: &str, stamp: u64) -> String {
	let seq = EDGE_SEQ.fetch_add(1, Ordering::Relaxed);
	format!("e-{source}-{target}-{stamp}-{seq}")
}

#[derive(Clone, Debug, Default)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub node_id: Option<String>,
	pub moved: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start: Position,
	pub current: Position,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub moved: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
	/// Edge under the pointer at press time, clicked if the pan never moves.
	pub edge_id: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct ConnectState {
	pub source: Option<String>,
	pub cursor: Position,
}

/// Pixel-space state of the canvas plus the latest projection to draw.
pub struct CanvasState {
	pub nodes: Vec<NodeView>,
	pub edges: Vec<EdgeView>,
	pub transform: ViewTransform,
	pub drag: DragState,
	pub pan: PanState,
	pub connect: ConnectState,
	pub width: f64,
	pub height: f64,
}

impl CanvasState {
	pub fn new(width: f64, height: f64) -> Self {
		Self {
			nodes: Vec::new(),
			edges: Vec::new(),
			transform: ViewTransform { x: 0.0, y: 0.0, k: 1.0 },
			drag: DragState::default(),
			pan: PanState::default(),
			connect: ConnectState::default(),
			width,
			height,
		}
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> Position {
		Position::new(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	/// Graph-space point at the middle of the visible area.
	pub fn viewport_center(&self) -> Position {
		self.screen_to_graph(self.width / 2.0, self.height / 2.0)
	}

	/// Where a node is drawn, following the pointer while it is dragged.
	pub fn node_position(&self, node: &NodeView) -> Position {
		match &self.drag.node_id {
			Some(id) if self.drag.moved && *id == node.id => self.drag.current,
			_ => node.position,
		}
	}

	pub fn node_center(&self, id: &str) -> Option<Position> {
		let node = self.nodes.iter().find(|n| n.id == id)?;
		let p = self.node_position(node);
		Some(Position::new(
			p.x + node.style.width / 2.0,
			p.y + NODE_HEIGHT / 2.0,
		))
	}

	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<&NodeView> {
		let g = self.screen_to_graph(sx, sy);
		// topmost first: later nodes are drawn over earlier ones
		self.nodes.iter().rev().find(|node| {
			let p = self.node_position(node);
			g.x >= p.x && g.x <= p.x + node.style.width && g.y >= p.y && g.y <= p.y + NODE_HEIGHT
		})
	}

	pub fn edge_at_position(&self, sx: f64, sy: f64) -> Option<&EdgeView> {
		let g = self.screen_to_graph(sx, sy);
		let tolerance = EDGE_HIT / self.transform.k;
		self.edges.iter().filter(|e| !e.broken).find(|edge| {
			let (Some(a), Some(b)) = (self.node_center(&edge.source), self.node_center(&edge.target))
			else {
				return false;
			};
			distance_to_segment(g, a, b) < tolerance
		})
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}
}

fn distance_to_segment(p: Position, a: Position, b: Position) -> f64 {
	let (dx, dy) = (b.x - a.x, b.y - a.y);
	let len2 = dx * dx + dy * dy;
	let t = if len2 < 1e-9 {
		0.0
	} else {
		(((p.x - a.x) * dx + (p.y - a.y) * dy) / len2).clamp(0.0, 1.0)
	};
	let (cx, cy) = (a.x + t * dx, a.y + t * dy);
	((p.x - cx).powi(2) + (p.y - cy).powi(2)).sqrt()
}

/// Point where the ray from the box center towards `toward` leaves the box.
pub fn box_exit(center: Position, toward: Position, half_w: f64, half_h: f64) -> Position {
	let (dx, dy) = (toward.x - center.x, toward.y - center.y);
	if dx.abs() < 1e-9 && dy.abs() < 1e-9 {
		return center;
	}
	let sx = if dx.abs() > 1e-9 { half_w / dx.abs() } else { f64::INFINITY };
	let sy = if dy.abs() > 1e-9 { half_h / dy.abs() } else { f64::INFINITY };
	let s = sx.min(sy);
	Position::new(center.x + dx * s, center.y + dy * s)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn edge_ids_differ_for_the_same_pair_and_stamp() {
		let a = mint_edge_id("node-1", "node-2", 42);
		let b = mint_edge_id("node-1", "node-2", 42);
		assert_ne!(a, b);
		assert!(a.starts_with("e-node-1-node-2-42-"));
	}

	#[test]
	fn segment_distance_clamps_to_endpoints() {
		let (a, b) = (Position::new(0.0, 0.0), Position::new(10.0, 0.0));
		assert_eq!(distance_to_segment(Position::new(5.0, 3.0), a, b), 3.0);
		assert_eq!(distance_to_segment(Position::new(-4.0, 3.0), a, b), 5.0);
	}

	#[test]
	fn box_exit_hits_the_nearer_side() {
		let c = Position::new(0.0, 0.0);
		assert_eq!(box_exit(c, Position::new(100.0, 0.0), 75.0, 22.0), Position::new(75.0, 0.0));
		assert_eq!(box_exit(c, Position::new(0.0, -50.0), 75.0, 22.0), Position::new(0.0, -22.0));
	}

	#[test]
	fn viewport_center_follows_pan_and_zoom() {
		let mut s = CanvasState::new(800.0, 600.0);
		assert_eq!(s.viewport_center(), Position::new(400.0, 300.0));
		s.transform = ViewTransform { x: 100.0, y: 0.0, k: 2.0 };
		assert_eq!(s.viewport_center(), Position::new(150.0, 150.0));
	}
}
