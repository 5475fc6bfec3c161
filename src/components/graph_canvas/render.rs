use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::state::{CanvasState, NODE_HEIGHT, box_exit};
use crate::graph::model::{ArrowMarker, LineKind};
use crate::graph::{EdgeView, NodeClass, NodeContent, NodeView, Position};

const GRID_GAP: f64 = 16.0;
const ARROW_SIZE: f64 = 9.0;
const CORNER: f64 = 6.0;
const SELECTED_OUTLINE: &str = "#ff0072";

pub fn render(state: &CanvasState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str("#fafafa");
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	draw_grid(state, ctx);
	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);
	draw_edges(state, ctx);
	draw_connect_preview(state, ctx);
	draw_nodes(state, ctx);
	ctx.restore();
}

fn draw_grid(state: &CanvasState, ctx: &CanvasRenderingContext2d) {
	let gap = GRID_GAP * state.transform.k;
	if gap < 4.0 {
		return;
	}
	ctx.set_fill_style_str("#cccccc");
	let (ox, oy) = (state.transform.x.rem_euclid(gap), state.transform.y.rem_euclid(gap));
	let mut x = ox;
	while x < state.width {
		let mut y = oy;
		while y < state.height {
			ctx.fill_rect(x, y, 1.0, 1.0);
			y += gap;
		}
		x += gap;
	}
}

/// Color part of a CSS `border` shorthand such as `1px solid #2196F3`.
fn border_color(border: &str) -> &str {
	border.split_whitespace().last().unwrap_or("#9e9e9e")
}

fn rounded_rect(ctx: &CanvasRenderingContext2d, x: f64, y: f64, w: f64, h: f64, r: f64) {
	ctx.begin_path();
	ctx.move_to(x + r, y);
	ctx.line_to(x + w - r, y);
	let _ = ctx.arc_to(x + w, y, x + w, y + r, r);
	ctx.line_to(x + w, y + h - r);
	let _ = ctx.arc_to(x + w, y + h, x + w - r, y + h, r);
	ctx.line_to(x + r, y + h);
	let _ = ctx.arc_to(x, y + h, x, y + h - r, r);
	ctx.line_to(x, y + r);
	let _ = ctx.arc_to(x, y, x + r, y, r);
	ctx.close_path();
}

fn draw_edges(state: &CanvasState, ctx: &CanvasRenderingContext2d) {
	let k = state.transform.k;
	for edge in state.edges.iter().filter(|e| !e.broken) {
		let (Some(a), Some(b)) = (state.node_center(&edge.source), state.node_center(&edge.target))
		else {
			continue;
		};
		let half_w = |id: &str| {
			state
				.nodes
				.iter()
				.find(|n| n.id == id)
				.map_or(75.0, |n| n.style.width / 2.0)
		};
		let start = box_exit(a, b, half_w(&edge.source), NODE_HEIGHT / 2.0);
		let end = box_exit(b, a, half_w(&edge.target), NODE_HEIGHT / 2.0);
		draw_edge(ctx, edge, start, end, k);
	}
	let _ = ctx.set_line_dash(&js_sys::Array::new());
	ctx.set_global_alpha(1.0);
}

fn draw_edge(
	ctx: &CanvasRenderingContext2d,
	edge: &EdgeView,
	start: Position,
	end: Position,
	k: f64,
) {
	let (dx, dy) = (end.x - start.x, end.y - start.y);
	let dist = (dx * dx + dy * dy).sqrt();
	if dist < 0.001 {
		return;
	}
	let ty = edge.edge_type;

	if edge.selected {
		ctx.set_global_alpha(0.35);
		ctx.set_stroke_style_str(SELECTED_OUTLINE);
		ctx.set_line_width(edge.emphasis.stroke_width + 5.0 / k);
		let _ = ctx.set_line_dash(&js_sys::Array::new());
		trace_line(ctx, ty.line_kind, start, end);
		ctx.stroke();
	}

	ctx.set_global_alpha(edge.emphasis.opacity);
	ctx.set_stroke_style_str(edge.stroke());
	ctx.set_fill_style_str(edge.stroke());
	ctx.set_line_width(edge.emphasis.stroke_width);
	let dash = match ty.dash {
		Some((on, off)) => js_sys::Array::of2(&JsValue::from_f64(on), &JsValue::from_f64(off)),
		None => js_sys::Array::new(),
	};
	let _ = ctx.set_line_dash(&dash);
	trace_line(ctx, ty.line_kind, start, end);
	ctx.stroke();
	let _ = ctx.set_line_dash(&js_sys::Array::new());

	// the arrow follows the last segment of the line
	let tail = match ty.line_kind {
		LineKind::Straight => start,
		LineKind::Step => Position::new(end.x, (start.y + end.y) / 2.0),
	};
	let (sx, sy) = (end.x - tail.x, end.y - tail.y);
	let seg = (sx * sx + sy * sy).sqrt().max(0.001);
	let (ux, uy) = (sx / seg, sy / seg);
	let (back_x, back_y) = (end.x - ux * ARROW_SIZE, end.y - uy * ARROW_SIZE);
	let (px, py) = (-uy * ARROW_SIZE * 0.5, ux * ARROW_SIZE * 0.5);
	match ty.marker {
		ArrowMarker::Closed => {
			ctx.begin_path();
			ctx.move_to(end.x, end.y);
			ctx.line_to(back_x + px, back_y + py);
			ctx.line_to(back_x - px, back_y - py);
			ctx.close_path();
			ctx.fill();
		}
		ArrowMarker::Open => {
			ctx.begin_path();
			ctx.move_to(back_x + px, back_y + py);
			ctx.line_to(end.x, end.y);
			ctx.line_to(back_x - px, back_y - py);
			ctx.stroke();
		}
		ArrowMarker::None => {}
	}

	if let Some(label) = edge.label() {
		let (mx, my) = ((start.x + end.x) / 2.0, (start.y + end.y) / 2.0);
		ctx.set_font("11px sans-serif");
		let w = ctx.measure_text(label).map_or(12.0, |m| m.width());
		ctx.set_fill_style_str("#ffffff");
		ctx.fill_rect(mx - w / 2.0 - 3.0, my - 8.0, w + 6.0, 16.0);
		ctx.set_fill_style_str(edge.stroke());
		let _ = ctx.fill_text(label, mx - w / 2.0, my + 4.0);
	}
}

fn trace_line(ctx: &CanvasRenderingContext2d, kind: LineKind, start: Position, end: Position) {
	ctx.begin_path();
	ctx.move_to(start.x, start.y);
	if kind == LineKind::Step {
		let mid_y = (start.y + end.y) / 2.0;
		ctx.line_to(start.x, mid_y);
		ctx.line_to(end.x, mid_y);
	}
	ctx.line_to(end.x, end.y);
}

fn draw_connect_preview(state: &CanvasState, ctx: &CanvasRenderingContext2d) {
	let Some(from) = state
		.connect
		.source
		.as_deref()
		.and_then(|id| state.node_center(id))
	else {
		return;
	};
	ctx.set_stroke_style_str("#b1b1b7");
	ctx.set_line_width(1.5 / state.transform.k);
	let _ = ctx.set_line_dash(&js_sys::Array::of2(
		&JsValue::from_f64(5.0),
		&JsValue::from_f64(5.0),
	));
	ctx.begin_path();
	ctx.move_to(from.x, from.y);
	ctx.line_to(state.connect.cursor.x, state.connect.cursor.y);
	ctx.stroke();
	let _ = ctx.set_line_dash(&js_sys::Array::new());
}

fn draw_nodes(state: &CanvasState, ctx: &CanvasRenderingContext2d) {
	for node in &state.nodes {
		draw_node(state, ctx, node);
	}
	ctx.set_global_alpha(1.0);
}

fn draw_node(state: &CanvasState, ctx: &CanvasRenderingContext2d, node: &NodeView) {
	let p = state.node_position(node);
	let w = node.style.width;
	ctx.set_global_alpha(if node.class == Some(NodeClass::Dimmed) { 0.3 } else { 1.0 });

	rounded_rect(ctx, p.x, p.y, w, NODE_HEIGHT, CORNER);
	ctx.set_fill_style_str(&node.style.background);
	ctx.fill();
	ctx.set_stroke_style_str(border_color(&node.style.border));
	ctx.set_line_width(1.0);
	ctx.stroke();

	if node.class == Some(NodeClass::Selected) {
		rounded_rect(ctx, p.x - 3.0, p.y - 3.0, w + 6.0, NODE_HEIGHT + 6.0, CORNER + 2.0);
		ctx.set_stroke_style_str(SELECTED_OUTLINE);
		ctx.set_line_width(2.0 / state.transform.k);
		ctx.stroke();
	}

	let font = match &node.content {
		NodeContent::Label(_) => "13px sans-serif",
		NodeContent::Formula(_) => "italic 14px serif",
	};
	ctx.set_font(font);
	ctx.set_fill_style_str("#222222");
	let text = node.content.text();
	let tw = ctx.measure_text(text).map_or(0.0, |m| m.width()).min(w - 8.0);
	let _ = ctx.fill_text_with_max_width(
		text,
		p.x + (w - tw) / 2.0,
		p.y + NODE_HEIGHT / 2.0 + 5.0,
		w - 8.0,
	);

	// source handle
	ctx.begin_path();
	let _ = ctx.arc(p.x + w / 2.0, p.y + NODE_HEIGHT, 3.0, 0.0, 2.0 * PI);
	ctx.set_fill_style_str("#555555");
	ctx.fill();
}

#[cfg(test)]
mod tests {
	use super::border_color;

	#[test]
	fn border_color_takes_the_last_token() {
		assert_eq!(border_color("1px solid #2196F3"), "#2196F3");
		assert_eq!(border_color(""), "#9e9e9e");
	}
}
