use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, KeyboardEvent, MouseEvent, WheelEvent};

use super::render;
use super::state::{CanvasState, DRAG_THRESHOLD, mint_edge_id};
use super::types::Gesture;
use crate::graph::{EdgeView, NodeView, Position};

fn pointer(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

/// Draws the projected graph and reports pointer gestures.
///
/// Press and release on a node selects it, pressing and moving drags it, and
/// shift-dragging from one node to another connects them. Edges are selected
/// by click, deleted by double click or the Delete key while selected.
#[component]
pub fn GraphCanvas(
	#[prop(into)] nodes: Signal<Vec<NodeView>>,
	#[prop(into)] edges: Signal<Vec<EdgeView>>,
	#[prop(into)] on_gesture: Callback<Gesture>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: Rc<RefCell<Option<CanvasState>>> = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let (state_init, animate_init, resize_cb_init) =
		(state.clone(), animate.clone(), resize_cb.clone());

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			return;
		};
		let parent_size = |c: &HtmlCanvasElement| {
			c.parent_element()
				.map(|p| (p.client_width() as f64, p.client_height() as f64))
				.unwrap_or((800.0, 600.0))
		};
		let (w, h) = parent_size(&canvas);
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let Some(ctx) = canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok())
		else {
			log::warn!("2d canvas context unavailable");
			return;
		};
		let canvas_state = CanvasState::new(w, h);
		on_gesture.run(Gesture::ViewportMoved(canvas_state.viewport_center()));
		*state_init.borrow_mut() = Some(canvas_state);

		let (state_resize, canvas_resize) = (state_init.clone(), canvas.clone());
		*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
			let (nw, nh) = parent_size(&canvas_resize);
			canvas_resize.set_width(nw as u32);
			canvas_resize.set_height(nh as u32);
			if let Some(ref mut s) = *state_resize.borrow_mut() {
				s.resize(nw, nh);
				on_gesture.run(Gesture::ViewportMoved(s.viewport_center()));
			}
		}));
		if let Some(ref cb) = *resize_cb_init.borrow() {
			let _ = window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}

		let (state_anim, animate_inner) = (state_init.clone(), animate_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if let Some(ref s) = *state_anim.borrow() {
				render::render(s, &ctx);
			}
			if let (Some(cb), Some(win)) = (&*animate_inner.borrow(), web_sys::window()) {
				let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let state_views = state.clone();
	Effect::new(move |_| {
		let (nodes, edges) = (nodes.get(), edges.get());
		if let Some(ref mut s) = *state_views.borrow_mut() {
			s.nodes = nodes;
			s.edges = edges;
		}
	});

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = pointer(canvas_ref, &ev) else {
			return;
		};
		let mut guard = state_md.borrow_mut();
		let Some(s) = guard.as_mut() else {
			return;
		};
		if let Some(node) = s.node_at_position(x, y) {
			let (id, start) = (node.id.clone(), s.node_position(node));
			if ev.shift_key() {
				s.connect.source = Some(id);
				s.connect.cursor = s.screen_to_graph(x, y);
			} else {
				s.drag.node_id = Some(id);
				s.drag.moved = false;
				s.drag.start_x = x;
				s.drag.start_y = y;
				s.drag.node_start = start;
				s.drag.current = start;
			}
		} else {
			s.pan.edge_id = s.edge_at_position(x, y).map(|e| e.id.clone());
			s.pan.active = true;
			s.pan.moved = false;
			s.pan.start_x = x;
			s.pan.start_y = y;
			s.pan.transform_start_x = s.transform.x;
			s.pan.transform_start_y = s.transform.y;
		}
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = pointer(canvas_ref, &ev) else {
			return;
		};
		let mut guard = state_mm.borrow_mut();
		let Some(s) = guard.as_mut() else {
			return;
		};
		if s.connect.source.is_some() {
			s.connect.cursor = s.screen_to_graph(x, y);
		} else if let Some(id) = s.drag.node_id.clone() {
			let (dx, dy) = (x - s.drag.start_x, y - s.drag.start_y);
			if !s.drag.moved && dx.hypot(dy) >= DRAG_THRESHOLD {
				s.drag.moved = true;
				on_gesture.run(Gesture::DragStart(id));
			}
			if s.drag.moved {
				s.drag.current = Position::new(
					s.drag.node_start.x + dx / s.transform.k,
					s.drag.node_start.y + dy / s.transform.k,
				);
			}
		} else if s.pan.active {
			let (dx, dy) = (x - s.pan.start_x, y - s.pan.start_y);
			if dx.hypot(dy) >= DRAG_THRESHOLD {
				s.pan.moved = true;
			}
			if s.pan.moved {
				s.transform.x = s.pan.transform_start_x + dx;
				s.transform.y = s.pan.transform_start_y + dy;
			}
		}
	};

	let state_mu = state.clone();
	let on_mouseup = move |ev: MouseEvent| {
		let point = pointer(canvas_ref, &ev);
		let mut gestures = Vec::new();
		if let Some(ref mut s) = *state_mu.borrow_mut() {
			if let Some(source) = s.connect.source.take() {
				let target = point.and_then(|(x, y)| s.node_at_position(x, y).map(|n| n.id.clone()));
				if let Some(target) = target {
					gestures.push(Gesture::Connected {
						id: mint_edge_id(&source, &target, js_sys::Date::now() as u64),
						source,
						target,
					});
				}
			} else if let Some(id) = s.drag.node_id.take() {
				if s.drag.moved {
					gestures.push(Gesture::NodeMoved {
						id,
						position: s.drag.current,
					});
				} else {
					gestures.push(Gesture::NodeSelected(id));
				}
				s.drag.moved = false;
			} else if s.pan.active {
				if s.pan.moved {
					gestures.push(Gesture::ViewportMoved(s.viewport_center()));
				} else if let Some(edge) = s.pan.edge_id.take() {
					gestures.push(Gesture::EdgeSelected(edge));
				} else {
					gestures.push(Gesture::PaneClicked);
				}
			}
			s.pan.active = false;
			s.pan.edge_id = None;
		}
		for gesture in gestures {
			on_gesture.run(gesture);
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		let mut released = None;
		if let Some(ref mut s) = *state_ml.borrow_mut() {
			if let Some(id) = s.drag.node_id.take() {
				if s.drag.moved {
					released = Some(Gesture::NodeMoved {
						id,
						position: s.drag.current,
					});
				}
			}
			s.drag.moved = false;
			s.pan.active = false;
			s.connect.source = None;
		}
		if let Some(gesture) = released {
			on_gesture.run(gesture);
		}
	};

	let state_dc = state.clone();
	let on_dblclick = move |ev: MouseEvent| {
		let Some((x, y)) = pointer(canvas_ref, &ev) else {
			return;
		};
		let hit = state_dc.borrow().as_ref().and_then(|s| {
			if s.node_at_position(x, y).is_some() {
				return None;
			}
			s.edge_at_position(x, y).map(|e| e.id.clone())
		});
		if let Some(id) = hit {
			on_gesture.run(Gesture::EdgeDoubleClicked(id));
		}
	};

	let state_kd = state.clone();
	let on_keydown = move |ev: KeyboardEvent| {
		if ev.key() != "Delete" && ev.key() != "Backspace" {
			return;
		}
		let selected = state_kd
			.borrow()
			.as_ref()
			.and_then(|s| s.edges.iter().find(|e| e.selected).map(|e| e.id.clone()));
		if let Some(id) = selected {
			ev.prevent_default();
			on_gesture.run(Gesture::EdgeRemoved(id));
		}
	};

	let state_wh = state.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some((x, y)) = pointer(canvas_ref, &ev) else {
			return;
		};
		let mut center = None;
		if let Some(ref mut s) = *state_wh.borrow_mut() {
			let factor = if ev.delta_y() > 0.0 { 0.9 } else { 1.1 };
			let new_k = (s.transform.k * factor).clamp(0.2, 4.0);
			let ratio = new_k / s.transform.k;
			s.transform.x = x - (x - s.transform.x) * ratio;
			s.transform.y = y - (y - s.transform.y) * ratio;
			s.transform.k = new_k;
			center = Some(s.viewport_center());
		}
		if let Some(center) = center {
			on_gesture.run(Gesture::ViewportMoved(center));
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="graph-canvas"
			tabindex="0"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:dblclick=on_dblclick
			on:keydown=on_keydown
			on:wheel=on_wheel
			style="display: block; cursor: default; outline: none;"
		/>
	}
}
