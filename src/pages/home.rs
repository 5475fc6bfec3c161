use leptos::prelude::*;

use crate::components::{
	CategoryModal, EdgeInspector, EditorContext, Gesture, GraphCanvas, Inspector, Toolbar,
};
use crate::config::EditorConfig;

/// The editor page: canvas on the left, inspector on the right.
#[component]
pub fn Home() -> impl IntoView {
	let ctx = EditorContext::new(&EditorConfig::default());
	provide_context(ctx);

	let nodes = Memo::new(move |_| ctx.with(|e| e.node_views()));
	let edges = Memo::new(move |_| ctx.with(|e| e.edge_views()));
	let on_gesture = Callback::new(move |gesture: Gesture| ctx.gesture(gesture));

	let unload = window_event_listener(leptos::ev::beforeunload, move |_| ctx.flush());
	on_cleanup(move || unload.remove());

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>

			<div class="app-container">
				<div class="canvas-area">
					<GraphCanvas nodes=nodes edges=edges on_gesture=on_gesture />
					<Toolbar />
					<EdgeInspector />
				</div>
				<Inspector />
				<CategoryModal />
			</div>
		</ErrorBoundary>
	}
}
