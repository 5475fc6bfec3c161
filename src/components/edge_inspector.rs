use leptos::prelude::*;

use super::EditorContext;
use crate::graph::EdgeKind;

/// Floating panel for the selected edge: relation type and removal.
#[component]
pub fn EdgeInspector() -> impl IntoView {
	let ctx = expect_context::<EditorContext>();
	let edge = move || ctx.with(|e| e.selected_edge().cloned());

	view! {
		{move || {
			edge()
				.map(|edge| {
					let (id_change, id_delete, id_close) =
						(edge.id.clone(), edge.id.clone(), edge.id.clone());
					let current = edge.kind();
					view! {
						<div class="edge-inspector">
							<h3>"関係の種類"</h3>
							<p class="muted">{format!("{} → {}", edge.source, edge.target)}</p>
							<select on:change=move |ev| {
								let type_id = event_target_value(&ev);
								ctx.update(|e| e.set_edge_type(&id_change, &type_id));
							}>
								{EdgeKind::ALL
									.into_iter()
									.map(|kind| {
										view! {
											<option value={kind.id()} selected={kind == current}>
												{kind.definition().name}
											</option>
										}
									})
									.collect_view()}
							</select>
							<div class="inspector-actions">
								<button
									class="danger"
									on:click=move |_| {
										ctx.update(|e| e.delete_edge(&id_delete));
									}
								>
									"削除"
								</button>
								<button on:click=move |_| {
									ctx.update(|e| e.click_edge(&id_close));
								}>"閉じる"</button>
							</div>
						</div>
					}
				})
		}}
	}
}
