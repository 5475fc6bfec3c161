use leptos::prelude::*;

use super::EditorContext;
use crate::graph::CategoryDraft;

/// Modal for the "new category" sub-flow opened from the node form.
#[component]
pub fn CategoryModal() -> impl IntoView {
	let ctx = expect_context::<EditorContext>();
	let open = move || ctx.with(|e| e.session().category_flow().is_some());
	let draft = move || {
		ctx.with(|e| e.session().category_flow().cloned())
			.unwrap_or_default()
	};
	let current = move || {
		ctx.peek(|e| e.session().category_flow().cloned())
			.unwrap_or_default()
	};
	let set_name = move |name: String| {
		let color = current().color;
		ctx.update(|e| e.update_category_draft(CategoryDraft { name, color }));
	};
	let set_color = move |color: String| {
		let name = current().name;
		ctx.update(|e| e.update_category_draft(CategoryDraft { name, color }));
	};

	view! {
		<Show when=open>
			<div class="modal-backdrop">
				<form
					class="modal"
					on:submit=move |ev| {
						ev.prevent_default();
						if current().name.trim().is_empty() {
							return;
						}
						ctx.update(|e| e.submit_category_flow());
					}
				>
					<h3>"新しいカテゴリ"</h3>
					<label>"名前"</label>
					<input
						type="text"
						prop:value=move || draft().name
						on:input=move |ev| set_name(event_target_value(&ev))
					/>
					<label>"色"</label>
					<input
						type="color"
						prop:value=move || draft().color
						on:input=move |ev| set_color(event_target_value(&ev))
					/>
					<div class="inspector-actions">
						<button type="submit">"作成"</button>
						<button
							type="button"
							on:click=move |_| {
								ctx.update(|e| e.cancel_category_flow());
							}
						>
							"キャンセル"
						</button>
					</div>
				</form>
			</div>
		</Show>
	}
}
