use leptos::prelude::*;

use super::EditorContext;
use crate::graph::ContentMode;
use crate::graph::model::DEFAULT_CATEGORY;

#[component]
pub fn Toolbar() -> impl IntoView {
	let ctx = expect_context::<EditorContext>();
	let mode = move || ctx.with(|e| e.content_mode());
	let mode_label = move || match mode() {
		ContentMode::Label => "数式を表示",
		ContentMode::Formula => "名前を表示",
	};

	view! {
		<div class="toolbar">
			<button on:click=move |_| ctx.add_node_in_view()>"＋ 法則を追加"</button>
			<button on:click=move |_| {
				ctx.update(|e| e.toggle_content_mode());
			}>{mode_label}</button>
			<CategoryList />
			<ImportExport />
			<p class="hint">"Shift+ドラッグで関係を追加・エッジをダブルクリックで削除"</p>
		</div>
	}
}

#[component]
fn CategoryList() -> impl IntoView {
	let ctx = expect_context::<EditorContext>();
	let categories = move || ctx.with(|e| e.categories().to_vec());

	view! {
		<details class="category-list">
			<summary>"カテゴリ"</summary>
			<ul>
				{move || {
					categories()
						.into_iter()
						.map(|c| {
							let id = c.id.clone();
							let removable = c.id != DEFAULT_CATEGORY;
							view! {
								<li>
									<span class="swatch" style={format!("background: {}", c.color)}></span>
									{c.name}
									{removable
										.then(|| {
											view! {
												<button
													class="icon"
													title="削除"
													on:click=move |_| {
														ctx.update(|e| e.delete_category(&id));
													}
												>
													"×"
												</button>
											}
										})}
								</li>
							}
						})
						.collect_view()
				}}
			</ul>
		</details>
	}
}

/// Whole-graph JSON in a text area, for backup and for moving graphs between browsers.
#[component]
fn ImportExport() -> impl IntoView {
	let ctx = expect_context::<EditorContext>();
	let text = RwSignal::new(String::new());
	let status = RwSignal::new(None::<String>);

	let export = move |_: web_sys::MouseEvent| match ctx.peek(|e| e.export_json()) {
		Ok(json) => {
			text.set(json);
			status.set(None);
		}
		Err(err) => status.set(Some(err.to_string())),
	};
	let import = move |_: web_sys::MouseEvent| {
		let json = text.get_untracked();
		match ctx.update(|e| e.import_json(&json)) {
			Some(Err(err)) => status.set(Some(err.to_string())),
			_ => status.set(Some("読み込みました".to_string())),
		}
	};

	view! {
		<details class="import-export">
			<summary>"JSON"</summary>
			<textarea
				rows="6"
				prop:value=move || text.get()
				on:input=move |ev| text.set(event_target_value(&ev))
			/>
			<div class="inspector-actions">
				<button on:click=export>"書き出し"</button>
				<button on:click=import>"読み込み"</button>
			</div>
			<p class="muted">{move || status.get()}</p>
		</details>
	}
}
