use leptos::prelude::*;

use super::{EditorContext, Formula};
use crate::graph::session::NEW_CATEGORY_OPTION;
use crate::graph::{DraftField, RelatedNode};

/// Right-hand panel: details of the focal node, its relations, and the edit form.
#[component]
pub fn Inspector() -> impl IntoView {
	let ctx = expect_context::<EditorContext>();
	let has_focus = move || ctx.with(|e| e.focal_node().is_some());
	let editing = move || ctx.with(|e| e.session().is_editing());

	view! {
		<div class="inspector-area">
			<Show
				when=has_focus
				fallback=|| {
					view! {
						<div class="empty-state">
							<p>"ノードをクリックして" <br /> "詳細を表示"</p>
						</div>
					}
				}
			>
				<Show when=editing fallback=|| view! { <NodeDetails /> }>
					<NodeForm />
				</Show>
			</Show>
		</div>
	}
}

#[component]
fn NodeDetails() -> impl IntoView {
	let ctx = expect_context::<EditorContext>();
	let field = move |f: fn(&crate::graph::NodeData) -> String| {
		move || ctx.with(|e| e.focal_node().map(|n| f(&n.data)).unwrap_or_default())
	};
	let label = field(|d| d.label.clone());
	let description = field(|d| d.description.clone());
	let formula = Signal::derive(field(|d| d.formula.clone()));
	let category = move || {
		ctx.with(|e| {
			let node = e.focal_node()?;
			let name = e
				.document()
				.category(&node.data.category)
				.map_or("(削除されたカテゴリ)", |c| c.name.as_str())
				.to_string();
			Some(name)
		})
	};
	let relations = Memo::new(move |_| ctx.with(|e| e.relation_info()));
	let sources = Signal::derive(move || relations.with(|r| r.sources.clone()));
	let targets = Signal::derive(move || relations.with(|r| r.targets.clone()));

	view! {
		<div>
			<h2 class="inspector-title">{label}</h2>
			<span class="category-chip">{category}</span>
			<Formula tex=formula />
			<div class="description-box">
				<h3>"解説"</h3>
				<p>{description}</p>
			</div>
			<RelatedList title="導出元" items=sources />
			<RelatedList title="導出先" items=targets />
			<div class="inspector-actions">
				<button on:click=move |_| {
					ctx.update(|e| e.begin_edit());
				}>"編集"</button>
				<button
					class="danger"
					on:click=move |_| {
						ctx.update(|e| e.delete_focal_node());
					}
				>
					"削除"
				</button>
			</div>
		</div>
	}
}

#[component]
fn RelatedList(
	title: &'static str,
	#[prop(into)] items: Signal<Vec<RelatedNode>>,
) -> impl IntoView {
	let ctx = expect_context::<EditorContext>();
	view! {
		<div class="related-list">
			<h3>{title}</h3>
			<Show
				when=move || items.with(|i| !i.is_empty())
				fallback=|| view! { <p class="muted">"なし"</p> }
			>
				<ul>
					{move || {
						items
							.get()
							.into_iter()
							.map(|item| {
								let id = item.id.clone();
								view! {
									<li on:click=move |_| {
										ctx.update(|e| e.select_node(&id));
									}>
										<code>{item.formula}</code>
									</li>
								}
							})
							.collect_view()
					}}
				</ul>
			</Show>
		</div>
	}
}

#[component]
fn NodeForm() -> impl IntoView {
	let ctx = expect_context::<EditorContext>();
	let draft = move |f: fn(&crate::graph::NodeData) -> String| {
		move || ctx.with(|e| e.session().draft().map(|d| f(d)).unwrap_or_default())
	};
	let set = move |field: DraftField| {
		ctx.update(|e| e.edit_field(field));
	};
	let categories = move || ctx.with(|e| e.categories().to_vec());
	let selected = draft(|d| d.category.clone());
	let picker = NodeRef::<leptos::html::Select>::new();
	// resync the DOM value after a cancelled new-category flow
	Effect::new(move |_| {
		let choice = ctx.with(|e| e.session().category_choice().map(str::to_string));
		if let (Some(el), Some(choice)) = (picker.get(), choice) {
			el.set_value(&choice);
		}
	});

	view! {
		<form
			class="node-form"
			on:submit=move |ev| {
				ev.prevent_default();
				ctx.update(|e| e.save_edit());
			}
		>
			<label>"名前"</label>
			<input
				type="text"
				prop:value={draft(|d| d.label.clone())}
				on:input=move |ev| set(DraftField::Label(event_target_value(&ev)))
			/>
			<label>"数式 (LaTeX)"</label>
			<textarea
				prop:value={draft(|d| d.formula.clone())}
				on:input=move |ev| set(DraftField::Formula(event_target_value(&ev)))
			/>
			<Formula tex={Signal::derive(draft(|d| d.formula.clone()))} />
			<label>"解説"</label>
			<textarea
				rows="4"
				prop:value={draft(|d| d.description.clone())}
				on:input=move |ev| set(DraftField::Description(event_target_value(&ev)))
			/>
			<label>"カテゴリ"</label>
			<select
				node_ref=picker
				prop:value=selected
				on:change=move |ev| set(DraftField::Category(event_target_value(&ev)))
			>
				{move || {
					categories()
						.into_iter()
						.map(|c| {
							let id = c.id.clone();
							view! {
								<option value={c.id} selected=move || selected() == id>
									{c.name}
								</option>
							}
						})
						.collect_view()
				}}
				<option value=NEW_CATEGORY_OPTION>"＋ 新しいカテゴリ…"</option>
			</select>
			<div class="inspector-actions">
				<button type="submit">"保存"</button>
				<button
					type="button"
					on:click=move |_| {
						ctx.update(|e| e.cancel_edit());
					}
				>
					"キャンセル"
				</button>
			</div>
		</form>
	}
}
