use leptos::prelude::*;
use wasm_bindgen::{JsCast, JsValue};

/// Renders TeX source through `window.katex` when the page has loaded it,
/// and as plain text otherwise. The markup is never inspected here.
#[component]
pub fn Formula(#[prop(into)] tex: Signal<String>) -> impl IntoView {
	let target = NodeRef::<leptos::html::Div>::new();

	Effect::new(move |_| {
		let tex = tex.get();
		let Some(el) = target.get() else {
			return;
		};
		if !typeset(&tex, &el) {
			el.set_text_content(Some(tex.as_str()));
		}
	});

	view! { <div class="formula-box" node_ref=target></div> }
}

fn typeset(tex: &str, el: &web_sys::HtmlDivElement) -> bool {
	let Some(window) = web_sys::window() else {
		return false;
	};
	let Ok(katex) = js_sys::Reflect::get(&window, &JsValue::from_str("katex")) else {
		return false;
	};
	let Some(render) = js_sys::Reflect::get(&katex, &JsValue::from_str("render"))
		.ok()
		.and_then(|f| f.dyn_into::<js_sys::Function>().ok())
	else {
		return false;
	};
	let options = js_sys::Object::new();
	let _ = js_sys::Reflect::set(
		&options,
		&JsValue::from_str("throwOnError"),
		&JsValue::FALSE,
	);
	render
		.call3(&katex, &JsValue::from_str(tex), el, &options)
		.is_ok()
}
