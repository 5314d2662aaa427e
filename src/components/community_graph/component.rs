//! Leptos component hosting the graph container.

use leptos::prelude::*;
use web_sys::HtmlElement;

use super::panels::ControllerHandle;

/// Renders the element the rendering engine draws into and hands it to the
/// controller once it is in the DOM.
#[component]
pub fn CommunityGraph(controller: ControllerHandle) -> impl IntoView {
	let container_ref = NodeRef::<leptos::html::Div>::new();

	Effect::new(move |_| {
		let Some(container) = container_ref.get() else {
			return;
		};
		let container: HtmlElement = container.into();
		controller.with_value(|c| c.mount(container));
	});

	view! {
		<div
			node_ref=container_ref
			id="graph-display"
			class="graph-display"
			style="width: 100%; height: 100%;"
		/>
	}
}
