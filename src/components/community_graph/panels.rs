//! Side panels: algorithm and layout pickers, community chips, legend,
//! gene info and the error banner.

use std::rc::Rc;

use leptos::prelude::*;

use super::controller::{Controller, UiSignals};
use super::elements::Layout;
use crate::api::Algorithm;

/// Handle to the controller that can be captured by reactive closures.
pub type ControllerHandle = StoredValue<Rc<Controller>, LocalStorage>;

fn algorithm_label(algorithm: &Algorithm) -> String {
	match algorithm.modularity {
		Some(q) => format!("{} (Q = {:.3})", algorithm.name, q),
		None => algorithm.name.clone(),
	}
}

/// Algorithm dropdown, labelled with modularity where known.
#[component]
pub fn AlgorithmSelect(controller: ControllerHandle, ui: UiSignals) -> impl IntoView {
	let on_change = move |ev| {
		let resource = event_target_value(&ev);
		controller.with_value(|c| c.change_algorithm(resource));
	};

	view! {
		<label class="panel-label">"Algorithm"</label>
		<select class="algorithm-select" on:change=on_change prop:value=move || ui.algorithm.get()>
			<For each=move || ui.algorithms.get() key=|a| a.resource.clone() let:algorithm>
				<option value=algorithm.resource.clone()>{algorithm_label(&algorithm)}</option>
			</For>
		</select>
	}
}

/// Layout dropdown.
#[component]
pub fn LayoutSelect(controller: ControllerHandle, ui: UiSignals) -> impl IntoView {
	let on_change = move |ev| {
		let name = event_target_value(&ev);
		controller.with_value(|c| c.change_layout(&name));
	};

	view! {
		<label class="panel-label">"Layout"</label>
		<select class="layout-select" on:change=on_change>
			{Layout::ALL
				.into_iter()
				.map(|layout| {
					view! {
						<option value=layout.name() selected=move || ui.layout.get() == layout>
							{layout.name()}
						</option>
					}
				})
				.collect_view()}
		</select>
	}
}

/// One chip per community, colored by size; clicking toggles it.
#[component]
pub fn CommunityPicker(controller: ControllerHandle, ui: UiSignals) -> impl IntoView {
	view! {
		<div class="communities-container">
			<For each=move || ui.communities.get() key=|c| c.clone() let:community>
				{
					let index = community.index;
					let class = move || {
						if ui.active.with(|active| active.contains(&index)) {
							"community-item pulse active-community-item"
						} else {
							"community-item"
						}
					};
					view! {
						<div
							class=class
							style=format!("background-color: {}", community.color.to_css_rgb())
							title=format!("{} elements", community.size)
							on:click=move |_| controller.with_value(|c| c.toggle_community(index))
						>
							{index}
						</div>
					}
				}
			</For>
		</div>
	}
}

/// Color swatch per displayed community.
#[component]
pub fn Legend(ui: UiSignals) -> impl IntoView {
	view! {
		<div class="legend">
			<p style="text-align: center">"Legend"</p>
			<For each=move || ui.legend.get() key=|entry| entry.clone() let:entry>
				<p>
					<span
						class="colorblock"
						style=format!("background-color: {}", entry.color.to_css_rgb())
					></span>
					{format!("[{}]", entry.index)}
				</p>
			</For>
		</div>
	}
}

/// Metadata of the last tapped gene.
#[component]
pub fn GeneInfoPanel(controller: ControllerHandle, ui: UiSignals) -> impl IntoView {
	view! {
		<Show when=move || ui.gene.with(Option::is_some)>
			<aside class="gene-info-sidenav">
				<button class="close" on:click=move |_| controller.with_value(|c| c.close_gene())>
					"×"
				</button>
				<table class="gene-info-table">
					<For
						each=move || ui.gene.get().unwrap_or_default()
						key=|row| row.clone()
						let:row
					>
						<tr>
							<th>{row.0.clone()}</th>
							<td>{row.1.clone()}</td>
						</tr>
					</For>
				</table>
			</aside>
		</Show>
	}
}

/// Last error, cleared by the next successful redraw.
#[component]
pub fn ErrorBanner(ui: UiSignals) -> impl IntoView {
	move || {
		ui.error
			.get()
			.map(|message| view! { <div class="error-banner">{message}</div> })
	}
}
