//! gcviz: interactive visualization of gene-community partitions.
//!
//! This crate provides a WASM front end that lets a user pick a community
//! detection algorithm, toggle which communities of its partition are drawn,
//! inspect gene metadata and switch graph layouts. Partitions, interactions
//! and gene metadata come from the gcviz REST service; drawing is delegated
//! to cytoscape.js.

use std::rc::Rc;

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info};

pub mod api;
pub mod components;
pub mod config;

#[cfg(all(target_arch = "wasm32", target_os = "unknown"))]
use getrandom as _;

pub use components::community_graph::{AppState, CommunityGraph, Controller, GraphRenderer};
pub use config::{Config, load_config};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("gcviz: logging initialized");
}

/// Main application component.
/// Reads the page configuration, loads the algorithm catalog and renders the
/// graph with its side panels.
#[component]
pub fn App() -> impl IntoView {
	use components::community_graph::{
		AlgorithmSelect, CommunityPicker, ErrorBanner, GeneInfoPanel, LayoutSelect, Legend,
	};

	provide_meta_context();

	let (config, api_base) = load_config();
	info!("gcviz: using service at '{api_base}'");
	let controller: Rc<Controller> = Controller::new(config, api_base);
	controller.start();
	let ui = controller.ui;
	let controller = StoredValue::new_local(controller);

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />
		<Title text="Gene Community Visualization" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<div class="fullscreen-graph">
			<nav class="algorithm-sidenav">
				<h1>"Gene communities"</h1>
				<AlgorithmSelect controller=controller ui=ui />
				<LayoutSelect controller=controller ui=ui />
				<CommunityPicker controller=controller ui=ui />
			</nav>
			<main class="graph-area">
				<CommunityGraph controller=controller />
				<Legend ui=ui />
			</main>
			<GeneInfoPanel controller=controller ui=ui />
			<ErrorBanner ui=ui />
		</div>
	}
}
