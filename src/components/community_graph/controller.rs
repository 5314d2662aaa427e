//! Glue between UI events, application state and the renderer.
//!
//! UI event -> state mutation (async) -> redraw + legend refresh. Failures are
//! logged and surfaced through [`UiSignals::error`]; the last good graph stays
//! on screen.

use std::cell::RefCell;
use std::fmt::Display;
use std::rc::Rc;

use leptos::prelude::*;
use leptos::task::spawn_local;
use log::warn;
use web_sys::HtmlElement;

use super::cytoscape::Cytoscape;
use super::elements::Layout;
use super::renderer::GraphRenderer;
use super::state::{AppState, CommunitySummary, INITIAL_ALGORITHM, LegendEntry};
use crate::api::{Algorithm, Backend, HttpBackend, NodeId};
use crate::config::Config;

/// Reactive view of the state, read by the panels.
#[derive(Clone, Copy)]
#[allow(missing_docs)]
pub struct UiSignals {
	pub algorithms: RwSignal<Vec<Algorithm>>,
	pub algorithm: RwSignal<String>,
	pub communities: RwSignal<Vec<CommunitySummary>>,
	pub active: RwSignal<Vec<usize>>,
	pub legend: RwSignal<Vec<LegendEntry>>,
	/// Rows of the gene info panel; `None` hides the panel.
	pub gene: RwSignal<Option<Vec<(String, String)>>>,
	pub layout: RwSignal<Layout>,
	pub error: RwSignal<Option<String>>,
}

impl UiSignals {
	fn new(layout: Layout) -> Self {
		Self {
			algorithms: RwSignal::new(Vec::new()),
			algorithm: RwSignal::new(String::new()),
			communities: RwSignal::new(Vec::new()),
			active: RwSignal::new(Vec::new()),
			legend: RwSignal::new(Vec::new()),
			gene: RwSignal::new(None),
			layout: RwSignal::new(layout),
			error: RwSignal::new(None),
		}
	}
}

/// Owns the application state and the renderer, and drives both from UI
/// events.
pub struct Controller {
	state: Rc<AppState<HttpBackend>>,
	renderer: RefCell<GraphRenderer<Cytoscape>>,
	config: Config,
	/// Signals the panels read.
	pub ui: UiSignals,
}

impl Controller {
	/// Build the controller against the service at `api_base`. Tapping a node
	/// opens its gene info.
	pub fn new(config: Config, api_base: String) -> Rc<Self> {
		let state = Rc::new(AppState::new(HttpBackend::new(api_base)));
		let mut renderer = GraphRenderer::new(Cytoscape);
		renderer.bind(state.clone());
		renderer.set_layout(config.layout().name());

		let controller = Rc::new(Self {
			ui: UiSignals::new(renderer.layout()),
			state,
			renderer: RefCell::new(renderer),
			config,
		});

		let weak = Rc::downgrade(&controller);
		controller.renderer.borrow_mut().attach_event(
			"tap",
			"node",
			Rc::new(move |id: &NodeId| {
				if let Some(controller) = weak.upgrade() {
					controller.show_gene(id.clone());
				}
			}),
		);
		controller
	}

	/// Give the renderer its container and draw whatever is loaded.
	pub fn mount(&self, container: HtmlElement) {
		self.renderer.borrow_mut().set_container(container);
		self.refresh_view();
	}

	/// Load the catalog and open the configured algorithm, falling back to
	/// [`INITIAL_ALGORITHM`] and then to the first entry.
	pub fn start(self: &Rc<Self>) {
		let this = self.clone();
		spawn_local(async move {
			let algorithms = match this.state.fetch_algorithms().await {
				Ok(algorithms) => algorithms,
				Err(e) => return this.report(e),
			};
			let initial = this
				.config
				.initial_algorithm
				.clone()
				.into_iter()
				.chain([INITIAL_ALGORITHM.to_string()])
				.find(|r| algorithms.iter().any(|a| &a.resource == r))
				.or_else(|| algorithms.first().map(|a| a.resource.clone()));
			this.ui.algorithms.set(algorithms);
			if let Some(resource) = initial {
				this.change_algorithm(resource);
			}
		});
	}

	/// Switch to another algorithm's partition.
	pub fn change_algorithm(self: &Rc<Self>, resource: String) {
		let this = self.clone();
		spawn_local(async move {
			match this.state.select_algorithm(&resource).await {
				Ok(()) => {
					this.ui.communities.set(this.state.community_summaries());
					this.ui.gene.set(None);
					this.refresh_view();
				}
				Err(e) => this.report(e),
			}
		});
	}

	/// Show or hide a community.
	pub fn toggle_community(self: &Rc<Self>, index: usize) {
		if self.state.is_active(index) {
			match self.state.deactivate_community(index) {
				Ok(()) => self.refresh_view(),
				Err(e) => self.report(e),
			}
			return;
		}
		let this = self.clone();
		spawn_local(async move {
			match this.state.activate_community(index).await {
				Ok(()) => this.refresh_view(),
				Err(e) => this.report(e),
			}
		});
	}

	/// Unknown layout names keep the current layout.
	pub fn change_layout(&self, name: &str) {
		let layout = {
			let mut renderer = self.renderer.borrow_mut();
			renderer.set_layout(name);
			renderer.layout()
		};
		self.ui.layout.set(layout);
		self.refresh_view();
	}

	/// Fetch a gene's metadata into the info panel.
	pub fn show_gene(self: &Rc<Self>, id: NodeId) {
		let this = self.clone();
		spawn_local(async move {
			match this.state.backend().gene(&id).await {
				Ok(info) => this.ui.gene.set(Some(info.rows())),
				Err(e) => this.report(format!("gene {id}: {e}")),
			}
		});
	}

	/// Hide the info panel.
	pub fn close_gene(&self) {
		self.ui.gene.set(None);
	}

	/// Redraw the graph and push the state into the UI signals.
	fn refresh_view(&self) {
		match self.renderer.borrow_mut().redraw() {
			Ok(_) => self.ui.error.set(None),
			Err(e) => self.report(e),
		}
		self.ui.algorithm.set(self.state.algorithm());
		self.ui.active.set(self.state.active_communities());
		self.ui.legend.set(self.state.legend());
	}

	fn report(&self, error: impl Display) {
		warn!("gcviz: {error}");
		self.ui.error.set(Some(error.to_string()));
	}
}
