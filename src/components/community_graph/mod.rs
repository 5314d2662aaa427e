//! Gene-community graph view.
//!
//! Displays the communities of one clustering algorithm as a graph:
//! - [`AppState`] tracks the partition, the displayed communities, their
//!   styles and the edges between them
//! - [`GraphRenderer`] turns that state into full redraws of a rendering
//!   engine ([`Cytoscape`] in the browser)
//! - the panels let the user pick an algorithm, toggle communities, switch
//!   layouts and inspect genes
//!
//! # Example
//!
//! ```ignore
//! let controller = Controller::new(Config::default(), "http://localhost:5000".into());
//! controller.start();
//! let controller = StoredValue::new_local(controller);
//!
//! view! { <CommunityGraph controller=controller /> }
//! ```

mod component;
mod controller;
mod cytoscape;
mod elements;
mod panels;
mod renderer;
mod state;
#[cfg(test)]
mod testing;
pub mod theme;

pub use component::CommunityGraph;
pub use controller::{Controller, UiSignals};
pub use cytoscape::{Cytoscape, frame_options};
pub use elements::{Element, INTERCLUSTER_CLASS, Layout, RenderFrame, StyleRule};
pub use panels::{
	AlgorithmSelect, CommunityPicker, ControllerHandle, ErrorBanner, GeneInfoPanel, LayoutSelect,
	Legend,
};
pub use renderer::{ElementHandler, ElementSource, EventBinding, GraphRenderer, RenderEngine, RenderError};
pub use state::{
	AppState, CommunitySummary, INITIAL_ALGORITHM, LegendEntry, StateError, default_community,
	sort_partition,
};
pub use theme::{Color, CommunityStyle};
