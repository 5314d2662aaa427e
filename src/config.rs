//! Runtime configuration read from the host page.
//!
//! The page may embed
//! `<script id="gcviz-config" type="application/json">{ ... }</script>`;
//! every field is optional.

use log::{info, warn};
use serde::Deserialize;
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

use crate::components::community_graph::Layout;

/// Id of the script element holding the JSON configuration.
pub const CONFIG_ELEMENT_ID: &str = "gcviz-config";

/// Page-level settings.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
	/// Origin of the REST service; the page origin when unset.
	pub api_base: Option<String>,
	/// Layout used for the first draw. Unsupported names fall back to `circle`.
	pub default_layout: Option<String>,
	/// Algorithm opened at startup; the first catalog entry when unset.
	pub initial_algorithm: Option<String>,
}

impl Config {
	pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
		serde_json::from_str(text)
	}

	/// Configured layout, or the default one.
	pub fn layout(&self) -> Layout {
		self.default_layout
			.as_deref()
			.and_then(Layout::from_name)
			.unwrap_or_default()
	}

	/// Service origin, falling back to `fallback` (normally the page origin).
	pub fn api_base_or(&self, fallback: &str) -> String {
		self.api_base
			.clone()
			.filter(|base| !base.is_empty())
			.unwrap_or_else(|| fallback.to_string())
	}
}

fn page_origin(window: &Window) -> String {
	window.location().origin().unwrap_or_default()
}

/// Load configuration from the page, falling back to defaults.
/// Returns the config together with the resolved service origin.
pub fn load_config() -> (Config, String) {
	let Some(window) = web_sys::window() else {
		return (Config::default(), String::new());
	};
	let origin = page_origin(&window);

	let text = window
		.document()
		.and_then(|document| document.get_element_by_id(CONFIG_ELEMENT_ID))
		.and_then(|element| element.dyn_into::<HtmlScriptElement>().ok())
		.and_then(|script| script.text().ok());

	let config = match text.as_deref().map(Config::from_json) {
		Some(Ok(config)) => {
			info!("gcviz: loaded page configuration");
			config
		}
		Some(Err(e)) => {
			warn!("gcviz: ignoring invalid configuration: {}", e);
			Config::default()
		}
		None => Config::default(),
	};
	let base = config.api_base_or(&origin);
	(config, base)
}
