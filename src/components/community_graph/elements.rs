//! Engine-agnostic render model: elements, style rules and layout names.

use std::fmt;

use serde_json::{Map, Value};

use crate::api::{GraphElement, NodeId};

/// Style class carried by synthetic cross-community edges.
pub const INTERCLUSTER_CLASS: &str = "intercluster-edge";

/// Layouts the rendering engine is allowed to run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Layout {
	#[default]
	Circle,
	Grid,
	Breadthfirst,
	Random,
	Concentric,
}

impl Layout {
	pub const ALL: [Layout; 5] = [
		Layout::Circle,
		Layout::Grid,
		Layout::Breadthfirst,
		Layout::Random,
		Layout::Concentric,
	];

	pub fn name(self) -> &'static str {
		match self {
			Layout::Circle => "circle",
			Layout::Grid => "grid",
			Layout::Breadthfirst => "breadthfirst",
			Layout::Random => "random",
			Layout::Concentric => "concentric",
		}
	}

	/// Exact-match lookup; anything outside the supported set is `None`.
	pub fn from_name(name: &str) -> Option<Self> {
		Self::ALL.into_iter().find(|l| l.name() == name)
	}
}

impl fmt::Display for Layout {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

/// A single element handed to the rendering engine.
#[derive(Clone, Debug, PartialEq)]
pub enum Element {
	Node {
		id: NodeId,
		attributes: Map<String, Value>,
		class: Option<String>,
	},
	Edge {
		id: NodeId,
		source: NodeId,
		target: NodeId,
		class: Option<String>,
	},
}

impl Element {
	/// Convert a partition element. `node_class` is applied to nodes only;
	/// intra-community edges keep the base edge style.
	pub fn from_partition(element: &GraphElement, node_class: Option<&str>) -> Self {
		let data = &element.data;
		match (&data.source, &data.target) {
			(Some(source), Some(target)) => Element::Edge {
				id: data.id.clone(),
				source: source.clone(),
				target: target.clone(),
				class: None,
			},
			_ => Element::Node {
				id: data.id.clone(),
				attributes: data.attributes.clone(),
				class: node_class.map(str::to_string),
			},
		}
	}

	/// Synthetic edge between two communities, identified by `"{source}-{target}"`.
	pub fn intercluster(source: &NodeId, target: &NodeId) -> Self {
		Element::Edge {
			id: NodeId(format!("{source}-{target}")),
			source: source.clone(),
			target: target.clone(),
			class: Some(INTERCLUSTER_CLASS.to_string()),
		}
	}

	pub fn id(&self) -> &NodeId {
		match self {
			Element::Node { id, .. } | Element::Edge { id, .. } => id,
		}
	}

	pub fn class(&self) -> Option<&str> {
		match self {
			Element::Node { class, .. } | Element::Edge { class, .. } => class.as_deref(),
		}
	}

	pub fn is_node(&self) -> bool {
		matches!(self, Element::Node { .. })
	}
}

/// One stylesheet entry: a selector and its declarations, in order.
#[derive(Clone, Debug, PartialEq)]
pub struct StyleRule {
	pub selector: String,
	pub declarations: Vec<(String, String)>,
}

impl StyleRule {
	pub fn new(selector: impl Into<String>) -> Self {
		Self {
			selector: selector.into(),
			declarations: Vec::new(),
		}
	}

	pub fn with(mut self, property: &str, value: impl Into<String>) -> Self {
		self.declarations.push((property.to_string(), value.into()));
		self
	}

	pub fn get(&self, property: &str) -> Option<&str> {
		self.declarations
			.iter()
			.find(|(p, _)| p == property)
			.map(|(_, v)| v.as_str())
	}
}

/// Everything the engine needs for one full draw.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderFrame {
	pub elements: Vec<Element>,
	pub style: Vec<StyleRule>,
	pub layout: Layout,
}
