//! [`RenderEngine`] backed by cytoscape.js, loaded by the host page as the
//! global `cytoscape` function.

use serde_json::{Map, Value, json};
use wasm_bindgen::prelude::*;
use web_sys::HtmlElement;

use super::elements::{Element, RenderFrame, StyleRule};
use super::renderer::{EventBinding, RenderEngine, RenderError};
use crate::api::NodeId;

#[wasm_bindgen]
extern "C" {
	/// A live cytoscape graph.
	pub type Core;

	#[wasm_bindgen(catch, js_name = cytoscape)]
	fn cytoscape_new(options: &JsValue) -> Result<Core, JsValue>;

	#[wasm_bindgen(method)]
	fn on(this: &Core, events: &str, selector: &str, handler: &js_sys::Function);

	#[wasm_bindgen(method)]
	fn destroy(this: &Core);

	type EventObject;

	#[wasm_bindgen(method, getter)]
	fn target(this: &EventObject) -> CyElement;

	type CyElement;

	#[wasm_bindgen(method)]
	fn id(this: &CyElement) -> String;
}

/// A cytoscape instance plus the closures it calls back into.
pub struct CytoscapeInstance {
	core: Core,
	handlers: Vec<Closure<dyn Fn(EventObject)>>,
}

/// The cytoscape.js engine.
#[derive(Clone, Copy, Debug, Default)]
pub struct Cytoscape;

impl RenderEngine for Cytoscape {
	type Container = HtmlElement;
	type Instance = CytoscapeInstance;

	fn instantiate(
		&self,
		container: &HtmlElement,
		frame: &RenderFrame,
	) -> Result<CytoscapeInstance, RenderError> {
		let options = js_sys::JSON::parse(&frame_options(frame).to_string())
			.map_err(|e| RenderError::Engine(format!("{e:?}")))?;
		js_sys::Reflect::set(&options, &JsValue::from_str("container"), container)
			.map_err(|e| RenderError::Engine(format!("{e:?}")))?;
		let core = cytoscape_new(&options).map_err(|e| RenderError::Engine(format!("{e:?}")))?;
		Ok(CytoscapeInstance {
			core,
			handlers: Vec::new(),
		})
	}

	fn listen(&self, instance: &mut CytoscapeInstance, binding: &EventBinding) {
		let handler = binding.handler.clone();
		let closure = Closure::<dyn Fn(EventObject)>::new(move |event: EventObject| {
			handler(&NodeId(event.target().id()));
		});
		instance
			.core
			.on(&binding.event, &binding.selector, closure.as_ref().unchecked_ref());
		instance.handlers.push(closure);
	}

	fn destroy(&self, instance: CytoscapeInstance) {
		instance.core.destroy();
	}
}

/// Cytoscape constructor options for a frame, minus the container.
pub fn frame_options(frame: &RenderFrame) -> Value {
	json!({
		"elements": frame.elements.iter().map(element_json).collect::<Vec<_>>(),
		"style": frame.style.iter().map(rule_json).collect::<Vec<_>>(),
		"layout": { "name": frame.layout.name() },
		"zoom": 1,
		"motionBlur": true,
	})
}

fn element_json(element: &Element) -> Value {
	let (group, data, class) = match element {
		Element::Node {
			id,
			attributes,
			class,
		} => {
			let mut data = attributes.clone();
			data.insert("id".into(), Value::String(id.to_string()));
			("nodes", data, class)
		}
		Element::Edge {
			id,
			source,
			target,
			class,
		} => {
			let mut data = Map::new();
			data.insert("id".into(), Value::String(id.to_string()));
			data.insert("source".into(), Value::String(source.to_string()));
			data.insert("target".into(), Value::String(target.to_string()));
			("edges", data, class)
		}
	};
	let mut value = json!({ "group": group, "data": data });
	if let Some(class) = class {
		value["classes"] = Value::String(class.clone());
	}
	value
}

fn rule_json(rule: &StyleRule) -> Value {
	let style: Map<String, Value> = rule
		.declarations
		.iter()
		.map(|(property, value)| (property.clone(), Value::String(value.clone())))
		.collect();
	json!({ "selector": rule.selector, "style": style })
}
