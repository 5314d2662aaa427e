//! Adapter between application state and a graph rendering engine.
//!
//! Every redraw is a full rebuild: a fresh engine instance is created from
//! the current elements, stylesheet and layout, the registered event handlers
//! are attached to it, and only then is the previous instance destroyed.

use std::rc::Rc;

use log::{debug, warn};

use super::elements::{Element, Layout, RenderFrame, StyleRule};
use super::state::AppState;
use super::theme::{CommunityStyle, base_stylesheet};
use crate::api::{Backend, NodeId};

/// Read-only view of whatever the renderer displays.
pub trait ElementSource {
	fn render_elements(&self) -> Vec<Element>;

	/// Styles of displayed communities, in activation order.
	fn active_styles(&self) -> Vec<CommunityStyle>;
}

impl<B: Backend> ElementSource for AppState<B> {
	fn render_elements(&self) -> Vec<Element> {
		AppState::render_elements(self)
	}

	fn active_styles(&self) -> Vec<CommunityStyle> {
		self.all_styles()
	}
}

#[derive(thiserror::Error, Debug)]
pub enum RenderError {
	#[error("rendering engine failed: {0}")]
	Engine(String),
}

/// Callback receiving the id of the element an event fired on.
pub type ElementHandler = Rc<dyn Fn(&NodeId)>;

/// An `(event, selector, handler)` registration re-applied on every redraw.
#[derive(Clone)]
pub struct EventBinding {
	pub event: String,
	pub selector: String,
	pub handler: ElementHandler,
}

/// A graph visualization library the adapter can drive.
pub trait RenderEngine {
	type Container;
	type Instance;

	fn instantiate(
		&self,
		container: &Self::Container,
		frame: &RenderFrame,
	) -> Result<Self::Instance, RenderError>;

	fn listen(&self, instance: &mut Self::Instance, binding: &EventBinding);

	fn destroy(&self, instance: Self::Instance);
}

/// Draws an [`ElementSource`] through a [`RenderEngine`].
pub struct GraphRenderer<E: RenderEngine> {
	engine: E,
	container: Option<E::Container>,
	source: Option<Rc<dyn ElementSource>>,
	layout: Layout,
	base_style: Vec<StyleRule>,
	events: Vec<EventBinding>,
	instance: Option<E::Instance>,
}

impl<E: RenderEngine> GraphRenderer<E> {
	pub fn new(engine: E) -> Self {
		Self {
			engine,
			container: None,
			source: None,
			layout: Layout::default(),
			base_style: base_stylesheet(),
			events: Vec::new(),
			instance: None,
		}
	}

	pub fn set_container(&mut self, container: E::Container) {
		self.container = Some(container);
	}

	pub fn bind(&mut self, source: Rc<dyn ElementSource>) {
		self.source = Some(source);
	}

	pub fn layout(&self) -> Layout {
		self.layout
	}

	/// Switch layout; names outside the supported set are ignored.
	pub fn set_layout(&mut self, name: &str) {
		match Layout::from_name(name) {
			Some(layout) => self.layout = layout,
			None => debug!("gcviz: ignoring unsupported layout '{name}'"),
		}
	}

	pub fn attach_event(&mut self, event: &str, selector: &str, handler: ElementHandler) {
		self.events.push(EventBinding {
			event: event.to_string(),
			selector: selector.to_string(),
			handler,
		});
	}

	pub fn is_drawn(&self) -> bool {
		self.instance.is_some()
	}

	/// Base rules followed by one rule per active community. Later rules win
	/// on conflicts, so later activations take precedence.
	pub fn stylesheet(&self) -> Vec<StyleRule> {
		let mut style = self.base_style.clone();
		if let Some(source) = &self.source {
			style.extend(source.active_styles().iter().map(CommunityStyle::rule));
		}
		style
	}

	/// The frame a redraw would hand to the engine; `None` with no bound state.
	pub fn frame(&self) -> Option<RenderFrame> {
		let source = self.source.as_ref()?;
		Some(RenderFrame {
			elements: source.render_elements(),
			style: self.stylesheet(),
			layout: self.layout,
		})
	}

	/// Rebuild the engine instance. Returns `Ok(false)` when there is no bound
	/// state or container yet. On failure the previous instance stays up.
	pub fn redraw(&mut self) -> Result<bool, RenderError> {
		let (Some(frame), Some(container)) = (self.frame(), self.container.as_ref()) else {
			return Ok(false);
		};

		let mut instance = match self.engine.instantiate(container, &frame) {
			Ok(instance) => instance,
			Err(e) => {
				warn!("gcviz: redraw failed, keeping previous graph: {e}");
				return Err(e);
			}
		};
		for binding in &self.events {
			self.engine.listen(&mut instance, binding);
		}
		if let Some(previous) = self.instance.replace(instance) {
			self.engine.destroy(previous);
		}
		debug!(
			"gcviz: drew {} elements with {} rules ({})",
			frame.elements.len(),
			frame.style.len(),
			frame.layout
		);
		Ok(true)
	}
}

#[cfg(test)]
mod tests {
	use std::cell::{Cell, RefCell};

	use super::*;
	use crate::components::community_graph::testing::{MockBackend, partition_of_sizes};
	use crate::components::community_graph::theme::{Color, StyleAllocator};

	#[derive(Default)]
	struct RecordingEngine {
		frames: RefCell<Vec<RenderFrame>>,
		listened: RefCell<Vec<(usize, String, String)>>,
		destroyed: RefCell<Vec<usize>>,
		fail: Cell<bool>,
	}

	impl RenderEngine for Rc<RecordingEngine> {
		type Container = &'static str;
		type Instance = usize;

		fn instantiate(
			&self,
			_container: &&'static str,
			frame: &RenderFrame,
		) -> Result<usize, RenderError> {
			if self.fail.get() {
				return Err(RenderError::Engine("boom".into()));
			}
			let mut frames = self.frames.borrow_mut();
			frames.push(frame.clone());
			Ok(frames.len())
		}

		fn listen(&self, instance: &mut usize, binding: &EventBinding) {
			self.listened.borrow_mut().push((
				*instance,
				binding.event.clone(),
				binding.selector.clone(),
			));
		}

		fn destroy(&self, instance: usize) {
			self.destroyed.borrow_mut().push(instance);
		}
	}

	struct FixedSource(Vec<CommunityStyle>);

	impl ElementSource for FixedSource {
		fn render_elements(&self) -> Vec<Element> {
			Vec::new()
		}

		fn active_styles(&self) -> Vec<CommunityStyle> {
			self.0.clone()
		}
	}

	fn renderer() -> (Rc<RecordingEngine>, GraphRenderer<Rc<RecordingEngine>>) {
		let engine = Rc::new(RecordingEngine::default());
		let mut renderer = GraphRenderer::new(engine.clone());
		renderer.set_container("graph");
		(engine, renderer)
	}

	#[test]
	fn redraw_without_state_is_a_no_op() {
		let (engine, mut renderer) = renderer();

		assert!(!renderer.redraw().unwrap());
		assert!(engine.frames.borrow().is_empty());
		assert!(renderer.frame().is_none());
	}

	#[test]
	fn unsupported_layouts_are_ignored() {
		let (_, mut renderer) = renderer();
		renderer.set_layout("grid");
		renderer.set_layout("cose-bilkent");
		renderer.set_layout("");

		assert_eq!(renderer.layout(), Layout::Grid);
	}

	#[test]
	fn stylesheet_appends_community_rules_in_active_order() {
		let (_, mut renderer) = renderer();
		renderer.bind(Rc::new(FixedSource(vec![
			CommunityStyle::new(7, Color::rgb(1, 2, 3)),
			CommunityStyle::new(2, Color::rgb(4, 5, 6)),
		])));

		let sheet = renderer.stylesheet();
		let selectors: Vec<&str> = sheet.iter().map(|r| r.selector.as_str()).collect();

		assert_eq!(
			selectors,
			["node", "edge", ".intercluster-edge", ".community-7", ".community-2"]
		);
		assert_eq!(sheet[4].get("background-color"), Some("#040506"));
	}

	#[test]
	fn every_redraw_rebuilds_and_reattaches_handlers() {
		let (engine, mut renderer) = renderer();
		renderer.bind(Rc::new(FixedSource(Vec::new())));
		renderer.attach_event("tap", "node", Rc::new(|_: &NodeId| {}));
		renderer.set_layout("concentric");

		assert!(renderer.redraw().unwrap());
		assert!(renderer.redraw().unwrap());

		assert_eq!(engine.frames.borrow().len(), 2);
		assert_eq!(engine.frames.borrow()[1].layout, Layout::Concentric);
		assert_eq!(
			*engine.listened.borrow(),
			[
				(1, "tap".to_string(), "node".to_string()),
				(2, "tap".to_string(), "node".to_string())
			]
		);
		assert_eq!(*engine.destroyed.borrow(), [1]);
	}

	#[test]
	fn failed_redraw_keeps_the_previous_instance() {
		let (engine, mut renderer) = renderer();
		renderer.bind(Rc::new(FixedSource(Vec::new())));
		renderer.redraw().unwrap();
		engine.fail.set(true);

		assert!(renderer.redraw().is_err());
		assert!(renderer.is_drawn());
		assert!(engine.destroyed.borrow().is_empty());
	}

	#[test]
	fn frames_reflect_bound_application_state() {
		let backend = MockBackend::new().with_partition("lvn", partition_of_sizes(&[1, 2, 3]));
		let state = Rc::new(AppState::with_allocator(backend, StyleAllocator::with_seed(3)));
		let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
		runtime.block_on(state.select_algorithm("lvn")).unwrap();
		runtime.block_on(state.activate_community(0)).unwrap();
		let (engine, mut renderer) = renderer();
		renderer.bind(state.clone());

		renderer.redraw().unwrap();

		let frames = engine.frames.borrow();
		assert_eq!(frames[0].elements.len(), 4);
		assert_eq!(frames[0].style.len(), 5);
		assert_eq!(frames[0].layout, Layout::Circle);
	}
}
