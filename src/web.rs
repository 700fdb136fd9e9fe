//! A [`Host`] backed by the browser DOM through [`web_sys`].

use crate::{
	component::EventFlow,
	error::HostError,
	host::{Host, Namespace},
	rc_hash_map::{CountError, RcHashMap},
	root::Root,
};
use core::{
	cell::RefCell,
	fmt::{self, Debug, Formatter},
};
use js_sys::Function;
use std::rc::Rc;
use tracing::{error, info, trace, trace_span, warn};
use wasm_bindgen::{closure::Closure, JsCast, JsValue};

type Dispatcher = Rc<RefCell<Option<Box<dyn Fn(&web_sys::Event)>>>>;

/// Drives a container element's child nodes.
///
/// Event listeners are delegated: one common handler is registered on the container per event name
/// any live component handles, and forwarded to the dispatcher installed with [`bind_events`].
pub struct WebHost {
	document: web_sys::Document,
	container: web_sys::Element,
	template: web_sys::HtmlTemplateElement,
	common_handler: Closure<dyn Fn(web_sys::Event)>,
	listeners: RcHashMap<&'static str, u16, ()>,
	dispatcher: Dispatcher,
}
impl Debug for WebHost {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_struct("WebHost")
			.field("container", &self.container)
			.field("listeners", &self.listeners)
			.field("dispatcher", &self.dispatcher.borrow().as_ref().map(|_| ".."))
			.finish()
	}
}

fn js_error(operation: &'static str) -> impl FnOnce(JsValue) -> HostError {
	move |error| HostError::new(operation, format!("{:?}", error))
}

impl WebHost {
	/// # Errors
	///
	/// Iff `container` has no owner document.
	pub fn new(container: web_sys::Element) -> Result<Self, HostError> {
		let document = container
			.owner_document()
			.ok_or_else(|| HostError::new("new", "no owner document found for the container"))?;
		let template = document
			.create_element("template")
			.map_err(js_error("new"))?
			.dyn_into::<web_sys::HtmlTemplateElement>()
			.map_err(|element| HostError::new("new", format!("expected <template> but found {:?}", element)))?;

		let dispatcher: Dispatcher = Rc::default();
		let common_handler = Closure::wrap(Box::new({
			let dispatcher = Rc::clone(&dispatcher);
			move |event: web_sys::Event| {
				let span = trace_span!("common_handler", event = ?&event);
				let _enter = span.enter();
				match &*dispatcher.borrow() {
					Some(dispatch) => dispatch(&event),
					None => warn!("Received an event without a dispatcher. Call `sapwood::web::bind_events`."),
				}
			}
		}) as Box<dyn Fn(web_sys::Event)>);

		Ok(Self {
			document,
			container,
			template,
			common_handler,
			listeners: RcHashMap::new(),
			dispatcher,
		})
	}

	/// Creates a [`Root`] for `container`'s child nodes with event dispatch already bound.
	///
	/// # Errors
	///
	/// Iff `container` has no owner document.
	pub fn root(container: web_sys::Element) -> Result<Rc<RefCell<Root<WebHost>>>, HostError> {
		let host = Self::new(container.clone())?;
		let root = Rc::new(RefCell::new(Root::new_for_element_child_nodes(host, container.into())));
		bind_events(&root);
		Ok(root)
	}

	#[must_use]
	pub fn container(&self) -> &web_sys::Element {
		&self.container
	}

	fn element<'a>(operation: &'static str, node: &'a web_sys::Node) -> Result<&'a web_sys::Element, HostError> {
		node.dyn_ref()
			.ok_or_else(|| HostError::new(operation, format!("expected an element but found {:?}", node)))
	}

	fn style(operation: &'static str, node: &web_sys::Node) -> Result<web_sys::CssStyleDeclaration, HostError> {
		if let Some(element) = node.dyn_ref::<web_sys::HtmlElement>() {
			Ok(element.style())
		} else if let Some(element) = node.dyn_ref::<web_sys::SvgElement>() {
			Ok(element.style())
		} else {
			Err(HostError::new(operation, format!("{:?} has no inline style", node)))
		}
	}
}

/// Routes events received by `root`'s host into its component tree.
///
/// The target and then each of its ancestors up to the container is looked up until one is owned by the tree.
/// Handled events have their default action prevented and stop propagating.
pub fn bind_events(root: &Rc<RefCell<Root<WebHost>>>) {
	let weak = Rc::downgrade(root);
	let dispatch = move |event: &web_sys::Event| {
		let root = match weak.upgrade() {
			Some(root) => root,
			None => return warn!("Received an event for a dropped `Root`."),
		};
		let mut root = match root.try_borrow_mut() {
			Ok(root) => root,
			Err(_) => return warn!("Received an event during a render pass. Ignoring it."),
		};

		let name = event.type_();
		let container = root.host().container().clone();
		let mut target = event.target().and_then(|target| target.dyn_into::<web_sys::Node>().ok());
		while let Some(node) = target {
			if container.is_same_node(Some(&node)) {
				break;
			}
			match root.dispatch_event(&node, &name, event) {
				Ok(Some(EventFlow::Handled)) => {
					trace!("Handled. Suppressing default action.");
					event.prevent_default();
					event.stop_propagation();
					break;
				}
				Ok(Some(EventFlow::Bubble)) => break,
				Ok(None) => target = node.parent_node(),
				Err(error) => {
					error!("Event dispatch failed: {}", error);
					break;
				}
			}
		}
	};

	let root = root.borrow();
	*root.host().dispatcher.borrow_mut() = Some(Box::new(dispatch));
}

impl Host for WebHost {
	type Node = web_sys::Node;
	type Event = web_sys::Event;

	fn create_element(&mut self, tag: &str, namespace: Namespace) -> Result<web_sys::Node, HostError> {
		let element = match namespace {
			Namespace::Html => self.document.create_element(tag),
			Namespace::Svg | Namespace::MathMl => self.document.create_element_ns(Some(namespace.uri()), tag),
		};
		element.map(Into::into).map_err(js_error("create_element"))
	}

	fn create_text(&mut self, text: &str) -> Result<web_sys::Node, HostError> {
		Ok(self.document.create_text_node(text).into())
	}

	fn parse_html(&mut self, html: &str) -> Result<Vec<web_sys::Node>, HostError> {
		self.template.set_inner_html(html);
		let child_nodes = self.template.content().child_nodes();
		Ok((0..child_nodes.length()).filter_map(|i| child_nodes.get(i)).collect())
	}

	fn set_attribute(&mut self, element: &web_sys::Node, name: &str, value: &str) -> Result<(), HostError> {
		Self::element("set_attribute", element)?
			.set_attribute(name, value)
			.map_err(js_error("set_attribute"))
	}

	fn remove_attribute(&mut self, element: &web_sys::Node, name: &str) -> Result<(), HostError> {
		Self::element("remove_attribute", element)?
			.remove_attribute(name)
			.map_err(js_error("remove_attribute"))
	}

	fn set_style(&mut self, element: &web_sys::Node, property: &str, value: &str) -> Result<(), HostError> {
		Self::style("set_style", element)?
			.set_property(property, value)
			.map_err(js_error("set_style"))
	}

	fn remove_style(&mut self, element: &web_sys::Node, property: &str) -> Result<(), HostError> {
		Self::style("remove_style", element)?
			.remove_property(property)
			.map(drop)
			.map_err(js_error("remove_style"))
	}

	fn set_text(&mut self, node: &web_sys::Node, text: &str) -> Result<(), HostError> {
		node.set_text_content(Some(text));
		Ok(())
	}

	fn insert_before(&mut self, parent: &web_sys::Node, node: &web_sys::Node, reference: Option<&web_sys::Node>) -> Result<(), HostError> {
		parent.insert_before(node, reference).map(drop).map_err(js_error("insert_before"))
	}

	fn remove(&mut self, node: &web_sys::Node) -> Result<(), HostError> {
		match node.parent_node() {
			Some(parent) => parent.remove_child(node).map(drop).map_err(js_error("remove")),
			None => Ok(()),
		}
	}

	fn focus(&mut self, element: &web_sys::Node) -> Result<(), HostError> {
		element
			.dyn_ref::<web_sys::HtmlElement>()
			.ok_or_else(|| HostError::new("focus", format!("{:?} is not focusable", element)))?
			.focus()
			.map_err(js_error("focus"))
	}

	fn listen(&mut self, event: &'static str) -> Result<(), HostError> {
		let container = &self.container;
		let handler: &Function = self.common_handler.as_ref().unchecked_ref();
		match self.listeners.increment_or_insert_with(event, || container.add_event_listener_with_callback(event, handler)) {
			Ok((_, inserted)) => {
				if inserted {
					trace!(event, "Added event listener.");
				}
				Ok(())
			}
			Err(CountError::Saturated) => Err(HostError::new("listen", format!("too many (more than 65k) listeners for {:?}", event))),
			Err(CountError::Insert(error)) => Err(js_error("listen")(error)),
		}
	}

	fn unlisten(&mut self, event: &'static str) {
		if self.listeners.weak_decrement(event).is_err() {
			warn!("Unbalanced `unlisten` for {:?}.", event);
		}
	}

	fn flush(&mut self) {
		let handler: &Function = self.common_handler.as_ref().unchecked_ref();
		let mut released = 0;
		for (event, ()) in self.listeners.drain_weak() {
			if let Err(error) = self.container.remove_event_listener_with_callback(event, handler) {
				error!("Failed to remove {:?} listener: {:?}", event, error);
			}
			released += 1;
		}
		trace!("Freed {} event listener(s).", released);
		info!("Event listener count/cached capacity: {}/{}", self.listeners.len(), self.listeners.capacity());
	}
}
