//! A headless [`Host`] that keeps its document in an arena.
//!
//! Raw HTML is stored verbatim as a single opaque node per block instead of being parsed.

use crate::{
	error::HostError,
	host::{Host, Namespace},
	rc_hash_map::{CountError, RcHashMap},
};
use core::{convert::Infallible, fmt::Write as _};
use tracing::{info, warn};

/// Handle to a node in a [`MemoryHost`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug)]
enum Kind {
	Element {
		tag: String,
		namespace: Namespace,
		attrs: Vec<(String, String)>,
		style: Vec<(String, String)>,
	},
	Text(String),
	Raw(String),
}

#[derive(Debug)]
struct Slot {
	kind: Kind,
	parent: Option<NodeId>,
	children: Vec<NodeId>,
}

#[derive(Debug, Default)]
pub struct MemoryHost {
	nodes: Vec<Slot>,
	mutations: usize,
	focused: Option<NodeId>,
	listeners: RcHashMap<&'static str, u16, ()>,
}

const VOID_ELEMENTS: &[&str] = &["area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track", "wbr"];

impl MemoryHost {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a detached HTML element to serve as container, without counting it as a mutation.
	pub fn create_root(&mut self, tag: &str) -> NodeId {
		self.push(Kind::Element {
			tag: tag.to_owned(),
			namespace: Namespace::Html,
			attrs: Vec::new(),
			style: Vec::new(),
		})
	}

	/// Number of host primitives that changed the document so far.
	#[must_use]
	pub fn mutations(&self) -> usize {
		self.mutations
	}

	#[must_use]
	pub fn focused(&self) -> Option<NodeId> {
		self.focused
	}

	/// Whether any live component currently listens to `event`.
	#[must_use]
	pub fn is_listening(&self, event: &str) -> bool {
		self.listeners.count(event).map_or(false, |&count| count > 0)
	}

	#[must_use]
	pub fn listener_count(&self, event: &str) -> u16 {
		self.listeners.count(event).copied().unwrap_or(0)
	}

	#[must_use]
	pub fn children(&self, node: NodeId) -> &[NodeId] {
		self.slot(node).map_or(&[], |slot| &slot.children)
	}

	#[must_use]
	pub fn parent(&self, node: NodeId) -> Option<NodeId> {
		self.slot(node)?.parent
	}

	/// The tag name of an element.
	#[must_use]
	pub fn tag(&self, node: NodeId) -> Option<&str> {
		match &self.slot(node)?.kind {
			Kind::Element { tag, .. } => Some(tag),
			Kind::Text(_) | Kind::Raw(_) => None,
		}
	}

	#[must_use]
	pub fn namespace(&self, node: NodeId) -> Option<Namespace> {
		match &self.slot(node)?.kind {
			Kind::Element { namespace, .. } => Some(*namespace),
			Kind::Text(_) | Kind::Raw(_) => None,
		}
	}

	#[must_use]
	pub fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
		match &self.slot(node)?.kind {
			Kind::Element { attrs, .. } => find(attrs, name),
			Kind::Text(_) | Kind::Raw(_) => None,
		}
	}

	#[must_use]
	pub fn style(&self, node: NodeId, property: &str) -> Option<&str> {
		match &self.slot(node)?.kind {
			Kind::Element { style, .. } => find(style, property),
			Kind::Text(_) | Kind::Raw(_) => None,
		}
	}

	/// The inline style declaration of an element, in the order properties were first set.
	#[must_use]
	pub fn style_text(&self, node: NodeId) -> String {
		match self.slot(node).map(|slot| &slot.kind) {
			Some(Kind::Element { style, .. }) => style
				.iter()
				.map(|(property, value)| format!("{}: {};", property, value))
				.collect::<Vec<_>>()
				.join(" "),
			_ => String::new(),
		}
	}

	/// Concatenated text of `node` and its descendants. Raw HTML contributes its markup.
	#[must_use]
	pub fn text_content(&self, node: NodeId) -> String {
		let mut text = String::new();
		self.collect_text(node, &mut text);
		text
	}

	fn collect_text(&self, node: NodeId, text: &mut String) {
		if let Some(slot) = self.slot(node) {
			match &slot.kind {
				Kind::Text(content) | Kind::Raw(content) => text.push_str(content),
				Kind::Element { .. } => {
					for &child in &slot.children {
						self.collect_text(child, text);
					}
				}
			}
		}
	}

	#[must_use]
	pub fn outer_html(&self, node: NodeId) -> String {
		let mut html = String::new();
		self.write_html(node, &mut html);
		html
	}

	#[must_use]
	pub fn inner_html(&self, node: NodeId) -> String {
		let mut html = String::new();
		for &child in self.children(node) {
			self.write_html(child, &mut html);
		}
		html
	}

	fn write_html(&self, node: NodeId, html: &mut String) {
		let slot = match self.slot(node) {
			Some(slot) => slot,
			None => return,
		};
		match &slot.kind {
			Kind::Text(text) => escape(text, false, html),
			Kind::Raw(markup) => html.push_str(markup),
			Kind::Element { tag, attrs, style, .. } => {
				html.push('<');
				html.push_str(tag);
				for (name, value) in attrs {
					html.push(' ');
					html.push_str(name);
					html.push_str("=\"");
					escape(value, true, html);
					html.push('"');
				}
				if !style.is_empty() {
					html.push_str(" style=\"");
					escape(&self.style_text(node), true, html);
					html.push('"');
				}
				html.push('>');
				if VOID_ELEMENTS.contains(&tag.as_str()) && slot.children.is_empty() {
					return;
				}
				for &child in &slot.children {
					self.write_html(child, html);
				}
				let _ = write!(html, "</{}>", tag);
			}
		}
	}

	fn push(&mut self, kind: Kind) -> NodeId {
		self.nodes.push(Slot {
			kind,
			parent: None,
			children: Vec::new(),
		});
		NodeId(self.nodes.len() - 1)
	}

	fn slot(&self, node: NodeId) -> Option<&Slot> {
		self.nodes.get(node.0)
	}

	fn slot_mut(&mut self, operation: &'static str, node: NodeId) -> Result<&mut Slot, HostError> {
		self.nodes
			.get_mut(node.0)
			.ok_or_else(|| HostError::new(operation, format!("unknown node {:?}", node)))
	}

	fn props_mut(&mut self, operation: &'static str, node: NodeId, style: bool) -> Result<&mut Vec<(String, String)>, HostError> {
		match &mut self.slot_mut(operation, node)?.kind {
			Kind::Element { attrs, style: properties, .. } => Ok(if style { properties } else { attrs }),
			Kind::Text(_) | Kind::Raw(_) => Err(HostError::new(operation, format!("{:?} is not an element", node))),
		}
	}

	fn detach(&mut self, node: NodeId) {
		if let Some(parent) = self.nodes[node.0].parent.take() {
			self.nodes[parent.0].children.retain(|&child| child != node);
		}
	}
}

fn find<'a>(entries: &'a [(String, String)], name: &str) -> Option<&'a str> {
	entries.iter().find(|(n, _)| n == name).map(|(_, v)| v.as_str())
}

fn set(entries: &mut Vec<(String, String)>, name: &str, value: &str) {
	match entries.iter_mut().find(|(n, _)| n == name) {
		Some(entry) => value.clone_into(&mut entry.1),
		None => entries.push((name.to_owned(), value.to_owned())),
	}
}

fn escape(text: &str, attribute: bool, html: &mut String) {
	for c in text.chars() {
		match c {
			'&' => html.push_str("&amp;"),
			'<' => html.push_str("&lt;"),
			'>' => html.push_str("&gt;"),
			'"' if attribute => html.push_str("&quot;"),
			c => html.push(c),
		}
	}
}

impl Host for MemoryHost {
	type Node = NodeId;
	type Event = str;

	fn create_element(&mut self, tag: &str, namespace: Namespace) -> Result<NodeId, HostError> {
		self.mutations += 1;
		Ok(self.push(Kind::Element {
			tag: tag.to_owned(),
			namespace,
			attrs: Vec::new(),
			style: Vec::new(),
		}))
	}

	fn create_text(&mut self, text: &str) -> Result<NodeId, HostError> {
		self.mutations += 1;
		Ok(self.push(Kind::Text(text.to_owned())))
	}

	fn parse_html(&mut self, html: &str) -> Result<Vec<NodeId>, HostError> {
		if html.is_empty() {
			return Ok(Vec::new());
		}
		self.mutations += 1;
		Ok(vec![self.push(Kind::Raw(html.to_owned()))])
	}

	fn set_attribute(&mut self, element: &NodeId, name: &str, value: &str) -> Result<(), HostError> {
		set(self.props_mut("set_attribute", *element, false)?, name, value);
		self.mutations += 1;
		Ok(())
	}

	fn remove_attribute(&mut self, element: &NodeId, name: &str) -> Result<(), HostError> {
		self.props_mut("remove_attribute", *element, false)?.retain(|(n, _)| n != name);
		self.mutations += 1;
		Ok(())
	}

	fn set_style(&mut self, element: &NodeId, property: &str, value: &str) -> Result<(), HostError> {
		set(self.props_mut("set_style", *element, true)?, property, value);
		self.mutations += 1;
		Ok(())
	}

	fn remove_style(&mut self, element: &NodeId, property: &str) -> Result<(), HostError> {
		self.props_mut("remove_style", *element, true)?.retain(|(n, _)| n != property);
		self.mutations += 1;
		Ok(())
	}

	fn set_text(&mut self, node: &NodeId, text: &str) -> Result<(), HostError> {
		match &mut self.slot_mut("set_text", *node)?.kind {
			Kind::Text(content) => text.clone_into(content),
			Kind::Element { .. } | Kind::Raw(_) => return Err(HostError::new("set_text", format!("{:?} is not a text node", node))),
		}
		self.mutations += 1;
		Ok(())
	}

	fn insert_before(&mut self, parent: &NodeId, node: &NodeId, reference: Option<&NodeId>) -> Result<(), HostError> {
		if !matches!(self.slot_mut("insert_before", *parent)?.kind, Kind::Element { .. }) {
			return Err(HostError::new("insert_before", format!("parent {:?} is not an element", parent)));
		}
		self.slot_mut("insert_before", *node)?;
		if parent == node || reference == Some(node) {
			return Err(HostError::new("insert_before", format!("can't insert {:?} relative to itself", node)));
		}

		self.detach(*node);
		let siblings = &mut self.nodes[parent.0].children;
		let index = match reference {
			None => siblings.len(),
			Some(reference) => siblings
				.iter()
				.position(|child| child == reference)
				.ok_or_else(|| HostError::new("insert_before", format!("{:?} is not a child of {:?}", reference, parent)))?,
		};
		siblings.insert(index, *node);
		self.nodes[node.0].parent = Some(*parent);
		self.mutations += 1;
		Ok(())
	}

	fn remove(&mut self, node: &NodeId) -> Result<(), HostError> {
		self.slot_mut("remove", *node)?;
		self.detach(*node);
		if self.focused == Some(*node) {
			self.focused = None;
		}
		self.mutations += 1;
		Ok(())
	}

	fn focus(&mut self, element: &NodeId) -> Result<(), HostError> {
		self.props_mut("focus", *element, false)?;
		self.focused = Some(*element);
		Ok(())
	}

	fn listen(&mut self, event: &'static str) -> Result<(), HostError> {
		self.listeners
			.increment_or_insert_with(event, || Ok::<_, Infallible>(()))
			.map(drop)
			.map_err(|error| match error {
				CountError::Saturated => HostError::new("listen", format!("too many listeners for {:?}", event)),
				CountError::Insert(never) => match never {},
			})
	}

	fn unlisten(&mut self, event: &'static str) {
		if self.listeners.weak_decrement(event).is_err() {
			warn!("Unbalanced `unlisten` for {:?}.", event);
		}
	}

	fn flush(&mut self) {
		let released = self.listeners.drain_weak().count();
		if released > 0 {
			info!("Released {} unused listener(s). {} remain.", released, self.listeners.len());
		}
	}
}
