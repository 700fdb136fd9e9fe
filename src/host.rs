use crate::error::HostError;
use core::fmt::Debug;

/// The document namespace an element is created in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
	Html,
	Svg,
	MathMl,
}
impl Namespace {
	#[must_use]
	pub fn uri(self) -> &'static str {
		match self {
			Namespace::Html => "http://www.w3.org/1999/xhtml",
			Namespace::Svg => "http://www.w3.org/2000/svg",
			Namespace::MathMl => "http://www.w3.org/1998/Math/MathML",
		}
	}

	/// The namespace of an element named `tag` whose parent's children live in `self`.
	#[must_use]
	pub fn of_element(self, tag: &str) -> Self {
		match tag {
			"svg" => Namespace::Svg,
			"math" => Namespace::MathMl,
			_ => self,
		}
	}

	/// The namespace the children of an element named `tag` in `self` are created in.
	#[must_use]
	pub fn of_children(self, tag: &str) -> Self {
		match (self, tag) {
			(Namespace::Svg, "foreignObject") => Namespace::Html,
			_ => self,
		}
	}
}

/// The primitive element/text/attribute/style mutation surface a [`Reconciler`](`crate::Reconciler`) drives.
///
/// Implementations must not reorder or remove nodes on their own while a [`Root`](`crate::Root`) owns them.
pub trait Host: 'static {
	/// A handle to a host element, text node or raw HTML fragment node. Equality is identity.
	type Node: Clone + PartialEq + Debug;

	/// Payload handed to component event hooks.
	type Event: ?Sized;

	fn create_element(&mut self, tag: &str, namespace: Namespace) -> Result<Self::Node, HostError>;
	fn create_text(&mut self, text: &str) -> Result<Self::Node, HostError>;

	/// Parses `html` into detached nodes, in document order.
	fn parse_html(&mut self, html: &str) -> Result<Vec<Self::Node>, HostError>;

	fn set_attribute(&mut self, element: &Self::Node, name: &str, value: &str) -> Result<(), HostError>;
	fn remove_attribute(&mut self, element: &Self::Node, name: &str) -> Result<(), HostError>;
	fn set_style(&mut self, element: &Self::Node, property: &str, value: &str) -> Result<(), HostError>;
	fn remove_style(&mut self, element: &Self::Node, property: &str) -> Result<(), HostError>;
	fn set_text(&mut self, node: &Self::Node, text: &str) -> Result<(), HostError>;

	/// Inserts or moves `node` into `parent` before `reference`, or at the end if `reference` is [`None`].
	fn insert_before(&mut self, parent: &Self::Node, node: &Self::Node, reference: Option<&Self::Node>) -> Result<(), HostError>;

	/// Detaches `node` from its parent.
	fn remove(&mut self, node: &Self::Node) -> Result<(), HostError>;

	fn focus(&mut self, element: &Self::Node) -> Result<(), HostError>;

	/// Called once per live component instance that handles `event`.
	///
	/// # Errors
	///
	/// Iff the host could not subscribe to `event`.
	fn listen(&mut self, event: &'static str) -> Result<(), HostError> {
		let _ = event;
		Ok(())
	}

	/// Balances one earlier [`listen`](`Host::listen`) call.
	fn unlisten(&mut self, event: &'static str) {
		let _ = event;
	}

	/// Called at the end of each [`Root`](`crate::Root`) pass, e.g. to release listeners nobody needs anymore.
	fn flush(&mut self) {}
}
