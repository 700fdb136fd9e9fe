//! The live counterpart of a [`VNode`].

use crate::{
	component::{Component, Context},
	host::{Host, Namespace},
	vnode::{Key, Tag, VNode},
};
use core::{
	fmt::{self, Debug, Formatter},
	slice,
};
use std::rc::Rc;

/// The host node(s) an [`RNode`] exclusively owns.
#[derive(Debug, Clone, PartialEq)]
pub enum Materialized<N> {
	Element(N),
	Text(N),
	/// The nodes parsed from a (possibly concatenated) raw HTML block. May be empty.
	Html(Vec<N>),
	/// A component rendered a boolean leaf, so there is nothing to show.
	Empty,
}
impl<N> Materialized<N> {
	/// All owned top-level host nodes, in document order.
	#[must_use]
	pub fn nodes(&self) -> &[N] {
		match self {
			Materialized::Element(node) | Materialized::Text(node) => slice::from_ref(node),
			Materialized::Html(nodes) => nodes,
			Materialized::Empty => &[],
		}
	}

	#[must_use]
	pub fn first(&self) -> Option<&N> {
		self.nodes().first()
	}
}

/// A rendered instance, mirroring one materialized [`VNode`].
///
/// Each instance owns its host node(s) and its rendered children. It is updated in place across passes
/// for as long as it keeps matching, and destroyed otherwise. Instances are never moved to another parent.
pub struct RNode<H: Host> {
	pub(crate) key: Option<Key>,
	pub(crate) input_tag: Tag,
	/// The namespace this node's parent creates children in.
	pub(crate) namespace: Namespace,
	pub(crate) materialized: Materialized<H::Node>,
	pub(crate) children: Vec<RNode<H>>,
	pub(crate) component: Option<Rc<dyn Component<H>>>,
	pub(crate) context: Option<Context>,
	/// The rendered description, without nested child nodes.
	pub(crate) last: VNode<H>,
	pub(crate) pending_post_init: bool,
}
impl<H: Host> RNode<H> {
	/// The element or text node this instance owns, or [`None`] for raw HTML blocks and empty renderings.
	#[must_use]
	pub fn element(&self) -> Option<&H::Node> {
		match &self.materialized {
			Materialized::Element(node) | Materialized::Text(node) => Some(node),
			Materialized::Html(_) | Materialized::Empty => None,
		}
	}

	#[must_use]
	pub fn materialized(&self) -> &Materialized<H::Node> {
		&self.materialized
	}

	#[must_use]
	pub fn key(&self) -> Option<&Key> {
		self.key.as_ref()
	}

	#[must_use]
	pub fn children(&self) -> &[RNode<H>] {
		&self.children
	}

	#[must_use]
	pub fn context(&self) -> Option<&Context> {
		self.context.as_ref()
	}

	/// The description that produced the current host state, as rewritten by `render`.
	///
	/// Nested child nodes are not retained here. See [`RNode::children`] instead.
	#[must_use]
	pub fn last_vnode(&self) -> &VNode<H> {
		&self.last
	}

	/// Whether `node` is one of this instance's own top-level host nodes.
	pub(crate) fn owns(&self, node: &H::Node) -> bool {
		self.materialized.nodes().iter().any(|n| n == node)
	}
}
impl<H: Host> Debug for RNode<H> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_struct("RNode")
			.field("key", &self.key)
			.field("tag", &self.last.tag)
			.field("materialized", &self.materialized)
			.field("children", &self.children)
			.field("component", &self.component.as_ref().map(|c| c.name()))
			.finish()
	}
}
