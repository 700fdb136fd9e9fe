use crate::{
	children::Attach,
	component::EventFlow,
	error::Error,
	host::{Host, Namespace},
	reconcile::{Options, Reconciler},
	rnode::RNode,
	vnode::Children,
};
use core::mem;
use tracing::{info, instrument, level_filters::STATIC_MAX_LEVEL, warn, Level};

/// Attached to a specific container element, this `struct` can be used to update its child nodes across render passes.
///
/// Note that this does not include the container itself, nor its attributes.
///
/// # Correct Use
///
/// The [`Root`] assumes it exclusively owns the container's child nodes.
/// Nodes inserted or removed by anything else between passes lead to host errors or misplaced output.
#[derive(Debug)]
pub struct Root<H: Host> {
	reconciler: Reconciler<H>,
	container: H::Node,
	children: Vec<RNode<H>>,
}
impl<H: Host> Root<H> {
	#[must_use]
	#[instrument(skip(host))]
	pub fn new_for_element_child_nodes(host: H, container: H::Node) -> Self {
		Self::with_options(host, container, Options::default())
	}

	#[must_use]
	pub fn with_options(host: H, container: H::Node, options: Options) -> Self {
		Self {
			reconciler: Reconciler::with_options(host, options),
			container,
			children: Vec::new(),
		}
	}

	/// Runs one full pass, reconciling the container's child nodes against `vdom`.
	///
	/// Returns whether any component [invalidated](`crate::Context::invalidate`) itself during the pass.
	///
	/// # Errors
	///
	/// On malformed descriptions, duplicate sibling keys, failing hooks and host failures.
	/// The [`Root`] must not be reused after an error.
	#[instrument(skip(self, vdom))]
	pub fn update_child_nodes(&mut self, vdom: impl Into<Children<H>>) -> Result<bool, Error> {
		let old = mem::take(&mut self.children);
		self.children = self
			.reconciler
			.reconcile_children(&self.container, Namespace::Html, old, vdom.into(), 0, Attach::Live)?;
		self.reconciler.host_mut().flush();

		let capacity = self.reconciler.key_scratch.capacity();
		info!("Diff heap capacity (keys): {}", capacity);
		if STATIC_MAX_LEVEL >= Level::WARN && capacity >= self.reconciler.options().scratch_warn_capacity {
			warn!(
				"The key diff heap capacity is large ({}).\n\
				This may point to very long keyed child lists.",
				capacity
			);
		}

		Ok(self.reconciler.take_invalidated())
	}

	/// Destroys all rendered children.
	///
	/// # Errors
	///
	/// Iff a `destroy` hook or the host fails.
	pub fn clear(&mut self) -> Result<(), Error> {
		self.update_child_nodes(Children::Empty).map(drop)
	}

	/// Bubbles an event from `target` through the components of this tree, innermost first.
	///
	/// Returns [`None`] iff `target` isn't owned by this tree.
	///
	/// # Errors
	///
	/// Iff an event hook fails.
	pub fn dispatch_event(&mut self, target: &H::Node, name: &str, event: &H::Event) -> Result<Option<EventFlow>, Error> {
		self.reconciler.dispatch_event(&mut self.children, target, name, event)
	}

	/// Whether any component invalidated itself since the last pass, e.g. from an event hook.
	pub fn take_invalidated(&mut self) -> bool {
		self.reconciler.take_invalidated()
	}

	#[must_use]
	pub fn children(&self) -> &[RNode<H>] {
		&self.children
	}

	#[must_use]
	pub fn container(&self) -> &H::Node {
		&self.container
	}

	#[must_use]
	pub fn host(&self) -> &H {
		self.reconciler.host()
	}

	pub fn host_mut(&mut self) -> &mut H {
		self.reconciler.host_mut()
	}
}
