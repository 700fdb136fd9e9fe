use crate::{
	children::Attach,
	component::{self, Component, Context, EventFlow},
	error::{Error, HookError, HostError},
	host::{Host, Namespace},
	patch::{self, PropChange},
	rnode::{Materialized, RNode},
	scratch::KeyIndexScratch,
	vnode::{Children, Props, Tag, VNode},
};
use core::mem;
use std::rc::Rc;
use tracing::{error, instrument, trace, trace_span};

/// Tunables of a [`Reconciler`].
#[derive(Debug, Clone)]
pub struct Options {
	/// Maximum nesting depth of a VNode tree. Deeper trees fail with [`Error::DepthLimit`].
	pub depth_limit: usize,
	/// Keyed matching scratch capacity above which a [`Root`](`crate::Root`) logs a warning after a pass.
	pub scratch_warn_capacity: usize,
}
impl Default for Options {
	fn default() -> Self {
		Self {
			depth_limit: 1024,
			scratch_warn_capacity: 100,
		}
	}
}

/// Whether an updated instance's host nodes are still the ones that were attached before.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Placement {
	Kept,
	/// The instance now owns new, detached host nodes. Its old ones were removed.
	Replaced,
}

/// Creates [`RNode`] trees from [`VNode`]s and patches them in place on later passes.
///
/// One pass runs to completion synchronously. A `Reconciler` holds no per-tree state
/// besides reusable scratch space, so it can drive any number of independent trees on its [`Host`].
#[derive(Debug)]
pub struct Reconciler<H: Host> {
	host: H,
	options: Options,
	pub(crate) key_scratch: KeyIndexScratch,
	invalidated: bool,
}
impl<H: Host> Reconciler<H> {
	#[must_use]
	pub fn new(host: H) -> Self {
		Self::with_options(host, Options::default())
	}

	#[must_use]
	pub fn with_options(host: H, options: Options) -> Self {
		Self {
			host,
			options,
			key_scratch: KeyIndexScratch::new(),
			invalidated: false,
		}
	}

	#[must_use]
	pub fn host(&self) -> &H {
		&self.host
	}

	pub fn host_mut(&mut self) -> &mut H {
		&mut self.host
	}

	#[must_use]
	pub fn into_host(self) -> H {
		self.host
	}

	#[must_use]
	pub fn options(&self) -> &Options {
		&self.options
	}

	/// Whether any component asked for another render since the last call.
	pub fn take_invalidated(&mut self) -> bool {
		mem::take(&mut self.invalidated)
	}

	/// Materializes `vnode` into a new, detached host tree.
	///
	/// `post_init_dom` hooks run bottom-up once the whole tree is built.
	///
	/// # Errors
	///
	/// On malformed descriptions, failing hooks and host failures.
	#[instrument(skip_all)]
	pub fn create_tree(&mut self, vnode: VNode<H>) -> Result<RNode<H>, Error> {
		let rnode = self.create_node(vnode, Namespace::Html, 0)?;
		let mut rnode = self.require_host_node(rnode)?;
		self.post_init_subtree(&mut rnode)?;
		Ok(rnode)
	}

	/// Updates `old` to reflect `vnode`, in place where possible.
	///
	/// If the tag or component kind changed, `old` is destroyed (and detached) and a new detached tree is returned instead.
	/// Inserting that one is up to the caller.
	///
	/// # Errors
	///
	/// On malformed descriptions, duplicate sibling keys, failing hooks and host failures.
	#[instrument(skip_all)]
	pub fn reconcile(&mut self, vnode: VNode<H>, old: RNode<H>) -> Result<RNode<H>, Error> {
		let namespace = old.namespace;
		let (rnode, placement) = self.update_node(vnode, old, namespace, 0)?;
		let mut rnode = self.require_host_node(rnode)?;
		if placement == Placement::Replaced {
			self.post_init_subtree(&mut rnode)?;
		}
		Ok(rnode)
	}

	/// Tree roots must own a host node. Empty ones are destroyed and rejected.
	fn require_host_node(&mut self, rnode: RNode<H>) -> Result<RNode<H>, Error> {
		if let Materialized::Empty = rnode.materialized {
			error!("Tree root rendered no host node.");
			self.destroy(rnode, true)?;
			return Err(Error::NoHostNode);
		}
		Ok(rnode)
	}

	/// Destroys `rnode` and its subtree, firing `destroy` hooks before detaching its host node(s).
	///
	/// # Errors
	///
	/// Iff a `destroy` hook or the host fails.
	#[instrument(skip_all)]
	pub fn destroy_tree(&mut self, rnode: RNode<H>) -> Result<(), Error> {
		self.destroy(rnode, true)
	}

	/// Bubbles a host event from `target` outwards through the components of `roots`.
	///
	/// Returns [`None`] if `target` isn't a host node owned by any of the trees.
	///
	/// # Errors
	///
	/// Iff an event hook fails.
	#[instrument(skip(self, roots, target, event))]
	pub fn dispatch_event(&mut self, roots: &mut [RNode<H>], target: &H::Node, name: &str, event: &H::Event) -> Result<Option<EventFlow>, Error> {
		for root in roots {
			if let Some(flow) = self.bubble(root, target, name, event)? {
				return Ok(Some(flow));
			}
		}
		Ok(None)
	}

	fn bubble(&mut self, rnode: &mut RNode<H>, target: &H::Node, name: &str, event: &H::Event) -> Result<Option<EventFlow>, Error> {
		if !rnode.owns(target) {
			let mut found = false;
			for child in &mut rnode.children {
				match self.bubble(child, target, name, event)? {
					Some(EventFlow::Handled) => return Ok(Some(EventFlow::Handled)),
					Some(EventFlow::Bubble) => {
						found = true;
						break;
					}
					None => (),
				}
			}
			if !found {
				return Ok(None);
			}
		}

		if let (Some(component), Some(ctx)) = (rnode.component.clone(), rnode.context.as_mut()) {
			let (hook, flow) = component::dispatch(&*component, ctx, name, event);
			let flow = flow.map_err(hook_error(&*component, hook))?;
			self.collect_invalidation(ctx);
			if flow == EventFlow::Handled {
				trace!(component = component.name(), "Event handled.");
				return Ok(Some(EventFlow::Handled));
			}
		}
		Ok(Some(EventFlow::Bubble))
	}

	pub(crate) fn create_node(&mut self, mut vnode: VNode<H>, namespace: Namespace, depth: usize) -> Result<RNode<H>, Error> {
		self.check_depth(depth)?;
		let span = trace_span!("Creating", tag = ?vnode.tag, key = ?vnode.key);
		let _enter = span.enter();

		let key = vnode.key.clone();
		let input_tag = vnode.tag.clone();
		let component = vnode.component.clone();
		let context = match &component {
			None => None,
			Some(component) => {
				let mut ctx = Context::new(vnode.data.clone());
				component.init(&mut ctx).map_err(hook_error(&**component, "init"))?;
				component.render(&mut ctx, &mut vnode, None).map_err(hook_error(&**component, "render"))?;
				self.collect_invalidation(&mut ctx);
				check_component_target(&**component, &vnode)?;
				for &event in component.events() {
					self.host.listen(event)?;
				}
				Some(ctx)
			}
		};

		let (materialized, children) = self.materialize(&mut vnode, namespace, depth)?;
		Ok(RNode {
			key,
			input_tag,
			namespace,
			materialized,
			children,
			pending_post_init: component.is_some(),
			component,
			context,
			last: vnode,
		})
	}

	/// Creates the host node(s) for an already rendered `vnode`, moving its child descriptions into new instances.
	fn materialize(&mut self, vnode: &mut VNode<H>, namespace: Namespace, depth: usize) -> Result<(Materialized<H::Node>, Vec<RNode<H>>), Error> {
		match &vnode.tag {
			Tag::Text if matches!(vnode.children, Children::Bool(_)) => {
				trace!("Rendered nothing.");
				Ok((Materialized::Empty, Vec::new()))
			}
			Tag::Text => {
				let text = leaf_text(&vnode.children)?;
				trace!(text = crate::logged(text), "Creating text node.");
				Ok((Materialized::Text(self.host.create_text(text)?), Vec::new()))
			}
			Tag::Html => {
				let markup = html_markup(&vnode.children)?;
				trace!(markup = crate::logged(markup), "Parsing raw HTML.");
				Ok((Materialized::Html(self.host.parse_html(markup)?), Vec::new()))
			}
			Tag::Element(name) => {
				let element_namespace = namespace.of_element(name);
				let element = self.host.create_element(name, element_namespace)?;
				self.patch_attrs(&element, &Props::new(), &vnode.attrs)?;
				self.patch_style(&element, &Props::new(), &vnode.style)?;
				let children = mem::take(&mut vnode.children);
				let children = self.reconcile_children(&element, element_namespace.of_children(name), Vec::new(), children, depth + 1, Attach::Deferred)?;
				Ok((Materialized::Element(element), children))
			}
		}
	}

	pub(crate) fn update_node(&mut self, mut vnode: VNode<H>, mut rnode: RNode<H>, namespace: Namespace, depth: usize) -> Result<(RNode<H>, Placement), Error> {
		self.check_depth(depth)?;
		let span = trace_span!("Updating", tag = ?vnode.tag, key = ?vnode.key);
		let _enter = span.enter();

		if vnode.tag != rnode.input_tag || !component::same_kind(vnode.component.as_ref(), rnode.component.as_ref()) {
			trace!(old_tag = ?rnode.input_tag, "Tag or component kind changed. Recreating.");
			self.destroy(rnode, true)?;
			return Ok((self.create_node(vnode, namespace, depth)?, Placement::Replaced));
		}

		if let (Some(component), Some(ctx)) = (vnode.component.clone(), rnode.context.as_mut()) {
			let should_change = component
				.should_change(ctx, vnode.data.as_deref(), rnode.last.data.as_deref())
				.map_err(hook_error(&*component, "should_change"))?;
			if !should_change {
				self.collect_invalidation(ctx);
				trace!("`should_change` returned `false`. Keeping previous output.");
				return Ok((rnode, Placement::Kept));
			}

			ctx.set_data(vnode.data.clone());
			component
				.render(ctx, &mut vnode, Some(&rnode.last))
				.map_err(hook_error(&*component, "render"))?;
			self.collect_invalidation(ctx);
			check_component_target(&*component, &vnode)?;
			// Same kind, but possibly a different descriptor.
			if let Some(previous) = rnode.component.replace(Rc::clone(&component)) {
				if previous.events() != component.events() {
					for &event in component.events() {
						self.host.listen(event)?;
					}
					for &event in previous.events() {
						self.host.unlisten(event);
					}
				}
			}
		}

		let placement = if vnode.tag == rnode.last.tag {
			self.patch_in_place(&mut vnode, &mut rnode, depth)?
		} else {
			None
		};
		let placement = match placement {
			Some(placement) => placement,
			None => {
				trace!(old_tag = ?rnode.last.tag, "Render changed the tag. Replacing the host node.");
				self.release(&mut rnode)?;
				let (materialized, children) = self.materialize(&mut vnode, rnode.namespace, depth)?;
				rnode.materialized = materialized;
				rnode.children = children;
				rnode.pending_post_init = rnode.component.is_some();
				Placement::Replaced
			}
		};

		rnode.last = vnode;
		Ok((rnode, placement))
	}

	/// Patches `rnode`'s host node(s) to `vnode`, which has the same tag as the previous rendering.
	///
	/// Returns [`None`] if the materialization doesn't fit the tag, which leaves `rnode` untouched.
	fn patch_in_place(&mut self, vnode: &mut VNode<H>, rnode: &mut RNode<H>, depth: usize) -> Result<Option<Placement>, Error> {
		Ok(Some(match (&vnode.tag, &rnode.materialized) {
			(Tag::Text, Materialized::Empty) if matches!(vnode.children, Children::Bool(_)) => Placement::Kept,

			(Tag::Text, Materialized::Text(node)) if !matches!(vnode.children, Children::Bool(_)) => {
				let text = leaf_text(&vnode.children)?;
				if leaf_text(&rnode.last.children)? != text {
					trace!(text = crate::logged(text), "Updating text.");
					self.host.set_text(node, text)?;
				}
				Placement::Kept
			}

			(Tag::Html, Materialized::Html(nodes)) => {
				let markup = html_markup(&vnode.children)?;
				if html_markup(&rnode.last.children)? == markup {
					Placement::Kept
				} else {
					trace!(markup = crate::logged(markup), "Replacing raw HTML block.");
					for node in nodes {
						self.host.remove(node)?;
					}
					rnode.materialized = Materialized::Html(self.host.parse_html(markup)?);
					Placement::Replaced
				}
			}

			(Tag::Element(name), Materialized::Element(element)) => {
				let element = element.clone();
				self.patch_attrs(&element, &rnode.last.attrs, &vnode.attrs)?;
				self.patch_style(&element, &rnode.last.style, &vnode.style)?;
				let children = mem::take(&mut vnode.children);
				let old_children = mem::take(&mut rnode.children);
				let child_namespace = rnode.namespace.of_element(name).of_children(name);
				rnode.children = self.reconcile_children(&element, child_namespace, old_children, children, depth + 1, Attach::Live)?;
				Placement::Kept
			}

			_ => return Ok(None),
		}))
	}

	/// Destroys `rnode`'s children and detaches its own host node(s), keeping the instance and its context.
	fn release(&mut self, rnode: &mut RNode<H>) -> Result<(), Error> {
		for child in mem::take(&mut rnode.children) {
			self.destroy(child, false)?;
		}
		for node in rnode.materialized.nodes() {
			self.host.remove(node)?;
		}
		Ok(())
	}

	/// Children first, then `rnode` itself. Only the subtree's top host node(s) are detached, and only if `detach`.
	pub(crate) fn destroy(&mut self, mut rnode: RNode<H>, detach: bool) -> Result<(), Error> {
		let span = trace_span!("Destroying", tag = ?rnode.last.tag, key = ?rnode.key);
		let _enter = span.enter();

		for child in mem::take(&mut rnode.children) {
			self.destroy(child, false)?;
		}

		if let (Some(component), Some(ctx)) = (&rnode.component, rnode.context.as_mut()) {
			if let Some(element) = rnode.materialized.first() {
				component
					.destroy(ctx, element, &mut self.host)
					.map_err(hook_error(&**component, "destroy"))?;
			}
			for &event in component.events() {
				self.host.unlisten(event);
			}
		}

		if detach {
			for node in rnode.materialized.nodes() {
				self.host.remove(node)?;
			}
		}
		Ok(())
	}

	/// Runs pending `post_init_dom` hooks in `rnode`'s subtree, innermost first.
	pub(crate) fn post_init_subtree(&mut self, rnode: &mut RNode<H>) -> Result<(), Error> {
		for child in &mut rnode.children {
			self.post_init_subtree(child)?;
		}

		if mem::take(&mut rnode.pending_post_init) {
			if let (Some(component), Some(ctx), Some(element)) = (&rnode.component, rnode.context.as_mut(), rnode.materialized.first()) {
				trace!(component = component.name(), "post_init_dom");
				component
					.post_init_dom(ctx, element, &mut self.host)
					.map_err(hook_error(&**component, "post_init_dom"))?;
				if ctx.take_invalidated() {
					self.invalidated = true;
				}
			}
		}
		Ok(())
	}

	fn patch_attrs(&mut self, element: &H::Node, old: &Props, new: &Props) -> Result<(), HostError> {
		for change in patch::diff(old, new) {
			match change {
				PropChange::Remove(name) => self.host.remove_attribute(element, name)?,
				PropChange::Set(name, value) => {
					trace!(name, value = crate::logged(value), "Setting attribute.");
					self.host.set_attribute(element, name, value)?;
				}
			}
		}
		Ok(())
	}

	fn patch_style(&mut self, element: &H::Node, old: &Props, new: &Props) -> Result<(), HostError> {
		for change in patch::diff_cascading(old, new) {
			match change {
				PropChange::Remove(property) => self.host.remove_style(element, property)?,
				PropChange::Set(property, value) => {
					trace!(property, value = crate::logged(value), "Setting style property.");
					self.host.set_style(element, property, value)?;
				}
			}
		}
		Ok(())
	}

	pub(crate) fn host_insert_before(&mut self, parent: &H::Node, node: &H::Node, reference: Option<&H::Node>) -> Result<(), HostError> {
		self.host.insert_before(parent, node, reference)
	}

	fn collect_invalidation(&mut self, ctx: &mut Context) {
		if ctx.take_invalidated() {
			trace!("Invalidated.");
			self.invalidated = true;
		}
	}

	fn check_depth(&self, depth: usize) -> Result<(), Error> {
		if depth >= self.options.depth_limit {
			error!("Depth limit reached");
			Err(Error::DepthLimit {
				limit: self.options.depth_limit,
			})
		} else {
			Ok(())
		}
	}
}

fn hook_error<H: Host>(component: &dyn Component<H>, hook: &'static str) -> impl FnOnce(HookError) -> Error {
	let component = component.name();
	move |source| {
		error!("`{}` hook of component `{}` failed: {}", hook, component, source);
		Error::Hook { hook, component, source }
	}
}

fn check_component_target<H: Host>(component: &dyn Component<H>, vnode: &VNode<H>) -> Result<(), Error> {
	if vnode.tag == Tag::Html {
		error!("Component `{}` rendered a raw HTML block.", component.name());
		return Err(Error::HtmlComponent {
			component: component.name(),
		});
	}
	Ok(())
}

fn leaf_text<H: Host>(children: &Children<H>) -> Result<&str, Error> {
	match children {
		Children::Text(text) => Ok(text),
		Children::Empty => Ok(""),
		Children::Bool(_) => {
			error!("Tried to read text from a boolean leaf.");
			Err(Error::NoHostNode)
		}
		Children::One(_) | Children::Many(_) => {
			error!("Text leaf with {}.", children.kind());
			Err(Error::MalformedText { found: children.kind() })
		}
	}
}

fn html_markup<H: Host>(children: &Children<H>) -> Result<&str, Error> {
	match children {
		Children::Text(markup) => Ok(markup),
		Children::Empty => Ok(""),
		Children::Bool(_) | Children::One(_) | Children::Many(_) => {
			error!("Raw HTML node with {}.", children.kind());
			Err(Error::MalformedHtml { found: children.kind() })
		}
	}
}
