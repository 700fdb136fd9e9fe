use crate::{error::HookError, host::Host, vnode::VNode};
use core::any::{type_name, Any, TypeId};
use std::rc::Rc;

/// Whether an event hook consumed an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventFlow {
	/// Keep bubbling towards the root.
	Bubble,
	/// Stop bubbling and suppress the host's default action.
	Handled,
}

/// Per-instance state of a component, created before `init` and dropped after `destroy`.
#[derive(Debug, Default)]
pub struct Context {
	data: Option<Rc<dyn Any>>,
	state: Option<Box<dyn Any>>,
	invalidated: bool,
}
impl Context {
	pub(crate) fn new(data: Option<Rc<dyn Any>>) -> Self {
		Self {
			data,
			state: None,
			invalidated: false,
		}
	}

	pub(crate) fn set_data(&mut self, data: Option<Rc<dyn Any>>) {
		self.data = data;
	}

	pub(crate) fn take_invalidated(&mut self) -> bool {
		core::mem::take(&mut self.invalidated)
	}

	/// The current node's `data`, if it is a `T`.
	#[must_use]
	pub fn data<T: Any>(&self) -> Option<&T> {
		self.data.as_deref()?.downcast_ref()
	}

	#[must_use]
	pub fn state<T: Any>(&self) -> Option<&T> {
		self.state.as_deref()?.downcast_ref()
	}

	pub fn state_mut<T: Any>(&mut self) -> Option<&mut T> {
		self.state.as_deref_mut()?.downcast_mut()
	}

	/// Replaces the instance state.
	pub fn set_state<T: Any>(&mut self, state: T) {
		self.state = Some(Box::new(state));
	}

	/// The instance state, inserting `T::default()` if it's missing or of another type.
	pub fn state_or_default<T: Any + Default>(&mut self) -> &mut T {
		let state = self.state.get_or_insert_with(|| Box::new(T::default()));
		if !state.is::<T>() {
			*state = Box::new(T::default());
		}
		match state.downcast_mut() {
			Some(state) => state,
			None => unreachable!("state was just replaced with a `T`"),
		}
	}

	/// Requests another render pass from whoever schedules them.
	pub fn invalidate(&mut self) {
		self.invalidated = true;
	}
}

/// A set of lifecycle hooks attached to a [`VNode`].
///
/// Every hook is optional. Hooks are resolved through this trait once per node, so a component is
/// typically a unit `struct` shared as `Rc<dyn Component<H>>`, parameterized through [`VNode::data`].
///
/// Errors returned from any hook abort the current pass.
#[allow(unused_variables)]
pub trait Component<H: Host>: 'static {
	/// Used in log output and errors.
	fn name(&self) -> &'static str {
		type_name::<Self>()
	}

	/// Identity of the component kind. An update with a component of a different kind recreates the instance.
	fn kind(&self) -> TypeId {
		TypeId::of::<Self>()
	}

	/// Event names this component's event hooks want to receive while an instance is alive.
	fn events(&self) -> &'static [&'static str] {
		&[]
	}

	/// Called once, before the first materialization.
	fn init(&self, ctx: &mut Context) -> Result<(), HookError> {
		Ok(())
	}

	/// Called once per create and once per update, on a working copy of the node.
	///
	/// `previous` is [`None`] on creation. It doesn't include the previous children,
	/// which live on as the instance's rendered children.
	fn render(&self, ctx: &mut Context, node: &mut VNode<H>, previous: Option<&VNode<H>>) -> Result<(), HookError> {
		Ok(())
	}

	/// Returning `false` keeps this instance's previous output without rendering.
	fn should_change(&self, ctx: &mut Context, new_data: Option<&dyn Any>, old_data: Option<&dyn Any>) -> Result<bool, HookError> {
		Ok(true)
	}

	/// Called once after the instance's subtree has been attached, innermost components first.
	fn post_init_dom(&self, ctx: &mut Context, element: &H::Node, host: &mut H) -> Result<(), HookError> {
		Ok(())
	}

	/// Called once when the instance is removed, before its element is detached.
	fn destroy(&self, ctx: &mut Context, element: &H::Node, host: &mut H) -> Result<(), HookError> {
		Ok(())
	}

	fn on_key_down(&self, ctx: &mut Context, event: &H::Event) -> Result<EventFlow, HookError> {
		Ok(EventFlow::Bubble)
	}

	fn on_key_up(&self, ctx: &mut Context, event: &H::Event) -> Result<EventFlow, HookError> {
		Ok(EventFlow::Bubble)
	}

	fn on_key_press(&self, ctx: &mut Context, event: &H::Event) -> Result<EventFlow, HookError> {
		Ok(EventFlow::Bubble)
	}

	fn on_click(&self, ctx: &mut Context, event: &H::Event) -> Result<EventFlow, HookError> {
		Ok(EventFlow::Bubble)
	}

	/// Receives events without a dedicated hook.
	fn on_event(&self, ctx: &mut Context, name: &str, event: &H::Event) -> Result<EventFlow, HookError> {
		Ok(EventFlow::Bubble)
	}
}

/// Routes `name` to the matching named hook of `component`.
pub(crate) fn dispatch<H: Host>(component: &dyn Component<H>, ctx: &mut Context, name: &str, event: &H::Event) -> (&'static str, Result<EventFlow, HookError>) {
	match name {
		"keydown" => ("on_key_down", component.on_key_down(ctx, event)),
		"keyup" => ("on_key_up", component.on_key_up(ctx, event)),
		"keypress" => ("on_key_press", component.on_key_press(ctx, event)),
		"click" => ("on_click", component.on_click(ctx, event)),
		_ => ("on_event", component.on_event(ctx, name, event)),
	}
}

pub(crate) fn same_kind<H: Host>(a: Option<&Rc<dyn Component<H>>>, b: Option<&Rc<dyn Component<H>>>) -> bool {
	match (a, b) {
		(None, None) => true,
		(Some(a), Some(b)) => a.kind() == b.kind(),
		_ => false,
	}
}
