//! The declarative description submitted for one render pass.

use crate::{component::Component, host::Host};
use core::{
	any::Any,
	fmt::{self, Debug, Display, Formatter},
	num::TryFromIntError,
};
use std::{borrow::Cow, rc::Rc};

/// What kind of host node a [`VNode`] materializes as.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Tag {
	/// A plain text leaf (or a boolean leaf, which produces no host node).
	Text,
	/// A raw HTML block. Its [`Children::Text`] content is inserted as markup.
	Html,
	/// An element with the given tag name.
	Element(Cow<'static, str>),
}
impl Tag {
	#[must_use]
	pub fn element_name(&self) -> Option<&str> {
		match self {
			Tag::Element(name) => Some(name),
			Tag::Text | Tag::Html => None,
		}
	}
}
impl Default for Tag {
	fn default() -> Self {
		Tag::Text
	}
}

/// Identity token of a child among its immediate siblings.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
	Str(Cow<'static, str>),
	Num(i64),
}
impl Display for Key {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		match self {
			Key::Str(s) => write!(f, "{:?}", s),
			Key::Num(num) => write!(f, "{}", num),
		}
	}
}
impl From<&'static str> for Key {
	fn from(s: &'static str) -> Self {
		Key::Str(s.into())
	}
}
impl From<String> for Key {
	fn from(string: String) -> Self {
		Key::Str(string.into())
	}
}
impl From<i32> for Key {
	fn from(num: i32) -> Self {
		Key::Num(num.into())
	}
}
impl From<i64> for Key {
	fn from(num: i64) -> Self {
		Key::Num(num)
	}
}
impl TryFrom<usize> for Key {
	type Error = TryFromIntError;

	/// Fails for indices beyond [`i64::MAX`] instead of wrapping into another key.
	fn try_from(num: usize) -> Result<Self, Self::Error> {
		i64::try_from(num).map(Key::Num)
	}
}

/// An ordered name → value mapping, used for both attributes and style properties.
///
/// Order is kept as declared. For styles it is significant, since shorthands and longhands may overlap.
/// If a name occurs more than once, the last occurrence wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Props(Vec<(Cow<'static, str>, Cow<'static, str>)>);
impl Props {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets `name` to `value`, keeping the position of a previous entry with the same name.
	pub fn set(&mut self, name: impl Into<Cow<'static, str>>, value: impl Into<Cow<'static, str>>) {
		let (name, value) = (name.into(), value.into());
		match self.0.iter_mut().find(|(n, _)| *n == name) {
			Some(entry) => entry.1 = value,
			None => self.0.push((name, value)),
		}
	}

	#[must_use]
	pub fn get(&self, name: &str) -> Option<&str> {
		self.0.iter().find(|(n, _)| n == name).map(|(_, v)| v.as_ref())
	}

	pub fn remove(&mut self, name: &str) -> Option<Cow<'static, str>> {
		let index = self.0.iter().position(|(n, _)| n == name)?;
		Some(self.0.remove(index).1)
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
		self.0.iter().map(|(n, v)| (n.as_ref(), v.as_ref()))
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.0.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}
impl<N, V> FromIterator<(N, V)> for Props
where
	N: Into<Cow<'static, str>>,
	V: Into<Cow<'static, str>>,
{
	fn from_iter<T: IntoIterator<Item = (N, V)>>(iter: T) -> Self {
		let mut props = Props::new();
		for (name, value) in iter {
			props.set(name, value);
		}
		props
	}
}

/// Content of a [`VNode`].
pub enum Children<H: Host> {
	Empty,
	/// Text content of a text leaf or element, or the markup of a raw HTML block.
	Text(Cow<'static, str>),
	/// `true` and `false` both contribute no host node.
	Bool(bool),
	One(Box<VNode<H>>),
	Many(Vec<VNode<H>>),
}
impl<H: Host> Children<H> {
	pub(crate) fn kind(&self) -> &'static str {
		match self {
			Children::Empty => "no content",
			Children::Text(_) => "text",
			Children::Bool(_) => "a boolean",
			Children::One(_) => "a child node",
			Children::Many(_) => "a child list",
		}
	}
}
impl<H: Host> Default for Children<H> {
	fn default() -> Self {
		Children::Empty
	}
}
impl<H: Host> Clone for Children<H> {
	fn clone(&self) -> Self {
		match self {
			Children::Empty => Children::Empty,
			Children::Text(text) => Children::Text(text.clone()),
			Children::Bool(bool) => Children::Bool(*bool),
			Children::One(node) => Children::One(node.clone()),
			Children::Many(nodes) => Children::Many(nodes.clone()),
		}
	}
}
impl<H: Host> Debug for Children<H> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		match self {
			Children::Empty => f.write_str("Empty"),
			Children::Text(text) => f.debug_tuple("Text").field(text).finish(),
			Children::Bool(bool) => f.debug_tuple("Bool").field(bool).finish(),
			Children::One(node) => f.debug_tuple("One").field(node).finish(),
			Children::Many(nodes) => f.debug_tuple("Many").field(nodes).finish(),
		}
	}
}
impl<H: Host> From<&'static str> for Children<H> {
	fn from(text: &'static str) -> Self {
		Children::Text(text.into())
	}
}
impl<H: Host> From<String> for Children<H> {
	fn from(text: String) -> Self {
		Children::Text(text.into())
	}
}
impl<H: Host> From<bool> for Children<H> {
	fn from(bool: bool) -> Self {
		Children::Bool(bool)
	}
}
impl<H: Host> From<VNode<H>> for Children<H> {
	fn from(node: VNode<H>) -> Self {
		Children::One(Box::new(node))
	}
}
impl<H: Host> From<Vec<VNode<H>>> for Children<H> {
	fn from(nodes: Vec<VNode<H>>) -> Self {
		Children::Many(nodes)
	}
}

/// One render pass's description of a node.
///
/// Produced fresh for each pass. A [`Component`] may rewrite any field of its working copy during `render`.
pub struct VNode<H: Host> {
	pub tag: Tag,
	pub key: Option<Key>,
	pub attrs: Props,
	pub style: Props,
	pub children: Children<H>,
	pub component: Option<Rc<dyn Component<H>>>,
	/// Opaque payload made available to the component through its [`Context`](`crate::Context`).
	pub data: Option<Rc<dyn Any>>,
}
impl<H: Host> VNode<H> {
	fn with_tag(tag: Tag) -> Self {
		Self {
			tag,
			key: None,
			attrs: Props::new(),
			style: Props::new(),
			children: Children::Empty,
			component: None,
			data: None,
		}
	}

	#[must_use]
	pub fn element(name: impl Into<Cow<'static, str>>) -> Self {
		Self::with_tag(Tag::Element(name.into()))
	}

	#[must_use]
	pub fn text(text: impl Into<Cow<'static, str>>) -> Self {
		Self {
			children: Children::Text(text.into()),
			..Self::with_tag(Tag::Text)
		}
	}

	#[must_use]
	pub fn boolean(value: bool) -> Self {
		Self {
			children: Children::Bool(value),
			..Self::with_tag(Tag::Text)
		}
	}

	#[must_use]
	pub fn html(markup: impl Into<Cow<'static, str>>) -> Self {
		Self {
			children: Children::Text(markup.into()),
			..Self::with_tag(Tag::Html)
		}
	}

	/// A node whose shape is determined entirely by `component`'s `render` hook.
	#[must_use]
	pub fn component(component: Rc<dyn Component<H>>) -> Self {
		Self {
			component: Some(component),
			..Self::with_tag(Tag::Text)
		}
	}

	#[must_use]
	pub fn key(mut self, key: impl Into<Key>) -> Self {
		self.key = Some(key.into());
		self
	}

	#[must_use]
	pub fn attr(mut self, name: impl Into<Cow<'static, str>>, value: impl Into<Cow<'static, str>>) -> Self {
		self.attrs.set(name, value);
		self
	}

	#[must_use]
	pub fn style(mut self, property: impl Into<Cow<'static, str>>, value: impl Into<Cow<'static, str>>) -> Self {
		self.style.set(property, value);
		self
	}

	#[must_use]
	pub fn content(mut self, children: impl Into<Children<H>>) -> Self {
		self.children = children.into();
		self
	}

	/// Appends `child`, converting existing content into a child list as needed.
	#[must_use]
	pub fn child(mut self, child: VNode<H>) -> Self {
		self.children = match core::mem::take(&mut self.children) {
			Children::Empty => Children::Many(vec![child]),
			Children::Text(text) => Children::Many(vec![VNode::text(text), child]),
			Children::Bool(bool) => Children::Many(vec![VNode::boolean(bool), child]),
			Children::One(first) => Children::Many(vec![*first, child]),
			Children::Many(mut nodes) => {
				nodes.push(child);
				Children::Many(nodes)
			}
		};
		self
	}

	#[must_use]
	pub fn with_component(mut self, component: Rc<dyn Component<H>>) -> Self {
		self.component = Some(component);
		self
	}

	#[must_use]
	pub fn data<T: Any>(mut self, data: T) -> Self {
		self.data = Some(Rc::new(data));
		self
	}

	/// `true` for text leaves whose content is a boolean.
	#[must_use]
	pub fn is_boolean_leaf(&self) -> bool {
		self.tag == Tag::Text && matches!(self.children, Children::Bool(_))
	}
}
impl<H: Host> Clone for VNode<H> {
	fn clone(&self) -> Self {
		Self {
			tag: self.tag.clone(),
			key: self.key.clone(),
			attrs: self.attrs.clone(),
			style: self.style.clone(),
			children: self.children.clone(),
			component: self.component.clone(),
			data: self.data.clone(),
		}
	}
}
impl<H: Host> Debug for VNode<H> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_struct("VNode")
			.field("tag", &self.tag)
			.field("key", &self.key)
			.field("attrs", &self.attrs)
			.field("style", &self.style)
			.field("children", &self.children)
			.field("component", &self.component.as_ref().map(|c| c.name()))
			.field("data", &self.data.as_ref().map(|_| ".."))
			.finish()
	}
}
