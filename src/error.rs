use crate::vnode::Key;
use thiserror::Error;

/// What a [`Component`](`crate::Component`) hook returns when it fails.
pub type HookError = Box<dyn std::error::Error>;

/// Failure of a single [`Host`](`crate::Host`) primitive.
#[derive(Debug, Error)]
#[error("host operation `{operation}` failed: {detail}")]
pub struct HostError {
	pub operation: &'static str,
	pub detail: String,
}
impl HostError {
	#[must_use]
	pub fn new(operation: &'static str, detail: impl Into<String>) -> Self {
		Self {
			operation,
			detail: detail.into(),
		}
	}
}

/// Errors that abort a reconciliation pass.
///
/// A pass that returned an error may have left the instance tree half-updated.
/// Discard the affected [`Root`](`crate::Root`) or [`RNode`](`crate::RNode`) afterwards.
#[derive(Debug, Error)]
pub enum Error {
	#[error("raw HTML node content must be text, but found {found}")]
	MalformedHtml { found: &'static str },

	#[error("text leaf content must be text or a boolean, but found {found}")]
	MalformedText { found: &'static str },

	#[error("component `{component}` can't be attached to a raw HTML block")]
	HtmlComponent { component: &'static str },

	#[error("a boolean leaf has no host node and can't be a root")]
	NoHostNode,

	#[error("duplicate key {0} among siblings")]
	DuplicateKey(Key),

	#[error("depth limit ({limit}) reached")]
	DepthLimit { limit: usize },

	#[error("`{hook}` hook of component `{component}` failed: {source}")]
	Hook {
		hook: &'static str,
		component: &'static str,
		#[source]
		source: HookError,
	},

	#[error(transparent)]
	Host(#[from] HostError),
}
