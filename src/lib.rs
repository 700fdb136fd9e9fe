#![doc(html_root_url = "https://docs.rs/sapwood/0.0.1")]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! A component-aware VDOM reconciler.
//!
//! [`VNode`] trees describe one render pass. A [`Reconciler`] materializes them into [`RNode`] trees
//! of host nodes through a [`Host`] and patches those in place on later passes,
//! matching children by key where present and by position within keyed anchors otherwise.
//!
//! [`Root`] drives whole passes for the child nodes of one container element.
//! [`memory::MemoryHost`] renders headlessly, [`web::WebHost`] into the browser DOM.

#[cfg(doctest)]
pub mod readme {
	doc_comment::doctest!("../README.md");
}

mod children;
mod component;
mod error;
mod host;
pub mod memory;
pub mod patch;
pub mod rc_hash_map;
mod reconcile;
mod rnode;
mod root;
mod scratch;
mod vnode;
pub mod web;

pub use component::{Component, Context, EventFlow};
pub use error::{Error, HookError, HostError};
pub use host::{Host, Namespace};
pub use reconcile::{Options, Reconciler};
pub use rnode::{Materialized, RNode};
pub use root::Root;
pub use vnode::{Children, Key, Props, Tag, VNode};

/// Redacts text, attribute and markup values from log output unless the `dangerous-logging` feature is enabled.
#[allow(clippy::non_ascii_literal)]
pub(crate) fn logged(value: &str) -> &str {
	if cfg!(feature = "dangerous-logging") {
		value
	} else {
		"…"
	}
}
