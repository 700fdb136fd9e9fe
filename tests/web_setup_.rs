#![cfg(target_arch = "wasm32")]

use std::sync::Once;
use web_sys::{window, Document};

static LOG_INITIALIZED: Once = Once::new();

pub fn document() -> Document {
	window().unwrap().document().unwrap()
}

/// A fresh `<div>` appended to the page body, with logging set up.
pub fn container() -> web_sys::Element {
	LOG_INITIALIZED.call_once(tracing_wasm::set_as_global_default);

	let document = document();
	let container = document.create_element("div").unwrap();
	document.body().unwrap().append_child(&container).unwrap();
	container
}
