#![cfg(target_arch = "wasm32")]

use sapwood::{web::WebHost, Component, Context, HookError, Root, VNode};
use std::{cell::Cell, rc::Rc};
use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};

wasm_bindgen_test_configure!(run_in_browser);

mod web_setup_;
use web_setup_::container;

type V = VNode<WebHost>;

/// Counts instances whose element is currently attached.
struct Attached(Rc<Cell<isize>>);
impl Component<WebHost> for Attached {
	fn post_init_dom(&self, _: &mut Context, element: &web_sys::Node, _: &mut WebHost) -> Result<(), HookError> {
		assert!(element.is_connected());
		self.0.set(self.0.get() + 1);
		Ok(())
	}

	fn destroy(&self, _: &mut Context, element: &web_sys::Node, _: &mut WebHost) -> Result<(), HookError> {
		assert!(element.is_connected());
		self.0.set(self.0.get() - 1);
		Ok(())
	}
}

#[wasm_bindgen_test]
fn text() {
	test_create_diff_identical_remove(|_| vec![V::text("Hello sapwood text!")], 0);
}

#[wasm_bindgen_test]
fn multi() {
	test_create_diff_identical_remove(
		|_| vec![V::text("Hello sapwood"), V::text(" multiple "), V::text("nodes!")],
		0,
	);
}

#[wasm_bindgen_test]
fn keyed() {
	test_create_diff_identical_remove(
		|attached| {
			vec![
				V::element("span").key(0).with_component(attached.clone()).content("Hello sapwood"),
				V::element("span").content(" keyed "),
				V::element("span").key(1).with_component(attached).content(" nodes."),
			]
		},
		2,
	);
}

#[wasm_bindgen_test]
fn raw_html() {
	test_create_diff_identical_remove(|_| vec![V::html("<b>raw</b> "), V::html("<i>HTML</i>")], 0);
}

#[wasm_bindgen_test]
fn nested_components() {
	test_create_diff_identical_remove(
		|attached| {
			vec![V::element("div")
				.with_component(attached.clone())
				.content(vec![V::element("button").with_component(attached).content("nested")])]
		},
		2,
	);
}

#[wasm_bindgen_test]
fn minimal_math() {
	test_create_diff_identical_remove(|_| vec![V::element("math")], 0);
}

#[wasm_bindgen_test]
fn minimal_svg() {
	test_create_diff_identical_remove(|_| vec![V::element("svg").content(V::element("circle").attr("r", "1"))], 0);
}

fn test_create_diff_identical_remove(vdom: impl Fn(Rc<dyn Component<WebHost>>) -> Vec<V>, instance_count: isize) {
	let count = Rc::new(Cell::new(0));
	let attached: Rc<dyn Component<WebHost>> = Rc::new(Attached(Rc::clone(&count)));

	let container = container();
	let mut root = Root::new_for_element_child_nodes(WebHost::new(container.clone()).unwrap(), container.clone().into());

	root.update_child_nodes(vdom(Rc::clone(&attached))).unwrap();
	assert_eq!(count.get(), instance_count);
	let html = container.inner_html();
	let first = container.first_child();

	root.update_child_nodes(vdom(Rc::clone(&attached))).unwrap();
	assert_eq!(count.get(), instance_count);
	assert_eq!(container.inner_html(), html);
	assert_eq!(container.first_child(), first);

	root.update_child_nodes(Vec::new()).unwrap();
	assert_eq!(count.get(), 0);
	assert_eq!(container.child_nodes().length(), 0);
}
