#![cfg(target_arch = "wasm32")]

use sapwood::{web::WebHost, Component, Context, EventFlow, HookError, VNode};
use std::{cell::Cell, rc::Rc};
use wasm_bindgen::JsCast;
use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};
use web_sys::HtmlElement;

wasm_bindgen_test_configure!(run_in_browser);

mod web_setup_;
use web_setup_::{container, document};

struct Clicks(Rc<Cell<u32>>);
impl Component<WebHost> for Clicks {
	fn events(&self) -> &'static [&'static str] {
		&["click"]
	}

	fn on_click(&self, _: &mut Context, event: &web_sys::Event) -> Result<EventFlow, HookError> {
		assert_eq!(event.type_(), "click");
		self.0.set(self.0.get() + 1);
		Ok(EventFlow::Handled)
	}
}

#[wasm_bindgen_test]
fn click() {
	let container = container();
	let root = WebHost::root(container.clone()).unwrap();

	let click_count = Rc::new(Cell::new(0));
	let vdom = || {
		VNode::element("div").with_component(Rc::new(Clicks(Rc::clone(&click_count)))).content(
			VNode::element("button")
				.attr("id", "test-button")
				.content(VNode::element("b").content("Click me")),
		)
	};

	assert_eq!(click_count.get(), 0);
	root.borrow_mut().update_child_nodes(vdom()).unwrap();
	assert_eq!(click_count.get(), 0);

	let button: HtmlElement = document().get_element_by_id("test-button").unwrap().dyn_into().unwrap();
	button.click();
	assert_eq!(click_count.get(), 1);

	let label: HtmlElement = button.first_element_child().unwrap().dyn_into().unwrap();
	label.click();
	assert_eq!(click_count.get(), 2);

	root.borrow_mut().update_child_nodes(Vec::new()).unwrap();
	container.dispatch_event(&web_sys::Event::new("click").unwrap()).unwrap();
	assert_eq!(click_count.get(), 2);
}
