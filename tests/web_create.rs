#![cfg(target_arch = "wasm32")]

use sapwood::{web::WebHost, Root, VNode};
use wasm_bindgen::JsCast;
use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};

wasm_bindgen_test_configure!(run_in_browser);

mod web_setup_;
use web_setup_::container;

type V = VNode<WebHost>;

fn render(vdom: Vec<V>) -> web_sys::Element {
	let container = container();
	let mut root = Root::new_for_element_child_nodes(WebHost::new(container.clone()).unwrap(), container.clone().into());
	root.update_child_nodes(vdom).unwrap();
	container
}

#[wasm_bindgen_test]
fn text() {
	let container = render(vec![V::text("Hello sapwood!")]);
	assert_eq!(container.inner_html(), "Hello sapwood!");
}

#[wasm_bindgen_test]
fn element_with_attributes_and_style() {
	let container = render(vec![V::element("p")
		.attr("class", "greeting")
		.style("height", "auto")
		.style("width", "20em")
		.content("Hi")]);
	assert_eq!(
		container.inner_html(),
		r#"<p class="greeting" style="height: auto; width: 20em;">Hi</p>"#
	);
}

#[wasm_bindgen_test]
fn raw_html() {
	let container = render(vec![V::html("a<span>b</span>c"), V::html("d<i>e</i>")]);
	assert_eq!(container.inner_html(), "a<span>b</span>cd<i>e</i>");
	assert_eq!(container.child_nodes().length(), 4);
}

#[wasm_bindgen_test]
fn namespaces() {
	let container = render(vec![
		V::element("svg").content(V::element("foreignObject").content(V::element("p"))),
		V::element("math").content(V::element("mi").content("x")),
	]);

	let svg = container.first_element_child().unwrap();
	let foreign_object = svg.first_element_child().unwrap();
	let p = foreign_object.first_element_child().unwrap();
	let mi = container.last_element_child().unwrap().first_element_child().unwrap();

	assert_eq!(svg.namespace_uri().as_deref(), Some("http://www.w3.org/2000/svg"));
	assert_eq!(foreign_object.namespace_uri().as_deref(), Some("http://www.w3.org/2000/svg"));
	assert_eq!(p.namespace_uri().as_deref(), Some("http://www.w3.org/1999/xhtml"));
	assert_eq!(mi.namespace_uri().as_deref(), Some("http://www.w3.org/1998/Math/MathML"));
	assert!(svg.dyn_ref::<web_sys::SvgElement>().is_some());
}
