use proptest::prelude::*;
use sapwood::{
	memory::{MemoryHost, NodeId},
	Key, Reconciler, VNode,
};
use std::collections::{HashMap, HashSet};

type Entries = Vec<(Option<u8>, u8)>;

/// Partially keyed sibling lists with unique keys.
fn entries() -> impl Strategy<Value = Entries> {
	prop::collection::vec((prop::option::of(0..8_u8), 0..100_u8), 0..12).prop_map(|mut entries| {
		let mut seen = HashSet::new();
		entries.retain(|(key, _)| key.map_or(true, |key| seen.insert(key)));
		entries
	})
}

fn build(entries: &[(Option<u8>, u8)]) -> VNode<MemoryHost> {
	VNode::element("div").content(
		entries
			.iter()
			.map(|&(key, text)| {
				let span = VNode::element("span").content(text.to_string());
				match key {
					Some(key) => span.key(i64::from(key)),
					None => span,
				}
			})
			.collect::<Vec<_>>(),
	)
}

proptest! {
	#[test]
	fn update_reflects_description(old in entries(), new in entries()) {
		let mut reconciler = Reconciler::new(MemoryHost::new());
		let rnode = reconciler.create_tree(build(&old)).unwrap();
		let div = *rnode.element().unwrap();
		let before: HashMap<Key, NodeId> = rnode
			.children()
			.iter()
			.filter_map(|child| Some((child.key()?.clone(), *child.element()?)))
			.collect();

		let rnode = reconciler.reconcile(build(&new), rnode).unwrap();
		let host = reconciler.host();

		let rendered: Vec<NodeId> = rnode.children().iter().map(|child| *child.element().unwrap()).collect();
		prop_assert_eq!(host.children(div), rendered.as_slice());

		let texts: Vec<String> = rendered.iter().map(|&node| host.text_content(node)).collect();
		let expected: Vec<String> = new.iter().map(|(_, text)| text.to_string()).collect();
		prop_assert_eq!(texts, expected);

		for child in rnode.children() {
			if let Some(&element) = child.key().and_then(|key| before.get(key)) {
				prop_assert_eq!(child.element(), Some(&element));
			}
		}

		let mutations = host.mutations();
		reconciler.reconcile(build(&new), rnode).unwrap();
		prop_assert_eq!(reconciler.host().mutations(), mutations);
	}

	#[test]
	fn unkeyed_lists_never_move(old in 0..8_usize, new in 0..8_usize) {
		let list = |len: usize| VNode::element("ol").content((0..len).map(|i| VNode::element("li").content(i.to_string())).collect::<Vec<_>>());

		let mut reconciler = Reconciler::new(MemoryHost::new());
		let rnode = reconciler.create_tree(list(old)).unwrap();
		let before = reconciler.host().children(*rnode.element().unwrap()).to_vec();
		let rnode = reconciler.reconcile(list(new), rnode).unwrap();
		let after = reconciler.host().children(*rnode.element().unwrap());

		let kept = old.min(new);
		prop_assert_eq!(&after[..kept], &before[..kept]);
		for element in &before[kept..] {
			prop_assert_eq!(reconciler.host().parent(*element), None);
		}
	}
}
