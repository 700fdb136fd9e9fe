//! Sibling list reconciliation: keyed and positional matching, then one ordering pass over the parent.

use crate::{
	error::Error,
	host::{Host, Namespace},
	reconcile::{Placement, Reconciler},
	rnode::RNode,
	vnode::{Children, Tag, VNode},
};
use hashbrown::HashMap;
use tracing::{error, trace, trace_span};

/// Whether a sibling list is being built inside a live tree or inside a subtree that is itself still being created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Attach {
	/// New and replaced entries get their `post_init_dom` hooks as soon as they are in place.
	Live,
	/// Hooks wait for whoever attaches the enclosing subtree.
	Deferred,
}

/// Flattens a parent's child description into the sibling list it materializes.
///
/// Boolean leaves are dropped unless a component may render them into something,
/// and adjacent unkeyed raw HTML blocks are concatenated.
pub(crate) fn normalize<H: Host>(children: Children<H>) -> Vec<VNode<H>> {
	let nodes = match children {
		Children::Empty | Children::Bool(_) => return Vec::new(),
		Children::Text(text) => return vec![VNode::text(text)],
		Children::One(node) => vec![*node],
		Children::Many(nodes) => nodes,
	};

	let mut normalized: Vec<VNode<H>> = Vec::with_capacity(nodes.len());
	for node in nodes {
		if node.is_boolean_leaf() && node.component.is_none() {
			continue;
		}
		if let Some(previous) = normalized.last_mut() {
			if is_mergeable_html(previous) && is_mergeable_html(&node) {
				if let (Children::Text(markup), Children::Text(next)) = (&mut previous.children, &node.children) {
					markup.to_mut().push_str(next);
				}
				continue;
			}
		}
		normalized.push(node);
	}
	normalized
}

fn is_mergeable_html<H: Host>(node: &VNode<H>) -> bool {
	node.tag == Tag::Html && node.key.is_none() && node.component.is_none() && matches!(node.children, Children::Text(_))
}

impl<H: Host> Reconciler<H> {
	/// Reconciles `parent`'s child instances `old` against the description `new`.
	///
	/// Keyed entries match by key regardless of position. Unkeyed entries match index by index within the run
	/// that follows the same matched keyed anchor. Leftover old entries are destroyed, leftover new ones created.
	/// Host nodes are then put into order with one left-to-right pass that leaves entries already in sequence alone.
	#[allow(clippy::too_many_lines)]
	pub(crate) fn reconcile_children(
		&mut self,
		parent: &H::Node,
		namespace: Namespace,
		old: Vec<RNode<H>>,
		new: Children<H>,
		depth: usize,
		attach: Attach,
	) -> Result<Vec<RNode<H>>, Error> {
		let new = normalize(new);
		if old.is_empty() && new.is_empty() {
			return Ok(Vec::new());
		}

		let span = trace_span!("Diffing children", old = old.len(), new = new.len());
		let _enter = span.enter();

		let mut new_for_old: Vec<Option<usize>> = vec![None; old.len()];
		let mut old_for_new: Vec<Option<usize>> = vec![None; new.len()];

		{
			let keys = self.key_scratch.temp();
			for (j, vnode) in new.iter().enumerate() {
				if let Some(key) = &vnode.key {
					if keys.insert(key.clone(), j).is_some() {
						error!("Duplicate sibling key {}", key);
						return Err(Error::DuplicateKey(key.clone()));
					}
				}
			}
			for (i, rnode) in old.iter().enumerate() {
				if let Some(&j) = rnode.key.as_ref().and_then(|key| keys.get(key)) {
					new_for_old[i] = Some(j);
					old_for_new[j] = Some(i);
				}
			}
		}

		// Unkeyed runs, identified by the new index of the matched keyed entry before them.
		let mut old_runs: HashMap<Option<usize>, Vec<usize>> = HashMap::new();
		let mut anchor = None;
		for (i, rnode) in old.iter().enumerate() {
			match (&rnode.key, new_for_old[i]) {
				(Some(_), Some(j)) => anchor = Some(j),
				(Some(_), None) => (),
				(None, _) => old_runs.entry(anchor).or_default().push(i),
			}
		}
		let mut anchor = None;
		let mut offset = 0;
		for (j, vnode) in new.iter().enumerate() {
			match (&vnode.key, old_for_new[j]) {
				(Some(_), Some(_)) => {
					anchor = Some(j);
					offset = 0;
				}
				(Some(_), None) => (),
				(None, _) => {
					if let Some(&i) = old_runs.get(&anchor).and_then(|run| run.get(offset)) {
						new_for_old[i] = Some(j);
						old_for_new[j] = Some(i);
					}
					offset += 1;
				}
			}
		}

		let mut old: Vec<Option<RNode<H>>> = old.into_iter().map(Some).collect();
		for (slot, matched) in old.iter_mut().zip(&new_for_old) {
			if matched.is_none() {
				if let Some(rnode) = slot.take() {
					trace!(key = ?rnode.key, "Removing unmatched child.");
					self.destroy(rnode, true)?;
				}
			}
		}

		// Old index of each entry whose host nodes are still attached in their previous position.
		let mut attached_at: Vec<Option<usize>> = vec![None; new.len()];
		let mut target = Vec::with_capacity(new.len());
		for (j, vnode) in new.into_iter().enumerate() {
			let reused = old_for_new[j].and_then(|i| old[i].take().map(|rnode| (i, rnode)));
			match reused {
				Some((i, rnode)) => {
					let (rnode, placement) = self.update_node(vnode, rnode, namespace, depth)?;
					if placement == Placement::Kept {
						attached_at[j] = Some(i);
					}
					target.push(rnode);
				}
				None => target.push(self.create_node(vnode, namespace, depth)?),
			}
		}

		// Target indices of the attached entries, in their current host order.
		let mut current: Vec<(usize, usize)> = attached_at
			.iter()
			.enumerate()
			.filter_map(|(j, i)| i.map(|i| (i, j)))
			.filter(|&(_, j)| !target[j].materialized.nodes().is_empty())
			.collect();
		current.sort_unstable();
		let current: Vec<usize> = current.into_iter().map(|(_, j)| j).collect();

		let mut placed = vec![false; target.len()];
		let mut next = 0;
		for j in 0..target.len() {
			if target[j].materialized.nodes().is_empty() {
				continue;
			}
			while current.get(next).map_or(false, |&k| placed[k]) {
				next += 1;
			}
			if current.get(next) == Some(&j) {
				placed[j] = true;
				next += 1;
				continue;
			}

			let reference = current.get(next).and_then(|&k| target[k].materialized.first());
			trace!(index = j, "Placing child.");
			for node in target[j].materialized.nodes() {
				self.host_insert_before(parent, node, reference)?;
			}
			placed[j] = true;
		}

		if attach == Attach::Live {
			for (rnode, attached_at) in target.iter_mut().zip(&attached_at) {
				if attached_at.is_none() {
					self.post_init_subtree(rnode)?;
				}
			}
		}
		Ok(target)
	}
}

#[cfg(test)]
mod tests {
	use super::normalize;
	use crate::{
		memory::MemoryHost,
		vnode::{Children, Tag, VNode},
	};

	type V = VNode<MemoryHost>;

	#[test]
	fn scalars() {
		assert!(normalize::<MemoryHost>(Children::Empty).is_empty());
		assert!(normalize::<MemoryHost>(Children::Bool(true)).is_empty());

		let text = normalize::<MemoryHost>(Children::from("hello"));
		assert_eq!(text.len(), 1);
		assert_eq!(text[0].tag, Tag::Text);
		assert!(matches!(&text[0].children, Children::Text(t) if t == "hello"));
	}

	#[test]
	fn booleans_are_dropped() {
		let children = Children::from(vec![V::boolean(false), V::element("a"), V::boolean(true)]);
		let normalized = normalize(children);
		assert_eq!(normalized.len(), 1);
		assert_eq!(normalized[0].tag, Tag::Element("a".into()));
	}

	#[test]
	fn adjacent_html_is_concatenated() {
		let children = Children::from(vec![
			V::html("<b>1</b>"),
			V::html("<i>2</i>"),
			V::element("hr"),
			V::html("<u>3</u>"),
			V::html("<s>4</s>").key("k"),
		]);
		let normalized = normalize(children);
		assert_eq!(normalized.len(), 4);
		assert!(matches!(&normalized[0].children, Children::Text(t) if t == "<b>1</b><i>2</i>"));
		assert!(matches!(&normalized[2].children, Children::Text(t) if t == "<u>3</u>"));
		assert_eq!(normalized[3].key, Some("k".into()));
	}

	#[test]
	fn booleans_between_html_blocks_still_merge() {
		let children = Children::from(vec![V::html("a"), V::boolean(false), V::html("b")]);
		let normalized = normalize(children);
		assert_eq!(normalized.len(), 1);
		assert!(matches!(&normalized[0].children, Children::Text(t) if t == "ab"));
	}
}
