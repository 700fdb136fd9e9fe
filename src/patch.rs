use crate::vnode::Props;

/// One step of turning an old [`Props`] mapping into a new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropChange<'a> {
	Remove(&'a str),
	Set(&'a str, &'a str),
}

/// Computes the changes that turn `old` into `new`, for mappings whose entries are independent (attributes).
///
/// Removals come first, in `old`'s order. Additions and changed values follow in `new`'s declared order.
/// Unchanged entries produce nothing.
#[must_use]
pub fn diff<'a>(old: &'a Props, new: &'a Props) -> Vec<PropChange<'a>> {
	let skip = common_prefix(old, new);
	let mut changes = removals(old, new, skip);
	changes.extend(
		new.iter()
			.skip(skip)
			.filter(|&(name, value)| old.get(name) != Some(value))
			.map(|(name, value)| PropChange::Set(name, value)),
	);
	changes
}

/// Like [`diff`], but for mappings where later entries may override earlier ones (inline styles).
///
/// Once an entry changes, every later entry of `new` is set again so that it keeps taking precedence.
/// Removing a shorthand may clear overlapping longhands in the host, so any removal reapplies all of `new`.
#[must_use]
pub fn diff_cascading<'a>(old: &'a Props, new: &'a Props) -> Vec<PropChange<'a>> {
	let skip = common_prefix(old, new);
	let mut changes = removals(old, new, skip);
	let first_dirty = if changes.is_empty() {
		new.iter()
			.skip(skip)
			.position(|(name, value)| old.get(name) != Some(value))
			.map(|i| i + skip)
	} else {
		Some(0)
	};
	if let Some(first_dirty) = first_dirty {
		changes.extend(new.iter().skip(first_dirty).map(|(name, value)| PropChange::Set(name, value)));
	}
	changes
}

fn common_prefix(old: &Props, new: &Props) -> usize {
	old.iter().zip(new.iter()).take_while(|(a, b)| a == b).count()
}

fn removals<'a>(old: &'a Props, new: &Props, skip: usize) -> Vec<PropChange<'a>> {
	old.iter()
		.skip(skip)
		.filter(|&(name, _)| new.get(name).is_none())
		.map(|(name, _)| PropChange::Remove(name))
		.collect()
}
