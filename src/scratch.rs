use crate::vnode::Key;
use hashbrown::HashMap;

/// A key → sibling index map whose allocation is reused across child lists and passes.
#[derive(Debug, Default)]
pub struct KeyIndexScratch(HashMap<Key, usize>);
impl KeyIndexScratch {
	#[must_use]
	pub fn new() -> Self {
		Self(HashMap::new())
	}

	/// Clears the map and hands it out.
	///
	/// Nested child lists each borrow it in turn, so callers must finish with it before recursing.
	pub fn temp(&mut self) -> &mut HashMap<Key, usize> {
		self.0.clear();
		&mut self.0
	}

	/// Retrieves the map's capacity without clearing it first.
	#[must_use]
	pub fn capacity(&self) -> usize {
		self.0.capacity()
	}
}
