//! Candidate list with enabled-set tracking and wraparound highlight.

/// Search results as displayed: truncated to the display cap, remembering
/// how many the search actually returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateList<T> {
	items: Vec<T>,
	total: usize,
}

impl<T> Default for CandidateList<T> {
	fn default() -> Self {
		Self {
			items: Vec::new(),
			total: 0,
		}
	}
}

impl<T> CandidateList<T> {
	/// Keeps at most `max_items` of `items`, in order.
	pub fn truncated(mut items: Vec<T>, max_items: Option<usize>) -> Self {
		let total = items.len();
		if let Some(max) = max_items {
			items.truncate(max);
		}
		Self { items, total }
	}

	pub fn items(&self) -> &[T] {
		&self.items
	}

	/// Number of results before truncation.
	pub fn total(&self) -> usize {
		self.total
	}

	pub fn len(&self) -> usize {
		self.items.len()
	}

	pub fn is_empty(&self) -> bool {
		self.items.is_empty()
	}

	pub fn get(&self, index: usize) -> Option<&T> {
		self.items.get(index)
	}
}

/// Current candidates, which of them are selectable, and which one is
/// highlighted.
///
/// The highlight is `None` exactly when no candidate is enabled; otherwise it
/// always points at an enabled candidate.
#[derive(Debug, Clone)]
pub struct CandidateIndex<T> {
	list: CandidateList<T>,
	enabled: Vec<usize>,
	highlighted: Option<usize>,
}

impl<T> Default for CandidateIndex<T> {
	fn default() -> Self {
		Self {
			list: CandidateList::default(),
			enabled: Vec::new(),
			highlighted: None,
		}
	}
}

impl<T> CandidateIndex<T> {
	/// Replaces the candidates and highlights the first enabled one.
	pub fn build(&mut self, list: CandidateList<T>, is_disabled: Option<&(dyn Fn(&T) -> bool + Send + Sync)>) {
		self.enabled = list
			.items()
			.iter()
			.enumerate()
			.filter(|(_, item)| !is_disabled.is_some_and(|disabled| disabled(item)))
			.map(|(idx, _)| idx)
			.collect();
		self.list = list;
		self.highlighted = self.enabled.first().copied();
	}

	pub fn list(&self) -> &CandidateList<T> {
		&self.list
	}

	pub fn items(&self) -> &[T] {
		self.list.items()
	}

	/// Indices of selectable candidates, in list order.
	pub fn enabled(&self) -> &[usize] {
		&self.enabled
	}

	pub fn is_enabled(&self, index: usize) -> bool {
		self.enabled.binary_search(&index).is_ok()
	}

	pub fn highlighted(&self) -> Option<usize> {
		self.highlighted
	}

	pub fn highlighted_item(&self) -> Option<&T> {
		self.highlighted.and_then(|idx| self.list.get(idx))
	}

	/// Moves the highlight `delta` enabled candidates forward (or backward
	/// when negative), wrapping at either end.
	///
	/// Returns the new highlight, or `None` when nothing is enabled or
	/// `delta` is zero.
	pub fn step(&mut self, delta: isize) -> Option<usize> {
		let len = self.enabled.len();
		if len == 0 || delta == 0 {
			return None;
		}
		let len = len as isize;
		let offset = delta.rem_euclid(len);
		let position = match self.highlighted.and_then(|idx| self.enabled.iter().position(|&e| e == idx)) {
			Some(pos) => pos as isize + offset,
			// Unset highlight: forward lands on the first, backward on the last.
			None if delta > 0 => offset - 1,
			None => offset,
		};
		let next = self.enabled[position.rem_euclid(len) as usize];
		self.highlighted = Some(next);
		Some(next)
	}

	pub fn next(&mut self) -> Option<usize> {
		self.step(1)
	}

	pub fn previous(&mut self) -> Option<usize> {
		self.step(-1)
	}

	/// Drops all candidates.
	pub fn reset(&mut self) {
		*self = Self::default();
	}
}

impl<T: PartialEq> CandidateIndex<T> {
	/// Index of the first candidate equal to `item`.
	pub fn position_of(&self, item: &T) -> Option<usize> {
		self.list.items().iter().position(|candidate| candidate == item)
	}

	/// Highlights the candidate equal to `item` if it is present and enabled.
	pub fn highlight_item(&mut self, item: &T) -> bool {
		match self.position_of(item) {
			Some(idx) if self.is_enabled(idx) => {
				self.highlighted = Some(idx);
				true
			}
			_ => false,
		}
	}
}

#[cfg(test)]
mod tests;
