use rstest::rstest;

use super::*;

fn index_with_disabled(len: usize, disabled: &'static [usize]) -> CandidateIndex<usize> {
	let mut index = CandidateIndex::default();
	let predicate = move |item: &usize| disabled.contains(item);
	index.build(CandidateList::truncated((0..len).collect(), None), Some(&predicate));
	index
}

#[test]
fn build_without_predicate_enables_everything() {
	let mut index = CandidateIndex::default();
	index.build(CandidateList::truncated(vec!["a", "b", "c"], None), None);
	assert_eq!(index.enabled(), &[0, 1, 2]);
	assert_eq!(index.highlighted(), Some(0));
}

#[test]
fn build_highlights_first_enabled() {
	let index = index_with_disabled(5, &[0, 2]);
	assert_eq!(index.enabled(), &[1, 3, 4]);
	assert_eq!(index.highlighted(), Some(1));
	assert_eq!(index.highlighted_item(), Some(&1));
}

#[test]
fn all_disabled_leaves_no_highlight() {
	let mut index = index_with_disabled(3, &[0, 1, 2]);
	assert_eq!(index.highlighted(), None);
	assert_eq!(index.next(), None);
	assert_eq!(index.previous(), None);
	assert_eq!(index.highlighted(), None);
}

#[test]
fn empty_list_navigation_is_noop() {
	let mut index: CandidateIndex<u8> = CandidateIndex::default();
	index.build(CandidateList::default(), None);
	assert_eq!(index.highlighted(), None);
	assert_eq!(index.next(), None);
}

#[test]
fn next_wraps_over_enabled_set() {
	let mut index = index_with_disabled(5, &[0, 2]);
	index.highlighted = Some(4);
	assert_eq!(index.next(), Some(1));
	assert_eq!(index.previous(), Some(4));
}

#[rstest]
#[case(1, 3)]
#[case(2, 4)]
#[case(3, 1)]
#[case(-1, 4)]
#[case(-2, 3)]
#[case(-3, 1)]
#[case(7, 3)]
#[case(isize::MAX, 3)]
#[case(isize::MIN, 3)]
fn step_moves_by_enabled_members(#[case] delta: isize, #[case] expected: usize) {
	let mut index = index_with_disabled(5, &[0, 2]);
	assert_eq!(index.highlighted(), Some(1));
	assert_eq!(index.step(delta), Some(expected));
	assert!(index.is_enabled(expected));
}

#[rstest]
#[case(isize::MAX, 1)]
#[case(isize::MIN, 2)]
#[case(-1, 4)]
fn step_from_unset_highlight_wraps(#[case] delta: isize, #[case] expected: usize) {
	let mut index = index_with_disabled(5, &[]);
	index.highlighted = None;
	assert_eq!(index.step(delta), Some(expected));
}

#[test]
fn zero_step_is_noop() {
	let mut index = index_with_disabled(5, &[]);
	assert_eq!(index.step(0), None);
	assert_eq!(index.highlighted(), Some(0));
}

#[test]
fn disabled_candidates_are_never_landed_on() {
	let mut index = index_with_disabled(6, &[1, 2, 4]);
	let mut seen = Vec::new();
	for _ in 0..6 {
		seen.push(index.next().unwrap());
	}
	assert_eq!(seen, vec![3, 5, 0, 3, 5, 0]);
}

#[test]
fn truncation_keeps_total() {
	let list = CandidateList::truncated((0..15).collect::<Vec<_>>(), Some(10));
	assert_eq!(list.len(), 10);
	assert_eq!(list.total(), 15);
	assert_eq!(list.items().last(), Some(&9));

	let unlimited = CandidateList::truncated((0..15).collect::<Vec<_>>(), None);
	assert_eq!(unlimited.len(), 15);
}

#[test]
fn highlight_item_requires_enabled_match() {
	let mut index = index_with_disabled(5, &[2]);
	assert!(index.highlight_item(&3));
	assert_eq!(index.highlighted(), Some(3));
	assert!(!index.highlight_item(&2));
	assert!(!index.highlight_item(&9));
	assert_eq!(index.highlighted(), Some(3));
	assert_eq!(index.position_of(&2), Some(2));
}
