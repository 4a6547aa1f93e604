//! Ordering helpers backing comparator mode.

use std::cmp::Ordering;

/// Index at which `el` can be inserted into the ordered `items` keeping the order.
///
/// This is the first position whose element compares greater than `el`, so an element
/// equal to existing ones lands after all of them. Returns `items.len()` when nothing
/// compares greater. The scan is linear, so unordered input still gets that first
/// greater position.
pub fn find_insert_index<T, F>(compare: F, items: &[T], el: &T) -> usize
where
    F: Fn(&T, &T) -> Ordering,
{
    find_insert_index_by(items, |item| compare(item, el))
}

/// Same as [`find_insert_index`], with `probe` comparing an existing item to the new one.
pub fn find_insert_index_by<U, F>(items: &[U], mut probe: F) -> usize
where
    F: FnMut(&U) -> Ordering,
{
    items
        .iter()
        .position(|item| probe(item) == Ordering::Greater)
        .unwrap_or(items.len())
}

/// Stable top-down merge sort.
///
/// Consumes `items` and returns the sorted sequence. Equal elements keep their
/// original relative order.
pub fn merge_sort<T, F>(compare: &F, mut items: Vec<T>) -> Vec<T>
where
    F: Fn(&T, &T) -> Ordering + ?Sized,
{
    let len = items.len();
    if len < 2 {
        return items;
    }

    let second_half = items.split_off(len / 2);
    merge(
        compare,
        merge_sort(compare, items),
        merge_sort(compare, second_half),
    )
}

/// Sorted copy of a borrowed slice; the input is left untouched.
pub fn merge_sorted<T, F>(compare: &F, items: &[T]) -> Vec<T>
where
    T: Clone,
    F: Fn(&T, &T) -> Ordering + ?Sized,
{
    merge_sort(compare, items.to_vec())
}

fn merge<T, F>(compare: &F, left: Vec<T>, right: Vec<T>) -> Vec<T>
where
    F: Fn(&T, &T) -> Ordering + ?Sized,
{
    let mut result = Vec::with_capacity(left.len() + right.len());
    let mut left = left.into_iter().peekable();
    let mut right = right.into_iter().peekable();

    loop {
        // ties take from the left run to stay stable
        let take_left = match (left.peek(), right.peek()) {
            (Some(l), Some(r)) => compare(l, r) != Ordering::Greater,
            _ => break,
        };
        let next = if take_left { left.next() } else { right.next() };
        result.extend(next);
    }

    result.extend(left);
    result.extend(right);
    result
}
