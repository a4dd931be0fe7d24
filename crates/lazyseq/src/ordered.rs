//! Sorted sequences with secondary keys.

use std::cmp::Ordering;
use std::ops::Deref;
use std::rc::Rc;

use crate::compare::{self, compare_json, default_compare, Comparer, Dir};
use crate::record::Record;
use crate::sequence::{field_selector, Iter, Sequence};
use crate::stage;

/// A sorted [`Sequence`] that remembers how it was sorted.
///
/// Every sequence operation is available through `Deref`. The `then_by*`
/// methods add a tie-breaking key: they compose the active comparer with the
/// new one and sort the original, unsorted upstream again.
///
/// ```
/// let people = lazyseq::from(vec![("Mark", 30), ("Jane", 20), ("Anna", 30)]);
/// let ordered = people
///     .sort_by_descending(|p| p.1)
///     .then_by(|p| p.0)
///     .to_vec();
///
/// assert_eq!(ordered, vec![("Anna", 30), ("Mark", 30), ("Jane", 20)]);
/// ```
pub struct OrderedSequence<'a, T> {
    unsorted: Sequence<'a, T>,
    comparer: Comparer<'a, T>,
    sorted: Sequence<'a, T>,
}

impl<T> Clone for OrderedSequence<'_, T> {
    fn clone(&self) -> Self {
        OrderedSequence {
            unsorted: self.unsorted.clone(),
            comparer: Rc::clone(&self.comparer),
            sorted: self.sorted.clone(),
        }
    }
}

impl<T> std::fmt::Debug for OrderedSequence<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderedSequence").finish_non_exhaustive()
    }
}

impl<'a, T: 'a> OrderedSequence<'a, T> {
    pub(crate) fn new(unsorted: Sequence<'a, T>, comparer: Comparer<'a, T>) -> Self {
        let sorted = stage::sort_by(&unsorted, Rc::clone(&comparer));
        OrderedSequence {
            unsorted,
            comparer,
            sorted,
        }
    }

    /// The active comparer, including every secondary key.
    pub fn comparer(&self) -> &Comparer<'a, T> {
        &self.comparer
    }

    /// Unwraps into the sorted sequence.
    pub fn into_sequence(self) -> Sequence<'a, T> {
        self.sorted
    }

    fn then(&self, next: Comparer<'a, T>) -> Self {
        let comparer = compare::chain(Rc::clone(&self.comparer), next);
        OrderedSequence::new(self.unsorted.clone(), comparer)
    }

    /// Breaks ties with a custom element comparer.
    pub fn then_with<C>(&self, comparer: C) -> Self
    where
        C: Fn(&T, &T) -> Ordering + 'a,
    {
        self.then(Rc::new(comparer))
    }

    /// Breaks ties by key, ascending.
    pub fn then_by<K, S>(&self, key_selector: S) -> Self
    where
        K: PartialOrd + 'a,
        S: Fn(&T) -> K + 'a,
    {
        self.then_by_with(key_selector, default_compare)
    }

    /// Breaks ties by key, ascending, comparing keys with `comparer`.
    pub fn then_by_with<K, S, C>(&self, key_selector: S, comparer: C) -> Self
    where
        S: Fn(&T) -> K + 'a,
        C: Fn(&K, &K) -> Ordering + 'a,
    {
        self.then(compare::key_comparer(Dir::Asc, key_selector, comparer))
    }

    /// Breaks ties by key, descending.
    pub fn then_by_descending<K, S>(&self, key_selector: S) -> Self
    where
        K: PartialOrd + 'a,
        S: Fn(&T) -> K + 'a,
    {
        self.then_by_descending_with(key_selector, default_compare)
    }

    /// Breaks ties by key, descending, comparing keys with `comparer`.
    pub fn then_by_descending_with<K, S, C>(&self, key_selector: S, comparer: C) -> Self
    where
        S: Fn(&T) -> K + 'a,
        C: Fn(&K, &K) -> Ordering + 'a,
    {
        self.then(compare::key_comparer(Dir::Desc, key_selector, comparer))
    }

    /// Breaks ties by the value of a named field.
    pub fn then_by_field(&self, name: &str, dir: Dir) -> Self
    where
        T: Record,
    {
        self.then(compare::key_comparer(dir, field_selector(name), compare_json))
    }
}

impl<'a, T> Deref for OrderedSequence<'a, T> {
    type Target = Sequence<'a, T>;

    fn deref(&self) -> &Sequence<'a, T> {
        &self.sorted
    }
}

impl<'a, T: 'a> From<OrderedSequence<'a, T>> for Sequence<'a, T> {
    fn from(ordered: OrderedSequence<'a, T>) -> Self {
        ordered.into_sequence()
    }
}

impl<'a, T: 'a> IntoIterator for OrderedSequence<'a, T> {
    type Item = T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.sorted.iter()
    }
}

impl<'a, T: 'a> IntoIterator for &OrderedSequence<'a, T> {
    type Item = T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.sorted.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn then_by_resorts_unsorted_source() {
        let pairs = crate::from(vec![(2, 'b'), (1, 'z'), (2, 'a'), (1, 'y')]);
        let by_number = pairs.sort_by(|p| p.0);
        let refined = by_number.then_by(|p| p.1);

        assert_eq!(by_number.to_vec(), vec![(1, 'z'), (1, 'y'), (2, 'b'), (2, 'a')]);
        assert_eq!(refined.to_vec(), vec![(1, 'y'), (1, 'z'), (2, 'a'), (2, 'b')]);
    }

    #[test]
    fn then_by_descending_breaks_ties() {
        let words = crate::from(vec!["bb", "a", "cc", "d"]);
        let sorted = words.sort_by(|w| w.len()).then_by_descending(|w| *w);
        assert_eq!(sorted.to_vec(), vec!["d", "a", "cc", "bb"]);
    }

    #[test]
    fn comparer_is_composed() {
        let sorted = crate::from(vec![(1, 2), (1, 1)])
            .sort_by(|p| p.0)
            .then_by(|p| p.1);
        let comparer = sorted.comparer();
        assert_eq!(comparer(&(1, 1), &(1, 2)), Ordering::Less);
        assert_eq!(comparer(&(1, 1), &(1, 1)), Ordering::Equal);
    }

    #[test]
    fn sorts_by_field() {
        let rows = crate::from(vec![
            json!({"name": "b", "rank": 2}),
            json!({"name": "a", "rank": 2}),
            json!({"name": "c"}),
            json!({"name": "d", "rank": 1}),
        ]);
        let names: Vec<_> = rows
            .sort_by_field("rank", Dir::Asc)
            .then_by_field("name", Dir::Desc)
            .map(|row| row["name"].clone())
            .to_vec();

        assert_eq!(names, vec![json!("d"), json!("b"), json!("a"), json!("c")]);
    }

    #[test]
    fn converts_back_into_sequence() {
        let sorted = crate::from(vec![3, 1, 2]).sort();
        let seq: Sequence<'_, i32> = sorted.clone().into();
        assert_eq!(seq.to_vec(), vec![1, 2, 3]);
        assert_eq!((&sorted).into_iter().collect::<Vec<_>>(), vec![1, 2, 3]);
    }
}
