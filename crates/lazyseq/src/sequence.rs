//! The [`Sequence`] type and its fluent operations.
//!
//! A `Sequence` wraps a producer: a shared closure that returns a brand-new
//! iterator every time it is called. Chaining wraps the producer in a new
//! stage and touches no elements. Consuming calls the producer and pulls.
//!
//! ```
//! let evens = lazyseq::from(vec![1, 2, 3, 4, 5, 6])
//!     .filter(|n| n % 2 == 0)
//!     .map(|n| n * 10);
//!
//! assert_eq!(evens.to_vec(), vec![20, 40, 60]);
//! // Sequences are re-iterable.
//! assert_eq!(evens.to_vec(), vec![20, 40, 60]);
//! ```

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::hash::Hash;
use std::rc::Rc;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::compare::{self, compare_json, default_compare, Dir};
use crate::error::Result;
use crate::key::{GroupKey, Grouping};
use crate::ordered::OrderedSequence;
use crate::record::{pick_fields, Record};
use crate::source::IntoSequence;
use crate::stage;
use crate::value::{ObjectKey, Summand, Total, Truthy};

pub(crate) type BoxIter<'a, T> = Box<dyn Iterator<Item = T> + 'a>;

type Producer<'a, T> = Rc<dyn Fn() -> BoxIter<'a, T> + 'a>;

/// A lazy, re-iterable sequence of `T`.
///
/// Cloning a `Sequence` is cheap and shares the producer, never the
/// elements.
pub struct Sequence<'a, T> {
    producer: Producer<'a, T>,
}

/// One pass over a [`Sequence`], returned by [`Sequence::iter`].
pub struct Iter<'a, T> {
    inner: BoxIter<'a, T>,
}

impl<T> Iterator for Iter<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> fmt::Debug for Iter<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Iter").finish_non_exhaustive()
    }
}

impl<T> Clone for Sequence<'_, T> {
    fn clone(&self) -> Self {
        Sequence {
            producer: Rc::clone(&self.producer),
        }
    }
}

impl<T> fmt::Debug for Sequence<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sequence").finish_non_exhaustive()
    }
}

impl<'a, T: 'a> Sequence<'a, T> {
    /// Creates a sequence from a factory that produces a fresh iterable for
    /// every pass.
    ///
    /// ```
    /// use lazyseq::Sequence;
    ///
    /// let squares = Sequence::new(|| (1..=3).map(|n| n * n));
    /// assert_eq!(squares.to_vec(), vec![1, 4, 9]);
    /// ```
    pub fn new<F, I>(factory: F) -> Self
    where
        F: Fn() -> I + 'a,
        I: IntoIterator<Item = T>,
        I::IntoIter: 'a,
    {
        Sequence {
            producer: Rc::new(move || Box::new(factory().into_iter()) as BoxIter<'a, T>),
        }
    }

    /// Creates a sequence with no elements.
    pub fn empty() -> Self {
        Sequence::new(std::iter::empty)
    }

    /// Starts a fresh pass over the sequence.
    pub fn iter(&self) -> Iter<'a, T> {
        Iter {
            inner: (self.producer)(),
        }
    }

    /// Returns `true` if both sequences share the same producer.
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Rc::ptr_eq(&a.producer, &b.producer)
    }

    // ========================================================================
    // Chaining
    // ========================================================================

    /// Yields this sequence, then each of `others` in order.
    ///
    /// ```
    /// let joined = lazyseq::from(vec![1, 2]).concat([vec![3], vec![4, 5]]);
    /// assert_eq!(joined.to_vec(), vec![1, 2, 3, 4, 5]);
    /// ```
    pub fn concat<I, S>(&self, others: I) -> Sequence<'a, T>
    where
        I: IntoIterator<Item = S>,
        S: IntoSequence<'a, Item = T>,
    {
        let others = others.into_iter().map(IntoSequence::into_sequence).collect();
        stage::concat(self, others)
    }

    /// Yields each of `others` in order, then this sequence.
    pub fn prepend<I, S>(&self, others: I) -> Sequence<'a, T>
    where
        I: IntoIterator<Item = S>,
        S: IntoSequence<'a, Item = T>,
    {
        let others = others.into_iter().map(IntoSequence::into_sequence).collect();
        stage::prepend(self, others)
    }

    /// Yields each element the first time an equal one is seen.
    pub fn distinct(&self) -> Sequence<'a, T>
    where
        T: Eq + Hash + Clone,
    {
        stage::distinct(self)
    }

    /// Yields the elements for which `predicate` returns `true`.
    pub fn filter<P>(&self, predicate: P) -> Sequence<'a, T>
    where
        P: Fn(&T) -> bool + 'a,
    {
        stage::filter(self, predicate)
    }

    /// Yields every element of `mapper(element)` for each element, one level
    /// deep.
    pub fn flat_map<U, I, F>(&self, mapper: F) -> Sequence<'a, U>
    where
        U: 'a,
        I: IntoIterator<Item = U> + 'a,
        I::IntoIter: 'a,
        F: Fn(T) -> I + 'a,
    {
        stage::flat_map(self, mapper)
    }

    /// Groups elements by key, in order of first occurrence.
    ///
    /// ```
    /// let groups = lazyseq::from(vec![1, 2, 3, 4, 5])
    ///     .group_by(|n| n % 2 == 0)
    ///     .map(|g| g.into_parts())
    ///     .to_vec();
    ///
    /// assert_eq!(groups, vec![(false, vec![1, 3, 5]), (true, vec![2, 4])]);
    /// ```
    pub fn group_by<K, S>(&self, key_selector: S) -> Sequence<'a, Grouping<K, T>>
    where
        K: GroupKey + 'a,
        S: Fn(&T) -> K + 'a,
    {
        stage::group_by(self, key_selector, |item| item)
    }

    /// Groups elements by key, collecting `element_selector(element)`
    /// instead of the element itself.
    pub fn group_by_with<K, E, S, M>(
        &self,
        key_selector: S,
        element_selector: M,
    ) -> Sequence<'a, Grouping<K, E>>
    where
        K: GroupKey + 'a,
        E: 'a,
        S: Fn(&T) -> K + 'a,
        M: Fn(T) -> E + 'a,
    {
        stage::group_by(self, key_selector, element_selector)
    }

    /// Groups records by the value of a named field.
    ///
    /// Records without the field share the `null` group.
    pub fn group_by_field(&self, name: &str) -> Sequence<'a, Grouping<Value, T>>
    where
        T: Record,
    {
        self.group_by(field_selector(name))
    }

    /// Groups records by the value of a named field, collecting
    /// `element_selector(record)`.
    pub fn group_by_field_with<E, M>(
        &self,
        name: &str,
        element_selector: M,
    ) -> Sequence<'a, Grouping<Value, E>>
    where
        T: Record,
        E: 'a,
        M: Fn(T) -> E + 'a,
    {
        self.group_by_with(field_selector(name), element_selector)
    }

    /// Yields `mapper(element)` for each element.
    pub fn map<U, F>(&self, mapper: F) -> Sequence<'a, U>
    where
        U: 'a,
        F: Fn(T) -> U + 'a,
    {
        stage::map(self, mapper)
    }

    /// Maps each record to a JSON object holding only the requested fields
    /// that exist on it.
    ///
    /// ```
    /// use lazyseq::serde_json::json;
    ///
    /// let picked = lazyseq::from(vec![json!({"name": "Lisa", "age": 31, "id": 7})])
    ///     .pick(&["age", "name", "email"])
    ///     .to_vec();
    ///
    /// assert_eq!(picked, vec![json!({"age": 31, "name": "Lisa"})]);
    /// ```
    pub fn pick(&self, keys: &[&str]) -> Sequence<'a, Value>
    where
        T: Record,
    {
        let keys: Vec<String> = keys.iter().map(|key| key.to_string()).collect();
        self.map(move |item| pick_fields(&item, &keys))
    }

    /// Yields the elements from last to first.
    pub fn reverse(&self) -> Sequence<'a, T> {
        stage::reverse(self)
    }

    /// Skips the first `count` elements.
    pub fn skip(&self, count: usize) -> Sequence<'a, T> {
        stage::skip(self, count)
    }

    /// Skips elements while `predicate` holds, then yields the rest.
    pub fn skip_while<P>(&self, predicate: P) -> Sequence<'a, T>
    where
        P: Fn(&T) -> bool + 'a,
    {
        stage::skip_while(self, predicate)
    }

    /// Yields at most `count` elements.
    pub fn take(&self, count: usize) -> Sequence<'a, T> {
        stage::take(self, count)
    }

    /// Yields elements while `predicate` holds.
    pub fn take_while<P>(&self, predicate: P) -> Sequence<'a, T>
    where
        P: Fn(&T) -> bool + 'a,
    {
        stage::take_while(self, predicate)
    }

    /// Drops every element equal to one of `items`.
    pub fn without<S>(&self, items: S) -> Sequence<'a, T>
    where
        T: Eq + Hash,
        S: IntoSequence<'a, Item = T>,
    {
        stage::without(self, items.into_sequence())
    }

    /// Drops every element for which `matches(element, item)` holds for some
    /// item.
    pub fn without_by<S, P>(&self, items: S, matches: P) -> Sequence<'a, T>
    where
        T: Eq + Hash + Clone,
        S: IntoSequence<'a, Item = T>,
        P: Fn(&T, &T) -> bool + 'a,
    {
        stage::without_by(self, items.into_sequence(), matches)
    }

    // ========================================================================
    // Sorting
    // ========================================================================

    /// Sorts elements in ascending natural order.
    pub fn sort(&self) -> OrderedSequence<'a, T>
    where
        T: PartialOrd,
    {
        OrderedSequence::new(self.clone(), compare::natural(Dir::Asc))
    }

    /// Sorts elements in descending natural order.
    pub fn sort_descending(&self) -> OrderedSequence<'a, T>
    where
        T: PartialOrd,
    {
        OrderedSequence::new(self.clone(), compare::natural(Dir::Desc))
    }

    /// Sorts elements with a custom element comparer.
    pub fn sort_with<C>(&self, comparer: C) -> OrderedSequence<'a, T>
    where
        C: Fn(&T, &T) -> std::cmp::Ordering + 'a,
    {
        OrderedSequence::new(self.clone(), Rc::new(comparer))
    }

    /// Sorts elements by key, ascending.
    ///
    /// The sort is stable: elements with equal keys keep their input order.
    pub fn sort_by<K, S>(&self, key_selector: S) -> OrderedSequence<'a, T>
    where
        K: PartialOrd + 'a,
        S: Fn(&T) -> K + 'a,
    {
        self.sort_by_with(key_selector, default_compare)
    }

    /// Sorts elements by key, ascending, comparing keys with `comparer`.
    pub fn sort_by_with<K, S, C>(&self, key_selector: S, comparer: C) -> OrderedSequence<'a, T>
    where
        S: Fn(&T) -> K + 'a,
        C: Fn(&K, &K) -> std::cmp::Ordering + 'a,
    {
        let comparer = compare::key_comparer(Dir::Asc, key_selector, comparer);
        OrderedSequence::new(self.clone(), comparer)
    }

    /// Sorts elements by key, descending.
    pub fn sort_by_descending<K, S>(&self, key_selector: S) -> OrderedSequence<'a, T>
    where
        K: PartialOrd + 'a,
        S: Fn(&T) -> K + 'a,
    {
        self.sort_by_descending_with(key_selector, default_compare)
    }

    /// Sorts elements by key, descending, comparing keys with `comparer`.
    pub fn sort_by_descending_with<K, S, C>(
        &self,
        key_selector: S,
        comparer: C,
    ) -> OrderedSequence<'a, T>
    where
        S: Fn(&T) -> K + 'a,
        C: Fn(&K, &K) -> std::cmp::Ordering + 'a,
    {
        let comparer = compare::key_comparer(Dir::Desc, key_selector, comparer);
        OrderedSequence::new(self.clone(), comparer)
    }

    /// Sorts records by the value of a named field.
    pub fn sort_by_field(&self, name: &str, dir: Dir) -> OrderedSequence<'a, T>
    where
        T: Record,
    {
        let comparer = compare::key_comparer(dir, field_selector(name), compare_json);
        OrderedSequence::new(self.clone(), comparer)
    }

    // ========================================================================
    // Consuming
    // ========================================================================

    /// Returns `true` if `predicate` holds for every element.
    pub fn every<P>(&self, mut predicate: P) -> bool
    where
        P: FnMut(&T) -> bool,
    {
        self.iter().all(|item| predicate(&item))
    }

    /// Returns `true` if `predicate` holds for some element.
    pub fn some<P>(&self, mut predicate: P) -> bool
    where
        P: FnMut(&T) -> bool,
    {
        self.iter().any(|item| predicate(&item))
    }

    /// Returns `true` if every element is truthy.
    pub fn every_truthy(&self) -> bool
    where
        T: Truthy,
    {
        self.iter().all(|item| item.is_truthy())
    }

    /// Returns `true` if some element is truthy.
    pub fn some_truthy(&self) -> bool
    where
        T: Truthy,
    {
        self.iter().any(|item| item.is_truthy())
    }

    /// Returns the first element matching `predicate`.
    pub fn find<P>(&self, mut predicate: P) -> Option<T>
    where
        P: FnMut(&T) -> bool,
    {
        self.iter().find(|item| predicate(item))
    }

    /// Returns the first element.
    pub fn first(&self) -> Option<T> {
        self.iter().next()
    }

    /// Returns the last element, consuming the whole sequence.
    pub fn last(&self) -> Option<T> {
        self.iter().last()
    }

    /// Returns `true` if some element equals `value`.
    pub fn includes(&self, value: &T) -> bool
    where
        T: PartialEq,
    {
        self.iter().any(|item| item == *value)
    }

    /// Returns `true` if the sequence has no elements.
    pub fn is_empty(&self) -> bool {
        !self.some(|_| true)
    }

    /// Calls `callback` on each element in order.
    pub fn for_each<F>(&self, callback: F)
    where
        F: FnMut(T),
    {
        self.iter().for_each(callback);
    }

    /// Left fold starting from `seed`.
    pub fn reduce<A, F>(&self, callback: F, seed: A) -> A
    where
        F: FnMut(A, T) -> A,
    {
        self.iter().fold(seed, callback)
    }

    /// Returns the smallest element; the first one wins ties.
    pub fn min(&self) -> Option<T>
    where
        T: PartialOrd,
    {
        let mut iter = self.iter();
        let first = iter.next()?;
        Some(iter.fold(first, |min, item| if item < min { item } else { min }))
    }

    /// Returns the largest element; the first one wins ties.
    pub fn max(&self) -> Option<T>
    where
        T: PartialOrd,
    {
        let mut iter = self.iter();
        let first = iter.next()?;
        Some(iter.fold(first, |max, item| if item > max { item } else { max }))
    }

    /// Sums the elements.
    ///
    /// Numbers add up; once a text summand appears the total turns into
    /// text and the rest are appended. An empty sequence sums to `0`.
    ///
    /// ```
    /// use lazyseq::Total;
    ///
    /// assert_eq!(lazyseq::from(vec![1, 2, 3]).sum(), Total::from(6));
    /// assert_eq!(lazyseq::from(vec!["a", "b"]).sum(), Total::from("ab"));
    /// assert_eq!(lazyseq::from(Vec::<&str>::new()).sum(), Total::from(0));
    /// ```
    pub fn sum(&self) -> Total
    where
        T: Summand,
    {
        total(self.iter())
    }

    /// Sums `selector(element)` over the elements.
    pub fn sum_by<S, F>(&self, mut selector: F) -> Total
    where
        S: Summand,
        F: FnMut(&T) -> S,
    {
        total(self.iter().map(|item| selector(&item)))
    }

    /// Collects the elements into a new vector.
    pub fn to_vec(&self) -> Vec<T> {
        self.iter().collect()
    }

    /// Collects into a map keyed by `key_selector(element)`.
    ///
    /// A later element overwrites an earlier one with the same key.
    pub fn to_map<K, S>(&self, mut key_selector: S) -> HashMap<K, T>
    where
        K: Eq + Hash,
        S: FnMut(&T) -> K,
    {
        self.iter().map(|item| (key_selector(&item), item)).collect()
    }

    /// Collects `element_selector(element)` into a map keyed by
    /// `key_selector(element)`.
    pub fn to_map_with<K, V, S, M>(
        &self,
        mut key_selector: S,
        mut element_selector: M,
    ) -> HashMap<K, V>
    where
        K: Eq + Hash,
        S: FnMut(&T) -> K,
        M: FnMut(T) -> V,
    {
        self.iter()
            .map(|item| (key_selector(&item), element_selector(item)))
            .collect()
    }

    /// Collects into a JSON object keyed by `key_selector(element)`.
    ///
    /// Fails if a key is not string- or number-like, or an element does not
    /// serialize.
    pub fn to_object<K, S>(&self, key_selector: S) -> Result<Map<String, Value>>
    where
        T: Serialize,
        K: ObjectKey,
        S: FnMut(&T) -> K,
    {
        self.to_object_with(key_selector, |item| item)
    }

    /// Collects `element_selector(element)` into a JSON object keyed by
    /// `key_selector(element)`.
    pub fn to_object_with<K, V, S, M>(
        &self,
        mut key_selector: S,
        mut element_selector: M,
    ) -> Result<Map<String, Value>>
    where
        K: ObjectKey,
        V: Serialize,
        S: FnMut(&T) -> K,
        M: FnMut(T) -> V,
    {
        let mut object = Map::new();
        for item in self.iter() {
            let key = key_selector(&item).object_key()?;
            let value = serde_json::to_value(element_selector(item))?;
            object.insert(key, value);
        }
        Ok(object)
    }

    /// Collects into a set.
    pub fn to_set(&self) -> HashSet<T>
    where
        T: Eq + Hash,
    {
        self.iter().collect()
    }

    /// Joins the elements' display forms with `separator`.
    pub fn join(&self, separator: &str) -> String
    where
        T: fmt::Display,
    {
        let mut joined = String::new();
        for (index, item) in self.iter().enumerate() {
            if index > 0 {
                joined.push_str(separator);
            }
            joined.push_str(&item.to_string());
        }
        joined
    }
}

/// Reads a named field, `null` when absent.
pub(crate) fn field_selector<T: Record>(name: &str) -> impl Fn(&T) -> Value {
    let name = name.to_string();
    move |item: &T| item.field(&name).unwrap_or(Value::Null)
}

fn total<S: Summand>(mut summands: impl Iterator<Item = S>) -> Total {
    let Some(first) = summands.next() else {
        return Total::zero();
    };
    summands.fold(first.to_total(), |total, summand| total.combine(summand.to_total()))
}

/// Joins the elements with `,`.
impl<'a, T: fmt::Display + 'a> fmt::Display for Sequence<'a, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.join(","))
    }
}

impl<'a, T: 'a> IntoIterator for Sequence<'a, T> {
    type Item = T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<'a, T: 'a> IntoIterator for &Sequence<'a, T> {
    type Item = T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

/// Buffers the collected elements; every pass clones them out again.
impl<'a, T: Clone + 'a> FromIterator<T> for Sequence<'a, T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        crate::from(iter.into_iter().collect::<Vec<T>>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::Cell;

    #[test]
    fn chaining_touches_nothing() {
        let calls = Cell::new(0);
        let seq = Sequence::new(|| {
            calls.set(calls.get() + 1);
            vec![3, 1, 2]
        });

        let chained = seq.filter(|n| *n > 0).map(|n| n * 2).reverse().sort();
        assert_eq!(calls.get(), 0);
        assert_eq!(chained.to_vec(), vec![2, 4, 6]);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn clone_shares_producer() {
        let seq = crate::from(vec![1, 2, 3]);
        let copy = seq.clone();
        assert!(Sequence::ptr_eq(&seq, &copy));
        assert!(!Sequence::ptr_eq(&seq, &seq.map(|n| n)));
    }

    #[test]
    fn empty_sequence_terminals() {
        let seq = Sequence::<i32>::empty();
        assert!(seq.is_empty());
        assert_eq!(seq.first(), None);
        assert_eq!(seq.last(), None);
        assert_eq!(seq.min(), None);
        assert_eq!(seq.max(), None);
        assert_eq!(seq.sum(), Total::from(0));
        assert!(seq.every(|_| false));
        assert!(!seq.some(|_| true));
        assert_eq!(seq.to_string(), "");
    }

    #[test]
    fn min_max_keep_first_of_ties() {
        let seq = crate::from(vec![(2, 'a'), (1, 'b'), (2, 'c'), (1, 'd')]);
        let by_first = seq.map(|(n, c)| Tagged(n, c));
        assert_eq!(by_first.min(), Some(Tagged(1, 'b')));
        assert_eq!(by_first.max(), Some(Tagged(2, 'a')));
    }

    #[derive(Debug, PartialEq)]
    struct Tagged(i32, char);

    impl PartialOrd for Tagged {
        fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
            self.0.partial_cmp(&other.0)
        }
    }

    #[test]
    fn sum_switches_to_text() {
        let mixed = crate::from(vec![json!(1), json!(2), json!("x"), json!(3)]);
        assert_eq!(mixed.sum(), Total::from("3x3"));
    }

    #[test]
    fn sum_by_selector() {
        let seq = crate::from(vec!["a", "bb", "ccc"]);
        assert_eq!(seq.sum_by(|s| s.len()), Total::from(6usize));
    }

    #[test]
    fn join_and_display() {
        let seq = crate::from(vec![1, 2, 3]);
        assert_eq!(seq.join(" - "), "1 - 2 - 3");
        assert_eq!(seq.to_string(), "1,2,3");
    }

    #[test]
    fn to_object_rejects_structured_keys() {
        let seq = crate::from(vec![json!({"id": [1]})]);
        let err = seq.to_object(|v| v["id"].clone()).unwrap_err();
        assert!(err.to_string().contains("array"));
    }

    #[test]
    fn to_object_with_numeric_keys() {
        let seq = crate::from(vec![(1, "one"), (2, "two")]);
        let object = seq.to_object_with(|(n, _)| *n, |(_, name)| name).unwrap();
        assert_eq!(Value::Object(object), json!({"1": "one", "2": "two"}));
    }

    #[test]
    fn collect_into_sequence() {
        let seq: Sequence<'_, i32> = (1..=3).collect();
        assert_eq!(seq.to_vec(), vec![1, 2, 3]);
        assert_eq!(seq.to_vec(), vec![1, 2, 3]);
    }
}
