//! Turning things into sequences.
//!
//! [`from`] accepts anything implementing [`IntoSequence`]. Owned
//! collections are moved into a shared buffer and cloned out element by
//! element on each pass; borrowed collections and ranges are iterated
//! directly. Key-value maps yield `(key, value)` pairs and records yield
//! their visible `(name, value)` entries through [`Entries`]. A
//! [`Sequence`] passed to [`from`] comes back unchanged.

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::ops::{Range, RangeFrom, RangeInclusive};
use std::rc::Rc;

use serde_json::{Map, Value};

use crate::ordered::OrderedSequence;
use crate::record::Record;
use crate::sequence::Sequence;

/// Conversion into a [`Sequence`].
pub trait IntoSequence<'a> {
    /// Element type of the resulting sequence.
    type Item: 'a;

    /// Converts `self` into a sequence.
    fn into_sequence(self) -> Sequence<'a, Self::Item>;
}

/// Wraps `source` in a [`Sequence`].
///
/// ```
/// use std::collections::BTreeMap;
///
/// let scores = BTreeMap::from([("ann", 3), ("bob", 5)]);
/// let pairs = lazyseq::from(scores).to_vec();
/// assert_eq!(pairs, vec![("ann", 3), ("bob", 5)]);
/// ```
pub fn from<'a, S: IntoSequence<'a>>(source: S) -> Sequence<'a, S::Item> {
    source.into_sequence()
}

/// Builds a sequence from a factory called once per pass.
///
/// ```
/// let countdown = lazyseq::from_fn(|| (1..=3).rev());
/// assert_eq!(countdown.to_vec(), vec![3, 2, 1]);
/// assert_eq!(countdown.to_vec(), vec![3, 2, 1]);
/// ```
pub fn from_fn<'a, T, F, I>(factory: F) -> Sequence<'a, T>
where
    T: 'a,
    F: Fn() -> I + 'a,
    I: IntoIterator<Item = T>,
    I::IntoIter: 'a,
{
    Sequence::new(factory)
}

/// Wraps a one-shot iterator.
///
/// Only the first pass yields elements. It owns `iter` and drops it when
/// it ends, so every later pass is empty, even if the first one stopped
/// early.
///
/// ```
/// let lines = lazyseq::once(vec!["a", "b"].into_iter());
/// assert_eq!(lines.to_vec(), vec!["a", "b"]);
/// assert!(lines.is_empty());
/// ```
pub fn once<'a, I>(iter: I) -> Sequence<'a, I::Item>
where
    I: IntoIterator,
    I::Item: 'a,
    I::IntoIter: 'a,
{
    let iter = Rc::new(RefCell::new(Some(iter.into_iter())));
    Sequence::new(move || iter.borrow_mut().take().into_iter().flatten())
}

/// The visible `(name, value)` entries of a [`Record`], as a sequence.
///
/// Entries are read from the record on each pass.
#[derive(Debug, Clone)]
pub struct Entries<R>(pub R);

impl<'a, R: Record + 'a> IntoSequence<'a> for Entries<R> {
    type Item = (String, Value);

    fn into_sequence(self) -> Sequence<'a, (String, Value)> {
        Sequence::new(move || self.0.entries())
    }
}

/// Iterates a shared buffer by index, cloning each element out.
struct Shared<T> {
    items: Rc<[T]>,
    position: usize,
}

impl<T: Clone> Iterator for Shared<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        let item = self.items.get(self.position)?.clone();
        self.position += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.items.len().saturating_sub(self.position);
        (remaining, Some(remaining))
    }
}

fn shared<'a, T: Clone + 'a>(items: Rc<[T]>) -> Sequence<'a, T> {
    Sequence::new(move || Shared {
        items: Rc::clone(&items),
        position: 0,
    })
}

impl<'a, T: 'a> IntoSequence<'a> for Sequence<'a, T> {
    type Item = T;

    fn into_sequence(self) -> Sequence<'a, T> {
        self
    }
}

impl<'a, T: 'a> IntoSequence<'a> for OrderedSequence<'a, T> {
    type Item = T;

    fn into_sequence(self) -> Sequence<'a, T> {
        Sequence::from(self)
    }
}

impl<'a, T: Clone + 'a> IntoSequence<'a> for Vec<T> {
    type Item = T;

    fn into_sequence(self) -> Sequence<'a, T> {
        shared(self.into())
    }
}

impl<'a, T: Clone + 'a, const N: usize> IntoSequence<'a> for [T; N] {
    type Item = T;

    fn into_sequence(self) -> Sequence<'a, T> {
        shared(Vec::from(self).into())
    }
}

impl<'a, T: Clone + 'a> IntoSequence<'a> for VecDeque<T> {
    type Item = T;

    fn into_sequence(self) -> Sequence<'a, T> {
        shared(self.into_iter().collect())
    }
}

impl<'a, T: Clone + 'a> IntoSequence<'a> for HashSet<T> {
    type Item = T;

    fn into_sequence(self) -> Sequence<'a, T> {
        shared(self.into_iter().collect())
    }
}

impl<'a, T: Clone + 'a> IntoSequence<'a> for BTreeSet<T> {
    type Item = T;

    fn into_sequence(self) -> Sequence<'a, T> {
        shared(self.into_iter().collect())
    }
}

impl<'a, K: Clone + 'a, V: Clone + 'a> IntoSequence<'a> for HashMap<K, V> {
    type Item = (K, V);

    fn into_sequence(self) -> Sequence<'a, (K, V)> {
        shared(self.into_iter().collect())
    }
}

impl<'a, K: Clone + 'a, V: Clone + 'a> IntoSequence<'a> for BTreeMap<K, V> {
    type Item = (K, V);

    fn into_sequence(self) -> Sequence<'a, (K, V)> {
        shared(self.into_iter().collect())
    }
}

/// Object properties as `(name, value)` pairs, in insertion order.
impl<'a> IntoSequence<'a> for Map<String, Value> {
    type Item = (String, Value);

    fn into_sequence(self) -> Sequence<'a, (String, Value)> {
        shared(self.into_iter().collect())
    }
}

impl<'a, T> IntoSequence<'a> for &'a [T] {
    type Item = &'a T;

    fn into_sequence(self) -> Sequence<'a, &'a T> {
        Sequence::new(move || self.iter())
    }
}

impl<'a, T> IntoSequence<'a> for &'a Vec<T> {
    type Item = &'a T;

    fn into_sequence(self) -> Sequence<'a, &'a T> {
        self.as_slice().into_sequence()
    }
}

impl<'a, T> IntoSequence<'a> for &'a HashSet<T> {
    type Item = &'a T;

    fn into_sequence(self) -> Sequence<'a, &'a T> {
        Sequence::new(move || self.iter())
    }
}

impl<'a, T> IntoSequence<'a> for &'a BTreeSet<T> {
    type Item = &'a T;

    fn into_sequence(self) -> Sequence<'a, &'a T> {
        Sequence::new(move || self.iter())
    }
}

impl<'a, K, V> IntoSequence<'a> for &'a HashMap<K, V> {
    type Item = (&'a K, &'a V);

    fn into_sequence(self) -> Sequence<'a, (&'a K, &'a V)> {
        Sequence::new(move || self.iter())
    }
}

impl<'a, K, V> IntoSequence<'a> for &'a BTreeMap<K, V> {
    type Item = (&'a K, &'a V);

    fn into_sequence(self) -> Sequence<'a, (&'a K, &'a V)> {
        Sequence::new(move || self.iter())
    }
}

/// The characters of a string.
impl<'a> IntoSequence<'a> for &'a str {
    type Item = char;

    fn into_sequence(self) -> Sequence<'a, char> {
        Sequence::new(move || self.chars())
    }
}

impl<'a, A: 'a> IntoSequence<'a> for Range<A>
where
    Range<A>: Iterator<Item = A> + Clone,
{
    type Item = A;

    fn into_sequence(self) -> Sequence<'a, A> {
        Sequence::new(move || self.clone())
    }
}

impl<'a, A: 'a> IntoSequence<'a> for RangeInclusive<A>
where
    RangeInclusive<A>: Iterator<Item = A> + Clone,
{
    type Item = A;

    fn into_sequence(self) -> Sequence<'a, A> {
        Sequence::new(move || self.clone())
    }
}

/// Unbounded; pair with [`take`](Sequence::take) or a short-circuiting
/// terminal.
impl<'a, A: 'a> IntoSequence<'a> for RangeFrom<A>
where
    RangeFrom<A>: Iterator<Item = A> + Clone,
{
    type Item = A;

    fn into_sequence(self) -> Sequence<'a, A> {
        Sequence::new(move || self.clone())
    }
}

/// Builds a [`Sequence`] from a list of elements.
///
/// ```
/// let seq = lazyseq::seq![1, 2, 3];
/// assert_eq!(seq.to_vec(), vec![1, 2, 3]);
/// ```
#[macro_export]
macro_rules! seq {
    () => {
        $crate::Sequence::empty()
    };
    ($($item:expr),+ $(,)?) => {
        $crate::from(::std::vec![$($item),+])
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn sequence_passes_through() {
        let seq = from(vec![1, 2]);
        let again = from(seq.clone());
        assert!(Sequence::ptr_eq(&seq, &again));
    }

    #[test]
    fn owned_vec_is_reiterable() {
        let seq = from(vec![String::from("a"), String::from("b")]);
        assert_eq!(seq.to_vec(), vec!["a", "b"]);
        assert_eq!(seq.to_vec(), vec!["a", "b"]);
    }

    #[test]
    fn borrowed_slice_yields_references() {
        let items = vec![1, 2, 3];
        let seq = from(&items);
        assert_eq!(seq.map(|n| n * 2).to_vec(), vec![2, 4, 6]);
    }

    #[test]
    fn map_yields_pairs() {
        let object = json!({"b": 1, "a": 2});
        let Value::Object(map) = object else {
            unreachable!()
        };
        let pairs = from(map).to_vec();
        assert_eq!(
            pairs,
            vec![("b".to_string(), json!(1)), ("a".to_string(), json!(2))]
        );
    }

    #[test]
    fn entries_read_record() {
        let record = json!({"x": 1, "y": null});
        let entries = from(Entries(&record)).map(|(name, _)| name).to_vec();
        assert_eq!(entries, vec!["x", "y"]);
    }

    #[test]
    fn once_drains_on_first_pass() {
        let seq = once(vec![1, 2, 3]);
        assert_eq!(seq.take(2).to_vec(), vec![1, 2]);
        assert_eq!(seq.to_vec(), Vec::<i32>::new());
    }

    #[test]
    fn ranges_and_strings() {
        assert_eq!(from(0..3).to_vec(), vec![0, 1, 2]);
        assert_eq!(from(1..=2).to_vec(), vec![1, 2]);
        assert_eq!(from(5..).take(2).to_vec(), vec![5, 6]);
        assert_eq!(from("hi").to_vec(), vec!['h', 'i']);
    }

    #[test]
    fn seq_macro() {
        assert_eq!(crate::seq![1, 2, 3].to_vec(), vec![1, 2, 3]);
        let empty: Sequence<'_, u8> = crate::seq![];
        assert!(empty.is_empty());
    }
}
