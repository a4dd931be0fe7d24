//! Pipeline stages.
//!
//! Each stage takes an upstream [`Sequence`] and returns a new one whose
//! producer wraps the upstream's. Nothing is pulled until the returned
//! sequence is iterated, and every iteration starts from scratch: buffers
//! and caches live inside the iterator, never on the stage.
//!
//! Stages that must see the whole upstream before yielding (reverse, sort,
//! group) defer that work until the first element is requested.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::hash::Hash;
use std::rc::Rc;

use crate::compare::Comparer;
use crate::key::{Canonical, GroupKey, Grouping};
use crate::sequence::Sequence;

/// Iterator that runs `build` on the first call to `next`.
struct Deferred<F, I> {
    build: Option<F>,
    items: Option<I>,
}

fn deferred<F, I>(build: F) -> Deferred<F, I>
where
    F: FnOnce() -> I,
    I: Iterator,
{
    Deferred {
        build: Some(build),
        items: None,
    }
}

impl<F, I> Iterator for Deferred<F, I>
where
    F: FnOnce() -> I,
    I: Iterator,
{
    type Item = I::Item;

    fn next(&mut self) -> Option<I::Item> {
        if let Some(build) = self.build.take() {
            self.items = Some(build());
        }
        self.items.as_mut()?.next()
    }
}

pub(crate) fn concat<'a, T: 'a>(
    source: &Sequence<'a, T>,
    others: Vec<Sequence<'a, T>>,
) -> Sequence<'a, T> {
    let source = source.clone();
    Sequence::new(move || source.iter().chain(others.clone().into_iter().flatten()))
}

pub(crate) fn prepend<'a, T: 'a>(
    source: &Sequence<'a, T>,
    others: Vec<Sequence<'a, T>>,
) -> Sequence<'a, T> {
    let source = source.clone();
    Sequence::new(move || others.clone().into_iter().flatten().chain(source.iter()))
}

pub(crate) fn distinct<'a, T>(source: &Sequence<'a, T>) -> Sequence<'a, T>
where
    T: Eq + Hash + Clone + 'a,
{
    let source = source.clone();
    Sequence::new(move || {
        let mut seen = HashSet::new();
        source.iter().filter(move |item| seen.insert(item.clone()))
    })
}

pub(crate) fn filter<'a, T, P>(source: &Sequence<'a, T>, predicate: P) -> Sequence<'a, T>
where
    T: 'a,
    P: Fn(&T) -> bool + 'a,
{
    let source = source.clone();
    let predicate = Rc::new(predicate);
    Sequence::new(move || {
        let predicate = Rc::clone(&predicate);
        source.iter().filter(move |item| predicate(item))
    })
}

pub(crate) fn map<'a, T, U, F>(source: &Sequence<'a, T>, mapper: F) -> Sequence<'a, U>
where
    T: 'a,
    U: 'a,
    F: Fn(T) -> U + 'a,
{
    let source = source.clone();
    let mapper = Rc::new(mapper);
    Sequence::new(move || {
        let mapper = Rc::clone(&mapper);
        source.iter().map(move |item| mapper(item))
    })
}

pub(crate) fn flat_map<'a, T, U, I, F>(source: &Sequence<'a, T>, mapper: F) -> Sequence<'a, U>
where
    T: 'a,
    U: 'a,
    I: IntoIterator<Item = U> + 'a,
    I::IntoIter: 'a,
    F: Fn(T) -> I + 'a,
{
    let source = source.clone();
    let mapper = Rc::new(mapper);
    Sequence::new(move || {
        let mapper = Rc::clone(&mapper);
        source.iter().flat_map(move |item| mapper(item))
    })
}

pub(crate) fn reverse<'a, T: 'a>(source: &Sequence<'a, T>) -> Sequence<'a, T> {
    let source = source.clone();
    Sequence::new(move || {
        let source = source.clone();
        deferred(move || {
            let items: Vec<T> = source.iter().collect();
            tracing::trace!(buffered = items.len(), "reverse buffered upstream");
            items.into_iter().rev()
        })
    })
}

pub(crate) fn skip<'a, T: 'a>(source: &Sequence<'a, T>, count: usize) -> Sequence<'a, T> {
    let source = source.clone();
    Sequence::new(move || source.iter().skip(count))
}

pub(crate) fn skip_while<'a, T, P>(source: &Sequence<'a, T>, predicate: P) -> Sequence<'a, T>
where
    T: 'a,
    P: Fn(&T) -> bool + 'a,
{
    let source = source.clone();
    let predicate = Rc::new(predicate);
    Sequence::new(move || {
        let predicate = Rc::clone(&predicate);
        source.iter().skip_while(move |item| predicate(item))
    })
}

/// Stops after `count` elements without pulling the next one.
pub(crate) fn take<'a, T: 'a>(source: &Sequence<'a, T>, count: usize) -> Sequence<'a, T> {
    let source = source.clone();
    Sequence::new(move || source.iter().take(count))
}

pub(crate) fn take_while<'a, T, P>(source: &Sequence<'a, T>, predicate: P) -> Sequence<'a, T>
where
    T: 'a,
    P: Fn(&T) -> bool + 'a,
{
    let source = source.clone();
    let predicate = Rc::new(predicate);
    Sequence::new(move || {
        let predicate = Rc::clone(&predicate);
        source.iter().take_while(move |item| predicate(item))
    })
}

/// Drops every element equal to one of `items`.
///
/// The exclusion set is rebuilt from `items` on each iteration, when the
/// first element is requested.
pub(crate) fn without<'a, T>(source: &Sequence<'a, T>, items: Sequence<'a, T>) -> Sequence<'a, T>
where
    T: Eq + Hash + 'a,
{
    let source = source.clone();
    Sequence::new(move || {
        let source = source.clone();
        let items = items.clone();
        deferred(move || {
            let excluded: HashSet<T> = items.iter().collect();
            source.iter().filter(move |item| !excluded.contains(item))
        })
    })
}

/// Drops every element that `matches` any of `items`.
///
/// `items` is rescanned for each candidate, but an element already found
/// excluded is remembered for the rest of the iteration.
pub(crate) fn without_by<'a, T, P>(
    source: &Sequence<'a, T>,
    items: Sequence<'a, T>,
    matches: P,
) -> Sequence<'a, T>
where
    T: Eq + Hash + Clone + 'a,
    P: Fn(&T, &T) -> bool + 'a,
{
    let source = source.clone();
    let matches = Rc::new(matches);
    Sequence::new(move || {
        let items = items.clone();
        let matches = Rc::clone(&matches);
        let mut excluded: HashSet<T> = HashSet::new();
        source.iter().filter(move |item| {
            if excluded.contains(item) {
                return false;
            }
            if items.iter().any(|other| matches(item, &other)) {
                excluded.insert(item.clone());
                return false;
            }
            true
        })
    })
}

/// Stable sort of the whole upstream under `comparer`.
pub(crate) fn sort_by<'a, T: 'a>(
    source: &Sequence<'a, T>,
    comparer: Comparer<'a, T>,
) -> Sequence<'a, T> {
    let source = source.clone();
    Sequence::new(move || {
        let source = source.clone();
        let comparer = Rc::clone(&comparer);
        deferred(move || {
            let mut items: Vec<T> = source.iter().collect();
            items.sort_by(|a, b| comparer(a, b));
            tracing::trace!(sorted = items.len(), "sort buffered upstream");
            items.into_iter()
        })
    })
}

/// Buckets the upstream by key, in order of first occurrence.
pub(crate) fn group_by<'a, T, K, E, S, M>(
    source: &Sequence<'a, T>,
    key_selector: S,
    element_selector: M,
) -> Sequence<'a, Grouping<K, E>>
where
    T: 'a,
    K: GroupKey + 'a,
    E: 'a,
    S: Fn(&T) -> K + 'a,
    M: Fn(T) -> E + 'a,
{
    let source = source.clone();
    let selectors = Rc::new((key_selector, element_selector));
    Sequence::new(move || {
        let source = source.clone();
        let selectors = Rc::clone(&selectors);
        deferred(move || {
            let (key_selector, element_selector) = &*selectors;
            let mut index: HashMap<Canonical, usize> = HashMap::new();
            let mut groups: Vec<(K, Vec<E>)> = Vec::new();
            for item in source.iter() {
                let key = key_selector(&item);
                let slot = match index.entry(key.canonical()) {
                    Entry::Occupied(entry) => *entry.get(),
                    Entry::Vacant(entry) => {
                        groups.push((key, Vec::new()));
                        *entry.insert(groups.len() - 1)
                    }
                };
                groups[slot].1.push(element_selector(item));
            }
            tracing::trace!(groups = groups.len(), "group_by buffered upstream");
            groups
                .into_iter()
                .map(|(key, items)| Grouping::new(key, items))
        })
    })
}
