//! Comparison-function factory.
//!
//! Provides [`Dir`] for sort direction, the natural-order
//! [`default_compare`], and builders that turn key selectors and key
//! comparers into element [`Comparer`]s, plus [`chain`] for secondary keys.

use std::cmp::Ordering;
use std::rc::Rc;

use serde_json::Value;

use crate::value::Number;

/// Shared element comparison function.
pub type Comparer<'a, T> = Rc<dyn Fn(&T, &T) -> Ordering + 'a>;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Dir {
    /// Ascending order (smallest first).
    #[default]
    Asc,
    /// Descending order (largest first).
    Desc,
}

impl Dir {
    /// Returns `true` if this is ascending order.
    pub fn is_asc(self) -> bool {
        matches!(self, Dir::Asc)
    }

    /// Returns `true` if this is descending order.
    pub fn is_desc(self) -> bool {
        matches!(self, Dir::Desc)
    }

    /// Runs `compare` with the operands in this direction's order.
    ///
    /// `Desc` swaps the operands instead of reversing the result, so equal
    /// elements stay equal and a stable sort keeps them in input order.
    pub fn compare<K, C>(self, a: &K, b: &K, compare: C) -> Ordering
    where
        K: ?Sized,
        C: Fn(&K, &K) -> Ordering,
    {
        match self {
            Dir::Asc => compare(a, b),
            Dir::Desc => compare(b, a),
        }
    }

    /// Returns the display name of this direction.
    pub fn as_str(self) -> &'static str {
        match self {
            Dir::Asc => "asc",
            Dir::Desc => "desc",
        }
    }
}

impl std::fmt::Display for Dir {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Natural ordering over `PartialOrd`, made total.
///
/// Comparable values order as `PartialOrd` says. A value that is not
/// comparable with itself (such as `NaN`) sorts after every comparable value
/// and equal to other such values.
pub fn default_compare<K: PartialOrd + ?Sized>(a: &K, b: &K) -> Ordering {
    if let Some(ordering) = a.partial_cmp(b) {
        return ordering;
    }
    let a_unordered = a.partial_cmp(a).is_none();
    let b_unordered = b.partial_cmp(b).is_none();
    match (a_unordered, b_unordered) {
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        _ => Ordering::Equal,
    }
}

/// Builds a comparer that orders elements by their natural ordering.
pub fn natural<'a, T: PartialOrd + 'a>(dir: Dir) -> Comparer<'a, T> {
    Rc::new(move |a: &T, b: &T| dir.compare(a, b, default_compare))
}

/// Builds a comparer that orders elements by `comparer(key(a), key(b))`.
pub fn key_comparer<'a, T, K, S, C>(dir: Dir, key_selector: S, comparer: C) -> Comparer<'a, T>
where
    T: 'a,
    S: Fn(&T) -> K + 'a,
    C: Fn(&K, &K) -> Ordering + 'a,
{
    Rc::new(move |a: &T, b: &T| {
        let key_a = key_selector(a);
        let key_b = key_selector(b);
        dir.compare(&key_a, &key_b, &comparer)
    })
}

/// Composes two comparers lexicographically.
///
/// Ties under `primary` are broken by `secondary`; ties under both stay
/// `Equal`.
pub fn chain<'a, T: 'a>(primary: Comparer<'a, T>, secondary: Comparer<'a, T>) -> Comparer<'a, T> {
    Rc::new(move |a: &T, b: &T| match primary(a, b) {
        Ordering::Equal => secondary(a, b),
        other => other,
    })
}

/// Compares two JSON values for field-based sorting.
///
/// Values of the same kind compare naturally (numbers across their integer
/// and float forms, arrays element by element, objects all equal). Values
/// of different kinds order by kind: booleans, numbers, strings, arrays,
/// objects, and `null` last.
pub fn compare_json(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::String(a), Value::String(b)) => a.cmp(b),
        (Value::Number(a), Value::Number(b)) => Number::from(a)
            .compare(Number::from(b))
            .unwrap_or(Ordering::Equal),
        (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
        (Value::Array(a), Value::Array(b)) => a
            .iter()
            .zip(b.iter())
            .map(|(x, y)| compare_json(x, y))
            .find(|ordering| ordering.is_ne())
            .unwrap_or_else(|| a.len().cmp(&b.len())),
        _ => kind_rank(a).cmp(&kind_rank(b)),
    }
}

fn kind_rank(value: &Value) -> u8 {
    match value {
        Value::Bool(_) => 0,
        Value::Number(_) => 1,
        Value::String(_) => 2,
        Value::Array(_) => 3,
        Value::Object(_) => 4,
        Value::Null => 5,
    }
}
