//! Lazyseq - Lazy, chainable, re-iterable sequences.
//!
//! Lazyseq wraps any iterable source in a [`Sequence`] and exposes a fluent
//! chain of operators that defer all work until the sequence is consumed:
//!
//! - Streaming stages: filter, map, flat_map, take/skip (and their `_while`
//!   forms), concat, prepend, distinct, without
//! - Buffering stages: reverse, sort (stable, with secondary keys), group_by
//! - Terminals: to_vec, to_map, to_object, to_set, reduce, sum, min/max,
//!   first/last, find, every/some, includes, is_empty, join
//!
//! # Quick Start
//!
//! ```rust
//! use lazyseq::serde_json::Value;
//! use lazyseq::Record;
//!
//! #[derive(Record, Clone)]
//! struct Person {
//!     name: &'static str,
//!     gender: &'static str,
//!     age: u32,
//! }
//!
//! let people = lazyseq::from(vec![
//!     Person { name: "John", gender: "M", age: 20 },
//!     Person { name: "Jane", gender: "F", age: 30 },
//!     Person { name: "Tony", gender: "M", age: 30 },
//! ]);
//!
//! let names = people
//!     .filter(|p| p.age >= 20)
//!     .sort_by_descending(|p| p.age)
//!     .then_by(|p| p.name)
//!     .map(|p| p.name)
//!     .to_vec();
//! assert_eq!(names, vec!["Jane", "Tony", "John"]);
//!
//! let by_gender = people
//!     .group_by_field(Person::GENDER)
//!     .map(|g| (g.key().clone(), g.items().len()))
//!     .to_vec();
//! assert_eq!(by_gender, vec![(Value::from("M"), 2), (Value::from("F"), 1)]);
//! ```
//!
//! # Laziness and Re-iteration
//!
//! Building a chain never touches an element. Each consumption starts a new
//! pass that restarts every upstream stage from the source:
//!
//! ```text
//! from(source) ──► filter ──► sort ──► take(3)      (nothing runs)
//! .to_vec()    ──► pulls through take ──► sort buffers ──► filter ──► source
//! ```
//!
//! Streaming stages pull exactly what they need; [`Sequence::take`] never
//! requests the element after its last one, so infinite sources are fine:
//!
//! ```rust
//! let first_squares = lazyseq::from(1u64..).map(|n| n * n).take(4).to_vec();
//! assert_eq!(first_squares, vec![1, 4, 9, 16]);
//! ```
//!
//! # Equality
//!
//! | Operation | Equality used |
//! |-----------|---------------|
//! | `distinct`, `without`, `to_set` | `Eq + Hash` of the element |
//! | `includes` | `PartialEq` of the element |
//! | `group_by` | [`Canonical`] form of the key ([`GroupKey`]) |
//!
//! Wrap composite elements in [`Identity`] to compare them by reference.

extern crate self as lazyseq;

mod compare;
mod error;
mod identity;
mod key;
mod ordered;
mod record;
mod sequence;
mod source;
mod stage;
mod value;

// Re-export public API
pub use compare::{chain, compare_json, default_compare, key_comparer, natural, Comparer, Dir};
pub use error::{Result, SeqError};
pub use identity::Identity;
pub use key::{Canonical, GroupKey, Grouping};
pub use ordered::OrderedSequence;
pub use record::{field_value, Record};
pub use sequence::{Iter, Sequence};
pub use source::{from, from_fn, once, Entries, IntoSequence};
pub use value::{Number, ObjectKey, Summand, Total, Truthy};

pub use serde_json;

#[cfg(feature = "derive")]
pub use lazyseq_macros::Record;
