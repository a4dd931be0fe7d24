//! Implementation of the `#[derive(Record)]` macro.
//!
//! Generates an implementation of `lazyseq::Record` plus field name
//! constants for use with `group_by_field`, `sort_by_field` and `pick`.

mod attrs;
mod derive;

pub use derive::record_derive_impl;
