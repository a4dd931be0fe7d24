//! Procedural macros for lazyseq.
//!
//! # Derive Macros
//!
//! - [`Record`] - Expose a struct's named fields to field-based sequence
//!   operations

mod record;

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

/// Derives the `Record` trait for structs with named fields.
///
/// Every named field is visible unless marked `#[record(skip)]`. Field
/// values are converted with `serde_json::to_value`, so each visible field
/// type must implement `serde::Serialize`.
///
/// # Field Attributes
///
/// | Attribute | Description |
/// |-----------|-------------|
/// | `skip` | Hide this field from `field`, `entries` and `pick` |
/// | `rename = "..."` | Expose the field under a different name |
///
/// # Generated Code
///
/// 1. Field name constants (e.g., `Person::NAME`, `Person::CREATED_AT`)
/// 2. Implementation of `Record::field()` and `Record::entries()`
///
/// # Example
///
/// ```ignore
/// use lazyseq::Record;
///
/// #[derive(Record, Clone)]
/// struct Person {
///     name: String,
///     #[record(rename = "years")]
///     age: u32,
///     #[record(skip)]
///     password_hash: String,
/// }
///
/// let people = lazyseq::from(vec![
///     Person { name: "Lisa".into(), age: 31, password_hash: "x".into() },
/// ]);
///
/// let picked = people.pick(&[Person::NAME, Person::YEARS]).to_vec();
/// ```
#[proc_macro_derive(Record, attributes(record))]
pub fn record_derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    record::record_derive_impl(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
