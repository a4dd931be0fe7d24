//! Grouping keys and their canonical form.
//!
//! [`group_by`](crate::Sequence::group_by) buckets elements by the
//! [`Canonical`] form of their key. Scalars map straight onto a canonical
//! variant. Structured JSON keys are canonicalized by compact serialization,
//! so two objects with the same properties in the same insertion order share
//! a group. The same properties in a different order do not.

use serde::Serialize;
use serde_json::Value;

/// Hashable canonical form of a grouping key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Canonical {
    /// Absent key (`None`, JSON `null`).
    Null,
    /// Boolean key.
    Bool(bool),
    /// Signed integer key, also used for integral floats that fit.
    Int(i64),
    /// Unsigned integer key above `i64::MAX`, also used for integral floats
    /// in that range.
    UInt(u64),
    /// Float key as bits, with `-0.0` and all NaNs folded together.
    Float(u64),
    /// Character key.
    Char(char),
    /// String key.
    Str(String),
    /// Tuple or vector key, element by element.
    Composite(Vec<Canonical>),
    /// Compact serialization of a structured key.
    Serialized(String),
}

impl Canonical {
    /// Canonicalizes a float key.
    pub fn float(f: f64) -> Self {
        if f.is_nan() {
            return Canonical::Float(f64::NAN.to_bits());
        }
        if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
            return Canonical::Int(f as i64);
        }
        if f.fract() == 0.0 && f > 0.0 && f < u64::MAX as f64 {
            return Canonical::UInt(f as u64);
        }
        // 0.0 and -0.0 are integral, so only non-zero floats reach this point.
        Canonical::Float(f.to_bits())
    }

    /// Canonicalizes an unsigned integer key.
    pub fn unsigned(n: u64) -> Self {
        i64::try_from(n)
            .map(Canonical::Int)
            .unwrap_or(Canonical::UInt(n))
    }

    /// Canonicalizes a structured JSON value by compact serialization.
    pub fn serialized(value: &Value) -> Self {
        Canonical::Serialized(value.to_string())
    }
}

/// Types usable as [`group_by`](crate::Sequence::group_by) keys.
///
/// Implement this for your own key types by mapping them onto a
/// [`Canonical`]: two keys land in the same group exactly when their
/// canonical forms are equal.
pub trait GroupKey {
    /// Returns the canonical form of this key.
    fn canonical(&self) -> Canonical;
}

impl<K: GroupKey + ?Sized> GroupKey for &K {
    fn canonical(&self) -> Canonical {
        (**self).canonical()
    }
}

macro_rules! signed_key {
    ($($ty:ty),*) => {
        $(
            impl GroupKey for $ty {
                fn canonical(&self) -> Canonical {
                    Canonical::Int(*self as i64)
                }
            }
        )*
    };
}

macro_rules! unsigned_key {
    ($($ty:ty),*) => {
        $(
            impl GroupKey for $ty {
                fn canonical(&self) -> Canonical {
                    Canonical::unsigned(*self as u64)
                }
            }
        )*
    };
}

signed_key!(i8, i16, i32, i64, isize);
unsigned_key!(u8, u16, u32, u64, usize);

impl GroupKey for f32 {
    fn canonical(&self) -> Canonical {
        Canonical::float(*self as f64)
    }
}

impl GroupKey for f64 {
    fn canonical(&self) -> Canonical {
        Canonical::float(*self)
    }
}

impl GroupKey for bool {
    fn canonical(&self) -> Canonical {
        Canonical::Bool(*self)
    }
}

impl GroupKey for char {
    fn canonical(&self) -> Canonical {
        Canonical::Char(*self)
    }
}

impl GroupKey for str {
    fn canonical(&self) -> Canonical {
        Canonical::Str(self.to_string())
    }
}

impl GroupKey for String {
    fn canonical(&self) -> Canonical {
        Canonical::Str(self.clone())
    }
}

impl GroupKey for () {
    fn canonical(&self) -> Canonical {
        Canonical::Null
    }
}

impl<K: GroupKey> GroupKey for Option<K> {
    fn canonical(&self) -> Canonical {
        match self {
            Some(key) => key.canonical(),
            None => Canonical::Null,
        }
    }
}

impl<K: GroupKey> GroupKey for Vec<K> {
    fn canonical(&self) -> Canonical {
        Canonical::Composite(self.iter().map(GroupKey::canonical).collect())
    }
}

macro_rules! tuple_key {
    ($($name:ident),+) => {
        impl<$($name: GroupKey),+> GroupKey for ($($name,)+) {
            #[allow(non_snake_case)]
            fn canonical(&self) -> Canonical {
                let ($($name,)+) = self;
                Canonical::Composite(vec![$($name.canonical()),+])
            }
        }
    };
}

tuple_key!(A, B);
tuple_key!(A, B, C);
tuple_key!(A, B, C, D);

impl GroupKey for Value {
    fn canonical(&self) -> Canonical {
        match self {
            Value::Null => Canonical::Null,
            Value::Bool(b) => Canonical::Bool(*b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Canonical::Int(i)
                } else if let Some(u) = n.as_u64() {
                    Canonical::UInt(u)
                } else {
                    Canonical::float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            Value::String(s) => Canonical::Str(s.clone()),
            Value::Array(_) | Value::Object(_) => Canonical::serialized(self),
        }
    }
}

/// A group of elements sharing one key, produced by
/// [`group_by`](crate::Sequence::group_by).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Grouping<K, E> {
    key: K,
    items: Vec<E>,
}

impl<K, E> Grouping<K, E> {
    pub(crate) fn new(key: K, items: Vec<E>) -> Self {
        Grouping { key, items }
    }

    /// The key of the first element that opened this group.
    pub fn key(&self) -> &K {
        &self.key
    }

    /// The grouped elements, in source order.
    pub fn items(&self) -> &[E] {
        &self.items
    }

    /// Splits the grouping into its key and items.
    pub fn into_parts(self) -> (K, Vec<E>) {
        (self.key, self.items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn integers_share_canonical_form() {
        assert_eq!(1u8.canonical(), 1i64.canonical());
        assert_eq!(1.0f64.canonical(), 1i32.canonical());
        assert_eq!(u64::MAX.canonical(), Canonical::UInt(u64::MAX));
    }

    #[test]
    fn large_integral_floats_match_unsigned_keys() {
        assert_eq!(1e19f64.canonical(), 10_000_000_000_000_000_000u64.canonical());
        assert_eq!(
            json!(1e19f64).canonical(),
            json!(10_000_000_000_000_000_000u64).canonical()
        );
        assert!(matches!(1e20f64.canonical(), Canonical::Float(_)));
    }

    #[test]
    fn floats_fold_zero_and_nan() {
        assert_eq!((-0.0f64).canonical(), 0.0f64.canonical());
        assert_eq!(f64::NAN.canonical(), (-f64::NAN).canonical());
        assert_ne!(0.5f64.canonical(), 0.25f64.canonical());
    }

    #[test]
    fn strings_and_options() {
        assert_eq!("a".canonical(), String::from("a").canonical());
        assert_eq!(None::<i32>.canonical(), Canonical::Null);
        assert_eq!(Some(3i32).canonical(), 3i32.canonical());
    }

    #[test]
    fn tuples_are_composite() {
        assert_eq!(
            ("M", 30i32).canonical(),
            Canonical::Composite(vec![Canonical::Str("M".into()), Canonical::Int(30)])
        );
        assert_ne!((1i32, 2i32).canonical(), (2i32, 1i32).canonical());
    }

    #[test]
    fn json_scalars_take_fast_path() {
        assert_eq!(json!("x").canonical(), Canonical::Str("x".into()));
        assert_eq!(json!(2).canonical(), 2i64.canonical());
        assert_eq!(json!(2.0).canonical(), 2i64.canonical());
        assert_eq!(json!(null).canonical(), Canonical::Null);
    }

    #[test]
    fn json_objects_serialize_in_insertion_order() {
        let a = json!({"a": 1, "b": 2});
        let b = json!({"a": 1, "b": 2});
        let reordered = json!({"b": 2, "a": 1});

        assert_eq!(a.canonical(), b.canonical());
        assert_ne!(a.canonical(), reordered.canonical());
    }

    #[test]
    fn grouping_accessors() {
        let grouping = Grouping::new("k", vec![1, 2]);
        assert_eq!(*grouping.key(), "k");
        assert_eq!(grouping.items(), &[1, 2]);
        assert_eq!(grouping.into_parts(), ("k", vec![1, 2]));
    }
}
