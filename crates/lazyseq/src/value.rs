//! Scalar value helpers used by the terminal operations.
//!
//! [`Number`] and [`Total`] back [`Sequence::sum`](crate::Sequence::sum),
//! [`Truthy`] supplies the default predicate for
//! [`every_truthy`](crate::Sequence::every_truthy) and
//! [`some_truthy`](crate::Sequence::some_truthy), and [`ObjectKey`] decides
//! which keys are accepted by [`to_object`](crate::Sequence::to_object).

use std::cmp::Ordering;
use std::fmt;
use std::ops::Add;

use serde_json::Value;

use crate::error::{Result, SeqError};

/// Numeric value supporting all common numeric types.
///
/// Numbers are stored in one of three variants to preserve precision:
/// - `I64` for signed integers
/// - `U64` for unsigned integers
/// - `F64` for floating point
///
/// Comparisons and additions between different variants are handled by
/// converting to the appropriate common type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    /// Signed 64-bit integer.
    I64(i64),
    /// Unsigned 64-bit integer.
    U64(u64),
    /// 64-bit floating point.
    F64(f64),
}

impl Number {
    /// Converts the number to f64.
    pub fn to_f64(self) -> f64 {
        match self {
            Number::I64(n) => n as f64,
            Number::U64(n) => n as f64,
            Number::F64(n) => n,
        }
    }

    /// Returns the value as `i64` when it is an integer that fits.
    pub fn as_i64(self) -> Option<i64> {
        match self {
            Number::I64(n) => Some(n),
            Number::U64(n) => i64::try_from(n).ok(),
            Number::F64(_) => None,
        }
    }

    /// Compares two numbers, handling mixed types.
    pub fn compare(self, other: Number) -> Option<Ordering> {
        match (self, other) {
            (Number::I64(a), Number::I64(b)) => Some(a.cmp(&b)),
            (Number::U64(a), Number::U64(b)) => Some(a.cmp(&b)),
            (Number::F64(a), Number::F64(b)) => a.partial_cmp(&b),
            _ => self.to_f64().partial_cmp(&other.to_f64()),
        }
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.compare(*other)
    }
}

/// Addition stays integral while the result fits. Overflow and any addition
/// involving a float produce `F64`.
impl Add for Number {
    type Output = Number;

    fn add(self, other: Number) -> Number {
        match (self, other) {
            (Number::U64(a), Number::U64(b)) => a
                .checked_add(b)
                .map(Number::U64)
                .unwrap_or_else(|| Number::F64(a as f64 + b as f64)),
            (Number::F64(_), _) | (_, Number::F64(_)) => {
                Number::F64(self.to_f64() + other.to_f64())
            }
            _ => match (self.as_i64(), other.as_i64()) {
                (Some(a), Some(b)) => a
                    .checked_add(b)
                    .map(Number::I64)
                    .unwrap_or_else(|| Number::F64(self.to_f64() + other.to_f64())),
                _ => Number::F64(self.to_f64() + other.to_f64()),
            },
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Number::I64(n) => write!(f, "{}", n),
            Number::U64(n) => write!(f, "{}", n),
            Number::F64(n) if n.is_nan() => f.write_str("NaN"),
            Number::F64(n) if n == f64::INFINITY => f.write_str("Infinity"),
            Number::F64(n) if n == f64::NEG_INFINITY => f.write_str("-Infinity"),
            Number::F64(n) if n != 0.0 && (n.abs() >= 1e21 || n.abs() < 1e-6) => {
                let formatted = format!("{:e}", n);
                match formatted.split_once('e') {
                    Some((mantissa, exp)) if !exp.starts_with('-') => {
                        write!(f, "{}e+{}", mantissa, exp)
                    }
                    _ => f.write_str(&formatted),
                }
            }
            // Display for f64 already drops the fraction of integral values.
            Number::F64(n) => write!(f, "{}", n),
        }
    }
}

macro_rules! number_from {
    ($variant:ident as $target:ty: $($source:ty),*) => {
        $(
            impl From<$source> for Number {
                fn from(n: $source) -> Self {
                    Number::$variant(n as $target)
                }
            }
        )*
    };
}

number_from!(I64 as i64: i8, i16, i32, i64, isize);
number_from!(U64 as u64: u8, u16, u32, u64, usize);
number_from!(F64 as f64: f32, f64);

impl From<&serde_json::Number> for Number {
    fn from(n: &serde_json::Number) -> Self {
        if let Some(i) = n.as_i64() {
            Number::I64(i)
        } else if let Some(u) = n.as_u64() {
            Number::U64(u)
        } else {
            Number::F64(n.as_f64().unwrap_or(f64::NAN))
        }
    }
}

/// Result of [`Sequence::sum`](crate::Sequence::sum).
///
/// Numeric summands add up arithmetically. As soon as a text summand shows
/// up (either side of the running total), everything from then on is joined
/// as text. Summing an empty sequence yields `Total::Number(Number::I64(0))`,
/// whatever the element type.
#[derive(Debug, Clone, PartialEq)]
pub enum Total {
    /// Arithmetic total.
    Number(Number),
    /// Concatenated text.
    Text(String),
}

impl Total {
    /// The total of an empty sequence.
    pub fn zero() -> Self {
        Total::Number(Number::I64(0))
    }

    /// Folds the next summand into this total.
    pub fn combine(self, next: Total) -> Total {
        match (self, next) {
            (Total::Number(a), Total::Number(b)) => Total::Number(a + b),
            (Total::Text(mut a), next) => {
                a.push_str(&next.to_string());
                Total::Text(a)
            }
            (acc, Total::Text(b)) => Total::Text(format!("{}{}", acc, b)),
        }
    }

    /// Returns the numeric total, if this is one.
    pub fn as_number(&self) -> Option<Number> {
        match self {
            Total::Number(n) => Some(*n),
            Total::Text(_) => None,
        }
    }

    /// Returns the text total, if this is one.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Total::Text(s) => Some(s),
            Total::Number(_) => None,
        }
    }
}

impl fmt::Display for Total {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Total::Number(n) => n.fmt(f),
            Total::Text(s) => f.write_str(s),
        }
    }
}

impl From<Number> for Total {
    fn from(n: Number) -> Self {
        Total::Number(n)
    }
}

macro_rules! total_from {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Total {
                fn from(n: $ty) -> Self {
                    Total::Number(Number::from(n))
                }
            }
        )*
    };
}

total_from!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

impl From<String> for Total {
    fn from(s: String) -> Self {
        Total::Text(s)
    }
}

impl From<&str> for Total {
    fn from(s: &str) -> Self {
        Total::Text(s.to_string())
    }
}

/// Types that can take part in [`Sequence::sum`](crate::Sequence::sum).
pub trait Summand {
    /// Converts the value into a summand.
    fn to_total(&self) -> Total;
}

impl<T: Summand + ?Sized> Summand for &T {
    fn to_total(&self) -> Total {
        (**self).to_total()
    }
}

macro_rules! numeric_summand {
    ($($ty:ty),*) => {
        $(
            impl Summand for $ty {
                fn to_total(&self) -> Total {
                    Total::Number(Number::from(*self))
                }
            }
        )*
    };
}

numeric_summand!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

impl Summand for Number {
    fn to_total(&self) -> Total {
        Total::Number(*self)
    }
}

impl Summand for str {
    fn to_total(&self) -> Total {
        Total::Text(self.to_string())
    }
}

impl Summand for String {
    fn to_total(&self) -> Total {
        Total::Text(self.clone())
    }
}

impl Summand for char {
    fn to_total(&self) -> Total {
        Total::Text(self.to_string())
    }
}

impl Summand for bool {
    fn to_total(&self) -> Total {
        Total::Text(self.to_string())
    }
}

impl Summand for Value {
    fn to_total(&self) -> Total {
        match self {
            Value::Number(n) => Total::Number(Number::from(n)),
            Value::String(s) => Total::Text(s.clone()),
            other => Total::Text(other.to_string()),
        }
    }
}

/// Truthiness used by the predicate-less `every`/`some` variants.
///
/// `false`, zero, `NaN`, the empty string, `None` and JSON `null` are falsy.
/// Everything else is truthy.
pub trait Truthy {
    /// Returns `true` if the value counts as true.
    fn is_truthy(&self) -> bool;
}

impl<T: Truthy + ?Sized> Truthy for &T {
    fn is_truthy(&self) -> bool {
        (**self).is_truthy()
    }
}

impl Truthy for bool {
    fn is_truthy(&self) -> bool {
        *self
    }
}

macro_rules! integer_truthy {
    ($($ty:ty),*) => {
        $(
            impl Truthy for $ty {
                fn is_truthy(&self) -> bool {
                    *self != 0
                }
            }
        )*
    };
}

integer_truthy!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl Truthy for f32 {
    fn is_truthy(&self) -> bool {
        *self != 0.0 && !self.is_nan()
    }
}

impl Truthy for f64 {
    fn is_truthy(&self) -> bool {
        *self != 0.0 && !self.is_nan()
    }
}

impl Truthy for str {
    fn is_truthy(&self) -> bool {
        !self.is_empty()
    }
}

impl Truthy for String {
    fn is_truthy(&self) -> bool {
        !self.is_empty()
    }
}

impl Truthy for char {
    fn is_truthy(&self) -> bool {
        true
    }
}

impl<T: Truthy> Truthy for Option<T> {
    fn is_truthy(&self) -> bool {
        self.as_ref().is_some_and(Truthy::is_truthy)
    }
}

impl<T> Truthy for Vec<T> {
    fn is_truthy(&self) -> bool {
        true
    }
}

impl Truthy for Value {
    fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => Number::from(n).to_f64().is_truthy(),
            Value::String(s) => !s.is_empty(),
            Value::Array(_) | Value::Object(_) => true,
        }
    }
}

/// Keys accepted by [`Sequence::to_object`](crate::Sequence::to_object).
///
/// Object keys must be string- or number-like. Numbers are rendered the
/// same way [`Number`] displays them.
pub trait ObjectKey {
    /// Renders the key, or fails if it is not string- or number-like.
    fn object_key(&self) -> Result<String>;
}

impl<K: ObjectKey + ?Sized> ObjectKey for &K {
    fn object_key(&self) -> Result<String> {
        (**self).object_key()
    }
}

impl ObjectKey for str {
    fn object_key(&self) -> Result<String> {
        Ok(self.to_string())
    }
}

impl ObjectKey for String {
    fn object_key(&self) -> Result<String> {
        Ok(self.clone())
    }
}

impl ObjectKey for char {
    fn object_key(&self) -> Result<String> {
        Ok(self.to_string())
    }
}

macro_rules! numeric_object_key {
    ($($ty:ty),*) => {
        $(
            impl ObjectKey for $ty {
                fn object_key(&self) -> Result<String> {
                    Ok(Number::from(*self).to_string())
                }
            }
        )*
    };
}

numeric_object_key!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

impl ObjectKey for Value {
    fn object_key(&self) -> Result<String> {
        match self {
            Value::String(s) => Ok(s.clone()),
            Value::Number(n) => Ok(Number::from(n).to_string()),
            other => Err(SeqError::InvalidKey {
                kind: json_kind(other),
            }),
        }
    }
}

/// Returns a short name for the kind of a JSON value.
pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
