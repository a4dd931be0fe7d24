//! Keyed structures.
//!
//! This module provides the [`Record`] trait, the Rust counterpart of a
//! plain object with named properties. It is what
//! [`group_by_field`](crate::Sequence::group_by_field),
//! [`pick`](crate::Sequence::pick) and the [`Entries`](crate::Entries)
//! adapter work against. It is implemented by `#[derive(Record)]` and for
//! JSON objects and string-keyed maps.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use serde_json::{Map, Value};

/// Trait for types whose named fields can be read at runtime.
///
/// This trait is typically derived using `#[derive(Record)]`, but can also
/// be implemented manually.
///
/// # Derive Usage
///
/// ```
/// use lazyseq::Record;
/// use lazyseq::serde_json::Value;
///
/// #[derive(Record)]
/// struct User {
///     name: String,
///     age: u32,
///     #[record(skip)]
///     password_hash: String,
/// }
///
/// let user = User { name: "Lisa".into(), age: 31, password_hash: "x".into() };
/// assert_eq!(user.field(User::NAME), Some(Value::from("Lisa")));
/// assert_eq!(user.field("password_hash"), None);
/// assert_eq!(user.entries().len(), 2);
/// ```
///
/// # Manual Implementation
///
/// ```
/// use lazyseq::Record;
/// use lazyseq::serde_json::Value;
///
/// struct Point {
///     x: i64,
///     y: i64,
/// }
///
/// impl Record for Point {
///     fn field(&self, name: &str) -> Option<Value> {
///         match name {
///             "x" => Some(self.x.into()),
///             "y" => Some(self.y.into()),
///             _ => None,
///         }
///     }
///
///     fn entries(&self) -> Vec<(String, Value)> {
///         vec![("x".into(), self.x.into()), ("y".into(), self.y.into())]
///     }
/// }
/// ```
pub trait Record {
    /// Returns the value of a visible field, or `None` if there is no such
    /// field.
    ///
    /// A field that exists but holds `null` is reported as
    /// `Some(Value::Null)`.
    fn field(&self, name: &str) -> Option<Value>;

    /// Returns the visible fields as `(name, value)` pairs, in declaration
    /// order.
    fn entries(&self) -> Vec<(String, Value)>;

    /// Returns `true` if the record has a visible field with this name.
    fn has_field(&self, name: &str) -> bool {
        self.field(name).is_some()
    }
}

impl<R: Record + ?Sized> Record for &R {
    fn field(&self, name: &str) -> Option<Value> {
        (**self).field(name)
    }

    fn entries(&self) -> Vec<(String, Value)> {
        (**self).entries()
    }
}

impl<R: Record + ?Sized> Record for std::rc::Rc<R> {
    fn field(&self, name: &str) -> Option<Value> {
        (**self).field(name)
    }

    fn entries(&self) -> Vec<(String, Value)> {
        (**self).entries()
    }
}

/// Only JSON objects have fields; other values have none.
impl Record for Value {
    fn field(&self, name: &str) -> Option<Value> {
        self.as_object().and_then(|map| map.get(name)).cloned()
    }

    fn entries(&self) -> Vec<(String, Value)> {
        self.as_object().map(Record::entries).unwrap_or_default()
    }
}

impl Record for Map<String, Value> {
    fn field(&self, name: &str) -> Option<Value> {
        self.get(name).cloned()
    }

    fn entries(&self) -> Vec<(String, Value)> {
        self.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }
}

impl<V: Clone + Into<Value>> Record for HashMap<String, V> {
    fn field(&self, name: &str) -> Option<Value> {
        self.get(name).cloned().map(Into::into)
    }

    fn entries(&self) -> Vec<(String, Value)> {
        self.iter()
            .map(|(k, v)| (k.clone(), v.clone().into()))
            .collect()
    }
}

impl<V: Clone + Into<Value>> Record for BTreeMap<String, V> {
    fn field(&self, name: &str) -> Option<Value> {
        self.get(name).cloned().map(Into::into)
    }

    fn entries(&self) -> Vec<(String, Value)> {
        self.iter()
            .map(|(k, v)| (k.clone(), v.clone().into()))
            .collect()
    }
}

/// Converts a field of `record` into its JSON value.
///
/// This is what `#[derive(Record)]` calls for every visible field. A value
/// that cannot be serialized (a map with non-string keys, for example) reads
/// as `null` and logs a warning naming the record and field.
pub fn field_value<V: Serialize + ?Sized>(record: &str, field: &str, value: &V) -> Value {
    match serde_json::to_value(value) {
        Ok(value) => value,
        Err(err) => {
            tracing::warn!(
                record,
                field,
                error = %err,
                "record field is not serializable, reading it as null"
            );
            Value::Null
        }
    }
}

/// Builds a JSON object holding only the requested fields that exist on
/// `record`, in request order.
pub(crate) fn pick_fields<R: Record + ?Sized>(record: &R, keys: &[String]) -> Value {
    let mut picked = Map::new();
    for key in keys {
        if let Some(value) = record.field(key) {
            picked.insert(key.clone(), value);
        }
    }
    Value::Object(picked)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct TestItem {
        name: String,
        count: i32,
    }

    impl Record for TestItem {
        fn field(&self, name: &str) -> Option<Value> {
            match name {
                "name" => Some(Value::from(self.name.clone())),
                "count" => Some(Value::from(self.count)),
                _ => None,
            }
        }

        fn entries(&self) -> Vec<(String, Value)> {
            vec![
                ("name".to_string(), Value::from(self.name.clone())),
                ("count".to_string(), Value::from(self.count)),
            ]
        }
    }

    #[test]
    fn record_manual_impl() {
        let item = TestItem {
            name: "test".to_string(),
            count: 42,
        };

        assert_eq!(item.field("name"), Some(json!("test")));
        assert_eq!(item.field("count"), Some(json!(42)));
        assert_eq!(item.field("unknown"), None);
        assert!(item.has_field("count"));
        assert!(!item.has_field("unknown"));
    }

    #[test]
    fn json_object_record() {
        let value = json!({"a": 1, "b": null});
        assert_eq!(value.field("a"), Some(json!(1)));
        assert_eq!(value.field("b"), Some(Value::Null));
        assert_eq!(value.field("c"), None);
        assert_eq!(
            value.entries(),
            vec![("a".to_string(), json!(1)), ("b".to_string(), Value::Null)]
        );
    }

    #[test]
    fn json_scalar_has_no_fields() {
        assert_eq!(json!(3).field("a"), None);
        assert!(json!("text").entries().is_empty());
    }

    #[test]
    fn btree_map_record() {
        let mut map = BTreeMap::new();
        map.insert("x".to_string(), 1);
        map.insert("y".to_string(), 2);

        assert_eq!(map.field("y"), Some(json!(2)));
        assert_eq!(
            map.entries(),
            vec![("x".to_string(), json!(1)), ("y".to_string(), json!(2))]
        );
    }

    #[test]
    fn field_value_serializes_or_falls_back_to_null() {
        assert_eq!(field_value("Item", "tags", &vec!["a", "b"]), json!(["a", "b"]));

        let grid = HashMap::from([((0, 1), 5)]);
        assert_eq!(field_value("Board", "grid", &grid), Value::Null);
    }

    #[test]
    fn pick_keeps_existing_keys_in_request_order() {
        let item = TestItem {
            name: "test".to_string(),
            count: 1,
        };
        let keys = vec!["count".to_string(), "missing".to_string(), "name".to_string()];

        let picked = pick_fields(&item, &keys);
        assert_eq!(picked, json!({"count": 1, "name": "test"}));
        assert_eq!(
            picked.as_object().map(|m| m.keys().cloned().collect::<Vec<_>>()),
            Some(vec!["count".to_string(), "name".to_string()])
        );
    }
}
