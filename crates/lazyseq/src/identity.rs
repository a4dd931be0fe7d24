//! Reference identity for composite elements.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::rc::Rc;

use serde_json::Value;

use crate::record::Record;

/// A shared value compared and hashed by address rather than content.
///
/// [`distinct`](crate::Sequence::distinct),
/// [`includes`](crate::Sequence::includes) and
/// [`without`](crate::Sequence::without) use the element's own equality.
/// Wrap composite elements in `Identity` to make two structurally equal
/// values count as different unless they are the same allocation.
///
/// ```
/// use lazyseq::Identity;
///
/// let a = Identity::new(vec![1]);
/// let b = Identity::new(vec![1]);
/// let items = lazyseq::from(vec![a.clone(), b.clone(), a.clone()]);
///
/// assert_eq!(items.distinct().to_vec().len(), 2);
/// assert!(items.includes(&b));
/// assert!(!items.includes(&Identity::new(vec![1])));
/// ```
pub struct Identity<T: ?Sized>(Rc<T>);

impl<T> Identity<T> {
    /// Allocates `value` behind a new identity.
    pub fn new(value: T) -> Self {
        Identity(Rc::new(value))
    }
}

impl<T: ?Sized> Identity<T> {
    /// Returns `true` if both handles point at the same allocation.
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Rc::ptr_eq(&a.0, &b.0)
    }

    /// Returns the underlying shared pointer.
    pub fn into_inner(self) -> Rc<T> {
        self.0
    }

    fn address(&self) -> *const () {
        Rc::as_ptr(&self.0) as *const ()
    }
}

impl<T: ?Sized> From<Rc<T>> for Identity<T> {
    fn from(value: Rc<T>) -> Self {
        Identity(value)
    }
}

impl<T: ?Sized> Clone for Identity<T> {
    fn clone(&self) -> Self {
        Identity(Rc::clone(&self.0))
    }
}

impl<T: ?Sized> Deref for Identity<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T: ?Sized> PartialEq for Identity<T> {
    fn eq(&self, other: &Self) -> bool {
        self.address() == other.address()
    }
}

impl<T: ?Sized> Eq for Identity<T> {}

impl<T: ?Sized> Hash for Identity<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.address().hash(state);
    }
}

impl<T: fmt::Debug + ?Sized> fmt::Debug for Identity<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Identity").field(&&*self.0).finish()
    }
}

impl<T: Record + ?Sized> Record for Identity<T> {
    fn field(&self, name: &str) -> Option<Value> {
        self.0.field(name)
    }

    fn entries(&self) -> Vec<(String, Value)> {
        self.0.entries()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn equal_content_is_not_identity() {
        let a = Identity::new(json!({"id": 1}));
        let b = Identity::new(json!({"id": 1}));
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
        assert!(Identity::ptr_eq(&a, &a.clone()));
    }

    #[test]
    fn without_uses_identity() {
        let shared = Identity::new(json!({"id": 1}));
        let other = Identity::new(json!({"id": 1}));
        let kept = crate::from(vec![shared.clone(), other.clone()])
            .without(vec![shared])
            .to_vec();
        assert_eq!(kept, vec![other]);
    }

    #[test]
    fn reads_fields_through_handle() {
        let row = Identity::new(json!({"name": "Tony"}));
        assert_eq!(row.field("name"), Some(json!("Tony")));
    }
}
