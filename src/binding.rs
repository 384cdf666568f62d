use alloc::{boxed::Box, collections::BTreeMap};

use crate::{any::Value, callable::Callable};

/// One bound entry: a raw value returned unchanged, a callable auto-invoked
/// on retrieval, or the container's own self-reference.
///
/// `SelfRef` exists so a container can register itself without holding a
/// strong handle to its own allocation; the handle is materialized at
/// get-time from the container doing the retrieval.
#[derive(Clone)]
pub(crate) enum Entry {
    Value(Value),
    Callable(Callable),
    SelfRef,
}

/// The ordered, mutable mapping from identifier to entry. At most one entry
/// per identifier; rebinding overwrites silently.
#[derive(Default)]
pub(crate) struct BindingTable {
    entries: BTreeMap<Box<str>, Entry>,
}

impl BindingTable {
    #[inline]
    pub(crate) fn set(&mut self, id: impl Into<Box<str>>, entry: Entry) {
        self.entries.insert(id.into(), entry);
    }

    /// Identifiers are non-empty strings; the empty string always reports
    /// absent.
    #[inline]
    pub(crate) fn has(&self, id: &str) -> bool {
        !id.is_empty() && self.entries.contains_key(id)
    }

    #[inline]
    pub(crate) fn get(&self, id: &str) -> Option<&Entry> {
        if id.is_empty() {
            return None;
        }
        self.entries.get(id)
    }

    #[inline]
    pub(crate) fn unset(&mut self, id: &str) {
        self.entries.remove(id);
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::{BindingTable, Entry};
    use crate::any::Value;

    #[test]
    fn test_set_has_unset() {
        let mut table = BindingTable::default();
        assert!(!table.has("frog"));

        table.set("frog", Entry::Value(Value::new(1i32)));
        assert!(table.has("frog"));
        assert!(table.get("frog").is_some());

        table.unset("frog");
        assert!(!table.has("frog"));
        // unset of an absent id is not an error
        table.unset("frog");
    }

    #[test]
    fn test_rebind_overwrites() {
        let mut table = BindingTable::default();
        table.set("frog", Entry::Value(Value::new(1i32)));
        table.set("frog", Entry::Value(Value::new(2i32)));

        let Some(Entry::Value(value)) = table.get("frog") else {
            panic!("expected a value entry");
        };
        assert_eq!(*value.downcast_ref::<i32>().unwrap(), 2);
    }

    #[test]
    fn test_empty_identifier_reports_absent() {
        let mut table = BindingTable::default();
        table.set("", Entry::Value(Value::new(1i32)));

        assert!(!table.has(""));
        assert!(table.get("").is_none());
    }
}
