use alloc::{boxed::Box, collections::vec_deque::VecDeque};

use crate::any::Value;

#[derive(Clone)]
struct ArgEntry {
    key: Option<Box<str>>,
    value: Value,
}

/// An ordered argument bag supplied by the caller of `get`, `make`, `build`
/// or `invoke`.
///
/// Entries are either keyed (by a parameter name or a declared type
/// identifier) or positional. The resolver consumes entries as it matches
/// them, so no argument is ever applied to two parameters.
#[derive(Clone, Default)]
pub struct Args {
    entries: VecDeque<ArgEntry>,
}

impl Args {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a keyed argument.
    #[must_use]
    pub fn with<T: Send + Sync + 'static>(self, key: impl Into<Box<str>>, value: T) -> Self {
        self.with_value(key, Value::new(value))
    }

    /// Adds a keyed argument from an existing [`Value`].
    #[must_use]
    pub fn with_value(mut self, key: impl Into<Box<str>>, value: Value) -> Self {
        self.entries.push_back(ArgEntry {
            key: Some(key.into()),
            value,
        });
        self
    }

    /// Adds a positional argument.
    #[must_use]
    pub fn positional<T: Send + Sync + 'static>(self, value: T) -> Self {
        self.positional_value(Value::new(value))
    }

    #[must_use]
    pub fn positional_value(mut self, value: Value) -> Self {
        self.entries.push_back(ArgEntry { key: None, value });
        self
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Removes and returns the entry stored under `key`.
    pub(crate) fn take(&mut self, key: &str) -> Option<Value> {
        let position = self
            .entries
            .iter()
            .position(|entry| entry.key.as_deref() == Some(key))?;
        self.entries.remove(position).map(|entry| entry.value)
    }

    /// Removes and returns the first remaining positional entry.
    pub(crate) fn shift_positional(&mut self) -> Option<Value> {
        let position = self.entries.iter().position(|entry| entry.key.is_none())?;
        self.entries.remove(position).map(|entry| entry.value)
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::Args;

    #[test]
    fn test_take_consumes() {
        let mut args = Args::new().with("frog", 1i32).with("toad", 2i32);

        assert_eq!(args.len(), 2);
        assert_eq!(*args.take("frog").unwrap().downcast::<i32>().unwrap(), 1);
        assert!(args.take("frog").is_none());
        assert_eq!(args.len(), 1);
    }

    #[test]
    fn test_shift_positional_order() {
        let mut args = Args::new().positional(1i32).with("frog", 2i32).positional(3i32);

        assert_eq!(*args.shift_positional().unwrap().downcast::<i32>().unwrap(), 1);
        assert_eq!(*args.shift_positional().unwrap().downcast::<i32>().unwrap(), 3);
        assert!(args.shift_positional().is_none());
        // the keyed entry is untouched by positional shifts
        assert_eq!(*args.take("frog").unwrap().downcast::<i32>().unwrap(), 2);
        assert!(args.is_empty());
    }
}
