//! Operation Registry: one operation per input type
use crate::operation::Operation;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;
use tracing::{debug, warn};

/// Maps a type identifier to the single operation consuming it.
///
/// Populated once, then read-only. There is no replace or unregister.
#[derive(Default)]
pub struct OperationRegistry {
    operations: HashMap<&'static str, Box<dyn Operation>>,
}

impl OperationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `op` under its declared input type.
    ///
    /// Returns `false` and leaves the registry untouched when that type is
    /// already taken.
    pub fn register(&mut self, op: Box<dyn Operation>) -> bool {
        match self.operations.entry(op.input_type()) {
            Entry::Occupied(existing) => {
                warn!(
                    input_type = *existing.key(),
                    registered = existing.get().name(),
                    rejected = op.name(),
                    "operation already registered for this type"
                );
                false
            }
            Entry::Vacant(slot) => {
                debug!(input_type = *slot.key(), operation = op.name(), "operation registered");
                slot.insert(op);
                true
            }
        }
    }

    /// Operation consuming `type_id`, if any. Absence is the normal end of a chain.
    pub fn lookup(&self, type_id: &str) -> Option<&dyn Operation> {
        self.operations.get(type_id).map(|op| op.as_ref())
    }

    pub fn contains(&self, type_id: &str) -> bool {
        self.operations.contains_key(type_id)
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Registered input types, sorted.
    pub fn input_types(&self) -> Vec<&'static str> {
        let mut types: Vec<_> = self.operations.keys().copied().collect();
        types.sort_unstable();
        types
    }
}

impl fmt::Debug for OperationRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for input_type in self.input_types() {
            if let Some(op) = self.operations.get(input_type) {
                map.entry(&input_type, &op.name());
            }
        }
        map.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datum::Datum;
    use crate::operation::from_fn;

    fn to_text(name: &'static str) -> Box<dyn Operation> {
        Box::new(from_fn(name, Datum::URI, |_| Ok(Datum::Text(String::new()))))
    }

    #[test]
    fn test_register_and_lookup() {
        let mut registry = OperationRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.register(to_text("LoadA")));

        let op = registry.lookup(Datum::URI).unwrap();
        assert_eq!(op.name(), "LoadA");
        assert!(registry.lookup(Datum::TEXT).is_none());
    }

    #[test]
    fn test_duplicate_registration_is_rejected() {
        let mut registry = OperationRegistry::new();
        assert!(registry.register(to_text("LoadA")));
        assert!(!registry.register(to_text("LoadB")));

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.lookup(Datum::URI).unwrap().name(), "LoadA");
    }

    #[test]
    fn test_input_types_sorted() {
        let mut registry = OperationRegistry::new();
        registry.register(Box::new(from_fn("B", Datum::TEXT, |d| Ok(d))));
        registry.register(Box::new(from_fn("A", Datum::COMPRESSED, |d| Ok(d))));

        assert_eq!(registry.input_types(), vec![Datum::COMPRESSED, Datum::TEXT]);
        assert!(registry.contains(Datum::TEXT));
        assert_eq!(format!("{:?}", registry), r#"{"type/compressed": "A", "type/text": "B"}"#);
    }
}
