//! Enum type names bound during a single generation run.

use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    /// First time this name was seen
    New,
    /// Name already bound to the same values
    Shared,
}

/// A name that is already bound to a different value list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumConflict {
    pub existing: Vec<String>,
}

/// Generation-scoped registry of enum type names.
///
/// Created fresh for every call; never shared between runs.
#[derive(Debug, Default)]
pub struct EnumRegistry {
    types: HashMap<String, Vec<String>>,
}

impl EnumRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name` to `values`. Values are compared in order, since
    /// `ENUM` ordinals depend on declaration order.
    pub fn register(&mut self, name: &str, values: &[String]) -> Result<Registration, EnumConflict> {
        match self.types.get(name) {
            Some(existing) if existing.as_slice() == values => Ok(Registration::Shared),
            Some(existing) => Err(EnumConflict {
                existing: existing.clone(),
            }),
            None => {
                self.types.insert(name.to_string(), values.to_vec());
                Ok(Registration::New)
            }
        }
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(vs: &[&str]) -> Vec<String> {
        vs.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_register_new_and_shared() {
        let mut registry = EnumRegistry::new();
        let status = values(&["todo", "done"]);

        assert_eq!(registry.register("task_status", &status), Ok(Registration::New));
        assert_eq!(registry.register("task_status", &status), Ok(Registration::Shared));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_register_conflict() {
        let mut registry = EnumRegistry::new();
        registry.register("status", &values(&["a", "b"])).unwrap();

        let err = registry.register("status", &values(&["a", "c"])).unwrap_err();
        assert_eq!(err.existing, values(&["a", "b"]));

        // Reordering changes the type
        assert!(registry.register("status", &values(&["b", "a"])).is_err());
    }
}
