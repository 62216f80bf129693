//! Variable store.
//!
//! A single flat namespace of identifier → text shared by top-level code,
//! loop bodies and included files.  Values are whatever text the assignment
//! produced: a canonical number (see [`crate::number::format_number`]) or a
//! literal token such as `"red"` with its quotes still attached.

use std::collections::HashMap;

/// Identifier → value table owned by one compilation.
#[derive(Debug, Default, Clone)]
pub struct VarStore {
    vars: HashMap<String, String>,
}

impl VarStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set (or overwrite) a variable.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(name.into(), value.into());
    }

    /// Get the value of a variable, if it was ever assigned.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    /// Resolve a token: the variable's value when assigned, otherwise the
    /// token text itself.
    pub fn resolve<'a>(&'a self, token: &'a str) -> &'a str {
        self.get(token).unwrap_or(token)
    }

    /// Returns `true` if the variable is set.
    pub fn contains(&self, name: &str) -> bool {
        self.vars.contains_key(name)
    }

    /// Iterate over all variables.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.vars.iter()
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_and_get() {
        let mut vars = VarStore::new();
        vars.set("w", "100");
        assert_eq!(vars.get("w"), Some("100"));
    }

    #[test]
    fn overwrite() {
        let mut vars = VarStore::new();
        vars.set("x", "1");
        vars.set("x", "2");
        assert_eq!(vars.get("x"), Some("2"));
        assert_eq!(vars.len(), 1);
    }

    #[test]
    fn resolve_falls_back_to_token() {
        let vars = VarStore::new();
        assert_eq!(vars.resolve("nope"), "nope");
        assert!(!vars.contains("nope"));
    }

    #[test]
    fn resolve_keeps_quoted_values() {
        let mut vars = VarStore::new();
        vars.set("c", "\"red\"");
        assert_eq!(vars.resolve("c"), "\"red\"");
    }

    #[test]
    fn empty_store() {
        let vars = VarStore::new();
        assert!(vars.is_empty());
        assert_eq!(vars.iter().count(), 0);
    }
}
