// ABOUTME: Environment module for managing variable bindings and scopes

use crate::value::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// A single binding: the stored value and whether it was declared constant.
#[derive(Debug, Clone)]
pub struct Binding {
    pub value: Value,
    pub constant: bool,
}

/// Why a `set` was rejected. The evaluator turns these into positioned
/// runtime errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetError {
    Unbound,
    Constant,
}

/// A lexical scope frame. Environments chain through `parent` and are shared
/// by reference: closures keep their defining frame alive.
#[derive(Debug)]
pub struct Environment {
    bindings: RefCell<HashMap<String, Binding>>,
    parent: Option<Rc<Environment>>,
}

impl Environment {
    /// Creates a new global environment with no parent.
    pub fn new() -> Rc<Self> {
        Rc::new(Environment {
            bindings: RefCell::new(HashMap::new()),
            parent: None,
        })
    }

    /// Creates a new child environment with a parent.
    pub fn with_parent(parent: Rc<Environment>) -> Rc<Self> {
        Rc::new(Environment {
            bindings: RefCell::new(HashMap::new()),
            parent: Some(parent),
        })
    }

    /// Defines a binding in THIS scope (doesn't walk the parent chain).
    pub fn define(&self, name: impl Into<String>, value: Value, constant: bool) {
        self.bindings
            .borrow_mut()
            .insert(name.into(), Binding { value, constant });
    }

    /// Looks up a name in this scope and parent scopes recursively.
    pub fn get(&self, name: &str) -> Option<Value> {
        if let Some(binding) = self.bindings.borrow().get(name) {
            return Some(binding.value.clone());
        }
        if let Some(ref parent) = self.parent {
            return parent.get(name);
        }
        None
    }

    /// Updates an existing binding, walking the parent chain. Fails on a
    /// constant or an unbound name; there is no implicit definition.
    pub fn set(&self, name: &str, value: Value) -> Result<(), SetError> {
        if let Some(binding) = self.bindings.borrow_mut().get_mut(name) {
            if binding.constant {
                return Err(SetError::Constant);
            }
            binding.value = value;
            return Ok(());
        }
        if let Some(ref parent) = self.parent {
            return parent.set(name, value);
        }
        Err(SetError::Unbound)
    }

    /// Whether the name is bound in this scope or any ancestor.
    pub fn has(&self, name: &str) -> bool {
        if self.bindings.borrow().contains_key(name) {
            return true;
        }
        match self.parent {
            Some(ref parent) => parent.has(name),
            None => false,
        }
    }

    /// Names bound directly in this frame (non-inherited).
    pub fn own_names(&self) -> Vec<String> {
        self.bindings.borrow().keys().cloned().collect()
    }

    /// The binding for a name in this frame only.
    pub fn own_entry(&self, name: &str) -> Option<Binding> {
        self.bindings.borrow().get(name).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_define_and_get() {
        let env = Environment::new();
        env.define("x", Value::Number(42.0), false);
        assert_eq!(env.get("x"), Some(Value::Number(42.0)));
    }

    #[test]
    fn test_get_unbound() {
        let env = Environment::new();
        assert!(env.get("missing").is_none());
        assert!(!env.has("missing"));
    }

    #[test]
    fn test_parent_lookup_and_shadowing() {
        let parent = Environment::new();
        parent.define("x", Value::Number(1.0), false);
        parent.define("y", Value::Number(2.0), false);

        let child = Environment::with_parent(parent);
        child.define("x", Value::Number(10.0), false);

        assert_eq!(child.get("x"), Some(Value::Number(10.0)));
        assert_eq!(child.get("y"), Some(Value::Number(2.0)));
    }

    #[test]
    fn test_set_walks_parent_chain() {
        let parent = Environment::new();
        parent.define("x", Value::Number(1.0), false);

        let child = Environment::with_parent(parent.clone());
        child.set("x", Value::Number(5.0)).unwrap();

        assert_eq!(parent.get("x"), Some(Value::Number(5.0)));
    }

    #[test]
    fn test_set_unbound_fails() {
        let env = Environment::new();
        assert_eq!(env.set("x", Value::Nil), Err(SetError::Unbound));
    }

    #[test]
    fn test_set_constant_fails() {
        let env = Environment::new();
        env.define("PI", Value::Number(3.14), true);
        assert_eq!(
            env.set("PI", Value::Number(2.0)),
            Err(SetError::Constant)
        );
        assert_eq!(env.get("PI"), Some(Value::Number(3.14)));
    }

    #[test]
    fn test_set_constant_in_ancestor_fails() {
        let parent = Environment::new();
        parent.define("PI", Value::Number(3.14), true);
        let child = Environment::with_parent(parent);
        assert_eq!(child.set("PI", Value::Nil), Err(SetError::Constant));
    }

    #[test]
    fn test_own_names_excludes_inherited() {
        let parent = Environment::new();
        parent.define("a", Value::Nil, false);
        let child = Environment::with_parent(parent);
        child.define("b", Value::Nil, false);

        assert_eq!(child.own_names(), vec!["b".to_string()]);
        assert!(child.own_entry("a").is_none());
        assert!(child.own_entry("b").is_some());
    }

    #[test]
    fn test_own_entry_reports_constness() {
        let env = Environment::new();
        env.define("K", Value::Number(1.0), true);
        let entry = env.own_entry("K").unwrap();
        assert!(entry.constant);
        assert_eq!(entry.value, Value::Number(1.0));
    }
}
