//! The flat variable environment the evaluator runs a program against.

use std::collections::HashMap;

use crate::ast::Kind;
use crate::value::Value;

/// A single flat scope mapping a declared name to its current value and
/// its declared (immutable) kind. Created at program start, released at
/// program end — Bisaya++ has no nested scopes.
#[derive(Debug, Default)]
pub struct Environment {
    vars: HashMap<String, (Value, Kind)>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn declare(&mut self, name: &str, kind: Kind, value: Value) {
        self.vars.insert(name.to_string(), (value, kind));
    }

    pub fn is_declared(&self, name: &str) -> bool {
        self.vars.contains_key(name)
    }

    pub fn kind_of(&self, name: &str) -> Option<Kind> {
        self.vars.get(name).map(|(_, k)| *k)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.vars.get(name).map(|(v, _)| v)
    }

    pub fn set(&mut self, name: &str, value: Value) {
        if let Some(entry) = self.vars.get_mut(name) {
            entry.0 = value;
        }
    }
}
