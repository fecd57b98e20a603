//! Session Context
//!
//! The mutable variable store of one interactive session, plus the result
//! history: `_` holds the most recent result and `out` the sequence of all
//! prior results. The context survives errors and is reset only between
//! sessions.

use std::collections::HashMap;

use crate::value::Value;

#[derive(Debug, Default)]
pub struct Context {
    vars: HashMap<String, Value>,
    out: Vec<Value>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a variable. `out` reads as the list of prior results.
    pub fn get(&self, name: &str) -> Option<Value> {
        if name == "out" {
            return Some(Value::List(self.out.clone()));
        }
        self.vars.get(name).cloned()
    }

    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        self.vars.insert(name.into(), value);
    }

    /// Record a top-level result: `_` is replaced, `out` appended.
    pub fn push_result(&mut self, value: Value) {
        self.vars.insert("_".to_string(), value.clone());
        self.out.push(value);
    }

    /// The most recent result, if any line has produced one.
    pub fn last(&self) -> Option<&Value> {
        self.vars.get("_")
    }

    pub fn out(&self) -> &[Value] {
        &self.out
    }

    pub fn clear(&mut self) {
        self.vars.clear();
        self.out.clear();
    }
}
