//! Named collections of variables and expressions, persisted as JSON.
//!
//! A [`Session`] carries the quantities of one calculation document between
//! program runs (the typical workflow typesets one LaTeX document from
//! several short programs). Entries serialize with their full operation
//! trees, so a reloaded expression still renders symbolically.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{EvalError, SessionError};
use crate::expression::Expression;
use crate::variable::Variable;

/// One named entry of a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data")]
pub enum SessionEntry {
    Variable(Variable),
    Expression(Expression),
}

impl SessionEntry {
    pub fn name(&self) -> &str {
        match self {
            SessionEntry::Variable(v) => &v.name,
            SessionEntry::Expression(e) => &e.name,
        }
    }

    pub fn eval(&self) -> Result<f64, EvalError> {
        match self {
            SessionEntry::Variable(v) => v.eval(),
            SessionEntry::Expression(e) => e.eval(),
        }
    }
}

impl fmt::Display for SessionEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionEntry::Variable(v) => v.fmt(f),
            SessionEntry::Expression(e) => e.fmt(f),
        }
    }
}

/// An ordered, name-keyed collection of variables and expressions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    entries: BTreeMap<String, SessionEntry>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a variable under its own name, replacing any previous entry.
    pub fn insert_var(&mut self, variable: Variable) {
        self.entries
            .insert(variable.name.clone(), SessionEntry::Variable(variable));
    }

    /// Inserts an expression under its own name, replacing any previous
    /// entry.
    pub fn insert_expr(&mut self, expression: Expression) {
        self.entries
            .insert(expression.name.clone(), SessionEntry::Expression(expression));
    }

    pub fn get(&self, name: &str) -> Option<&SessionEntry> {
        self.entries.get(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates entries in name order.
    pub fn iter(&self) -> impl Iterator<Item = &SessionEntry> {
        self.entries.values()
    }

    /// Writes the session to a pretty-printed JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SessionError> {
        let path = path.as_ref();
        debug!("saving {} session entries to {}", self.len(), path.display());
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Reads a session back from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SessionError> {
        let path = path.as_ref();
        debug!("loading session from {}", path.display());
        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }
}
