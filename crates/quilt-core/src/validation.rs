use indexmap::IndexMap;

use std::fmt;

/// Validation messages keyed by field, in insertion order.
///
/// An entity's own field errors are keyed by the field name. Errors lifted
/// from nested children are keyed by `<relation>.<field>` for has-one
/// relations and `<relation>[<position>].<field>` for has-many relations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Errors {
    entries: IndexMap<String, Vec<String>>,
}

/// Validation errors of one nested child, as submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildErrors {
    /// Name of the relation the child was submitted through
    pub relation: String,

    /// Submission index for has-many relations, `None` for has-one
    pub position: Option<usize>,

    /// The child's own field errors
    pub errors: Errors,
}

impl Errors {
    pub fn new() -> Errors {
        Errors::default()
    }

    /// Appends `message` to the messages recorded for `key`.
    pub fn add(&mut self, key: impl Into<String>, message: impl Into<String>) {
        self.entries
            .entry(key.into())
            .or_default()
            .push(message.into());
    }

    /// Messages recorded for `key`; empty when there are none.
    pub fn get(&self, key: &str) -> &[String] {
        self.entries.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Iterates `(key, message)` pairs, one per message.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().flat_map(|(key, messages)| {
            messages
                .iter()
                .map(move |message| (key.as_str(), message.as_str()))
        })
    }

    /// Total number of messages across all keys.
    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Removes and returns the messages recorded for `key`.
    pub fn remove(&mut self, key: &str) -> Option<Vec<String>> {
        self.entries.shift_remove(key)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Messages prefixed by their key, e.g. `city can't be blank`.
    pub fn full_messages(&self) -> Vec<String> {
        self.iter()
            .map(|(key, message)| format!("{key} {message}"))
            .collect()
    }

    /// Copies every message of `other` under `<prefix>.<key>`.
    pub fn extend_scoped(&mut self, prefix: &str, other: &Errors) {
        for (key, message) in other.iter() {
            self.add(format!("{prefix}.{key}"), message);
        }
    }
}

impl ChildErrors {
    /// The key prefix under which this child's errors are lifted into the
    /// parent.
    pub fn prefix(&self) -> String {
        match self.position {
            Some(position) => format!("{}[{}]", self.relation, position),
            None => self.relation.clone(),
        }
    }
}

impl fmt::Display for Errors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut sep = "";
        for message in self.full_messages() {
            write!(f, "{sep}{message}")?;
            sep = ", ";
        }
        Ok(())
    }
}
