//! Global and `@`-local label storage, adapted from the reference assembler's `LabelMap` (drops
//! the script-block association, which has no counterpart here).

use crate::span::Span;
use crate::{Error, Result};
use slotmap::{new_key_type, SlotMap};
use std::collections::HashMap;
use std::sync::Arc;

/// A label declared in the program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    /// The fully-qualified name: the bare name for a global label, `global@local` for a local one.
    pub name: Arc<str>,
    /// The address assigned to this label; `None` until pass 1 resolves it.
    pub value: Option<u32>,
    pub span: Span,
}

new_key_type! {
    /// A unique label identifier used to look up a label.
    pub struct LabelId;
}

/// Stores labels in a program and allows fast lookup by ID or fully-qualified name.
#[derive(Default)]
pub struct LabelMap {
    slots: SlotMap<LabelId, Label>,
    by_name: HashMap<Arc<str>, LabelId>,
}

impl LabelMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the label corresponding to `id`. ***Panics*** if the ID is invalid.
    pub fn get(&self, id: LabelId) -> &Label {
        &self.slots[id]
    }

    /// Finds the label corresponding to a fully-qualified name.
    pub fn find_name(&self, name: &str) -> Option<LabelId> {
        self.by_name.get(name).copied()
    }

    /// Inserts a new label named `name`. The name must be unique (after qualification) or this
    /// fails with [`Error::DuplicateLabel`].
    pub fn insert_new(&mut self, name: impl Into<Arc<str>>, span: Span) -> Result<LabelId> {
        let name = name.into();
        if self.by_name.contains_key(&name) {
            return Err(Error::DuplicateLabel { name: name.to_string(), span });
        }
        let id = self.slots.insert(Label { name: Arc::clone(&name), value: None, span });
        self.by_name.insert(name, id);
        Ok(id)
    }

    /// Assigns `value` to label `id`.
    pub fn set_value(&mut self, id: LabelId, value: u32) {
        self.slots[id].value = Some(value);
    }

    /// The current value of a fully-qualified name, if the label exists and has been resolved.
    pub fn value(&self, name: &str) -> Option<u32> {
        self.find_name(name).and_then(|id| self.get(id).value)
    }
}

/// Qualifies an `@`-local reference against the nearest enclosing global label, matching how the
/// lexer strips the `@` sigil before this is ever seen.
pub fn qualify_local(local: &str, scope: Option<&str>) -> String {
    match scope {
        Some(scope) => format!("{scope}@{local}"),
        None => local.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_resolve() {
        let mut labels = LabelMap::new();
        let id = labels.insert_new("start", Span::EMPTY).unwrap();
        assert_eq!(labels.value("start"), None);
        labels.set_value(id, 0x2000);
        assert_eq!(labels.value("start"), Some(0x2000));
    }

    #[test]
    fn test_duplicate_is_error() {
        let mut labels = LabelMap::new();
        labels.insert_new("start", Span::EMPTY).unwrap();
        assert!(matches!(labels.insert_new("start", Span::EMPTY), Err(Error::DuplicateLabel { .. })));
    }

    #[test]
    fn test_qualify_local() {
        assert_eq!(qualify_local("loop", Some("start")), "start@loop");
        assert_eq!(qualify_local("loop", None), "loop");
    }
}
