//! Typing presence primitives.

use std::collections::BTreeSet;

use tokio::task::AbortHandle;

use super::{entity::Session, value_object::DisplayName};

/// Distinct display names that currently have at least one typing session.
///
/// Ordered lexicographically so every recipient sees the same rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypingSet(BTreeSet<DisplayName>);

impl TypingSet {
    /// Derive the set from the current sessions.
    ///
    /// A name shared by several sessions appears once, as long as at least one
    /// of them is typing.
    pub fn from_sessions<'a>(sessions: impl IntoIterator<Item = &'a Session>) -> Self {
        Self(
            sessions
                .into_iter()
                .filter(|session| session.is_typing)
                .map(|session| session.name.clone())
                .collect(),
        )
    }

    pub fn contains(&self, name: &DisplayName) -> bool {
        self.0.contains(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_names(&self) -> Vec<String> {
        self.0.iter().map(|name| name.as_str().to_string()).collect()
    }
}

/// Handle to a scheduled typing-expiry task.
///
/// `generation` identifies which `typing=true` signal scheduled the task, so an
/// expiry that fires after being superseded can be recognised and ignored.
#[derive(Debug)]
pub struct TypingTimer {
    generation: u64,
    handle: AbortHandle,
}

impl TypingTimer {
    pub fn new(generation: u64, handle: AbortHandle) -> Self {
        Self { generation, handle }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Cancel the pending expiry. Does not wait for the task.
    pub fn cancel(self) {
        self.handle.abort();
    }
}
