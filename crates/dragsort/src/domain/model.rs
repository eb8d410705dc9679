//! Domain models for lists, gestures, and reorder instructions.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::selector::Selector;

/// Identity of a mounted list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListId(pub(crate) u32);

impl fmt::Display for ListId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "list#{}", self.0)
    }
}

/// Identity of a rendered element inside an element tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ElementId(pub(crate) usize);

impl ElementId {
    pub(crate) fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "element#{}", self.0)
    }
}

/// Scope identifier for cross-list dragging.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Group(String);

impl Group {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Position of one item: the list holding it and its index at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ItemRef {
    pub list: ListId,
    pub index: usize,
}

impl ItemRef {
    pub fn new(list: ListId, index: usize) -> Self {
        Self { list, index }
    }
}

impl fmt::Display for ItemRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.list, self.index)
    }
}

/// Per-list configuration recognised by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListOptions {
    /// Lists exchange items only when both groups are absent or equal.
    pub group: Option<Group>,
    /// When set, gestures must originate inside an element matching this selector.
    pub handle: Option<Selector>,
    /// Exposes the item wrapper to the renderer. Has no effect on drag semantics.
    pub custom_wrapper: bool,
    /// Disabled lists neither start gestures nor accept hovers.
    pub dragging_enabled: bool,
    /// Items may leave the list, but it never becomes a hover target.
    pub source_only: bool,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            group: None,
            handle: None,
            custom_wrapper: false,
            dragging_enabled: true,
            source_only: false,
        }
    }
}

impl ListOptions {
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(Group::new(group));
        self
    }

    pub fn with_handle(mut self, handle: Selector) -> Self {
        self.handle = Some(handle);
        self
    }

    pub fn with_custom_wrapper(mut self, enabled: bool) -> Self {
        self.custom_wrapper = enabled;
        self
    }

    pub fn with_dragging_enabled(mut self, enabled: bool) -> Self {
        self.dragging_enabled = enabled;
        self
    }

    pub fn with_source_only(mut self, source_only: bool) -> Self {
        self.source_only = source_only;
        self
    }
}

/// Finalized description of a completed move. The caller applies it to its own lists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReorderInstruction<T> {
    pub group: Option<Group>,
    pub dragged_item: T,
    pub source_list: ListId,
    pub target_list: ListId,
    pub source_index: usize,
    pub target_index: usize,
}

impl<T> ReorderInstruction<T> {
    /// Whether the instruction moves the item back onto its own position.
    pub fn is_same_position(&self) -> bool {
        self.source_list == self.target_list && self.source_index == self.target_index
    }
}
