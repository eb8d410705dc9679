//! The single in-flight drag gesture and the vocabulary describing its transitions.

use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::domain::model::{Group, ItemRef, ReorderInstruction};

/// State captured when a gesture starts, plus the pending target accumulated from hovers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragSession<T> {
    source: ItemRef,
    group: Option<Group>,
    dragged_item: T,
    target: ItemRef,
    had_hover: bool,
}

impl<T> DragSession<T> {
    /// Open a session whose pending target is its own source position.
    pub fn new(source: ItemRef, group: Option<Group>, dragged_item: T) -> Self {
        Self {
            source,
            group,
            dragged_item,
            target: source,
            had_hover: false,
        }
    }

    pub fn source(&self) -> ItemRef {
        self.source
    }

    pub fn group(&self) -> Option<&Group> {
        self.group.as_ref()
    }

    pub fn dragged_item(&self) -> &T {
        &self.dragged_item
    }

    pub fn target(&self) -> ItemRef {
        self.target
    }

    pub fn had_hover(&self) -> bool {
        self.had_hover
    }

    /// Record a qualifying hover. The last one wins.
    pub(crate) fn retarget(&mut self, target: ItemRef) {
        self.target = target;
        self.had_hover = true;
    }

    pub(crate) fn into_instruction(self) -> ReorderInstruction<T> {
        ReorderInstruction {
            group: self.group,
            dragged_item: self.dragged_item,
            source_list: self.source.list,
            target_list: self.target.list,
            source_index: self.source.index,
            target_index: self.target.index,
        }
    }
}

/// What to do with a start event that arrives while a gesture is already active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
#[value(rename_all = "kebab-case")]
pub enum OverlapPolicy {
    /// Keep the active gesture; the new start is inert.
    #[default]
    Ignore,
    /// Discard the active gesture without emitting and start the new one.
    #[serde(alias = "replace")]
    #[value(alias = "replace")]
    Restart,
}

impl OverlapPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            OverlapPolicy::Ignore => "ignore",
            OverlapPolicy::Restart => "restart",
        }
    }
}

impl fmt::Display for OverlapPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OverlapPolicy {
    type Err = OverlapPolicyParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "ignore" => Ok(OverlapPolicy::Ignore),
            "restart" | "replace" => Ok(OverlapPolicy::Restart),
            other => Err(OverlapPolicyParseError::UnknownPolicy(other.to_string())),
        }
    }
}

/// Error returned when parsing an [`OverlapPolicy`] fails.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum OverlapPolicyParseError {
    #[error("unknown overlap policy '{0}'")]
    UnknownPolicy(String),
}

/// Why an event left the engine unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Ignored {
    /// The start origin lies outside the list's handle.
    UnauthorizedStart,
    /// The list has dragging disabled.
    DraggingDisabled,
    /// The event target is not part of any mounted item of the relevant list.
    NotAnItem,
    /// A start arrived while a gesture was active under [`OverlapPolicy::Ignore`].
    OverlappingStart,
    /// The hovered list is not a valid target for the active gesture.
    IneligibleHoverTarget,
    /// A hover or end arrived with no gesture in progress.
    NoActiveSession,
}

impl Ignored {
    pub fn as_str(&self) -> &'static str {
        match self {
            Ignored::UnauthorizedStart => "unauthorized-start",
            Ignored::DraggingDisabled => "dragging-disabled",
            Ignored::NotAnItem => "not-an-item",
            Ignored::OverlappingStart => "overlapping-start",
            Ignored::IneligibleHoverTarget => "ineligible-hover-target",
            Ignored::NoActiveSession => "no-active-session",
        }
    }
}

impl fmt::Display for Ignored {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of feeding one event to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// A gesture started at the given item.
    Started(ItemRef),
    /// The active gesture was discarded and a new one started at the given item.
    Restarted(ItemRef),
    /// A qualifying hover moved the pending target.
    Retargeted(ItemRef),
    /// The gesture ended and a reorder instruction was delivered.
    Emitted,
    /// The gesture ended without any qualifying hover; nothing was delivered.
    Discarded,
    /// The event had no effect.
    Ignored(Ignored),
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transition::Started(item) => write!(f, "started {item}"),
            Transition::Restarted(item) => write!(f, "restarted {item}"),
            Transition::Retargeted(item) => write!(f, "retargeted {item}"),
            Transition::Emitted => f.write_str("emitted"),
            Transition::Discarded => f.write_str("discarded"),
            Transition::Ignored(reason) => write!(f, "ignored ({reason})"),
        }
    }
}
