//! Domain-specific errors.

use thiserror::Error;

use crate::domain::model::{ElementId, ListId};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("invalid selector '{0}'")]
    InvalidSelector(String),
    #[error("unknown list {0}")]
    UnknownList(ListId),
    #[error("unknown element {0}")]
    UnknownElement(ElementId),
    #[error("cannot append {child} under its own descendant {parent}")]
    CyclicAppend { parent: ElementId, child: ElementId },
    #[error("list has {items} items but {elements} item elements")]
    ItemCountMismatch { items: usize, elements: usize },
    #[error("element {element} is already mounted in {list}")]
    ElementAlreadyMounted { element: ElementId, list: ListId },
    #[error("script references unknown {kind} '{name}'")]
    UnknownReference { kind: &'static str, name: String },
}
