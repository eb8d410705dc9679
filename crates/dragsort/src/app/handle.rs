//! Drag handle authorization.

use crate::app::dom::ElementTree;
use crate::domain::model::ElementId;
use crate::domain::selector::Selector;

/// Decides whether a gesture may start from a given origin element.
#[derive(Debug, Default, Clone, Copy)]
pub struct HandleResolver;

impl HandleResolver {
    /// Authorize a drag that originated at `origin` inside the item rooted at `item_root`.
    ///
    /// Without a handle every origin is accepted. With one, the origin must be the handle element
    /// or any descendant of it. The search stops at the item root, so handles outside the dragged
    /// item never count.
    pub fn authorize<D: ElementTree>(
        tree: &D,
        origin: ElementId,
        item_root: ElementId,
        handle: Option<&Selector>,
    ) -> bool {
        let Some(handle) = handle else {
            return true;
        };

        for element in tree.ancestors(origin) {
            if tree.matches(element, handle) {
                return true;
            }
            if element == item_root {
                break;
            }
        }
        false
    }
}
