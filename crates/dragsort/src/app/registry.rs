//! Registry of mounted lists and the item-to-index lookups used during a drag.

use std::collections::{BTreeMap, HashMap};

use crate::app::dom::ElementTree;
use crate::domain::errors::DomainError;
use crate::domain::model::{ElementId, Group, ItemRef, ListId, ListOptions};

/// A mounted list: its configuration, the consumer's items, and their rendered elements.
#[derive(Debug, Clone)]
pub struct ListDescriptor<T> {
    pub options: ListOptions,
    pub container: ElementId,
    items: Vec<T>,
    item_elements: Vec<ElementId>,
}

impl<T> ListDescriptor<T> {
    pub fn group(&self) -> Option<&Group> {
        self.options.group.as_ref()
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn item_elements(&self) -> &[ElementId] {
        &self.item_elements
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Tracks every mounted list and which element renders which item.
#[derive(Debug, Clone)]
pub struct ListRegistry<T> {
    lists: BTreeMap<ListId, ListDescriptor<T>>,
    items_by_element: HashMap<ElementId, ItemRef>,
    next_id: u32,
}

impl<T> Default for ListRegistry<T> {
    fn default() -> Self {
        Self {
            lists: BTreeMap::new(),
            items_by_element: HashMap::new(),
            next_id: 0,
        }
    }
}

impl<T> ListRegistry<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a rendered list. `item_elements[i]` must be the element rendering `items[i]`.
    pub fn mount(
        &mut self,
        options: ListOptions,
        container: ElementId,
        items: Vec<T>,
        item_elements: Vec<ElementId>,
    ) -> Result<ListId, DomainError> {
        let id = ListId(self.next_id);
        self.check_elements(id, &items, &item_elements)?;
        self.next_id += 1;

        self.index_elements(id, &item_elements);
        tracing::debug!(list = %id, items = items.len(), "mounted list");
        self.lists.insert(
            id,
            ListDescriptor {
                options,
                container,
                items,
                item_elements,
            },
        );
        Ok(id)
    }

    /// Replace a list's items and elements, typically after the caller applied a reorder.
    pub fn update(
        &mut self,
        list: ListId,
        items: Vec<T>,
        item_elements: Vec<ElementId>,
    ) -> Result<(), DomainError> {
        if !self.lists.contains_key(&list) {
            return Err(DomainError::UnknownList(list));
        }
        self.check_elements(list, &items, &item_elements)?;

        self.items_by_element.retain(|_, item| item.list != list);
        self.index_elements(list, &item_elements);
        if let Some(descriptor) = self.lists.get_mut(&list) {
            descriptor.items = items;
            descriptor.item_elements = item_elements;
        }
        Ok(())
    }

    /// Remove a list, returning its descriptor.
    pub fn unmount(&mut self, list: ListId) -> Option<ListDescriptor<T>> {
        let descriptor = self.lists.remove(&list)?;
        self.items_by_element.retain(|_, item| item.list != list);
        tracing::debug!(list = %list, "unmounted list");
        Some(descriptor)
    }

    pub fn get(&self, list: ListId) -> Option<&ListDescriptor<T>> {
        self.lists.get(&list)
    }

    pub fn lists(&self) -> impl Iterator<Item = (ListId, &ListDescriptor<T>)> {
        self.lists.iter().map(|(id, descriptor)| (*id, descriptor))
    }

    pub fn len(&self) -> usize {
        self.lists.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }

    /// Nearest item element at or above `element`, in any list.
    pub fn locate_item<D: ElementTree>(&self, tree: &D, element: ElementId) -> Option<ItemRef> {
        tree.ancestors(element)
            .find_map(|candidate| self.items_by_element.get(&candidate).copied())
    }

    /// Index within `list` of the item that `hover_target` belongs to.
    ///
    /// Hovering the container of an empty list resolves to index 0 so items can be dropped into
    /// it.
    pub fn resolve_index<D: ElementTree>(
        &self,
        tree: &D,
        list: ListId,
        hover_target: ElementId,
    ) -> Option<usize> {
        let descriptor = self.lists.get(&list)?;
        for candidate in tree.ancestors(hover_target) {
            if let Some(item) = self.items_by_element.get(&candidate)
                && item.list == list
            {
                return Some(item.index);
            }
            if candidate == descriptor.container {
                return descriptor.is_empty().then_some(0);
            }
        }
        None
    }

    fn check_elements(
        &self,
        list: ListId,
        items: &[T],
        item_elements: &[ElementId],
    ) -> Result<(), DomainError> {
        if items.len() != item_elements.len() {
            return Err(DomainError::ItemCountMismatch {
                items: items.len(),
                elements: item_elements.len(),
            });
        }
        for element in item_elements {
            if let Some(owner) = self.items_by_element.get(element)
                && owner.list != list
            {
                return Err(DomainError::ElementAlreadyMounted {
                    element: *element,
                    list: owner.list,
                });
            }
        }
        Ok(())
    }

    fn index_elements(&mut self, list: ListId, item_elements: &[ElementId]) {
        for (index, element) in item_elements.iter().enumerate() {
            self.items_by_element
                .insert(*element, ItemRef::new(list, index));
        }
    }
}

/// Whether a drag from a list in `active` may target a list in `candidate`.
///
/// Groupless lists only exchange items with groupless lists; grouped lists only with the same
/// group.
pub fn is_eligible_target(active: Option<&Group>, candidate: Option<&Group>) -> bool {
    active == candidate
}
