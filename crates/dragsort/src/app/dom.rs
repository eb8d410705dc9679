//! Element tree abstraction the engine uses to reason about event targets.

use crate::domain::errors::DomainError;
use crate::domain::model::ElementId;
use crate::domain::selector::Selector;

/// Read access to a rendered element hierarchy.
///
/// Hosts implement this over their own UI tree; [`Dom`] is an in-memory implementation.
pub trait ElementTree {
    /// Parent of `element`, or `None` for a root or unknown element.
    fn parent(&self, element: ElementId) -> Option<ElementId>;

    /// Whether `element` matches `selector`.
    fn matches(&self, element: ElementId, selector: &Selector) -> bool;

    /// Iterate from `element` up to the root, starting with `element` itself.
    fn ancestors(&self, element: ElementId) -> Ancestors<'_, Self>
    where
        Self: Sized,
    {
        Ancestors {
            tree: self,
            next: Some(element),
        }
    }
}

/// Inclusive ancestor walk produced by [`ElementTree::ancestors`].
pub struct Ancestors<'a, T> {
    tree: &'a T,
    next: Option<ElementId>,
}

impl<T: ElementTree> Iterator for Ancestors<'_, T> {
    type Item = ElementId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.tree.parent(current);
        Some(current)
    }
}

#[derive(Debug, Clone)]
struct Node {
    tag: String,
    id: Option<String>,
    classes: Vec<String>,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
}

/// Arena backed element tree.
#[derive(Debug, Default, Clone)]
pub struct Dom {
    nodes: Vec<Node>,
}

impl Dom {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a detached element.
    pub fn create_element(&mut self, tag: &str) -> ElementId {
        let id = ElementId(self.nodes.len());
        self.nodes.push(Node {
            tag: tag.to_ascii_lowercase(),
            id: None,
            classes: Vec::new(),
            parent: None,
            children: Vec::new(),
        });
        id
    }

    /// Attach `child` as the last child of `parent`, detaching it from any previous parent.
    pub fn append_child(&mut self, parent: ElementId, child: ElementId) -> Result<(), DomainError> {
        self.node(parent)?;
        self.node(child)?;
        if self.ancestors(parent).any(|ancestor| ancestor == child) {
            return Err(DomainError::CyclicAppend { parent, child });
        }

        if let Some(previous) = self.nodes[child.index()].parent {
            self.nodes[previous.index()]
                .children
                .retain(|existing| *existing != child);
        }
        self.nodes[child.index()].parent = Some(parent);
        self.nodes[parent.index()].children.push(child);
        Ok(())
    }

    pub fn add_class(&mut self, element: ElementId, class: &str) -> Result<(), DomainError> {
        let node = self.node_mut(element)?;
        if !node.classes.iter().any(|existing| existing == class) {
            node.classes.push(class.to_owned());
        }
        Ok(())
    }

    pub fn set_id(&mut self, element: ElementId, id: &str) -> Result<(), DomainError> {
        self.node_mut(element)?.id = Some(id.to_owned());
        Ok(())
    }

    pub fn classes(&self, element: ElementId) -> &[String] {
        self.nodes
            .get(element.index())
            .map(|node| node.classes.as_slice())
            .unwrap_or_default()
    }

    pub fn children(&self, element: ElementId) -> &[ElementId] {
        self.nodes
            .get(element.index())
            .map(|node| node.children.as_slice())
            .unwrap_or_default()
    }

    /// First descendant of `root` (excluding `root`) matching `selector`, in document order.
    pub fn query(&self, root: ElementId, selector: &Selector) -> Option<ElementId> {
        let mut stack: Vec<ElementId> = self.children(root).iter().rev().copied().collect();
        while let Some(current) = stack.pop() {
            if self.matches(current, selector) {
                return Some(current);
            }
            stack.extend(self.children(current).iter().rev().copied());
        }
        None
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn node(&self, element: ElementId) -> Result<&Node, DomainError> {
        self.nodes
            .get(element.index())
            .ok_or(DomainError::UnknownElement(element))
    }

    fn node_mut(&mut self, element: ElementId) -> Result<&mut Node, DomainError> {
        self.nodes
            .get_mut(element.index())
            .ok_or(DomainError::UnknownElement(element))
    }
}

impl ElementTree for Dom {
    fn parent(&self, element: ElementId) -> Option<ElementId> {
        self.nodes.get(element.index()).and_then(|node| node.parent)
    }

    fn matches(&self, element: ElementId, selector: &Selector) -> bool {
        self.nodes.get(element.index()).is_some_and(|node| {
            selector.matches(&node.tag, node.id.as_deref(), &node.classes)
        })
    }
}
