//! Drag-sort engine: the `Idle`/`Active` state machine driven by start, hover, and end events.

use std::mem;

use crate::app::dom::ElementTree;
use crate::app::emitter::{ReorderEmitter, ReorderSink};
use crate::app::handle::HandleResolver;
use crate::app::registry::{ListRegistry, is_eligible_target};
use crate::app::session::{DragSession, Ignored, OverlapPolicy, Transition};
use crate::domain::model::{ElementId, ItemRef, ListId};

#[derive(Debug)]
enum DragState<T> {
    Idle,
    Active(DragSession<T>),
}

/// Owns the mounted lists and at most one drag gesture.
///
/// Events must arrive in gesture order: one start, any number of hovers, one end. Every entry
/// point runs to completion synchronously and reports what it did as a [`Transition`]; nothing is
/// surfaced as an error.
#[derive(Debug)]
pub struct DragSort<T, S> {
    registry: ListRegistry<T>,
    state: DragState<T>,
    emitter: ReorderEmitter<S>,
    overlap: OverlapPolicy,
}

impl<T, S> DragSort<T, S>
where
    T: Clone,
    S: ReorderSink<T>,
{
    pub fn new(sink: S) -> Self {
        Self {
            registry: ListRegistry::new(),
            state: DragState::Idle,
            emitter: ReorderEmitter::new(sink),
            overlap: OverlapPolicy::default(),
        }
    }

    pub fn with_overlap_policy(mut self, policy: OverlapPolicy) -> Self {
        self.overlap = policy;
        self
    }

    pub fn overlap_policy(&self) -> OverlapPolicy {
        self.overlap
    }

    pub fn registry(&self) -> &ListRegistry<T> {
        &self.registry
    }

    /// Mutable access for the renderer to mount, update, and unmount lists.
    pub fn registry_mut(&mut self) -> &mut ListRegistry<T> {
        &mut self.registry
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Active(_))
    }

    /// The active gesture, if any.
    pub fn session(&self) -> Option<&DragSession<T>> {
        match &self.state {
            DragState::Idle => None,
            DragState::Active(session) => Some(session),
        }
    }

    /// Number of reorder instructions delivered so far.
    pub fn emitted(&self) -> u64 {
        self.emitter.emitted()
    }

    pub fn sink(&self) -> &S {
        self.emitter.sink()
    }

    pub fn into_sink(self) -> S {
        self.emitter.into_sink()
    }

    /// Handle a drag-start originating at `origin`.
    pub fn drag_start<D: ElementTree>(&mut self, tree: &D, origin: ElementId) -> Transition {
        let overlapping = self.is_dragging();
        if overlapping && self.overlap == OverlapPolicy::Ignore {
            return self.ignore(Ignored::OverlappingStart);
        }

        let Some(item) = self.registry.locate_item(tree, origin) else {
            return self.ignore(Ignored::NotAnItem);
        };
        let Some(descriptor) = self.registry.get(item.list) else {
            return self.ignore(Ignored::NotAnItem);
        };
        if !descriptor.options.dragging_enabled {
            return self.ignore(Ignored::DraggingDisabled);
        }

        let item_root = descriptor.item_elements()[item.index];
        if !HandleResolver::authorize(tree, origin, item_root, descriptor.options.handle.as_ref()) {
            return self.ignore(Ignored::UnauthorizedStart);
        }

        let session = DragSession::new(
            item,
            descriptor.group().cloned(),
            descriptor.items()[item.index].clone(),
        );
        tracing::debug!(list = %item.list, index = item.index, "drag started");
        self.state = DragState::Active(session);

        if overlapping {
            tracing::debug!(list = %item.list, index = item.index, "replaced active drag");
            Transition::Restarted(item)
        } else {
            Transition::Started(item)
        }
    }

    /// Handle a drag-over/drag-enter on `target` within `list`.
    pub fn drag_hover<D: ElementTree>(
        &mut self,
        tree: &D,
        list: ListId,
        target: ElementId,
    ) -> Transition {
        let DragState::Active(session) = &mut self.state else {
            return Transition::Ignored(Ignored::NoActiveSession);
        };
        let Some(descriptor) = self.registry.get(list) else {
            return Transition::Ignored(Ignored::NotAnItem);
        };

        let accepts = descriptor.options.dragging_enabled
            && !descriptor.options.source_only
            && is_eligible_target(session.group(), descriptor.group());
        if !accepts {
            tracing::trace!(list = %list, "hover over ineligible list");
            return Transition::Ignored(Ignored::IneligibleHoverTarget);
        }

        let Some(index) = self.registry.resolve_index(tree, list, target) else {
            tracing::trace!(list = %list, element = %target, "hover outside any item");
            return Transition::Ignored(Ignored::NotAnItem);
        };

        let target = ItemRef::new(list, index);
        if session.target() != target || !session.had_hover() {
            tracing::debug!(list = %list, index, "drag target moved");
        }
        session.retarget(target);
        Transition::Retargeted(target)
    }

    /// Handle a drag-end. Always returns the engine to idle.
    pub fn drag_end(&mut self) -> Transition {
        match mem::replace(&mut self.state, DragState::Idle) {
            DragState::Idle => Transition::Ignored(Ignored::NoActiveSession),
            DragState::Active(session) if session.had_hover() => {
                self.emitter.emit(session);
                Transition::Emitted
            }
            DragState::Active(session) => {
                tracing::debug!(
                    list = %session.source().list,
                    index = session.source().index,
                    "drag ended without hover"
                );
                Transition::Discarded
            }
        }
    }

    fn ignore(&self, reason: Ignored) -> Transition {
        tracing::debug!(reason = %reason, "drag start ignored");
        Transition::Ignored(reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::dom::Dom;
    use crate::domain::model::{ListOptions, ReorderInstruction};

    type Engine = DragSort<&'static str, Vec<ReorderInstruction<&'static str>>>;

    struct Rendered {
        list: ListId,
        container: ElementId,
        items: Vec<ElementId>,
        handles: Vec<ElementId>,
    }

    fn mount(
        engine: &mut Engine,
        dom: &mut Dom,
        options: ListOptions,
        items: &[&'static str],
    ) -> Rendered {
        let container = dom.create_element("div");
        let mut elements = Vec::new();
        let mut handles = Vec::new();
        for _ in items {
            let item = dom.create_element("div");
            let handle = dom.create_element("span");
            dom.add_class(handle, "handle").unwrap();
            dom.append_child(container, item).unwrap();
            dom.append_child(item, handle).unwrap();
            elements.push(item);
            handles.push(handle);
        }
        let list = engine
            .registry_mut()
            .mount(options, container, items.to_vec(), elements.clone())
            .unwrap();
        Rendered {
            list,
            container,
            items: elements,
            handles,
        }
    }

    fn setup(options: ListOptions) -> (Engine, Dom, Rendered) {
        let mut engine = Engine::new(Vec::new());
        let mut dom = Dom::new();
        let rendered = mount(&mut engine, &mut dom, options, &["foo", "bar", "baz"]);
        (engine, dom, rendered)
    }

    #[test]
    fn start_then_end_without_hover_emits_nothing() {
        let (mut engine, dom, l) = setup(ListOptions::default());

        assert_eq!(
            engine.drag_start(&dom, l.items[0]),
            Transition::Started(ItemRef::new(l.list, 0))
        );
        assert!(engine.is_dragging());
        assert_eq!(engine.drag_end(), Transition::Discarded);
        assert!(!engine.is_dragging());
        assert!(engine.sink().is_empty());
    }

    #[test]
    fn last_hover_wins() {
        let (mut engine, dom, l) = setup(ListOptions::default());

        engine.drag_start(&dom, l.items[0]);
        engine.drag_hover(&dom, l.list, l.items[2]);
        engine.drag_hover(&dom, l.list, l.items[1]);
        engine.drag_hover(&dom, l.list, l.handles[1]);
        assert_eq!(engine.drag_end(), Transition::Emitted);

        assert_eq!(
            engine.into_sink(),
            vec![ReorderInstruction {
                group: None,
                dragged_item: "foo",
                source_list: l.list,
                target_list: l.list,
                source_index: 0,
                target_index: 1,
            }]
        );
    }

    #[test]
    fn hover_back_onto_source_still_emits() {
        let (mut engine, dom, l) = setup(ListOptions::default());

        engine.drag_start(&dom, l.items[1]);
        engine.drag_hover(&dom, l.list, l.items[1]);
        engine.drag_end();

        let emitted = engine.into_sink();
        assert_eq!(emitted.len(), 1);
        assert!(emitted[0].is_same_position());
        assert_eq!(emitted[0].dragged_item, "bar");
    }

    #[test]
    fn handle_gates_start() {
        let selector = ".handle".parse().unwrap();
        let (mut engine, dom, l) = setup(ListOptions::default().with_handle(selector));

        assert_eq!(
            engine.drag_start(&dom, l.items[0]),
            Transition::Ignored(Ignored::UnauthorizedStart)
        );
        assert_eq!(
            engine.drag_hover(&dom, l.list, l.items[1]),
            Transition::Ignored(Ignored::NoActiveSession)
        );
        assert_eq!(engine.drag_end(), Transition::Ignored(Ignored::NoActiveSession));
        assert_eq!(engine.emitted(), 0);

        assert_eq!(
            engine.drag_start(&dom, l.handles[0]),
            Transition::Started(ItemRef::new(l.list, 0))
        );
    }

    #[test]
    fn groups_isolate_hover_targets() {
        let mut engine = Engine::new(Vec::new());
        let mut dom = Dom::new();
        let a = mount(&mut engine, &mut dom, ListOptions::default().with_group("g"), &["a0", "a1"]);
        let b = mount(&mut engine, &mut dom, ListOptions::default().with_group("g"), &["b0"]);
        let c = mount(&mut engine, &mut dom, ListOptions::default().with_group("h"), &["c0"]);
        let d = mount(&mut engine, &mut dom, ListOptions::default(), &["d0"]);

        engine.drag_start(&dom, a.items[1]);
        assert_eq!(
            engine.drag_hover(&dom, c.list, c.items[0]),
            Transition::Ignored(Ignored::IneligibleHoverTarget)
        );
        assert_eq!(
            engine.drag_hover(&dom, d.list, d.items[0]),
            Transition::Ignored(Ignored::IneligibleHoverTarget)
        );
        assert!(!engine.session().unwrap().had_hover());

        assert_eq!(
            engine.drag_hover(&dom, b.list, b.items[0]),
            Transition::Retargeted(ItemRef::new(b.list, 0))
        );
        engine.drag_hover(&dom, c.list, c.items[0]);
        assert_eq!(engine.session().unwrap().target(), ItemRef::new(b.list, 0));
        engine.drag_end();

        let emitted = engine.into_sink();
        assert_eq!(emitted.len(), 1);
        assert_eq!(emitted[0].group.as_ref().map(|g| g.as_str()), Some("g"));
        assert_eq!(emitted[0].source_list, a.list);
        assert_eq!(emitted[0].target_list, b.list);
        assert_eq!(emitted[0].source_index, 1);
        assert_eq!(emitted[0].target_index, 0);
    }

    #[test]
    fn ineligible_hover_keeps_earlier_target() {
        let mut engine = Engine::new(Vec::new());
        let mut dom = Dom::new();
        let a = mount(&mut engine, &mut dom, ListOptions::default(), &["a0", "a1"]);
        let other = mount(&mut engine, &mut dom, ListOptions::default().with_group("x"), &["x0"]);

        engine.drag_start(&dom, a.items[0]);
        engine.drag_hover(&dom, a.list, a.items[1]);
        engine.drag_hover(&dom, other.list, other.items[0]);
        engine.drag_end();

        let emitted = engine.into_sink();
        assert_eq!(emitted[0].target_list, a.list);
        assert_eq!(emitted[0].target_index, 1);
    }

    #[test]
    fn hovering_an_empty_list_targets_index_zero() {
        let mut engine = Engine::new(Vec::new());
        let mut dom = Dom::new();
        let a = mount(&mut engine, &mut dom, ListOptions::default(), &["a0"]);
        let empty = mount(&mut engine, &mut dom, ListOptions::default(), &[]);

        engine.drag_start(&dom, a.items[0]);
        assert_eq!(
            engine.drag_hover(&dom, a.list, a.container),
            Transition::Ignored(Ignored::NotAnItem)
        );
        assert_eq!(
            engine.drag_hover(&dom, empty.list, empty.container),
            Transition::Retargeted(ItemRef::new(empty.list, 0))
        );
    }

    #[test]
    fn source_only_and_disabled_lists_reject_hovers() {
        let mut engine = Engine::new(Vec::new());
        let mut dom = Dom::new();
        let source = mount(
            &mut engine,
            &mut dom,
            ListOptions::default().with_source_only(true),
            &["s0", "s1"],
        );
        let disabled = mount(
            &mut engine,
            &mut dom,
            ListOptions::default().with_dragging_enabled(false),
            &["d0"],
        );

        assert_eq!(
            engine.drag_start(&dom, disabled.items[0]),
            Transition::Ignored(Ignored::DraggingDisabled)
        );
        assert_eq!(
            engine.drag_start(&dom, source.items[0]),
            Transition::Started(ItemRef::new(source.list, 0))
        );
        assert_eq!(
            engine.drag_hover(&dom, source.list, source.items[1]),
            Transition::Ignored(Ignored::IneligibleHoverTarget)
        );
        assert_eq!(
            engine.drag_hover(&dom, disabled.list, disabled.items[0]),
            Transition::Ignored(Ignored::IneligibleHoverTarget)
        );
        assert_eq!(engine.drag_end(), Transition::Discarded);
    }

    #[test]
    fn overlapping_start_is_ignored_by_default() {
        let (mut engine, dom, l) = setup(ListOptions::default());

        engine.drag_start(&dom, l.items[0]);
        assert_eq!(
            engine.drag_start(&dom, l.items[2]),
            Transition::Ignored(Ignored::OverlappingStart)
        );
        engine.drag_hover(&dom, l.list, l.items[1]);
        engine.drag_end();

        let emitted = engine.into_sink();
        assert_eq!(emitted.len(), 1);
        assert_eq!(emitted[0].source_index, 0);
    }

    #[test]
    fn overlapping_start_can_restart() {
        let (engine, dom, l) = setup(ListOptions::default());
        let mut engine = engine.with_overlap_policy(OverlapPolicy::Restart);

        engine.drag_start(&dom, l.items[0]);
        engine.drag_hover(&dom, l.list, l.items[1]);
        assert_eq!(
            engine.drag_start(&dom, l.items[2]),
            Transition::Restarted(ItemRef::new(l.list, 2))
        );
        assert!(!engine.session().unwrap().had_hover());
        assert_eq!(engine.drag_end(), Transition::Discarded);
        assert_eq!(engine.emitted(), 0);
    }

    #[test]
    fn start_outside_items_is_ignored() {
        let (mut engine, mut dom, l) = setup(ListOptions::default());
        let stray = dom.create_element("div");

        assert_eq!(
            engine.drag_start(&dom, l.container),
            Transition::Ignored(Ignored::NotAnItem)
        );
        assert_eq!(
            engine.drag_start(&dom, stray),
            Transition::Ignored(Ignored::NotAnItem)
        );
        assert!(!engine.is_dragging());
    }

    #[test]
    fn dragged_item_is_captured_at_start() {
        let (mut engine, dom, l) = setup(ListOptions::default());

        engine.drag_start(&dom, l.items[2]);
        engine
            .registry_mut()
            .update(l.list, vec!["baz", "foo", "bar"], vec![l.items[2], l.items[0], l.items[1]])
            .unwrap();
        engine.drag_hover(&dom, l.list, l.items[0]);
        engine.drag_end();

        let emitted = engine.into_sink();
        assert_eq!(emitted[0].dragged_item, "baz");
        assert_eq!(emitted[0].source_index, 2);
        assert_eq!(emitted[0].target_index, 1);
    }
}
