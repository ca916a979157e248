use std::collections::HashMap;

use tracing::{debug, trace, warn};

use crate::collision::{Droppable, closest_center, pointer_within, rect_intersection};
use crate::geometry::{Point, Rect, Transform};
use crate::handle::{ContainerHandle, ContainerRenderProps, DragStatus, ItemHandle, ItemRenderProps};
use crate::id::{RawId, SortableId};
use crate::map::SortMap;
use crate::options::SortableOptions;
use crate::session::DragSession;
use crate::source::NestedSource;

pub type SortChangeHandler = Box<dyn FnMut(&SortMap)>;

/// How a drag gesture ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DragOutcome {
    /// No drag was in progress.
    Idle,
    /// The map was restored to its pre-drag state.
    Cancelled,
    /// Dropped where it started.
    Unchanged,
    /// Dropped into another container while multiple containers are disabled.
    Rejected,
    ContainersReordered {
        container: SortableId,
        from: usize,
        to: usize,
    },
    ItemMoved {
        item: SortableId,
        container: SortableId,
        from: usize,
        to: usize,
    },
    /// The item changed container and kept its relative index.
    MovedAcross {
        item: SortableId,
        container: SortableId,
    },
}

impl DragOutcome {
    pub fn is_committed(&self) -> bool {
        matches!(
            self,
            DragOutcome::ContainersReordered { .. }
                | DragOutcome::ItemMoved { .. }
                | DragOutcome::MovedAcross { .. }
        )
    }
}

/// Source position of each identifier, for mapping ids back to caller data.
#[derive(Default)]
struct SourceIndex {
    containers: HashMap<RawId, usize>,
    items: HashMap<RawId, (usize, usize)>,
}

fn build_index<S: NestedSource>(source: &S) -> (SortMap, SourceIndex) {
    let mut map = SortMap::new();
    let mut index = SourceIndex::default();

    for (container_ix, container) in source.containers().iter().enumerate() {
        let Some(container_id) = source.container_id(container) else {
            warn!(container_ix, "skipping container without an id");
            continue;
        };

        let mut items = Vec::new();
        for (item_ix, item) in source.items(container).iter().enumerate() {
            let Some(item_id) = source.item_id(item) else {
                warn!(container = %container_id, item_ix, "skipping item without an id");
                continue;
            };
            index
                .items
                .entry(item_id.clone())
                .or_insert((container_ix, item_ix));
            items.push(SortableId::Item(item_id));
        }

        index
            .containers
            .entry(container_id.clone())
            .or_insert(container_ix);
        map.insert_container(SortableId::Container(container_id), items);
    }

    if let Err(err) = map.validate() {
        warn!(%err, "source breaks the partition invariant, first match wins");
    }
    (map, index)
}

/// Owns the nested ordering and runs the drag lifecycle over it.
///
/// Hosts feed pointer or keyboard events as `drag_start`, any number of
/// `detect_collisions` + `drag_over` rounds, then `drag_end` or
/// `drag_cancel`. A completed gesture that changed the order calls the
/// sort change handler exactly once with the full new map.
pub struct ReorderingController<S: NestedSource> {
    source: S,
    options: SortableOptions,
    map: SortMap,
    index: SourceIndex,
    session: Option<DragSession>,
    pending_source: Option<S>,
    on_sort_change: Option<SortChangeHandler>,
}

impl<S: NestedSource> ReorderingController<S> {
    pub fn new(source: S, options: SortableOptions) -> Self {
        let (map, index) = build_index(&source);
        Self {
            source,
            options,
            map,
            index,
            session: None,
            pending_source: None,
            on_sort_change: None,
        }
    }

    pub fn on_sort_change(mut self, handler: impl FnMut(&SortMap) + 'static) -> Self {
        self.on_sort_change = Some(Box::new(handler));
        self
    }

    pub fn set_on_sort_change(&mut self, handler: impl FnMut(&SortMap) + 'static) {
        self.on_sort_change = Some(Box::new(handler));
    }

    pub fn options(&self) -> &SortableOptions {
        &self.options
    }

    pub fn set_options(&mut self, options: SortableOptions) {
        self.options = options;
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Replace the source collection and rebuild the map from scratch.
    ///
    /// During a drag the new source is parked and applied once the gesture
    /// ends, so the in-flight snapshot stays intact. Returns whether the
    /// rebuild happened immediately.
    pub fn set_source(&mut self, source: S) -> bool {
        if self.session.is_some() {
            debug!("source changed mid-drag, deferring rebuild");
            self.pending_source = Some(source);
            return false;
        }
        self.rebuild(source);
        true
    }

    fn rebuild(&mut self, source: S) {
        let (map, index) = build_index(&source);
        self.source = source;
        self.map = map;
        self.index = index;
        debug!(
            containers = self.map.len(),
            items = self.map.item_count(),
            "rebuilt sortable map"
        );
    }

    fn apply_pending_source(&mut self) {
        if let Some(source) = self.pending_source.take() {
            self.rebuild(source);
        }
    }

    pub fn map(&self) -> &SortMap {
        &self.map
    }

    pub fn containers(&self) -> impl Iterator<Item = &SortableId> {
        self.map.containers()
    }

    pub fn items(&self, container: &SortableId) -> &[SortableId] {
        self.map.items(container)
    }

    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    pub fn active(&self) -> Option<&SortableId> {
        self.session.as_ref().map(|s| &s.active)
    }

    pub fn over(&self) -> Option<&SortableId> {
        self.session.as_ref().and_then(|s| s.over.as_ref())
    }

    pub fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    pub fn status(&self) -> DragStatus<'_> {
        DragStatus {
            active: self.active(),
            over: self.over(),
        }
    }

    pub fn source_container(&self, id: &SortableId) -> Option<&S::Container> {
        let SortableId::Container(raw) = id else {
            return None;
        };
        let ix = *self.index.containers.get(raw)?;
        self.source.containers().get(ix)
    }

    pub fn source_item(&self, id: &SortableId) -> Option<&S::Item> {
        let SortableId::Item(raw) = id else {
            return None;
        };
        let (container_ix, item_ix) = *self.index.items.get(raw)?;
        let container = self.source.containers().get(container_ix)?;
        self.source.items(container).get(item_ix)
    }

    pub fn is_disabled(&self, id: &SortableId) -> bool {
        match id {
            SortableId::Container(_) => self
                .source_container(id)
                .is_some_and(|c| self.source.container_disabled(c)),
            SortableId::Item(_) => self
                .source_item(id)
                .is_some_and(|i| self.source.item_disabled(i)),
        }
    }

    /// Whether the dragged node may land on `id`. Disabled nodes never
    /// accept a drop, and a disabled container only takes reorders of its
    /// own items.
    pub fn accepts_drop(&self, id: &SortableId) -> bool {
        if self.is_disabled(id) {
            return false;
        }
        let Some(container) = self.map.find_container(id) else {
            return false;
        };
        !self.is_disabled(container)
            || self.active().and_then(|a| self.map.find_container(a)) == Some(container)
    }

    /// Begin a gesture on `active`. Ignored while another gesture runs, for
    /// unknown ids and for disabled nodes.
    pub fn drag_start(&mut self, active: SortableId, rect: Option<Rect>) -> bool {
        if let Some(session) = &self.session {
            debug!(active = %active, current = %session.active, "drag already in progress");
            return false;
        }
        if self.map.find_container(&active).is_none() {
            debug!(active = %active, "drag start on unknown id");
            return false;
        }
        if self.is_disabled(&active) {
            debug!(active = %active, "drag start on disabled node");
            return false;
        }
        debug!(active = %active, "drag start");
        self.session = Some(DragSession::new(active, self.map.clone(), rect));
        true
    }

    /// Resolve the drop target for the current frame.
    pub fn detect_collisions(
        &mut self,
        active_rect: Rect,
        pointer: Option<Point>,
        droppables: &[Droppable],
    ) -> Option<SortableId> {
        let session = self.session.as_mut()?;
        let active = session.active.clone();

        if active.is_container() {
            let over = closest_center(
                active_rect,
                droppables
                    .iter()
                    .filter(|d| d.id.is_container() && self.map.contains_container(&d.id)),
            )
            .into_iter()
            .next()
            .map(|c| c.id);
            trace!(active = %active, over = ?over, "container collision");
            session.over.clone_from(&over);
            return over;
        }

        let within = pointer_within(pointer, droppables);
        let collisions = if within.is_empty() {
            rect_intersection(active_rect, droppables)
        } else {
            within
        };

        let mut candidate = collisions.into_iter().next().map(|c| c.id);
        if let Some(over) = candidate.clone().filter(SortableId::is_container) {
            let container_items = self.map.items(&over);
            if !container_items.is_empty() {
                let refined = closest_center(
                    active_rect,
                    droppables
                        .iter()
                        .filter(|d| d.id != over && container_items.contains(&d.id)),
                )
                .into_iter()
                .next()
                .map(|c| c.id);
                if refined.is_some() {
                    candidate = refined;
                }
            }
        }

        let over = session
            .target
            .advance(candidate, session.moved_to_new_container, &active);
        trace!(active = %active, over = ?over, target = ?session.target, "item collision");
        session.over.clone_from(&over);
        over
    }

    /// Move the dragged item into the hovered container when it differs
    /// from its current one. Returns whether the map changed.
    pub fn drag_over(
        &mut self,
        over: Option<&SortableId>,
        active_rect: Option<Rect>,
        over_rect: Option<Rect>,
    ) -> bool {
        let Some(active) = self.active().cloned() else {
            return false;
        };
        let Some(over) = over else {
            return false;
        };
        if active.is_container() || self.options.disable_multiple_containers {
            return false;
        }

        let (Some(over_container), Some(active_container)) = (
            self.map.find_container(over).cloned(),
            self.map.find_container(&active).cloned(),
        ) else {
            return false;
        };
        if over_container == active_container || self.is_disabled(&over_container) {
            return false;
        }

        let index = insertion_index(&self.map, &over_container, over, active_rect, over_rect);
        let Some(next) = self
            .map
            .move_across(&active, &active_container, &over_container, index)
        else {
            return false;
        };

        debug!(
            active = %active,
            from = %active_container,
            to = %over_container,
            index,
            "moved to new container"
        );
        if let Some(session) = self.session.as_mut() {
            session.moved_to_new_container = true;
            session.after_move = Some(next.clone());
        }
        self.map = next;
        true
    }

    /// Layout settled after a cross-container move. Safe to call repeatedly.
    pub fn frame_settled(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.moved_to_new_container = false;
        }
    }

    /// Finish the gesture over `over` and commit any net change.
    pub fn drag_end(&mut self, over: Option<&SortableId>) -> DragOutcome {
        let Some(session) = self.session.take() else {
            return DragOutcome::Idle;
        };

        let outcome = if session.active.is_container() {
            self.drop_container(&session.active, over)
        } else {
            self.drop_item(&session, over)
        };

        match &outcome {
            DragOutcome::Cancelled | DragOutcome::Rejected => {
                self.map = session.snapshot;
            }
            outcome if outcome.is_committed() => self.commit(),
            _ => {}
        }
        debug!(active = %session.active, outcome = ?outcome, "drag end");

        self.apply_pending_source();
        outcome
    }

    fn drop_container(&mut self, active: &SortableId, over: Option<&SortableId>) -> DragOutcome {
        let Some(over) = over else {
            return DragOutcome::Unchanged;
        };
        let Some(over_container) = self.map.find_container(over) else {
            return DragOutcome::Unchanged;
        };
        let (Some(from), Some(to)) = (
            self.map.container_index(active),
            self.map.container_index(over_container),
        ) else {
            return DragOutcome::Unchanged;
        };
        if !self.map.reorder_containers(from, to) {
            return DragOutcome::Unchanged;
        }
        DragOutcome::ContainersReordered {
            container: active.clone(),
            from,
            to,
        }
    }

    fn drop_item(&mut self, session: &DragSession, over: Option<&SortableId>) -> DragOutcome {
        let active = &session.active;
        let Some(over) = over else {
            return DragOutcome::Cancelled;
        };
        let (Some(active_container), Some(over_container)) = (
            self.map.find_container(active).cloned(),
            self.map.find_container(over).cloned(),
        ) else {
            return DragOutcome::Cancelled;
        };

        if active_container != over_container {
            if self.options.disable_multiple_containers || self.is_disabled(&over_container) {
                return DragOutcome::Rejected;
            }
            // Dropped without a preceding drag over the target container.
            // The insertion index is final.
            let index = insertion_index(&self.map, &over_container, over, None, None);
            let Some(next) = self
                .map
                .move_across(active, &active_container, &over_container, index)
            else {
                return DragOutcome::Cancelled;
            };
            self.map = next;
            if self.map == session.snapshot {
                return DragOutcome::Unchanged;
            }
            return DragOutcome::MovedAcross {
                item: active.clone(),
                container: over_container,
            };
        }

        let items = self.map.items(&active_container);
        let Some(from) = items.iter().position(|id| id == active) else {
            return DragOutcome::Cancelled;
        };
        let to = if over.is_container() {
            items.len() - 1
        } else {
            items.iter().position(|id| id == over).unwrap_or(from)
        };

        if from != to {
            self.map.move_within(&active_container, from, to);
            return DragOutcome::ItemMoved {
                item: active.clone(),
                container: active_container,
                from,
                to,
            };
        }

        let left_home = self.map.find_container(active) != session.snapshot.find_container(active);
        if (session.after_move.is_some() || left_home) && self.map != session.snapshot {
            return DragOutcome::MovedAcross {
                item: active.clone(),
                container: active_container,
            };
        }
        DragOutcome::Unchanged
    }

    /// Abort the gesture and restore the map captured at drag start.
    pub fn drag_cancel(&mut self) -> bool {
        let Some(session) = self.session.take() else {
            return false;
        };
        debug!(active = %session.active, "drag cancelled");
        self.map = session.snapshot;
        self.apply_pending_source();
        true
    }

    fn commit(&mut self) {
        debug!(
            containers = self.map.len(),
            items = self.map.item_count(),
            "committing sort change"
        );
        if let Some(handler) = self.on_sort_change.as_mut() {
            handler(&self.map);
        }
    }

    /// Visual offset of `id` while siblings make room for the dragged node.
    ///
    /// `rect_of` returns the untransformed layout rect of a node.
    pub fn sorting_transform(
        &self,
        id: &SortableId,
        rect_of: impl Fn(&SortableId) -> Option<Rect>,
    ) -> Option<Transform> {
        let session = self.session.as_ref()?;
        let active = &session.active;
        let over = session.over.as_ref()?;
        if active.is_container() != id.is_container() {
            return None;
        }

        let siblings: Vec<&SortableId> = if id.is_container() {
            self.map.containers().collect()
        } else {
            let container = self.map.find_container(id)?;
            if self.map.find_container(active) != Some(container) {
                return None;
            }
            self.map.items(container).iter().collect()
        };

        let active_index = siblings.iter().position(|s| *s == active)?;
        let index = siblings.iter().position(|s| *s == id)?;
        let over_index = match siblings.iter().position(|s| *s == over) {
            Some(ix) => ix,
            None if over.is_container() && self.map.find_container(active) == Some(over) => {
                siblings.len() - 1
            }
            None => return None,
        };

        let rects = siblings
            .iter()
            .map(|s| rect_of(s))
            .collect::<Option<Vec<_>>>()?;
        self.options
            .strategy
            .transform(&rects, active_index, over_index, index)
    }

    pub fn item_props(
        &self,
        id: &SortableId,
        is_overlay: bool,
        rect_of: impl Fn(&SortableId) -> Option<Rect>,
    ) -> ItemRenderProps {
        let transform = if is_overlay {
            None
        } else {
            self.sorting_transform(id, rect_of)
        };
        ItemHandle::new(id.clone())
            .disabled(self.is_disabled(id))
            .handle(self.options.handle)
            .props(self.status(), is_overlay, transform)
    }

    pub fn container_props(&self, id: &SortableId) -> ContainerRenderProps {
        ContainerHandle::new(id.clone(), self.map.items(id))
            .disabled(self.is_disabled(id))
            .handle(self.options.handle)
            .props(self.status())
    }
}

/// Where an item entering `container` lands: at the end when hovering the
/// container itself, otherwise before the hovered item, or after it when the
/// dragged rect sits below the hovered item's midpoint.
fn insertion_index(
    map: &SortMap,
    container: &SortableId,
    over: &SortableId,
    active_rect: Option<Rect>,
    over_rect: Option<Rect>,
) -> usize {
    let items = map.items(container);
    if over.is_container() {
        return items.len();
    }
    match items.iter().position(|id| id == over) {
        Some(ix) => {
            let below = match (active_rect, over_rect) {
                (Some(active), Some(over)) => active.top() > over.top() + over.height() / 2.,
                _ => false,
            };
            ix + usize::from(below)
        }
        None => items.len(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::source::JsonSource;

    fn controller() -> ReorderingController<JsonSource> {
        let source = JsonSource::new(
            json!([
                { "id": "a", "children": [{ "id": 1 }, { "id": 2 }] },
                { "id": "b", "children": [{ "id": 3, "disabled": true }] },
            ]),
            "children",
        )
        .unwrap();
        ReorderingController::new(source, SortableOptions::default())
    }

    #[test]
    fn second_drag_start_is_ignored() {
        let mut c = controller();
        assert!(c.drag_start(SortableId::item(1), None));
        assert!(!c.drag_start(SortableId::item(2), None));
        assert_eq!(c.active(), Some(&SortableId::item(1)));
    }

    #[test]
    fn disabled_and_unknown_nodes_do_not_start() {
        let mut c = controller();
        assert!(!c.drag_start(SortableId::item(3), None));
        assert!(!c.drag_start(SortableId::item(42), None));
        assert!(!c.is_dragging());
    }

    #[test]
    fn insertion_index_uses_midpoint() {
        let c = controller();
        let container = SortableId::container("a");
        let over = SortableId::item(2);
        let over_rect = Rect::new(0., 100., 100., 40.);
        let above = Rect::new(0., 90., 100., 40.);
        let below = Rect::new(0., 130., 100., 40.);
        assert_eq!(
            insertion_index(c.map(), &container, &over, Some(above), Some(over_rect)),
            1
        );
        assert_eq!(
            insertion_index(c.map(), &container, &over, Some(below), Some(over_rect)),
            2
        );
        assert_eq!(
            insertion_index(c.map(), &container, &container, None, None),
            2
        );
    }

    #[test]
    fn source_lookup_maps_ids_back_to_data() {
        let c = controller();
        let item = c.source_item(&SortableId::item(2)).unwrap();
        assert_eq!(item["id"], json!(2));
        assert!(c.source_item(&SortableId::container("a")).is_none());
        assert!(c.source_container(&SortableId::container("zz")).is_none());
    }

    #[test]
    fn frame_settled_is_idempotent() {
        let mut c = controller();
        c.frame_settled();
        c.drag_start(SortableId::item(1), None);
        c.frame_settled();
        c.frame_settled();
        assert!(!c.session().unwrap().moved_to_new_container());
    }
}
