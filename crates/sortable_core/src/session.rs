use crate::geometry::Rect;
use crate::id::SortableId;
use crate::map::SortMap;
use crate::target::OverTarget;

/// State that only exists between drag start and drag end / cancel.
#[derive(Clone, Debug)]
pub struct DragSession {
    pub(crate) active: SortableId,
    /// The map as it was when the drag started, restored on cancel.
    pub(crate) snapshot: SortMap,
    pub(crate) target: OverTarget,
    /// Effective over id reported by the latest collision pass.
    pub(crate) over: Option<SortableId>,
    /// Set by a cross-container move, cleared once the frame settles.
    pub(crate) moved_to_new_container: bool,
    /// The map right after the latest cross-container move.
    pub(crate) after_move: Option<SortMap>,
    pub(crate) initial_rect: Option<Rect>,
}

impl DragSession {
    pub(crate) fn new(active: SortableId, snapshot: SortMap, initial_rect: Option<Rect>) -> Self {
        Self {
            active,
            snapshot,
            target: OverTarget::NoTarget,
            over: None,
            moved_to_new_container: false,
            after_move: None,
            initial_rect,
        }
    }

    pub fn active(&self) -> &SortableId {
        &self.active
    }

    pub fn snapshot(&self) -> &SortMap {
        &self.snapshot
    }

    pub fn target(&self) -> &OverTarget {
        &self.target
    }

    pub fn initial_rect(&self) -> Option<Rect> {
        self.initial_rect
    }

    pub fn moved_to_new_container(&self) -> bool {
        self.moved_to_new_container
    }
}
