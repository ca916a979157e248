use crate::id::SortableId;

/// Per-frame drop target memory for an item drag.
///
/// A frame either resolves a fresh target or falls back to whatever the
/// previous frames last saw, so the highlighted target does not flicker when
/// the pointer crosses a gap between droppables.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum OverTarget {
    #[default]
    NoTarget,
    /// Carried over from an earlier frame.
    Cached(SortableId),
    /// Found by collision detection this frame.
    Resolved(SortableId),
}

impl OverTarget {
    pub fn id(&self) -> Option<&SortableId> {
        match self {
            OverTarget::NoTarget => None,
            OverTarget::Cached(id) | OverTarget::Resolved(id) => Some(id),
        }
    }

    /// Feed one frame's collision candidate and return the effective target.
    ///
    /// With no candidate, a drag that just moved into another container pins
    /// the target to the dragged node itself until the layout settles.
    pub fn advance(
        &mut self,
        candidate: Option<SortableId>,
        moved_to_new_container: bool,
        active: &SortableId,
    ) -> Option<SortableId> {
        *self = match candidate {
            Some(id) => OverTarget::Resolved(id),
            None if moved_to_new_container => OverTarget::Cached(active.clone()),
            None => match std::mem::take(self) {
                OverTarget::NoTarget => OverTarget::NoTarget,
                OverTarget::Cached(id) | OverTarget::Resolved(id) => OverTarget::Cached(id),
            },
        };
        self.id().cloned()
    }
}
