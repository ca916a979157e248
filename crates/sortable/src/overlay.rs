use gpui::{
    Context, Entity, IntoElement, ParentElement as _, Render, Styled as _, Window, div,
};
use gpui_sortable_core::{CursorKind, CursorLease, NestedSource, SharedCursor, SortableId};

use crate::state::SortableContainersState;

/// Drag ghost following the pointer. Stays empty until the press passes the
/// activation constraint, then holds the grabbing cursor while the drag runs.
pub(crate) struct SortableOverlay<S: NestedSource + 'static> {
    state: Entity<SortableContainersState<S>>,
    id: SortableId,
    cursor: SharedCursor,
    lease: Option<CursorLease<SharedCursor>>,
}

impl<S: NestedSource + 'static> SortableOverlay<S> {
    pub(crate) fn new(
        state: Entity<SortableContainersState<S>>,
        id: SortableId,
        cursor: SharedCursor,
    ) -> Self {
        Self {
            state,
            id,
            cursor,
            lease: None,
        }
    }
}

/// Hold the grabbing cursor exactly while `dragging`.
fn sync_lease(
    lease: &mut Option<CursorLease<SharedCursor>>,
    cursor: &SharedCursor,
    dragging: bool,
) {
    match (dragging, lease.is_some()) {
        (true, false) => *lease = Some(CursorLease::acquire(cursor.clone(), CursorKind::Grabbing)),
        (false, true) => *lease = None,
        _ => {}
    }
}

impl<S: NestedSource + 'static> Render for SortableOverlay<S> {
    fn render(&mut self, window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let dragging = self.state.read(cx).controller().active() == Some(&self.id);
        sync_lease(&mut self.lease, &self.cursor, dragging);
        if !dragging {
            return div();
        }

        let id = self.id.clone();
        let content = self
            .state
            .update(cx, |state, cx| state.render_overlay(&id, window, cx));
        div().opacity(0.95).shadow_lg().child(content)
    }
}
