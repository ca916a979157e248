use crate::geometry::Transform;
use crate::id::SortableId;

/// Read-only view of the drag in progress, handed to handles when they
/// compute their render props.
#[derive(Clone, Copy, Debug, Default)]
pub struct DragStatus<'a> {
    pub active: Option<&'a SortableId>,
    pub over: Option<&'a SortableId>,
}

/// Props to wire onto the element that starts a drag in handle mode.
#[derive(Clone, Debug, PartialEq)]
pub struct HandleProps {
    pub target: SortableId,
    pub enabled: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ItemRenderProps {
    /// This is the floating copy following the pointer.
    pub is_overlay: bool,
    /// This is the node being dragged (its in-place placeholder).
    pub is_dragging: bool,
    /// Some drag is in progress.
    pub is_sorting: bool,
    pub transform: Option<Transform>,
    pub handle_props: Option<HandleProps>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ContainerRenderProps {
    pub handle_props: Option<HandleProps>,
    pub is_hovered: bool,
    pub handle: bool,
}

/// A single draggable leaf.
#[derive(Clone, Debug)]
pub struct ItemHandle {
    pub id: SortableId,
    pub disabled: bool,
    pub handle: bool,
}

impl ItemHandle {
    pub fn new(id: SortableId) -> Self {
        Self {
            id,
            disabled: false,
            handle: false,
        }
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn handle(mut self, handle: bool) -> Self {
        self.handle = handle;
        self
    }

    pub fn props(
        &self,
        status: DragStatus<'_>,
        is_overlay: bool,
        transform: Option<Transform>,
    ) -> ItemRenderProps {
        ItemRenderProps {
            is_overlay,
            is_dragging: !is_overlay && status.active == Some(&self.id),
            is_sorting: status.active.is_some(),
            transform: if is_overlay { None } else { transform },
            handle_props: self.handle.then(|| HandleProps {
                target: self.id.clone(),
                enabled: !self.disabled,
            }),
        }
    }
}

/// A draggable group that is also a drop target for items.
#[derive(Clone, Debug)]
pub struct ContainerHandle<'a> {
    pub id: SortableId,
    pub items: &'a [SortableId],
    pub disabled: bool,
    pub handle: bool,
}

impl<'a> ContainerHandle<'a> {
    pub fn new(id: SortableId, items: &'a [SortableId]) -> Self {
        Self {
            id,
            items,
            disabled: false,
            handle: false,
        }
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn handle(mut self, handle: bool) -> Self {
        self.handle = handle;
        self
    }

    /// Hovered when an item is over the container itself, or when anything
    /// is over one of the container's own items.
    pub fn is_hovered(&self, status: DragStatus<'_>) -> bool {
        let Some(over) = status.over else {
            return false;
        };
        let active_is_container = status.active.is_some_and(SortableId::is_container);
        (*over == self.id && !active_is_container) || self.items.contains(over)
    }

    pub fn props(&self, status: DragStatus<'_>) -> ContainerRenderProps {
        ContainerRenderProps {
            handle_props: self.handle.then(|| HandleProps {
                target: self.id.clone(),
                enabled: !self.disabled,
            }),
            is_hovered: self.is_hovered(status),
            handle: self.handle,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlay_copy_is_not_the_dragged_placeholder() {
        let id = SortableId::item(1);
        let status = DragStatus {
            active: Some(&id),
            over: None,
        };
        let handle = ItemHandle::new(id.clone());
        let placeholder = handle.props(status, false, Some(Transform::translate(0., 4.)));
        let overlay = handle.props(status, true, Some(Transform::translate(0., 4.)));
        assert!(placeholder.is_dragging && placeholder.is_sorting);
        assert!(!overlay.is_dragging && overlay.is_overlay);
        assert_eq!(overlay.transform, None);
    }

    #[test]
    fn handle_props_only_in_handle_mode() {
        let handle = ItemHandle::new(SortableId::item(1));
        assert!(handle.props(DragStatus::default(), false, None).handle_props.is_none());
        let props = handle
            .handle(true)
            .disabled(true)
            .props(DragStatus::default(), false, None);
        assert_eq!(
            props.handle_props,
            Some(HandleProps {
                target: SortableId::item(1),
                enabled: false
            })
        );
    }

    #[test]
    fn container_hovered_directly_by_item() {
        let items = [SortableId::item(1)];
        let container = ContainerHandle::new(SortableId::container("a"), &items);
        let active = SortableId::item(9);
        let over = SortableId::container("a");
        assert!(container.is_hovered(DragStatus {
            active: Some(&active),
            over: Some(&over),
        }));
    }

    #[test]
    fn container_not_hovered_by_other_container_on_its_shell() {
        let items = [SortableId::item(1)];
        let container = ContainerHandle::new(SortableId::container("a"), &items);
        let active = SortableId::container("b");
        let over = SortableId::container("a");
        assert!(!container.is_hovered(DragStatus {
            active: Some(&active),
            over: Some(&over),
        }));
    }

    #[test]
    fn container_hovered_through_its_items() {
        let items = [SortableId::item(1), SortableId::item(2)];
        let container = ContainerHandle::new(SortableId::container("a"), &items);
        let active = SortableId::item(7);
        let over = SortableId::item(2);
        assert!(container.is_hovered(DragStatus {
            active: Some(&active),
            over: Some(&over),
        }));
    }
}
