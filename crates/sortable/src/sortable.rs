use std::rc::Rc;

use gpui::{
    AnyElement, App, ElementId, Entity, InteractiveElement as _, IntoElement,
    ParentElement as _, RenderOnce, StyleRefinement, Styled, Window, div,
};
use gpui_component::StyledExt as _;
use gpui_sortable_core::{ContainerRenderProps, ItemRenderProps, NestedSource};

use crate::state::{RenderContainer, RenderItem, SortableContainersState};

/// Create a [`SortableContainers`] board.
///
/// `render_container` draws the header of each container (the part that
/// starts a container drag). `render_item` draws one item; it is also used
/// for the drag ghost, with [`ItemRenderProps::is_overlay`] set.
pub fn sortable_containers<S, C, I>(
    state: &Entity<SortableContainersState<S>>,
    render_container: C,
    render_item: I,
) -> SortableContainers<S>
where
    S: NestedSource + 'static,
    C: Fn(&S::Container, ContainerRenderProps, &mut Window, &mut App) -> AnyElement + 'static,
    I: Fn(&S::Item, ItemRenderProps, &mut Window, &mut App) -> AnyElement + 'static,
{
    SortableContainers::new(state, render_container, render_item)
}

/// Containers laid out side by side, each a drop target for the items of
/// every other container.
#[derive(IntoElement)]
pub struct SortableContainers<S: NestedSource + 'static> {
    id: ElementId,
    state: Entity<SortableContainersState<S>>,
    style: StyleRefinement,
    render_container: RenderContainer<S::Container>,
    render_item: RenderItem<S::Item>,
}

impl<S: NestedSource + 'static> SortableContainers<S> {
    pub fn new<C, I>(
        state: &Entity<SortableContainersState<S>>,
        render_container: C,
        render_item: I,
    ) -> Self
    where
        C: Fn(&S::Container, ContainerRenderProps, &mut Window, &mut App) -> AnyElement + 'static,
        I: Fn(&S::Item, ItemRenderProps, &mut Window, &mut App) -> AnyElement + 'static,
    {
        Self {
            id: ElementId::Name(format!("sortable-containers-{}", state.entity_id()).into()),
            state: state.clone(),
            style: StyleRefinement::default(),
            render_container: Rc::new(render_container),
            render_item: Rc::new(render_item),
        }
    }
}

impl<S: NestedSource + 'static> Styled for SortableContainers<S> {
    fn style(&mut self) -> &mut StyleRefinement {
        &mut self.style
    }
}

impl<S: NestedSource + 'static> RenderOnce for SortableContainers<S> {
    fn render(self, _window: &mut Window, cx: &mut App) -> impl IntoElement {
        self.state.update(cx, |state, _| {
            state.render_container = self.render_container;
            state.render_item = self.render_item;
        });

        div()
            .id(self.id)
            .size_full()
            .child(self.state)
            .refine_style(&self.style)
    }
}
