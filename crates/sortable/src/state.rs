use std::cell::RefCell;
use std::rc::Rc;
use std::time::Instant;

use gpui::{
    AnyElement, App, AppContext as _, Context, CursorStyle, Div, DragMoveEvent, ElementId,
    EntityId, FocusHandle, InteractiveElement as _, IntoElement, KeyBinding, ParentElement as _,
    Pixels, Render, Stateful, StatefulInteractiveElement as _, Styled as _, Window, actions, div,
    prelude::FluentBuilder as _, px,
};
use gpui_component::{ActiveTheme as _, h_flex, v_flex};
use gpui_sortable_core::{
    ActivationState, ContainerRenderProps, CursorKind, Direction, DragSession, Droppable,
    ItemRenderProps, KeyboardSensor, NestedSource, Point, PointerActivation, Rect,
    ReorderingController, SharedCursor, SortMap, SortableId, SortableOptions, Transform,
};
use tracing::debug;

use crate::measure::{LayoutCache, measured, to_point};
use crate::overlay::SortableOverlay;

pub(crate) const CONTEXT: &str = "SortableContainers";

actions!(
    sortable,
    [PickUp, Cancel, MoveUp, MoveDown, MoveLeft, MoveRight]
);

pub(crate) fn init(cx: &mut App) {
    cx.bind_keys([
        KeyBinding::new("space", PickUp, Some(CONTEXT)),
        KeyBinding::new("enter", PickUp, Some(CONTEXT)),
        KeyBinding::new("escape", Cancel, Some(CONTEXT)),
        KeyBinding::new("up", MoveUp, Some(CONTEXT)),
        KeyBinding::new("down", MoveDown, Some(CONTEXT)),
        KeyBinding::new("left", MoveLeft, Some(CONTEXT)),
        KeyBinding::new("right", MoveRight, Some(CONTEXT)),
    ]);
}

pub(crate) type RenderContainer<C> =
    Rc<dyn Fn(&C, ContainerRenderProps, &mut Window, &mut App) -> AnyElement>;
pub(crate) type RenderItem<I> = Rc<dyn Fn(&I, ItemRenderProps, &mut Window, &mut App) -> AnyElement>;
type OnSortChange = Rc<dyn Fn(&SortMap, &mut Window, &mut App)>;

#[derive(Clone)]
pub(crate) struct SortableDrag {
    pub(crate) owner: EntityId,
    pub(crate) id: SortableId,
}

/// A pointer press that may or may not have turned into a drag yet.
struct PointerDrag {
    id: SortableId,
    origin: Point,
    activation: PointerActivation,
}

/// State for a board of sortable containers holding sortable items.
///
/// Owns a [`ReorderingController`] and feeds it from gpui drag, drop and
/// key events. Committed reorders are reported through
/// [`SortableContainersState::on_sort_change`] on the next effect cycle.
pub struct SortableContainersState<S: NestedSource + 'static> {
    focus_handle: FocusHandle,
    controller: ReorderingController<S>,
    layout: Rc<RefCell<LayoutCache>>,
    cursor: SharedCursor,
    pointer: Option<PointerDrag>,
    /// Rect of the dragged node while a keyboard drag runs.
    keyboard: Option<Rect>,
    selected: Option<SortableId>,
    handle_width: Pixels,
    column_width: Pixels,
    on_sort_change: Option<OnSortChange>,
    pub(crate) render_container: RenderContainer<S::Container>,
    pub(crate) render_item: RenderItem<S::Item>,
}

impl<S: NestedSource + 'static> SortableContainersState<S> {
    pub fn new(source: S, cx: &mut App) -> Self {
        Self {
            focus_handle: cx.focus_handle(),
            controller: ReorderingController::new(source, SortableOptions::default()),
            layout: Rc::default(),
            cursor: SharedCursor::default(),
            pointer: None,
            keyboard: None,
            selected: None,
            handle_width: px(24.),
            column_width: px(260.),
            on_sort_change: None,
            render_container: Rc::new(|_, _, _, _| div().into_any_element()),
            render_item: Rc::new(|_, _, _, _| div().into_any_element()),
        }
    }

    pub fn options(mut self, options: SortableOptions) -> Self {
        self.controller.set_options(options);
        self
    }

    /// Start drags only from a strip on the left edge of each node.
    pub fn handle(mut self, handle: bool) -> Self {
        let options = self.controller.options().clone().handle(handle);
        self.controller.set_options(options);
        self
    }

    pub fn handle_width(mut self, width: Pixels) -> Self {
        self.handle_width = width;
        self
    }

    pub fn disable_multiple_containers(mut self, disable: bool) -> Self {
        let options = self
            .controller
            .options()
            .clone()
            .disable_multiple_containers(disable);
        self.controller.set_options(options);
        self
    }

    pub fn column_width(mut self, width: Pixels) -> Self {
        self.column_width = width;
        self
    }

    /// Called once per drag that changed the order, with the full new map.
    pub fn on_sort_change(
        mut self,
        on_sort_change: impl Fn(&SortMap, &mut Window, &mut App) + 'static,
    ) -> Self {
        self.on_sort_change = Some(Rc::new(on_sort_change));
        self
    }

    /// Replace the source. Applied after the current drag, if any.
    pub fn set_source(&mut self, source: S, cx: &mut Context<Self>) {
        self.controller.set_source(source);
        cx.notify();
    }

    pub fn map(&self) -> &SortMap {
        self.controller.map()
    }

    pub fn controller(&self) -> &ReorderingController<S> {
        &self.controller
    }

    pub fn selected(&self) -> Option<&SortableId> {
        self.selected.as_ref()
    }

    pub(crate) fn cursor(&self) -> &SharedCursor {
        &self.cursor
    }

    fn droppables(&self) -> Vec<Droppable> {
        let layout = self.layout.borrow();
        let mut droppables = Vec::new();
        for (container, items) in self.controller.map().iter() {
            for id in std::iter::once(container).chain(items) {
                if let Some(rect) = layout.rect(id) {
                    droppables.push(
                        Droppable::new(id.clone(), rect).disabled(!self.controller.accepts_drop(id)),
                    );
                }
            }
        }
        droppables
    }

    fn transform_of(&self, id: &SortableId) -> Transform {
        let layout = self.layout.borrow();
        self.controller
            .sorting_transform(id, |id| layout.rect(id))
            .unwrap_or_default()
    }

    fn on_select(&mut self, id: SortableId, window: &mut Window, cx: &mut Context<Self>) {
        self.selected = Some(id);
        self.focus_handle.focus(window);
        cx.notify();
    }

    fn on_drag_start(&mut self, drag: &SortableDrag, window: &mut Window, cx: &mut Context<Self>) {
        if self.controller.is_dragging() {
            return;
        }
        let origin = to_point(window.mouse_position());
        let activation =
            PointerActivation::press(self.controller.options().activation, origin, Instant::now());
        let active = activation.is_active();
        self.selected = Some(drag.id.clone());
        self.pointer = Some(PointerDrag {
            id: drag.id.clone(),
            origin,
            activation,
        });
        if active {
            self.begin_pointer_drag(drag.id.clone());
        }
        cx.notify();
    }

    fn begin_pointer_drag(&mut self, id: SortableId) -> bool {
        let rect = self.layout.borrow().rect(&id);
        self.controller.drag_start(id, rect)
    }

    fn on_drag_move(
        &mut self,
        event: &DragMoveEvent<SortableDrag>,
        window: &mut Window,
        cx: &mut Context<Self>,
    ) {
        if event.drag(cx).owner != cx.entity_id() {
            return;
        }
        let position = to_point(event.event.position);
        let Some(pointer) = self.pointer.as_mut() else {
            return;
        };
        let activation = pointer.activation.move_to(position, Instant::now());
        let (id, origin) = (pointer.id.clone(), pointer.origin);

        if !self.controller.is_dragging() {
            if activation != ActivationState::Active || !self.begin_pointer_drag(id) {
                return;
            }
            cx.notify();
        }

        let Some(initial) = self.controller.session().and_then(DragSession::initial_rect) else {
            return;
        };
        let active_rect = initial.translate(position.x - origin.x, position.y - origin.y);
        self.update_over(active_rect, Some(position), window, cx);
    }

    fn update_over(
        &mut self,
        active_rect: Rect,
        pointer: Option<Point>,
        window: &mut Window,
        cx: &mut Context<Self>,
    ) {
        let droppables = self.droppables();
        let previous = self.controller.over().cloned();
        let over = self
            .controller
            .detect_collisions(active_rect, pointer, &droppables);
        let over_rect = over.as_ref().and_then(|id| self.layout.borrow().rect(id));

        if self
            .controller
            .drag_over(over.as_ref(), Some(active_rect), over_rect)
        {
            cx.on_next_frame(window, |this, _, cx| {
                this.controller.frame_settled();
                cx.notify();
            });
            cx.notify();
        } else if previous != over {
            cx.notify();
        }
    }

    fn on_drop(&mut self, drag: &SortableDrag, window: &mut Window, cx: &mut Context<Self>) {
        if drag.owner != cx.entity_id() {
            return;
        }
        self.pointer = None;
        let over = self.controller.over().cloned();
        self.finish(over, window, cx);
    }

    fn finish(&mut self, over: Option<SortableId>, window: &mut Window, cx: &mut Context<Self>) {
        let outcome = self.controller.drag_end(over.as_ref());
        if outcome.is_committed()
            && let Some(on_sort_change) = self.on_sort_change.clone()
        {
            let map = self.controller.map().clone();
            window.defer(cx, move |window, cx| on_sort_change(&map, window, cx));
        }
        cx.notify();
    }

    /// A pointer drag released outside the board never reaches `on_drop`.
    fn release_stale_drag(&mut self, cx: &mut Context<Self>) {
        if self.keyboard.is_some() || cx.has_active_drag() {
            return;
        }
        self.pointer = None;
        if self.controller.drag_cancel() {
            debug!("pointer drag released outside the board");
        }
    }

    fn on_pick_up(&mut self, _: &PickUp, window: &mut Window, cx: &mut Context<Self>) {
        if self.keyboard.take().is_some() {
            let over = self.controller.over().cloned();
            self.finish(over, window, cx);
            return;
        }
        if self.controller.is_dragging() {
            return;
        }
        let Some(id) = self.selected.clone() else {
            return;
        };
        let Some(rect) = self.layout.borrow().rect(&id) else {
            return;
        };
        if self.controller.drag_start(id, Some(rect)) {
            self.keyboard = Some(rect);
            self.update_over(rect, None, window, cx);
            cx.notify();
        }
    }

    fn on_cancel(&mut self, _: &Cancel, _: &mut Window, cx: &mut Context<Self>) {
        if self.keyboard.take().is_some() && self.controller.drag_cancel() {
            cx.notify();
        }
    }

    fn move_keyboard_drag(
        &mut self,
        direction: Direction,
        window: &mut Window,
        cx: &mut Context<Self>,
    ) {
        let (Some(rect), Some(active)) = (self.keyboard, self.controller.active().cloned()) else {
            return;
        };
        let droppables = self.droppables();
        let Some(next) = KeyboardSensor::next_coordinates(
            direction,
            &active,
            rect,
            &droppables,
            self.controller.map(),
        ) else {
            return;
        };
        let rect = rect.with_origin(next);
        self.keyboard = Some(rect);
        self.update_over(rect, None, window, cx);
        cx.notify();
    }

    fn on_move_up(&mut self, _: &MoveUp, window: &mut Window, cx: &mut Context<Self>) {
        self.move_keyboard_drag(Direction::Up, window, cx);
    }

    fn on_move_down(&mut self, _: &MoveDown, window: &mut Window, cx: &mut Context<Self>) {
        self.move_keyboard_drag(Direction::Down, window, cx);
    }

    fn on_move_left(&mut self, _: &MoveLeft, window: &mut Window, cx: &mut Context<Self>) {
        self.move_keyboard_drag(Direction::Left, window, cx);
    }

    fn on_move_right(&mut self, _: &MoveRight, window: &mut Window, cx: &mut Context<Self>) {
        self.move_keyboard_drag(Direction::Right, window, cx);
    }

    /// Make `element` start a drag of `id`, either as a whole or through a
    /// handle strip on its left edge.
    fn draggable(
        &self,
        element: Stateful<Div>,
        id: &SortableId,
        cx: &mut Context<Self>,
    ) -> Stateful<Div> {
        if self.controller.is_disabled(id) {
            return element;
        }
        let state = cx.entity();
        let drag = SortableDrag {
            owner: cx.entity_id(),
            id: id.clone(),
        };
        let start_drag = move |drag: &SortableDrag,
                               _offset: gpui::Point<Pixels>,
                               window: &mut Window,
                               cx: &mut App| {
            state.update(cx, |state, cx| state.on_drag_start(drag, window, cx));
            let cursor = state.read(cx).cursor().clone();
            let state = state.clone();
            let id = drag.id.clone();
            cx.new(|_| SortableOverlay::new(state, id, cursor))
        };

        if self.controller.options().handle {
            element.child(
                div()
                    .id(ElementId::Name(format!("{id}-handle").into()))
                    .absolute()
                    .top_0()
                    .left_0()
                    .bottom_0()
                    .w(self.handle_width)
                    .cursor(CursorStyle::OpenHand)
                    .on_drag(drag, start_drag),
            )
        } else {
            element.cursor(CursorStyle::OpenHand).on_drag(drag, start_drag)
        }
    }

    fn render_entry(
        &self,
        id: &SortableId,
        window: &mut Window,
        cx: &mut Context<Self>,
    ) -> Option<AnyElement> {
        let item = self.controller.source_item(id)?;
        let transform = self.transform_of(id);
        let props = {
            let layout = self.layout.borrow();
            self.controller.item_props(id, false, |id| layout.rect(id))
        };
        let content = (self.render_item)(item, props, window, cx);
        let selected = self.selected.as_ref() == Some(id);

        let select_id = id.clone();
        let entry = div()
            .id(ElementId::Name(id.to_string().into()))
            .relative()
            .top(px(transform.y))
            .left(px(transform.x))
            .when(selected && self.focus_handle.is_focused(window), |this| {
                this.border_1().border_color(cx.theme().ring).rounded(px(6.))
            })
            .child(content)
            .on_click(cx.listener(move |this, _, window, cx| {
                this.on_select(select_id.clone(), window, cx);
            }));

        Some(
            measured(
                id.clone(),
                transform,
                self.layout.clone(),
                self.draggable(entry, id, cx),
            )
            .into_any_element(),
        )
    }

    fn render_column(
        &self,
        id: &SortableId,
        window: &mut Window,
        cx: &mut Context<Self>,
    ) -> Option<AnyElement> {
        let container = self.controller.source_container(id)?;
        let props = self.controller.container_props(id);
        let is_hovered = props.is_hovered;
        let transform = self.transform_of(id);
        let header = (self.render_container)(container, props, window, cx);

        let select_id = id.clone();
        let header = div()
            .id(ElementId::Name(format!("{id}-header").into()))
            .relative()
            .child(header)
            .on_click(cx.listener(move |this, _, window, cx| {
                this.on_select(select_id.clone(), window, cx);
            }));
        let header = self.draggable(header, id, cx);
        let entries = self
            .controller
            .items(id)
            .iter()
            .filter_map(|item| self.render_entry(item, window, cx))
            .collect::<Vec<_>>();

        let theme = cx.theme();
        let column = v_flex()
            .id(ElementId::Name(id.to_string().into()))
            .relative()
            .top(px(transform.y))
            .left(px(transform.x))
            .w(self.column_width)
            .gap_y_2()
            .p_2()
            .rounded(px(10.))
            .border_1()
            .border_color(theme.border)
            .bg(theme.background)
            .when(is_hovered, |this| {
                this.bg(theme.drop_target).border_color(theme.drag_border)
            })
            .when(self.selected.as_ref() == Some(id), |this| {
                this.border_color(theme.ring)
            })
            .child(header)
            .child(v_flex().gap_y_1().min_h(px(48.)).children(entries));

        Some(measured(id.clone(), transform, self.layout.clone(), column).into_any_element())
    }

    /// The floating copy of `id` drawn under the pointer while dragging.
    pub(crate) fn render_overlay(
        &self,
        id: &SortableId,
        window: &mut Window,
        cx: &mut App,
    ) -> AnyElement {
        let width = self.layout.borrow().rect(id).map(|rect| px(rect.width()));
        let content = match id {
            SortableId::Container(_) => self.render_container_overlay(id, window, cx),
            SortableId::Item(_) => self.controller.source_item(id).map(|item| {
                let props = self.controller.item_props(id, true, |_| None);
                (self.render_item)(item, props, window, cx)
            }),
        };
        div()
            .when_some(width, |this, width| this.w(width))
            .children(content)
            .into_any_element()
    }

    fn render_container_overlay(
        &self,
        id: &SortableId,
        window: &mut Window,
        cx: &mut App,
    ) -> Option<AnyElement> {
        let container = self.controller.source_container(id)?;
        let mut props = self.controller.container_props(id);
        props.is_hovered = false;
        let header = (self.render_container)(container, props, window, cx);
        let items = self
            .controller
            .items(id)
            .iter()
            .filter_map(|item_id| {
                let item = self.controller.source_item(item_id)?;
                let props = self.controller.item_props(item_id, true, |_| None);
                Some((self.render_item)(item, props, window, cx))
            })
            .collect::<Vec<_>>();

        let theme = cx.theme();
        Some(
            v_flex()
                .gap_y_2()
                .p_2()
                .rounded(px(10.))
                .border_1()
                .border_color(theme.drag_border)
                .bg(theme.background)
                .child(header)
                .child(v_flex().gap_y_1().children(items))
                .into_any_element(),
        )
    }
}

fn cursor_style(cursor: CursorKind) -> CursorStyle {
    match cursor {
        CursorKind::Default => CursorStyle::Arrow,
        CursorKind::Grab => CursorStyle::OpenHand,
        CursorKind::Grabbing => CursorStyle::ClosedHand,
    }
}

impl<S: NestedSource + 'static> Render for SortableContainersState<S> {
    fn render(&mut self, window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        self.release_stale_drag(cx);
        {
            let map = self.controller.map();
            self.layout.borrow_mut().retain(|id| map.find_container(id).is_some());
        }

        let columns = self
            .controller
            .containers()
            .filter_map(|id| self.render_column(id, window, cx))
            .collect::<Vec<_>>();

        h_flex()
            .id("sortable-containers")
            .key_context(CONTEXT)
            .track_focus(&self.focus_handle)
            .items_start()
            .gap_x_3()
            .cursor(cursor_style(self.cursor.get()))
            .on_action(cx.listener(Self::on_pick_up))
            .on_action(cx.listener(Self::on_cancel))
            .on_action(cx.listener(Self::on_move_up))
            .on_action(cx.listener(Self::on_move_down))
            .on_action(cx.listener(Self::on_move_left))
            .on_action(cx.listener(Self::on_move_right))
            .on_drag_move::<SortableDrag>(cx.listener(Self::on_drag_move))
            .on_drop::<SortableDrag>(cx.listener(Self::on_drop))
            .children(columns)
    }
}
