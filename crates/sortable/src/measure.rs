use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use gpui::{
    AnyElement, App, Bounds, Element, ElementId, GlobalElementId, InspectorElementId, IntoElement,
    LayoutId, Pixels, Window,
};
use gpui_sortable_core::{Point, Rect, SortableId, Transform};

/// Untransformed window rects of every sortable node, refreshed each prepaint.
#[derive(Default)]
pub(crate) struct LayoutCache {
    rects: HashMap<SortableId, Rect>,
}

impl LayoutCache {
    /// Store the layout rect of `id`, undoing the sorting `offset` it was
    /// painted with.
    pub(crate) fn record(&mut self, id: SortableId, bounds: Bounds<Pixels>, offset: Transform) {
        self.rects
            .insert(id, to_rect(bounds).translate(-offset.x, -offset.y));
    }

    pub(crate) fn rect(&self, id: &SortableId) -> Option<Rect> {
        self.rects.get(id).copied()
    }

    pub(crate) fn retain(&mut self, keep: impl Fn(&SortableId) -> bool) {
        self.rects.retain(|id, _| keep(id));
    }
}

pub(crate) fn to_rect(bounds: Bounds<Pixels>) -> Rect {
    Rect::new(
        f32::from(bounds.origin.x),
        f32::from(bounds.origin.y),
        f32::from(bounds.size.width),
        f32::from(bounds.size.height),
    )
}

pub(crate) fn to_point(point: gpui::Point<Pixels>) -> Point {
    Point::new(f32::from(point.x), f32::from(point.y))
}

/// Wraps a sortable node and records its bounds into a [`LayoutCache`].
pub(crate) struct Measured {
    id: SortableId,
    offset: Transform,
    layout: Rc<RefCell<LayoutCache>>,
    child: AnyElement,
}

pub(crate) fn measured(
    id: SortableId,
    offset: Transform,
    layout: Rc<RefCell<LayoutCache>>,
    child: impl IntoElement,
) -> Measured {
    Measured {
        id,
        offset,
        layout,
        child: child.into_any_element(),
    }
}

impl IntoElement for Measured {
    type Element = Self;

    fn into_element(self) -> Self::Element {
        self
    }
}

impl Element for Measured {
    type RequestLayoutState = ();
    type PrepaintState = ();

    fn id(&self) -> Option<ElementId> {
        None
    }

    fn source_location(&self) -> Option<&'static core::panic::Location<'static>> {
        None
    }

    fn request_layout(
        &mut self,
        _id: Option<&GlobalElementId>,
        _inspector_id: Option<&InspectorElementId>,
        window: &mut Window,
        cx: &mut App,
    ) -> (LayoutId, Self::RequestLayoutState) {
        (self.child.request_layout(window, cx), ())
    }

    fn prepaint(
        &mut self,
        _id: Option<&GlobalElementId>,
        _inspector_id: Option<&InspectorElementId>,
        bounds: Bounds<Pixels>,
        _: &mut Self::RequestLayoutState,
        window: &mut Window,
        cx: &mut App,
    ) -> Self::PrepaintState {
        self.layout
            .borrow_mut()
            .record(self.id.clone(), bounds, self.offset);
        self.child.prepaint(window, cx);
    }

    fn paint(
        &mut self,
        _id: Option<&GlobalElementId>,
        _inspector_id: Option<&InspectorElementId>,
        _bounds: Bounds<Pixels>,
        _: &mut Self::RequestLayoutState,
        _: &mut Self::PrepaintState,
        window: &mut Window,
        cx: &mut App,
    ) {
        self.child.paint(window, cx);
    }
}
