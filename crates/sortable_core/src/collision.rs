//! Collision strategies over measured droppable rects.
//!
//! Every strategy skips disabled droppables and returns its matches best
//! first. Ties keep registration order.

use crate::geometry::{Point, Rect};
use crate::id::SortableId;

/// A measured drop target.
#[derive(Clone, Debug, PartialEq)]
pub struct Droppable {
    pub id: SortableId,
    pub rect: Rect,
    pub disabled: bool,
}

impl Droppable {
    pub fn new(id: SortableId, rect: Rect) -> Self {
        Self {
            id,
            rect,
            disabled: false,
        }
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }
}

/// A droppable matched by a strategy. `value` is the strategy's score: a
/// distance for the distance based strategies, an overlap ratio for
/// [`rect_intersection`].
#[derive(Clone, Debug, PartialEq)]
pub struct Collision {
    pub id: SortableId,
    pub value: f32,
}

fn sort_ascending(mut collisions: Vec<Collision>) -> Vec<Collision> {
    collisions.sort_by(|a, b| a.value.total_cmp(&b.value));
    collisions
}

/// Droppables ordered by the distance between their center and the center of
/// the dragged rect.
pub fn closest_center<'a>(
    active_rect: Rect,
    droppables: impl IntoIterator<Item = &'a Droppable>,
) -> Vec<Collision> {
    let center = active_rect.center();
    sort_ascending(
        droppables
            .into_iter()
            .filter(|d| !d.disabled)
            .map(|d| Collision {
                id: d.id.clone(),
                value: center.distance(d.rect.center()),
            })
            .collect(),
    )
}

/// Droppables ordered by the mean distance between matching corners.
pub fn closest_corners<'a>(
    active_rect: Rect,
    droppables: impl IntoIterator<Item = &'a Droppable>,
) -> Vec<Collision> {
    let corners = active_rect.corners();
    sort_ascending(
        droppables
            .into_iter()
            .filter(|d| !d.disabled)
            .map(|d| {
                let total: f32 = corners
                    .iter()
                    .zip(d.rect.corners())
                    .map(|(a, b)| a.distance(b))
                    .sum();
                Collision {
                    id: d.id.clone(),
                    value: total / 4.,
                }
            })
            .collect(),
    )
}

/// Droppables overlapping the dragged rect, largest overlap ratio first.
pub fn rect_intersection<'a>(
    active_rect: Rect,
    droppables: impl IntoIterator<Item = &'a Droppable>,
) -> Vec<Collision> {
    let mut collisions: Vec<Collision> = droppables
        .into_iter()
        .filter(|d| !d.disabled)
        .filter_map(|d| {
            let overlap = active_rect.intersection_area(&d.rect);
            if overlap <= 0. {
                return None;
            }
            let union = active_rect.area() + d.rect.area() - overlap;
            Some(Collision {
                id: d.id.clone(),
                value: overlap / union,
            })
        })
        .collect();
    collisions.sort_by(|a, b| b.value.total_cmp(&a.value));
    collisions
}

/// Droppables containing the pointer, ordered by the mean distance from the
/// pointer to their corners. Without a pointer (keyboard drags) nothing matches.
pub fn pointer_within<'a>(
    pointer: Option<Point>,
    droppables: impl IntoIterator<Item = &'a Droppable>,
) -> Vec<Collision> {
    let Some(pointer) = pointer else {
        return Vec::new();
    };
    sort_ascending(
        droppables
            .into_iter()
            .filter(|d| !d.disabled && d.rect.contains(pointer))
            .map(|d| {
                let total: f32 = d.rect.corners().iter().map(|c| c.distance(pointer)).sum();
                Collision {
                    id: d.id.clone(),
                    value: total / 4.,
                }
            })
            .collect(),
    )
}
