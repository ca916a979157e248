use serde::{Deserialize, Serialize};

use crate::geometry::{Rect, Transform};
use crate::map::array_move;

/// How siblings make room for the dragged node while sorting.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortingStrategy {
    /// A single column; siblings slide by the dragged node's height.
    #[default]
    VerticalList,
    /// Any layout; each sibling moves to the slot it will occupy after the drop.
    Rect,
}

impl SortingStrategy {
    /// Transform for the node at `index` given measured `rects` of all
    /// siblings in order.
    pub fn transform(
        self,
        rects: &[Rect],
        active_index: usize,
        over_index: usize,
        index: usize,
    ) -> Option<Transform> {
        match self {
            SortingStrategy::VerticalList => {
                vertical_list_transform(rects, active_index, over_index, index)
            }
            SortingStrategy::Rect => rect_sorting_transform(rects, active_index, over_index, index),
        }
    }
}

fn item_gap(rects: &[Rect], index: usize, active_index: usize) -> f32 {
    let Some(current) = rects.get(index) else {
        return 0.;
    };
    let previous = index.checked_sub(1).and_then(|ix| rects.get(ix));
    let next = rects.get(index + 1);
    let gap_before = previous.map(|p| current.top() - p.bottom());
    let gap_after = next.map(|n| n.top() - current.bottom());

    if active_index < index {
        gap_before.or(gap_after).unwrap_or(0.)
    } else {
        gap_after.or(gap_before).unwrap_or(0.)
    }
}

pub fn vertical_list_transform(
    rects: &[Rect],
    active_index: usize,
    over_index: usize,
    index: usize,
) -> Option<Transform> {
    let active = rects.get(active_index)?;

    if index == active_index {
        let over = rects.get(over_index)?;
        let dy = if active_index < over_index {
            over.bottom() - active.bottom()
        } else {
            over.top() - active.top()
        };
        return Some(Transform::translate(0., dy));
    }

    let gap = item_gap(rects, index, active_index);
    if index > active_index && index <= over_index {
        return Some(Transform::translate(0., -active.height() - gap));
    }
    if index < active_index && index >= over_index {
        return Some(Transform::translate(0., active.height() + gap));
    }
    Some(Transform::IDENTITY)
}

pub fn rect_sorting_transform(
    rects: &[Rect],
    active_index: usize,
    over_index: usize,
    index: usize,
) -> Option<Transform> {
    if over_index >= rects.len() || active_index >= rects.len() {
        return None;
    }
    let mut moved = rects.to_vec();
    array_move(&mut moved, over_index, active_index);
    let old = rects.get(index)?;
    let new = moved.get(index)?;
    if old.width() == 0. || old.height() == 0. {
        return None;
    }
    Some(Transform {
        x: new.left() - old.left(),
        y: new.top() - old.top(),
        scale_x: new.width() / old.width(),
        scale_y: new.height() / old.height(),
    })
}
