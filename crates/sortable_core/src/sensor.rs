use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::collision::{Droppable, closest_corners};
use crate::geometry::{Point, Rect};
use crate::id::SortableId;
use crate::map::SortMap;

/// Condition a pointer press must meet before it becomes a drag.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ActivationConstraint {
    /// Activate once the pointer travelled at least `distance`.
    Distance { distance: f32 },
    /// Activate after holding for `delay_ms`; moving further than
    /// `tolerance` before that aborts the press.
    Delay { delay_ms: u64, tolerance: f32 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActivationState {
    Pending,
    Active,
    Aborted,
}

/// Tracks a single pointer press against an [`ActivationConstraint`].
#[derive(Clone, Debug)]
pub struct PointerActivation {
    constraint: Option<ActivationConstraint>,
    origin: Point,
    pressed_at: Instant,
    state: ActivationState,
}

impl PointerActivation {
    pub fn press(constraint: Option<ActivationConstraint>, origin: Point, now: Instant) -> Self {
        let state = match constraint {
            None => ActivationState::Active,
            Some(_) => ActivationState::Pending,
        };
        Self {
            constraint,
            origin,
            pressed_at: now,
            state,
        }
    }

    pub fn state(&self) -> ActivationState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == ActivationState::Active
    }

    /// Feed a pointer position. Once active or aborted the state is final.
    pub fn move_to(&mut self, position: Point, now: Instant) -> ActivationState {
        if self.state != ActivationState::Pending {
            return self.state;
        }
        let travelled = self.origin.distance(position);
        self.state = match self.constraint {
            None => ActivationState::Active,
            Some(ActivationConstraint::Distance { distance }) => {
                if travelled >= distance {
                    ActivationState::Active
                } else {
                    ActivationState::Pending
                }
            }
            Some(ActivationConstraint::Delay {
                delay_ms,
                tolerance,
            }) => {
                if travelled > tolerance {
                    ActivationState::Aborted
                } else if now.saturating_duration_since(self.pressed_at)
                    >= Duration::from_millis(delay_ms)
                {
                    ActivationState::Active
                } else {
                    ActivationState::Pending
                }
            }
        };
        self.state
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Arrow key navigation for keyboard drags.
pub struct KeyboardSensor;

impl KeyboardSensor {
    /// Where the dragged rect should jump for one key press: the top left
    /// corner of the closest droppable lying in `direction`.
    ///
    /// A dragged container only visits containers. A dragged item visits
    /// items and empty containers.
    pub fn next_coordinates(
        direction: Direction,
        active: &SortableId,
        active_rect: Rect,
        droppables: &[Droppable],
        map: &SortMap,
    ) -> Option<Point> {
        let candidates: Vec<&Droppable> = droppables
            .iter()
            .filter(|d| !d.disabled && d.id != *active)
            .filter(|d| {
                if active.is_container() {
                    d.id.is_container()
                } else {
                    d.id.is_item() || map.items(&d.id).is_empty()
                }
            })
            .filter(|d| match direction {
                Direction::Down => active_rect.top() < d.rect.top(),
                Direction::Up => active_rect.top() > d.rect.top(),
                Direction::Left => active_rect.left() >= d.rect.right(),
                Direction::Right => active_rect.right() <= d.rect.left(),
            })
            .collect();

        let closest = closest_corners(active_rect, candidates).into_iter().next()?;
        droppables
            .iter()
            .find(|d| d.id == closest.id)
            .map(|d| d.rect.origin)
    }
}
