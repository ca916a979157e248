use std::cell::RefCell;
use std::rc::Rc;

use gpui_sortable_core::{
    DragOutcome, Droppable, JsonSource, OverTarget, Point, Rect, ReorderingController, SortMap,
    SortableId, SortableOptions,
};
use serde_json::{Value, json};

type Commits = Rc<RefCell<Vec<SortMap>>>;

fn course() -> Value {
    json!([
        { "id": "c1", "children": [{ "id": 1 }, { "id": 2 }, { "id": 3 }] },
        { "id": "c2", "children": [{ "id": 4 }] },
    ])
}

fn controller_with(
    value: Value,
    options: SortableOptions,
) -> (ReorderingController<JsonSource>, Commits) {
    let commits: Commits = Rc::default();
    let sink = commits.clone();
    let source = JsonSource::with_options(value, &options).unwrap();
    let controller = ReorderingController::new(source, options)
        .on_sort_change(move |map| sink.borrow_mut().push(map.clone()));
    (controller, commits)
}

fn controller() -> (ReorderingController<JsonSource>, Commits) {
    controller_with(course(), SortableOptions::default())
}

fn item(id: i64) -> SortableId {
    SortableId::item(id)
}

fn container(id: &str) -> SortableId {
    SortableId::container(id)
}

/// Containers side by side, 200px apart; items stacked 40px apart inside.
fn layout(map: &SortMap) -> Vec<Droppable> {
    let mut droppables = Vec::new();
    for (column, (container, items)) in map.iter().enumerate() {
        let x = column as f32 * 200.;
        droppables.push(Droppable::new(
            container.clone(),
            Rect::new(x, 0., 180., 400.),
        ));
        for (ix, item) in items.iter().enumerate() {
            droppables.push(Droppable::new(
                item.clone(),
                Rect::new(x + 10., 40. + ix as f32 * 40., 160., 30.),
            ));
        }
    }
    droppables
}

#[test]
fn example_move_item_to_end_of_other_container() {
    let (mut c, commits) = controller();

    assert!(c.drag_start(item(2), None));
    assert!(c.drag_over(Some(&container("c2")), None, None));
    let outcome = c.drag_end(Some(&item(2)));

    assert_eq!(
        outcome,
        DragOutcome::MovedAcross {
            item: item(2),
            container: container("c2"),
        }
    );
    let commits = commits.borrow();
    assert_eq!(commits.len(), 1);
    assert_eq!(
        serde_json::to_value(&commits[0]).unwrap(),
        json!({
            "container-c1": ["item-1", "item-3"],
            "container-c2": ["item-4", "item-2"],
        })
    );
}

#[test]
fn example_reorder_containers() {
    let (mut c, commits) = controller();

    assert!(c.drag_start(container("c2"), None));
    let outcome = c.drag_end(Some(&container("c1")));

    assert_eq!(
        outcome,
        DragOutcome::ContainersReordered {
            container: container("c2"),
            from: 1,
            to: 0,
        }
    );
    let committed = &commits.borrow()[0];
    let order: Vec<_> = committed.containers().cloned().collect();
    assert_eq!(order, vec![container("c2"), container("c1")]);
    assert_eq!(
        committed.items(&container("c1")),
        &[item(1), item(2), item(3)]
    );
    assert_eq!(committed.items(&container("c2")), &[item(4)]);
}

#[test]
fn example_disabled_multiple_containers_rejects_cross_drop() {
    let (mut c, commits) =
        controller_with(course(), SortableOptions::default().disable_multiple_containers(true));
    let before = c.map().clone();

    c.drag_start(item(2), None);
    assert!(!c.drag_over(Some(&container("c2")), None, None));
    assert_eq!(c.drag_end(Some(&container("c2"))), DragOutcome::Rejected);

    assert!(commits.borrow().is_empty());
    assert_eq!(c.map(), &before);
    assert_eq!(c.map().index_of(&container("c1"), &item(2)), Some(1));
}

fn locked_target() -> Value {
    json!([
        { "id": "a", "children": [{ "id": 1 }, { "id": 2 }] },
        { "id": "b", "disabled": true, "children": [{ "id": 3 }, { "id": 4 }] },
    ])
}

#[test]
fn disabled_container_rejects_incoming_drop() {
    let (mut c, commits) = controller_with(locked_target(), SortableOptions::default());
    let before = c.map().clone();

    assert!(c.drag_start(item(1), None));
    assert!(!c.drag_over(Some(&item(3)), None, None));
    assert_eq!(c.drag_end(Some(&item(3))), DragOutcome::Rejected);

    assert!(commits.borrow().is_empty());
    assert_eq!(c.map(), &before);
    assert_eq!(c.map().items(&container("b")), &[item(3), item(4)]);
}

#[test]
fn disabled_container_items_are_not_drop_targets_from_outside() {
    let (mut c, _) = controller_with(locked_target(), SortableOptions::default());

    c.drag_start(item(1), None);
    assert!(c.accepts_drop(&item(2)));
    assert!(!c.accepts_drop(&item(3)));
    assert!(!c.accepts_drop(&container("b")));
    c.drag_cancel();

    c.drag_start(item(3), None);
    assert!(c.accepts_drop(&item(4)));
    assert!(c.accepts_drop(&item(1)));
}

#[test]
fn disabled_container_still_reorders_its_own_items() {
    let (mut c, commits) = controller_with(locked_target(), SortableOptions::default());

    c.drag_start(item(3), None);
    let outcome = c.drag_end(Some(&item(4)));

    assert!(matches!(outcome, DragOutcome::ItemMoved { from: 0, to: 1, .. }));
    assert_eq!(commits.borrow()[0].items(&container("b")), &[item(4), item(3)]);
}

#[test]
fn disabled_multiple_containers_still_reorders_within() {
    let (mut c, commits) =
        controller_with(course(), SortableOptions::default().disable_multiple_containers(true));

    c.drag_start(item(1), None);
    let outcome = c.drag_end(Some(&item(3)));

    assert!(matches!(outcome, DragOutcome::ItemMoved { from: 0, to: 2, .. }));
    assert_eq!(
        commits.borrow()[0].items(&container("c1")),
        &[item(2), item(3), item(1)]
    );
}

#[test]
fn noop_drop_does_not_commit() {
    let (mut c, commits) = controller();
    let before = c.map().clone();

    c.drag_start(item(2), None);
    assert_eq!(c.drag_end(Some(&item(2))), DragOutcome::Unchanged);

    assert!(commits.borrow().is_empty());
    assert_eq!(c.map(), &before);
}

#[test]
fn out_and_back_again_does_not_commit() {
    let (mut c, commits) = controller();
    let before = c.map().clone();

    c.drag_start(item(2), None);
    c.drag_over(Some(&container("c2")), None, None);
    c.frame_settled();
    c.drag_over(Some(&item(3)), None, None);

    assert_eq!(c.map(), &before);
    assert_eq!(c.drag_end(Some(&item(2))), DragOutcome::Unchanged);
    assert!(commits.borrow().is_empty());
}

#[test]
fn cancel_restores_snapshot_exactly() {
    let (mut c, commits) = controller();
    let before = c.map().clone();

    c.drag_start(item(1), None);
    c.drag_over(Some(&item(4)), None, None);
    c.frame_settled();
    c.drag_over(Some(&container("c1")), None, None);
    assert!(c.drag_cancel());

    assert_eq!(c.map(), &before);
    assert!(commits.borrow().is_empty());
    assert!(!c.is_dragging());
    assert!(!c.drag_cancel());
}

#[test]
fn drop_without_target_restores_snapshot() {
    let (mut c, commits) = controller();
    let before = c.map().clone();

    c.drag_start(item(1), None);
    c.drag_over(Some(&item(4)), None, None);
    assert_eq!(c.drag_end(None), DragOutcome::Cancelled);

    assert_eq!(c.map(), &before);
    assert!(commits.borrow().is_empty());
}

#[test]
fn cross_container_move_updates_both_sides() {
    let (mut c, commits) = controller_with(
        json!([
            { "id": "a", "children": [{ "id": 1 }, { "id": 2 }, { "id": 3 }] },
            { "id": "b", "children": [{ "id": 4 }, { "id": 5 }, { "id": 6 }] },
        ]),
        SortableOptions::default(),
    );

    let over_rect = Rect::new(0., 100., 100., 30.);
    let below = Rect::new(0., 125., 100., 30.);
    c.drag_start(item(2), None);
    assert!(c.drag_over(Some(&item(5)), Some(below), Some(over_rect)));
    c.drag_end(Some(&item(2)));

    let committed = &commits.borrow()[0];
    assert_eq!(committed.items(&container("a")), &[item(1), item(3)]);
    assert_eq!(
        committed.items(&container("b")),
        &[item(4), item(5), item(2), item(6)]
    );
    assert_eq!(committed.item_count(), 6);
}

#[test]
fn item_dropped_above_hovered_item_lands_before_it() {
    let (mut c, _) = controller();

    let over_rect = Rect::new(0., 100., 100., 30.);
    let above = Rect::new(0., 80., 100., 30.);
    c.drag_start(item(1), None);
    c.drag_over(Some(&item(4)), Some(above), Some(over_rect));

    assert_eq!(c.map().items(&container("c2")), &[item(1), item(4)]);
}

#[test]
fn move_across_then_reorder_commits_once() {
    let (mut c, commits) = controller();

    c.drag_start(item(3), None);
    c.drag_over(Some(&container("c2")), None, None);
    assert_eq!(c.map().items(&container("c2")), &[item(4), item(3)]);
    let outcome = c.drag_end(Some(&item(4)));

    assert!(matches!(outcome, DragOutcome::ItemMoved { from: 1, to: 0, .. }));
    assert_eq!(commits.borrow().len(), 1);
    assert_eq!(
        commits.borrow()[0].items(&container("c2")),
        &[item(3), item(4)]
    );
}

#[test]
fn drop_across_without_drag_over_still_moves() {
    let (mut c, commits) = controller();

    c.drag_start(item(1), None);
    let outcome = c.drag_end(Some(&container("c2")));

    assert!(outcome.is_committed());
    assert_eq!(
        commits.borrow()[0].items(&container("c2")),
        &[item(4), item(1)]
    );
}

#[test]
fn drop_across_over_item_without_drag_over_lands_before_it() {
    let (mut c, commits) = controller_with(
        json!([
            { "id": "c1", "children": [{ "id": 1 }, { "id": 2 }] },
            { "id": "c2", "children": [{ "id": 4 }, { "id": 5 }] },
        ]),
        SortableOptions::default(),
    );

    c.drag_start(item(1), None);
    let outcome = c.drag_end(Some(&item(4)));

    assert!(matches!(outcome, DragOutcome::MovedAcross { .. }));
    assert_eq!(commits.borrow().len(), 1);
    assert_eq!(
        commits.borrow()[0].items(&container("c2")),
        &[item(1), item(4), item(5)]
    );
    assert_eq!(commits.borrow()[0].items(&container("c1")), &[item(2)]);
}

#[test]
fn drop_back_home_without_drag_over_is_unchanged() {
    let (mut c, commits) = controller();

    c.drag_start(item(1), None);
    assert!(c.drag_over(Some(&container("c2")), None, None));
    c.frame_settled();
    assert_eq!(c.drag_end(Some(&item(2))), DragOutcome::Unchanged);

    assert!(commits.borrow().is_empty());
    assert_eq!(c.map().items(&container("c1")), &[item(1), item(2), item(3)]);
}

#[test]
fn commit_payload_keeps_every_container_and_item() {
    let (mut c, commits) = controller();
    let before = c.map().clone();

    c.drag_start(item(3), None);
    c.drag_end(Some(&item(1)));

    let committed = &commits.borrow()[0];
    assert_eq!(committed.len(), before.len());
    assert_eq!(committed.item_count(), before.item_count());
    assert!(committed.validate().is_ok());
    assert_eq!(
        committed.items(&container("c1")),
        &[item(3), item(1), item(2)]
    );
    assert_eq!(committed.items(&container("c2")), before.items(&container("c2")));
}

#[test]
fn rebuild_is_idempotent() {
    let (mut c, _) = controller();
    let first = c.map().clone();

    assert!(c.set_source(c.source().clone()));
    assert_eq!(c.map(), &first);
    assert!(c.set_source(c.source().clone()));
    assert_eq!(c.map(), &first);
}

#[test]
fn source_change_mid_drag_waits_for_gesture_end() {
    let (mut c, _) = controller();
    c.drag_start(item(1), None);
    c.drag_over(Some(&container("c2")), None, None);

    let next = JsonSource::new(
        json!([{ "id": "only", "children": [{ "id": 9 }] }]),
        "children",
    )
    .unwrap();
    assert!(!c.set_source(next));
    assert_eq!(c.session().unwrap().snapshot().len(), 2);

    c.drag_cancel();
    let order: Vec<_> = c.containers().cloned().collect();
    assert_eq!(order, vec![container("only")]);
    assert_eq!(c.items(&container("only")), &[item(9)]);
}

#[test]
fn duplicate_ids_stay_deterministic() {
    let (mut c, _) = controller_with(
        json!([
            { "id": "a", "children": [{ "id": 1 }, { "id": 1 }] },
            { "id": "b", "children": [{ "id": 1 }] },
        ]),
        SortableOptions::default(),
    );
    assert!(c.map().validate().is_err());

    c.drag_start(item(1), None);
    c.drag_over(Some(&container("b")), None, None);
    c.drag_end(Some(&item(1)));
    c.drag_start(item(1), None);
    c.drag_cancel();
    assert_eq!(c.map().item_count(), 3);
}

#[test]
fn collisions_resolve_item_under_pointer() {
    let (mut c, _) = controller();
    let droppables = layout(c.map());
    c.drag_start(item(1), None);

    // Item 4 is the first row of the second column.
    let pointer = Point::new(250., 50.);
    let active_rect = Rect::new(210., 40., 160., 30.);
    assert_eq!(
        c.detect_collisions(active_rect, Some(pointer), &droppables),
        Some(item(4))
    );
    assert_eq!(c.over(), Some(&item(4)));
}

#[test]
fn collisions_refine_container_shell_to_nearest_item() {
    let (mut c, _) = controller();
    let droppables = layout(c.map());
    c.drag_start(item(4), None);

    // Empty space at the bottom of the first column, below item 3.
    let pointer = Point::new(50., 300.);
    let active_rect = Rect::new(10., 290., 160., 30.);
    assert_eq!(
        c.detect_collisions(active_rect, Some(pointer), &droppables),
        Some(item(3))
    );
}

#[test]
fn collisions_keep_empty_container_as_target() {
    let (mut c, _) = controller_with(
        json!([
            { "id": "c1", "children": [{ "id": 1 }] },
            { "id": "c2", "children": [] },
        ]),
        SortableOptions::default(),
    );
    let droppables = layout(c.map());
    c.drag_start(item(1), None);

    let over = c.detect_collisions(
        Rect::new(210., 100., 160., 30.),
        Some(Point::new(250., 110.)),
        &droppables,
    );
    assert_eq!(over, Some(container("c2")));
    assert!(c.drag_over(over.as_ref(), None, None));
    assert_eq!(c.items(&container("c2")), &[item(1)]);
}

#[test]
fn keyboard_collisions_fall_back_to_rect_intersection() {
    let (mut c, _) = controller();
    let droppables = layout(c.map());
    c.drag_start(item(1), None);

    let over = c.detect_collisions(Rect::new(10., 85., 160., 30.), None, &droppables);
    assert_eq!(over, Some(item(2)));
}

#[test]
fn empty_frame_reuses_last_target() {
    let (mut c, _) = controller();
    let droppables = layout(c.map());
    c.drag_start(item(1), None);

    c.detect_collisions(
        Rect::new(10., 80., 160., 30.),
        Some(Point::new(50., 90.)),
        &droppables,
    );
    let far_away = Rect::new(5000., 5000., 10., 10.);
    assert_eq!(
        c.detect_collisions(far_away, Some(Point::new(5000., 5000.)), &droppables),
        Some(item(2))
    );
    assert_eq!(
        c.session().unwrap().target(),
        &OverTarget::Cached(item(2))
    );
}

#[test]
fn empty_frame_after_move_pins_active_until_settled() {
    let (mut c, _) = controller();
    let droppables = layout(c.map());
    c.drag_start(item(1), None);
    c.drag_over(Some(&container("c2")), None, None);

    let far_away = Rect::new(5000., 5000., 10., 10.);
    assert_eq!(
        c.detect_collisions(far_away, None, &droppables),
        Some(item(1))
    );
    c.frame_settled();
    assert_eq!(
        c.detect_collisions(far_away, None, &droppables),
        Some(item(1))
    );
}

#[test]
fn container_drag_only_sees_containers() {
    let (mut c, _) = controller();
    let droppables = layout(c.map());
    c.drag_start(container("c1"), None);

    // Sitting right on top of item 4, but containers only match containers.
    let over = c.detect_collisions(
        Rect::new(210., 40., 160., 30.),
        Some(Point::new(250., 50.)),
        &droppables,
    );
    assert_eq!(over, Some(container("c2")));
    assert!(!c.drag_over(over.as_ref(), None, None));
    assert!(c.drag_end(over.as_ref()).is_committed());
}

#[test]
fn container_props_track_hover_through_items() {
    let (mut c, _) = controller();
    let droppables = layout(c.map());
    c.drag_start(item(1), None);
    c.detect_collisions(
        Rect::new(210., 40., 160., 30.),
        Some(Point::new(250., 50.)),
        &droppables,
    );

    assert!(c.container_props(&container("c2")).is_hovered);
    assert!(!c.container_props(&container("c1")).is_hovered);
    let placeholder = c.item_props(&item(1), false, |_| None);
    assert!(placeholder.is_dragging);
    assert!(c.item_props(&item(2), false, |_| None).is_sorting);
}

#[test]
fn sorting_transform_opens_gap_in_active_container() {
    let (mut c, _) = controller();
    let droppables = layout(c.map());
    let rect_of = |id: &SortableId| {
        droppables
            .iter()
            .find(|d| d.id == *id)
            .map(|d| d.rect)
    };
    c.drag_start(item(1), None);
    c.detect_collisions(
        Rect::new(10., 120., 160., 30.),
        Some(Point::new(50., 130.)),
        &droppables,
    );
    assert_eq!(c.over(), Some(&item(3)));

    let t2 = c.sorting_transform(&item(2), rect_of).unwrap();
    let t3 = c.sorting_transform(&item(3), rect_of).unwrap();
    assert_eq!(t2.y, -40.);
    assert_eq!(t3.y, -40.);
    assert!(c.sorting_transform(&item(4), rect_of).is_none());
}
