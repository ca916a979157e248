mod measure;
mod overlay;
mod sortable;
mod state;

use gpui::App;

pub use gpui_sortable_core::{
    ActivationConstraint, ContainerRenderProps, HandleProps, ItemRenderProps, JsonSource,
    NestedSource, RawId, SortMap, SortableId, SortableOptions, SortingStrategy, Transform,
};
pub use sortable::{SortableContainers, sortable_containers};
pub use state::{
    Cancel, MoveDown, MoveLeft, MoveRight, MoveUp, PickUp, SortableContainersState,
};

/// Register the keyboard drag bindings. Call once at startup.
pub fn init(cx: &mut App) {
    state::init(cx);
}
