use serde::{Deserialize, Serialize};

use crate::error::SortableError;
use crate::sensor::ActivationConstraint;
use crate::sorting::SortingStrategy;

pub const DEFAULT_NESTED_ITEMS_ACCESSOR: &str = "children";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SortableOptions {
    /// Drags start only from a dedicated handle instead of the whole node.
    pub handle: bool,
    /// Items may be reordered inside their container but never leave it.
    pub disable_multiple_containers: bool,
    /// Field holding the nested items when the source is JSON.
    pub nested_items_accessor: String,
    pub strategy: SortingStrategy,
    /// When a pointer press turns into a drag. `None` activates immediately.
    pub activation: Option<ActivationConstraint>,
}

impl Default for SortableOptions {
    fn default() -> Self {
        Self {
            handle: false,
            disable_multiple_containers: false,
            nested_items_accessor: DEFAULT_NESTED_ITEMS_ACCESSOR.to_string(),
            strategy: SortingStrategy::default(),
            activation: None,
        }
    }
}

impl SortableOptions {
    pub fn from_json(json: &str) -> Result<Self, SortableError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn handle(mut self, handle: bool) -> Self {
        self.handle = handle;
        self
    }

    pub fn disable_multiple_containers(mut self, disable: bool) -> Self {
        self.disable_multiple_containers = disable;
        self
    }

    pub fn nested_items_accessor(mut self, accessor: impl Into<String>) -> Self {
        self.nested_items_accessor = accessor.into();
        self
    }

    pub fn strategy(mut self, strategy: SortingStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn activation(mut self, activation: Option<ActivationConstraint>) -> Self {
        self.activation = activation;
        self
    }
}
