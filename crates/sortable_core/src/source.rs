use serde_json::Value;

use crate::error::{SortableError, json_kind};
use crate::id::RawId;
use crate::options::SortableOptions;

/// A caller owned collection of containers, each holding nested items.
///
/// Identifiers must be unique across the whole collection and every item
/// must sit in exactly one container. The engine does not check this; it
/// stays deterministic when the contract is broken (first match wins).
/// Entries without an identifier are skipped.
pub trait NestedSource {
    type Container;
    type Item;

    fn containers(&self) -> &[Self::Container];
    fn container_id(&self, container: &Self::Container) -> Option<RawId>;
    fn items<'a>(&'a self, container: &'a Self::Container) -> &'a [Self::Item];
    fn item_id(&self, item: &Self::Item) -> Option<RawId>;

    /// Disabled containers can neither be dragged nor dropped on.
    fn container_disabled(&self, _container: &Self::Container) -> bool {
        false
    }

    fn item_disabled(&self, _item: &Self::Item) -> bool {
        false
    }
}

/// A JSON array of container objects, with the nested items read from a
/// configurable field (`children` by default).
#[derive(Clone, Debug, PartialEq)]
pub struct JsonSource {
    containers: Vec<Value>,
    accessor: String,
}

impl JsonSource {
    pub fn new(value: Value, accessor: impl Into<String>) -> Result<Self, SortableError> {
        let accessor = accessor.into();
        let containers = match value {
            Value::Array(containers) => containers,
            other => {
                return Err(SortableError::NotAnArray {
                    found: json_kind(&other),
                });
            }
        };

        for container in &containers {
            match container.get(&accessor) {
                None | Some(Value::Null) | Some(Value::Array(_)) => {}
                Some(_) => {
                    return Err(SortableError::InvalidAccessor {
                        accessor,
                        container: container
                            .get("id")
                            .map(Value::to_string)
                            .unwrap_or_else(|| "<no id>".to_string()),
                    });
                }
            }
        }

        Ok(Self {
            containers,
            accessor,
        })
    }

    pub fn with_options(value: Value, options: &SortableOptions) -> Result<Self, SortableError> {
        Self::new(value, options.nested_items_accessor.clone())
    }

    pub fn accessor(&self) -> &str {
        &self.accessor
    }
}

impl NestedSource for JsonSource {
    type Container = Value;
    type Item = Value;

    fn containers(&self) -> &[Value] {
        &self.containers
    }

    fn container_id(&self, container: &Value) -> Option<RawId> {
        container.get("id").and_then(RawId::from_json)
    }

    fn items<'a>(&'a self, container: &'a Value) -> &'a [Value] {
        container
            .get(&self.accessor)
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    fn item_id(&self, item: &Value) -> Option<RawId> {
        item.get("id").and_then(RawId::from_json)
    }

    fn container_disabled(&self, container: &Value) -> bool {
        is_disabled(container)
    }

    fn item_disabled(&self, item: &Value) -> bool {
        is_disabled(item)
    }
}

fn is_disabled(value: &Value) -> bool {
    value
        .get("disabled")
        .and_then(Value::as_bool)
        .unwrap_or(false)
}
