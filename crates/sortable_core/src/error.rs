use crate::id::SortableId;

#[derive(Debug, thiserror::Error)]
pub enum SortableError {
    #[error("source collection must be an array, found {found}")]
    NotAnArray { found: &'static str },
    #[error("field `{accessor}` of container {container} is not an array")]
    InvalidAccessor { accessor: String, container: String },
    #[error("invalid sortable id `{0}`")]
    InvalidId(String),
    #[error("{0} is not a container id")]
    NotAContainer(SortableId),
    #[error("{0} is not an item id")]
    NotAnItem(SortableId),
    #[error("{item} appears more than once in {container}")]
    DuplicateItem {
        container: SortableId,
        item: SortableId,
    },
    #[error("{item} appears in both {first} and {second}")]
    SharedItem {
        item: SortableId,
        first: SortableId,
        second: SortableId,
    },
    #[error("invalid sortable options: {0}")]
    Options(#[from] serde_json::Error),
}

pub(crate) fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
