use std::collections::HashMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::SortableError;
use crate::id::SortableId;

/// Move the element at `from` to `to`, shifting the ones in between.
///
/// Out of range indices are clamped to the last element.
pub fn array_move<T>(items: &mut Vec<T>, from: usize, to: usize) {
    if items.is_empty() {
        return;
    }
    let last = items.len() - 1;
    let from = from.min(last);
    let to = to.min(last);
    if from == to {
        return;
    }
    let item = items.remove(from);
    items.insert(to, item);
}

/// The two level ordering: container ids in display order, each mapped to the
/// ordered ids of the items it holds.
///
/// Serializes as a JSON object keyed by `container-<id>` with arrays of
/// `item-<id>` values.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SortMap(IndexMap<SortableId, Vec<SortableId>>);

impl SortMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a container, or replace the items of an existing one in place.
    pub fn insert_container(&mut self, container: SortableId, items: Vec<SortableId>) {
        self.0.insert(container, items);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn item_count(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }

    pub fn containers(&self) -> impl Iterator<Item = &SortableId> {
        self.0.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SortableId, &[SortableId])> {
        self.0.iter().map(|(k, v)| (k, v.as_slice()))
    }

    pub fn contains_container(&self, container: &SortableId) -> bool {
        self.0.contains_key(container)
    }

    /// Items of `container`, empty when the container is unknown.
    pub fn items(&self, container: &SortableId) -> &[SortableId] {
        self.0.get(container).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn container_index(&self, container: &SortableId) -> Option<usize> {
        self.0.get_index_of(container)
    }

    /// The container an id belongs to. A container id resolves to itself.
    pub fn find_container(&self, id: &SortableId) -> Option<&SortableId> {
        if let Some((key, _)) = self.0.get_key_value(id) {
            return Some(key);
        }
        self.0
            .iter()
            .find(|(_, items)| items.contains(id))
            .map(|(key, _)| key)
    }

    pub fn index_of(&self, container: &SortableId, id: &SortableId) -> Option<usize> {
        self.items(container).iter().position(|item| item == id)
    }

    /// Reorder the items of one container. Returns `false` when nothing moved.
    pub fn move_within(&mut self, container: &SortableId, from: usize, to: usize) -> bool {
        let Some(items) = self.0.get_mut(container) else {
            return false;
        };
        if from == to || from >= items.len() {
            return false;
        }
        array_move(items, from, to);
        true
    }

    /// A copy of this map with `item` taken out of `from` and inserted into
    /// `to` at `index` (clamped to the end).
    pub fn move_across(
        &self,
        item: &SortableId,
        from: &SortableId,
        to: &SortableId,
        index: usize,
    ) -> Option<SortMap> {
        if from == to || !self.0.contains_key(to) {
            return None;
        }
        let source_ix = self.index_of(from, item)?;
        let mut next = self.clone();
        if let Some(source) = next.0.get_mut(from) {
            source.remove(source_ix);
        }
        let target = next.0.get_mut(to)?;
        let index = index.min(target.len());
        target.insert(index, item.clone());
        Some(next)
    }

    /// Move the container at `from` to `to` in the container order.
    pub fn reorder_containers(&mut self, from: usize, to: usize) -> bool {
        if from == to || from >= self.0.len() || to >= self.0.len() {
            return false;
        }
        self.0.move_index(from, to);
        true
    }

    /// Check the partition invariant: keys are containers, values are items,
    /// and every item sits in exactly one container exactly once.
    pub fn validate(&self) -> Result<(), SortableError> {
        let mut owners: HashMap<&SortableId, &SortableId> = HashMap::new();
        for (container, items) in &self.0 {
            if !container.is_container() {
                return Err(SortableError::NotAContainer(container.clone()));
            }
            for item in items {
                if !item.is_item() {
                    return Err(SortableError::NotAnItem(item.clone()));
                }
                if let Some(first) = owners.insert(item, container) {
                    if first == container {
                        return Err(SortableError::DuplicateItem {
                            container: container.clone(),
                            item: item.clone(),
                        });
                    }
                    return Err(SortableError::SharedItem {
                        item: item.clone(),
                        first: first.clone(),
                        second: container.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    pub fn as_index_map(&self) -> &IndexMap<SortableId, Vec<SortableId>> {
        &self.0
    }

    pub fn into_index_map(self) -> IndexMap<SortableId, Vec<SortableId>> {
        self.0
    }
}

impl FromIterator<(SortableId, Vec<SortableId>)> for SortMap {
    fn from_iter<I: IntoIterator<Item = (SortableId, Vec<SortableId>)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
