use alloc::vec::Vec;

use crate::height::HeightModel;
use crate::key::{RowMap, RowSet};
use crate::{HeightMode, RowId};

/// The ordered row sequence, its materialized-row cache, and the per-row heights.
///
/// All structural edits go through this type so that, after every operation:
/// - the sequence holds no duplicate ids,
/// - every cached id is present in the sequence,
/// - the height model stays index-aligned with the sequence.
#[derive(Clone, Debug)]
pub struct RowStore<R> {
    ids: Vec<RowId>,
    members: RowSet,
    cache: RowMap<R>,
    heights: HeightModel,
}

impl<R> RowStore<R> {
    /// Builds a store from an initial id sequence. Later duplicates of an id are dropped.
    pub fn new(mode: HeightMode, row_height: u32, ids: impl IntoIterator<Item = RowId>) -> Self {
        let mut members = RowSet::default();
        let mut seq = Vec::new();
        for id in ids {
            if members.insert(id.clone()) {
                seq.push(id);
            } else {
                lwarn!(id = id.as_str(), "RowStore::new: dropping duplicate row id");
            }
        }
        Self {
            heights: HeightModel::new(mode, row_height, seq.len()),
            ids: seq,
            members,
            cache: RowMap::default(),
        }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn ids(&self) -> &[RowId] {
        &self.ids
    }

    pub fn heights(&self) -> &HeightModel {
        &self.heights
    }

    pub fn contains(&self, id: &str) -> bool {
        self.members.contains(id)
    }

    pub fn is_cached(&self, id: &str) -> bool {
        self.cache.contains_key(id)
    }

    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }

    pub fn cached_ids(&self) -> impl Iterator<Item = &RowId> {
        self.cache.keys()
    }

    pub fn get(&self, id: &str) -> Option<&R> {
        self.cache.get(id)
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        if !self.contains(id) {
            return None;
        }
        self.ids.iter().position(|x| x.as_str() == id)
    }

    pub fn id_at(&self, index: usize) -> Option<&RowId> {
        self.ids.get(index)
    }

    /// Inserts `id` at `index` (clamped to the length), optionally with its content.
    ///
    /// Returns `false` without changing anything when `id` is already present.
    pub fn insert_at(&mut self, index: usize, id: RowId, row: Option<R>) -> bool {
        if self.members.contains(&id) {
            ldebug!(id = id.as_str(), "RowStore::insert_at: id already present");
            return false;
        }
        let index = index.min(self.ids.len());
        self.members.insert(id.clone());
        self.heights.insert(index);
        if let Some(row) = row {
            self.cache.insert(id.clone(), row);
        }
        self.ids.insert(index, id);
        true
    }

    /// Removes `id` from the sequence, the cache and the height model.
    ///
    /// Returns the removed index, or `None` when `id` was absent.
    pub fn remove_by_id(&mut self, id: &str) -> Option<usize> {
        let index = self.index_of(id)?;
        let removed = self.ids.remove(index);
        self.members.remove(&removed);
        self.cache.remove(&removed);
        self.heights.remove(index);
        Some(index)
    }

    /// Replaces the content of `id`, optionally renaming it to `new_id` in place.
    ///
    /// A rename keeps the row's position and height; the cached content moves to the new id.
    /// Returns the row's index, or `None` when `id` is absent or `new_id` already names another
    /// row.
    pub fn replace(&mut self, id: &str, row: R, new_id: Option<RowId>) -> Option<usize> {
        let index = self.index_of(id)?;
        match new_id {
            Some(new_id) if new_id.as_str() != id => {
                if self.members.contains(&new_id) {
                    lwarn!(
                        id,
                        new_id = new_id.as_str(),
                        "RowStore::replace: target id already present"
                    );
                    return None;
                }
                let old = core::mem::replace(&mut self.ids[index], new_id.clone());
                self.members.remove(&old);
                self.cache.remove(&old);
                self.members.insert(new_id.clone());
                self.cache.insert(new_id, row);
            }
            _ => {
                let key = self.ids[index].clone();
                self.cache.insert(key, row);
            }
        }
        Some(index)
    }

    /// Caches fetched content for `id`. Ids no longer in the sequence are ignored.
    pub fn fill(&mut self, id: RowId, row: R) -> Option<usize> {
        let index = self.index_of(id.as_str())?;
        self.cache.insert(id, row);
        Some(index)
    }

    /// Records a measured height for the row at `index`.
    pub fn measure(&mut self, index: usize, height: u32) -> i64 {
        self.heights.measure(index, height)
    }

    /// Ids in `start..stop` without cached content.
    pub fn missing_in(&self, start: usize, stop: usize) -> Vec<RowId> {
        let stop = stop.min(self.ids.len());
        let start = start.min(stop);
        self.ids[start..stop]
            .iter()
            .filter(|id| !self.cache.contains_key(id.as_str()))
            .cloned()
            .collect()
    }

    pub fn clear(&mut self) {
        self.ids.clear();
        self.members.clear();
        self.cache.clear();
        self.heights = HeightModel::new(self.heights.mode(), self.heights.row_height(), 0);
    }
}
