use camber_types::EntityId;
use serde::{Deserialize, Serialize};

/// Items held by an [`EntityList`] expose their stable id.
pub trait StoreItem {
    fn id(&self) -> EntityId;
}

/// Position-addressed, insertion-ordered collection with an optional
/// selection index.
///
/// Commands cache raw positions into these collections across
/// execute/undo/redo. That is sound only because the edit model is
/// single-threaded and the history strictly linear: no other mutation can
/// interleave between a command's execute and its own later undo or redo.
///
/// The selection index never references a position at or beyond the current
/// length; every insert and remove that shifts positions adjusts it here,
/// in one place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityList<T> {
    items: Vec<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    selected: Option<usize>,
}

impl<T: StoreItem> EntityList<T> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            selected: None,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn by_id(&self, id: EntityId) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn by_id_mut(&mut self, id: EntityId) -> Option<&mut T> {
        self.items.iter_mut().find(|item| item.id() == id)
    }

    pub fn index_of(&self, id: EntityId) -> Option<usize> {
        self.items.iter().position(|item| item.id() == id)
    }

    /// Append an item, returning the index it landed at.
    pub fn push(&mut self, item: T) -> usize {
        self.items.push(item);
        self.items.len() - 1
    }

    /// Insert at `index`, appending when `index` is at or past the end.
    /// Returns the actual index used. The selection index is shifted right
    /// when the insertion lands at or before it.
    pub fn insert_clamped(&mut self, index: usize, item: T) -> usize {
        let index = index.min(self.items.len());
        self.items.insert(index, item);
        if let Some(sel) = self.selected {
            if index <= sel {
                self.selected = Some(sel + 1);
            }
        }
        index
    }

    /// Remove the item at `index`, if in range. Clears the selection when it
    /// referenced the removed slot, decrements it when it referenced a later
    /// slot.
    pub fn remove_at(&mut self, index: usize) -> Option<T> {
        if index >= self.items.len() {
            return None;
        }
        let item = self.items.remove(index);
        match self.selected {
            Some(sel) if sel == index => self.selected = None,
            Some(sel) if sel > index => self.selected = Some(sel - 1),
            _ => {}
        }
        Some(item)
    }

    /// Remove an item by its stable id, returning the position it occupied.
    pub fn remove_by_id(&mut self, id: EntityId) -> Option<(usize, T)> {
        let index = self.index_of(id)?;
        self.remove_at(index).map(|item| (index, item))
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// Set the selection. Out-of-range indices clear it.
    pub fn select(&mut self, index: Option<usize>) {
        self.selected = index.filter(|i| *i < self.items.len());
    }
}

impl<T: StoreItem> Default for EntityList<T> {
    fn default() -> Self {
        Self::new()
    }
}
