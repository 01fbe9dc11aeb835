use std::collections::HashMap;

use crate::domain::utils::id::FileId;

/// Per-file storage. Writes replace, reads of unknown files return `None`.
#[derive(Debug, Clone)]
pub struct KeyedStore<V> {
    entries: HashMap<FileId, V>,
}

impl<V> Default for KeyedStore<V> {
    fn default() -> Self {
        Self { entries: HashMap::new() }
    }
}

impl<V> KeyedStore<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, file_id: FileId, value: V) {
        self.entries.insert(file_id, value);
    }

    pub fn get(&self, file_id: &FileId) -> Option<&V> {
        self.entries.get(file_id)
    }

    pub fn get_mut(&mut self, file_id: &FileId) -> Option<&mut V> {
        self.entries.get_mut(file_id)
    }

    pub fn remove(&mut self, file_id: &FileId) -> Option<V> {
        self.entries.remove(file_id)
    }

    pub fn contains(&self, file_id: &FileId) -> bool {
        self.entries.contains_key(file_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &FileId> {
        self.entries.keys()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_write_wins() {
        let mut store: KeyedStore<u32> = KeyedStore::new();
        let id = FileId::new("f");

        assert!(store.get(&id).is_none());
        store.set(id.clone(), 1);
        store.set(id.clone(), 2);

        assert_eq!(store.get(&id), Some(&2));
        assert_eq!(store.len(), 1);
        assert_eq!(store.remove(&id), Some(2));
        assert!(store.is_empty());
    }
}
