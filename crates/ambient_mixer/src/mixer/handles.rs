//! Owned table of playback handles
//!
//! Handles live in a slot map; a side index maps sound ids to slot keys.
//! The table is the only owner of its handles and is drained explicitly on
//! teardown.

use crate::catalog::SoundId;
use slotmap::{new_key_type, SlotMap};
use std::collections::HashMap;

new_key_type! {
    /// Key of a handle slot
    pub struct HandleKey;
}

struct HandleEntry<H> {
    sound_id: SoundId,
    handle: H,
}

/// Arena of handles keyed by sound id
pub(crate) struct HandleTable<H> {
    slots: SlotMap<HandleKey, HandleEntry<H>>,
    index: HashMap<SoundId, HandleKey>,
}

impl<H> HandleTable<H> {
    pub(crate) fn new() -> Self {
        Self {
            slots: SlotMap::with_key(),
            index: HashMap::new(),
        }
    }

    /// Handle for `id`, created with `create` on first use
    pub(crate) fn get_or_insert_with(&mut self, id: &str, create: impl FnOnce() -> H) -> &mut H {
        let key = match self.index.get(id) {
            Some(&key) => key,
            None => {
                let key = self.slots.insert(HandleEntry {
                    sound_id: id.to_string(),
                    handle: create(),
                });
                self.index.insert(id.to_string(), key);
                key
            }
        };
        &mut self.slots[key].handle
    }

    pub(crate) fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub(crate) fn len(&self) -> usize {
        self.slots.len()
    }

    /// Every handle with its sound id
    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut H)> {
        self.slots
            .values_mut()
            .map(|entry| (entry.sound_id.as_str(), &mut entry.handle))
    }

    /// Remove and yield every handle
    pub(crate) fn drain(&mut self) -> impl Iterator<Item = (SoundId, H)> + '_ {
        self.index.clear();
        self.slots.drain().map(|(_, entry)| (entry.sound_id, entry.handle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_once() {
        let mut table = HandleTable::new();
        let mut created = 0;
        *table.get_or_insert_with("rain", || {
            created += 1;
            10
        }) += 1;
        let value = *table.get_or_insert_with("rain", || {
            created += 1;
            99
        });

        assert_eq!(created, 1);
        assert_eq!(value, 11);
        assert_eq!(table.len(), 1);
        assert!(table.contains("rain"));
        assert!(!table.contains("ocean"));
    }

    #[test]
    fn test_drain_empties_table() {
        let mut table = HandleTable::new();
        table.get_or_insert_with("rain", || 1);
        table.get_or_insert_with("ocean", || 2);

        let mut drained: Vec<_> = table.drain().collect();
        drained.sort();
        assert_eq!(drained, vec![("ocean".to_string(), 2), ("rain".to_string(), 1)]);
        assert_eq!(table.len(), 0);
        assert!(!table.contains("rain"));
    }
}
