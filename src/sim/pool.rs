//! Fixed-capacity entity storage with slot reuse
//!
//! Slots are preallocated once; releasing an entity pushes its index onto a
//! free list and the next spawn reuses it. Iteration is always in slot order
//! so the simulation stays deterministic.

use serde::{Deserialize, Serialize};

/// Index of an occupied slot
pub type SlotId = usize;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pool<T> {
    slots: Vec<Option<T>>,
    /// Free slot indices, next to hand out on top
    free: Vec<SlotId>,
}

impl<T> Pool<T> {
    pub fn with_capacity(capacity: usize) -> Self {
        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, || None);
        Self {
            slots,
            // Reversed so slot 0 is handed out first
            free: (0..capacity).rev().collect(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_full(&self) -> bool {
        self.free.is_empty()
    }

    /// Store a value. Returns `None` (dropping the value) when full.
    pub fn spawn(&mut self, value: T) -> Option<SlotId> {
        let id = self.free.pop()?;
        self.slots[id] = Some(value);
        Some(id)
    }

    /// Take a value out and free its slot
    pub fn release(&mut self, id: SlotId) -> Option<T> {
        let value = self.slots.get_mut(id)?.take()?;
        self.free.push(id);
        Some(value)
    }

    pub fn get(&self, id: SlotId) -> Option<&T> {
        self.slots.get(id)?.as_ref()
    }

    pub fn get_mut(&mut self, id: SlotId) -> Option<&mut T> {
        self.slots.get_mut(id)?.as_mut()
    }

    /// Release everything
    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            *slot = None;
        }
        self.free = (0..self.slots.len()).rev().collect();
    }

    /// Occupied slot ids in slot order (snapshot, safe to mutate the pool while walking it)
    pub fn ids(&self) -> Vec<SlotId> {
        self.iter().map(|(id, _)| id).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (SlotId, &T)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(id, slot)| slot.as_ref().map(|v| (id, v)))
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.slots.iter().flatten()
    }
}
