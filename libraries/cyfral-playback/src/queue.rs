//! Play queue with a movable tail
//!
//! Items at or before the current index are fixed; only the part of the
//! queue that has not played yet can be reordered. Reordering never changes
//! the queue length.

use crate::shuffle::shuffle_after_first;
use crate::types::MoveDirection;
use cyfral_core::PlaylistItem;
use rand::seq::SliceRandom;
use rand::Rng;

/// Ordered play sequence and the current position in it
#[derive(Debug, Clone, Default)]
pub struct Queue {
    items: Vec<PlaylistItem>,

    /// `None` until something has been played
    current: Option<usize>,
}

impl Queue {
    /// Create a queue in the given order, nothing playing
    pub fn new(items: Vec<PlaylistItem>) -> Self {
        Self {
            items,
            current: None,
        }
    }

    pub fn items(&self) -> &[PlaylistItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&PlaylistItem> {
        self.items.get(index)
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn current_item(&self) -> Option<&PlaylistItem> {
        self.current.and_then(|i| self.items.get(i))
    }

    /// Index of the item with `id`
    pub fn position_of(&self, id: &str) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }

    /// Move the current marker; out-of-range indices are ignored
    pub fn set_current(&mut self, index: usize) -> bool {
        if index < self.items.len() {
            self.current = Some(index);
            true
        } else {
            false
        }
    }

    /// Whether `index` may be dragged, moved or used as a drop target
    pub fn is_movable(&self, index: usize) -> bool {
        index < self.items.len() && self.current.map_or(true, |current| index > current)
    }

    /// Swap `index` with its neighbour; returns false when the move is not allowed
    pub fn move_item(&mut self, index: usize, direction: MoveDirection) -> bool {
        let Some(target) = direction.target(index) else {
            return false;
        };
        if !self.is_movable(index) || !self.is_movable(target) {
            return false;
        }

        self.items.swap(index, target);
        true
    }

    /// Remove the item at `from` and reinsert it at `to`
    ///
    /// Returns false when either index is fixed or out of range, or they are equal.
    pub fn reorder(&mut self, from: usize, to: usize) -> bool {
        if from == to || !self.is_movable(from) || !self.is_movable(to) {
            return false;
        }

        let item = self.items.remove(from);
        self.items.insert(to, item);
        true
    }

    /// Put the current item first and shuffle the rest behind it
    ///
    /// With nothing current the whole queue is shuffled and stays without a
    /// current item.
    pub fn pin_current_and_shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        match self.current {
            Some(current) => {
                self.items[..=current].rotate_right(1);
                shuffle_after_first(&mut self.items, rng);
                self.current = Some(0);
            }
            None => self.items.shuffle(rng),
        }
    }

    /// Replace the order with `master`, keeping the current item current
    ///
    /// If the current item is not in `master` the first item becomes current.
    pub fn restore(&mut self, master: &[PlaylistItem]) {
        let current_id = self.current_item().map(|item| item.id.clone());
        self.items = master.to_vec();
        self.current = current_id.map(|id| self.position_of(&id).unwrap_or(0));
        if self.items.is_empty() {
            self.current = None;
        }
    }
}
