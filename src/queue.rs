//! Fixed-capacity binary min-heap of scheduled events.
//!
//! Entries are ordered by their absolute fire time. Unlike
//! `std::collections::BinaryHeap`, any stored item can be pulled out of the
//! middle of the heap, which the scheduler needs to re-time reactions after
//! each event. Lookup for removal is a linear scan over the slots.

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Scheduled<T> {
    pub item: T,
    pub time: f64,
}

#[derive(Clone, Debug)]
pub struct EventQueue<T> {
    slots: Vec<Scheduled<T>>,
    capacity: usize,
}

impl<T: Copy + PartialEq> EventQueue<T> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Heapifies `entries` bottom-up in O(n).
    pub fn build(entries: Vec<Scheduled<T>>, capacity: usize) -> Self {
        assert!(
            entries.len() <= capacity,
            "event queue built with {} entries over capacity {}",
            entries.len(),
            capacity
        );
        let mut queue = Self {
            slots: entries,
            capacity,
        };
        for pos in (0..queue.slots.len() / 2).rev() {
            queue.sift_down(pos);
        }
        queue
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn peek_min(&self) -> Option<Scheduled<T>> {
        self.slots.first().copied()
    }

    /// # Panics
    ///
    /// Panics when the queue is already at capacity.
    pub fn insert(&mut self, item: T, time: f64) {
        assert!(
            self.slots.len() < self.capacity,
            "event queue is full (capacity {})",
            self.capacity
        );
        self.slots.push(Scheduled { item, time });
        self.sift_up(self.slots.len() - 1);
    }

    pub fn pop_min(&mut self) -> Option<Scheduled<T>> {
        if self.slots.is_empty() {
            return None;
        }
        let min = self.slots.swap_remove(0);
        if !self.slots.is_empty() {
            self.sift_down(0);
        }
        Some(min)
    }

    /// Removes `item` wherever it sits and returns the time it was scheduled
    /// at, or `None` when it is not queued.
    pub fn remove(&mut self, item: T) -> Option<f64> {
        let idx = self.position(item)?;
        let removed = self.slots.swap_remove(idx);
        if idx < self.slots.len() {
            if idx > 0 && self.slots[idx].time < self.slots[parent(idx)].time {
                self.sift_up(idx);
            } else {
                self.sift_down(idx);
            }
        }
        Some(removed.time)
    }

    pub fn time_of(&self, item: T) -> Option<f64> {
        self.position(item).map(|idx| self.slots[idx].time)
    }

    pub fn contains(&self, item: T) -> bool {
        self.position(item).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Scheduled<T>> {
        self.slots.iter()
    }

    /// True when every parent fires no later than its children.
    pub fn is_heap(&self) -> bool {
        (1..self.slots.len()).all(|idx| self.slots[parent(idx)].time <= self.slots[idx].time)
    }

    fn position(&self, item: T) -> Option<usize> {
        self.slots.iter().position(|slot| slot.item == item)
    }

    fn sift_up(&mut self, mut pos: usize) {
        while pos > 0 {
            let up = parent(pos);
            if self.slots[pos].time >= self.slots[up].time {
                break;
            }
            self.slots.swap(pos, up);
            pos = up;
        }
    }

    fn sift_down(&mut self, mut pos: usize) {
        let len = self.slots.len();
        loop {
            let left = 2 * pos + 1;
            if left >= len {
                return;
            }
            let right = left + 1;
            let child = if right < len && self.slots[right].time < self.slots[left].time {
                right
            } else {
                left
            };
            if self.slots[pos].time <= self.slots[child].time {
                return;
            }
            self.slots.swap(pos, child);
            pos = child;
        }
    }
}

#[inline]
fn parent(pos: usize) -> usize {
    (pos - 1) / 2
}
