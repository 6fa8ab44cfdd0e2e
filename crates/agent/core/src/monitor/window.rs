//! Fixed-capacity sliding window over recent samples.

use std::collections::VecDeque;

/// Keeps the most recent `capacity` items, evicting the oldest on overflow.
#[derive(Clone, Debug)]
pub struct BoundedWindow<T> {
    items: VecDeque<T>,
    capacity: usize,
}

impl<T> BoundedWindow<T> {
    /// Creates an empty window. A zero capacity is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            items: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Pushes an item, returning the evicted oldest item if the window was full.
    pub fn push(&mut self, item: T) -> Option<T> {
        let evicted = if self.items.len() == self.capacity {
            self.items.pop_front()
        } else {
            None
        };
        self.items.push_back(item);
        evicted
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.items.len() == self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn back(&self) -> Option<&T> {
        self.items.back()
    }

    /// Oldest to newest.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> + ExactSizeIterator {
        self.items.iter()
    }
}

impl<T: Clone> BoundedWindow<T> {
    /// Oldest to newest, as an owned vector.
    pub fn to_vec(&self) -> Vec<T> {
        self.items.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evicts_oldest_on_overflow() {
        let mut window = BoundedWindow::new(3);
        assert_eq!(window.push(1), None);
        assert_eq!(window.push(2), None);
        assert_eq!(window.push(3), None);
        assert!(window.is_full());
        assert_eq!(window.push(4), Some(1));
        assert_eq!(window.len(), 3);
        assert_eq!(window.to_vec(), vec![2, 3, 4]);
        assert_eq!(window.back(), Some(&4));
    }

    #[test]
    fn zero_capacity_is_raised() {
        let mut window = BoundedWindow::new(0);
        window.push('a');
        window.push('b');
        assert_eq!(window.capacity(), 1);
        assert_eq!(window.to_vec(), vec!['b']);
    }
}
