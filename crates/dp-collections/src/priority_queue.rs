//! Max-heap and min-heap priority queues.
//!
//! Both are thin wrappers over `std::collections::BinaryHeap`; the min-heap
//! stores `Reverse<T>` so the smallest element comes out first.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// Priority queue that pops the **largest** element first.
///
/// ```
/// use dp_collections::MaxHeap;
///
/// let mut heap: MaxHeap<u32> = [3, 9, 1].into_iter().collect();
/// assert_eq!(heap.peek(), Some(&9));
/// assert_eq!(heap.drain_ordered(), vec![9, 3, 1]);
/// assert!(heap.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct MaxHeap<T: Ord> {
    inner: BinaryHeap<T>,
}

/// Priority queue that pops the **smallest** element first.
///
/// ```
/// use dp_collections::MinHeap;
///
/// let mut heap = MinHeap::new();
/// heap.push("pear");
/// heap.push("apple");
/// heap.push("fig");
/// assert_eq!(heap.pop(), Some("apple"));
/// assert_eq!(heap.drain_ordered(), vec!["fig", "pear"]);
/// ```
#[derive(Debug, Clone)]
pub struct MinHeap<T: Ord> {
    inner: BinaryHeap<Reverse<T>>,
}

impl<T: Ord> MaxHeap<T> {
    /// Create an empty heap.
    pub fn new() -> Self {
        Self {
            inner: BinaryHeap::new(),
        }
    }

    /// Create an empty heap with room for `capacity` elements.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: BinaryHeap::with_capacity(capacity),
        }
    }

    /// Insert an element.
    pub fn push(&mut self, item: T) {
        self.inner.push(item);
    }

    /// Remove and return the largest element.
    pub fn pop(&mut self) -> Option<T> {
        self.inner.pop()
    }

    /// The largest element, without removing it.
    pub fn peek(&self) -> Option<&T> {
        self.inner.peek()
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// `true` if the heap holds no element.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Pop every element, largest first.
    pub fn drain_ordered(&mut self) -> Vec<T> {
        std::iter::from_fn(|| self.pop()).collect()
    }
}

impl<T: Ord> MinHeap<T> {
    /// Create an empty heap.
    pub fn new() -> Self {
        Self {
            inner: BinaryHeap::new(),
        }
    }

    /// Create an empty heap with room for `capacity` elements.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: BinaryHeap::with_capacity(capacity),
        }
    }

    /// Insert an element.
    pub fn push(&mut self, item: T) {
        self.inner.push(Reverse(item));
    }

    /// Remove and return the smallest element.
    pub fn pop(&mut self) -> Option<T> {
        self.inner.pop().map(|Reverse(item)| item)
    }

    /// The smallest element, without removing it.
    pub fn peek(&self) -> Option<&T> {
        self.inner.peek().map(|Reverse(item)| item)
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// `true` if the heap holds no element.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Pop every element, smallest first.
    pub fn drain_ordered(&mut self) -> Vec<T> {
        std::iter::from_fn(|| self.pop()).collect()
    }
}

impl<T: Ord> Default for MaxHeap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Ord> Default for MinHeap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Ord> FromIterator<T> for MaxHeap<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            inner: iter.into_iter().collect(),
        }
    }
}

impl<T: Ord> FromIterator<T> for MinHeap<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            inner: iter.into_iter().map(Reverse).collect(),
        }
    }
}

impl<T: Ord> Extend<T> for MaxHeap<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.inner.extend(iter);
    }
}

impl<T: Ord> Extend<T> for MinHeap<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.inner.extend(iter.into_iter().map(Reverse));
    }
}
