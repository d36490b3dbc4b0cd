//! # dp-collections
//!
//! Collection demonstrations for designpatterns-rs: max-heap and min-heap
//! priority queues built on the standard binary heap.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// Max-heap and min-heap priority queues.
pub mod priority_queue;

pub use priority_queue::{MaxHeap, MinHeap};
