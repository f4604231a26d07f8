// src/crawl/queue.rs
// =============================================================================
// The frontier: WebIDs waiting to be crawled, plus every WebID ever queued.
//
// How it works:
// 1. enqueue() checks the visited set first
// 2. If the WebID is new, it is marked visited and THEN pushed on the queue
// 3. dequeue() pops from the front, so the crawl is breadth-first
//
// Marking before queueing means a WebID that several profiles point at is
// queued exactly once, no matter how many times it is discovered.
//
// Rust concepts:
// - HashSet: To track visited WebIDs (O(1) lookup)
// - VecDeque: Double-ended queue for breadth-first crawling
// =============================================================================

use std::collections::{HashSet, VecDeque};

/// A WebID waiting to be crawled, and how far it is from the last
/// accepted profile
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontierItem {
    pub identifier: String,
    pub depth: u32,
}

impl FrontierItem {
    pub fn new(identifier: impl Into<String>, depth: u32) -> Self {
        Self {
            identifier: identifier.into(),
            depth,
        }
    }

    /// Seeds always start at depth 0
    pub fn seed(identifier: impl Into<String>) -> Self {
        Self::new(identifier, 0)
    }
}

/// FIFO work queue gated by a visited set
#[derive(Debug, Default)]
pub struct Frontier {
    queue: VecDeque<FrontierItem>,
    visited: HashSet<String>,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    // Adds the item unless its WebID was queued before
    //
    // Returns true if the item was added.
    pub fn enqueue(&mut self, item: FrontierItem) -> bool {
        if !self.visited.insert(item.identifier.clone()) {
            return false;
        }
        self.queue.push_back(item);
        true
    }

    pub fn dequeue(&mut self) -> Option<FrontierItem> {
        self.queue.pop_front()
    }

    /// Items still waiting
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Distinct WebIDs ever queued this run
    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why does HashSet::insert return a bool?
//    - true  = the value was not there before (we just added it)
//    - false = it was already present (nothing changed)
//    - That lets us "check and mark" in one step instead of contains()
//      followed by insert()
//
// 2. Why is the visited set never shrunk?
//    - A WebID that was crawled and failed should not be retried in the
//      same run. Remembering it forever (for this run) guarantees that.
//
// 3. Breadth-first vs depth-first:
//    - push_back() + pop_front() = first in, first out = breadth-first
//    - Nearby WebIDs get crawled before far away ones
// -----------------------------------------------------------------------------
