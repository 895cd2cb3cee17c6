use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use reportd_common::ReportRequest;

/// Heap entry: the entity's queue order extended with a monotonic
/// sequence number. The sequence makes the order total (so `Ord` and
/// `Eq` agree) and gives FIFO behavior among full ties.
#[derive(Debug)]
struct QueuedRequest {
    seq: u64,
    request: ReportRequest,
}

impl Ord for QueuedRequest {
    fn cmp(&self, other: &Self) -> Ordering {
        self.request
            .queue_cmp(&other.request)
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

impl PartialOrd for QueuedRequest {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for QueuedRequest {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueuedRequest {}

/// Priority queue over report requests. Pop yields the highest-priority,
/// earliest-dated, earliest-pushed request first.
///
/// Not synchronized; callers hold it behind their own lock.
#[derive(Debug, Default)]
pub struct RequestQueue {
    heap: BinaryHeap<Reverse<QueuedRequest>>,
    next_seq: u64,
}

impl RequestQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, request: ReportRequest) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Reverse(QueuedRequest { seq, request }));
    }

    pub fn pop(&mut self) -> Option<ReportRequest> {
        self.heap.pop().map(|Reverse(entry)| entry.request)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}
