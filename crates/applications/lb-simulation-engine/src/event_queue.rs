//! Time-ordered queue of pending events

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::types::Event;

/// Event wrapper carrying its insertion sequence for the final tie-break
#[derive(Debug, Clone)]
struct QueuedEvent {
    seq: u64,
    event: Event,
}

// Priority queue orders by time (earliest first)
impl Ord for QueuedEvent {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse comparison for min-heap (BinaryHeap is max-heap by default)
        other
            .event
            .schedule_cmp(&self.event)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for QueuedEvent {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Eq for QueuedEvent {}

impl PartialEq for QueuedEvent {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

/// Min-queue of events.
///
/// `pop_min` returns the earliest event; equal timestamps resolve
/// departures first, then by server index, then in insertion order, so a
/// run is reproducible for a given sequence of random draws.
#[derive(Debug, Default)]
pub struct EventQueue {
    heap: BinaryHeap<QueuedEvent>,
    next_seq: u64,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: Event) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(QueuedEvent { seq, event });
    }

    pub fn pop_min(&mut self) -> Option<Event> {
        self.heap.pop().map(|queued| queued.event)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pops_in_time_order() {
        let mut queue = EventQueue::new();
        queue.push(Event::arrival(10.0));
        queue.push(Event::departure(5.0, 0, 1.0));
        queue.push(Event::arrival(20.0));

        assert_eq!(queue.len(), 3);
        assert_eq!(queue.pop_min().map(|e| e.time), Some(5.0));
        assert_eq!(queue.pop_min().map(|e| e.time), Some(10.0));
        assert_eq!(queue.pop_min().map(|e| e.time), Some(20.0));
        assert!(queue.pop_min().is_none());
        assert!(queue.is_empty());
    }

    #[test]
    fn test_tie_break_is_deterministic() {
        let mut queue = EventQueue::new();
        queue.push(Event::arrival(1.0));
        queue.push(Event::departure(1.0, 2, 0.1));
        queue.push(Event::departure(1.0, 0, 0.3));

        let first = queue.pop_min().expect("first event");
        let second = queue.pop_min().expect("second event");
        let third = queue.pop_min().expect("third event");

        assert_eq!(first.server(), Some(0));
        assert_eq!(second.server(), Some(2));
        assert!(third.is_arrival());
    }

    #[test]
    fn test_identical_events_keep_insertion_order() {
        let mut queue = EventQueue::new();
        queue.push(Event::departure(2.0, 1, 0.25));
        queue.push(Event::departure(2.0, 1, 0.75));

        let first = queue.pop_min().expect("first event");
        let second = queue.pop_min().expect("second event");
        assert_eq!(first, Event::departure(2.0, 1, 0.25));
        assert_eq!(second, Event::departure(2.0, 1, 0.75));
    }
}
