//! Deterministic timer queue.
//!
//! Backed by a binary heap keyed on deadline with a stable sequence
//! tiebreak, so two callbacks scheduled for the same instant land in the
//! order they were scheduled. Cancellation is lazy: cancelled ids are
//! dropped when their entry surfaces.

use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, HashSet};

use combat_core::{Seconds, TimerEvent, TimerId, TimerScheduler};

/// Microsecond resolution keeps deadline ordering exact under f32 deltas.
fn to_micros(seconds: f64) -> u64 {
    (seconds * 1_000_000.0) as u64
}

#[derive(Debug)]
struct Entry {
    due_us: u64,
    seq: u64,
    id: TimerId,
    event: TimerEvent,
    repeat: Option<Seconds>,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.due_us == other.due_us && self.seq == other.seq
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.due_us, self.seq).cmp(&(other.due_us, other.seq))
    }
}

/// Single-threaded timer queue implementing the core's scheduler contract.
#[derive(Debug, Default)]
pub struct TimerQueue {
    now: f64,
    next_id: u64,
    next_seq: u64,
    heap: BinaryHeap<Reverse<Entry>>,
    cancelled: HashSet<TimerId>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Session clock in seconds.
    pub fn now(&self) -> f64 {
        self.now
    }

    pub fn pending(&self) -> usize {
        self.heap.len()
    }

    fn push(&mut self, delay: Seconds, event: TimerEvent, repeat: Option<Seconds>) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        let entry = Entry {
            due_us: to_micros(self.now + delay.max(0.0) as f64),
            seq: self.next_seq,
            id,
            event,
            repeat,
        };
        self.next_seq += 1;
        self.heap.push(Reverse(entry));
        id
    }

    /// Advances the clock and returns every callback that came due, in
    /// deadline order. Repeating timers re-arm themselves under the same id.
    pub fn advance(&mut self, dt: Seconds) -> Vec<TimerEvent> {
        self.now += dt as f64;
        let now_us = to_micros(self.now);
        let mut due = Vec::new();

        while let Some(Reverse(head)) = self.heap.peek() {
            if head.due_us > now_us {
                break;
            }
            let Some(Reverse(entry)) = self.heap.pop() else {
                break;
            };
            if self.cancelled.remove(&entry.id) {
                continue;
            }
            due.push(entry.event);
            if let Some(interval) = entry.repeat {
                let seq = self.next_seq;
                self.next_seq += 1;
                self.heap.push(Reverse(Entry {
                    due_us: entry.due_us + to_micros(interval.max(0.0) as f64),
                    seq,
                    id: entry.id,
                    event: entry.event,
                    repeat: entry.repeat,
                }));
            }
        }
        due
    }
}

impl TimerScheduler for TimerQueue {
    fn schedule(&mut self, delay: Seconds, event: TimerEvent) -> TimerId {
        self.push(delay, event, None)
    }

    fn schedule_repeating(&mut self, interval: Seconds, event: TimerEvent) -> TimerId {
        // A non-positive interval would re-arm as immediately due on every
        // advance; degrade it to a one-shot.
        let repeat = (interval > 0.0).then_some(interval);
        self.push(interval, event, repeat)
    }

    fn cancel(&mut self, id: TimerId) {
        self.cancelled.insert(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use combat_core::EntityId;

    fn decay(owner: u32) -> TimerEvent {
        TimerEvent::TempHealthDecay {
            owner: EntityId(owner),
        }
    }

    #[test]
    fn one_shot_lands_once_at_its_deadline() {
        let mut queue = TimerQueue::new();
        queue.schedule(1.0, decay(1));

        assert!(queue.advance(0.5).is_empty());
        assert_eq!(queue.advance(0.6), vec![decay(1)]);
        assert!(queue.advance(10.0).is_empty());
    }

    #[test]
    fn same_deadline_preserves_schedule_order() {
        let mut queue = TimerQueue::new();
        queue.schedule(1.0, decay(1));
        queue.schedule(1.0, decay(2));
        queue.schedule(0.5, decay(3));

        assert_eq!(queue.advance(1.0), vec![decay(3), decay(1), decay(2)]);
    }

    #[test]
    fn cancelled_timers_never_land() {
        let mut queue = TimerQueue::new();
        let keep = queue.schedule(1.0, decay(1));
        let drop = queue.schedule(1.0, decay(2));
        queue.cancel(drop);

        assert_eq!(queue.advance(2.0), vec![decay(1)]);
        let _ = keep;
    }

    #[test]
    fn zero_interval_repeating_degrades_to_a_one_shot() {
        let mut queue = TimerQueue::new();
        queue.schedule_repeating(0.0, decay(1));

        assert_eq!(queue.advance(1.0), vec![decay(1)]);
        assert!(queue.advance(1.0).is_empty());
        assert_eq!(queue.pending(), 0);
    }

    #[test]
    fn repeating_timer_rearms_until_cancelled() {
        let mut queue = TimerQueue::new();
        let id = queue.schedule_repeating(1.0, decay(1));

        assert_eq!(queue.advance(1.0).len(), 1);
        assert_eq!(queue.advance(2.0).len(), 2, "catches up missed periods");

        queue.cancel(id);
        assert!(queue.advance(5.0).is_empty());
    }
}
