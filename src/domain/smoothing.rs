// Temporal smoothing over per-frame classifications.

use std::collections::VecDeque;

/// Bounded FIFO history. Pushing past capacity evicts the oldest entry.
#[derive(Debug, Clone)]
pub struct SlidingBuffer<T> {
    items: VecDeque<T>,
    capacity: usize,
}

impl<T> SlidingBuffer<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            items: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, item: T) {
        if self.capacity == 0 {
            return;
        }
        if self.items.len() == self.capacity {
            self.items.pop_front();
        }
        self.items.push_back(item);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    pub fn count_where(&self, pred: impl Fn(&T) -> bool) -> usize {
        self.items.iter().filter(|item| pred(item)).count()
    }
}

/// Most frequent non-`None` value.
///
/// Ties go to the value first seen in iteration order: counts are kept in
/// first-seen order and only a strictly higher count replaces the leader.
pub fn majority<T, I>(votes: I) -> Option<T>
where
    T: Copy + PartialEq,
    I: IntoIterator<Item = Option<T>>,
{
    let mut counts: Vec<(T, usize)> = Vec::new();
    for vote in votes.into_iter().flatten() {
        match counts.iter_mut().find(|(value, _)| *value == vote) {
            Some((_, n)) => *n += 1,
            None => counts.push((vote, 1)),
        }
    }

    let mut best = None;
    let mut best_count = 0;
    for (value, n) in counts {
        if n > best_count {
            best = Some(value);
            best_count = n;
        }
    }
    best
}

/// Timestamped values kept sorted by time and pruned from the front.
#[derive(Debug, Clone)]
pub struct TimedEvents<T> {
    events: VecDeque<(u64, T)>,
    retention_ms: u64,
}

impl<T: Copy> TimedEvents<T> {
    pub fn new(retention_ms: u64) -> Self {
        Self {
            events: VecDeque::new(),
            retention_ms,
        }
    }

    /// Records `value` at `at_ms` and drops entries older than the retention
    /// window. A timestamp earlier than the newest entry is clamped to it so
    /// the log stays ordered.
    pub fn push(&mut self, at_ms: u64, value: T) {
        let at_ms = self.events.back().map_or(at_ms, |(last, _)| at_ms.max(*last));
        self.events.push_back((at_ms, value));
        self.prune(at_ms);
    }

    /// Keeps entries with `now_ms - t <= retention`.
    pub fn prune(&mut self, now_ms: u64) {
        while let Some((t, _)) = self.events.front() {
            if now_ms.saturating_sub(*t) > self.retention_ms {
                self.events.pop_front();
            } else {
                break;
            }
        }
    }

    /// Values with `now_ms - t <= window_ms`, oldest first. The boundary is inclusive.
    pub fn within(&self, now_ms: u64, window_ms: u64) -> impl Iterator<Item = T> + '_ {
        self.events
            .iter()
            .filter(move |(t, _)| now_ms.saturating_sub(*t) <= window_ms)
            .map(|(_, value)| *value)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}
