//! `EventQueue`: a binary min-heap with an `AgentId → slot` side index.
//!
//! # Removal
//!
//! Agents leave the simulation at arbitrary times and their pending entry
//! goes with them.  Every swap also updates `slots`, so an entry is located
//! in O(1) and removed or re-keyed in O(log n).
//!
//! # Ordering
//!
//! Keys compare by `time` (IEEE total order) and then by `agent`, giving a
//! strict total order: no two live entries ever compare equal.

use std::cmp::Ordering;

use rustc_hash::FxHashMap;

use crowd_core::{AgentId, SimTime};

/// The ordering key of one scheduled agent.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct EventKey {
    pub time:  SimTime,
    pub agent: AgentId,
}

impl EventKey {
    #[inline]
    pub fn new(time: SimTime, agent: AgentId) -> Self {
        Self { time, agent }
    }

    /// Total order: earlier time first, then smaller id.
    #[inline]
    pub fn cmp_key(&self, other: &EventKey) -> Ordering {
        self.time
            .total_cmp(&other.time)
            .then_with(|| self.agent.cmp(&other.agent))
    }

    #[inline]
    fn precedes(&self, other: &EventKey) -> bool {
        self.cmp_key(other) == Ordering::Less
    }
}

/// Indexed min-heap keyed by `(time, agent)`.
#[derive(Default, Debug)]
pub struct EventQueue {
    heap:  Vec<EventKey>,
    slots: FxHashMap<AgentId, usize>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn contains(&self, agent: AgentId) -> bool {
        self.slots.contains_key(&agent)
    }

    /// Scheduled time of `agent`, if queued.
    pub fn time_of(&self, agent: AgentId) -> Option<SimTime> {
        self.slots.get(&agent).map(|&i| self.heap[i].time)
    }

    /// The minimum entry without removing it.
    pub fn peek(&self) -> Option<EventKey> {
        self.heap.first().copied()
    }

    /// Queue `agent` at `time`.  Returns `false` (and changes nothing) if the
    /// agent already has an entry.
    pub fn push(&mut self, agent: AgentId, time: SimTime) -> bool {
        if self.slots.contains_key(&agent) {
            return false;
        }
        let i = self.heap.len();
        self.heap.push(EventKey::new(time, agent));
        self.slots.insert(agent, i);
        self.sift_up(i);
        true
    }

    /// Remove and return the minimum entry.
    pub fn pop(&mut self) -> Option<EventKey> {
        if self.heap.is_empty() {
            return None;
        }
        self.take(0)
    }

    /// Drop `agent`'s entry, returning its time.  O(log n).
    pub fn remove(&mut self, agent: AgentId) -> Option<SimTime> {
        let i = *self.slots.get(&agent)?;
        self.take(i).map(|key| key.time)
    }

    /// Change `agent`'s time in place.  Returns `false` if not queued.
    /// O(log n).
    pub fn requeue(&mut self, agent: AgentId, time: SimTime) -> bool {
        let Some(&i) = self.slots.get(&agent) else {
            return false;
        };
        let old = self.heap[i];
        self.heap[i].time = time;
        if self.heap[i].precedes(&old) {
            self.sift_up(i);
        } else {
            self.sift_down(i);
        }
        true
    }

    /// All entries sorted by `(time, id)`.  O(n log n); for inspection.
    pub fn sorted(&self) -> Vec<EventKey> {
        let mut v = self.heap.clone();
        v.sort_by(EventKey::cmp_key);
        v
    }

    // ── Heap internals ────────────────────────────────────────────────────

    /// Remove the entry at slot `i`, restoring the heap property.
    fn take(&mut self, i: usize) -> Option<EventKey> {
        let last = self.heap.len().checked_sub(1)?;
        self.swap(i, last);
        let key = self.heap.pop()?;
        self.slots.remove(&key.agent);
        if i < self.heap.len() {
            // The moved element may need to go either way.
            self.sift_up(i);
            self.sift_down(i);
        }
        Some(key)
    }

    fn swap(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        self.heap.swap(a, b);
        self.slots.insert(self.heap[a].agent, a);
        self.slots.insert(self.heap[b].agent, b);
    }

    fn sift_up(&mut self, mut i: usize) {
        while i > 0 {
            let parent = (i - 1) / 2;
            if self.heap[i].precedes(&self.heap[parent]) {
                self.swap(i, parent);
                i = parent;
            } else {
                break;
            }
        }
    }

    fn sift_down(&mut self, mut i: usize) {
        let n = self.heap.len();
        loop {
            let left = 2 * i + 1;
            if left >= n {
                break;
            }
            let right = left + 1;
            let child = if right < n && self.heap[right].precedes(&self.heap[left]) {
                right
            } else {
                left
            };
            if self.heap[child].precedes(&self.heap[i]) {
                self.swap(i, child);
                i = child;
            } else {
                break;
            }
        }
    }

    /// Heap property and slot index agree.  Test helper.
    #[cfg(test)]
    pub(crate) fn is_consistent(&self) -> bool {
        let heap_ok = (1..self.heap.len()).all(|i| !self.heap[i].precedes(&self.heap[(i - 1) / 2]));
        let slots_ok = self.slots.len() == self.heap.len()
            && self.heap.iter().enumerate().all(|(i, k)| self.slots.get(&k.agent) == Some(&i));
        heap_ok && slots_ok
    }
}
