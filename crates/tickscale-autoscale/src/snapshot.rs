//! Tick-indexed queue/container snapshots.
//!
//! The provisioning decision only ever looks at the current tick and the
//! one before it, so the history keeps a bounded tail of entries while
//! still addressing them by absolute tick index.

use std::collections::VecDeque;

/// Number of most recent ticks retained by a [`SnapshotHistory`].
pub const RETAINED_TICKS: usize = 32;

/// Queue and container counters recorded at one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Snapshot {
    /// Cumulative dequeued (completed) requests.
    pub q_begin: u64,
    /// Cumulative enqueued requests.
    pub q_end: u64,
    /// Containers confirmed as created.
    pub c_created: u64,
    /// Containers requested but not yet confirmed.
    pub c_creating: u64,
}

impl Snapshot {
    /// Requests enqueued but not yet completed.
    pub fn backlog(&self) -> u64 {
        self.q_end - self.q_begin
    }

    /// Created plus in-flight containers.
    pub fn total_containers(&self) -> u64 {
        self.c_created + self.c_creating
    }
}

/// Append-only sequence of snapshots indexed by tick.
///
/// The entry for the current tick may be overwritten in place; every
/// earlier entry is immutable.
#[derive(Debug, Clone)]
pub struct SnapshotHistory {
    entries: VecDeque<Snapshot>,
    /// Tick index of `entries[0]`.
    first_tick: u64,
}

impl SnapshotHistory {
    /// History holding a single zeroed snapshot for tick 0.
    pub fn new() -> Self {
        let mut entries = VecDeque::with_capacity(RETAINED_TICKS);
        entries.push_back(Snapshot::default());
        Self {
            entries,
            first_tick: 0,
        }
    }

    /// Tick index of the newest entry.
    pub fn current_tick(&self) -> u64 {
        self.first_tick + self.entries.len() as u64 - 1
    }

    /// Snapshot of the newest tick.
    pub fn current(&self) -> Snapshot {
        self.entries[self.entries.len() - 1]
    }

    /// Snapshot recorded at `tick`, if still retained.
    pub fn get(&self, tick: u64) -> Option<Snapshot> {
        let offset = tick.checked_sub(self.first_tick)?;
        self.entries.get(offset as usize).copied()
    }

    /// Replace the newest entry without advancing the tick.
    pub fn overwrite_current(&mut self, snapshot: Snapshot) {
        if let Some(last) = self.entries.back_mut() {
            *last = snapshot;
        }
    }

    /// Append a snapshot for the next tick and return its index.
    pub fn push(&mut self, snapshot: Snapshot) -> u64 {
        self.entries.push_back(snapshot);
        if self.entries.len() > RETAINED_TICKS {
            self.entries.pop_front();
            self.first_tick += 1;
        }
        self.current_tick()
    }

    /// Number of retained entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for SnapshotHistory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snap(q_begin: u64, q_end: u64) -> Snapshot {
        Snapshot {
            q_begin,
            q_end,
            ..Snapshot::default()
        }
    }

    #[test]
    fn starts_with_zeroed_tick_zero() {
        let h = SnapshotHistory::new();
        assert_eq!(h.current_tick(), 0);
        assert_eq!(h.get(0), Some(Snapshot::default()));
        assert_eq!(h.get(1), None);
    }

    #[test]
    fn push_advances_tick() {
        let mut h = SnapshotHistory::new();
        assert_eq!(h.push(snap(0, 3)), 1);
        assert_eq!(h.push(snap(1, 5)), 2);
        assert_eq!(h.current().backlog(), 4);
        assert_eq!(h.get(1), Some(snap(0, 3)));
    }

    #[test]
    fn overwrite_keeps_tick() {
        let mut h = SnapshotHistory::new();
        h.push(snap(0, 2));
        h.overwrite_current(Snapshot {
            c_created: 1,
            ..Snapshot::default()
        });
        assert_eq!(h.current_tick(), 1);
        assert_eq!(h.current().c_created, 1);
        assert_eq!(h.current().q_end, 0);
    }

    #[test]
    fn old_ticks_are_dropped_but_indices_stay_absolute() {
        let mut h = SnapshotHistory::new();
        for i in 1..=(RETAINED_TICKS as u64 + 10) {
            h.push(snap(0, i));
        }
        let newest = RETAINED_TICKS as u64 + 10;
        assert_eq!(h.current_tick(), newest);
        assert_eq!(h.len(), RETAINED_TICKS);
        assert_eq!(h.get(0), None);
        assert_eq!(h.get(newest - 1), Some(snap(0, newest - 1)));
    }

    #[test]
    fn totals() {
        let s = Snapshot {
            q_begin: 2,
            q_end: 9,
            c_created: 3,
            c_creating: 4,
        };
        assert_eq!(s.backlog(), 7);
        assert_eq!(s.total_containers(), 7);
    }
}
