//! Container pool and dispatch ordering.
//!
//! The pool owns every live container of one function. Containers that can
//! take work sit in a [`DispatchPool`]; a container leaves it when it is
//! handed a request and re-enters only when it goes back to idle, so a busy
//! container is never selectable.

use std::collections::{BTreeMap, BTreeSet};
use std::time::{Duration, Instant};

use tickscale_core::{ContainerId, ContainerState, SequenceNumber};

use crate::container::Container;

/// Ordered set of containers eligible for dispatch.
pub trait DispatchPool {
    fn insert(&mut self, id: ContainerId);
    /// Remove and return the container that should receive the next request.
    fn remove_next(&mut self) -> Option<ContainerId>;
    /// Returns `true` if the id was present.
    fn remove(&mut self, id: ContainerId) -> bool;
    fn contains(&self, id: ContainerId) -> bool;
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Dispatches to the oldest eligible container (lowest id) first.
///
/// Backed by a `BTreeSet`, so every operation is O(log n).
#[derive(Debug, Default, Clone)]
pub struct LowestIdFirst {
    ids: BTreeSet<ContainerId>,
}

impl LowestIdFirst {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DispatchPool for LowestIdFirst {
    fn insert(&mut self, id: ContainerId) {
        self.ids.insert(id);
    }

    fn remove_next(&mut self) -> Option<ContainerId> {
        self.ids.pop_first()
    }

    fn remove(&mut self, id: ContainerId) -> bool {
        self.ids.remove(&id)
    }

    fn contains(&self, id: ContainerId) -> bool {
        self.ids.contains(&id)
    }

    fn len(&self) -> usize {
        self.ids.len()
    }
}

/// All live containers of a function plus their dispatch order.
#[derive(Debug)]
pub struct ContainerPool<D = LowestIdFirst> {
    containers: BTreeMap<ContainerId, Container>,
    available: D,
    next_id: u64,
}

impl ContainerPool<LowestIdFirst> {
    pub fn new() -> Self {
        Self::with_dispatch(LowestIdFirst::new())
    }
}

impl Default for ContainerPool<LowestIdFirst> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: DispatchPool> ContainerPool<D> {
    pub fn with_dispatch(available: D) -> Self {
        Self {
            containers: BTreeMap::new(),
            available,
            next_id: 0,
        }
    }

    /// Create a container in `Provisioning` state and make it dispatchable.
    pub fn create(&mut self, now: Instant) -> ContainerId {
        let id = ContainerId(self.next_id);
        self.next_id += 1;
        self.containers.insert(id, Container::new(id, now));
        self.available.insert(id);
        id
    }

    /// Pick the next eligible container and mark it busy with `sequence_number`.
    ///
    /// Returns `None` when every container is busy.
    pub fn acquire(&mut self, sequence_number: SequenceNumber) -> Option<ContainerId> {
        let id = self.available.remove_next()?;
        let container = self
            .containers
            .get_mut(&id)
            .unwrap_or_else(|| panic!("dispatch order references missing container {id}"));
        container.assign(sequence_number);
        Some(id)
    }

    /// Return a busy container to idle and make it dispatchable again.
    ///
    /// Returns `false` if the container is unknown or was not busy.
    pub fn release(&mut self, id: ContainerId, now: Instant) -> bool {
        match self.containers.get_mut(&id) {
            Some(container) if container.state() == ContainerState::Busy => {
                container.finish(now);
                self.available.insert(id);
                true
            }
            _ => false,
        }
    }

    /// Remove every non-busy container idle for longer than `max_idle`.
    pub fn evict_expired(&mut self, now: Instant, max_idle: Duration) -> Vec<Container> {
        let expired: Vec<ContainerId> = self
            .containers
            .values()
            .filter(|c| c.is_expired(now, max_idle))
            .map(Container::id)
            .collect();

        expired
            .into_iter()
            .filter_map(|id| {
                self.available.remove(id);
                self.containers.remove(&id)
            })
            .collect()
    }

    pub fn get(&self, id: ContainerId) -> Option<&Container> {
        self.containers.get(&id)
    }

    pub fn is_available(&self, id: ContainerId) -> bool {
        self.available.contains(id)
    }

    /// Containers currently eligible for dispatch.
    pub fn available_count(&self) -> usize {
        self.available.len()
    }

    pub fn count_in_state(&self, state: ContainerState) -> usize {
        self.containers
            .values()
            .filter(|c| c.state() == state)
            .count()
    }

    pub fn len(&self) -> usize {
        self.containers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.containers.is_empty()
    }

    /// Panics if a busy container is dispatchable or an idle one is not.
    pub fn check_consistency(&self) {
        for c in self.containers.values() {
            let listed = self.available.contains(c.id());
            match c.state() {
                ContainerState::Busy => {
                    assert!(!listed, "busy container {} is dispatchable", c.id())
                }
                _ => assert!(listed, "free container {} is not dispatchable", c.id()),
            }
        }
        assert_eq!(
            self.available.len(),
            self.containers.len() - self.count_in_state(ContainerState::Busy),
            "dispatch order references unknown containers"
        );
    }
}
