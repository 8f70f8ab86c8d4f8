//! Container lifecycle tracking.

use std::time::{Duration, Instant};

use tickscale_core::{ContainerId, ContainerState, SequenceNumber};

/// One unit of execution capacity for a function.
#[derive(Debug, Clone)]
pub struct Container {
    id: ContainerId,
    state: ContainerState,
    /// Set at creation and at every transition back to idle.
    idle_since: Instant,
    /// Request currently being served, if busy.
    serving: Option<SequenceNumber>,
    /// Number of requests served over the container's lifetime.
    served: u64,
}

impl Container {
    pub fn new(id: ContainerId, now: Instant) -> Self {
        Self {
            id,
            state: ContainerState::Provisioning,
            idle_since: now,
            serving: None,
            served: 0,
        }
    }

    pub fn id(&self) -> ContainerId {
        self.id
    }

    pub fn state(&self) -> ContainerState {
        self.state
    }

    pub fn idle_since(&self) -> Instant {
        self.idle_since
    }

    pub fn serving(&self) -> Option<SequenceNumber> {
        self.serving
    }

    pub fn served(&self) -> u64 {
        self.served
    }

    /// Hand a request to this container.
    ///
    /// Panics if the container is already busy.
    pub fn assign(&mut self, sequence_number: SequenceNumber) {
        assert!(
            self.state != ContainerState::Busy,
            "container {} dispatched while busy with #{:?}",
            self.id,
            self.serving
        );
        self.state = ContainerState::Busy;
        self.serving = Some(sequence_number);
    }

    /// Mark the in-flight request as finished and return to idle.
    pub fn finish(&mut self, now: Instant) {
        self.state = ContainerState::Idle;
        self.serving = None;
        self.served += 1;
        self.idle_since = now;
    }

    /// How long the container has gone without work. Zero while busy.
    pub fn idle_for(&self, now: Instant) -> Duration {
        match self.state {
            ContainerState::Busy => Duration::ZERO,
            _ => now.saturating_duration_since(self.idle_since),
        }
    }

    /// Whether the container has been idle strictly longer than `max_idle`.
    pub fn is_expired(&self, now: Instant, max_idle: Duration) -> bool {
        self.idle_for(now) > max_idle
    }
}
