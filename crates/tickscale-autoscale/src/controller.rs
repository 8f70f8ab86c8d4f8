//! Per-function controller: the control algorithm for a single function.
//!
//! Every operation takes `&mut self`; callers serialize access (the
//! [`Dispatcher`](crate::Dispatcher) wraps each controller in a mutex).
//! Time is passed in explicitly so eviction is deterministic under test.

use std::collections::{HashMap, VecDeque};
use std::time::Instant;

use tracing::{debug, info, warn};

use tickscale_core::{
    ContainerId, ContainerState, Request, Response, ScalerConfig, SequenceNumber,
};

use crate::error::{ScalerError, ScalerResult};
use crate::pool::ContainerPool;
use crate::provision::{self, ProvisionInput, ProvisionPlan};
use crate::snapshot::{Snapshot, SnapshotHistory};
use crate::stats::FunctionStats;
use crate::window::ExecutionWindow;

/// A request handed to a container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub function_id: String,
    pub sequence_number: SequenceNumber,
    pub container_id: ContainerId,
}

/// Where a newly submitted request ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestStatus {
    /// Assigned to a container immediately.
    Dispatched(ContainerId),
    /// Waiting for a container; `position` is its zero-based place in the queue.
    Queued { position: usize },
}

/// Result of [`FunctionController::handle_request`].
#[derive(Debug, Clone)]
pub struct Admission {
    pub tick: u64,
    pub status: RequestStatus,
    /// Every assignment made while admitting, oldest request first.
    pub assignments: Vec<Assignment>,
}

/// Result of [`FunctionController::handle_response`].
#[derive(Debug, Clone, Default)]
pub struct Completion {
    /// Container that served the response.
    pub released: Option<ContainerId>,
    pub evicted: Vec<ContainerId>,
    pub assignments: Vec<Assignment>,
}

/// Result of [`FunctionController::on_tick`].
#[derive(Debug, Clone)]
pub struct TickOutcome {
    pub tick: u64,
    pub plan: ProvisionPlan,
    pub created: Vec<ContainerId>,
    pub assignments: Vec<Assignment>,
}

/// State and control algorithm for one function.
#[derive(Debug)]
pub struct FunctionController {
    function_id: String,
    config: ScalerConfig,
    /// Cumulative completed requests.
    q_begin: u64,
    /// Cumulative enqueued requests.
    q_end: u64,
    c_created: u64,
    c_creating: u64,
    tick: u64,
    /// Estimated average execution time in milliseconds.
    avg_execution_ms: f64,
    history: SnapshotHistory,
    /// Requests not yet handed to a container, FIFO.
    pending: VecDeque<Request>,
    pool: ContainerPool,
    window: ExecutionWindow,
    /// Containers serving each sequence number, in dispatch order.
    in_flight: HashMap<SequenceNumber, VecDeque<ContainerId>>,
    containers_created_total: u64,
    containers_evicted_total: u64,
}

impl FunctionController {
    pub fn new(function_id: impl Into<String>, config: ScalerConfig) -> Self {
        let window = ExecutionWindow::new(config.execution_time_window_size);
        let avg_execution_ms = config.tick_interval_ms as f64;
        Self {
            function_id: function_id.into(),
            config,
            q_begin: 0,
            q_end: 0,
            c_created: 0,
            c_creating: 0,
            tick: 0,
            avg_execution_ms,
            history: SnapshotHistory::new(),
            pending: VecDeque::new(),
            pool: ContainerPool::new(),
            window,
            in_flight: HashMap::new(),
            containers_created_total: 0,
            containers_evicted_total: 0,
        }
    }

    // ── Snapshot and provisioning ───────────────────────────────────

    /// Record the counters for the current tick, advancing the tick when
    /// there is backlog to measure.
    pub fn renew_snapshot(&mut self) {
        if self.pending.is_empty() {
            self.history.overwrite_current(Snapshot {
                q_begin: 0,
                q_end: 0,
                c_created: self.c_created,
                c_creating: self.c_creating,
            });
        } else {
            let grown = self.q_end > self.history.current().q_end;
            if self.q_end > self.q_begin || grown {
                self.tick = self.history.push(self.counters());
            }
            self.avg_execution_ms = self
                .window
                .mean()
                .unwrap_or(self.config.tick_interval_ms as f64);
        }

        debug!(
            function = %self.function_id,
            tick = self.tick,
            q_begin = self.q_begin,
            q_end = self.q_end,
            c_created = self.c_created,
            c_creating = self.c_creating,
            "snapshot renewed"
        );
    }

    /// Decide on and create any containers the current snapshot calls for.
    pub fn provision_containers(&mut self, now: Instant) -> (ProvisionPlan, Vec<ContainerId>) {
        let current = self.history.current();
        let previous = self
            .tick
            .checked_sub(1)
            .and_then(|t| self.history.get(t))
            .unwrap_or_default();

        let plan = provision::plan(&ProvisionInput {
            tick: self.tick,
            current,
            previous,
            q_end: self.q_end,
            avg_execution_ms: self.avg_execution_ms,
            tick_interval_ms: self.config.tick_interval_ms as f64,
        });

        let created = if plan.to_create > 0 {
            debug!(
                function = %self.function_id,
                tick = self.tick,
                branch = ?plan.branch,
                shortage = plan.shortage,
                backlog = current.backlog(),
                "container shortage"
            );
            self.create_containers(plan.to_create, now)
        } else {
            Vec::new()
        };

        (plan, created)
    }

    /// Create `n` containers in `Provisioning` state.
    pub fn create_containers(&mut self, n: u64, now: Instant) -> Vec<ContainerId> {
        let ids: Vec<ContainerId> = (0..n)
            .map(|_| {
                self.c_creating += 1;
                self.containers_created_total += 1;
                self.pool.create(now)
            })
            .collect();

        if !ids.is_empty() {
            info!(
                function = %self.function_id,
                count = ids.len(),
                c_creating = self.c_creating,
                "creating containers"
            );
        }
        self.check_invariants();
        ids
    }

    /// Periodic evaluation: renew, provision, then dispatch what is waiting.
    pub fn on_tick(&mut self, now: Instant) -> TickOutcome {
        self.renew_snapshot();
        let (plan, created) = self.provision_containers(now);
        let assignments = self.dispatch_pending();
        self.check_invariants();
        TickOutcome {
            tick: self.tick,
            plan,
            created,
            assignments,
        }
    }

    // ── Request / response ──────────────────────────────────────────

    /// Enqueue a request, re-evaluate provisioning, and dispatch.
    pub fn handle_request(&mut self, request: Request, now: Instant) -> Admission {
        debug!(
            function = %self.function_id,
            sequence = request.sequence_number,
            "handling request"
        );
        self.pending.push_back(request);
        self.q_end += 1;

        self.renew_snapshot();
        self.provision_containers(now);
        let assignments = self.dispatch_pending();

        // The new request is at the back of the queue, so it was dispatched
        // only if the queue drained completely.
        let status = match (self.pending.len(), assignments.last()) {
            (0, Some(last)) => RequestStatus::Dispatched(last.container_id),
            (len, _) => {
                debug!(
                    function = %self.function_id,
                    pending = len,
                    "no available container, request queued"
                );
                RequestStatus::Queued { position: len.saturating_sub(1) }
            }
        };

        self.check_invariants();
        Admission {
            tick: self.tick,
            status,
            assignments,
        }
    }

    /// Account for a completed request, free its container, and sweep idle
    /// containers.
    pub fn handle_response(
        &mut self,
        response: Response,
        now: Instant,
    ) -> ScalerResult<Completion> {
        let execution_time_ms = response.execution_time_ms;
        if !execution_time_ms.is_finite() || execution_time_ms < 0.0 {
            warn!(
                function = %self.function_id,
                sequence = response.sequence_number,
                execution_time_ms,
                "rejecting response with invalid execution time"
            );
            return Err(ScalerError::InvalidExecutionTime {
                function_id: self.function_id.clone(),
                sequence_number: response.sequence_number,
                execution_time_ms,
            });
        }

        let container_id = self.take_in_flight(response.sequence_number).ok_or_else(|| {
            warn!(
                function = %self.function_id,
                sequence = response.sequence_number,
                "response for a request that was never dispatched"
            );
            ScalerError::UnmatchedResponse {
                function_id: self.function_id.clone(),
                sequence_number: response.sequence_number,
            }
        })?;

        self.q_begin += 1;
        self.window.record(execution_time_ms);

        // Any completion confirms the oldest outstanding creation; it is not
        // tied to the container that served this response.
        if self.c_creating > 0 {
            self.c_creating -= 1;
            self.c_created += 1;
        }

        let released = self.pool.release(container_id, now).then_some(container_id);
        if released.is_none() {
            warn!(
                function = %self.function_id,
                container = %container_id,
                "serving container was not busy"
            );
        }

        let evicted = self.evict_idle(now);
        let assignments = self.dispatch_pending();
        self.check_invariants();

        debug!(
            function = %self.function_id,
            sequence = response.sequence_number,
            container = %container_id,
            execution_time_ms,
            "response handled"
        );

        Ok(Completion {
            released,
            evicted,
            assignments,
        })
    }

    // ── Internal helpers ────────────────────────────────────────────

    /// Hand queued requests to free containers until one side runs out.
    fn dispatch_pending(&mut self) -> Vec<Assignment> {
        let mut assignments = Vec::new();
        while let Some(request) = self.pending.front() {
            let Some(container_id) = self.pool.acquire(request.sequence_number) else {
                break;
            };
            let sequence_number = request.sequence_number;
            self.pending.pop_front();
            self.in_flight
                .entry(sequence_number)
                .or_default()
                .push_back(container_id);

            debug!(
                function = %self.function_id,
                sequence = sequence_number,
                container = %container_id,
                "request assigned"
            );
            assignments.push(Assignment {
                function_id: self.function_id.clone(),
                sequence_number,
                container_id,
            });
        }
        assignments
    }

    fn take_in_flight(&mut self, sequence_number: SequenceNumber) -> Option<ContainerId> {
        let queue = self.in_flight.get_mut(&sequence_number)?;
        let container_id = queue.pop_front();
        if queue.is_empty() {
            self.in_flight.remove(&sequence_number);
        }
        container_id
    }

    /// Remove containers idle longer than `max_idle_ms`.
    ///
    /// Each eviction withdraws a confirmed container; if none is confirmed
    /// it withdraws an outstanding creation instead.
    fn evict_idle(&mut self, now: Instant) -> Vec<ContainerId> {
        let evicted = self.pool.evict_expired(now, self.config.max_idle());
        for container in &evicted {
            if self.c_created > 0 {
                self.c_created -= 1;
            } else {
                self.c_creating -= 1;
            }
            self.containers_evicted_total += 1;
            info!(
                function = %self.function_id,
                container = %container.id(),
                idle_ms = container.idle_for(now).as_millis() as u64,
                served = container.served(),
                "evicted idle container"
            );
        }
        evicted.iter().map(|c| c.id()).collect()
    }

    fn counters(&self) -> Snapshot {
        Snapshot {
            q_begin: self.q_begin,
            q_end: self.q_end,
            c_created: self.c_created,
            c_creating: self.c_creating,
        }
    }

    fn check_invariants(&self) {
        assert!(
            self.q_begin <= self.q_end,
            "{}: q_begin {} exceeds q_end {}",
            self.function_id,
            self.q_begin,
            self.q_end
        );
        assert_eq!(
            self.c_created + self.c_creating,
            self.pool.len() as u64,
            "{}: container counters disagree with pool",
            self.function_id
        );
        // Walks every container.
        #[cfg(debug_assertions)]
        self.pool.check_consistency();
    }

    // ── Accessors ───────────────────────────────────────────────────

    pub fn function_id(&self) -> &str {
        &self.function_id
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn q_begin(&self) -> u64 {
        self.q_begin
    }

    pub fn q_end(&self) -> u64 {
        self.q_end
    }

    pub fn c_created(&self) -> u64 {
        self.c_created
    }

    pub fn c_creating(&self) -> u64 {
        self.c_creating
    }

    pub fn avg_execution_ms(&self) -> f64 {
        self.avg_execution_ms
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Snapshot recorded at `tick`, if retained.
    pub fn snapshot(&self, tick: u64) -> Option<Snapshot> {
        self.history.get(tick)
    }

    pub fn pool(&self) -> &ContainerPool {
        &self.pool
    }

    pub fn container_state(&self, id: ContainerId) -> Option<ContainerState> {
        self.pool.get(id).map(|c| c.state())
    }

    pub fn stats(&self) -> FunctionStats {
        FunctionStats {
            function_id: self.function_id.clone(),
            tick: self.tick,
            q_begin: self.q_begin,
            q_end: self.q_end,
            backlog: self.q_end - self.q_begin,
            c_created: self.c_created,
            c_creating: self.c_creating,
            pending_requests: self.pending.len() as u64,
            provisioning_containers: self.pool.count_in_state(ContainerState::Provisioning) as u64,
            idle_containers: self.pool.count_in_state(ContainerState::Idle) as u64,
            busy_containers: self.pool.count_in_state(ContainerState::Busy) as u64,
            avg_execution_ms: self.avg_execution_ms,
            containers_created_total: self.containers_created_total,
            containers_evicted_total: self.containers_evicted_total,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::provision::ProvisionBranch;

    const F: &str = "thumbnail";

    fn controller() -> FunctionController {
        FunctionController::new(F, ScalerConfig::default())
    }

    fn controller_with_idle(max_idle_ms: u64) -> FunctionController {
        FunctionController::new(
            F,
            ScalerConfig {
                max_idle_ms,
                ..ScalerConfig::default()
            },
        )
    }

    fn request(seq: SequenceNumber) -> Request {
        Request::new(F, seq)
    }

    fn response(seq: SequenceNumber, ms: f64) -> Response {
        Response::new(F, seq, ms)
    }

    #[test]
    fn fresh_controller_is_zeroed() {
        let c = controller();
        assert_eq!(c.tick(), 0);
        assert_eq!((c.q_begin(), c.q_end()), (0, 0));
        assert_eq!((c.c_created(), c.c_creating()), (0, 0));
        assert_eq!(c.avg_execution_ms(), 100.0);
        assert_eq!(c.snapshot(0), Some(Snapshot::default()));
    }

    #[test]
    fn first_request_bootstraps_one_container() {
        let now = Instant::now();
        let mut c = controller();

        let admission = c.handle_request(request(1), now);
        assert_eq!(admission.tick, 1);
        assert_eq!(admission.status, RequestStatus::Dispatched(ContainerId(0)));
        assert_eq!(c.c_creating(), 1);
        assert_eq!(c.pool().len(), 1);
        assert_eq!(c.container_state(ContainerId(0)), Some(ContainerState::Busy));
    }

    #[test]
    fn single_request_round_trip_confirms_creation() {
        let now = Instant::now();
        let mut c = controller();
        c.handle_request(request(1), now);

        let done = c.handle_response(response(1, 10.0), now).unwrap();
        assert_eq!(done.released, Some(ContainerId(0)));
        assert_eq!(c.c_created(), 1);
        assert_eq!(c.c_creating(), 0);
        assert_eq!(c.container_state(ContainerId(0)), Some(ContainerState::Idle));
        assert!(c.pool().is_available(ContainerId(0)));
        assert_eq!(c.q_begin(), 1);
    }

    #[test]
    fn five_requests_then_first_response() {
        let now = Instant::now();
        let mut c = controller();

        let first = c.handle_request(request(1), now);
        assert_eq!(first.tick, 1);
        assert_eq!(c.pool().len(), 1);

        // Every request advances the tick, so later ones take the
        // steady-state path and each adds a container.
        for seq in 2..=5 {
            c.handle_request(request(seq), now);
        }
        assert_eq!(c.tick(), 5);
        assert_eq!(c.c_creating(), 5);
        assert_eq!(c.pending_len(), 0);

        c.handle_response(response(1, 10.0), now).unwrap();
        assert_eq!(c.c_created(), 1);
        assert_eq!(c.c_creating(), 4);
        assert_eq!(c.pool().count_in_state(ContainerState::Idle), 1);
        assert_eq!(c.container_state(ContainerId(0)), Some(ContainerState::Idle));
    }

    #[test]
    fn empty_queue_tick_is_idempotent() {
        let now = Instant::now();
        let mut c = controller();
        for _ in 0..5 {
            let outcome = c.on_tick(now);
            assert_eq!(outcome.tick, 0);
            assert!(outcome.created.is_empty());
        }
        assert_eq!((c.c_created(), c.c_creating()), (0, 0));

        // Once everything is dispatched the queue is empty again.
        c.handle_request(request(1), now);
        let tick = c.tick();
        for _ in 0..5 {
            c.on_tick(now);
        }
        assert_eq!(c.tick(), tick);
        assert_eq!((c.c_created(), c.c_creating()), (0, 1));
        assert_eq!(c.snapshot(tick).map(|s| s.q_end), Some(0));
    }

    #[test]
    fn request_queues_when_all_containers_busy() {
        let now = Instant::now();
        let mut c = controller();

        c.handle_request(request(1), now);
        c.handle_response(response(1, 1.0), now).unwrap();
        c.handle_request(request(2), now); // reuses c-0
        c.handle_request(request(3), now); // stale backlog adds c-1

        let admission = c.handle_request(request(4), now);
        assert_eq!(admission.status, RequestStatus::Queued { position: 0 });
        assert!(admission.assignments.is_empty());
        assert_eq!(c.pending_len(), 1);

        // Completing #2 frees c-0, which picks up #4.
        let done = c.handle_response(response(2, 1.0), now).unwrap();
        assert_eq!(
            done.assignments,
            vec![Assignment {
                function_id: F.to_string(),
                sequence_number: 4,
                container_id: ContainerId(0),
            }]
        );
        assert_eq!(c.pending_len(), 0);
    }

    #[test]
    fn tick_dispatches_queued_requests() {
        let now = Instant::now();
        let mut c = controller();
        c.handle_request(request(1), now);
        c.handle_response(response(1, 1.0), now).unwrap();
        c.handle_request(request(2), now);
        c.handle_request(request(3), now);
        c.handle_request(request(4), now);
        assert_eq!(c.pending_len(), 1);

        let created = c.create_containers(1, now);
        let outcome = c.on_tick(now);
        assert_eq!(outcome.assignments.len(), 1);
        assert_eq!(outcome.assignments[0].sequence_number, 4);
        assert_eq!(outcome.assignments[0].container_id, created[0]);
    }

    #[test]
    fn busy_container_is_never_redispatched() {
        let now = Instant::now();
        let mut c = controller();
        for seq in 1..=30 {
            let admission = c.handle_request(request(seq), now);
            for a in &admission.assignments {
                assert_eq!(c.container_state(a.container_id), Some(ContainerState::Busy));
            }
        }
        let busy = c.pool().count_in_state(ContainerState::Busy) as u64;
        assert_eq!(busy + c.pending_len() as u64, 30);
        assert_eq!(c.pool().available_count(), 0);
    }

    #[test]
    fn idle_container_evicted_on_next_response() {
        let start = Instant::now();
        let mut c = controller_with_idle(1_000);
        c.handle_request(request(1), start);
        c.handle_request(request(2), start);
        assert_eq!(c.pool().len(), 2);

        c.handle_response(response(1, 5.0), start).unwrap();
        assert_eq!(c.container_state(ContainerId(0)), Some(ContainerState::Idle));
        assert_eq!(c.c_created(), 1);

        let later = start + Duration::from_millis(1_001);
        let done = c.handle_response(response(2, 5.0), later).unwrap();
        assert_eq!(done.evicted, vec![ContainerId(0)]);
        assert_eq!(c.c_created(), 1);
        assert_eq!(c.c_creating(), 0);
        assert_eq!(c.container_state(ContainerId(0)), None);
        assert_eq!(c.container_state(ContainerId(1)), Some(ContainerState::Idle));
        assert_eq!(c.stats().containers_evicted_total, 1);
    }

    #[test]
    fn container_at_threshold_is_kept() {
        let start = Instant::now();
        let mut c = controller_with_idle(1_000);
        c.handle_request(request(1), start);
        c.handle_request(request(2), start);
        c.handle_response(response(1, 5.0), start).unwrap();

        let at = start + Duration::from_millis(1_000);
        let done = c.handle_response(response(2, 5.0), at).unwrap();
        assert!(done.evicted.is_empty());
        assert_eq!(c.pool().len(), 2);
    }

    #[test]
    fn eviction_beyond_confirmed_withdraws_creations() {
        let start = Instant::now();
        let mut c = controller_with_idle(1_000);
        c.handle_request(request(1), start);
        let extra = c.create_containers(2, start);
        assert_eq!(c.c_creating(), 3);

        // The response confirms one creation; neither extra container ever
        // did anything, so both expire.
        let later = start + Duration::from_millis(2_000);
        let done = c.handle_response(response(1, 5.0), later).unwrap();
        assert_eq!(done.evicted, extra);
        assert_eq!(c.c_created(), 0);
        assert_eq!(c.c_creating(), 1);
        assert_eq!(c.pool().len(), 1);
    }

    #[test]
    fn negative_execution_time_rejected() {
        let now = Instant::now();
        let mut c = controller();
        c.handle_request(request(1), now);

        let err = c.handle_response(response(1, -1.0), now).unwrap_err();
        assert!(matches!(err, ScalerError::InvalidExecutionTime { sequence_number: 1, .. }));
        assert!(matches!(
            c.handle_response(response(1, f64::NAN), now),
            Err(ScalerError::InvalidExecutionTime { .. })
        ));

        // Nothing recorded; the request is still in flight.
        assert_eq!(c.q_begin(), 0);
        assert_eq!(c.c_creating(), 1);
        assert!(c.handle_response(response(1, 0.0), now).is_ok());
    }

    #[test]
    fn unmatched_response_rejected() {
        let now = Instant::now();
        let mut c = controller();
        let err = c.handle_response(response(9, 10.0), now).unwrap_err();
        assert_eq!(
            err,
            ScalerError::UnmatchedResponse {
                function_id: F.to_string(),
                sequence_number: 9,
            }
        );
        assert_eq!(c.q_begin(), 0);
    }

    #[test]
    fn duplicate_sequence_numbers_release_in_dispatch_order() {
        let now = Instant::now();
        let mut c = controller();
        c.handle_request(request(7), now);
        c.handle_request(request(7), now);

        let first = c.handle_response(response(7, 10.0), now).unwrap();
        let second = c.handle_response(response(7, 10.0), now).unwrap();
        assert_eq!(first.released, Some(ContainerId(0)));
        assert_eq!(second.released, Some(ContainerId(1)));
        assert!(c.handle_response(response(7, 10.0), now).is_err());
    }

    #[test]
    fn burst_with_fifty_ms_functions_requires_ten() {
        let now = Instant::now();
        let mut c = controller();
        c.handle_request(request(1), now);
        c.handle_response(response(1, 50.0), now).unwrap();

        for seq in 2..=21 {
            c.handle_request(request(seq), now);
        }
        assert_eq!(c.q_end() - c.q_begin(), 20);

        let outcome = c.on_tick(now);
        assert_eq!(outcome.plan.per_container, Some(2.0));
        assert_eq!(outcome.plan.required, Some(10));
        assert_eq!(outcome.plan.branch, ProvisionBranch::StaleBacklog);
        // Creations already in flight cover the requirement.
        assert_eq!(c.c_creating(), 10);
        assert!(outcome.created.is_empty());
    }

    #[test]
    fn provisioning_never_exceeds_backlog() {
        let mut now = Instant::now();
        let mut c = controller();
        let mut seq = 0;
        for round in 0..40u64 {
            for _ in 0..(round % 7) {
                seq += 1;
                c.handle_request(request(seq), now);
            }
            let outcome = c.on_tick(now);
            let backlog = c.snapshot(outcome.tick).map(|s| s.backlog()).unwrap_or(0);
            assert!(outcome.created.len() as u64 <= backlog);
            assert!(c.q_begin() <= c.q_end());
            now += Duration::from_millis(100);
        }
    }

    #[test]
    fn average_tracks_window() {
        let now = Instant::now();
        let mut c = FunctionController::new(
            F,
            ScalerConfig {
                execution_time_window_size: 2,
                ..ScalerConfig::default()
            },
        );
        for (seq, ms) in [(1, 10.0), (2, 20.0), (3, 40.0)] {
            c.handle_request(request(seq), now);
            c.handle_response(response(seq, ms), now).unwrap();
        }
        c.handle_request(request(4), now);
        // Window of two: (20 + 40) / 2.
        assert_eq!(c.avg_execution_ms(), 30.0);
    }

    #[test]
    fn stats_reflect_state() {
        let now = Instant::now();
        let mut c = controller();
        c.handle_request(request(1), now);
        c.handle_request(request(2), now);
        c.handle_response(response(1, 10.0), now).unwrap();

        let stats = c.stats();
        assert_eq!(stats.function_id, F);
        assert_eq!(stats.q_end, 2);
        assert_eq!(stats.backlog, 1);
        assert_eq!(stats.c_created, 1);
        assert_eq!(stats.c_creating, 1);
        assert_eq!(stats.idle_containers, 1);
        assert_eq!(stats.busy_containers, 1);
        assert_eq!(stats.containers_created_total, 2);
    }
}
