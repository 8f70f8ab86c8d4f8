//! Dispatcher — routes requests and responses to per-function controllers
//! and drives the periodic tick.
//!
//! Each controller sits behind its own mutex, so operations on one function
//! are serialized while different functions proceed independently. The
//! registry lock is held only long enough to look a controller up.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use tokio::sync::{Mutex, RwLock, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use tickscale_core::{ContainerId, Request, Response, ScalerConfig, SequenceNumber};

use crate::controller::{Assignment, FunctionController, RequestStatus, TickOutcome};
use crate::error::{ScalerError, ScalerResult};
use crate::stats::FunctionStats;

/// Callback invoked for every request handed to a container, whether the
/// hand-off happened on submission, on a response, or on a tick.
pub type AssignmentCallback = Arc<dyn Fn(&Assignment) + Send + Sync>;

type SharedController = Arc<Mutex<FunctionController>>;

/// Receipt returned by [`Dispatcher::submit_request`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestHandle {
    pub function_id: String,
    pub sequence_number: SequenceNumber,
    /// Controller tick after admission.
    pub tick: u64,
    pub status: RequestStatus,
}

impl RequestHandle {
    /// Container serving the request, if it was dispatched on submission.
    pub fn container(&self) -> Option<ContainerId> {
        match self.status {
            RequestStatus::Dispatched(id) => Some(id),
            RequestStatus::Queued { .. } => None,
        }
    }
}

/// Owns one [`FunctionController`] per registered function.
pub struct Dispatcher {
    config: ScalerConfig,
    /// Registered functions: function_id → controller.
    controllers: RwLock<HashMap<String, SharedController>>,
    on_assignment: Option<AssignmentCallback>,
    /// Completed periodic rounds.
    rounds: AtomicU64,
}

impl Dispatcher {
    pub fn new(config: ScalerConfig) -> Self {
        Self {
            config,
            controllers: RwLock::new(HashMap::new()),
            on_assignment: None,
            rounds: AtomicU64::new(0),
        }
    }

    /// Set the callback notified of every assignment.
    pub fn with_assignment_callback(mut self, callback: AssignmentCallback) -> Self {
        self.on_assignment = Some(callback);
        self
    }

    pub fn config(&self) -> &ScalerConfig {
        &self.config
    }

    /// Register a function with fresh controller state.
    ///
    /// Idempotent: returns `false` and keeps the existing state if the
    /// function is already registered.
    pub async fn register_function(&self, function_id: &str) -> bool {
        let mut controllers = self.controllers.write().await;
        if controllers.contains_key(function_id) {
            return false;
        }
        controllers.insert(
            function_id.to_string(),
            Arc::new(Mutex::new(FunctionController::new(
                function_id,
                self.config.clone(),
            ))),
        );
        info!(function = %function_id, "function registered");
        true
    }

    /// Drop a function and all of its state.
    pub async fn unregister_function(&self, function_id: &str) -> bool {
        let removed = self.controllers.write().await.remove(function_id).is_some();
        if removed {
            info!(function = %function_id, "function unregistered");
        }
        removed
    }

    pub async fn is_registered(&self, function_id: &str) -> bool {
        self.controllers.read().await.contains_key(function_id)
    }

    /// Registered function ids, sorted.
    pub async fn functions(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.controllers.read().await.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Enqueue a request for `function_id` and try to dispatch it.
    pub async fn submit_request(
        &self,
        function_id: &str,
        sequence_number: SequenceNumber,
    ) -> ScalerResult<RequestHandle> {
        let controller = self.controller(function_id).await?;
        let admission = {
            let mut guard = controller.lock().await;
            guard.handle_request(Request::new(function_id, sequence_number), Instant::now())
        };
        self.notify(&admission.assignments);

        Ok(RequestHandle {
            function_id: function_id.to_string(),
            sequence_number,
            tick: admission.tick,
            status: admission.status,
        })
    }

    /// Report completion of a dispatched request.
    pub async fn submit_response(
        &self,
        function_id: &str,
        sequence_number: SequenceNumber,
        execution_time_ms: f64,
    ) -> ScalerResult<()> {
        let controller = self.controller(function_id).await?;
        let completion = {
            let mut guard = controller.lock().await;
            guard.handle_response(
                Response::new(function_id, sequence_number, execution_time_ms),
                Instant::now(),
            )?
        };
        self.notify(&completion.assignments);
        Ok(())
    }

    /// Run one periodic round over every registered function.
    pub async fn tick(&self) -> Vec<TickOutcome> {
        let controllers: Vec<SharedController> =
            self.controllers.read().await.values().cloned().collect();

        let mut outcomes = Vec::with_capacity(controllers.len());
        for controller in controllers {
            let outcome = controller.lock().await.on_tick(Instant::now());
            self.notify(&outcome.assignments);
            outcomes.push(outcome);
        }

        let round = self.rounds.fetch_add(1, Ordering::Relaxed) + 1;
        debug!(round, functions = outcomes.len(), "tick round complete");
        outcomes
    }

    /// Run one periodic round for a single function.
    pub async fn tick_function(&self, function_id: &str) -> ScalerResult<TickOutcome> {
        let controller = self.controller(function_id).await?;
        let outcome = controller.lock().await.on_tick(Instant::now());
        self.notify(&outcome.assignments);
        Ok(outcome)
    }

    /// Number of periodic rounds completed via [`Dispatcher::tick`].
    pub fn rounds(&self) -> u64 {
        self.rounds.load(Ordering::Relaxed)
    }

    /// Stats for every registered function, sorted by id.
    pub async fn stats(&self) -> Vec<FunctionStats> {
        let controllers: Vec<SharedController> =
            self.controllers.read().await.values().cloned().collect();

        let mut stats = Vec::with_capacity(controllers.len());
        for controller in controllers {
            stats.push(controller.lock().await.stats());
        }
        stats.sort_by(|a, b| a.function_id.cmp(&b.function_id));
        stats
    }

    pub async fn function_stats(&self, function_id: &str) -> ScalerResult<FunctionStats> {
        let controller = self.controller(function_id).await?;
        let stats = controller.lock().await.stats();
        Ok(stats)
    }

    /// Run the tick loop until shutdown signal.
    ///
    /// Shutdown is checked before every tick, so no round starts once it
    /// has been observed. A round already in progress runs to completion.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        info!(
            interval_ms = self.config.tick_interval_ms,
            "tick driver started"
        );

        let mut interval = tokio::time::interval(self.config.tick_interval());
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            if *shutdown.borrow() {
                break;
            }
            tokio::select! {
                biased;
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
                _ = interval.tick() => {
                    self.tick().await;
                }
            }
        }

        info!(rounds = self.rounds(), "tick driver shutting down");
    }

    /// Spawn the tick loop as a background task owned by the returned handle.
    pub fn spawn_ticker(self: &Arc<Self>) -> Ticker {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let dispatcher = Arc::clone(self);
        let handle = tokio::spawn(async move {
            dispatcher.run(shutdown_rx).await;
        });
        Ticker {
            shutdown_tx,
            handle,
        }
    }

    // ── Internal helpers ────────────────────────────────────────────

    async fn controller(&self, function_id: &str) -> ScalerResult<SharedController> {
        self.controllers
            .read()
            .await
            .get(function_id)
            .cloned()
            .ok_or_else(|| ScalerError::UnknownFunction(function_id.to_string()))
    }

    fn notify(&self, assignments: &[Assignment]) {
        if let Some(ref callback) = self.on_assignment {
            for assignment in assignments {
                callback(assignment);
            }
        }
    }
}

/// Handle to a running tick loop.
pub struct Ticker {
    shutdown_tx: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl Ticker {
    /// Signal the loop to stop and wait for it to exit.
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(true);
        let _ = self.handle.await;
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}
