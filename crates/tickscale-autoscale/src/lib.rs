//! tickscale-autoscale — snapshot-driven container autoscaling.
//!
//! Each registered function gets a [`FunctionController`] that counts
//! enqueued (`Q_end`) and completed (`Q_begin`) requests, records a
//! [`Snapshot`] per tick, and provisions containers from the trend between
//! the current and previous snapshot. Requests are dispatched to containers
//! through a [`DispatchPool`]; containers idle past `max_idle_ms` are
//! evicted when responses arrive.
//!
//! # Architecture
//!
//! ```text
//! Dispatcher
//!   ├── submit_request()  → FunctionController::handle_request
//!   ├── submit_response() → FunctionController::handle_response
//!   ├── tick()            → renew_snapshot + provision_containers (all functions)
//!   └── spawn_ticker()    → cancellable periodic loop
//!
//! FunctionController (one per function, behind a mutex)
//!   ├── SnapshotHistory   (tick-indexed counters)
//!   ├── ExecutionWindow   (last N execution times)
//!   ├── ContainerPool     (containers + LowestIdFirst dispatch order)
//!   └── provision::plan   (bootstrap / stale backlog / arrival burst)
//! ```

pub mod container;
pub mod controller;
pub mod dispatcher;
pub mod error;
pub mod pool;
pub mod prometheus;
pub mod provision;
pub mod snapshot;
pub mod stats;
pub mod window;

pub use container::Container;
pub use controller::{
    Admission, Assignment, Completion, FunctionController, RequestStatus, TickOutcome,
};
pub use dispatcher::{AssignmentCallback, Dispatcher, RequestHandle, Ticker};
pub use error::{ScalerError, ScalerResult};
pub use pool::{ContainerPool, DispatchPool, LowestIdFirst};
pub use prometheus::render_prometheus;
pub use provision::{ProvisionBranch, ProvisionInput, ProvisionPlan};
pub use snapshot::{Snapshot, SnapshotHistory};
pub use stats::FunctionStats;
pub use window::ExecutionWindow;
