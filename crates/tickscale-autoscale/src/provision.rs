//! Container provisioning decision.
//!
//! ```text
//! C_total    = S[t].C_created + S[t].C_creating
//! R_in_queue = S[t].Q_end - S[t].Q_begin
//!
//! t == 1:
//!     C_creating == 0  → shortage = 1
//!     otherwise        → shortage = Q_end - S[t].C_creating
//!
//! t > 1 and C_total < R_in_queue:
//!     P_container = tick_interval / T_avg_exec
//!     R_arrivals  = S[t].Q_end - S[t-1].Q_end
//!     C_required  = ceil(R_in_queue / P_container)
//!     R_arrivals < R_in_queue               → shortage = C_required - S[t].C_creating
//!     R_arrivals >= P_container * C_total   → shortage = C_required - C_total
//!     otherwise                             → shortage = 0
//!
//! create min(shortage, R_in_queue) when shortage > 0
//! ```

use crate::snapshot::Snapshot;

/// Floor applied to the execution-time estimate.
///
/// A window of zero-duration samples would otherwise make per-container
/// capacity infinite and suppress all provisioning.
pub const MIN_EXECUTION_ESTIMATE_MS: f64 = 1.0;

/// Which rule produced a [`ProvisionPlan`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvisionBranch {
    /// First tick with nothing in flight: create one container.
    Bootstrap,
    /// First tick with creations already in flight: catch up to demand.
    BootstrapCatchUp,
    /// Backlog is mostly older than this tick and not draining.
    StaleBacklog,
    /// Arrivals this tick alone saturate existing capacity.
    ArrivalBurst,
    /// Capacity (existing or in flight) judged sufficient.
    Sufficient,
}

/// Inputs to [`plan`], all taken under the controller lock.
#[derive(Debug, Clone, Copy)]
pub struct ProvisionInput {
    pub tick: u64,
    /// Snapshot at `tick`.
    pub current: Snapshot,
    /// Snapshot at `tick - 1`; ignored on ticks 0 and 1.
    pub previous: Snapshot,
    /// Live cumulative enqueue counter.
    pub q_end: u64,
    pub avg_execution_ms: f64,
    pub tick_interval_ms: f64,
}

/// Outcome of a provisioning evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProvisionPlan {
    pub branch: ProvisionBranch,
    /// Raw shortage; may be zero or negative.
    pub shortage: i64,
    /// Containers to create: `min(shortage, backlog)` clamped at zero.
    pub to_create: u64,
    /// Estimated requests one container finishes per tick (steady state only).
    pub per_container: Option<f64>,
    /// Containers needed to drain the backlog in one tick (steady state only).
    pub required: Option<u64>,
}

/// Evaluate how many containers to create at `input.tick`.
pub fn plan(input: &ProvisionInput) -> ProvisionPlan {
    let current = input.current;
    let c_total = current.total_containers();
    let backlog = current.backlog();

    let mut per_container = None;
    let mut required = None;

    let (branch, shortage) = if input.tick == 1 {
        if current.c_creating == 0 {
            (ProvisionBranch::Bootstrap, 1)
        } else {
            (
                ProvisionBranch::BootstrapCatchUp,
                signed(input.q_end).saturating_sub(signed(current.c_creating)),
            )
        }
    } else if input.tick > 1 && c_total < backlog {
        let estimate = input.avg_execution_ms.max(MIN_EXECUTION_ESTIMATE_MS);
        let p_container = input.tick_interval_ms / estimate;
        let arrivals = current.q_end.saturating_sub(input.previous.q_end);
        // Float to int casts saturate, so a huge estimate yields u64::MAX.
        let c_required = (backlog as f64 / p_container).ceil() as u64;
        per_container = Some(p_container);
        required = Some(c_required);

        if arrivals < backlog {
            (
                ProvisionBranch::StaleBacklog,
                signed(c_required).saturating_sub(signed(current.c_creating)),
            )
        } else if arrivals as f64 >= p_container * c_total as f64 {
            (
                ProvisionBranch::ArrivalBurst,
                signed(c_required).saturating_sub(signed(c_total)),
            )
        } else {
            (ProvisionBranch::Sufficient, 0)
        }
    } else {
        (ProvisionBranch::Sufficient, 0)
    };

    let to_create = if shortage > 0 {
        (shortage as u64).min(backlog)
    } else {
        0
    };

    ProvisionPlan {
        branch,
        shortage,
        to_create,
        per_container,
        required,
    }
}

fn signed(n: u64) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}
