//! Shared domain types for the tickscale control loop.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Caller-assigned sequence number of a request. Not required to be unique.
pub type SequenceNumber = u64;

/// An invocation of a registered function.
///
/// Created by the request source and consumed once it is dispatched
/// to a container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    pub function_id: String,
    pub sequence_number: SequenceNumber,
}

impl Request {
    pub fn new(function_id: impl Into<String>, sequence_number: SequenceNumber) -> Self {
        Self {
            function_id: function_id.into(),
            sequence_number,
        }
    }
}

/// Completion report for a previously dispatched request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub function_id: String,
    pub sequence_number: SequenceNumber,
    /// Observed execution time in milliseconds.
    pub execution_time_ms: f64,
}

impl Response {
    pub fn new(
        function_id: impl Into<String>,
        sequence_number: SequenceNumber,
        execution_time_ms: f64,
    ) -> Self {
        Self {
            function_id: function_id.into(),
            sequence_number,
            execution_time_ms,
        }
    }
}

/// Identifier of a container within one function.
///
/// Generated monotonically by the owning controller and never reused,
/// so ordering by id is ordering by creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ContainerId(pub u64);

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "c-{}", self.0)
    }
}

/// Lifecycle state of a container.
///
/// `Provisioning → Idle ⇄ Busy`; eviction removes the container outright.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerState {
    /// Requested but not yet counted as available.
    Provisioning,
    /// Available for dispatch.
    Idle,
    /// Serving exactly one request.
    Busy,
}

impl fmt::Display for ContainerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ContainerState::Provisioning => "provisioning",
            ContainerState::Idle => "idle",
            ContainerState::Busy => "busy",
        };
        f.write_str(s)
    }
}
