//! Point-in-time view of a controller, for logging and exposition.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionStats {
    pub function_id: String,
    pub tick: u64,
    pub q_begin: u64,
    pub q_end: u64,
    pub backlog: u64,
    pub c_created: u64,
    pub c_creating: u64,
    pub pending_requests: u64,
    pub provisioning_containers: u64,
    pub idle_containers: u64,
    pub busy_containers: u64,
    pub avg_execution_ms: f64,
    pub containers_created_total: u64,
    pub containers_evicted_total: u64,
}
