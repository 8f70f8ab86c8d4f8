//! Synthetic workload with a request source per function and a shared response source.
//!
//! Request sources submit at random gaps. Every assignment reported by the
//! dispatcher is executed by sleeping for a random duration, after which the
//! measured execution time is submitted as the response.

use std::ops::RangeInclusive;
use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::Rng;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use tickscale_autoscale::{Assignment, Dispatcher};

/// Timing knobs for the synthetic workload, in milliseconds.
#[derive(Debug, Clone)]
pub struct WorkloadConfig {
    pub request_gap_ms: RangeInclusive<u64>,
    pub execution_ms: RangeInclusive<u64>,
}

impl Default for WorkloadConfig {
    fn default() -> Self {
        Self {
            request_gap_ms: 400..=1000,
            execution_ms: 100..=200,
        }
    }
}

impl WorkloadConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            !self.request_gap_ms.is_empty(),
            "request gap range is empty: {:?}",
            self.request_gap_ms
        );
        anyhow::ensure!(
            !self.execution_ms.is_empty(),
            "execution time range is empty: {:?}",
            self.execution_ms
        );
        Ok(())
    }
}

fn sample(range: &RangeInclusive<u64>) -> Duration {
    Duration::from_millis(rand::rng().random_range(range.clone()))
}

/// Spawn one request source per function.
pub fn spawn_request_sources(
    dispatcher: Arc<Dispatcher>,
    functions: &[String],
    config: &WorkloadConfig,
    shutdown: watch::Receiver<bool>,
) -> Vec<JoinHandle<()>> {
    functions
        .iter()
        .cloned()
        .map(|function_id| {
            let dispatcher = dispatcher.clone();
            let gap = config.request_gap_ms.clone();
            let mut shutdown = shutdown.clone();
            tokio::spawn(async move {
                let mut sequence_number = 0u64;
                loop {
                    tokio::select! {
                        biased;
                        _ = shutdown.changed() => break,
                        _ = tokio::time::sleep(sample(&gap)) => {
                            sequence_number += 1;
                            match dispatcher.submit_request(&function_id, sequence_number).await {
                                Ok(handle) => debug!(
                                    function = %function_id,
                                    sequence = sequence_number,
                                    status = ?handle.status,
                                    "request submitted"
                                ),
                                Err(e) => warn!(function = %function_id, error = %e, "request rejected"),
                            }
                        }
                    }
                }
            })
        })
        .collect()
}

/// Execute assignments as they arrive and report responses.
///
/// Each assignment runs in its own task so containers execute in parallel.
/// In-flight executions are abandoned on shutdown.
pub fn spawn_response_source(
    dispatcher: Arc<Dispatcher>,
    mut assignments: mpsc::UnboundedReceiver<Assignment>,
    config: &WorkloadConfig,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()> {
    let execution = config.execution_ms.clone();
    tokio::spawn(async move {
        loop {
            tokio::select! {
                biased;
                _ = shutdown.changed() => break,
                next = assignments.recv() => {
                    let Some(assignment) = next else { break };
                    let dispatcher = dispatcher.clone();
                    let delay = sample(&execution);
                    tokio::spawn(async move {
                        let started = Instant::now();
                        tokio::time::sleep(delay).await;
                        let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
                        if let Err(e) = dispatcher
                            .submit_response(
                                &assignment.function_id,
                                assignment.sequence_number,
                                elapsed_ms,
                            )
                            .await
                        {
                            warn!(
                                function = %assignment.function_id,
                                sequence = assignment.sequence_number,
                                error = %e,
                                "response rejected"
                            );
                        }
                    });
                }
            }
        }
    })
}
