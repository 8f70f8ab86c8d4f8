//! Prometheus text exposition format.
//!
//! Renders controller stats into the Prometheus text exposition format
//! for scraping by a Prometheus server or compatible agent.

use std::fmt::Write;

use crate::stats::FunctionStats;

/// Render a list of function stats into Prometheus text format.
///
/// Produces GAUGE and COUNTER metrics with `function` labels.
pub fn render_prometheus(stats: &[FunctionStats]) -> String {
    let mut out = String::new();

    family(&mut out, "tickscale_tick", "gauge", "Current tick index.", stats, |s| {
        s.tick.to_string()
    });
    family(
        &mut out,
        "tickscale_backlog",
        "gauge",
        "Requests enqueued but not yet completed.",
        stats,
        |s| s.backlog.to_string(),
    );
    family(
        &mut out,
        "tickscale_pending_requests",
        "gauge",
        "Requests waiting for a container.",
        stats,
        |s| s.pending_requests.to_string(),
    );
    family(
        &mut out,
        "tickscale_requests_enqueued_total",
        "counter",
        "Requests accepted.",
        stats,
        |s| s.q_end.to_string(),
    );
    family(
        &mut out,
        "tickscale_requests_completed_total",
        "counter",
        "Responses accounted.",
        stats,
        |s| s.q_begin.to_string(),
    );
    family(
        &mut out,
        "tickscale_avg_execution_ms",
        "gauge",
        "Moving average execution time in milliseconds.",
        stats,
        |s| format!("{:.2}", s.avg_execution_ms),
    );

    out.push_str("# HELP tickscale_containers Live containers by state.\n");
    out.push_str("# TYPE tickscale_containers gauge\n");
    for s in stats {
        for (state, count) in [
            ("provisioning", s.provisioning_containers),
            ("idle", s.idle_containers),
            ("busy", s.busy_containers),
        ] {
            let _ = writeln!(
                out,
                "tickscale_containers{{function=\"{}\",state=\"{state}\"}} {count}",
                s.function_id
            );
        }
    }

    family(
        &mut out,
        "tickscale_containers_created_total",
        "counter",
        "Containers created.",
        stats,
        |s| s.containers_created_total.to_string(),
    );
    family(
        &mut out,
        "tickscale_containers_evicted_total",
        "counter",
        "Containers evicted after idling.",
        stats,
        |s| s.containers_evicted_total.to_string(),
    );

    out
}

fn family(
    out: &mut String,
    name: &str,
    kind: &str,
    help: &str,
    stats: &[FunctionStats],
    value: impl Fn(&FunctionStats) -> String,
) {
    let _ = writeln!(out, "# HELP {name} {help}");
    let _ = writeln!(out, "# TYPE {name} {kind}");
    for s in stats {
        let _ = writeln!(out, "{name}{{function=\"{}\"}} {}", s.function_id, value(s));
    }
}
