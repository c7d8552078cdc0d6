//! Shared-link coupling loop
//!
//! Two flows share one capacity ceiling. Every round both flows record
//! their window, then take the same AIMD branch: increase while their
//! combined window is below the ceiling, decrease otherwise. Sampling and
//! the bandwidth re-estimate follow, flow A first.

use crate::flow::Flow;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Which AIMD branch a round took
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Branch {
    Increase,
    Decrease,
}

/// Counters collected over one run of the loop
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub rounds: usize,
    pub increases: usize,
    pub decreases: usize,
    /// Sum of flow A's pre-update window over all rounds, in packets.
    /// Reported only; the branch decision never reads it.
    pub total_data_sent: f64,
}

/// Capacity ceiling shared by the two flows, in packets
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharedLink {
    capacity: u32,
}

impl SharedLink {
    pub fn new(capacity: u32) -> Self {
        Self { capacity }
    }

    /// Take the ceiling from a flow's `max_cwnd`. The shared experiment
    /// reads it from flow A only.
    pub fn from_flow(flow: &Flow) -> Self {
        Self::new(flow.max_cwnd())
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Joint branch for the given windows
    pub fn branch_for(&self, cwnd_a: f64, cwnd_b: f64) -> Branch {
        if cwnd_a + cwnd_b < self.capacity as f64 {
            Branch::Increase
        } else {
            Branch::Decrease
        }
    }

    /// Run a single round on both flows and return the branch taken.
    pub fn step(&self, a: &mut Flow, b: &mut Flow) -> Branch {
        a.record_cwnd();
        b.record_cwnd();

        let branch = self.branch_for(a.cwnd(), b.cwnd());
        trace!(
            cwnd_a = a.cwnd(),
            cwnd_b = b.cwnd(),
            capacity = self.capacity,
            ?branch,
            "round"
        );

        match branch {
            Branch::Increase => {
                a.increase();
                b.increase();
            }
            Branch::Decrease => {
                a.decrease();
                b.decrease();
            }
        }

        for flow in [a, b] {
            flow.sample_latency();
            flow.sample_throughput();
            flow.recheck_bandwidth();
        }

        branch
    }

    /// Drive both flows for exactly `rounds` rounds.
    pub fn run(&self, a: &mut Flow, b: &mut Flow, rounds: usize) -> RunReport {
        debug!(
            flow_a = a.name(),
            flow_b = b.name(),
            capacity = self.capacity,
            rounds,
            "Starting shared-link experiment"
        );

        let mut report = RunReport::default();
        for _ in 0..rounds {
            report.total_data_sent += a.cwnd();
            match self.step(a, b) {
                Branch::Increase => report.increases += 1,
                Branch::Decrease => report.decreases += 1,
            }
            report.rounds += 1;
        }

        debug!(
            increases = report.increases,
            decreases = report.decreases,
            final_cwnd_a = a.cwnd(),
            final_cwnd_b = b.cwnd(),
            "Shared-link experiment finished"
        );
        report
    }
}

/// Run two flows over a link whose capacity is flow A's `max_cwnd`.
pub fn run_shared_experiment(a: &mut Flow, b: &mut Flow, rounds: usize) -> RunReport {
    SharedLink::from_flow(a).run(a, b, rounds)
}
