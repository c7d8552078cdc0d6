//! AIMD update rule
//!
//! Transitions applied to a [`Flow`] once per round. None of them can fail:
//! every update re-clamps the window and the AIMD parameters into their
//! ranges, and every sampling call appends exactly one value.

use crate::flow::Flow;

/// Bounds on the additive-increase step
pub const ALPHA_MIN: f64 = 1.0;
pub const ALPHA_MAX: f64 = 8.0;
/// Bounds on the multiplicative-decrease factor
pub const BETA_MIN: f64 = 0.5;
pub const BETA_MAX: f64 = 0.9;

/// Fixed nudge applied to `alpha` after its hook
pub const ALPHA_STEP: f64 = 1.0;
/// Fixed nudge applied to `beta` after its hook
pub const BETA_STEP: f64 = 0.1;

/// Each window unit is one packet of this many KB.
pub const PACKET_SIZE_KB: f64 = 1.0;

/// Time step used by [`Flow::sample_throughput`]
pub const DEFAULT_TIME_STEP: f64 = 1.0;

impl Flow {
    /// Additive increase.
    ///
    /// Grows the window by `alpha` up to `max_cwnd`, runs the alpha hook,
    /// then bumps `alpha` by one and `beta` by 0.1. `beta` moves up on an
    /// increase as well.
    pub fn increase(&mut self) {
        self.cwnd = (self.cwnd + self.alpha).min(self.max_cwnd as f64).max(1.0);

        self.alpha = (self.alpha_hook)(self.alpha);
        // min before max: a NaN parameter settles on the upper bound
        self.alpha = (self.alpha + ALPHA_STEP).min(ALPHA_MAX).max(ALPHA_MIN);
        self.beta = (self.beta + BETA_STEP).min(BETA_MAX).max(BETA_MIN);
    }

    /// Multiplicative decrease.
    ///
    /// Scales the window by `beta`, truncating toward zero and never going
    /// below one packet, runs the beta hook, then lowers `beta` by 0.1 and
    /// `alpha` by one.
    pub fn decrease(&mut self) {
        let reduced = (self.cwnd * self.beta).trunc();
        self.cwnd = reduced.min(self.max_cwnd as f64).max(1.0);

        self.beta = (self.beta_hook)(self.beta);
        // max before min: a NaN parameter settles on the lower bound
        self.beta = (self.beta - BETA_STEP).max(BETA_MIN).min(BETA_MAX);
        self.alpha = (self.alpha - ALPHA_STEP).max(ALPHA_MIN).min(ALPHA_MAX);
    }

    /// Record RTT plus the time to push the current window through the
    /// current bandwidth, in seconds.
    pub fn sample_latency(&mut self) {
        let data_in_flight_kb = self.cwnd * PACKET_SIZE_KB;
        let bandwidth_kbps = self.bandwidth * 1000.0 / 8.0;
        let transmission_delay = data_in_flight_kb / bandwidth_kbps;
        self.latency_history.push(self.rtt + transmission_delay);
    }

    /// Record the window as KB sent over one time step.
    pub fn sample_throughput(&mut self) {
        self.sample_throughput_over(DEFAULT_TIME_STEP);
    }

    /// Record the window as KB sent over `time_step`.
    pub fn sample_throughput_over(&mut self, time_step: f64) {
        let data_transmitted_kb = self.cwnd * PACKET_SIZE_KB;
        self.throughput_history.push(data_transmitted_kb / time_step);
    }

    /// Re-estimate bandwidth as the rate needed to deliver the current
    /// window within one RTT, capped at `max_bandwidth`.
    pub fn recheck_bandwidth(&mut self) {
        let data_in_flight_kb = self.cwnd * PACKET_SIZE_KB;
        let required_kbps = data_in_flight_kb / self.rtt;
        let required_mbps = required_kbps * 8.0 / 1000.0;
        self.bandwidth = required_mbps.min(self.max_bandwidth);
    }
}
