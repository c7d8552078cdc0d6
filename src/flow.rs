//! Per-flow congestion-control state
//!
//! A [`Flow`] is one simulated TCP Reno sender. It is built once per
//! experiment from a [`FlowConfig`], mutated in place by the AIMD
//! transitions in [`crate::aimd`], and read back through its history
//! accessors once the run completes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Pure parameter-adaptation function, applied to `alpha` on increase and
/// to `beta` on decrease.
pub type ParamHook = Arc<dyn Fn(f64) -> f64 + Send + Sync>;

/// Serializable description of a parameter-adaptation hook
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HookSpec {
    /// Leave the parameter unchanged
    #[default]
    Identity,
    /// Multiply the parameter by a constant factor
    Scale(f64),
    /// Add a constant (possibly negative) offset
    Offset(f64),
}

impl HookSpec {
    pub fn into_hook(self) -> ParamHook {
        match self {
            HookSpec::Identity => Arc::new(|v| v),
            HookSpec::Scale(factor) => Arc::new(move |v| v * factor),
            HookSpec::Offset(delta) => Arc::new(move |v| v + delta),
        }
    }
}

/// Construction parameters for a single flow
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowConfig {
    /// Label used in reports
    pub name: String,
    /// Additive-increase step (packets per round)
    pub alpha: f64,
    /// Multiplicative-decrease factor
    pub beta: f64,
    /// Starting congestion window in packets
    pub initial_cwnd: u32,
    /// Upper clamp for the congestion window
    pub max_cwnd: u32,
    /// Round-trip time in seconds
    pub rtt: f64,
    /// Starting effective bandwidth in Mbps
    pub bandwidth: f64,
    /// Bandwidth ceiling in Mbps
    pub max_bandwidth: f64,
    pub alpha_hook: HookSpec,
    pub beta_hook: HookSpec,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            name: "TCP Reno".to_string(),
            alpha: 1.0,
            beta: 0.5,
            initial_cwnd: 1,
            max_cwnd: 10,
            rtt: 1.0,
            bandwidth: 10.0,
            max_bandwidth: 100.0,
            alpha_hook: HookSpec::Identity,
            beta_hook: HookSpec::Identity,
        }
    }
}

impl FlowConfig {
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_params(mut self, alpha: f64, beta: f64) -> Self {
        self.alpha = alpha;
        self.beta = beta;
        self
    }

    pub fn with_cwnd(mut self, initial_cwnd: u32) -> Self {
        self.initial_cwnd = initial_cwnd;
        self
    }
}

/// One simulated TCP Reno sender
#[derive(Clone)]
pub struct Flow {
    pub(crate) name: String,
    pub(crate) alpha: f64,
    pub(crate) beta: f64,
    pub(crate) cwnd: f64,
    pub(crate) max_cwnd: u32,
    pub(crate) rtt: f64,
    pub(crate) bandwidth: f64,
    pub(crate) max_bandwidth: f64,
    pub(crate) bdp: f64,

    pub(crate) cwnd_history: Vec<f64>,
    pub(crate) latency_history: Vec<f64>,
    pub(crate) throughput_history: Vec<f64>,

    pub(crate) alpha_hook: ParamHook,
    pub(crate) beta_hook: ParamHook,
}

impl Flow {
    /// Build a flow. The initial window is taken as given; it is only
    /// brought into `[1, max_cwnd]` by the first AIMD step.
    pub fn new(config: FlowConfig) -> Self {
        // Bytes; snapshot of the starting bandwidth, never recomputed.
        let bdp = config.bandwidth * config.rtt * (1_000_000.0 / 8.0);

        Self {
            name: config.name,
            alpha: config.alpha,
            beta: config.beta,
            cwnd: config.initial_cwnd as f64,
            max_cwnd: config.max_cwnd,
            rtt: config.rtt,
            bandwidth: config.bandwidth,
            max_bandwidth: config.max_bandwidth,
            bdp,
            cwnd_history: Vec::new(),
            latency_history: Vec::new(),
            throughput_history: Vec::new(),
            alpha_hook: config.alpha_hook.into_hook(),
            beta_hook: config.beta_hook.into_hook(),
        }
    }

    /// Replace the hook applied to `alpha` during each increase.
    pub fn with_alpha_hook(mut self, hook: impl Fn(f64) -> f64 + Send + Sync + 'static) -> Self {
        self.alpha_hook = Arc::new(hook);
        self
    }

    /// Replace the hook applied to `beta` during each decrease.
    pub fn with_beta_hook(mut self, hook: impl Fn(f64) -> f64 + Send + Sync + 'static) -> Self {
        self.beta_hook = Arc::new(hook);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn beta(&self) -> f64 {
        self.beta
    }

    /// Congestion window in packets. Fractional after an increase by a
    /// fractional `alpha`; whole after every decrease.
    pub fn cwnd(&self) -> f64 {
        self.cwnd
    }

    pub fn max_cwnd(&self) -> u32 {
        self.max_cwnd
    }

    pub fn rtt(&self) -> f64 {
        self.rtt
    }

    /// Current effective bandwidth in Mbps
    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    pub fn max_bandwidth(&self) -> f64 {
        self.max_bandwidth
    }

    /// Bandwidth-delay product in bytes, fixed at construction
    pub fn bdp(&self) -> f64 {
        self.bdp
    }

    /// Window before each round's AIMD step, one entry per round
    pub fn cwnd_history(&self) -> &[f64] {
        &self.cwnd_history
    }

    /// Latency samples in seconds, one entry per round
    pub fn latency_history(&self) -> &[f64] {
        &self.latency_history
    }

    /// Throughput samples in KB per time step, one entry per round
    pub fn throughput_history(&self) -> &[f64] {
        &self.throughput_history
    }

    pub fn rounds_recorded(&self) -> usize {
        self.cwnd_history.len()
    }

    pub(crate) fn record_cwnd(&mut self) {
        self.cwnd_history.push(self.cwnd);
    }
}

impl fmt::Debug for Flow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Flow")
            .field("name", &self.name)
            .field("alpha", &self.alpha)
            .field("beta", &self.beta)
            .field("cwnd", &self.cwnd)
            .field("max_cwnd", &self.max_cwnd)
            .field("rtt", &self.rtt)
            .field("bandwidth", &self.bandwidth)
            .field("max_bandwidth", &self.max_bandwidth)
            .field("bdp", &self.bdp)
            .field("rounds", &self.cwnd_history.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference_constructor() {
        let flow = Flow::new(FlowConfig::default());

        assert_eq!(flow.name(), "TCP Reno");
        assert_eq!(flow.cwnd(), 1.0);
        assert_eq!(flow.max_cwnd(), 10);
        assert_eq!(flow.rtt(), 1.0);
        assert_eq!(flow.bandwidth(), 10.0);
        assert_eq!(flow.max_bandwidth(), 100.0);
        assert_eq!(flow.rounds_recorded(), 0);
    }

    #[test]
    fn test_bdp_is_snapshot() {
        let mut flow = Flow::new(FlowConfig {
            bandwidth: 5000.0,
            rtt: 0.001,
            ..Default::default()
        });
        assert_eq!(flow.bdp(), 5000.0 * 0.001 * 125_000.0);

        flow.bandwidth = 1.0;
        assert_eq!(flow.bdp(), 5000.0 * 0.001 * 125_000.0);
    }

    #[test]
    fn test_initial_cwnd_not_clamped() {
        let flow = Flow::new(FlowConfig {
            initial_cwnd: 50,
            max_cwnd: 10,
            ..Default::default()
        });
        assert_eq!(flow.cwnd(), 50.0);
    }

    #[test]
    fn test_hook_specs() {
        assert_eq!((HookSpec::Identity.into_hook())(3.0), 3.0);
        assert_eq!((HookSpec::Scale(0.5).into_hook())(3.0), 1.5);
        assert_eq!((HookSpec::Offset(-1.0).into_hook())(3.0), 2.0);
    }

    #[test]
    fn test_hook_spec_json_shape() {
        let config: FlowConfig = serde_json::from_str(
            r#"{ "alpha": 2, "alpha_hook": { "scale": 2.0 }, "beta_hook": "identity" }"#,
        )
        .unwrap();

        assert_eq!(config.alpha, 2.0);
        assert_eq!(config.alpha_hook, HookSpec::Scale(2.0));
        assert_eq!(config.beta_hook, HookSpec::Identity);
        // Unspecified fields fall back to defaults
        assert_eq!(config.max_cwnd, 10);
    }

    #[test]
    fn test_debug_omits_hooks() {
        let flow = Flow::new(FlowConfig::default()).with_alpha_hook(|a| a * 2.0);
        let debug = format!("{:?}", flow);
        assert!(debug.contains("Flow"));
        assert!(debug.contains("cwnd"));
    }
}
