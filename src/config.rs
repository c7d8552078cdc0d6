//! Experiment configuration and presets
//!
//! An [`ExperimentConfig`] describes both flows and the round count of one
//! shared-link run. Configurations can be written as JSON and loaded with
//! [`ExperimentConfig::from_json_file`].

use crate::error::{Error, Result};
use crate::flow::{Flow, FlowConfig};
use crate::metrics::{aggregate, Summary};
use crate::shared::{run_shared_experiment, RunReport};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

/// Complete description of one two-flow experiment
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExperimentConfig {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub rounds: usize,
    pub flow_a: FlowConfig,
    pub flow_b: FlowConfig,
}

impl ExperimentConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn with_rounds(mut self, rounds: usize) -> Self {
        self.rounds = rounds;
        self
    }

    /// Set `alpha` and `beta` on both flows.
    pub fn with_params(mut self, alpha: f64, beta: f64) -> Self {
        self.flow_a = self.flow_a.with_params(alpha, beta);
        self.flow_b = self.flow_b.with_params(alpha, beta);
        self
    }

    /// Reject configurations whose starting state already breaks the
    /// model's ranges.
    pub fn validate(&self) -> Result<()> {
        validate_flow(&self.flow_a)?;
        validate_flow(&self.flow_b)?;
        if self.flow_a.max_cwnd != self.flow_b.max_cwnd {
            warn!(
                flow_a = self.flow_a.max_cwnd,
                flow_b = self.flow_b.max_cwnd,
                "Flows disagree on max_cwnd; shared capacity is taken from flow A"
            );
        }
        Ok(())
    }

    /// Build both flows without running them.
    pub fn build_flows(&self) -> (Flow, Flow) {
        (
            Flow::new(self.flow_a.clone()),
            Flow::new(self.flow_b.clone()),
        )
    }

    /// Validate, build both flows and run them for `rounds` rounds.
    pub fn run(&self) -> Result<ExperimentOutcome> {
        self.validate()?;
        let (mut flow_a, mut flow_b) = self.build_flows();
        let report = run_shared_experiment(&mut flow_a, &mut flow_b, self.rounds);

        info!(
            experiment = %self.name,
            rounds = report.rounds,
            final_cwnd_a = flow_a.cwnd(),
            final_cwnd_b = flow_b.cwnd(),
            "Experiment complete"
        );

        Ok(ExperimentOutcome {
            flow_a,
            flow_b,
            report,
        })
    }
}

fn validate_flow(flow: &FlowConfig) -> Result<()> {
    let fail = |msg: String| {
        warn!(flow = %flow.name, "{}", msg);
        Err(Error::InvalidConfig(format!("{}: {}", flow.name, msg)))
    };

    if flow.max_cwnd < 1 {
        return fail("max_cwnd must be at least 1".to_string());
    }
    if flow.initial_cwnd < 1 || flow.initial_cwnd > flow.max_cwnd {
        return fail(format!(
            "initial_cwnd {} outside [1, {}]",
            flow.initial_cwnd, flow.max_cwnd
        ));
    }
    if !(flow.alpha >= 0.0) {
        return fail(format!("alpha {} must be non-negative", flow.alpha));
    }
    if !(flow.beta > 0.0 && flow.beta < 1.0) {
        return fail(format!("beta {} outside (0, 1)", flow.beta));
    }
    if !(flow.rtt > 0.0) {
        return fail(format!("rtt {} must be positive", flow.rtt));
    }
    if !(flow.bandwidth > 0.0 && flow.bandwidth <= flow.max_bandwidth) {
        return fail(format!(
            "bandwidth {} outside (0, {}]",
            flow.bandwidth, flow.max_bandwidth
        ));
    }
    Ok(())
}

/// Both flows after a completed run, plus the loop's counters
#[derive(Clone, Debug)]
pub struct ExperimentOutcome {
    pub flow_a: Flow,
    pub flow_b: Flow,
    pub report: RunReport,
}

impl ExperimentOutcome {
    pub fn summaries(&self) -> Result<(Summary, Summary)> {
        Ok((aggregate(&self.flow_a)?, aggregate(&self.flow_b)?))
    }

    /// Mean of the two flows' summaries
    pub fn combined(&self) -> Result<Summary> {
        let (a, b) = self.summaries()?;
        Summary::average(&[a, b]).ok_or_else(|| Error::NoSamples {
            flow: self.flow_a.name().to_string(),
        })
    }
}

/// Built-in experiment configurations
pub struct Presets;

impl Presets {
    /// Link capacity shared by the preset flows, in Mbps
    pub const MAX_BANDWIDTH: f64 = 100_000.0;

    fn bottleneck_flow(name: &str, initial_cwnd: u32) -> FlowConfig {
        FlowConfig {
            alpha: 1.0,
            beta: 0.8,
            initial_cwnd,
            max_cwnd: 100,
            rtt: 0.001,
            bandwidth: 5000.0,
            max_bandwidth: Self::MAX_BANDWIDTH,
            ..Default::default()
        }
        .named(name)
    }

    /// Unequal starting windows filling a 100-packet bottleneck
    pub fn bottleneck() -> ExperimentConfig {
        ExperimentConfig {
            name: "bottleneck".to_string(),
            description: "Flows starting at 25 and 75 packets on a 100-packet link".to_string(),
            rounds: 1000,
            flow_a: Self::bottleneck_flow("TCP Reno 1", 25),
            flow_b: Self::bottleneck_flow("TCP Reno 2", 75),
        }
    }

    /// Equal starting windows on the same link
    pub fn fair() -> ExperimentConfig {
        ExperimentConfig {
            name: "fair".to_string(),
            description: "Flows starting at 50 packets each on a 100-packet link".to_string(),
            rounds: 1000,
            flow_a: Self::bottleneck_flow("TCP Reno 1", 50),
            flow_b: Self::bottleneck_flow("TCP Reno 2", 50),
        }
    }

    /// Two flows with every parameter at its default
    pub fn defaults() -> ExperimentConfig {
        ExperimentConfig {
            name: "defaults".to_string(),
            description: "Default flow parameters on a 10-packet link".to_string(),
            rounds: 100,
            flow_a: FlowConfig::default().named("TCP Reno 1"),
            flow_b: FlowConfig::default().named("TCP Reno 2"),
        }
    }

    pub fn all() -> Vec<ExperimentConfig> {
        vec![Self::bottleneck(), Self::fair(), Self::defaults()]
    }

    pub fn by_name(name: &str) -> Option<ExperimentConfig> {
        Self::all().into_iter().find(|preset| preset.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_are_valid() {
        for preset in Presets::all() {
            preset.validate().unwrap();
        }
    }

    #[test]
    fn test_preset_lookup() {
        assert_eq!(Presets::by_name("fair").unwrap().flow_a.initial_cwnd, 50);
        assert!(Presets::by_name("missing").is_none());
    }

    #[test]
    fn test_validate_rejects_out_of_range_cwnd() {
        let mut config = Presets::bottleneck();
        config.flow_b.initial_cwnd = 101;
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));

        config.flow_b.initial_cwnd = 0;
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_validate_rejects_bad_params() {
        let config = Presets::bottleneck().with_params(1.0, 1.0);
        assert!(config.validate().is_err());

        let config = Presets::bottleneck().with_params(-1.0, 0.5);
        assert!(config.validate().is_err());

        let mut config = Presets::bottleneck();
        config.flow_a.rtt = 0.0;
        assert!(config.validate().is_err());

        let mut config = Presets::bottleneck();
        config.flow_a.bandwidth = Presets::MAX_BANDWIDTH * 2.0;
        assert!(config.validate().is_err());

        let mut config = Presets::bottleneck();
        config.flow_a.max_cwnd = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_json_round_trip_keeps_preset() {
        let preset = Presets::bottleneck();
        let json = preset.to_json().unwrap();
        assert_eq!(ExperimentConfig::from_json_str(&json).unwrap(), preset);
    }

    #[test]
    fn test_json_with_partial_flows() {
        let config = ExperimentConfig::from_json_str(
            r#"{
                "name": "small",
                "rounds": 5,
                "flow_a": { "initial_cwnd": 2 },
                "flow_b": { "initial_cwnd": 3, "beta_hook": { "offset": -0.05 } }
            }"#,
        )
        .unwrap();

        assert_eq!(config.flow_a.max_cwnd, 10);
        assert_eq!(config.description, "");
        let outcome = config.run().unwrap();
        assert_eq!(outcome.report.rounds, 5);
        assert_eq!(outcome.flow_b.rounds_recorded(), 5);
    }

    #[test]
    fn test_run_rejects_invalid() {
        let mut config = Presets::defaults();
        config.flow_a.beta = 0.0;
        assert!(config.run().is_err());
    }

    #[test]
    fn test_outcome_without_rounds_has_no_summary() {
        let outcome = Presets::fair().with_rounds(0).run().unwrap();
        assert!(matches!(outcome.summaries(), Err(Error::NoSamples { .. })));
    }
}
