//! Static alpha/beta parameter sweeps
//!
//! Each point of a sweep is an independent run of the template experiment
//! with `alpha` and `beta` fixed at the point's values on both flows. The
//! two flows' summaries are averaged into one [`SweepPoint`].

use crate::config::{ExperimentConfig, Presets};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Averaged statistics for one `(alpha, beta)` pair
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SweepPoint {
    pub alpha: f64,
    pub beta: f64,
    pub mean_latency: f64,
    pub std_latency: f64,
    pub mean_throughput: f64,
    pub std_throughput: f64,
}

#[derive(Clone, Debug)]
pub struct Sweep {
    template: ExperimentConfig,
    points: Vec<(f64, f64)>,
}

impl Sweep {
    pub fn new(template: ExperimentConfig, points: Vec<(f64, f64)>) -> Self {
        Self { template, points }
    }

    /// `alpha` from 1 to 6 with `beta` held at 0.8
    pub fn alpha() -> Self {
        let points = (1..=6).map(|a| (a as f64, 0.8)).collect();
        Self::new(Presets::bottleneck(), points)
    }

    /// `beta` from 0.5 to 0.9 with `alpha` held at 1
    pub fn beta() -> Self {
        let points = [0.5, 0.6, 0.7, 0.8, 0.9]
            .into_iter()
            .map(|b| (1.0, b))
            .collect();
        Self::new(Presets::bottleneck(), points)
    }

    pub fn with_rounds(mut self, rounds: usize) -> Self {
        self.template.rounds = rounds;
        self
    }

    pub fn with_template(mut self, template: ExperimentConfig) -> Self {
        self.template = template;
        self
    }

    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    pub fn run(&self) -> Result<Vec<SweepPoint>> {
        self.points
            .iter()
            .map(|&(alpha, beta)| -> Result<SweepPoint> {
                let outcome = self.template.clone().with_params(alpha, beta).run()?;
                let combined = outcome.combined()?;
                debug!(alpha, beta, latency = combined.mean_latency, "Sweep point done");

                Ok(SweepPoint {
                    alpha,
                    beta,
                    mean_latency: combined.mean_latency,
                    std_latency: combined.std_latency,
                    mean_throughput: combined.mean_throughput,
                    std_throughput: combined.std_throughput,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_alpha_sweep_points() {
        let sweep = Sweep::alpha();
        assert_eq!(sweep.points().len(), 6);
        assert_eq!(sweep.points()[0], (1.0, 0.8));
        assert_eq!(sweep.points()[5], (6.0, 0.8));
    }

    #[test]
    fn test_beta_sweep_runs_every_point() {
        let results = Sweep::beta().with_rounds(50).run().unwrap();

        assert_eq!(results.len(), 5);
        for (point, beta) in results.iter().zip([0.5, 0.6, 0.7, 0.8, 0.9]) {
            assert_eq!(point.alpha, 1.0);
            assert_eq!(point.beta, beta);
            assert!(point.mean_latency > 0.001);
            assert!(point.mean_throughput > 0.0);
        }
    }

    #[test]
    fn test_sweep_is_deterministic() {
        let first = Sweep::alpha().with_rounds(100).run().unwrap();
        let second = Sweep::alpha().with_rounds(100).run().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_sweep_without_rounds_reports_no_samples() {
        let result = Sweep::alpha().with_rounds(0).run();
        assert!(matches!(result, Err(Error::NoSamples { .. })));
    }
}
