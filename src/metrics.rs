//! Summary statistics over a flow's recorded samples

use crate::error::{Error, Result};
use crate::flow::Flow;
use serde::{Deserialize, Serialize};

/// Latency (seconds) and throughput (KB/s) statistics for one flow
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub mean_latency: f64,
    pub std_latency: f64,
    pub mean_throughput: f64,
    pub std_throughput: f64,
    /// Bandwidth-delay product in bytes
    pub bdp: f64,
}

impl Summary {
    /// Element-wise mean of several summaries.
    pub fn average(summaries: &[Summary]) -> Option<Summary> {
        if summaries.is_empty() {
            return None;
        }
        let n = summaries.len() as f64;
        let sum = |f: fn(&Summary) -> f64| summaries.iter().map(f).sum::<f64>() / n;

        Some(Summary {
            mean_latency: sum(|s| s.mean_latency),
            std_latency: sum(|s| s.std_latency),
            mean_throughput: sum(|s| s.mean_throughput),
            std_throughput: sum(|s| s.std_throughput),
            bdp: sum(|s| s.bdp),
        })
    }
}

/// Reduce a flow's histories to a [`Summary`].
///
/// Fails with [`Error::NoSamples`] if the flow has not completed a round.
pub fn aggregate(flow: &Flow) -> Result<Summary> {
    let (mean_latency, std_latency) =
        mean_std(flow.latency_history()).ok_or_else(|| no_samples(flow))?;
    let (mean_throughput, std_throughput) =
        mean_std(flow.throughput_history()).ok_or_else(|| no_samples(flow))?;

    Ok(Summary {
        mean_latency,
        std_latency,
        mean_throughput,
        std_throughput,
        bdp: flow.bdp(),
    })
}

fn no_samples(flow: &Flow) -> Error {
    Error::NoSamples {
        flow: flow.name().to_string(),
    }
}

/// Arithmetic mean and population standard deviation
fn mean_std(values: &[f64]) -> Option<(f64, f64)> {
    if values.is_empty() {
        return None;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    Some((mean, variance.sqrt()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow::FlowConfig;

    #[test]
    fn test_mean_std_population() {
        let (mean, std) = mean_std(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert_eq!(mean, 5.0);
        assert_eq!(std, 2.0);
    }

    #[test]
    fn test_mean_std_single_value() {
        assert_eq!(mean_std(&[3.5]), Some((3.5, 0.0)));
        assert_eq!(mean_std(&[]), None);
    }

    #[test]
    fn test_aggregate_empty_flow() {
        let flow = Flow::new(FlowConfig::default().named("idle"));
        match aggregate(&flow) {
            Err(Error::NoSamples { flow }) => assert_eq!(flow, "idle"),
            other => panic!("expected NoSamples, got {:?}", other),
        }
    }

    #[test]
    fn test_aggregate_uses_histories() {
        let mut flow = Flow::new(FlowConfig {
            initial_cwnd: 4,
            bandwidth: 8.0,
            rtt: 0.5,
            ..Default::default()
        });
        flow.sample_latency();
        flow.sample_throughput();
        flow.cwnd = 8.0;
        flow.sample_latency();
        flow.sample_throughput();

        let summary = aggregate(&flow).unwrap();
        // 8 Mbps = 1000 KB/s
        assert!((summary.mean_latency - (0.5 + 0.006)).abs() < 1e-12);
        assert!((summary.std_latency - 0.002).abs() < 1e-12);
        assert_eq!(summary.mean_throughput, 6.0);
        assert_eq!(summary.std_throughput, 2.0);
        assert_eq!(summary.bdp, 8.0 * 0.5 * 125_000.0);
    }

    #[test]
    fn test_average() {
        let a = Summary {
            mean_latency: 1.0,
            std_latency: 0.0,
            mean_throughput: 10.0,
            std_throughput: 2.0,
            bdp: 100.0,
        };
        let b = Summary {
            mean_latency: 3.0,
            std_latency: 1.0,
            mean_throughput: 30.0,
            std_throughput: 4.0,
            bdp: 100.0,
        };

        let avg = Summary::average(&[a, b]).unwrap();
        assert_eq!(avg.mean_latency, 2.0);
        assert_eq!(avg.std_latency, 0.5);
        assert_eq!(avg.mean_throughput, 20.0);
        assert_eq!(avg.std_throughput, 3.0);
        assert!(Summary::average(&[]).is_none());
    }
}
