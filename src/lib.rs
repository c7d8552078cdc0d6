//! TCP Reno AIMD model for two flows sharing a bottleneck
//!
//! Each [`Flow`] carries one sender's congestion window, its AIMD
//! parameters and the per-round latency/throughput samples derived from
//! the window. A [`SharedLink`] drives two flows through a fixed number of
//! rounds, taking the increase or decrease branch jointly based on their
//! combined window versus a single capacity ceiling. [`aggregate`] reduces
//! a finished flow to summary statistics.
//!
//! ```
//! use renoaimd::{aggregate, run_shared_experiment, Flow, FlowConfig};
//!
//! let mut a = Flow::new(FlowConfig { initial_cwnd: 25, max_cwnd: 100, ..Default::default() });
//! let mut b = Flow::new(FlowConfig { initial_cwnd: 75, max_cwnd: 100, ..Default::default() });
//! run_shared_experiment(&mut a, &mut b, 10);
//! let summary = aggregate(&a).unwrap();
//! assert!(summary.mean_throughput > 0.0);
//! ```

pub mod aimd;
pub mod config;
pub mod error;
pub mod flow;
pub mod metrics;
pub mod shared;
pub mod sweep;

pub use config::{ExperimentConfig, ExperimentOutcome, Presets};
pub use error::{Error, Result};
pub use flow::{Flow, FlowConfig, HookSpec, ParamHook};
pub use metrics::{aggregate, Summary};
pub use shared::{run_shared_experiment, Branch, RunReport, SharedLink};
pub use sweep::{Sweep, SweepPoint};
