//! Monte Carlo loss distribution for a homogeneous credit portfolio under a
//! one-factor Gaussian copula.
//!
//! ```
//! use pfloss::params::SimulationParameters;
//! use pfloss::simulation::simulate;
//!
//! let params = SimulationParameters::new(0.05, -2.0, 1.0, 0.6, 100, 1000).unwrap();
//! let losses = simulate(&params, 42).unwrap();
//! assert_eq!(losses.len(), 1000);
//! ```

pub mod aggregator;
pub mod analysis;
pub mod config;
pub mod error;
pub mod ffi;
pub mod normal;
pub mod params;
pub mod sampler;
pub mod simulation;
pub mod types;

pub use error::SimulationError;
pub use params::{RawParameters, SimulationParameters};
pub use simulation::{Simulation, simulate, simulate_into};
