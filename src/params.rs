use serde::{Deserialize, Serialize};

use crate::error::{Result, SimulationError};
use crate::normal::{norm_cdf, norm_inv};

/// The input record exchanged with callers, field for field.
///
/// Layout is fixed (`#[repr(C)]`) so foreign callers can pass it by value.
/// Nothing about a `RawParameters` is trusted: convert it with
/// [`SimulationParameters::try_from`] before running anything.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawParameters {
    #[serde(alias = "assetCorrelation", alias = "asset_corr")]
    pub asset_correlation: f32,
    #[serde(alias = "defaultThreshold", alias = "cut_off")]
    pub default_threshold: f32,
    #[serde(alias = "exposureAtDefault", alias = "EAD")]
    pub exposure_at_default: f32,
    #[serde(alias = "lossGivenDefault", alias = "LGD")]
    pub loss_given_default: f32,
    #[serde(alias = "portfolioSize", alias = "pf_size")]
    pub portfolio_size: i32,
    #[serde(alias = "simulationCount", alias = "n_sims")]
    pub simulation_count: i32,
}

/// Largest draw count the input record can carry (`i32::MAX`).
pub const MAX_SIMULATION_COUNT: i64 = i32::MAX as i64;

/// Validated, immutable parameters for one kernel run.
///
/// Invariants (checked once, at construction):
/// `0 ≤ ρ < 1`, threshold finite, `EAD ≥ 0` and finite, `0 ≤ LGD ≤ 1`,
/// `N ≥ 1`, `1 ≤ M ≤ i32::MAX`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationParameters {
    asset_correlation: f64,
    default_threshold: f64,
    exposure_at_default: f64,
    loss_given_default: f64,
    portfolio_size: u64,
    simulation_count: usize,
}

impl SimulationParameters {
    pub fn new(
        asset_correlation: f64,
        default_threshold: f64,
        exposure_at_default: f64,
        loss_given_default: f64,
        portfolio_size: i64,
        simulation_count: i64,
    ) -> Result<Self> {
        // Negated comparisons so NaN is rejected too.
        if !(asset_correlation >= 0.0 && asset_correlation < 1.0) {
            return Err(SimulationError::invalid(
                "assetCorrelation",
                asset_correlation,
                "must be in [0, 1)",
            ));
        }
        if !default_threshold.is_finite() {
            return Err(SimulationError::invalid(
                "defaultThreshold",
                default_threshold,
                "must be finite",
            ));
        }
        if !(exposure_at_default >= 0.0 && exposure_at_default.is_finite()) {
            return Err(SimulationError::invalid(
                "exposureAtDefault",
                exposure_at_default,
                "must be finite and >= 0",
            ));
        }
        if !(loss_given_default >= 0.0 && loss_given_default <= 1.0) {
            return Err(SimulationError::invalid(
                "lossGivenDefault",
                loss_given_default,
                "must be in [0, 1]",
            ));
        }
        if portfolio_size < 1 {
            return Err(SimulationError::invalid(
                "portfolioSize",
                portfolio_size as f64,
                "must be >= 1",
            ));
        }
        if simulation_count < 1 {
            return Err(SimulationError::invalid(
                "simulationCount",
                simulation_count as f64,
                "must be >= 1",
            ));
        }
        if simulation_count > MAX_SIMULATION_COUNT {
            return Err(SimulationError::invalid(
                "simulationCount",
                simulation_count as f64,
                "must be <= 2147483647",
            ));
        }
        let simulation_count = simulation_count as usize;

        Ok(Self {
            asset_correlation,
            default_threshold,
            exposure_at_default,
            loss_given_default,
            portfolio_size: portfolio_size as u64,
            simulation_count,
        })
    }

    /// Build parameters from a probability of default instead of a threshold.
    ///
    /// The threshold is `Φ⁻¹(pd)`; `pd` must lie strictly inside `(0, 1)`.
    pub fn from_probability_of_default(
        asset_correlation: f64,
        probability_of_default: f64,
        exposure_at_default: f64,
        loss_given_default: f64,
        portfolio_size: i64,
        simulation_count: i64,
    ) -> Result<Self> {
        let threshold = norm_inv(probability_of_default).ok_or_else(|| {
            SimulationError::invalid(
                "probabilityOfDefault",
                probability_of_default,
                "must be in (0, 1)",
            )
        })?;
        Self::new(
            asset_correlation,
            threshold,
            exposure_at_default,
            loss_given_default,
            portfolio_size,
            simulation_count,
        )
    }

    pub fn asset_correlation(&self) -> f64 {
        self.asset_correlation
    }

    pub fn default_threshold(&self) -> f64 {
        self.default_threshold
    }

    pub fn exposure_at_default(&self) -> f64 {
        self.exposure_at_default
    }

    pub fn loss_given_default(&self) -> f64 {
        self.loss_given_default
    }

    pub fn portfolio_size(&self) -> u64 {
        self.portfolio_size
    }

    pub fn simulation_count(&self) -> usize {
        self.simulation_count
    }

    /// Loss booked per defaulted obligor: `EAD × LGD`.
    pub fn loss_per_default(&self) -> f64 {
        self.exposure_at_default * self.loss_given_default
    }

    /// Φ(threshold): probability that a single obligor defaults, unconditionally.
    pub fn unconditional_default_probability(&self) -> f64 {
        norm_cdf(self.default_threshold)
    }

    /// Loss when every obligor defaults: `N × EAD × LGD`.
    pub fn max_loss(&self) -> f64 {
        self.portfolio_size as f64 * self.loss_per_default()
    }

    /// Analytic mean of the loss distribution: `N × EAD × LGD × Φ(threshold)`.
    pub fn expected_loss(&self) -> f64 {
        self.max_loss() * self.unconditional_default_probability()
    }

    /// The record form of these parameters, narrowed to the wire types.
    pub fn to_raw(&self) -> RawParameters {
        RawParameters {
            asset_correlation: self.asset_correlation as f32,
            default_threshold: self.default_threshold as f32,
            exposure_at_default: self.exposure_at_default as f32,
            loss_given_default: self.loss_given_default as f32,
            portfolio_size: self.portfolio_size.min(i32::MAX as u64) as i32,
            simulation_count: self.simulation_count.min(i32::MAX as usize) as i32,
        }
    }
}

impl TryFrom<RawParameters> for SimulationParameters {
    type Error = SimulationError;

    fn try_from(raw: RawParameters) -> Result<Self> {
        SimulationParameters::new(
            raw.asset_correlation as f64,
            raw.default_threshold as f64,
            raw.exposure_at_default as f64,
            raw.loss_given_default as f64,
            raw.portfolio_size as i64,
            raw.simulation_count as i64,
        )
    }
}
