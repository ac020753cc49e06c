use rand::Rng;
use rand_distr::{Binomial, Distribution, StandardNormal};

use crate::error::{Result, SimulationError};
use crate::normal::norm_cdf;
use crate::params::SimulationParameters;
use crate::types::{DefaultCount, DrawIndex};

/// Below this idiosyncratic weight `1 − ρ` the model is treated as fully
/// systemic and the conditional PD becomes the indicator `√ρ·Z ≤ c`.
pub const RHO_EPSILON: f64 = 1e-12;

/// Draws the number of defaulted obligors per scenario under the one-factor
/// Gaussian copula.
///
/// Obligor `i` defaults iff `√ρ·Z + √(1−ρ)·εᵢ ≤ c`. Conditional on the
/// systemic factor `Z` every obligor shares the default probability
/// `p(Z) = Φ((c − √ρ·Z) / √(1−ρ))`, so the count is Binomial(N, p(Z)) and one
/// binomial draw replaces N idiosyncratic draws.
#[derive(Debug, Clone)]
pub struct ScenarioSampler {
    portfolio_size: u64,
    threshold: f64,
    sqrt_rho: f64,
    sqrt_idio: f64,
    fully_systemic: bool,
    /// Set when ρ = 0: the count distribution does not depend on Z.
    independent: Option<Binomial>,
}

impl ScenarioSampler {
    pub fn new(params: &SimulationParameters) -> Result<Self> {
        let rho = params.asset_correlation();
        let independent = if rho == 0.0 {
            let p = params.unconditional_default_probability();
            let dist = Binomial::new(params.portfolio_size(), p).map_err(|e| {
                SimulationError::NumericInstability {
                    draw: 0,
                    detail: format!("Binomial({}, {p}) rejected: {e}", params.portfolio_size()),
                }
            })?;
            Some(dist)
        } else {
            None
        };

        Ok(Self {
            portfolio_size: params.portfolio_size(),
            threshold: params.default_threshold(),
            sqrt_rho: rho.sqrt(),
            sqrt_idio: (1.0 - rho).sqrt(),
            fully_systemic: 1.0 - rho < RHO_EPSILON,
            independent,
        })
    }

    /// Default probability shared by all obligors given the systemic factor `z`.
    pub fn conditional_default_probability(&self, z: f64) -> f64 {
        let systemic = self.sqrt_rho * z;
        if self.fully_systemic {
            return if systemic <= self.threshold { 1.0 } else { 0.0 };
        }
        norm_cdf((self.threshold - systemic) / self.sqrt_idio)
    }

    /// One scenario: sample `Z`, then the binomial default count.
    pub fn sample(&self, draw: DrawIndex, rng: &mut impl Rng) -> Result<DefaultCount> {
        if let Some(dist) = &self.independent {
            return Ok(DefaultCount(dist.sample(rng)));
        }

        let z: f64 = StandardNormal.sample(rng);
        let p = self.conditional_default_probability(z);
        if !p.is_finite() {
            return Err(SimulationError::NumericInstability {
                draw: draw.0,
                detail: format!("conditional default probability {p} for Z = {z}"),
            });
        }

        let dist = Binomial::new(self.portfolio_size, p).map_err(|e| {
            SimulationError::NumericInstability {
                draw: draw.0,
                detail: format!("Binomial({}, {p}) rejected: {e}", self.portfolio_size),
            }
        })?;
        Ok(DefaultCount(dist.sample(rng)))
    }

    /// Reference scenario that simulates every obligor's latent asset value.
    ///
    /// O(N) per draw; distributionally identical to [`Self::sample`].
    pub fn sample_by_obligor(&self, rng: &mut impl Rng) -> DefaultCount {
        let z: f64 = StandardNormal.sample(rng);
        let systemic = self.sqrt_rho * z;
        let mut defaults = 0u64;
        for _ in 0..self.portfolio_size {
            let eps: f64 = StandardNormal.sample(rng);
            if systemic + self.sqrt_idio * eps <= self.threshold {
                defaults += 1;
            }
        }
        DefaultCount(defaults)
    }
}
