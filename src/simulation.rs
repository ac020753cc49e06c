use std::time::Instant;

use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::aggregator::LossAggregator;
use crate::error::{Result, SimulationError};
use crate::params::SimulationParameters;
use crate::sampler::ScenarioSampler;
use crate::types::{BlockIndex, DefaultCount, DrawIndex};

/// One kernel run: validated parameters plus the run-level seed.
///
/// Holds no state between runs. Every block of draws derives its own
/// ChaCha stream from `(seed, block)`, so results depend only on the inputs.
pub struct Simulation {
    params: SimulationParameters,
    seed: u64,
    sampler: ScenarioSampler,
    aggregator: LossAggregator,
}

impl Simulation {
    pub fn new(params: SimulationParameters, seed: u64) -> Result<Self> {
        Ok(Simulation {
            sampler: ScenarioSampler::new(&params)?,
            aggregator: LossAggregator::new(&params),
            params,
            seed,
        })
    }

    pub fn params(&self) -> &SimulationParameters {
        &self.params
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Random stream owned by `block`.
    fn block_rng(&self, block: BlockIndex) -> ChaCha20Rng {
        let mut rng = ChaCha20Rng::seed_from_u64(self.seed);
        rng.set_stream(block.stream());
        rng
    }

    /// Default count of every draw, in draw order.
    pub fn default_counts(&self) -> Result<Vec<DefaultCount>> {
        let m = self.params.simulation_count();
        let mut counts = vec![DefaultCount(0); m];
        debug!(
            draws = m,
            blocks = m.div_ceil(BlockIndex::DRAWS_PER_BLOCK),
            "sampling default counts"
        );

        counts
            .par_chunks_mut(BlockIndex::DRAWS_PER_BLOCK)
            .enumerate()
            .try_for_each(|(b, chunk)| {
                let block = BlockIndex(b);
                let mut rng = self.block_rng(block);
                let first = block.first_draw().0;
                for (offset, slot) in chunk.iter_mut().enumerate() {
                    *slot = self.sampler.sample(DrawIndex(first + offset), &mut rng)?;
                }
                Ok::<(), SimulationError>(())
            })?;

        Ok(counts)
    }

    /// Default counts from the obligor-by-obligor model. O(N·M); reference only.
    pub fn default_counts_by_obligor(&self) -> Vec<DefaultCount> {
        let mut counts = vec![DefaultCount(0); self.params.simulation_count()];
        counts
            .par_chunks_mut(BlockIndex::DRAWS_PER_BLOCK)
            .enumerate()
            .for_each(|(b, chunk)| {
                let mut rng = self.block_rng(BlockIndex(b));
                for slot in chunk.iter_mut() {
                    *slot = self.sampler.sample_by_obligor(&mut rng);
                }
            });
        counts
    }

    /// Fill `out[..M]` with one loss per draw.
    ///
    /// Fails with `BufferCapacity` before any work if `out` is too short.
    /// On any error `out` is left untouched; entries past `M` are never written.
    pub fn run_into(&self, out: &mut [f32]) -> Result<()> {
        let m = self.params.simulation_count();
        if out.len() < m {
            warn!(required = m, capacity = out.len(), "destination too small");
            return Err(SimulationError::BufferCapacity {
                required: m,
                capacity: out.len(),
            });
        }

        let started = Instant::now();
        info!(
            rho = self.params.asset_correlation(),
            threshold = self.params.default_threshold(),
            ead = self.params.exposure_at_default(),
            lgd = self.params.loss_given_default(),
            portfolio_size = self.params.portfolio_size(),
            draws = m,
            seed = self.seed,
            "simulation started"
        );

        let counts = self.default_counts()?;
        self.aggregator.write(&counts, &mut out[..m]);

        info!(elapsed_ms = started.elapsed().as_millis() as u64, "simulation finished");
        Ok(())
    }

    /// Owned loss sequence of exactly `M` entries.
    pub fn run(&self) -> Result<Vec<f32>> {
        let mut out = vec![0.0; self.params.simulation_count()];
        self.run_into(&mut out)?;
        Ok(out)
    }
}

/// Run the kernel into a caller-provided destination.
pub fn simulate_into(params: &SimulationParameters, seed: u64, out: &mut [f32]) -> Result<()> {
    Simulation::new(*params, seed)?.run_into(out)
}

/// Run the kernel and return the loss sequence.
pub fn simulate(params: &SimulationParameters, seed: u64) -> Result<Vec<f32>> {
    Simulation::new(*params, seed)?.run()
}

/// Run only the scenario stage and return the per-draw default counts.
pub fn simulate_counts(params: &SimulationParameters, seed: u64) -> Result<Vec<DefaultCount>> {
    Simulation::new(*params, seed)?.default_counts()
}

/// Losses from the obligor-by-obligor model, for cross-checking the kernel.
pub fn simulate_brute_force(params: &SimulationParameters, seed: u64) -> Result<Vec<f32>> {
    let sim = Simulation::new(*params, seed)?;
    let counts = sim.default_counts_by_obligor();
    let mut out = vec![0.0; counts.len()];
    sim.aggregator.write(&counts, &mut out);
    Ok(out)
}
