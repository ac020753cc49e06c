use crate::params::SimulationParameters;
use crate::types::DefaultCount;

/// Turns a draw's default count into a portfolio loss.
///
/// Homogeneous portfolio: every defaulted obligor contributes `EAD × LGD`.
#[derive(Debug, Clone, Copy)]
pub struct LossAggregator {
    loss_per_default: f64,
}

impl LossAggregator {
    pub fn new(params: &SimulationParameters) -> Self {
        Self {
            loss_per_default: params.loss_per_default(),
        }
    }

    pub fn loss(&self, defaults: DefaultCount) -> f32 {
        (defaults.0 as f64 * self.loss_per_default) as f32
    }

    /// Write the losses for `counts` into `out`, position for position.
    ///
    /// `out` and `counts` must have equal length; the kernel guarantees this.
    pub fn write(&self, counts: &[DefaultCount], out: &mut [f32]) {
        debug_assert_eq!(counts.len(), out.len());
        for (slot, &count) in out.iter_mut().zip(counts) {
            *slot = self.loss(count);
        }
    }
}
