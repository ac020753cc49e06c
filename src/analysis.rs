use std::collections::BTreeMap;

use serde::Serialize;

/// Distribution statistics over one loss sequence.
#[derive(Debug, Clone, Serialize)]
pub struct LossSummary {
    pub n: usize,
    pub min: f64,
    pub p50: f64,
    pub p95: f64,
    pub p99: f64,
    pub p999: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
    /// Ascending copy of the losses; backs the tail measures.
    #[serde(skip)]
    sorted: Vec<f64>,
}

impl LossSummary {
    /// Summarise `losses`. `None` for an empty sequence.
    pub fn from_losses(losses: &[f32]) -> Option<Self> {
        if losses.is_empty() {
            return None;
        }
        let mut sorted: Vec<f64> = losses.iter().map(|&x| x as f64).collect();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        let n = sorted.len();

        let mean = sorted.iter().sum::<f64>() / n as f64;
        let variance = if n > 1 {
            sorted.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64
        } else {
            0.0
        };

        let mut summary = LossSummary {
            n,
            min: sorted[0],
            p50: 0.0,
            p95: 0.0,
            p99: 0.0,
            p999: 0.0,
            max: sorted[n - 1],
            mean,
            std_dev: variance.sqrt(),
            sorted,
        };
        summary.p50 = summary.quantile(0.50);
        summary.p95 = summary.quantile(0.95);
        summary.p99 = summary.quantile(0.99);
        summary.p999 = summary.quantile(0.999);
        Some(summary)
    }

    /// Linearly interpolated quantile, `q` clamped to `[0, 1]`.
    pub fn quantile(&self, q: f64) -> f64 {
        let n = self.sorted.len();
        let h = q.clamp(0.0, 1.0) * (n - 1) as f64;
        let lo = h.floor() as usize;
        let hi = (lo + 1).min(n - 1);
        let frac = h - lo as f64;
        self.sorted[lo] * (1.0 - frac) + self.sorted[hi] * frac
    }

    /// Loss not exceeded with confidence `q`.
    pub fn value_at_risk(&self, q: f64) -> f64 {
        self.quantile(q)
    }

    /// Mean of the losses at or above the `q`-quantile.
    pub fn expected_shortfall(&self, q: f64) -> f64 {
        let var = self.value_at_risk(q);
        let tail: Vec<f64> = self.sorted.iter().copied().filter(|&x| x >= var).collect();
        if tail.is_empty() {
            return var;
        }
        tail.iter().sum::<f64>() / tail.len() as f64
    }
}

/// Frequency of each default count, recovered from losses by dividing out
/// `loss_per_default`. A zero `loss_per_default` maps every draw to count 0.
pub fn default_count_histogram(losses: &[f32], loss_per_default: f64) -> BTreeMap<u64, usize> {
    let mut hist = BTreeMap::new();
    for &loss in losses {
        let count = if loss_per_default > 0.0 {
            (loss as f64 / loss_per_default).round() as u64
        } else {
            0
        };
        *hist.entry(count).or_insert(0) += 1;
    }
    hist
}
