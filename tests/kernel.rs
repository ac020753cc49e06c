use pfloss::analysis::LossSummary;
use pfloss::normal::norm_cdf;
use pfloss::simulation::{simulate, simulate_counts};
use pfloss::{RawParameters, SimulationError, SimulationParameters};

fn reference() -> SimulationParameters {
    SimulationParameters::try_from(RawParameters {
        asset_correlation: 0.05,
        default_threshold: -2.0,
        exposure_at_default: 1.0,
        loss_given_default: 0.6,
        portfolio_size: 100,
        simulation_count: 1000,
    })
    .unwrap()
}

fn variance(v: &[f32]) -> f64 {
    let n = v.len() as f64;
    let mean = v.iter().map(|&x| x as f64).sum::<f64>() / n;
    v.iter().map(|&x| (x as f64 - mean).powi(2)).sum::<f64>() / (n - 1.0)
}

/// 1000 draws, each a multiple of 0.6 no larger than 60, mean near 1.37.
#[test]
fn reference_scenario() {
    let losses = simulate(&reference(), 42).unwrap();
    assert_eq!(losses.len(), 1000);

    for (i, &loss) in losses.iter().enumerate() {
        assert!((0.0..=60.0 + 1e-4).contains(&loss), "draw {i}: loss {loss} out of range");
        let k = loss as f64 / 0.6;
        assert!((k - k.round()).abs() < 1e-4, "draw {i}: loss {loss} not a multiple of 0.6");
    }

    let mean = LossSummary::from_losses(&losses).unwrap().mean;
    // 100 × Φ(−2) × 0.6 ≈ 1.365; standard error ≈ 0.05
    assert!((mean - 1.365).abs() < 0.3, "mean loss {mean:.4} far from 1.365");
}

/// With ρ = 0 the mean default count converges to N·Φ(c).
#[test]
fn independent_defaults_converge_to_pd() {
    let params = SimulationParameters::new(0.0, -2.0, 1.0, 0.6, 100, 100_000).unwrap();
    let counts = simulate_counts(&params, 2024).unwrap();
    let mean = counts.iter().map(|c| c.0 as f64).sum::<f64>() / counts.len() as f64;

    let p: f64 = 0.022_750_131_948_179;
    let expected = 100.0 * p;
    let se = (100.0 * p * (1.0 - p) / 100_000.0).sqrt();
    assert!(
        (mean - expected).abs() < 4.0 * se,
        "mean count {mean:.4} vs {expected:.4} (se {se:.4})"
    );
}

/// Raising ρ with everything else fixed never lowers the loss variance.
#[test]
fn variance_rises_with_correlation() {
    let mut prev = 0.0;
    for rho in [0.0, 0.05, 0.15, 0.3, 0.5, 0.7, 0.9] {
        let params = SimulationParameters::new(rho, -2.0, 1.0, 0.6, 100, 50_000).unwrap();
        let var = variance(&simulate(&params, 7).unwrap());
        assert!(var >= prev, "variance fell to {var:.4} at rho = {rho} (was {prev:.4})");
        prev = var;
    }
}

/// A one-obligor, one-draw run loses either nothing or EAD·LGD, and the
/// latter happens with frequency Φ(c).
#[test]
fn single_obligor_single_draw() {
    let params = SimulationParameters::new(0.3, -1.0, 2.0, 0.5, 1, 1).unwrap();
    let runs = 4_000u64;
    let mut hits = 0u64;
    for seed in 0..runs {
        let losses = simulate(&params, seed).unwrap();
        assert_eq!(losses.len(), 1);
        let loss = losses[0];
        if loss == 1.0 {
            hits += 1;
        } else {
            assert_eq!(loss, 0.0, "seed {seed}: unexpected loss {loss}");
        }
    }
    let freq = hits as f64 / runs as f64;
    let p = norm_cdf(-1.0);
    let se = (p * (1.0 - p) / runs as f64).sqrt();
    assert!((freq - p).abs() < 4.0 * se, "default frequency {freq:.4} vs Φ(-1) = {p:.4}");
}

#[test]
fn near_unit_correlation_is_all_or_nothing() {
    let params = SimulationParameters::new(1.0 - 1e-13, -1.0, 1.0, 1.0, 50, 10_000).unwrap();
    let losses = simulate(&params, 3).unwrap();
    assert!(losses.iter().all(|&l| l == 0.0 || l == 50.0));
    let freq = losses.iter().filter(|&&l| l == 50.0).count() as f64 / losses.len() as f64;
    assert!((freq - norm_cdf(-1.0)).abs() < 0.02, "systemic default frequency {freq:.4}");
}

#[test]
fn zero_exposure_or_severity_gives_zero_losses() {
    for (ead, lgd) in [(0.0, 0.6), (1.0, 0.0)] {
        let params = SimulationParameters::new(0.2, 0.0, ead, lgd, 100, 500).unwrap();
        assert!(simulate(&params, 1).unwrap().iter().all(|&l| l == 0.0));
    }
}

#[test]
fn invalid_record_never_runs() {
    let raw = RawParameters {
        asset_correlation: 0.05,
        default_threshold: -2.0,
        exposure_at_default: 1.0,
        loss_given_default: 1.5,
        portfolio_size: 100,
        simulation_count: 1000,
    };
    match SimulationParameters::try_from(raw) {
        Err(SimulationError::InvalidParameter { field, .. }) => {
            assert_eq!(field, "lossGivenDefault")
        }
        other => panic!("expected InvalidParameter, got {other:?}"),
    }
}
