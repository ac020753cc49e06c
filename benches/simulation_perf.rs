
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use pfloss::sampler::ScenarioSampler;
use pfloss::simulation::{simulate, simulate_brute_force};
use pfloss::types::DrawIndex;

use fixtures::{LARGE, MEDIUM, SMALL, params, with_size};

// ── Group 1: scenario — single draw, binomial vs per-obligor ─────────────────

fn bench_scenario(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenario");
    for &n in &[100i64, 1_000, 10_000] {
        let sampler = ScenarioSampler::new(&with_size(&MEDIUM, n, 1)).expect("sampler");
        group.bench_with_input(BenchmarkId::new("binomial", n), &n, |b, _| {
            let mut rng = ChaCha20Rng::seed_from_u64(42);
            b.iter(|| sampler.sample(DrawIndex(0), &mut rng))
        });
        group.bench_with_input(BenchmarkId::new("by_obligor", n), &n, |b, _| {
            let mut rng = ChaCha20Rng::seed_from_u64(42);
            b.iter(|| sampler.sample_by_obligor(&mut rng))
        });
    }
    group.finish();
}

// ── Group 2: draws — kernel scaling in M ─────────────────────────────────────

fn bench_draws(c: &mut Criterion) {
    let mut group = c.benchmark_group("draws");
    for &m in &[1_000i64, 10_000, 100_000, 1_000_000] {
        let p = with_size(&MEDIUM, MEDIUM.portfolio_size, m);
        group.throughput(Throughput::Elements(m as u64));
        group.bench_with_input(BenchmarkId::from_parameter(m), &p, |b, p| {
            b.iter(|| simulate(p, 42))
        });
    }
    group.finish();
}

// ── Group 3: end_to_end — named scenarios ────────────────────────────────────

fn bench_end_to_end(c: &mut Criterion) {
    let mut group = c.benchmark_group("end_to_end");
    for (name, scenario) in [("small", &SMALL), ("medium", &MEDIUM), ("large", &LARGE)] {
        if name == "large" {
            group.sample_size(10);
        }
        let p = params(scenario);
        group.throughput(Throughput::Elements(scenario.simulation_count as u64));
        group.bench_function(BenchmarkId::from_parameter(name), |b| b.iter(|| simulate(&p, 42)));
    }
    group.finish();
}

// ── Group 4: brute_force — obligor-level reference on the small scenario ─────

fn bench_brute_force(c: &mut Criterion) {
    let mut group = c.benchmark_group("brute_force");
    group.sample_size(10);
    let p = params(&SMALL);
    group.bench_function("small", |b| b.iter(|| simulate_brute_force(&p, 42)));
    group.finish();
}

// ── Group 5: threads — same run on 1 and all workers ─────────────────────────

fn bench_threads(c: &mut Criterion) {
    let mut group = c.benchmark_group("threads");
    let p = params(&MEDIUM);
    for threads in [1usize, 0] {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .expect("thread pool");
        let label = if threads == 0 { "all".to_string() } else { threads.to_string() };
        group.bench_function(BenchmarkId::from_parameter(label), |b| {
            b.iter(|| pool.install(|| simulate(&p, 42)))
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_scenario,
    bench_draws,
    bench_end_to_end,
    bench_brute_force,
    bench_threads,
);
criterion_main!(benches);
