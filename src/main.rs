use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use pfloss::analysis::{LossSummary, default_count_histogram};
use pfloss::config::RunConfig;
use pfloss::params::SimulationParameters;
use pfloss::simulation::Simulation;

/// Simulate the loss distribution of a homogeneous credit portfolio.
#[derive(Parser)]
#[command(name = "pfloss")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON run config (`seed` + `parameters`); defaults to the reference scenario
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Run seed
    #[arg(long)]
    seed: Option<u64>,

    /// Asset correlation ρ in [0, 1)
    #[arg(long, allow_negative_numbers = true)]
    rho: Option<f32>,

    /// Latent-asset default threshold
    #[arg(long, conflicts_with = "pd", allow_negative_numbers = true)]
    threshold: Option<f32>,

    /// Probability of default; sets the threshold to Φ⁻¹(pd)
    #[arg(long, allow_negative_numbers = true)]
    pd: Option<f64>,

    /// Exposure at default per obligor
    #[arg(long, allow_negative_numbers = true)]
    ead: Option<f32>,

    /// Loss given default in [0, 1]
    #[arg(long, allow_negative_numbers = true)]
    lgd: Option<f32>,

    /// Number of obligors
    #[arg(short = 'n', long, allow_negative_numbers = true)]
    portfolio_size: Option<i32>,

    /// Number of Monte Carlo draws
    #[arg(short = 'm', long, allow_negative_numbers = true)]
    sims: Option<i32>,

    /// Write one `draw,loss` row per draw to this CSV file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print every draw as `[i] L_PF=<loss>`
    #[arg(long)]
    print_draws: bool,

    /// Print the summary as JSON instead of a table
    #[arg(long)]
    json: bool,

    /// Suppress the summary
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => RunConfig::from_json_file(path)?,
        None => RunConfig::canonical(),
    };
    apply_overrides(&mut config, &cli);

    let raw = config.parameters;
    let params = match cli.pd {
        Some(pd) => SimulationParameters::from_probability_of_default(
            raw.asset_correlation as f64,
            pd,
            raw.exposure_at_default as f64,
            raw.loss_given_default as f64,
            raw.portfolio_size as i64,
            raw.simulation_count as i64,
        ),
        None => SimulationParameters::try_from(raw),
    }
    .context("rejected simulation parameters")?;

    let sim = Simulation::new(params, config.seed)?;
    let losses = sim.run()?;
    info!(draws = losses.len(), "loss sequence ready");

    if cli.print_draws {
        for (i, loss) in losses.iter().enumerate() {
            println!("[{}] L_PF={:.4}", i + 1, loss);
        }
    }

    if let Some(path) = &cli.output {
        write_losses_csv(&losses, path)?;
        info!(path = %path.display(), "losses written");
    }

    if !cli.quiet {
        let Some(summary) = LossSummary::from_losses(&losses) else {
            bail!("kernel returned an empty loss sequence");
        };
        if cli.json {
            println!("{}", serde_json::to_string_pretty(&summary)?);
        } else {
            print_summary(&params, config.seed, &summary, &losses);
        }
    }

    Ok(())
}

fn apply_overrides(config: &mut RunConfig, cli: &Cli) {
    let p = &mut config.parameters;
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }
    if let Some(rho) = cli.rho {
        p.asset_correlation = rho;
    }
    if let Some(c) = cli.threshold {
        p.default_threshold = c;
    }
    if let Some(ead) = cli.ead {
        p.exposure_at_default = ead;
    }
    if let Some(lgd) = cli.lgd {
        p.loss_given_default = lgd;
    }
    if let Some(n) = cli.portfolio_size {
        p.portfolio_size = n;
    }
    if let Some(m) = cli.sims {
        p.simulation_count = m;
    }
}

fn write_losses_csv(losses: &[f32], path: &Path) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    let mut w = BufWriter::new(file);
    writeln!(w, "draw,loss")?;
    for (i, loss) in losses.iter().enumerate() {
        writeln!(w, "{},{:.6}", i + 1, loss)?;
    }
    w.flush()?;
    Ok(())
}

fn print_summary(params: &SimulationParameters, seed: u64, s: &LossSummary, losses: &[f32]) {
    println!("\n=== Portfolio loss distribution ===");
    println!(
        "  rho={:.4}  threshold={:.4}  PD={:.4}%  EAD={}  LGD={:.2}  N={}  M={}  seed={}",
        params.asset_correlation(),
        params.default_threshold(),
        params.unconditional_default_probability() * 100.0,
        params.exposure_at_default(),
        params.loss_given_default(),
        params.portfolio_size(),
        params.simulation_count(),
        seed,
    );

    println!(
        "\n{:>10} | {:>10} | {:>10} | {:>10} | {:>10} | {:>10} | {:>10}",
        "EL", "mean", "std", "p50", "VaR95", "VaR99", "ES99"
    );
    println!("{}", "-".repeat(7 * 10 + 6 * 3));
    println!(
        "{:>10.4} | {:>10.4} | {:>10.4} | {:>10.4} | {:>10.4} | {:>10.4} | {:>10.4}",
        params.expected_loss(),
        s.mean,
        s.std_dev,
        s.p50,
        s.value_at_risk(0.95),
        s.value_at_risk(0.99),
        s.expected_shortfall(0.99),
    );
    println!("  min={:.4}  max={:.4}  p99.9={:.4}", s.min, s.max, s.p999);

    let hist = default_count_histogram(losses, params.loss_per_default());
    println!("\n--- Default counts ---");
    println!("{:>8} | {:>8} | {:>8}", "defaults", "draws", "freq%");
    for (count, draws) in hist.iter().take(25) {
        println!(
            "{:>8} | {:>8} | {:>7.2}%",
            count,
            draws,
            *draws as f64 / s.n as f64 * 100.0
        );
    }
    if hist.len() > 25 {
        println!("  ... {} more counts", hist.len() - 25);
    }
}
