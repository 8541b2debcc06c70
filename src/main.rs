use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use cavity_ppe::config::{self, Config};
use cavity_ppe::solver::{self, diagnostics, PoissonRelaxer};
use cavity_ppe::state::CavityState;

/// Lid-driven cavity flow with a Jacobi pressure Poisson solver.
#[derive(Parser)]
#[command(name = "cavity-ppe")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about, long_about = None)]
struct Cli {
    /// YAML config; defaults to ./cavity.yaml if present
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of timesteps, overriding run.steps
    #[arg(short, long)]
    steps: Option<usize>,

    /// Evaluate stencils on the rayon pool
    #[arg(long)]
    parallel: bool,

    /// Worker threads for --parallel (default: one per core)
    #[arg(long)]
    threads: Option<usize>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

fn parse_level(s: &str) -> Level {
    match s.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(parse_level(&cli.log_level))
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut cfg = match &cli.config {
        Some(path) => config::load_from(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => config::load(),
    };
    if let Some(steps) = cli.steps {
        cfg.run.steps = steps;
    }
    if cli.parallel {
        cfg.relaxation.parallel = true;
    }
    if let Some(threads) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("configuring rayon thread pool")?;
    }

    run(&cfg);
    Ok(())
}

fn run(cfg: &Config) {
    let params = cfg.solver_params();
    let (nx, ny) = (cfg.grid.nx, cfg.grid.ny);

    info!(
        nx,
        ny,
        dx = params.dx,
        dt = params.dt,
        rho = params.rho,
        nu = params.nu,
        lid = params.lid_velocity,
        l2_target = params.relax.l2_target,
        max_iter = params.relax.max_iter,
        parallel = params.relax.parallel,
        "starting cavity run"
    );
    if params.diffusion_number() > 0.25 {
        warn!(
            diffusion_number = params.diffusion_number(),
            "explicit diffusion is unstable above 0.25"
        );
    }
    if params.lid_cfl() > 1.0 {
        warn!(cfl = params.lid_cfl(), "lid CFL number above 1");
    }

    let mut state = CavityState::new(nx, ny, params.dt);
    let mut relaxer = PoissonRelaxer::with_shape((nx, ny), params.relax.clone());

    let started = Instant::now();
    let mut total_sweeps = 0usize;
    let mut capped_steps = 0usize;
    let report_every = cfg.run.report_every.max(1);

    for _ in 0..cfg.run.steps {
        let report = solver::fluid_step_cavity(&mut state, &params, &mut relaxer);
        total_sweeps += report.iterations;
        if report.hit_cap() && !report.converged() {
            capped_steps += 1;
        }

        if state.step_count % report_every as u64 == 0 {
            info!(
                step = state.step_count,
                time = state.time(),
                sweeps = report.iterations,
                residual = report.residual,
                ke = diagnostics::compute_kinetic_energy(&state.u, &state.v),
                max_div = diagnostics::max_divergence(&state.u, &state.v, params.dx),
                "progress"
            );
        }
    }

    let elapsed = started.elapsed();
    let (p_min, p_max) = state
        .p
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &x| (lo.min(x), hi.max(x)));
    info!(
        steps = state.step_count,
        time = state.time(),
        total_sweeps,
        capped_steps,
        p_min,
        p_max,
        poisson_residual = diagnostics::poisson_residual(&state.p, &state.b),
        ke = diagnostics::compute_kinetic_energy(&state.u, &state.v),
        elapsed_ms = elapsed.as_millis() as u64,
        "run complete"
    );
    if capped_steps > 0 {
        warn!(
            capped_steps,
            max_iter = params.relax.max_iter,
            "pressure relaxation hit the iteration cap without converging"
        );
    }
}
