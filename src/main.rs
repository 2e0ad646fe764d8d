use ascent_simulation::{read_staging_report, ScenarioConfig, Stage, Telemetry};

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "ascent-sim")]
#[command(about = "Multi-stage rocket ascent and circularization simulator")]
#[command(version)]
struct Args {
    /// Scenario YAML file
    #[arg(default_value = "scenarios/two_stage.yaml")]
    scenario: PathBuf,

    /// Staging report to take the two stages from instead of the scenario
    #[arg(short, long)]
    staging_report: Option<PathBuf>,

    /// Rebalance the stages with the scenario's optimizer settings before flying
    #[arg(short, long)]
    optimize: bool,

    /// Raise log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn load_stages(args: &Args, scenario: &ScenarioConfig) -> Result<Vec<Stage>> {
    let mut stages = match &args.staging_report {
        Some(path) => {
            let (lower, upper) = read_staging_report(path)?;
            vec![lower, upper]
        }
        None => scenario.build_stages()?,
    };

    if args.optimize {
        let optimizer = scenario
            .optimizer
            .ok_or_else(|| anyhow!("--optimize needs an `optimizer` section in the scenario"))?;
        stages = optimizer.build().optimize(&stages)?.stages;
    }

    let mut carried = 0.0;
    for (index, stage) in stages.iter().enumerate().rev() {
        info!(
            stage = index + 1,
            ideal_delta_v = stage.ideal_delta_v(carried),
            burn_time = stage.burn_time(),
            "Stage ready"
        );
        carried += stage.full_mass();
    }
    Ok(stages)
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let scenario = ScenarioConfig::load(&args.scenario)
        .with_context(|| format!("failed to load scenario {}", args.scenario.display()))?;
    let stages = load_stages(&args, &scenario)?;

    let sim = scenario.build_sim(stages)?;
    let outcome = sim.simulate()?;

    Telemetry::from_outcome(&outcome).display_data();

    Ok(())
}
