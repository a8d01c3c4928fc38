use std::path::PathBuf;

use anyhow::{Context, Result};
use binutils::{clap, verbose};
use clap::{ArgGroup, Parser};
use spec2006::{compare_files, Launch, LaunchMode, Resolver, RunVariant, SimConfig};

/// Run a workload on gem5 in syscall emulation mode.
///
/// Exactly one of `--command`, `--benchmark` and `--check` selects what to
/// do. Results go to `<out_dir>/<name>-<date>`.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    long_about = None,
    styles = binutils::get_styles(),
    arg_required_else_help = true,
    group(ArgGroup::new("mode").required(true).args(["command", "benchmark", "check"])),
)]
struct Args {
    /// Executable to run in the simulator
    #[arg(short, long)]
    command: Option<PathBuf>,

    /// Options string passed to the executable
    #[arg(
        short,
        long,
        conflicts_with_all = ["benchmark", "check"],
        allow_hyphen_values = true
    )]
    options: Option<String>,

    /// SPEC CPU2006 benchmark to run, e.g. `462.libquantum`
    #[arg(short, long)]
    benchmark: Option<String>,

    /// Only check that the benchmark is ready to run
    #[arg(short = 't', long, value_name = "BENCHMARK")]
    check: Option<String>,

    /// Input set of the benchmark
    #[arg(short = 'i', long, default_value = "test")]
    variant: RunVariant,

    /// Build directory of the benchmark executable under `<bench>/build`
    #[arg(long)]
    build: Option<String>,

    /// YAML file with simulator and machine settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Overrides `gem5_root` of the config
    #[arg(long, env = "GEM5_ROOT")]
    gem5_root: Option<PathBuf>,

    /// Overrides `cpu2006_root` of the config
    #[arg(long, env = "SPEC2006_ROOT")]
    cpu2006_root: Option<PathBuf>,

    /// Print the gem5 command line instead of running it
    #[arg(long)]
    dry_run: bool,

    #[command(flatten)]
    verbose: verbose::Verbosity,
}

impl Args {
    fn sim_config(&self) -> Result<SimConfig> {
        let mut config = match &self.config {
            Some(path) => SimConfig::load(path)?,
            None => SimConfig::default(),
        };
        if let Some(root) = &self.gem5_root {
            config.gem5_root = root.clone();
        }
        if let Some(root) = &self.cpu2006_root {
            config.cpu2006_root = root.clone();
        }
        Ok(config)
    }

    fn mode(&self) -> LaunchMode {
        match (&self.command, &self.benchmark, &self.check) {
            (Some(cmd), _, _) => LaunchMode::Command {
                cmd: cmd.clone(),
                options: self.options.clone(),
            },
            (None, Some(id), _) => LaunchMode::Benchmark {
                id: id.clone(),
                variant: self.variant,
                build: self.build.clone(),
            },
            (None, None, id) => LaunchMode::Check {
                id: id.clone().unwrap_or_default(),
                variant: self.variant,
                build: self.build.clone(),
            },
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let log_level = binutils::verbose_level_to_trace(args.verbose.log_level());
    binutils::logging_setup(log_level, None::<&std::fs::File>);

    let config = args.sim_config()?;
    let work_dir = std::env::current_dir().context("could not get current directory")?;
    let resolver = Resolver::new(&config.cpu2006_root).set_work_dir(work_dir);

    let mode = args.mode();
    if let LaunchMode::Check { .. } = mode {
        if let Some(r) = mode.resolve(&resolver, "check")? {
            println!("{} ({}): ready", r.benchmark, r.variant);
            println!("executable: {}", r.invocation.executable.display());
            println!("expected: {}", r.expected_output.display());
        }
        return Ok(());
    }

    let now = chrono::Local::now();
    let fingerprint = format!("{}.{}", now.format("%Y%m%d%H%M%S"), std::process::id());
    let launch = Launch::plan(&config, &mode, &resolver, now.date_naive(), &fingerprint)?;

    if args.dry_run {
        println!("{launch}");
        return Ok(());
    }

    ctrlc::set_handler(|| tracing::warn!("interrupted, waiting for gem5 to exit"))
        .context("failed to set ctrlc handler")?;

    tracing::info!("{launch}");
    let status = launch
        .command()
        .status()
        .with_context(|| format!("could not execute `{}`", launch.program.display()))?;
    anyhow::ensure!(status.success(), "gem5 exited with {status}");
    println!("stats: {}", launch.out_dir.join(spec2006::stats::STATS_FILE).display());

    if let Some(r) = &launch.resolution {
        let cmp = compare_files(&r.actual_output, &r.expected_output)?;
        println!("{}: {}", r.benchmark, cmp);
        anyhow::ensure!(cmp.is_match(), "output of {} differs from reference", r.benchmark);
    }
    Ok(())
}
