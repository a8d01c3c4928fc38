use std::path::PathBuf;

use anyhow::{Context, Result};
use binutils::{clap, verbose};
use clap::{Parser, Subcommand};
use spec2006::{compare_files, registry, Resolution, Resolver, RunVariant};

/// Resolve, check and run SPEC CPU2006 benchmarks.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about,
    long_about = None,
    styles = binutils::get_styles(),
    arg_required_else_help = true,
)]
struct Args {
    #[command(subcommand)]
    command: Commands,

    /// Write logs to this file as JSON lines
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(flatten)]
    verbose: verbose::Verbosity,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List known benchmarks and their input sets
    List {
        #[arg(long)]
        json: bool,
    },
    /// Print the invocation of a benchmark
    Resolve {
        #[command(flatten)]
        target: Target,
        #[arg(long)]
        json: bool,
    },
    /// Check that a benchmark can be resolved, including its staged inputs
    Check {
        #[command(flatten)]
        target: Target,
    },
    /// Compare the output of a finished run with the reference output
    Verify {
        #[command(flatten)]
        target: Target,
    },
    /// Run a benchmark natively and verify its output
    Run {
        #[command(flatten)]
        target: Target,
    },
}

#[derive(clap::Args, Debug)]
struct Target {
    /// Benchmark id, e.g. `462.libquantum`
    bench: String,

    /// Input set
    #[arg(short = 'i', long, default_value = "test")]
    variant: RunVariant,

    /// Build directory under `<bench>/build`. Without it the executable is
    /// taken from the benchmark directory itself.
    #[arg(short, long)]
    build: Option<String>,

    /// The `benchspec/CPU2006` directory of the SPEC installation
    #[arg(long, env = "SPEC2006_ROOT")]
    root: PathBuf,

    /// Suffix of captured output files, to tell concurrent runs apart
    #[arg(long, default_value = "local")]
    fingerprint: String,

    /// Directory holding staged inputs (default: current directory)
    #[arg(long)]
    work_dir: Option<PathBuf>,

    /// Directory for captured output (default: system temp directory)
    #[arg(long)]
    scratch_dir: Option<PathBuf>,
}

impl Target {
    fn resolver(&self) -> Result<Resolver> {
        let work_dir = match &self.work_dir {
            Some(dir) => dir.clone(),
            None => std::env::current_dir().context("could not get current directory")?,
        };
        let mut resolver = Resolver::new(&self.root).set_work_dir(work_dir);
        if let Some(dir) = &self.scratch_dir {
            resolver = resolver.set_scratch_dir(dir);
        }
        Ok(resolver)
    }

    fn resolve(&self) -> Result<(Resolver, Resolution)> {
        let resolver = self.resolver()?;
        let resolution = resolver.resolve(
            &self.bench,
            self.build.as_deref(),
            self.variant,
            &self.fingerprint,
        )?;
        Ok((resolver, resolution))
    }
}

fn print_resolution(r: &Resolution) {
    let inv = &r.invocation;
    println!("benchmark: {} ({})", r.benchmark, r.variant);
    println!("executable: {}", inv.executable.display());
    println!("args: {}", inv.options().join(" "));
    if let Some(stdin) = &inv.stdin {
        println!("stdin: {}", stdin.display());
    }
    if let Some(stdout) = &inv.stdout {
        println!("stdout: {}", stdout.display());
    }
    println!("output: {}", r.actual_output.display());
    println!("expected: {}", r.expected_output.display());
}

fn verify(r: &Resolution) -> Result<()> {
    let cmp = compare_files(&r.actual_output, &r.expected_output)?;
    println!("{}: {}", r.benchmark, cmp);
    anyhow::ensure!(cmp.is_match(), "output of {} differs from reference", r.benchmark);
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_file = match &args.log_file {
        Some(path) => Some(
            std::fs::File::create(path)
                .with_context(|| format!("could not create log file `{}`", path.display()))?,
        ),
        None => None,
    };
    let log_level = binutils::verbose_level_to_trace(args.verbose.log_level());
    binutils::logging_setup(log_level, log_file.as_ref());

    match args.command {
        Commands::List { json } => {
            if json {
                let list: Vec<_> = registry::entries()
                    .iter()
                    .map(|e| {
                        serde_json::json!({
                            "id": e.id,
                            "executable": e.executable,
                            "variants": e.supported_variants().collect::<Vec<_>>(),
                        })
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&list)?);
            } else {
                for entry in registry::entries() {
                    let variants: Vec<_> =
                        entry.supported_variants().map(|v| v.as_str()).collect();
                    println!("{}\t{}", entry.id, variants.join(","));
                }
            }
        }
        Commands::Resolve { target, json } => {
            let (_, resolution) = target.resolve()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&resolution)?);
            } else {
                print_resolution(&resolution);
            }
        }
        Commands::Check { target } => {
            let (_, resolution) = target.resolve()?;
            println!("{} ({}): ready", resolution.benchmark, resolution.variant);
        }
        Commands::Verify { target } => {
            let (_, resolution) = target.resolve()?;
            verify(&resolution)?;
        }
        Commands::Run { target } => {
            let (resolver, resolution) = target.resolve()?;
            let mut cmd = resolution
                .invocation
                .command(resolver.work_dir())
                .context("could not open redirected files")?;
            tracing::info!("running {:?}", cmd);
            let status = cmd.status().with_context(|| {
                format!(
                    "could not execute `{}`",
                    resolution.invocation.executable.display()
                )
            })?;
            anyhow::ensure!(status.success(), "{} exited with {status}", resolution.benchmark);
            verify(&resolution)?;
        }
    }
    Ok(())
}
