//! Turn a benchmark id into something a process executor can run.

use std::{
    fs::File,
    path::{Path, PathBuf},
    process::{Command, Stdio},
};

use crate::registry::{self, Arg, Output, RunVariant};

/// A resolved, ready-to-execute benchmark process.
///
/// `args[0]` is the executable path, as the process sees it in its argv.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct InvocationDescriptor {
    pub executable: PathBuf,
    pub args: Vec<String>,
    pub stdin: Option<PathBuf>,
    pub stdout: Option<PathBuf>,
}

impl InvocationDescriptor {
    /// Arguments after argv[0].
    pub fn options(&self) -> &[String] {
        self.args.get(1..).unwrap_or_default()
    }

    /// Build a native process for this invocation, running in `work_dir`.
    /// Opens the redirected files.
    pub fn command(&self, work_dir: &Path) -> std::io::Result<Command> {
        let mut cmd = Command::new(&self.executable);
        cmd.args(self.options()).current_dir(work_dir);
        if let Some(stdin) = &self.stdin {
            cmd.stdin(Stdio::from(File::open(stdin)?));
        }
        if let Some(stdout) = &self.stdout {
            cmd.stdout(Stdio::from(File::create(stdout)?));
        }
        Ok(cmd)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Resolution {
    pub benchmark: &'static str,
    pub variant: RunVariant,
    pub invocation: InvocationDescriptor,
    /// Where the output to verify ends up after the process completes.
    pub actual_output: PathBuf,
    /// Reference output shipped with the input set.
    pub expected_output: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("unknown benchmark `{id}`")]
    UnknownBenchmark { id: String },
    #[error("benchmark `{id}` has no `{variant}` input set")]
    UnsupportedVariant { id: String, variant: RunVariant },
    #[error(
        "benchmark `{id}` expects {} in the working directory, copy them from `{}`",
        .missing.join(", "),
        .source_dir.display()
    )]
    MissingStagedInput {
        id: String,
        /// Every file the benchmark needs staged.
        required_files: Vec<String>,
        /// The subset of `required_files` not found.
        missing: Vec<String>,
        source_dir: PathBuf,
    },
}

/// Resolves benchmarks of one SPEC CPU2006 installation.
///
/// `bench_root` is the `benchspec/CPU2006` directory. Staged inputs are
/// looked up in the working directory and captured standard output goes to
/// the scratch directory. Both are explicit so that resolution never depends
/// on the state of the process.
#[derive(Debug, Clone)]
pub struct Resolver {
    bench_root: PathBuf,
    work_dir: PathBuf,
    scratch_dir: PathBuf,
}

impl Resolver {
    pub fn new(bench_root: impl Into<PathBuf>) -> Self {
        Self {
            bench_root: bench_root.into(),
            work_dir: PathBuf::from("."),
            scratch_dir: std::env::temp_dir(),
        }
    }
    pub fn set_work_dir(mut self, work_dir: impl Into<PathBuf>) -> Self {
        self.work_dir = work_dir.into();
        self
    }
    pub fn set_scratch_dir(mut self, scratch_dir: impl Into<PathBuf>) -> Self {
        self.scratch_dir = scratch_dir.into();
        self
    }
    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    /// Resolve `id` for the given input set.
    ///
    /// Without a build variant the executable is expected directly in the
    /// benchmark directory, otherwise in `build/<build_variant>`. The
    /// fingerprint is appended to captured output files so that concurrent
    /// runs of the same benchmark do not overwrite each other.
    pub fn resolve(
        &self,
        id: &str,
        build_variant: Option<&str>,
        variant: RunVariant,
        fingerprint: &str,
    ) -> Result<Resolution, ResolveError> {
        let entry = registry::lookup(id).ok_or_else(|| ResolveError::UnknownBenchmark {
            id: id.to_string(),
        })?;
        let spec = entry
            .variant(variant)
            .ok_or_else(|| ResolveError::UnsupportedVariant {
                id: id.to_string(),
                variant,
            })?;

        let bench_dir = self.bench_root.join(entry.id);
        let data_dir = bench_dir.join("data").join(variant.as_str());
        let input_dir = data_dir.join("input");

        let missing: Vec<String> = spec
            .staged
            .iter()
            .filter(|name| !self.work_dir.join(name).is_file())
            .map(|name| name.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(ResolveError::MissingStagedInput {
                id: id.to_string(),
                required_files: spec.staged.iter().map(|s| s.to_string()).collect(),
                missing,
                source_dir: input_dir,
            });
        }

        let executable = match build_variant.filter(|b| !b.is_empty()) {
            Some(build) => bench_dir.join("build").join(build).join(entry.executable),
            None => bench_dir.join(entry.executable),
        };

        let mut args = vec![executable.to_string_lossy().into_owned()];
        args.extend(spec.args.iter().map(|arg| match arg {
            Arg::Lit(s) | Arg::Staged(s) => s.to_string(),
            Arg::Input(name) => input_dir.join(name).to_string_lossy().into_owned(),
            Arg::Common(name) => bench_dir
                .join("data/all/input")
                .join(name)
                .to_string_lossy()
                .into_owned(),
        }));

        let (stdout, actual_output) = match spec.output {
            Output::Stdout(name) => {
                let path = self.scratch_dir.join(scratch_name(entry.id, name, fingerprint));
                (Some(path.clone()), path)
            }
            Output::WorkDir(name) => (None, self.work_dir.join(name)),
        };

        let resolution = Resolution {
            benchmark: entry.id,
            variant,
            invocation: InvocationDescriptor {
                executable,
                args,
                stdin: spec.stdin.map(|name| input_dir.join(name)),
                stdout,
            },
            actual_output,
            expected_output: data_dir.join("output").join(spec.expected),
        };
        tracing::debug!(bench = id, %variant, "resolved: {:?}", resolution.invocation.args);
        Ok(resolution)
    }
}

fn scratch_name(id: &str, name: &str, fingerprint: &str) -> String {
    if fingerprint.is_empty() {
        format!("{id}.{name}")
    } else {
        format!("{id}.{name}.{fingerprint}")
    }
}

/// Resolve against the current working directory, capturing standard output
/// into the system temp directory.
pub fn resolve(
    id: &str,
    bench_root: &Path,
    build_variant: Option<&str>,
    variant: RunVariant,
    fingerprint: &str,
) -> Result<Resolution, ResolveError> {
    Resolver::new(bench_root).resolve(id, build_variant, variant, fingerprint)
}
