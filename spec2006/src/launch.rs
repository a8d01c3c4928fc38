//! Compose gem5 command lines for syscall emulation runs.
//!
//! A launch is the simulator binary, its output directory, the SE config
//! script with the machine options of a [`SimConfig`], and the workload: an
//! arbitrary command or a resolved SPEC CPU2006 benchmark.

use std::{
    path::{Path, PathBuf},
    process::Command,
};

use chrono::NaiveDate;

use crate::resolve::{ResolveError, Resolution, Resolver};
use crate::RunVariant;

#[derive(Debug, thiserror::Error)]
pub enum LaunchError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    #[error("could not read config `{}`", .path.display())]
    ReadConfig {
        path: PathBuf,
        #[source]
        err: std::io::Error,
    },
    #[error("invalid config `{}`", .path.display())]
    ParseConfig {
        path: PathBuf,
        #[source]
        err: serde_yaml::Error,
    },
    #[error("`{id}` is only checked, there is nothing to launch")]
    CheckOnly { id: String },
}

/// Simulator location and simulated machine. Every field may be omitted in
/// the config file.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimConfig {
    pub gem5_root: PathBuf,
    /// Build target, `build/<arch>/<binary>` under `gem5_root`.
    pub arch: String,
    pub binary: String,
    /// SE config script, relative to `gem5_root`.
    pub se_script: PathBuf,

    pub cpu_type: String,
    pub num_cpus: u32,

    pub mem_type: String,
    /// Size of the whole physical address space.
    pub mem_size: String,
    pub dram_size: String,
    pub att_length: u32,
    /// Length of the secondary page table in the memory controller.
    pub mc_page_table_length: u32,

    pub l1d_size: String,
    pub l1d_assoc: u32,
    pub l1i_size: String,
    pub l1i_assoc: u32,
    pub l2_size: String,
    pub l2_assoc: u32,
    /// One L2 per CPU if unset.
    pub num_l2caches: Option<u32>,
    /// 3MB per CPU if unset.
    pub l3_size: Option<String>,
    pub l3_assoc: u32,

    /// `benchspec/CPU2006` of the SPEC installation.
    pub cpu2006_root: PathBuf,
    /// Parent of the per-run gem5 output directories.
    pub out_dir: PathBuf,
    /// Appended verbatim after the generated options.
    pub extra_options: Vec<String>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            gem5_root: PathBuf::from("gem5-stable"),
            arch: "X86".into(),
            binary: "gem5.opt".into(),
            se_script: PathBuf::from("configs/thnvm-se.py"),
            cpu_type: "atomic".into(),
            num_cpus: 1,
            mem_type: "simple_mem".into(),
            mem_size: "2GB".into(),
            dram_size: "2GB".into(),
            att_length: 0,
            mc_page_table_length: 256,
            l1d_size: "32kB".into(),
            l1d_assoc: 8,
            l1i_size: "32kB".into(),
            l1i_assoc: 8,
            l2_size: "256kB".into(),
            l2_assoc: 8,
            num_l2caches: None,
            l3_size: None,
            l3_assoc: 30,
            cpu2006_root: PathBuf::from("benchspec/CPU2006"),
            out_dir: PathBuf::from("gem5out"),
            extra_options: Vec::new(),
        }
    }
}

impl SimConfig {
    /// Load a YAML config file. Missing fields keep their defaults.
    pub fn load(path: &Path) -> Result<Self, LaunchError> {
        let content = std::fs::read_to_string(path).map_err(|err| LaunchError::ReadConfig {
            path: path.to_path_buf(),
            err,
        })?;
        serde_yaml::from_str(&content).map_err(|err| LaunchError::ParseConfig {
            path: path.to_path_buf(),
            err,
        })
    }

    pub fn gem5_binary(&self) -> PathBuf {
        self.gem5_root
            .join("build")
            .join(&self.arch)
            .join(&self.binary)
    }

    pub fn script(&self) -> PathBuf {
        self.gem5_root.join(&self.se_script)
    }

    /// Options passed to the SE script.
    pub fn options(&self) -> Vec<String> {
        let num_l2caches = self.num_l2caches.unwrap_or(self.num_cpus);
        let l3_size = self
            .l3_size
            .clone()
            .unwrap_or_else(|| format!("{}MB", 3 * self.num_cpus));

        let mut opts = vec!["--caches".to_string(), "--l2cache".to_string()];
        opts.extend(
            [
                ("cpu-type", self.cpu_type.clone()),
                ("num-cpus", self.num_cpus.to_string()),
                ("mem-type", self.mem_type.clone()),
                ("mem-size", self.mem_size.clone()),
                ("dram-size", self.dram_size.clone()),
                ("att-length", self.att_length.to_string()),
                ("mc-page-table-length", self.mc_page_table_length.to_string()),
                ("l1d_size", self.l1d_size.clone()),
                ("l1d_assoc", self.l1d_assoc.to_string()),
                ("l1i_size", self.l1i_size.clone()),
                ("l1i_assoc", self.l1i_assoc.to_string()),
                ("l2_size", self.l2_size.clone()),
                ("l2_assoc", self.l2_assoc.to_string()),
                ("num-l2caches", num_l2caches.to_string()),
                ("l3_size", l3_size),
                ("l3_assoc", self.l3_assoc.to_string()),
            ]
            .into_iter()
            .map(|(name, value)| format!("--{name}={value}")),
        );
        opts.extend(self.extra_options.iter().cloned());
        opts
    }
}

/// What the simulated machine runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchMode {
    /// An arbitrary executable with an options string.
    Command {
        cmd: PathBuf,
        options: Option<String>,
    },
    Benchmark {
        id: String,
        variant: RunVariant,
        build: Option<String>,
    },
    /// Resolve a benchmark without running the simulator.
    Check {
        id: String,
        variant: RunVariant,
        build: Option<String>,
    },
}

impl LaunchMode {
    /// Short name of the workload, used for the output directory.
    pub fn alias(&self) -> String {
        let name = match self {
            LaunchMode::Command { cmd, .. } => cmd.as_path(),
            LaunchMode::Benchmark { id, .. } | LaunchMode::Check { id, .. } => {
                Path::new(id.as_str())
            }
        };
        name.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| name.to_string_lossy().into_owned())
    }

    /// Resolve the benchmark of a benchmark or check mode. Command mode has
    /// nothing to resolve.
    pub fn resolve(
        &self,
        resolver: &Resolver,
        fingerprint: &str,
    ) -> Result<Option<Resolution>, ResolveError> {
        match self {
            LaunchMode::Command { .. } => Ok(None),
            LaunchMode::Benchmark { id, variant, build }
            | LaunchMode::Check { id, variant, build } => resolver
                .resolve(id, build.as_deref(), *variant, fingerprint)
                .map(Some),
        }
    }
}

/// A fully composed simulator invocation.
#[derive(Debug, Clone)]
pub struct Launch {
    pub program: PathBuf,
    pub args: Vec<String>,
    /// gem5 output directory (`-d`), where `stats.txt` ends up.
    pub out_dir: PathBuf,
    /// Present in benchmark mode.
    pub resolution: Option<Resolution>,
}

impl Launch {
    /// Compose the launch. Benchmark mode resolves the benchmark with
    /// `resolver`, using `fingerprint` for its captured output. Check mode
    /// has no launch, use [`LaunchMode::resolve`] for it.
    pub fn plan(
        config: &SimConfig,
        mode: &LaunchMode,
        resolver: &Resolver,
        date: NaiveDate,
        fingerprint: &str,
    ) -> Result<Self, LaunchError> {
        let out_dir = config
            .out_dir
            .join(format!("{}-{}", mode.alias(), date.format("%F")));

        let mut args = vec![
            "-d".to_string(),
            out_dir.to_string_lossy().into_owned(),
            config.script().to_string_lossy().into_owned(),
        ];
        args.extend(config.options());

        let resolution = match mode {
            LaunchMode::Check { id, .. } => return Err(LaunchError::CheckOnly { id: id.clone() }),
            LaunchMode::Command { cmd, options } => {
                args.push("-c".into());
                args.push(cmd.to_string_lossy().into_owned());
                if let Some(options) = options {
                    args.push("-o".into());
                    args.push(options.clone());
                }
                None
            }
            LaunchMode::Benchmark { id, variant, build } => {
                let resolution = resolver.resolve(id, build.as_deref(), *variant, fingerprint)?;
                let inv = &resolution.invocation;
                args.push("-c".into());
                args.push(inv.executable.to_string_lossy().into_owned());
                if !inv.options().is_empty() {
                    if inv.options().iter().any(|o| o.contains(char::is_whitespace)) {
                        tracing::warn!("{id}: arguments with spaces are split by the SE script");
                    }
                    args.push("-o".into());
                    args.push(inv.options().join(" "));
                }
                if let Some(stdin) = &inv.stdin {
                    args.push(format!("--input={}", stdin.display()));
                }
                if let Some(stdout) = &inv.stdout {
                    args.push(format!("--output={}", stdout.display()));
                }
                Some(resolution)
            }
        };

        Ok(Self {
            program: config.gem5_binary(),
            args,
            out_dir,
            resolution,
        })
    }

    pub fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        cmd
    }
}

impl std::fmt::Display for Launch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                write!(f, " '{arg}'")?;
            } else {
                write!(f, " {arg}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2015, 3, 7).unwrap()
    }

    #[test]
    fn test_default_options() {
        let opts = SimConfig::default().options();
        assert_eq!(
            &opts[..4],
            ["--caches", "--l2cache", "--cpu-type=atomic", "--num-cpus=1"]
        );
        assert!(opts.contains(&"--mc-page-table-length=256".to_string()));
        assert!(opts.contains(&"--num-l2caches=1".to_string()));
        assert!(opts.contains(&"--l3_size=3MB".to_string()));
        assert_eq!(opts.last().unwrap(), "--l3_assoc=30");
    }

    #[test]
    fn test_config_overrides() {
        let config: SimConfig = serde_yaml::from_str(
            "gem5_root: /opt/gem5\nnum_cpus: 4\nextra_options: [--maxinsts=1000000]\n",
        )
        .unwrap();
        assert_eq!(config.gem5_binary(), Path::new("/opt/gem5/build/X86/gem5.opt"));
        assert_eq!(config.script(), Path::new("/opt/gem5/configs/thnvm-se.py"));
        let opts = config.options();
        assert!(opts.contains(&"--num-l2caches=4".to_string()));
        assert!(opts.contains(&"--l3_size=12MB".to_string()));
        assert_eq!(opts.last().unwrap(), "--maxinsts=1000000");

        assert!(serde_yaml::from_str::<SimConfig>("l4_size: 8MB\n").is_err());
    }

    #[test]
    fn test_plan_command() {
        let config = SimConfig {
            out_dir: PathBuf::from("/out"),
            ..Default::default()
        };
        let mode = LaunchMode::Command {
            cmd: PathBuf::from("tests/bin/hash_table"),
            options: Some("1024 8".into()),
        };
        let launch =
            Launch::plan(&config, &mode, &Resolver::new("/spec"), date(), "fp").unwrap();
        assert_eq!(launch.out_dir, Path::new("/out/hash_table-2015-03-07"));
        assert_eq!(
            &launch.args[..3],
            ["-d", "/out/hash_table-2015-03-07", "gem5-stable/configs/thnvm-se.py"]
        );
        assert_eq!(
            &launch.args[launch.args.len() - 4..],
            ["-c", "tests/bin/hash_table", "-o", "1024 8"]
        );
        assert!(launch.resolution.is_none());
        assert!(launch.to_string().ends_with("-c tests/bin/hash_table -o '1024 8'"));
    }

    #[test]
    fn test_plan_benchmark() {
        let config = SimConfig {
            out_dir: PathBuf::from("/out"),
            ..Default::default()
        };
        let resolver = Resolver::new("/spec").set_scratch_dir("/tmp");
        let mode = LaunchMode::Benchmark {
            id: "998.specrand".into(),
            variant: RunVariant::Test,
            build: None,
        };
        let launch = Launch::plan(&config, &mode, &resolver, date(), "fp").unwrap();
        assert_eq!(launch.out_dir, Path::new("/out/998.specrand-2015-03-07"));
        assert_eq!(
            &launch.args[launch.args.len() - 5..],
            [
                "-c",
                "/spec/998.specrand/specrand",
                "-o",
                "324342 24239",
                "--output=/tmp/998.specrand.rand.24239.out.fp",
            ]
        );
        assert!(launch.resolution.is_some());

        let unknown = LaunchMode::Benchmark {
            id: "000.nothing".into(),
            variant: RunVariant::Test,
            build: None,
        };
        assert!(matches!(
            Launch::plan(&config, &unknown, &resolver, date(), "fp"),
            Err(LaunchError::Resolve(ResolveError::UnknownBenchmark { .. }))
        ));
    }

    #[test]
    fn test_check_mode() {
        let work = tempfile::tempdir().unwrap();
        let resolver = Resolver::new("/spec").set_work_dir(work.path());
        let check = |id: &str| LaunchMode::Check {
            id: id.into(),
            variant: RunVariant::Test,
            build: None,
        };

        let specrand = check("998.specrand");
        assert_eq!(specrand.alias(), "998.specrand");
        let r = specrand.resolve(&resolver, "check").unwrap().unwrap();
        assert_eq!(r.invocation.executable, Path::new("/spec/998.specrand/specrand"));
        assert!(matches!(
            Launch::plan(&SimConfig::default(), &specrand, &resolver, date(), "fp"),
            Err(LaunchError::CheckOnly { ref id }) if id == "998.specrand"
        ));

        // astar needs its staged inputs in the working directory
        assert!(matches!(
            check("473.astar").resolve(&resolver, "check"),
            Err(ResolveError::MissingStagedInput { .. })
        ));

        let command = LaunchMode::Command {
            cmd: PathBuf::from("/bin/true"),
            options: None,
        };
        assert!(command.resolve(&resolver, "check").unwrap().is_none());
    }
}
