//! Static registry of SPEC CPU2006 benchmarks.
//!
//! Every benchmark is described by a declarative [`BenchmarkEntry`]: which
//! executable to run and, for each supported [`RunVariant`], how to build its
//! command line and where its outputs go. The table itself is generated by
//! the `define_benchmarks!` macro.

use std::{collections::HashMap, fmt, str::FromStr, sync::OnceLock};

#[macro_use]
mod macros;
mod table;

/// Input-size class of a benchmark run. Selects the `data/<variant>`
/// subtree of the benchmark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RunVariant {
    Test,
    Train,
    Ref,
}

impl RunVariant {
    pub const ALL: [RunVariant; 3] = [RunVariant::Test, RunVariant::Train, RunVariant::Ref];

    /// Name of the data subdirectory, which is also the name on the command
    /// line.
    pub fn as_str(self) -> &'static str {
        match self {
            RunVariant::Test => "test",
            RunVariant::Train => "train",
            RunVariant::Ref => "ref",
        }
    }
}

impl fmt::Display for RunVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid run variant `{0}`, expected one of: test, train, ref")]
pub struct ParseVariantError(String);

impl FromStr for RunVariant {
    type Err = ParseVariantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "test" => Ok(RunVariant::Test),
            "train" => Ok(RunVariant::Train),
            "ref" => Ok(RunVariant::Ref),
            _ => Err(ParseVariantError(s.to_string())),
        }
    }
}

/// One element of an argument template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arg {
    /// Passed verbatim.
    Lit(&'static str),
    /// A file under `data/<variant>/input`, passed as a full path.
    Input(&'static str),
    /// A file under `data/all/input`, shared by every variant.
    Common(&'static str),
    /// A file staged into the working directory, passed by its bare name.
    Staged(&'static str),
}

/// Where the output compared against the reference ends up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Output {
    /// Standard output is redirected to a scratch file with this name,
    /// suffixed with the run fingerprint.
    Stdout(&'static str),
    /// The tool itself writes a file with this name into the working
    /// directory.
    WorkDir(&'static str),
}

/// How a benchmark runs under one [`RunVariant`].
#[derive(Debug, Clone, Copy)]
pub struct VariantSpec {
    pub args: &'static [Arg],
    /// File under `data/<variant>/input` fed to standard input.
    pub stdin: Option<&'static str>,
    /// Files that must be present in the working directory.
    pub staged: &'static [&'static str],
    pub output: Output,
    /// File under `data/<variant>/output` holding the reference output.
    pub expected: &'static str,
}

#[derive(Debug, Clone, Copy)]
pub struct BenchmarkEntry {
    pub id: &'static str,
    /// File name of the executable, relative to the benchmark directory or
    /// to its build directory.
    pub executable: &'static str,
    pub variants: &'static [(RunVariant, VariantSpec)],
}

impl BenchmarkEntry {
    pub fn variant(&self, variant: RunVariant) -> Option<&'static VariantSpec> {
        self.variants
            .iter()
            .find(|(v, _)| *v == variant)
            .map(|(_, spec)| spec)
    }

    pub fn supported_variants(&self) -> impl Iterator<Item = RunVariant> + '_ {
        self.variants.iter().map(|(v, _)| *v)
    }
}

fn index() -> &'static HashMap<&'static str, &'static BenchmarkEntry> {
    static INDEX: OnceLock<HashMap<&'static str, &'static BenchmarkEntry>> = OnceLock::new();
    INDEX.get_or_init(|| table::ENTRIES.iter().map(|e| (e.id, e)).collect())
}

/// Find a benchmark by its full id, e.g. `462.libquantum`.
pub fn lookup(id: &str) -> Option<&'static BenchmarkEntry> {
    index().get(id).copied()
}

/// All registered benchmarks in table order.
pub fn entries() -> &'static [BenchmarkEntry] {
    table::ENTRIES
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_unique() {
        assert_eq!(index().len(), entries().len());
    }

    #[test]
    fn test_variant_parse() {
        for v in RunVariant::ALL {
            assert_eq!(v.as_str().parse::<RunVariant>(), Ok(v));
        }
        assert!("reference".parse::<RunVariant>().is_err());
    }

    #[test]
    fn test_lookup() {
        let quantum = lookup("462.libquantum").unwrap();
        assert_eq!(quantum.executable, "libquantum");
        assert_eq!(
            quantum.variant(RunVariant::Test).unwrap().args,
            &[Arg::Lit("33"), Arg::Lit("5")]
        );
        assert_eq!(
            quantum.variant(RunVariant::Ref).unwrap().args,
            &[Arg::Lit("1397"), Arg::Lit("8")]
        );
        assert!(quantum.variant(RunVariant::Train).is_none());
        assert!(lookup("libquantum").is_none());
    }

    #[test]
    fn test_entries_well_formed() {
        for entry in entries() {
            assert!(!entry.executable.is_empty(), "{}", entry.id);
            assert!(!entry.variants.is_empty(), "{}", entry.id);
            for (variant, spec) in entry.variants {
                assert!(!spec.expected.is_empty(), "{} {}", entry.id, variant);
                // staged arguments must be covered by the staged file list
                for arg in spec.args {
                    if let Arg::Staged(name) = arg {
                        assert!(spec.staged.contains(name), "{} {}", entry.id, name);
                    }
                }
            }
        }
    }
}
