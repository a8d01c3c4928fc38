//! Tabular reports over gem5 `stats.txt` files.
//!
//! Every output directory given to the reporter holds one subdirectory per
//! benchmark run, each with its own `stats.txt`. The report has one row per
//! benchmark and, for each directory, one column per requested statistic.

use std::{
    collections::BTreeMap,
    fmt,
    fs::File,
    io::{self, BufRead, BufReader},
    path::{Path, PathBuf},
};

/// Name of the statistics dump gem5 writes into its output directory.
pub const STATS_FILE: &str = "stats.txt";

/// Values of the requested statistics in one stats file, kept as written.
pub type StatsRecord = BTreeMap<String, String>;

#[derive(Debug, thiserror::Error)]
pub enum StatsError {
    #[error("could not list directory `{}`", .path.display())]
    ListDir {
        path: PathBuf,
        #[source]
        err: io::Error,
    },
    #[error("could not read `{}`", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        err: io::Error,
    },
}

/// Pick the requested statistics out of a stats dump.
///
/// A line counts when it has at least two whitespace separated fields and
/// the first one is a requested name. The second field is the value, further
/// fields (descriptions, units) are ignored. If a name occurs more than once
/// (several dumps in one file) the last occurrence wins. Bytes that are not
/// valid UTF-8 are replaced, so a stray byte in a description is harmless.
pub fn parse_stats<R: BufRead>(reader: R, names: &[String]) -> io::Result<StatsRecord> {
    let mut record = StatsRecord::new();
    for line in reader.split(b'\n') {
        let line = line?;
        let line = String::from_utf8_lossy(&line);
        let mut fields = line.split_whitespace();
        if let (Some(name), Some(value)) = (fields.next(), fields.next()) {
            if names.iter().any(|n| n == name) {
                record.insert(name.to_string(), value.to_string());
            }
        }
    }
    Ok(record)
}

/// Read one stats file. A missing file yields `None`: the run may not have
/// finished, and the rest of the report is still useful.
pub fn read_stats_file(path: &Path, names: &[String]) -> Result<Option<StatsRecord>, StatsError> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            tracing::warn!("no stats in `{}`", path.display());
            return Ok(None);
        }
        Err(err) => {
            return Err(StatsError::Read {
                path: path.to_path_buf(),
                err,
            })
        }
    };
    parse_stats(BufReader::new(file), names)
        .map(Some)
        .map_err(|err| StatsError::Read {
            path: path.to_path_buf(),
            err,
        })
}

/// Column label of an output directory: its last path component, ignoring
/// trailing slashes.
pub fn dir_label(dir: &Path) -> String {
    dir.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| dir.to_string_lossy().into_owned())
}

/// Names of the immediate subdirectories of `dir`.
fn list_benchmarks(dir: &Path) -> Result<Vec<String>, StatsError> {
    let list_err = |err: io::Error| StatsError::ListDir {
        path: dir.to_path_buf(),
        err,
    };
    let mut names = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(list_err)? {
        let entry = entry.map_err(list_err)?;
        if entry.path().is_dir() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        } else {
            tracing::trace!("skip `{}`", entry.path().display());
        }
    }
    Ok(names)
}

/// Collected statistics of several output directories.
#[derive(Debug, Clone, Default)]
pub struct Report {
    labels: Vec<String>,
    stats: Vec<String>,
    /// benchmark -> one cell per directory, `None` if the benchmark did not
    /// run there
    rows: BTreeMap<String, Vec<Option<StatsRecord>>>,
}

impl Report {
    /// Read `<dir>/<benchmark>/stats.txt` for every benchmark subdirectory of
    /// every directory. Duplicate statistic names keep their first position.
    pub fn collect<P: AsRef<Path>>(dirs: &[P], stats: &[String]) -> Result<Self, StatsError> {
        let mut names: Vec<String> = Vec::with_capacity(stats.len());
        for stat in stats {
            if !names.contains(stat) {
                names.push(stat.clone());
            }
        }

        let mut rows: BTreeMap<String, Vec<Option<StatsRecord>>> = BTreeMap::new();
        for (i, dir) in dirs.iter().enumerate() {
            let dir = dir.as_ref();
            let benches = list_benchmarks(dir)?;
            tracing::debug!("{} benchmarks in `{}`", benches.len(), dir.display());
            for bench in benches {
                let record = read_stats_file(&dir.join(&bench).join(STATS_FILE), &names)?;
                rows.entry(bench).or_insert_with(|| vec![None; dirs.len()])[i] =
                    Some(record.unwrap_or_default());
            }
        }

        Ok(Self {
            labels: dirs.iter().map(|d| dir_label(d.as_ref())).collect(),
            stats: names,
            rows,
        })
    }

    pub fn benchmarks(&self) -> impl Iterator<Item = &str> {
        self.rows.keys().map(String::as_str)
    }

    /// Value of `stat` for `bench` in the `dir`-th directory.
    pub fn value(&self, bench: &str, dir: usize, stat: &str) -> Option<&str> {
        self.rows
            .get(bench)?
            .get(dir)?
            .as_ref()?
            .get(stat)
            .map(String::as_str)
    }
}

/// Tab separated table. Missing values are empty cells.
impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for label in &self.labels {
            write!(f, "\t{label}")?;
        }
        writeln!(f)?;

        for (bench, cells) in &self.rows {
            f.write_str(bench)?;
            for cell in cells {
                for stat in &self.stats {
                    match cell.as_ref().and_then(|record| record.get(stat)) {
                        Some(value) => write!(f, "\t{value}")?,
                        None => f.write_str("\t")?,
                    }
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Collect and render in one go.
pub fn report<P: AsRef<Path>>(dirs: &[P], stats: &[String]) -> Result<String, StatsError> {
    Ok(Report::collect(dirs, stats)?.to_string())
}
