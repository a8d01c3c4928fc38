//! Compare the output of a run with the reference output of its input set.

use std::{fmt, path::Path};

use anyhow::{Context, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Comparison {
    Match {
        lines: usize,
    },
    /// First differing line (1-based). A side that ended early is `None`.
    Mismatch {
        line: usize,
        actual: Option<String>,
        expected: Option<String>,
    },
    MissingActual,
}

impl Comparison {
    pub fn is_match(&self) -> bool {
        matches!(self, Comparison::Match { .. })
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use ansi_term::Colour::{Green, Red};
        match self {
            Comparison::Match { lines } => {
                write!(f, "{} ({lines} lines)", Green.bold().paint("match"))
            }
            Comparison::Mismatch {
                line,
                actual,
                expected,
            } => {
                writeln!(f, "{} at line {line}", Red.bold().paint("mismatch"))?;
                writeln!(f, "  expected: {}", expected.as_deref().unwrap_or("<eof>"))?;
                write!(f, "    actual: {}", actual.as_deref().unwrap_or("<eof>"))
            }
            Comparison::MissingActual => write!(f, "{}", Red.bold().paint("no output")),
        }
    }
}

/// Compare two texts line by line, ignoring trailing whitespace.
pub fn compare_text(actual: &str, expected: &str) -> Comparison {
    let mut actual_lines = actual.lines().map(str::trim_end);
    let mut expected_lines = expected.lines().map(str::trim_end);
    let mut line = 0;
    loop {
        line += 1;
        match (actual_lines.next(), expected_lines.next()) {
            (None, None) => return Comparison::Match { lines: line - 1 },
            (a, e) if a == e => continue,
            (a, e) => {
                return Comparison::Mismatch {
                    line,
                    actual: a.map(str::to_string),
                    expected: e.map(str::to_string),
                }
            }
        }
    }
}

/// Compare an output file with its reference. A missing reference is an
/// error, a missing output is reported as [`Comparison::MissingActual`].
pub fn compare_files(actual: &Path, expected: &Path) -> Result<Comparison> {
    let expected_text = std::fs::read_to_string(expected)
        .with_context(|| format!("could not read reference output `{}`", expected.display()))?;
    if !actual.exists() {
        return Ok(Comparison::MissingActual);
    }
    let actual_text = std::fs::read_to_string(actual)
        .with_context(|| format!("could not read output `{}`", actual.display()))?;
    let cmp = compare_text(&actual_text, &expected_text);
    tracing::debug!("{} vs {}: {:?}", actual.display(), expected.display(), cmp);
    Ok(cmp)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compare_text() {
        assert_eq!(compare_text("a\nb\n", "a\nb"), Comparison::Match { lines: 2 });
        assert_eq!(compare_text("a  \nb", "a\nb\n"), Comparison::Match { lines: 2 });
        assert_eq!(compare_text("", ""), Comparison::Match { lines: 0 });
        assert_eq!(
            compare_text("a\nc\n", "a\nb\n"),
            Comparison::Mismatch {
                line: 2,
                actual: Some("c".into()),
                expected: Some("b".into())
            }
        );
        assert_eq!(
            compare_text("a\n", "a\nb\n"),
            Comparison::Mismatch {
                line: 2,
                actual: None,
                expected: Some("b".into())
            }
        );
    }

    #[test]
    fn test_compare_files() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let expected = dir.path().join("rand.24239.out");
        std::fs::write(&expected, "1\n2\n")?;

        let actual = dir.path().join("actual");
        assert_eq!(compare_files(&actual, &expected)?, Comparison::MissingActual);
        std::fs::write(&actual, "1\n2\n")?;
        assert!(compare_files(&actual, &expected)?.is_match());

        assert!(compare_files(&actual, &dir.path().join("nope")).is_err());
        Ok(())
    }
}
