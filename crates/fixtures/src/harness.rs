//! Data-driven dispatch of fixture tests

use crate::fixture::{enumerate, Convention, Fixture};
use depot_core::{Error, Result};
use std::fs;
use std::path::PathBuf;
use tracing::{debug, error};

/// Whether a run verifies expected artifacts or rewrites them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UpdateMode {
    /// Compare transform output against the expected artifact
    #[default]
    Verify,
    /// Rewrite the expected artifact with the transform output
    Overwrite,
}

impl UpdateMode {
    /// Reads `DEPOT_UPDATE_EXPECTED`; any non-empty value other than `0`
    /// selects [`UpdateMode::Overwrite`]
    pub fn from_env() -> Self {
        match std::env::var("DEPOT_UPDATE_EXPECTED") {
            Ok(value) if !value.is_empty() && value != "0" => Self::Overwrite,
            _ => Self::Verify,
        }
    }
}

/// Outcome of a full harness run
#[derive(Debug, Default)]
pub struct RunReport {
    pub passed: usize,
    pub failed: Vec<(Fixture, Error)>,
}

impl RunReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn total(&self) -> usize {
        self.passed + self.failed.len()
    }
}

/// Dispatches fixtures through a caller-supplied transform
///
/// Each test runs independently and synchronously; there are no retries.
pub struct FixtureHarness {
    root: PathBuf,
    convention: Convention,
    update_mode: UpdateMode,
}

impl FixtureHarness {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            convention: Convention::default(),
            update_mode: UpdateMode::from_env(),
        }
    }

    pub fn with_convention(mut self, convention: Convention) -> Self {
        self.convention = convention;
        self
    }

    pub fn with_update_mode(mut self, update_mode: UpdateMode) -> Self {
        self.update_mode = update_mode;
        self
    }

    /// Enumerates the fixtures this harness would dispatch
    pub fn fixtures(&self) -> Result<Vec<Fixture>> {
        enumerate(&self.root, &self.convention)
    }

    /// Runs a single fixture through `transform`
    ///
    /// Fails if the fixture or its expected artifact cannot be read, if
    /// the transform errors, or if the output does not match the expected
    /// artifact. Trailing newlines are not significant in the comparison.
    pub fn run_test<F>(&self, fixture: &Fixture, transform: F) -> Result<()>
    where
        F: Fn(&str) -> Result<String>,
    {
        fixture.validate()?;
        let input = fs::read_to_string(&fixture.path).map_err(|e| {
            Error::fixture(
                fixture.path.display().to_string(),
                format!("cannot read fixture: {e}"),
            )
        })?;

        let actual = transform(&input)?;

        let expected_path = self.convention.expected_path(&fixture.path);
        if self.update_mode == UpdateMode::Overwrite {
            fs::write(&expected_path, &actual).map_err(|e| {
                Error::fixture(
                    expected_path.display().to_string(),
                    format!("cannot write expected artifact: {e}"),
                )
            })?;
            debug!("Updated expected artifact {}", expected_path.display());
            return Ok(());
        }

        let expected = fs::read_to_string(&expected_path).map_err(|e| {
            Error::fixture(
                expected_path.display().to_string(),
                format!("cannot read expected artifact: {e}"),
            )
        })?;

        if normalize(&actual) != normalize(&expected) {
            return Err(Error::mismatch(
                fixture.display_name(),
                render_diff(&expected, &actual),
            ));
        }
        Ok(())
    }

    /// Runs every enumerated fixture through `transform`
    ///
    /// Individual failures do not stop the run; they are collected into
    /// the returned [`RunReport`].
    pub fn run_all<F>(&self, transform: F) -> Result<RunReport>
    where
        F: Fn(&str) -> Result<String>,
    {
        let mut report = RunReport::default();
        for fixture in self.fixtures()? {
            match self.run_test(&fixture, &transform) {
                Ok(()) => {
                    debug!("{} passed", fixture.display_name());
                    report.passed += 1;
                }
                Err(e) => {
                    error!("{} failed: {e}", fixture.display_name());
                    report.failed.push((fixture, e));
                }
            }
        }
        Ok(report)
    }
}

fn normalize(text: &str) -> &str {
    text.trim_end_matches('\n')
}

/// Plain line-by-line rendering, enough to read a failure in test output
fn render_diff(expected: &str, actual: &str) -> String {
    let expected_lines: Vec<&str> = normalize(expected).lines().collect();
    let actual_lines: Vec<&str> = normalize(actual).lines().collect();
    let mut out = String::new();

    for i in 0..expected_lines.len().max(actual_lines.len()) {
        let expected_line = expected_lines.get(i);
        let actual_line = actual_lines.get(i);
        if expected_line == actual_line {
            if let Some(line) = expected_line {
                out.push_str(&format!("  {line}\n"));
            }
        } else {
            if let Some(line) = expected_line {
                out.push_str(&format!("- {line}\n"));
            }
            if let Some(line) = actual_line {
                out.push_str(&format!("+ {line}\n"));
            }
        }
    }
    out
}
