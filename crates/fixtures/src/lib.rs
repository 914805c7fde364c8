//! Fixture-driven golden-test harness
//!
//! A fixture is an on-disk input file paired by filename convention with
//! an expected artifact. Fixtures live in a conventional tree: each
//! immediate subdirectory of the fixture root is a category, each file
//! inside it is one test case.
//!
//! Instead of one generated test method per fixture, the harness drives
//! every enumerated `(category, name, path)` triple through a single
//! dispatch loop: load the input, apply a caller-supplied transform,
//! compare the output against the expected artifact.
//!
//! ```no_run
//! use depot_fixtures::FixtureHarness;
//!
//! # fn main() -> depot_core::Result<()> {
//! let harness = FixtureHarness::new("testdata");
//! let report = harness.run_all(|input| Ok(input.to_uppercase()))?;
//! assert!(report.is_success());
//! # Ok(())
//! # }
//! ```

mod fixture;
mod harness;

pub use fixture::{enumerate, Convention, Fixture};
pub use harness::{FixtureHarness, RunReport, UpdateMode};
