//! Fixture enumeration over a conventional testdata tree

use depot_core::{Error, Result};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Filename convention tying a fixture to its expected artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Convention {
    expected_extension: String,
    replace_input_extension: bool,
}

impl Convention {
    /// Expected artifact is the input name with an extra extension:
    /// `conversion.java` pairs with `conversion.java.expected`
    pub fn append(extension: impl Into<String>) -> Self {
        Self {
            expected_extension: extension.into(),
            replace_input_extension: false,
        }
    }

    /// Expected artifact swaps the input extension, the convention of
    /// converter-style suites: `conversion.java` pairs with `conversion.kt`
    pub fn replace(extension: impl Into<String>) -> Self {
        Self {
            expected_extension: extension.into(),
            replace_input_extension: true,
        }
    }

    /// Resolves the expected artifact path for a fixture path
    pub fn expected_path(&self, fixture_path: &Path) -> PathBuf {
        if self.replace_input_extension {
            fixture_path.with_extension(&self.expected_extension)
        } else {
            let mut name = fixture_path
                .file_name()
                .map(OsString::from)
                .unwrap_or_default();
            name.push(".");
            name.push(&self.expected_extension);
            fixture_path.with_file_name(name)
        }
    }

    /// Whether `path` is an expected artifact rather than a fixture input
    pub fn is_expected(&self, path: &Path) -> bool {
        path.extension().and_then(|e| e.to_str()) == Some(self.expected_extension.as_str())
    }
}

impl Default for Convention {
    fn default() -> Self {
        Self::append("expected")
    }
}

/// One on-disk test input, grouped by category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fixture {
    /// Name of the category subdirectory, e.g. "field"
    pub category: String,
    /// File stem, e.g. "privateField"
    pub name: String,
    /// Full path to the input file
    pub path: PathBuf,
}

impl Fixture {
    /// Checks that the fixture file exists and is non-empty
    pub fn validate(&self) -> Result<()> {
        let path = self.path.display().to_string();
        let metadata = std::fs::metadata(&self.path)
            .map_err(|e| Error::fixture(path.clone(), format!("cannot stat fixture: {e}")))?;
        if !metadata.is_file() {
            return Err(Error::fixture(path, "fixture is not a regular file"));
        }
        if metadata.len() == 0 {
            return Err(Error::fixture(path, "fixture file is empty"));
        }
        Ok(())
    }

    /// Stable `category/name` form used in reports and logs
    pub fn display_name(&self) -> String {
        format!("{}/{}", self.category, self.name)
    }
}

/// Enumerates fixtures under `root`
///
/// Each immediate subdirectory of `root` is a category; every regular
/// file inside it that is not an expected artifact under `convention`
/// is one fixture. The result is sorted by category, then name.
pub fn enumerate(root: &Path, convention: &Convention) -> Result<Vec<Fixture>> {
    if !root.is_dir() {
        return Err(Error::fixture(
            root.display().to_string(),
            "fixture root is not a directory",
        ));
    }

    let mut fixtures = Vec::new();
    let mut categories: Vec<PathBuf> = std::fs::read_dir(root)?
        .collect::<std::io::Result<Vec<_>>>()?
        .into_iter()
        .filter(|entry| entry.path().is_dir())
        .map(|entry| entry.path())
        .collect();
    categories.sort();

    for category_dir in categories {
        let category = category_dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        for entry in WalkDir::new(&category_dir).min_depth(1).sort_by_file_name() {
            let entry = entry.map_err(|e| {
                Error::fixture(
                    category_dir.display().to_string(),
                    format!("failed to walk category: {e}"),
                )
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.into_path();
            if convention.is_expected(&path) {
                continue;
            }
            let name = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            fixtures.push(Fixture {
                category: category.clone(),
                name,
                path,
            });
        }
    }

    fixtures.sort_by(|a, b| (&a.category, &a.name).cmp(&(&b.category, &b.name)));
    Ok(fixtures)
}
