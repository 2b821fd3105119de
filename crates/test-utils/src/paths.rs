//! Path utilities for locating optional test data files.
//!
//! Real datasets are large and never committed; tests that want one look in a
//! few conventional places and skip when nothing is found.

use std::path::PathBuf;

/// Returns the workspace root directory.
///
/// Determined by walking up from this crate's manifest directory.
pub fn workspace_root() -> PathBuf {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    PathBuf::from(manifest_dir)
        .parent() // crates/
        .and_then(|p| p.parent()) // workspace root
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from(manifest_dir))
}

/// Searches for a test file in multiple locations.
///
/// This function checks the following locations in order:
/// 1. Environment variable `TEST_DATA_DIR` (if set)
/// 2. `crates/netcdf-parser/testdata/`
/// 3. `crates/grid-query/testdata/`
/// 4. `testdata/` at the workspace root
/// 5. `public/` at the workspace root (where the service looks by default)
pub fn find_test_file(name: &str) -> Option<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(test_data_dir) = std::env::var("TEST_DATA_DIR") {
        candidates.push(PathBuf::from(test_data_dir).join(name));
    }

    let root = workspace_root();
    candidates.extend([
        root.join("crates/netcdf-parser/testdata").join(name),
        root.join("crates/grid-query/testdata").join(name),
        root.join("testdata").join(name),
        root.join("public").join(name),
    ]);

    candidates.into_iter().find(|path| path.exists())
}
