//! File output helpers.

use std::io;
use std::path::{Path, PathBuf};

/// Returns the sibling temporary path used while writing `path`.
fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Writes `contents` to `path` through a sibling `.tmp` file and a rename.
///
/// Readers of `path` see either the old file or the complete new one. On
/// failure the temporary file is removed and `path` is left untouched.
///
/// # Errors
///
/// Returns the I/O error of the write or the rename.
pub fn write_atomic(path: &Path, contents: impl AsRef<[u8]>) -> io::Result<()> {
    let tmp_path = temp_path(path);
    let result = std::fs::write(&tmp_path, contents).and_then(|()| std::fs::rename(&tmp_path, path));
    if result.is_err() {
        let _ = std::fs::remove_file(&tmp_path);
    }
    result
}
