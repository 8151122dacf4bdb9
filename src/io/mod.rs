use crate::error::{CiFinderError, Result};
use crate::search::REPORT_EXTENSION;
use std::fs;
use std::path::{Path, PathBuf};

pub fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| CiFinderError::from_io_error(e, Some(path.to_path_buf())))
}

pub fn read_bytes(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|e| CiFinderError::from_io_error(e, Some(path.to_path_buf())))
}

pub fn write_file(path: &Path, content: &str) -> Result<()> {
    write_bytes(path, content.as_bytes())
}

pub fn write_bytes(path: &Path, content: &[u8]) -> Result<()> {
    fs::write(path, content).map_err(|e| CiFinderError::from_io_error(e, Some(path.to_path_buf())))
}

pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)
            .map_err(|e| CiFinderError::from_io_error(e, Some(path.to_path_buf())))?;
    }
    Ok(())
}

pub fn file_exists(path: &Path) -> bool {
    path.exists() && path.is_file()
}

/// Where a downloaded report named `name` is saved: `<dir>/<name>.ste`.
///
/// Path separators in the name are replaced so the file stays in `dir`.
pub fn report_path(dir: &Path, name: &str) -> PathBuf {
    let file_name: String = name
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
        .collect();
    dir.join(format!("{file_name}{REPORT_EXTENSION}"))
}

/// Save a downloaded report, creating `dir` if needed.
pub fn write_report(dir: &Path, name: &str, content: &[u8]) -> Result<PathBuf> {
    ensure_dir(dir)?;
    let path = report_path(dir, name);
    write_bytes(&path, content)?;
    Ok(path)
}
