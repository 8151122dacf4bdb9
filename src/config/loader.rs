use std::fs;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::core::CiFinderConfig;
use crate::error::{CiFinderError, ErrorCode, Result};

pub const CONFIG_FILE_NAME: &str = ".cifinder.toml";

/// Overrides `[backend] url`.
pub const BACKEND_URL_ENV: &str = "CIFINDER_BACKEND_URL";

const MAX_TRAVERSAL_DEPTH: usize = 10;

/// Pure function to read config file contents
pub(crate) fn read_config_file(path: &Path) -> std::result::Result<String, std::io::Error> {
    let file = fs::File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut contents = String::new();
    reader.read_to_string(&mut contents)?;
    Ok(contents)
}

/// Pure function to parse config from a TOML string
pub fn parse_config(contents: &str) -> std::result::Result<CiFinderConfig, String> {
    toml::from_str::<CiFinderConfig>(contents)
        .map_err(|e| format!("Failed to parse {}: {}", CONFIG_FILE_NAME, e))
}

/// Try loading config from a specific path, warning on anything but a
/// missing file
pub(crate) fn try_load_config_from_path(config_path: &Path) -> Option<CiFinderConfig> {
    let contents = match read_config_file(config_path) {
        Ok(contents) => contents,
        Err(e) => {
            handle_read_error(config_path, &e);
            return None;
        }
    };

    match parse_config(&contents) {
        Ok(config) => {
            debug!("Loaded config from {}", config_path.display());
            Some(config)
        }
        Err(e) => {
            warn!("{}. Using defaults.", e);
            None
        }
    }
}

fn handle_read_error(config_path: &Path, error: &std::io::Error) {
    if error.kind() != std::io::ErrorKind::NotFound {
        warn!(
            "Failed to read config file {}: {}",
            config_path.display(),
            error
        );
    }
}

/// Pure function to generate directory ancestors up to a depth limit
pub fn directory_ancestors(start: PathBuf, max_depth: usize) -> impl Iterator<Item = PathBuf> {
    std::iter::successors(Some(start), |dir| {
        let mut parent = dir.clone();
        if parent.pop() {
            Some(parent)
        } else {
            None
        }
    })
    .take(max_depth)
}

/// Search `start` and its ancestors for `.cifinder.toml`.
pub fn discover_config(start: PathBuf) -> CiFinderConfig {
    directory_ancestors(start, MAX_TRAVERSAL_DEPTH)
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find_map(|path| try_load_config_from_path(&path))
        .unwrap_or_else(|| {
            debug!(
                "No config found after checking {} directories. Using default config.",
                MAX_TRAVERSAL_DEPTH
            );
            CiFinderConfig::default()
        })
}

pub fn load_config() -> CiFinderConfig {
    match std::env::current_dir() {
        Ok(dir) => discover_config(dir),
        Err(e) => {
            warn!("Failed to get current directory: {}. Using default config.", e);
            CiFinderConfig::default()
        }
    }
}

/// Load an explicitly named config file. Unlike discovery, any failure is
/// an error.
pub fn load_config_from(path: &Path) -> Result<CiFinderConfig> {
    let contents = read_config_file(path)
        .map_err(|e| CiFinderError::from_io_error(e, Some(path.to_path_buf())))?;
    parse_config(&contents).map_err(|message| {
        CiFinderError::config_with_code(ErrorCode::CONFIG_PARSE, message, Some(path.to_path_buf()))
    })
}

/// Apply a backend URL given by `--backend` or `CIFINDER_BACKEND_URL`.
/// Blank values are ignored.
pub fn apply_backend_override(
    mut config: CiFinderConfig,
    backend_url: Option<String>,
) -> CiFinderConfig {
    if let Some(url) = backend_url.filter(|u| !u.trim().is_empty()) {
        debug!(%url, "backend url overridden");
        config.backend.url = url;
    }
    config
}
