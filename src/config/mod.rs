mod core;
mod loader;

pub use self::core::{
    BackendConfig, CiFinderConfig, DownloadConfig, SearchConfig, TrackerConfig,
    DEFAULT_BACKEND_URL, DEFAULT_CONFIG_TOML,
};
pub use self::loader::{
    apply_backend_override, directory_ancestors, discover_config, load_config, load_config_from,
    parse_config, BACKEND_URL_ENV, CONFIG_FILE_NAME,
};
