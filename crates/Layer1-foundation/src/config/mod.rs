//! # Configuration
//!
//! `tide.toml` / `.tiderc` 설정 모델과 계층형 로더
//!
//! ## 설정 우선순위 (낮은 → 높은)
//!
//! 1. `~/.tiderc`
//! 2. `<project>/tide.toml`
//! 3. `<project>/.tiderc`

mod loader;
mod types;

pub use loader::{load_config_from_file, merge_configs, ConfigLoader};
pub use types::{
    CommandGroups, PluginConfig, PluginTable, ProjectConfig, CONFIG_FILE_NAME,
    DEFAULT_LOCAL_FOLDER, RC_FILE_NAME,
};
