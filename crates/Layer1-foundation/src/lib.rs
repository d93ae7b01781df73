//! # tide-foundation
//!
//! Foundation layer for tide:
//! - Error: 중앙 에러 타입 (설정 오류 / 모듈 오류 / 실행 오류)
//! - Config: `tide.toml` 설정 모델 + 계층형 로더

pub mod config;
pub mod error;

// ============================================================================
// Error
// ============================================================================
pub use error::{Error, Result};

// ============================================================================
// Config (설정)
// ============================================================================
pub use config::{
    load_config_from_file, merge_configs, CommandGroups, ConfigLoader, PluginConfig, PluginTable,
    ProjectConfig, CONFIG_FILE_NAME, DEFAULT_LOCAL_FOLDER, RC_FILE_NAME,
};
