//! Error types for tide
//!
//! 모든 에러를 중앙에서 관리

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// tide 에러 타입
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // 설정 관련
    // ========================================================================
    #[error("Configuration error: {0}")]
    Config(String),

    /// required 소스의 locator를 해석할 수 없음 (치명적)
    #[error("Cannot resolve command source '{locator}' of plugin '{plugin}'")]
    SourceUnresolved { plugin: String, locator: String },

    // ========================================================================
    // 플러그인 / 모듈 관련
    // ========================================================================
    #[error("Invalid command module '{module}': {message}")]
    Module { module: String, message: String },

    #[error("Invalid plugin manifest: {0}")]
    Manifest(String),

    // ========================================================================
    // 실행 관련
    // ========================================================================
    #[error("No such command '{0}'")]
    CommandNotFound(String),

    #[error("Command group '{0}' does not exist")]
    GroupNotFound(String),

    #[error("Command execution failed: {command} - {message}")]
    Execution { command: String, message: String },

    // ========================================================================
    // 일반
    // ========================================================================
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // ========================================================================
    // 외부 에러 변환
    // ========================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// 프로세스를 중단해야 하는 설정 오류인지 확인
    pub fn is_fatal_config(&self) -> bool {
        matches!(self, Error::Config(_) | Error::SourceUnresolved { .. })
    }

    /// 모듈 에러 생성 헬퍼
    pub fn module(module: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Module {
            module: module.into(),
            message: message.into(),
        }
    }

    /// 실행 에러 생성 헬퍼
    pub fn execution(command: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Execution {
            command: command.into(),
            message: message.into(),
        }
    }

    /// 해석 불가 소스 에러 생성 헬퍼
    pub fn source_unresolved(plugin: impl Into<String>, locator: impl Into<String>) -> Self {
        Error::SourceUnresolved {
            plugin: plugin.into(),
            locator: locator.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_config_classification() {
        assert!(Error::Config("bad".into()).is_fatal_config());
        assert!(Error::source_unresolved("tide", "tide.commands").is_fatal_config());
        assert!(!Error::CommandNotFound("lint".into()).is_fatal_config());
        assert!(!Error::module("commands.lint", "oops").is_fatal_config());
    }

    #[test]
    fn test_source_unresolved_message() {
        let err = Error::source_unresolved("tide-rust", "tide_rust.commands");
        assert_eq!(
            err.to_string(),
            "Cannot resolve command source 'tide_rust.commands' of plugin 'tide-rust'"
        );
    }
}
