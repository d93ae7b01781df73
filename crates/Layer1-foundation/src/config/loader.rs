//! Configuration Loader
//!
//! ## 검색 우선순위
//!
//! 1. User-level: `~/.tiderc`
//! 2. Project-level: `<project>/tide.toml`
//! 3. Project rc: `<project>/.tiderc`
//!
//! 각 레벨의 설정이 이전 레벨을 오버라이드합니다.

use super::types::{ProjectConfig, CONFIG_FILE_NAME, RC_FILE_NAME};
use crate::{Error, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

// ============================================================================
// ConfigLoader - 설정 로더
// ============================================================================

/// 설정 로더
pub struct ConfigLoader {
    /// 검색 경로 (우선순위 오름차순)
    search_paths: Vec<ConfigPath>,
}

/// 설정 파일 경로 정보
#[derive(Debug, Clone)]
struct ConfigPath {
    path: PathBuf,
    /// 우선순위 (높을수록 우선)
    priority: u8,
    description: &'static str,
}

impl ConfigLoader {
    /// 새 로더 생성 (기본 검색 경로)
    pub fn new(project_root: &Path) -> Self {
        let mut paths = Vec::new();

        if let Some(home) = dirs::home_dir() {
            paths.push(ConfigPath {
                path: home.join(RC_FILE_NAME),
                priority: 10,
                description: "User rc",
            });
        }

        paths.push(ConfigPath {
            path: project_root.join(CONFIG_FILE_NAME),
            priority: 20,
            description: "Project config",
        });

        paths.push(ConfigPath {
            path: project_root.join(RC_FILE_NAME),
            priority: 30,
            description: "Project rc",
        });

        paths.sort_by_key(|p| p.priority);

        Self { search_paths: paths }
    }

    /// 커스텀 검색 경로로 생성 (앞쪽이 낮은 우선순위)
    pub fn with_paths(paths: Vec<PathBuf>) -> Self {
        let search_paths = paths
            .into_iter()
            .enumerate()
            .map(|(i, path)| ConfigPath {
                path,
                priority: u8::try_from(i).unwrap_or(u8::MAX),
                description: "Custom",
            })
            .collect();

        Self { search_paths }
    }

    /// 모든 경로에서 설정 로드하여 병합
    ///
    /// 파싱에 실패한 파일이 있으면 해당 파일을 가리키는 `Error::Config`를 반환합니다.
    pub fn load_all(&self) -> Result<ProjectConfig> {
        let mut merged = ProjectConfig::new();

        for config_path in &self.search_paths {
            if !config_path.path.is_file() {
                continue;
            }

            let config = load_config_from_file(&config_path.path)?;
            info!(
                "Loaded {} from: {}",
                config_path.description,
                config_path.path.display()
            );
            merged = merge_configs(merged, config);
        }

        Ok(merged)
    }

    /// 존재하는 설정 파일 목록
    pub fn existing_files(&self) -> Vec<PathBuf> {
        self.search_paths
            .iter()
            .filter(|p| p.path.is_file())
            .map(|p| p.path.clone())
            .collect()
    }
}

// ============================================================================
// 유틸리티 함수
// ============================================================================

/// 파일에서 설정 로드
pub fn load_config_from_file(path: &Path) -> Result<ProjectConfig> {
    let content = std::fs::read_to_string(path)?;

    let config: ProjectConfig = toml::from_str(&content).map_err(|e| {
        Error::Config(format!(
            "invalid config file '{}': {}",
            path.display(),
            e
        ))
    })?;

    debug!(
        "Loaded config from {}: {} plugins, {} command groups",
        path.display(),
        config.plugins.len(),
        config.command_groups.len()
    );

    Ok(config)
}

/// 두 설정 병합 (later가 earlier를 오버라이드)
pub fn merge_configs(earlier: ProjectConfig, later: ProjectConfig) -> ProjectConfig {
    ProjectConfig {
        // 폴더 목록: later 우선 (통째로 교체)
        local_command_folders: later.local_command_folders.or(earlier.local_command_folders),

        // 그룹: 키 단위 병합
        command_groups: {
            let mut merged = earlier.command_groups;
            merged.extend(later.command_groups);
            merged
        },

        // 플러그인: 키 단위 병합, 처음 등장한 순서 유지
        plugins: {
            let mut merged = earlier.plugins;
            merged.merge(later.plugins);
            merged
        },

        extra: {
            let mut merged = earlier.extra;
            merged.extend(later.extra);
            merged
        },
    }
}

// ============================================================================
// 테스트
// ============================================================================
