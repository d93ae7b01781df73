//! Command Source - 명령어 출처 정의

use std::fmt;
use std::path::PathBuf;
use tide_foundation::PluginConfig;

/// 코어 번들의 플러그인 이름
pub const CORE_PLUGIN_NAME: &str = "tide";

/// 코어 번들 패키지
pub const CORE_COMMAND_PACKAGE: &str = "tide.commands";

/// 로컬 명령어 폴더의 플러그인 이름
pub const LOCAL_PLUGIN_NAME: &str = "local";

/// 명령어 위치
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Locator {
    /// 모듈 카탈로그로 해석되는 패키지 (한 단계만 열거)
    Package(String),
    /// 설치된 패키지 루트 아래의 패키지 (그 패키지 안에서만 해석)
    Installed { root: PathBuf, package: String },
    /// 디렉토리 트리 (`mod.toml`이 있는 하위 디렉토리만 탐색)
    Folder(PathBuf),
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::Package(name) => write!(f, "{}", name),
            Locator::Installed { root, package } => write!(f, "{} ({})", package, root.display()),
            Locator::Folder(path) => write!(f, "{}", path.display()),
        }
    }
}

/// 명령어 출처 (코어 번들 / 설치된 플러그인 / 로컬 폴더)
#[derive(Debug, Clone, PartialEq)]
pub struct CommandSource {
    /// 플러그인 이름 (우선순위/설정 조회 키)
    pub plugin_name: String,

    /// 명령어 위치
    pub locator: Locator,

    /// locator를 해석하지 못하면 치명적 오류인지
    pub required: bool,

    /// 플러그인별 필터링 설정
    pub plugin_config: PluginConfig,

    /// 폐기 예정 위치면 대신 써야 할 이름
    pub replacement: Option<String>,
}

impl CommandSource {
    /// 패키지 소스 (기본 required)
    pub fn package(plugin_name: impl Into<String>, package: impl Into<String>) -> Self {
        Self {
            plugin_name: plugin_name.into(),
            locator: Locator::Package(package.into()),
            required: true,
            plugin_config: PluginConfig::default(),
            replacement: None,
        }
    }

    /// 설치된 플러그인 소스 (기본 required)
    ///
    /// `package`는 `root` 기준으로만 해석됩니다.
    pub fn installed(
        plugin_name: impl Into<String>,
        root: impl Into<PathBuf>,
        package: impl Into<String>,
    ) -> Self {
        Self {
            plugin_name: plugin_name.into(),
            locator: Locator::Installed {
                root: root.into(),
                package: package.into(),
            },
            required: true,
            plugin_config: PluginConfig::default(),
            replacement: None,
        }
    }

    /// 폴더 소스 (기본 optional)
    pub fn folder(plugin_name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            plugin_name: plugin_name.into(),
            locator: Locator::Folder(path.into()),
            required: false,
            plugin_config: PluginConfig::default(),
            replacement: None,
        }
    }

    /// 빌더 패턴: required 설정
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// 빌더 패턴: 플러그인 설정
    pub fn with_config(mut self, config: PluginConfig) -> Self {
        self.plugin_config = config;
        self
    }

    /// 빌더 패턴: 폐기 예정 위치로 표시
    pub fn deprecated_for(mut self, replacement: impl Into<String>) -> Self {
        self.replacement = Some(replacement.into());
        self
    }
}
