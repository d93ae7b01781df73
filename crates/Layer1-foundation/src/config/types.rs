//! Config Types - `tide.toml` 구조 정의

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::PathBuf;

/// 프로젝트 설정 파일명
pub const CONFIG_FILE_NAME: &str = "tide.toml";

/// rc 파일명 (홈 디렉토리 / 프로젝트 루트)
pub const RC_FILE_NAME: &str = ".tiderc";

/// 기본 로컬 명령어 폴더
pub const DEFAULT_LOCAL_FOLDER: &str = "commands";

/// 그룹 이름 → 명령어 이름 목록
pub type CommandGroups = BTreeMap<String, Vec<String>>;

// ============================================================================
// PluginConfig - 플러그인별 필터링 설정
// ============================================================================

/// 플러그인별 설정
///
/// 알 수 없는 키는 `extra`에 보존되며 검증하지 않습니다.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PluginConfig {
    /// 보이게 할 명령어 (비어 있으면 전체)
    #[serde(default)]
    pub enable_commands: BTreeSet<String>,

    /// 숨길 명령어 (항상 enable 집합에서 제외)
    #[serde(default)]
    pub disable_commands: BTreeSet<String>,

    /// 명령어 그룹
    #[serde(default)]
    pub command_groups: CommandGroups,

    /// 플러그인 고유 설정
    #[serde(flatten)]
    pub extra: BTreeMap<String, toml::Value>,
}

impl PluginConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// 빌더 패턴: enable 목록 설정
    pub fn with_enabled<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.enable_commands = names.into_iter().map(Into::into).collect();
        self
    }

    /// 빌더 패턴: disable 목록 설정
    pub fn with_disabled<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.disable_commands = names.into_iter().map(Into::into).collect();
        self
    }

    /// 빌더 패턴: 명령어 그룹 추가
    pub fn with_group<I, S>(mut self, group: impl Into<String>, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.command_groups
            .insert(group.into(), names.into_iter().map(Into::into).collect());
        self
    }

    /// 명령어가 disable 목록에 있는지
    pub fn is_disabled(&self, name: &str) -> bool {
        self.disable_commands.contains(name)
    }
}

// ============================================================================
// PluginTable - 순서를 보존하는 플러그인 맵
// ============================================================================

/// 플러그인 이름 → 설정 (설정 파일에 적힌 순서 보존)
///
/// 순서가 곧 플러그인 우선순위입니다 (뒤쪽이 높음).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PluginTable {
    entries: Vec<(String, PluginConfig)>,
}

impl PluginTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// 설정 추가 (같은 이름이 있으면 위치를 유지한 채 교체)
    pub fn insert(&mut self, name: impl Into<String>, config: PluginConfig) {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = config,
            None => self.entries.push((name, config)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&PluginConfig> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, config)| config)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PluginConfig)> {
        self.entries.iter().map(|(n, c)| (n.as_str(), c))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 다른 테이블 병합 (later 우선, 기존 순서 유지)
    pub fn merge(&mut self, later: PluginTable) {
        for (name, config) in later.entries {
            self.insert(name, config);
        }
    }
}

impl<S: Into<String>> FromIterator<(S, PluginConfig)> for PluginTable {
    fn from_iter<I: IntoIterator<Item = (S, PluginConfig)>>(iter: I) -> Self {
        let mut table = PluginTable::new();
        for (name, config) in iter {
            table.insert(name, config);
        }
        table
    }
}

impl Serialize for PluginTable {
    fn serialize<Ser: Serializer>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, config) in &self.entries {
            map.serialize_entry(name, config)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for PluginTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PluginTableVisitor;

        impl<'de> Visitor<'de> for PluginTableVisitor {
            type Value = PluginTable;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a table of plugin name to plugin config")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut table = PluginTable::new();
                while let Some((name, config)) = access.next_entry::<String, PluginConfig>()? {
                    table.insert(name, config);
                }
                Ok(table)
            }
        }

        deserializer.deserialize_map(PluginTableVisitor)
    }
}

// ============================================================================
// ProjectConfig - 통합 설정
// ============================================================================

/// `tide.toml` / `.tiderc` 설정
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// 로컬 명령어 폴더 (낮은 → 높은 우선순위)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_command_folders: Option<Vec<PathBuf>>,

    /// 프로젝트 레벨 명령어 그룹 (플러그인 그룹보다 우선)
    #[serde(default)]
    pub command_groups: CommandGroups,

    /// 플러그인 설정 (순서 = 우선순위)
    #[serde(default)]
    pub plugins: PluginTable,

    /// 알 수 없는 최상위 키
    #[serde(flatten)]
    pub extra: BTreeMap<String, toml::Value>,
}

impl ProjectConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// 로컬 명령어 폴더 목록 (설정 없으면 `commands`)
    pub fn local_folders(&self) -> Vec<PathBuf> {
        self.local_command_folders
            .clone()
            .unwrap_or_else(|| vec![PathBuf::from(DEFAULT_LOCAL_FOLDER)])
    }

    /// 플러그인 설정 조회 (없으면 기본값)
    pub fn plugin_config(&self, plugin_name: &str) -> PluginConfig {
        self.plugins.get(plugin_name).cloned().unwrap_or_default()
    }

    /// 플러그인 그룹 위에 프로젝트 그룹을 덮어쓴 결과
    pub fn command_groups_for(&self, plugin_name: &str) -> CommandGroups {
        let mut groups = self
            .plugins
            .get(plugin_name)
            .map(|c| c.command_groups.clone())
            .unwrap_or_default();
        groups.extend(self.command_groups.clone());
        groups
    }
}

// ============================================================================
// 테스트
// ============================================================================
