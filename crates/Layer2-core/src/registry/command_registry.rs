//! Command Registry - 명령어 병합/우선순위/가시성 엔진
//!
//! 소스를 우선순위 오름차순으로 처리합니다. 뒤쪽 소스가 같은 이름의 명령어를
//! 다시 발견하면 이전 항목은 (visible/hidden 어디에 있든) 제거되고
//! 뒤쪽 소스의 필터링 결과로 교체됩니다.
//!
//! 알 수 없는 enable/disable 항목 검사는 모든 소스를 로드한 뒤 플러그인 이름
//! 단위로 한 번 수행합니다. 같은 이름을 공유하는 소스(로컬 폴더들)는 발견한
//! 이름의 합집합으로 검사합니다.

use super::notice::{Directive, RegistryNotice};
use crate::command::Command;
use crate::plugin::{
    discover_plugin_sources, CommandLoader, CommandSource, ModuleCatalog, PackageIndex,
    CORE_COMMAND_PACKAGE, CORE_PLUGIN_NAME, LOCAL_PLUGIN_NAME,
};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use tide_foundation::{Error, PluginConfig, ProjectConfig, Result, DEFAULT_LOCAL_FOLDER};
use tracing::{debug, warn};

/// 예전 로컬 명령어 폴더 이름 (`commands`로 대체됨)
pub const LEGACY_LOCAL_FOLDER: &str = "tasks";

// ============================================================================
// CommandRegistry
// ============================================================================

/// 명령어 레지스트리
///
/// 한 번 빌드된 뒤에는 읽기 전용입니다.
#[derive(Debug, Default)]
pub struct CommandRegistry {
    visible: BTreeMap<String, Command>,
    hidden: BTreeMap<String, Command>,
    sources: Vec<CommandSource>,
    notices: Vec<RegistryNotice>,
}

impl CommandRegistry {
    /// 기본 소스 구성으로 빌드
    ///
    /// `[코어 번들] + [설정된 플러그인 (설정 순서)] + [로컬 폴더들]`
    pub fn build(
        config: &ProjectConfig,
        project_root: &Path,
        index: &dyn PackageIndex,
        catalog: &ModuleCatalog,
    ) -> Result<Self> {
        let sources = default_sources(config, project_root, index)?;
        Self::from_sources(sources, catalog)
    }

    /// 명시적 소스 목록으로 빌드 (앞쪽이 낮은 우선순위)
    pub fn from_sources(sources: Vec<CommandSource>, catalog: &ModuleCatalog) -> Result<Self> {
        let loader = CommandLoader::new(catalog);
        let mut registry = Self::default();
        let mut discovered: Vec<(&str, &PluginConfig, BTreeSet<String>)> = Vec::new();

        for source in &sources {
            if source.plugin_name.trim().is_empty() {
                return Err(Error::InvalidInput(format!(
                    "command source '{}' has an empty plugin name",
                    source.locator
                )));
            }

            let commands = loader.load(source)?;
            let names = commands.iter().map(|c| c.name().to_string());
            match discovered
                .iter_mut()
                .find(|(plugin, _, _)| *plugin == source.plugin_name)
            {
                Some((_, _, available)) => available.extend(names),
                None => discovered.push((
                    source.plugin_name.as_str(),
                    &source.plugin_config,
                    names.collect(),
                )),
            }

            registry.register_source(source, commands);
        }

        for (plugin, config, available) in &discovered {
            registry.check_directives(plugin, config, available);
        }

        debug!(
            "Command registry built: {} visible, {} hidden from {} sources",
            registry.visible.len(),
            registry.hidden.len(),
            sources.len()
        );

        registry.sources = sources;
        Ok(registry)
    }

    /// 설정에 적혀 있지만 발견되지 않은 명령어 보고
    fn check_directives(&mut self, plugin: &str, config: &PluginConfig, available: &BTreeSet<String>) {
        for (directive, names) in [
            (Directive::Enable, &config.enable_commands),
            (Directive::Disable, &config.disable_commands),
        ] {
            for name in names.iter().filter(|n| !available.contains(*n)) {
                let notice = RegistryNotice::UnknownDirective {
                    plugin: plugin.to_string(),
                    command: name.clone(),
                    directive,
                };
                warn!("{}", notice);
                self.notices.push(notice);
            }
        }
    }

    fn register_source(&mut self, source: &CommandSource, commands: Vec<Command>) {
        let config = &source.plugin_config;
        let available: BTreeSet<String> = commands.iter().map(|c| c.name().to_string()).collect();

        let disabled: BTreeSet<&String> = config.disable_commands.intersection(&available).collect();
        let enabled: BTreeSet<&String> = if config.enable_commands.is_empty() {
            available.iter().collect()
        } else {
            config.enable_commands.iter().collect()
        };

        for command in commands {
            let name = command.name().to_string();

            let previous = self
                .visible
                .remove(&name)
                .or_else(|| self.hidden.remove(&name));

            if let Some(previous) = previous {
                let notice = RegistryNotice::Override {
                    command: name.clone(),
                    plugin: source.plugin_name.clone(),
                    previous_plugin: previous.source_plugin_name().to_string(),
                };
                debug!("{}", notice);
                self.notices.push(notice);
            }

            if enabled.contains(&name) && !disabled.contains(&name) {
                self.visible.insert(name, command);
            } else {
                self.hidden.insert(name, command);
            }
        }
    }

    // ========================================================================
    // 조회
    // ========================================================================

    /// 보이는 명령어 이름 (정렬됨)
    pub fn visible_names(&self) -> Vec<&str> {
        self.visible.keys().map(String::as_str).collect()
    }

    /// 보이는 명령어 조회
    pub fn get(&self, name: &str) -> Option<&Command> {
        self.visible.get(name)
    }

    /// 보이는 명령어 (이름 순)
    pub fn visible(&self) -> impl Iterator<Item = &Command> {
        self.visible.values()
    }

    /// 숨겨진 명령어 (이름 순)
    pub fn hidden(&self) -> Vec<&Command> {
        self.hidden.values().collect()
    }

    /// 빌드에 사용된 소스 (우선순위 오름차순)
    pub fn sources(&self) -> &[CommandSource] {
        &self.sources
    }

    /// 빌드 중 기록된 알림
    pub fn notices(&self) -> &[RegistryNotice] {
        &self.notices
    }
}

/// 기본 소스 목록 구성
pub fn default_sources(
    config: &ProjectConfig,
    project_root: &Path,
    index: &dyn PackageIndex,
) -> Result<Vec<CommandSource>> {
    let mut sources = vec![CommandSource::package(CORE_PLUGIN_NAME, CORE_COMMAND_PACKAGE)
        .with_config(config.plugin_config(CORE_PLUGIN_NAME))];

    sources.extend(discover_plugin_sources(index, &config.plugins)?);

    let local_config = config.plugin_config(LOCAL_PLUGIN_NAME);
    let folders = config.local_folders();
    sources.extend(folders.iter().map(|folder| {
        CommandSource::folder(LOCAL_PLUGIN_NAME, project_root.join(folder))
            .with_config(local_config.clone())
    }));

    if !folders.iter().any(|f| f.as_os_str() == LEGACY_LOCAL_FOLDER) {
        sources.push(
            CommandSource::folder(LOCAL_PLUGIN_NAME, project_root.join(LEGACY_LOCAL_FOLDER))
                .with_config(local_config)
                .deprecated_for(DEFAULT_LOCAL_FOLDER),
        );
    }

    Ok(sources)
}

// ============================================================================
// 테스트
// ============================================================================
