//! Dispatcher - 명령어 이름을 레지스트리 명령어로 연결
//!
//! 레지스트리는 처음 필요할 때 한 번만 빌드하고 프로세스 동안 재사용합니다.

use std::cell::OnceCell;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tide_core::{standard_catalog, CommandContext, CommandRegistry, ModuleCatalog, SitePackages};
use tide_foundation::{ConfigLoader, Error, ProjectConfig, Result, CONFIG_FILE_NAME, RC_FILE_NAME};
use tracing::debug;

/// 현재 디렉토리에서 위로 올라가며 프로젝트 루트 찾기
///
/// `tide.toml` 또는 `.tiderc`가 있는 첫 디렉토리. 없으면 시작 디렉토리.
pub fn find_project_root(start: &Path) -> PathBuf {
    let mut current = start.to_path_buf();

    loop {
        if current.join(CONFIG_FILE_NAME).is_file() || current.join(RC_FILE_NAME).is_file() {
            return current;
        }

        if !current.pop() {
            return start.to_path_buf();
        }
    }
}

/// 명령어 디스패처
pub struct Dispatcher {
    project_root: PathBuf,
    config: ProjectConfig,
    site: SitePackages,
    catalog: ModuleCatalog,
    registry: OnceCell<CommandRegistry>,
}

impl Dispatcher {
    /// 프로젝트 설정을 읽어서 생성
    pub fn load(project_root: PathBuf) -> Result<Self> {
        let config = ConfigLoader::new(&project_root).load_all()?;
        let site = SitePackages::new(&project_root);
        Ok(Self::with_parts(project_root, config, site))
    }

    /// 구성 요소를 직접 지정해서 생성
    pub fn with_parts(project_root: PathBuf, config: ProjectConfig, site: SitePackages) -> Self {
        Self {
            project_root,
            config,
            site,
            catalog: standard_catalog(),
            registry: OnceCell::new(),
        }
    }

    /// 레지스트리 (첫 호출에서 빌드)
    pub fn registry(&self) -> Result<&CommandRegistry> {
        if let Some(registry) = self.registry.get() {
            return Ok(registry);
        }

        let registry = CommandRegistry::build(
            &self.config,
            &self.project_root,
            &self.site,
            &self.catalog,
        )?;
        Ok(self.registry.get_or_init(|| registry))
    }

    /// 이름으로 명령어 실행, 종료 코드 반환
    pub fn dispatch(&self, name: &str, args: &[String]) -> Result<i32> {
        let registry = self.registry()?;
        let command = registry
            .get(name)
            .ok_or_else(|| Error::CommandNotFound(name.to_string()))?;

        debug!(
            "Dispatching '{}' from plugin '{}' with {} args",
            name,
            command.source_plugin_name(),
            args.len()
        );

        let ctx = CommandContext::new(
            &self.project_root,
            &self.config,
            registry,
            command.source_plugin_name(),
        );
        command.invoke(&ctx, args)
    }

    /// 사용 가능한 명령어 목록
    ///
    /// `verbose`이면 숨겨진 명령어와 소스 목록도 포함합니다.
    pub fn help_text(&self, verbose: bool) -> Result<String> {
        let registry = self.registry()?;
        let mut out = String::new();

        let _ = writeln!(out, "Available commands:");
        for command in registry.visible() {
            match command.help() {
                Some(help) => {
                    let _ = writeln!(out, "  {:<20} {}", command.name(), help);
                }
                None => {
                    let _ = writeln!(out, "  {}", command.name());
                }
            }
        }

        if verbose {
            let hidden = registry.hidden();
            if !hidden.is_empty() {
                let _ = writeln!(out, "\nHidden commands:");
                for command in hidden {
                    let _ = writeln!(out, "  {:<20} [{}]", command.name(), command.source_plugin_name());
                }
            }

            let _ = writeln!(out, "\nCommand sources (lowest priority first):");
            for source in registry.sources() {
                let _ = writeln!(out, "  {:<20} {}", source.plugin_name, source.locator);
            }
        }

        Ok(out)
    }
}
