//! Command Loader - 소스에서 명령어 추출
//!
//! ## 열거 방식
//!
//! - **Package**: `ModuleCatalog`가 패키지를 해석 (한 단계, 재귀 없음)
//! - **Installed**: 설치된 패키지 루트 아래 디렉토리 (한 단계, 다른 패키지는 보지 않음)
//! - **Folder**: 디렉토리 트리 탐색, `mod.toml`이 있는 하위 디렉토리만 내려감
//!
//! 추출 규칙: 현재 모듈에서 정의된 항목만, `_`로 시작하지 않는 항목만,
//! 이름이 있는 명령어만, 같은 모듈 그룹의 하위 명령어는 제외.

use super::module::{Artifact, CommandModule};
use super::source::{CommandSource, Locator};
use crate::command::Command;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tide_foundation::{Error, Result};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// 모듈 파일 확장자
pub const MODULE_SUFFIX: &str = ".toml";

/// 모듈 그룹 표시 파일
pub const INITIALIZER_FILE: &str = "mod.toml";

const INITIALIZER_STEM: &str = "mod";

// ============================================================================
// ModuleResolver - 패키지 해석
// ============================================================================

/// 패키지 이름을 모듈 목록으로 해석
pub trait ModuleResolver: Send + Sync {
    /// 디버깅용 이름
    fn name(&self) -> &str;

    /// 패키지의 모듈들. 이 resolver가 모르는 패키지면 `None`
    fn resolve(&self, package: &str) -> Result<Option<Vec<CommandModule>>>;
}

/// 순서가 있는 resolver 목록 (먼저 해석한 쪽이 사용됨)
#[derive(Default, Clone)]
pub struct ModuleCatalog {
    resolvers: Vec<Arc<dyn ModuleResolver>>,
}

impl ModuleCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// 빌더 패턴: resolver 추가
    pub fn with_resolver(mut self, resolver: Arc<dyn ModuleResolver>) -> Self {
        self.resolvers.push(resolver);
        self
    }

    pub fn add_resolver(&mut self, resolver: Arc<dyn ModuleResolver>) {
        self.resolvers.push(resolver);
    }

    pub fn resolve(&self, package: &str) -> Result<Option<Vec<CommandModule>>> {
        for resolver in &self.resolvers {
            if let Some(modules) = resolver.resolve(package)? {
                debug!(
                    "Resolved package '{}' via {} ({} modules)",
                    package,
                    resolver.name(),
                    modules.len()
                );
                return Ok(Some(modules));
            }
        }
        Ok(None)
    }
}

// ============================================================================
// CommandLoader
// ============================================================================

/// 소스 하나를 명령어 목록으로 변환
pub struct CommandLoader<'a> {
    catalog: &'a ModuleCatalog,
}

impl<'a> CommandLoader<'a> {
    pub fn new(catalog: &'a ModuleCatalog) -> Self {
        Self { catalog }
    }

    /// 소스의 모든 최상위 명령어 (발견 순서, 중복 제거 없음)
    ///
    /// 해석할 수 없는 locator는 `required`이면 `Error::SourceUnresolved`, 아니면 빈 목록.
    /// 모듈 파싱 오류는 그대로 전파됩니다.
    pub fn load(&self, source: &CommandSource) -> Result<Vec<Command>> {
        let modules = match &source.locator {
            Locator::Package(package) => self.catalog.resolve(package)?,
            Locator::Installed { root, package } => {
                load_flat_package(&package_dir(root, package), package)?
            }
            Locator::Folder(folder) => load_folder_tree(folder)?,
        };

        let Some(modules) = modules else {
            if source.required {
                return Err(Error::source_unresolved(
                    &source.plugin_name,
                    source.locator.to_string(),
                ));
            }
            debug!(
                "Optional command source '{}' of plugin '{}' not found, skipping",
                source.locator, source.plugin_name
            );
            return Ok(Vec::new());
        };

        let commands: Vec<Command> = modules
            .iter()
            .flat_map(extract_commands)
            .map(|c| c.with_source(&source.plugin_name))
            .collect();

        debug!(
            "Loaded {} commands from '{}' ({})",
            commands.len(),
            source.plugin_name,
            source.locator
        );

        if let Some(replacement) = &source.replacement {
            if !commands.is_empty() {
                warn!(
                    "Command location '{}' is deprecated. Please use '{}' instead.",
                    source.locator, replacement
                );
            }
        }

        Ok(commands)
    }
}

/// 모듈에서 최상위 명령어 추출
pub fn extract_commands(module: &CommandModule) -> Vec<Command> {
    let own_commands = || {
        module.items.iter().filter_map(|item| match &item.artifact {
            Artifact::Command(c) if item.origin == module.path => Some((item, c)),
            _ => None,
        })
    };

    let nested: Vec<&Command> = own_commands()
        .flat_map(|(_, c)| c.children().iter())
        .collect();

    own_commands()
        .filter(|(item, _)| !item.attr.starts_with('_'))
        .filter(|(_, c)| !c.name().is_empty())
        .filter(|(_, c)| !nested.iter().any(|n| n.same_definition(c)))
        .map(|(_, c)| c.clone())
        .collect()
}

// ============================================================================
// 파일 시스템 열거
// ============================================================================

fn is_module_file(file_name: &str) -> bool {
    file_name.ends_with(MODULE_SUFFIX) && !file_name.starts_with('_')
}

fn module_stem(file_name: &str) -> &str {
    file_name.strip_suffix(MODULE_SUFFIX).unwrap_or(file_name)
}

/// `tide_rust.commands` → `<root>/tide_rust/commands`
pub fn package_dir(root: &Path, package: &str) -> PathBuf {
    package.split('.').fold(root.to_path_buf(), |dir, part| dir.join(part))
}

/// 평면 패키지 디렉토리 로드 (직속 파일만, 파일 이름 순)
///
/// 디렉토리가 없으면 `None`.
pub fn load_flat_package(dir: &Path, package: &str) -> Result<Option<Vec<CommandModule>>> {
    if !dir.is_dir() {
        return Ok(None);
    }

    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let file_name = entry.file_name().to_string_lossy().into_owned();
        if entry.file_type()?.is_file() && is_module_file(&file_name) {
            files.push(file_name);
        }
    }
    files.sort();

    files
        .iter()
        .map(|file_name| {
            let module_path = match module_stem(file_name) {
                INITIALIZER_STEM => package.to_string(),
                stem => format!("{}.{}", package, stem),
            };
            CommandModule::from_file(&module_path, &dir.join(file_name))
        })
        .collect::<Result<Vec<_>>>()
        .map(Some)
}

/// 디렉토리 트리 로드
///
/// 모듈 경로는 폴더의 부모 기준 점 경로입니다 (`commands/db/seed.toml` → `commands.db.seed`).
/// 폴더가 없으면 `None`.
pub fn load_folder_tree(folder: &Path) -> Result<Option<Vec<CommandModule>>> {
    if !folder.is_dir() {
        return Ok(None);
    }

    let folder = folder.canonicalize()?;
    let root_name = folder
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| Error::InvalidInput(format!("'{}' has no folder name", folder.display())))?;

    let walker = WalkDir::new(&folder)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            e.depth() == 0 || !e.file_type().is_dir() || e.path().join(INITIALIZER_FILE).is_file()
        });

    let mut modules = Vec::new();
    for entry in walker {
        let entry = entry.map_err(std::io::Error::from)?;
        if !entry.file_type().is_file() {
            continue;
        }

        let file_name = entry.file_name().to_string_lossy().into_owned();
        if !is_module_file(&file_name) {
            continue;
        }

        let mut parts = vec![root_name.clone()];
        if let Some(parent) = entry.path().parent().and_then(|p| p.strip_prefix(&folder).ok()) {
            parts.extend(
                parent
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy().into_owned()),
            );
        }
        match module_stem(&file_name) {
            INITIALIZER_STEM => {}
            stem => parts.push(stem.to_string()),
        }

        modules.push(CommandModule::from_file(&parts.join("."), entry.path())?);
    }

    Ok(Some(modules))
}

// ============================================================================
// 테스트
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(path: &Path, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn noop(name: &str) -> Command {
        Command::from_fn(name, |_, _| Ok(0))
    }

    fn names(commands: &[Command]) -> Vec<&str> {
        commands.iter().map(Command::name).collect()
    }

    #[test]
    fn test_extract_skips_private_reexported_and_nameless() {
        let mut module = CommandModule::new("pkg.tools");
        module.push_command("lint", noop("lint"));
        module.push_command("_helper", noop("helper"));
        module.push_command("anonymous", noop(""));
        module.push_other("settings");
        module.push_reexport("build", "pkg.shared", Artifact::Command(noop("build")));

        let commands = extract_commands(&module);
        assert_eq!(names(&commands), vec!["lint"]);
    }

    #[test]
    fn test_extract_excludes_nested_subcommands() {
        let migrate = noop("migrate");
        let db = Command::group("db", vec![migrate.clone()]);

        let mut module = CommandModule::new("pkg.db");
        module.push_command("db", db);
        module.push_command("migrate", migrate.clone());
        // 같은 이름이어도 다른 정의면 최상위 명령어
        module.push_command("migrate_standalone", noop("migrate"));

        let commands = extract_commands(&module);
        assert_eq!(names(&commands), vec!["db", "migrate"]);
        assert!(commands[0].is_group());
        assert!(!commands[1].same_definition(&migrate));
    }

    #[test]
    fn test_flat_package_enumeration() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("pkg");
        write(&dir.join("b.toml"), "[commands.build]\nrun = \"cargo build\"\n");
        write(&dir.join("a.toml"), "[commands.audit]\nrun = \"cargo audit\"\n");
        write(&dir.join("mod.toml"), "[commands.init]\nrun = \"echo init\"\n");
        write(&dir.join("_private.toml"), "[commands.secret]\nrun = \"echo\"\n");
        write(&dir.join("README.md"), "not a module");
        write(&dir.join("nested/c.toml"), "[commands.nested]\nrun = \"echo\"\n");

        let modules = load_flat_package(&dir, "pkg.commands").unwrap().unwrap();
        let paths: Vec<_> = modules.iter().map(|m| m.path.as_str()).collect();

        assert_eq!(paths, vec!["pkg.commands.a", "pkg.commands.b", "pkg.commands"]);
    }

    #[test]
    fn test_flat_package_missing() {
        let temp = TempDir::new().unwrap();
        assert!(load_flat_package(&temp.path().join("nope"), "nope").unwrap().is_none());
    }

    #[test]
    fn test_folder_tree_descends_only_into_module_groups() {
        let temp = TempDir::new().unwrap();
        let folder = temp.path().join("commands");
        write(&folder.join("lint.toml"), "[commands.lint]\nrun = \"cargo clippy\"\n");
        write(&folder.join("db/mod.toml"), "[commands.db]\nsubcommands = []\n");
        write(&folder.join("db/seed.toml"), "[commands.seed]\nrun = \"echo seed\"\n");
        write(&folder.join("scratch/tmp.toml"), "[commands.tmp]\nrun = \"echo tmp\"\n");

        let modules = load_folder_tree(&folder).unwrap().unwrap();
        let paths: Vec<_> = modules.iter().map(|m| m.path.as_str()).collect();

        assert_eq!(paths, vec!["commands.db", "commands.db.seed", "commands.lint"]);
    }

    #[test]
    fn test_loader_required_and_optional_sources() {
        let temp = TempDir::new().unwrap();
        let catalog = ModuleCatalog::new();
        let loader = CommandLoader::new(&catalog);

        let optional = CommandSource::folder("local", temp.path().join("missing"));
        assert!(loader.load(&optional).unwrap().is_empty());

        let required = CommandSource::package("tide-ghost", "ghost.commands");
        let err = loader.load(&required).unwrap_err();
        assert!(matches!(err, Error::SourceUnresolved { .. }));
        assert!(err.to_string().contains("ghost.commands"));
    }

    #[test]
    fn test_installed_source_only_reads_its_own_root() {
        let temp = TempDir::new().unwrap();
        let alpha = temp.path().join("alpha");
        let beta = temp.path().join("beta");
        write(&alpha.join("shared/commands/main.toml"), "[commands.lint]\nrun = \"true\"\n");
        fs::create_dir_all(&beta).unwrap();

        let catalog = ModuleCatalog::new();
        let loader = CommandLoader::new(&catalog);

        let commands = loader
            .load(&CommandSource::installed("alpha", &alpha, "shared.commands"))
            .unwrap();
        assert_eq!(names(&commands), vec!["lint"]);

        let err = loader
            .load(&CommandSource::installed("beta", &beta, "shared.commands"))
            .unwrap_err();
        assert!(matches!(err, Error::SourceUnresolved { plugin, .. } if plugin == "beta"));
    }

    #[test]
    fn test_deprecated_source_still_loads() {
        let temp = TempDir::new().unwrap();
        let folder = temp.path().join("tasks");
        write(&folder.join("old.toml"), "[commands.legacy]\nrun = \"true\"\n");

        let catalog = ModuleCatalog::new();
        let source = CommandSource::folder("local", &folder).deprecated_for("commands");
        let commands = CommandLoader::new(&catalog).load(&source).unwrap();

        assert_eq!(names(&commands), vec!["legacy"]);
    }

    #[test]
    fn test_package_dir() {
        assert_eq!(
            package_dir(Path::new("/site/tide-rust"), "tide_rust.commands"),
            PathBuf::from("/site/tide-rust/tide_rust/commands")
        );
    }

    #[test]
    fn test_loader_stamps_source_plugin() {
        let temp = TempDir::new().unwrap();
        let folder = temp.path().join("commands");
        write(
            &folder.join("tools.toml"),
            "[commands.lint]\nrun = \"cargo clippy\"\n[commands.fmt]\nrun = \"cargo fmt\"\n",
        );

        let catalog = ModuleCatalog::new();
        let commands = CommandLoader::new(&catalog)
            .load(&CommandSource::folder("local", &folder))
            .unwrap();

        assert_eq!(names(&commands), vec!["lint", "fmt"]);
        assert!(commands.iter().all(|c| c.source_plugin_name() == "local"));
    }

    #[test]
    fn test_broken_module_propagates() {
        let temp = TempDir::new().unwrap();
        let folder = temp.path().join("commands");
        write(&folder.join("broken.toml"), "[commands.lint\n");

        let catalog = ModuleCatalog::new();
        let err = CommandLoader::new(&catalog)
            .load(&CommandSource::folder("local", &folder))
            .unwrap_err();

        assert!(matches!(err, Error::Module { .. }));
    }
}
