//! Plugin Discovery - 설치된 플러그인 발견
//!
//! 설치된 패키지 중 `tide.commands` entry point를 가진 패키지를 찾고,
//! 설정에 적힌 플러그인에 대해서만 `CommandSource`를 만듭니다 (opt-in).
//!
//! 설치 정보는 `PackageIndex`로 주입됩니다. 기본 구현 `SitePackages`는
//! site 디렉토리의 `<package>/plugin.json` 매니페스트를 읽습니다.
//!
//! entry point target은 그것을 선언한 패키지의 루트 기준으로만 해석됩니다.

use super::manifest::{InstalledPackage, PackageManifest, MANIFEST_FILE, PLUGIN_ENTRY_POINT_GROUP};
use super::source::{CommandSource, CORE_PLUGIN_NAME, LOCAL_PLUGIN_NAME};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tide_foundation::{PluginTable, Result};
use tracing::{debug, info, warn};

/// 사용자/프로젝트 설정 폴더 이름
pub const TIDE_DIR_NAME: &str = ".tide";

/// site 디렉토리 이름 (설정 폴더 아래)
pub const PLUGINS_DIR_NAME: &str = "plugins";

// ============================================================================
// PackageIndex - 설치 정보
// ============================================================================

/// 설치된 패키지 목록 제공자
pub trait PackageIndex {
    fn list_installed(&self) -> Result<Vec<InstalledPackage>>;
}

/// 설정된 플러그인의 `CommandSource` 목록 (설정 순서 유지)
///
/// 설정에 있지만 설치되지 않은 플러그인은 경고 후 제외합니다.
pub fn discover_plugin_sources(
    index: &dyn PackageIndex,
    plugins: &PluginTable,
) -> Result<Vec<CommandSource>> {
    let mut targets: HashMap<String, (PathBuf, String)> = HashMap::new();

    for package in index.list_installed()? {
        if !plugins.contains(&package.name) || targets.contains_key(&package.name) {
            continue;
        }

        if let Some(entry_point) = package.entry_points_in(PLUGIN_ENTRY_POINT_GROUP).next() {
            debug!(
                "Plugin '{}' provides commands via '{}' -> {}",
                package.name, entry_point.name, entry_point.target
            );
            targets.insert(
                package.name.clone(),
                (package.root.clone(), entry_point.target.clone()),
            );
        }
    }

    let mut sources = Vec::new();
    for (name, config) in plugins.iter() {
        if name == CORE_PLUGIN_NAME || name == LOCAL_PLUGIN_NAME {
            continue;
        }

        match targets.get(name) {
            Some((root, target)) => sources.push(
                CommandSource::installed(name, root, target.as_str()).with_config(config.clone()),
            ),
            None => warn!("Plugin '{}' is specified in config but not installed", name),
        }
    }

    info!("Discovered {} configured plugins", sources.len());
    Ok(sources)
}

// ============================================================================
// SitePackages - 매니페스트 기반 설치 목록
// ============================================================================

/// site 디렉토리 기반 패키지 인덱스
///
/// 뒤쪽 site 디렉토리의 같은 이름 패키지가 앞쪽을 가립니다.
#[derive(Debug, Clone)]
pub struct SitePackages {
    site_dirs: Vec<PathBuf>,
}

impl SitePackages {
    /// 기본 site 디렉토리 (`~/.tide/plugins`, `<project>/.tide/plugins`)
    pub fn new(project_root: &Path) -> Self {
        let mut site_dirs = Vec::new();

        if let Some(home) = dirs::home_dir() {
            site_dirs.push(home.join(TIDE_DIR_NAME).join(PLUGINS_DIR_NAME));
        }
        site_dirs.push(project_root.join(TIDE_DIR_NAME).join(PLUGINS_DIR_NAME));

        Self { site_dirs }
    }

    /// 커스텀 site 디렉토리
    pub fn with_dirs(site_dirs: Vec<PathBuf>) -> Self {
        Self { site_dirs }
    }

    pub fn site_dirs(&self) -> &[PathBuf] {
        &self.site_dirs
    }

    /// 모든 site 디렉토리 스캔
    fn scan(&self) -> Result<Vec<InstalledPackage>> {
        let mut packages: Vec<InstalledPackage> = Vec::new();

        for site_dir in &self.site_dirs {
            if !site_dir.is_dir() {
                continue;
            }

            let mut roots: Vec<PathBuf> = std::fs::read_dir(site_dir)?
                .filter_map(|entry| entry.ok().map(|e| e.path()))
                .filter(|path| path.join(MANIFEST_FILE).is_file())
                .collect();
            roots.sort();

            for root in roots {
                let manifest = match PackageManifest::from_file(&root.join(MANIFEST_FILE)) {
                    Ok(manifest) => manifest,
                    Err(e) => {
                        warn!("Skipping package at {}: {}", root.display(), e);
                        continue;
                    }
                };

                let package = manifest.into_installed(root);
                match packages.iter_mut().find(|p| p.name == package.name) {
                    Some(existing) => {
                        debug!(
                            "Package '{}' at {} shadows {}",
                            package.name,
                            package.root.display(),
                            existing.root.display()
                        );
                        *existing = package;
                    }
                    None => packages.push(package),
                }
            }
        }

        Ok(packages)
    }
}

impl PackageIndex for SitePackages {
    fn list_installed(&self) -> Result<Vec<InstalledPackage>> {
        self.scan()
    }
}

// ============================================================================
// 테스트
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugin::manifest::EntryPoint;
    use crate::plugin::source::Locator;
    use std::fs;
    use tempfile::TempDir;
    use tide_foundation::PluginConfig;

    struct StaticIndex(Vec<InstalledPackage>);

    impl PackageIndex for StaticIndex {
        fn list_installed(&self) -> Result<Vec<InstalledPackage>> {
            Ok(self.0.clone())
        }
    }

    fn installed(name: &str, targets: &[(&str, &str)]) -> InstalledPackage {
        InstalledPackage {
            name: name.to_string(),
            version: None,
            root: PathBuf::from(format!("/site/{}", name)),
            entry_points: targets
                .iter()
                .map(|(group, target)| EntryPoint {
                    group: group.to_string(),
                    name: "commands".to_string(),
                    target: target.to_string(),
                })
                .collect(),
        }
    }

    fn create_package(site: &Path, name: &str, target: &str, module: &str) {
        let root = site.join(name);
        let package_dir = root.join(target.replace('.', "/"));
        fs::create_dir_all(&package_dir).unwrap();

        let manifest = format!(
            r#"{{"name": "{}", "entry_points": {{"tide.commands": {{"commands": "{}"}}}}}}"#,
            name, target
        );
        fs::write(root.join(MANIFEST_FILE), manifest).unwrap();
        fs::write(package_dir.join("tools.toml"), module).unwrap();
    }

    #[test]
    fn test_discovery_preserves_config_order() {
        let index = StaticIndex(vec![
            installed("alpha", &[(PLUGIN_ENTRY_POINT_GROUP, "alpha.commands")]),
            installed("beta", &[(PLUGIN_ENTRY_POINT_GROUP, "beta.commands")]),
            installed("unlisted", &[(PLUGIN_ENTRY_POINT_GROUP, "unlisted.commands")]),
        ]);

        let plugins: PluginTable = vec![
            ("beta", PluginConfig::new().with_disabled(["x"])),
            ("alpha", PluginConfig::new()),
        ]
        .into_iter()
        .collect();

        let sources = discover_plugin_sources(&index, &plugins).unwrap();
        let names: Vec<_> = sources.iter().map(|s| s.plugin_name.as_str()).collect();

        assert_eq!(names, vec!["beta", "alpha"]);
        assert_eq!(
            sources[0].locator,
            Locator::Installed {
                root: PathBuf::from("/site/beta"),
                package: "beta.commands".into(),
            }
        );
        assert!(sources[0].plugin_config.is_disabled("x"));
        assert!(sources.iter().all(|s| s.required));
    }

    #[test]
    fn test_missing_plugin_is_skipped() {
        let index = StaticIndex(vec![installed("alpha", &[(PLUGIN_ENTRY_POINT_GROUP, "a.commands")])]);
        let plugins: PluginTable = vec![
            ("ghost", PluginConfig::new()),
            ("alpha", PluginConfig::new()),
            (CORE_PLUGIN_NAME, PluginConfig::new()),
            (LOCAL_PLUGIN_NAME, PluginConfig::new()),
        ]
        .into_iter()
        .collect();

        let sources = discover_plugin_sources(&index, &plugins).unwrap();
        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].plugin_name, "alpha");
    }

    #[test]
    fn test_other_groups_and_duplicate_entry_points() {
        let index = StaticIndex(vec![
            installed("alpha", &[("other.group", "alpha.other")]),
            installed(
                "beta",
                &[
                    (PLUGIN_ENTRY_POINT_GROUP, "beta.first"),
                    (PLUGIN_ENTRY_POINT_GROUP, "beta.second"),
                ],
            ),
        ]);
        let plugins: PluginTable = vec![("alpha", PluginConfig::new()), ("beta", PluginConfig::new())]
            .into_iter()
            .collect();

        let sources = discover_plugin_sources(&index, &plugins).unwrap();
        assert_eq!(sources.len(), 1);
        assert!(matches!(
            &sources[0].locator,
            Locator::Installed { package, .. } if package == "beta.first"
        ));
    }

    #[test]
    fn test_site_packages_scan() {
        let temp = TempDir::new().unwrap();
        let site = temp.path().join("site");
        create_package(&site, "tide-rust", "tide_rust.commands", "[commands.lint]\nrun = \"cargo clippy\"\n");
        fs::create_dir_all(site.join("not-a-package")).unwrap();
        fs::create_dir_all(site.join("broken")).unwrap();
        fs::write(site.join("broken").join(MANIFEST_FILE), "{").unwrap();

        let packages = SitePackages::with_dirs(vec![site]);
        let installed = packages.list_installed().unwrap();

        assert_eq!(installed.len(), 1);
        assert_eq!(installed[0].name, "tide-rust");
        assert_eq!(installed[0].entry_points[0].target, "tide_rust.commands");
    }

    #[test]
    fn test_same_target_resolves_against_declaring_package() {
        let temp = TempDir::new().unwrap();
        let site = temp.path().join("site");
        create_package(&site, "alpha", "shared.commands", "[commands.lint]\nrun = \"true\"\n");
        create_package(&site, "beta", "shared.commands", "[commands.typecheck]\nrun = \"true\"\n");

        let plugins: PluginTable = vec![("alpha", PluginConfig::new()), ("beta", PluginConfig::new())]
            .into_iter()
            .collect();
        let sources = discover_plugin_sources(&SitePackages::with_dirs(vec![site.clone()]), &plugins)
            .unwrap();

        let roots: Vec<_> = sources
            .iter()
            .map(|s| match &s.locator {
                Locator::Installed { root, .. } => root.clone(),
                other => panic!("unexpected locator {:?}", other),
            })
            .collect();
        assert_eq!(roots, vec![site.join("alpha"), site.join("beta")]);
    }

    #[test]
    fn test_later_site_dir_shadows_earlier() {
        let temp = TempDir::new().unwrap();
        let user_site = temp.path().join("user");
        let project_site = temp.path().join("project");
        create_package(&user_site, "tide-rust", "old.commands", "");
        create_package(&project_site, "tide-rust", "new.commands", "");

        let installed = SitePackages::with_dirs(vec![user_site, project_site.clone()])
            .list_installed()
            .unwrap();

        assert_eq!(installed.len(), 1);
        assert_eq!(installed[0].root, project_site.join("tide-rust"));
        assert_eq!(installed[0].entry_points[0].target, "new.commands");
    }
}
