//! Package Manifest - 설치된 플러그인 패키지 메타데이터 (`plugin.json`)

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tide_foundation::{Error, Result};

/// 매니페스트 파일명
pub const MANIFEST_FILE: &str = "plugin.json";

/// 명령어 제공 entry point 그룹
pub const PLUGIN_ENTRY_POINT_GROUP: &str = "tide.commands";

/// entry point 하나
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryPoint {
    /// 그룹 (예: `tide.commands`)
    pub group: String,
    /// entry point 이름
    pub name: String,
    /// 대상 패키지 (예: `tide_rust.commands`)
    pub target: String,
}

/// 설치된 패키지
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledPackage {
    /// 배포 이름 (플러그인 이름으로 사용)
    pub name: String,
    pub version: Option<String>,
    /// 패키지 루트 디렉토리
    pub root: PathBuf,
    pub entry_points: Vec<EntryPoint>,
}

impl InstalledPackage {
    /// 특정 그룹의 entry point들
    pub fn entry_points_in<'a>(&'a self, group: &'a str) -> impl Iterator<Item = &'a EntryPoint> {
        self.entry_points.iter().filter(move |ep| ep.group == group)
    }
}

/// `plugin.json` 파일 형식
///
/// ```json
/// {
///   "name": "tide-rust",
///   "version": "0.3.1",
///   "entry_points": { "tide.commands": { "commands": "tide_rust.commands" } }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageManifest {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// 그룹 → (이름 → 대상)
    #[serde(default)]
    pub entry_points: BTreeMap<String, BTreeMap<String, String>>,
}

impl PackageManifest {
    /// 파일에서 로드 및 검증
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let manifest: PackageManifest = serde_json::from_str(&content)
            .map_err(|e| Error::Manifest(format!("{}: {}", path.display(), e)))?;
        manifest.validate(path)?;
        Ok(manifest)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::Manifest(format!("{}: empty package name", path.display())));
        }

        for (group, targets) in &self.entry_points {
            if let Some((name, _)) = targets.iter().find(|(_, t)| t.trim().is_empty()) {
                return Err(Error::Manifest(format!(
                    "{}: entry point '{}' in '{}' has no target",
                    path.display(),
                    name,
                    group
                )));
            }
        }

        Ok(())
    }

    /// `InstalledPackage`로 변환
    pub fn into_installed(self, root: PathBuf) -> InstalledPackage {
        let entry_points = self
            .entry_points
            .into_iter()
            .flat_map(|(group, targets)| {
                targets.into_iter().map(move |(name, target)| EntryPoint {
                    group: group.clone(),
                    name,
                    target,
                })
            })
            .collect();

        InstalledPackage {
            name: self.name,
            version: self.version,
            root,
            entry_points,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_manifest_parsing() {
        let json = r#"{
            "name": "tide-rust",
            "version": "0.3.1",
            "entry_points": {
                "tide.commands": { "commands": "tide_rust.commands" },
                "other.group": { "x": "tide_rust.other" }
            }
        }"#;

        let manifest: PackageManifest = serde_json::from_str(json).unwrap();
        let package = manifest.into_installed(PathBuf::from("/site/tide-rust"));

        assert_eq!(package.name, "tide-rust");
        assert_eq!(package.version.as_deref(), Some("0.3.1"));
        assert_eq!(package.entry_points.len(), 2);

        let ours: Vec<_> = package.entry_points_in(PLUGIN_ENTRY_POINT_GROUP).collect();
        assert_eq!(ours.len(), 1);
        assert_eq!(ours[0].target, "tide_rust.commands");
    }

    #[test]
    fn test_manifest_validation() {
        let temp = TempDir::new().unwrap();

        let empty_name = temp.path().join("a.json");
        std::fs::write(&empty_name, r#"{"name": " "}"#).unwrap();
        assert!(matches!(
            PackageManifest::from_file(&empty_name),
            Err(Error::Manifest(_))
        ));

        let empty_target = temp.path().join("b.json");
        std::fs::write(
            &empty_target,
            r#"{"name": "x", "entry_points": {"tide.commands": {"c": ""}}}"#,
        )
        .unwrap();
        assert!(PackageManifest::from_file(&empty_target).is_err());

        let broken = temp.path().join("c.json");
        std::fs::write(&broken, "{").unwrap();
        assert!(PackageManifest::from_file(&broken).is_err());
    }
}
