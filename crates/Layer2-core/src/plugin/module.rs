//! Command Module - 명령어 모듈 파일
//!
//! 모듈은 최상위 항목(item)들의 목록입니다. 각 항목은 명령어이거나
//! 명령어가 아닌 데이터이며, 다른 모듈에서 가져온(re-export) 항목일 수도 있습니다.
//!
//! ## 파일 형식 (`*.toml`)
//!
//! ```toml
//! [commands.lint]
//! help = "Run clippy"
//! run = "cargo clippy --all-targets"
//!
//! [commands.db]
//! subcommands = ["migrate"]
//!
//! [commands.migrate]
//! run = ["sqlx", "migrate", "run"]
//! env = { DATABASE_URL = "sqlite://dev.db" }
//! ```

use crate::command::{Command, ProcessAction};
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use tide_foundation::{Error, Result};

// ============================================================================
// CommandModule - 로드된 모듈
// ============================================================================

/// 모듈 항목의 종류
#[derive(Debug, Clone)]
pub enum Artifact {
    /// 실행 가능한 명령어
    Command(Command),
    /// 명령어가 아닌 값 (데이터, 헬퍼)
    Other,
}

/// 모듈의 최상위 항목
#[derive(Debug, Clone)]
pub struct ModuleItem {
    /// 모듈 안에서의 항목 이름
    pub attr: String,
    /// 항목이 정의된 모듈 (re-export면 현재 모듈과 다름)
    pub origin: String,
    pub artifact: Artifact,
}

/// 명령어 모듈
#[derive(Debug, Clone)]
pub struct CommandModule {
    /// 점(.)으로 구분된 모듈 경로 (예: `commands.db.seed`)
    pub path: String,
    /// 선언 순서대로의 항목들
    pub items: Vec<ModuleItem>,
}

impl CommandModule {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            items: Vec::new(),
        }
    }

    /// 이 모듈에서 정의한 명령어 추가
    pub fn push_command(&mut self, attr: impl Into<String>, command: Command) {
        let origin = self.path.clone();
        self.push_item(attr, origin, Artifact::Command(command));
    }

    /// 명령어가 아닌 항목 추가
    pub fn push_other(&mut self, attr: impl Into<String>) {
        let origin = self.path.clone();
        self.push_item(attr, origin, Artifact::Other);
    }

    /// 다른 모듈 항목을 가져와 노출 (wildcard import와 동일)
    pub fn push_reexport(&mut self, attr: impl Into<String>, origin: impl Into<String>, artifact: Artifact) {
        self.push_item(attr, origin, artifact);
    }

    fn push_item(&mut self, attr: impl Into<String>, origin: impl Into<String>, artifact: Artifact) {
        self.items.push(ModuleItem {
            attr: attr.into(),
            origin: origin.into(),
            artifact,
        });
    }

    /// 파일에서 모듈 로드
    pub fn from_file(module_path: &str, file: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(file)?;
        parse_module(module_path, &content)
    }
}

// ============================================================================
// 파일 형식
// ============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ModuleFile {
    #[serde(default)]
    commands: Ordered<RawCommand>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawCommand {
    /// 명령어 이름 (기본값: 항목 이름)
    name: Option<String>,
    help: Option<String>,
    run: Option<RunSpec>,
    subcommands: Option<Vec<String>>,
    #[serde(default)]
    env: BTreeMap<String, String>,
    cwd: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RunSpec {
    Line(String),
    Argv(Vec<String>),
}

/// 선언 순서를 보존하는 테이블
#[derive(Debug)]
struct Ordered<T>(Vec<(String, T)>);

impl<T> Default for Ordered<T> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Ordered<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct OrderedVisitor<T>(PhantomData<T>);

        impl<'de, T: Deserialize<'de>> Visitor<'de> for OrderedVisitor<T> {
            type Value = Ordered<T>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a table")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut access: A,
            ) -> std::result::Result<Self::Value, A::Error> {
                let mut entries = Vec::new();
                while let Some(entry) = access.next_entry::<String, T>()? {
                    entries.push(entry);
                }
                Ok(Ordered(entries))
            }
        }

        deserializer.deserialize_map(OrderedVisitor(PhantomData))
    }
}

/// TOML 문자열을 모듈로 파싱
///
/// leaf를 먼저 만들고 그룹은 선언 순서대로 만듭니다. 그룹은 leaf나 앞서 선언된
/// 그룹만 참조할 수 있고, 하위 명령어는 최상위 항목과 같은 정의를 공유합니다.
pub fn parse_module(module_path: &str, content: &str) -> Result<CommandModule> {
    let file: ModuleFile =
        toml::from_str(content).map_err(|e| Error::module(module_path, e.to_string()))?;

    let mut built: HashMap<&str, Command> = HashMap::new();

    for (attr, raw) in &file.commands.0 {
        if raw.run.is_some() && raw.subcommands.is_some() {
            return Err(Error::module(
                module_path,
                format!("'{}' cannot define both 'run' and 'subcommands'", attr),
            ));
        }

        if let Some(run) = &raw.run {
            let action = match run {
                RunSpec::Line(line) => ProcessAction::from_command_line(line),
                RunSpec::Argv(argv) => ProcessAction::from_argv(argv.clone()),
            }
            .map_err(|e| Error::module(module_path, format!("'{}': {}", attr, e)))?
            .with_env(raw.env.clone())
            .with_cwd(raw.cwd.clone());

            let command = with_help(Command::leaf(command_name(attr, raw), action), raw);
            built.insert(attr.as_str(), command);
        }
    }

    for (attr, raw) in &file.commands.0 {
        let Some(subcommands) = &raw.subcommands else {
            continue;
        };

        let children = subcommands
            .iter()
            .map(|child| {
                built.get(child.as_str()).cloned().ok_or_else(|| {
                    Error::module(
                        module_path,
                        format!("group '{}' references unknown item '{}'", attr, child),
                    )
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let command = with_help(Command::group(command_name(attr, raw), children), raw);
        built.insert(attr.as_str(), command);
    }

    let mut module = CommandModule::new(module_path);
    for (attr, _) in &file.commands.0 {
        match built.remove(attr.as_str()) {
            Some(command) => module.push_command(attr.as_str(), command),
            None => module.push_other(attr.as_str()),
        }
    }

    Ok(module)
}

fn command_name(attr: &str, raw: &RawCommand) -> String {
    raw.name.clone().unwrap_or_else(|| attr.to_string())
}

fn with_help(command: Command, raw: &RawCommand) -> Command {
    match &raw.help {
        Some(help) => command.with_help(help.clone()),
        None => command,
    }
}

// ============================================================================
// 테스트
// ============================================================================
