//! Command Traits - 명령어 모델 정의
//!
//! 명령어는 이름 + 실행 가능한 동작(`CommandAction`)입니다.
//! leaf/group 구분은 상속이 아닌 `CommandKind` 태그로 표현합니다.

use crate::registry::CommandRegistry;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use tide_foundation::{Error, PluginConfig, ProjectConfig, Result};

// ============================================================================
// CommandContext - 실행 컨텍스트
// ============================================================================

/// 모든 명령어가 공유하는 실행 컨텍스트
#[derive(Clone, Copy)]
pub struct CommandContext<'a> {
    /// 프로젝트 루트
    pub project_root: &'a Path,

    /// 병합된 프로젝트 설정
    pub config: &'a ProjectConfig,

    /// 명령어 레지스트리 (그룹 실행, 진단용)
    pub registry: &'a CommandRegistry,

    /// 실행 중인 명령어를 제공한 플러그인
    pub plugin_name: &'a str,
}

impl<'a> CommandContext<'a> {
    pub fn new(
        project_root: &'a Path,
        config: &'a ProjectConfig,
        registry: &'a CommandRegistry,
        plugin_name: &'a str,
    ) -> Self {
        Self {
            project_root,
            config,
            registry,
            plugin_name,
        }
    }

    /// 다른 플러그인 명령어를 위한 컨텍스트
    pub fn for_plugin(&self, plugin_name: &'a str) -> Self {
        Self {
            plugin_name,
            ..*self
        }
    }

    /// 현재 플러그인의 설정
    pub fn plugin_config(&self) -> PluginConfig {
        self.config.plugin_config(self.plugin_name)
    }
}

// ============================================================================
// CommandAction - 실행 동작
// ============================================================================

/// 명령어 동작
///
/// 반환값은 프로세스 종료 코드입니다.
pub trait CommandAction: Send + Sync {
    fn invoke(&self, ctx: &CommandContext<'_>, args: &[String]) -> Result<i32>;
}

/// 함수/클로저 기반 동작
pub struct FnAction<F>(F);

impl<F> CommandAction for FnAction<F>
where
    F: Fn(&CommandContext<'_>, &[String]) -> Result<i32> + Send + Sync,
{
    fn invoke(&self, ctx: &CommandContext<'_>, args: &[String]) -> Result<i32> {
        (self.0)(ctx, args)
    }
}

// ============================================================================
// Command - 명령어
// ============================================================================

/// 명령어 종류
#[derive(Clone)]
pub enum CommandKind {
    /// 단일 동작
    Leaf(Arc<dyn CommandAction>),
    /// 하위 명령어 묶음 (하위 명령어는 그룹을 통해서만 접근)
    Group(Vec<Command>),
}

struct CommandDef {
    name: String,
    help: Option<String>,
    kind: CommandKind,
}

/// 이름이 붙은 실행 가능한 명령어
///
/// 정의(`CommandDef`)는 `Arc`로 공유되며 생성 후 변경되지 않습니다.
#[derive(Clone)]
pub struct Command {
    def: Arc<CommandDef>,
    source_plugin_name: String,
}

impl Command {
    /// 단일 명령어 생성
    pub fn leaf(name: impl Into<String>, action: impl CommandAction + 'static) -> Self {
        Self::from_kind(name, CommandKind::Leaf(Arc::new(action)))
    }

    /// 함수/클로저로 단일 명령어 생성
    pub fn from_fn<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&CommandContext<'_>, &[String]) -> Result<i32> + Send + Sync + 'static,
    {
        Self::leaf(name, FnAction(f))
    }

    /// 그룹 명령어 생성
    pub fn group(name: impl Into<String>, children: Vec<Command>) -> Self {
        Self::from_kind(name, CommandKind::Group(children))
    }

    fn from_kind(name: impl Into<String>, kind: CommandKind) -> Self {
        Self {
            def: Arc::new(CommandDef {
                name: name.into(),
                help: None,
                kind,
            }),
            source_plugin_name: String::new(),
        }
    }

    /// 빌더 패턴: 도움말 설정
    ///
    /// 정의를 새로 만들기 때문에 기존 복제본과는 다른 정의가 됩니다.
    pub fn with_help(self, help: impl Into<String>) -> Self {
        Self {
            def: Arc::new(CommandDef {
                name: self.def.name.clone(),
                help: Some(help.into()),
                kind: self.def.kind.clone(),
            }),
            source_plugin_name: self.source_plugin_name,
        }
    }

    /// 소유 플러그인 지정 (정의는 공유)
    pub fn with_source(&self, plugin_name: impl Into<String>) -> Self {
        Self {
            def: Arc::clone(&self.def),
            source_plugin_name: plugin_name.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.def.name
    }

    pub fn help(&self) -> Option<&str> {
        self.def.help.as_deref()
    }

    pub fn kind(&self) -> &CommandKind {
        &self.def.kind
    }

    pub fn source_plugin_name(&self) -> &str {
        &self.source_plugin_name
    }

    pub fn is_group(&self) -> bool {
        matches!(self.def.kind, CommandKind::Group(_))
    }

    /// 그룹의 하위 명령어 (leaf면 빈 slice)
    pub fn children(&self) -> &[Command] {
        match &self.def.kind {
            CommandKind::Group(children) => children,
            CommandKind::Leaf(_) => &[],
        }
    }

    /// 같은 정의 객체를 공유하는지 (이름 비교가 아닌 identity 비교)
    pub fn same_definition(&self, other: &Command) -> bool {
        Arc::ptr_eq(&self.def, &other.def)
    }

    /// 명령어 실행
    pub fn invoke(&self, ctx: &CommandContext<'_>, args: &[String]) -> Result<i32> {
        match &self.def.kind {
            CommandKind::Leaf(action) => action.invoke(ctx, args),
            CommandKind::Group(children) => {
                let available = || {
                    children
                        .iter()
                        .map(Command::name)
                        .collect::<Vec<_>>()
                        .join(", ")
                };

                let Some((sub, rest)) = args.split_first() else {
                    return Err(Error::InvalidInput(format!(
                        "Command '{}' requires a sub-command ({})",
                        self.name(),
                        available()
                    )));
                };

                let child = children
                    .iter()
                    .find(|c| c.name() == sub)
                    .ok_or_else(|| {
                        Error::InvalidInput(format!(
                            "No such sub-command '{}' in '{}' ({})",
                            sub,
                            self.name(),
                            available()
                        ))
                    })?;

                child.invoke(ctx, rest)
            }
        }
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match &self.def.kind {
            CommandKind::Leaf(_) => "leaf".to_string(),
            CommandKind::Group(children) => format!("group[{}]", children.len()),
        };
        f.debug_struct("Command")
            .field("name", &self.def.name)
            .field("kind", &kind)
            .field("source_plugin_name", &self.source_plugin_name)
            .finish()
    }
}

// ============================================================================
// 테스트
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugin::ModuleCatalog;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn exit_with(name: &str, code: i32) -> Command {
        Command::from_fn(name, move |_, _| Ok(code))
    }

    #[test]
    fn test_leaf_invoke() {
        let registry = CommandRegistry::from_sources(vec![], &ModuleCatalog::new()).unwrap();
        let config = ProjectConfig::default();
        let ctx = CommandContext::new(Path::new("."), &config, &registry, "tide");

        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let command = Command::from_fn("count", move |_, args| {
            counter.fetch_add(args.len(), Ordering::SeqCst);
            Ok(0)
        });

        let code = command
            .invoke(&ctx, &["a".to_string(), "b".to_string()])
            .unwrap();
        assert_eq!(code, 0);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_group_dispatches_to_child() {
        let registry = CommandRegistry::from_sources(vec![], &ModuleCatalog::new()).unwrap();
        let config = ProjectConfig::default();
        let ctx = CommandContext::new(Path::new("."), &config, &registry, "tide");

        let group = Command::group(
            "db",
            vec![exit_with("migrate", 3), exit_with("seed", 4)],
        );

        assert!(group.is_group());
        assert_eq!(group.children().len(), 2);
        assert_eq!(group.invoke(&ctx, &["seed".to_string()]).unwrap(), 4);

        let missing = group.invoke(&ctx, &[]).unwrap_err();
        assert!(missing.to_string().contains("migrate, seed"));

        let unknown = group.invoke(&ctx, &["drop".to_string()]).unwrap_err();
        assert!(unknown.to_string().contains("No such sub-command 'drop'"));
    }

    #[test]
    fn test_definition_identity() {
        let command = exit_with("lint", 0);
        let owned = command.with_source("tide-rust");

        assert!(command.same_definition(&owned));
        assert_eq!(owned.source_plugin_name(), "tide-rust");

        let rebuilt = command.clone().with_help("Run linters");
        assert!(!command.same_definition(&rebuilt));
        assert_eq!(rebuilt.help(), Some("Run linters"));
    }
}
