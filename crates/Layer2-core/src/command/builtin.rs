//! Builtin Commands - 바이너리에 포함된 코어 번들
//!
//! `tide.commands` 패키지는 파일 시스템이 아니라 이 resolver가 제공합니다.
//! 일반 패키지와 같은 추출 규칙을 거치도록 모듈 형태로 노출합니다.

use super::groups::run_group;
use super::traits::Command;
use crate::plugin::{CommandModule, ModuleCatalog, ModuleResolver, CORE_COMMAND_PACKAGE};
use crate::registry::CommandRegistry;
use std::fmt::Write as _;
use std::sync::Arc;
use tide_foundation::{Error, Result};

/// 코어 번들 resolver
#[derive(Debug, Default, Clone, Copy)]
pub struct BuiltinModules;

impl ModuleResolver for BuiltinModules {
    fn name(&self) -> &str {
        "builtin"
    }

    fn resolve(&self, package: &str) -> Result<Option<Vec<CommandModule>>> {
        if package != CORE_COMMAND_PACKAGE {
            return Ok(None);
        }

        let mut inspect = CommandModule::new(format!("{}.inspect", CORE_COMMAND_PACKAGE));
        inspect.push_command("commands", commands_command());

        let mut groups = CommandModule::new(format!("{}.groups", CORE_COMMAND_PACKAGE));
        groups.push_command("run_group", run_group_command());

        Ok(Some(vec![inspect, groups]))
    }
}

/// 코어 번들 resolver만 가진 카탈로그
///
/// 설치된 플러그인은 소스에 패키지 루트가 들어 있어 카탈로그를 거치지 않습니다.
pub fn standard_catalog() -> ModuleCatalog {
    ModuleCatalog::new().with_resolver(Arc::new(BuiltinModules))
}

fn commands_command() -> Command {
    Command::from_fn("commands", |ctx, _| {
        print!("{}", render_command_listing(ctx.registry));
        Ok(0)
    })
    .with_help("List available commands and the plugins providing them")
}

fn run_group_command() -> Command {
    Command::from_fn("run-group", |ctx, args| {
        let group = args
            .first()
            .ok_or_else(|| Error::InvalidInput("run-group requires a group name".into()))?;
        run_group(ctx, group)
    })
    .with_help("Run a named command group")
}

/// 레지스트리 상태를 사람이 읽는 형식으로
pub fn render_command_listing(registry: &CommandRegistry) -> String {
    let mut out = String::new();

    let width = registry
        .visible_names()
        .iter()
        .map(|n| n.len())
        .max()
        .unwrap_or(0);

    let _ = writeln!(out, "Commands:");
    for command in registry.visible() {
        let _ = writeln!(
            out,
            "  {:<width$}  [{}] {}",
            command.name(),
            command.source_plugin_name(),
            command.help().unwrap_or(""),
            width = width
        );
    }

    let hidden = registry.hidden();
    if !hidden.is_empty() {
        let names: Vec<String> = hidden
            .iter()
            .map(|c| format!("{} ({})", c.name(), c.source_plugin_name()))
            .collect();
        let _ = writeln!(out, "\n{} hidden: {}", hidden.len(), names.join(", "));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::CommandContext;
    use crate::plugin::{extract_commands, CommandSource};
    use std::path::Path;
    use tide_foundation::{PluginConfig, ProjectConfig};

    fn core_registry(config: PluginConfig) -> CommandRegistry {
        let catalog = ModuleCatalog::new().with_resolver(Arc::new(BuiltinModules));
        let source = CommandSource::package("tide", CORE_COMMAND_PACKAGE).with_config(config);
        CommandRegistry::from_sources(vec![source], &catalog).unwrap()
    }

    #[test]
    fn test_builtin_resolves_only_core_package() {
        assert!(BuiltinModules.resolve("other.commands").unwrap().is_none());

        let modules = BuiltinModules.resolve(CORE_COMMAND_PACKAGE).unwrap().unwrap();
        let names: Vec<String> = modules
            .iter()
            .flat_map(extract_commands)
            .map(|c| c.name().to_string())
            .collect();
        assert_eq!(names, vec!["commands", "run-group"]);
    }

    #[test]
    fn test_listing_shows_owner_and_hidden() {
        let registry = core_registry(PluginConfig::new().with_disabled(["run-group"]));
        let listing = render_command_listing(&registry);

        assert!(listing.contains("commands  [tide] List available commands"));
        assert!(listing.contains("1 hidden: run-group (tide)"));
    }

    #[test]
    fn test_run_group_requires_name() {
        let registry = core_registry(PluginConfig::new());
        let config = ProjectConfig::default();
        let ctx = CommandContext::new(Path::new("."), &config, &registry, "tide");

        let command = registry.get("run-group").unwrap();
        assert!(matches!(command.invoke(&ctx, &[]), Err(Error::InvalidInput(_))));
        assert!(matches!(
            command.invoke(&ctx, &["ci".to_string()]),
            Err(Error::GroupNotFound(_))
        ));
    }
}
