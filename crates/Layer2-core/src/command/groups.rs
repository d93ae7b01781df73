//! Command Groups - 이름 붙은 명령어 묶음 실행

use super::traits::CommandContext;
use tide_foundation::{Error, Result};
use tracing::{debug, info, warn};

/// 그룹의 명령어를 순서대로 실행
///
/// 첫 번째 0이 아닌 종료 코드에서 멈추고 그 코드를 반환합니다.
pub fn run_group(ctx: &CommandContext<'_>, group: &str) -> Result<i32> {
    let groups = ctx.config.command_groups_for(ctx.plugin_name);
    let targets = groups
        .get(group)
        .ok_or_else(|| Error::GroupNotFound(group.to_string()))?;

    if targets.is_empty() {
        warn!("Command group '{}' is empty", group);
        return Ok(0);
    }

    let registry = ctx.registry;
    for name in targets {
        let Some(command) = registry.get(name) else {
            warn!(
                "Command '{}' in group '{}' does not exist. Skipping.",
                name, group
            );
            continue;
        };

        let owner = command.source_plugin_name();
        if ctx.config.plugin_config(owner).is_disabled(name) {
            debug!(
                "Command '{}' is disabled by plugin '{}'. Skipping.",
                name, owner
            );
            continue;
        }

        info!("Running '{}' from group '{}'", name, group);
        let code = command.invoke(&ctx.for_plugin(owner), &[])?;
        if code != 0 {
            return Ok(code);
        }
    }

    Ok(0)
}
