//! Registry Notice - 레지스트리 빌드 중 발생한 진단 정보

use std::fmt;

/// 플러그인 설정의 필터 지시어
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive {
    Enable,
    Disable,
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Directive::Enable => write!(f, "enable_commands"),
            Directive::Disable => write!(f, "disable_commands"),
        }
    }
}

/// 빌드 중 기록된 알림 (로그와 같은 내용)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryNotice {
    /// 뒤쪽(우선순위 높은) 소스가 같은 이름을 다시 등록
    Override {
        command: String,
        plugin: String,
        previous_plugin: String,
    },

    /// enable/disable 목록에 발견되지 않은 명령어가 있음
    UnknownDirective {
        plugin: String,
        command: String,
        directive: Directive,
    },
}

impl fmt::Display for RegistryNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryNotice::Override {
                command,
                plugin,
                previous_plugin,
            } => write!(
                f,
                "Using command '{}' from plugin '{}'. Previously registered by '{}' plugin, which has lower priority.",
                command, plugin, previous_plugin
            ),
            RegistryNotice::UnknownDirective {
                plugin,
                command,
                directive,
            } => write!(
                f,
                "Command '{}' listed in '{}' of plugin '{}' does not exist",
                command, directive, plugin
            ),
        }
    }
}
