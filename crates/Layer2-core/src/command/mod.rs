//! # Command Model
//!
//! 명령어 정의와 실행 동작.
//!
//! - `traits`: `Command`, `CommandAction`, `CommandContext`
//! - `process`: 외부 프로그램 실행 (`run = "..."`)
//! - `builtin`: 코어 번들 (`commands`, `run-group`)
//! - `groups`: 명령어 그룹 실행

mod builtin;
mod groups;
mod process;
mod traits;

pub use builtin::{render_command_listing, standard_catalog, BuiltinModules};
pub use groups::run_group;
pub use process::ProcessAction;
pub use traits::{Command, CommandAction, CommandContext, CommandKind, FnAction};
