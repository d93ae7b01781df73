//! # Command Registry
//!
//! 여러 소스의 명령어를 하나의 이름 공간으로 병합합니다.
//!
//! ## 규칙
//!
//! 1. **우선순위**: 소스 목록의 뒤쪽이 앞쪽을 덮어씀
//! 2. **필터링**: 각 소스의 `enable_commands` / `disable_commands`는 그 소스가 제공한 명령어에만 적용
//! 3. **가시성**: 필터링에서 빠진 명령어는 hidden으로 보존 (실행 불가, 조회 가능)
//! 4. **오타 검사**: 발견되지 않은 enable/disable 항목은 플러그인 이름 단위로 보고
//!
//! ## 아키텍처
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  sources[0] (core) → sources[1..] (plugins) → local      │
//! │        낮은 우선순위 ─────────────────────► 높은 우선순위 │
//! │                          │                               │
//! │                          ▼                               │
//! │   ┌──────────────────────┬───────────────────────┐       │
//! │   │ visible: BTreeMap    │ hidden: BTreeMap      │       │
//! │   │ (실행 가능)           │ (필터링됨)             │       │
//! │   └──────────────────────┴───────────────────────┘       │
//! │                          │                               │
//! │                 notices: Override / UnknownDirective     │
//! └──────────────────────────────────────────────────────────┘
//! ```

mod command_registry;
mod notice;

pub use command_registry::{default_sources, CommandRegistry, LEGACY_LOCAL_FOLDER};
pub use notice::{Directive, RegistryNotice};
