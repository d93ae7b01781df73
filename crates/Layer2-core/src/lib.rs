//! tide-core: 명령어 모델, 플러그인 발견, 명령어 레지스트리
//!
//! Layer2 - 명령어를 모으고 병합하는 레이어
//!
//! # 주요 모듈
//!
//! - `command`: 명령어 모델 및 실행 동작 (프로세스, 코어 번들, 그룹)
//! - `plugin`: 소스 정의, 모듈 로딩, 설치된 플러그인 발견
//! - `registry`: 우선순위 병합 및 enable/disable 필터링
//!
//! # 사용 예시
//!
//! ```ignore
//! use tide_core::{standard_catalog, CommandContext, CommandRegistry, SitePackages};
//! use tide_foundation::ConfigLoader;
//!
//! let config = ConfigLoader::new(&root).load_all()?;
//! let site = SitePackages::new(&root);
//!
//! let registry = CommandRegistry::build(&config, &root, &site, &standard_catalog())?;
//! if let Some(lint) = registry.get("lint") {
//!     let ctx = CommandContext::new(&root, &config, &registry, lint.source_plugin_name());
//!     lint.invoke(&ctx, &[])?;
//! }
//! ```

pub mod command;
pub mod plugin;
pub mod registry;

// Re-exports: Command
pub use command::{
    render_command_listing, run_group, standard_catalog, BuiltinModules, Command, CommandAction,
    CommandContext, CommandKind, FnAction, ProcessAction,
};

// Re-exports: Plugin
pub use plugin::{
    discover_plugin_sources, extract_commands, load_flat_package, load_folder_tree, parse_module,
    Artifact, CommandLoader, CommandModule, CommandSource, EntryPoint, InstalledPackage, Locator,
    ModuleCatalog, ModuleItem, ModuleResolver, PackageIndex, PackageManifest, SitePackages,
    CORE_COMMAND_PACKAGE, CORE_PLUGIN_NAME, LOCAL_PLUGIN_NAME, MANIFEST_FILE,
    PLUGIN_ENTRY_POINT_GROUP,
};

// Re-exports: Registry
pub use registry::{
    default_sources, CommandRegistry, Directive, RegistryNotice, LEGACY_LOCAL_FOLDER,
};

// Layer1 re-exports
pub use tide_foundation::{Error, Result};

/// Layer2 버전
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
