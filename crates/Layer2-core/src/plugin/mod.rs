//! # Plugin System
//!
//! 명령어 출처(source)를 발견하고 명령어를 로드합니다.
//!
//! ## 아키텍처
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  ProjectConfig.plugins (순서 = 우선순위)                      │
//! │          │                                                   │
//! │          ▼                                                   │
//! │  discover_plugin_sources ◄── PackageIndex (SitePackages)     │
//! │          │                                                   │
//! │          ▼                                                   │
//! │  CommandSource ──► CommandLoader ──► Vec<Command>            │
//! │                        │                                     │
//! │                        ├── Package   → ModuleCatalog         │
//! │                        ├── Installed → 패키지 루트 디렉토리   │
//! │                        └── Folder    → 디렉토리 트리         │
//! └──────────────────────────────────────────────────────────────┘
//! ```

mod discovery;
mod loader;
mod manifest;
mod module;
mod source;

pub use discovery::{
    discover_plugin_sources, PackageIndex, SitePackages, PLUGINS_DIR_NAME, TIDE_DIR_NAME,
};
pub use loader::{
    extract_commands, load_flat_package, load_folder_tree, package_dir, CommandLoader,
    ModuleCatalog, ModuleResolver, INITIALIZER_FILE, MODULE_SUFFIX,
};
pub use manifest::{
    EntryPoint, InstalledPackage, PackageManifest, MANIFEST_FILE, PLUGIN_ENTRY_POINT_GROUP,
};
pub use module::{parse_module, Artifact, CommandModule, ModuleItem};
pub use source::{
    CommandSource, Locator, CORE_COMMAND_PACKAGE, CORE_PLUGIN_NAME, LOCAL_PLUGIN_NAME,
};
