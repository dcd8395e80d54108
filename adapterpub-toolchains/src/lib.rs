pub mod node;
pub mod script;

pub use node::{has_build_script, NodeToolchain, PackageManager};
pub use script::{CommandValidator, ScriptToolchain};

use std::path::Path;

use adapterpub_core::config::{ToolchainKind, ToolchainSettings};
use adapterpub_core::toolchain::Toolchain;

/// Returns the toolchain `settings` select for the adapter in `dir`.
pub fn get_toolchain(settings: &ToolchainSettings, dir: &Path) -> Box<dyn Toolchain> {
    match settings.kind {
        ToolchainKind::Auto => Box::new(NodeToolchain::new(PackageManager::detect(dir))),
        ToolchainKind::Npm => Box::new(NodeToolchain::new(PackageManager::Npm)),
        ToolchainKind::Pnpm => Box::new(NodeToolchain::new(PackageManager::Pnpm)),
        ToolchainKind::Yarn => Box::new(NodeToolchain::new(PackageManager::Yarn)),
        ToolchainKind::Bun => Box::new(NodeToolchain::new(PackageManager::Bun)),
        ToolchainKind::Script => Box::new(ScriptToolchain::new(
            settings.install.clone().unwrap_or_default(),
            settings.build.clone(),
        )),
    }
}
