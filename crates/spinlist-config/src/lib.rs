mod backend;
mod io;
mod paths;

pub use backend::{ConfigBackend, TomlConfigBackend};
pub use paths::{ConfigError, SpinlistPaths};

use once_cell::sync::Lazy;

// Process-wide paths (env override or platform dirs)
pub static PATHS: Lazy<SpinlistPaths> = Lazy::new(|| SpinlistPaths::new().expect("failed to init SpinlistPaths"));

// Process-wide config backend over `spinlist.toml`
pub static CONFIG_BACKEND: Lazy<TomlConfigBackend> = Lazy::new(|| TomlConfigBackend::new(PATHS.clone()));
