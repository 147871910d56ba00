//! Pipeline locations and worker count, from defaults then `ARMORY_*` env vars.

use std::env;
use std::path::PathBuf;

pub const DEFAULT_WEAPONS_DIR: &str = "data/weapons";
pub const DEFAULT_CHANGELOG: &str = "data/changelog.txt";
pub const DEFAULT_MATCHUPS: &str = "data/matchups.csv";

pub const WEAPONS_DIR_VAR: &str = "ARMORY_WEAPONS_DIR";
pub const CHANGELOG_VAR: &str = "ARMORY_CHANGELOG";
pub const MATCHUPS_VAR: &str = "ARMORY_MATCHUPS";
pub const WORKERS_VAR: &str = "ARMORY_WORKERS";
pub const WEIGHTS_VAR: &str = "ARMORY_WEIGHTS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    pub weapons_dir: PathBuf,
    pub changelog: PathBuf,
    pub matchups: PathBuf,
    /// 0 uses every core.
    pub workers: usize,
    /// YAML scoring weights. `None` scores with the built-in table.
    pub weights: Option<PathBuf>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            weapons_dir: PathBuf::from(DEFAULT_WEAPONS_DIR),
            changelog: PathBuf::from(DEFAULT_CHANGELOG),
            matchups: PathBuf::from(DEFAULT_MATCHUPS),
            workers: 0,
            weights: None,
        }
    }
}

impl PipelineConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each `ARMORY_*` key.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(dir) = lookup(WEAPONS_DIR_VAR) {
            config.weapons_dir = PathBuf::from(dir);
        }
        if let Some(path) = lookup(CHANGELOG_VAR) {
            config.changelog = PathBuf::from(path);
        }
        if let Some(path) = lookup(MATCHUPS_VAR) {
            config.matchups = PathBuf::from(path);
        }
        if let Some(path) = lookup(WEIGHTS_VAR) {
            config.weights = Some(PathBuf::from(path));
        }
        if let Some(raw) = lookup(WORKERS_VAR) {
            match raw.trim().parse::<usize>() {
                Ok(workers) => config.workers = workers,
                Err(_) => tracing::warn!(value = %raw, "invalid {WORKERS_VAR}, using all cores"),
            }
        }
        config
    }
}
