use dirs::home_dir;
use std::{
    env, fs,
    path::{Path, PathBuf},
};

use crate::errors::Result;

pub const HOME_ENV: &str = "SMARTLEDGER_HOME";
const DEFAULT_DIR_NAME: &str = ".smartledger";
const DATA_DIR: &str = "data";
const BACKUP_DIR: &str = "backups";
const CONFIG_FILE: &str = "config.json";

/// Resolves every on-disk location relative to one base directory.
pub struct PathResolver;

impl PathResolver {
    /// `$SMARTLEDGER_HOME`, falling back to `~/.smartledger`.
    pub fn base_dir() -> PathBuf {
        if let Some(custom) = env::var_os(HOME_ENV) {
            return PathBuf::from(custom);
        }
        home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(DEFAULT_DIR_NAME)
    }

    /// An explicit base wins over the environment.
    pub fn resolve_base(explicit: Option<PathBuf>) -> PathBuf {
        explicit.unwrap_or_else(Self::base_dir)
    }

    pub fn data_dir_in(base: &Path) -> PathBuf {
        base.join(DATA_DIR)
    }

    pub fn backup_dir_in(base: &Path) -> PathBuf {
        base.join(BACKUP_DIR)
    }

    pub fn config_file_in(base: &Path) -> PathBuf {
        base.join(CONFIG_FILE)
    }

    /// Relative report directories hang off the base; absolute ones are used as-is.
    pub fn reports_dir_in(base: &Path, reports_dir: &str) -> PathBuf {
        let candidate = Path::new(reports_dir);
        if candidate.is_absolute() {
            candidate.to_path_buf()
        } else {
            base.join(candidate)
        }
    }
}

pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}
