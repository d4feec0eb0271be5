use serde::{Deserialize, Serialize};
use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use crate::{
    core::utils::{ensure_dir, PathResolver},
    currency::{CurrencyFormat, NegativeStyle},
    errors::BookError,
};

const TMP_SUFFIX: &str = "tmp";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub backup_retention: usize,
    pub currency_symbol: String,
    pub negative_style: NegativeStyle,
    pub reports_dir: String,
    pub cash_account_hint: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backup_retention: 5,
            currency_symbol: "$".into(),
            negative_style: NegativeStyle::Sign,
            reports_dir: "reports".into(),
            cash_account_hint: "cash".into(),
        }
    }
}

impl Config {
    pub fn currency_format(&self) -> CurrencyFormat {
        CurrencyFormat {
            negative_style: self.negative_style,
            ..CurrencyFormat::with_symbol(self.currency_symbol.clone())
        }
    }
}

/// Reads and writes `config.json` under the data directory.
pub struct ConfigManager {
    base: PathBuf,
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self, BookError> {
        Self::with_base_dir(PathResolver::base_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self, BookError> {
        ensure_dir(&base)?;
        Ok(Self {
            path: PathResolver::config_file_in(&base),
            base,
        })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A missing file yields the defaults; a malformed one is an error.
    pub fn load(&self) -> Result<Config, BookError> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            Ok(serde_json::from_str(&data)?)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self, config: &Config) -> Result<(), BookError> {
        if let Some(parent) = self.path.parent() {
            ensure_dir(parent)?;
        }
        let json = serde_json::to_string_pretty(config)?;
        let tmp = self.path.with_extension(format!("json.{TMP_SUFFIX}"));
        let mut file = File::create(&tmp)?;
        file.write_all(json.as_bytes())?;
        file.flush()?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    /// Where rendered reports go for this configuration.
    pub fn reports_dir(&self, config: &Config) -> PathBuf {
        PathResolver::reports_dir_in(&self.base, &config.reports_dir)
    }
}
