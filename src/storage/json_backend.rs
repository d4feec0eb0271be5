use chrono::{DateTime, NaiveDateTime, Utc};
use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};
use tracing::{debug, warn};

use crate::{
    core::utils::{ensure_dir, PathResolver},
    errors::BookError,
};

use super::{DocumentStore, Result};

const DOCUMENT_EXTENSION: &str = "json";
const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
const TMP_SUFFIX: &str = "tmp";
pub const DEFAULT_RETENTION: usize = 5;

/// One pretty-printed JSON file per document under `<base>/data`, with rotating
/// timestamped copies of the previous version under `<base>/backups/<document>`.
#[derive(Debug, Clone)]
pub struct JsonStorage {
    root: PathBuf,
    data_dir: PathBuf,
    backups_dir: PathBuf,
    retention: usize,
}

impl JsonStorage {
    pub fn new(root: Option<PathBuf>, retention: Option<usize>) -> Result<Self> {
        let app_root = PathResolver::resolve_base(root);
        ensure_dir(&app_root)?;
        let data_dir = PathResolver::data_dir_in(&app_root);
        let backups_dir = PathResolver::backup_dir_in(&app_root);
        ensure_dir(&data_dir)?;
        ensure_dir(&backups_dir)?;
        Ok(Self {
            root: app_root,
            data_dir,
            backups_dir,
            retention: retention.unwrap_or(DEFAULT_RETENTION).max(1),
        })
    }

    pub fn base_dir(&self) -> &Path {
        &self.root
    }

    pub fn document_path(&self, name: &str) -> PathBuf {
        self.data_dir
            .join(format!("{}.{}", canonical_name(name), DOCUMENT_EXTENSION))
    }

    fn backup_dir(&self, name: &str) -> PathBuf {
        self.backups_dir.join(canonical_name(name))
    }

    pub fn backup_path(&self, name: &str, backup_name: &str) -> PathBuf {
        self.backup_dir(name).join(backup_name)
    }

    fn backup_existing_file(&self, name: &str, path: &Path) -> Result<()> {
        if !path.exists() {
            return Ok(());
        }
        let dir = self.backup_dir(name);
        ensure_dir(&dir)?;
        let timestamp = Utc::now().format(BACKUP_TIMESTAMP_FORMAT).to_string();
        let backup_name = format!(
            "{}_{}.{}",
            canonical_name(name),
            timestamp,
            DOCUMENT_EXTENSION
        );
        fs::copy(path, dir.join(&backup_name))?;
        self.prune_backups(name)?;
        Ok(())
    }

    fn prune_backups(&self, name: &str) -> Result<()> {
        let backups = self.list_backups(name)?;
        for entry in backups.iter().skip(self.retention) {
            let path = self.backup_path(name, entry);
            if let Err(err) = fs::remove_file(&path) {
                warn!(path = %path.display(), error = %err, "failed to prune backup");
            }
        }
        Ok(())
    }

    /// Publishes staged temp files once every live document has a backup.
    fn commit_staged(&self, staged: &[(&str, PathBuf)]) -> Result<()> {
        for (name, _) in staged {
            if let Err(err) = self.backup_existing_file(name, &self.document_path(name)) {
                discard_staged(staged);
                return Err(err);
            }
        }
        for (name, tmp) in staged {
            fs::rename(tmp, self.document_path(name))?;
            debug!(document = *name, "document written");
        }
        Ok(())
    }
}

impl DocumentStore for JsonStorage {
    fn read(&self, name: &str) -> Result<Option<String>> {
        let path = self.document_path(name);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(path)?))
    }

    fn write(&self, name: &str, contents: &str) -> Result<()> {
        self.save_batch(&[(name, contents.to_string())])
    }

    /// Stages every document as a temp file, then backs up every live document; nothing
    /// live is touched unless both phases succeeded for all of them.
    fn save_batch(&self, documents: &[(&str, String)]) -> Result<()> {
        let mut staged = Vec::with_capacity(documents.len());
        for (name, contents) in documents {
            let tmp = tmp_path(&self.document_path(name));
            if let Err(err) = write_atomic(&tmp, contents) {
                discard_staged(&staged);
                let _ = fs::remove_file(&tmp);
                return Err(err);
            }
            staged.push((*name, tmp));
        }
        self.commit_staged(&staged)
    }

    /// Restores a backup over the live document and returns its contents.
    fn restore(&self, name: &str, backup_name: &str) -> Result<String> {
        if backup_name.contains(&['/', '\\'][..]) || backup_name.starts_with('.') {
            return Err(BookError::invalid(format!(
                "`{backup_name}` is not a backup name"
            )));
        }
        let backup_path = self.backup_path(name, backup_name);
        if !backup_path.is_file() {
            return Err(BookError::not_found(format!(
                "backup `{backup_name}` of '{name}' does not exist"
            )));
        }
        let contents = fs::read_to_string(&backup_path)?;
        self.write(name, &contents)?;
        Ok(contents)
    }

    fn list_backups(&self, name: &str) -> Result<Vec<String>> {
        let dir = self.backup_dir(name);
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let mut entries = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(DOCUMENT_EXTENSION) {
                continue;
            }
            if let Some(file_name) = path.file_name().and_then(|stem| stem.to_str()) {
                entries.push(file_name.to_string());
            }
        }
        entries.sort_by(|a, b| {
            parse_backup_timestamp(b)
                .cmp(&parse_backup_timestamp(a))
                .then_with(|| b.cmp(a))
        });
        Ok(entries)
    }
}

fn discard_staged(staged: &[(&str, PathBuf)]) {
    for (_, tmp) in staged {
        let _ = fs::remove_file(tmp);
    }
}

fn canonical_name(name: &str) -> String {
    let sanitized: String = name
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'a'..='z' | '0'..='9' => c,
            _ => '_',
        })
        .collect();
    if sanitized.trim_matches('_').is_empty() {
        "document".into()
    } else {
        sanitized
    }
}

fn parse_backup_timestamp(name: &str) -> Option<DateTime<Utc>> {
    let stem = name.strip_suffix(".json")?;
    let mut parts = stem.rsplitn(3, '_');
    let time_part = parts.next()?;
    let date_part = parts.next()?;
    if !is_digits(date_part, 8) || !is_digits(time_part, 6) {
        return None;
    }
    NaiveDateTime::parse_from_str(&format!("{date_part}{time_part}"), "%Y%m%d%H%M%S")
        .ok()
        .map(|naive| DateTime::from_naive_utc_and_offset(naive, Utc))
}

fn is_digits(value: &str, len: usize) -> bool {
    value.len() == len && value.chars().all(|c| c.is_ascii_digit())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.sync_all()?;
    Ok(())
}
