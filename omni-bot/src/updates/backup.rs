//! Working-tree snapshots taken before an update.
//!
//! A backup is a plain directory copy named `omnicore_backup_YYYYmmdd_HHMMSS` (with a `_n`
//! suffix when two land in the same second). Build output, VCS metadata, logs and the
//! backups themselves are left out.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;
use tracing::{error, info, warn};

use super::UpdateError;

pub const BACKUP_PREFIX: &str = "omnicore_backup_";

/// Directory names never copied into a snapshot, at any depth.
pub const EXCLUDED_DIRS: &[&str] = &[".git", "target", "backups", "logs", "repo_cache"];

const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

#[derive(Debug, Clone, Serialize)]
pub struct BackupInfo {
    pub name: String,
    pub path: PathBuf,
    pub created_at: DateTime<Utc>,
    pub size_bytes: u64,
    #[serde(skip)]
    sequence: u32,
}

#[derive(Debug, Clone)]
pub struct BackupManager {
    source_dir: PathBuf,
    backup_dir: PathBuf,
    max_backups: usize,
}

impl BackupManager {
    /// Snapshots `source_dir` into `backup_dir`, keeping at most `max_backups` snapshots.
    pub fn new(
        source_dir: impl Into<PathBuf>,
        backup_dir: impl Into<PathBuf>,
        max_backups: usize,
    ) -> Self {
        Self {
            source_dir: source_dir.into(),
            backup_dir: backup_dir.into(),
            max_backups: max_backups.max(1),
        }
    }

    pub fn backup_dir(&self) -> &Path {
        &self.backup_dir
    }

    /// Copies the working tree to a new snapshot and prunes old ones.
    pub fn create_backup(&self) -> Result<BackupInfo, UpdateError> {
        let info = self.snapshot()?;
        self.cleanup_old_backups()?;
        Ok(info)
    }

    fn snapshot(&self) -> Result<BackupInfo, UpdateError> {
        fs::create_dir_all(&self.backup_dir)?;
        let now = Utc::now();
        let base = format!("{}{}", BACKUP_PREFIX, now.format(TIMESTAMP_FORMAT));

        let mut name = base.clone();
        let mut n = 1;
        while self.backup_dir.join(&name).exists() {
            name = format!("{}_{}", base, n);
            n += 1;
        }
        let path = self.backup_dir.join(&name);

        if let Err(e) = self.copy_tree(&self.source_dir, &path) {
            error!(error = %e, path = %path.display(), "Backup creation failed");
            if path.exists() {
                let _ = fs::remove_dir_all(&path);
            }
            return Err(UpdateError::Backup(format!("copy failed: {}", e)));
        }

        info!(path = %path.display(), "Backup created");
        parse_info(&path).ok_or_else(|| UpdateError::Backup(format!("bad backup name {}", name)))
    }

    /// Copies `src` to `dst`, skipping excluded names and the backup directory itself.
    fn copy_tree(&self, src: &Path, dst: &Path) -> std::io::Result<()> {
        let backup_dir = self.backup_dir.canonicalize().ok();
        fs::create_dir_all(dst)?;
        for entry in fs::read_dir(src)? {
            let entry = entry?;
            let src_path = entry.path();
            let file_name = entry.file_name();
            let ty = entry.file_type()?;
            if ty.is_dir() {
                if EXCLUDED_DIRS.iter().any(|d| file_name == *d) {
                    continue;
                }
                if backup_dir.is_some() && src_path.canonicalize().ok() == backup_dir {
                    continue;
                }
                self.copy_tree(&src_path, &dst.join(&file_name))?;
            } else if ty.is_file() {
                fs::copy(&src_path, dst.join(&file_name))?;
            }
        }
        Ok(())
    }

    /// Copies a snapshot back over the working tree. A safety snapshot is taken first and
    /// copied back if the restore fails. Files absent from the snapshot are left in place.
    /// No cleanup runs here, so the restored snapshot survives even with `max_backups` of 1.
    pub fn restore_backup(&self, backup_path: &Path) -> Result<(), UpdateError> {
        if !backup_path.is_dir() {
            return Err(UpdateError::Backup(format!(
                "backup not found: {}",
                backup_path.display()
            )));
        }

        let safety = self.snapshot()?;
        info!(safety = %safety.path.display(), "Created safety backup before restore");

        if let Err(e) = copy_dir_all(backup_path, &self.source_dir) {
            error!(error = %e, "Restore failed, reverting to safety backup");
            if let Err(revert) = copy_dir_all(&safety.path, &self.source_dir) {
                error!(error = %revert, "Failed to revert to safety backup");
            }
            return Err(UpdateError::Backup(format!("restore failed: {}", e)));
        }

        info!(backup = %backup_path.display(), "System restored from backup");
        Ok(())
    }

    /// Backups, newest first.
    pub fn list_backups(&self) -> Result<Vec<BackupInfo>, UpdateError> {
        if !self.backup_dir.is_dir() {
            return Ok(Vec::new());
        }
        let mut backups = Vec::new();
        for entry in fs::read_dir(&self.backup_dir)? {
            let path = entry?.path();
            if !path.is_dir() {
                continue;
            }
            match parse_info(&path) {
                Some(info) => backups.push(info),
                None => warn!(path = %path.display(), "Ignoring unrecognised entry in backup dir"),
            }
        }
        backups.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then(b.sequence.cmp(&a.sequence))
        });
        Ok(backups)
    }

    /// Removes a snapshot. Returns false when it does not exist.
    pub fn delete_backup(&self, backup_path: &Path) -> Result<bool, UpdateError> {
        if !backup_path.starts_with(&self.backup_dir) {
            return Err(UpdateError::Backup(
                "backup path outside backup directory".to_string(),
            ));
        }
        if !backup_path.exists() {
            warn!(path = %backup_path.display(), "Backup not found for deletion");
            return Ok(false);
        }
        fs::remove_dir_all(backup_path)?;
        info!(path = %backup_path.display(), "Deleted backup");
        Ok(true)
    }

    /// Bytes used by all snapshots.
    pub fn total_size(&self) -> Result<u64, UpdateError> {
        Ok(self.list_backups()?.iter().map(|b| b.size_bytes).sum())
    }

    /// A snapshot is usable when it is a readable, non-empty directory.
    pub fn verify_backup(&self, backup_path: &Path) -> bool {
        let Ok(mut entries) = fs::read_dir(backup_path) else {
            return false;
        };
        if entries.next().is_none() {
            warn!(path = %backup_path.display(), "Backup is empty");
            return false;
        }
        if !backup_path.join("Cargo.toml").is_file() {
            warn!(path = %backup_path.display(), "Backup has no Cargo.toml");
        }
        true
    }

    /// Deletes snapshots beyond `max_backups`, oldest first. Returns how many were removed.
    pub fn cleanup_old_backups(&self) -> Result<usize, UpdateError> {
        let backups = self.list_backups()?;
        let mut removed = 0;
        for old in backups.into_iter().skip(self.max_backups) {
            if self.delete_backup(&old.path)? {
                info!(name = %old.name, "Cleaned up old backup");
                removed += 1;
            }
        }
        Ok(removed)
    }
}

fn parse_info(path: &Path) -> Option<BackupInfo> {
    let name = path.file_name()?.to_str()?.to_string();
    let rest = name.strip_prefix(BACKUP_PREFIX)?;
    let stamp = rest.get(..15)?;
    let created_at = NaiveDateTime::parse_from_str(stamp, TIMESTAMP_FORMAT)
        .ok()?
        .and_utc();
    let sequence = match rest.get(15..) {
        None | Some("") => 0,
        Some(suffix) => suffix.strip_prefix('_')?.parse().ok()?,
    };
    Some(BackupInfo {
        size_bytes: dir_size(path),
        path: path.to_path_buf(),
        name,
        created_at,
        sequence,
    })
}

fn dir_size(path: &Path) -> u64 {
    let mut total = 0u64;
    if let Ok(entries) = fs::read_dir(path) {
        for entry in entries.flatten() {
            let p = entry.path();
            if p.is_file() {
                total += entry.metadata().map(|m| m.len()).unwrap_or(0);
            } else if p.is_dir() {
                total += dir_size(&p);
            }
        }
    }
    total
}

fn copy_dir_all(src: &Path, dst: &Path) -> std::io::Result<()> {
    fs::create_dir_all(dst)?;
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let ty = entry.file_type()?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());
        if ty.is_dir() {
            copy_dir_all(&src_path, &dst_path)?;
        } else {
            fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn workspace() -> (tempfile::TempDir, BackupManager) {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("Cargo.toml"), "[workspace]\n").unwrap();
        fs::create_dir_all(root.join("src")).unwrap();
        fs::write(root.join("src/main.rs"), "fn main() {}\n").unwrap();
        fs::create_dir_all(root.join("target/debug")).unwrap();
        fs::write(root.join("target/debug/big.bin"), vec![0u8; 64]).unwrap();
        fs::create_dir_all(root.join(".git")).unwrap();
        fs::write(root.join(".git/HEAD"), "ref: refs/heads/main\n").unwrap();
        let manager = BackupManager::new(root, root.join("backups"), 3);
        (dir, manager)
    }

    #[test]
    fn test_create_backup_skips_excluded_dirs() {
        let (_dir, manager) = workspace();
        let info = manager.create_backup().unwrap();

        assert!(info.name.starts_with(BACKUP_PREFIX));
        assert!(info.path.join("Cargo.toml").is_file());
        assert!(info.path.join("src/main.rs").is_file());
        assert!(!info.path.join("target").exists());
        assert!(!info.path.join(".git").exists());
        assert!(!info.path.join("backups").exists());
        assert!(manager.verify_backup(&info.path));
    }

    #[test]
    fn test_same_second_backups_get_suffix_and_sort_newest_first() {
        let (_dir, manager) = workspace();
        let first = manager.create_backup().unwrap();
        let second = manager.create_backup().unwrap();
        assert_ne!(first.name, second.name);

        let list = manager.list_backups().unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].name, second.name);
        assert_eq!(list[1].name, first.name);
    }

    #[test]
    fn test_cleanup_keeps_max_backups() {
        let (_dir, manager) = workspace();
        for _ in 0..5 {
            manager.create_backup().unwrap();
        }
        assert_eq!(manager.list_backups().unwrap().len(), 3);
        assert!(manager.total_size().unwrap() > 0);
    }

    #[test]
    fn test_restore_round_trip() {
        let (dir, manager) = workspace();
        let info = manager.create_backup().unwrap();

        fs::write(dir.path().join("src/main.rs"), "broken").unwrap();
        manager.restore_backup(&info.path).unwrap();

        let restored = fs::read_to_string(dir.path().join("src/main.rs")).unwrap();
        assert_eq!(restored, "fn main() {}\n");
    }

    #[test]
    fn test_restore_keeps_snapshot_with_single_backup_limit() {
        let (dir, _) = workspace();
        let manager = BackupManager::new(dir.path(), dir.path().join("backups"), 1);
        let info = manager.create_backup().unwrap();

        manager.restore_backup(&info.path).unwrap();

        assert!(info.path.is_dir());
        assert_eq!(manager.list_backups().unwrap().len(), 2);
    }

    #[test]
    fn test_restore_missing_backup_fails() {
        let (dir, manager) = workspace();
        let missing = dir.path().join("backups/omnicore_backup_20000101_000000");
        assert!(manager.restore_backup(&missing).is_err());
    }

    #[test]
    fn test_delete_backup_outside_dir_is_rejected() {
        let (dir, manager) = workspace();
        assert!(manager.delete_backup(&dir.path().join("src")).is_err());
        let missing = manager.backup_dir().join("omnicore_backup_20000101_000000");
        assert!(!manager.delete_backup(&missing).unwrap());
    }

    #[test]
    fn test_verify_backup_rejects_missing_and_empty() {
        let (dir, manager) = workspace();
        assert!(!manager.verify_backup(&dir.path().join("nope")));
        let empty = dir.path().join("empty");
        fs::create_dir_all(&empty).unwrap();
        assert!(!manager.verify_backup(&empty));
    }
}
