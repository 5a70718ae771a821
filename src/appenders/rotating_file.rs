//! Rotating file appender with automatic log rotation
//!
//! The active file is rotated when the next line would push it past the size
//! limit. Rotated files are kept as numbered backups next to it
//! (`app.log.1` is the newest), optionally gzip-compressed (`app.log.1.gz`),
//! and pruned by count and by age.

use crate::core::appender::Appender;
use crate::core::config::RotationConfig;
use crate::core::error::{LoggerError, Result};
use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

const MEGABYTE: u64 = 1024 * 1024;
const DEFAULT_MAX_SIZE_MB: u64 = 100;
const SECONDS_PER_DAY: u64 = 24 * 60 * 60;

/// When to rotate and what to keep afterwards
///
/// # Examples
///
/// ```
/// use leveled_logger::appenders::RotationPolicy;
/// use std::time::Duration;
///
/// let policy = RotationPolicy::new()
///     .with_max_size(50 * 1024 * 1024)
///     .with_max_backups(7)
///     .with_max_age(Duration::from_secs(14 * 24 * 3600))
///     .with_compression(true);
/// assert_eq!(policy.max_backups(), 7);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RotationPolicy {
    max_bytes: u64,
    max_backups: usize,
    max_age: Option<Duration>,
    compress: bool,
}

impl Default for RotationPolicy {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_SIZE_MB * MEGABYTE,
            max_backups: 0,
            max_age: None,
            compress: false,
        }
    }
}

impl RotationPolicy {
    /// 100 MB files, every backup kept, no age limit, no compression
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Size limit of the active file in bytes; `0` restores the default
    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_size(mut self, bytes: u64) -> Self {
        self.max_bytes = if bytes == 0 {
            DEFAULT_MAX_SIZE_MB * MEGABYTE
        } else {
            bytes
        };
        self
    }

    /// Number of backups to retain; `0` keeps all of them
    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_backups(mut self, count: usize) -> Self {
        self.max_backups = count;
        self
    }

    /// Delete backups last modified longer ago than `age`
    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_age(mut self, age: Duration) -> Self {
        self.max_age = Some(age);
        self
    }

    /// Gzip backups right after they are rotated out
    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_compression(mut self, enabled: bool) -> Self {
        self.compress = enabled;
        self
    }

    #[must_use]
    pub fn max_file_size(&self) -> u64 {
        self.max_bytes
    }

    #[must_use]
    pub fn max_backups(&self) -> usize {
        self.max_backups
    }

    #[must_use]
    pub fn max_age(&self) -> Option<Duration> {
        self.max_age
    }

    #[must_use]
    pub fn compress(&self) -> bool {
        self.compress
    }
}

impl From<&RotationConfig> for RotationPolicy {
    fn from(config: &RotationConfig) -> Self {
        let mut policy = RotationPolicy::new()
            .with_max_size(config.max_size_mb.saturating_mul(MEGABYTE))
            .with_max_backups(config.max_backups)
            .with_compression(config.compress);
        if config.max_age_days > 0 {
            policy = policy.with_max_age(Duration::from_secs(
                config.max_age_days.saturating_mul(SECONDS_PER_DAY),
            ));
        }
        policy
    }
}

/// File appender that rotates by size and prunes backups by count and age
///
/// # Examples
///
/// ```no_run
/// use leveled_logger::appenders::{RotatingFileAppender, RotationPolicy};
///
/// let policy = RotationPolicy::new()
///     .with_max_size(10 * 1024 * 1024)
///     .with_max_backups(5)
///     .with_compression(true);
/// let appender = RotatingFileAppender::with_policy("/var/log/app.log", policy).unwrap();
/// ```
pub struct RotatingFileAppender {
    base_path: PathBuf,
    policy: RotationPolicy,
    writer: Option<File>,
    current_size: u64,
}

impl RotatingFileAppender {
    /// Create a new rotating file appender with the default policy
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be created or opened
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::with_policy(path, RotationPolicy::default())
    }

    /// Create a new rotating file appender with custom policy
    ///
    /// # Errors
    ///
    /// Returns error if the parent directory or the file cannot be created
    pub fn with_policy<P: AsRef<Path>>(path: P, policy: RotationPolicy) -> Result<Self> {
        let base_path = path.as_ref().to_path_buf();

        if let Some(parent) = base_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                LoggerError::io_operation(
                    "create log directory",
                    format!("Failed to create directory '{}'", parent.display()),
                    e,
                )
            })?;
        }

        let (file, current_size) = Self::open_file(&base_path)?;

        Ok(Self {
            base_path,
            policy,
            writer: Some(file),
            current_size,
        })
    }

    fn open_file(path: &Path) -> Result<(File, u64)> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| {
                LoggerError::file_appender(
                    path.display().to_string(),
                    format!("Failed to open: {}", e),
                )
            })?;

        let size = file
            .metadata()
            .map_err(|e| {
                LoggerError::file_appender(
                    path.display().to_string(),
                    format!("Cannot access file metadata: {}", e),
                )
            })?
            .len();

        Ok((file, size))
    }

    /// Rotate before a write of `incoming` bytes would exceed the limit
    fn should_rotate(&self, incoming: u64) -> bool {
        self.current_size > 0
            && self.current_size.saturating_add(incoming) > self.policy.max_bytes
    }

    /// Perform log rotation
    fn rotate(&mut self) -> Result<()> {
        // Drop the handle before renaming the file underneath it
        if let Some(mut writer) = self.writer.take() {
            writer.flush().map_err(|e| {
                LoggerError::file_rotation(
                    self.base_path.display().to_string(),
                    format!("Failed to flush before rotation: {}", e),
                )
            })?;
        }

        self.shift_backups()?;

        let backup_path = self.backup_path(1);
        if self.base_path.exists() {
            fs::rename(&self.base_path, &backup_path).map_err(|e| {
                LoggerError::file_rotation(
                    self.base_path.display().to_string(),
                    format!("Failed to rotate current log file: {}", e),
                )
            })?;

            if self.policy.compress {
                self.compress_file(&backup_path)?;
            }
        }

        let (file, size) = Self::open_file(&self.base_path).map_err(|e| {
            LoggerError::file_rotation(
                self.base_path.display().to_string(),
                format!("Failed to create new log file: {}", e),
            )
        })?;
        self.writer = Some(file);
        self.current_size = size;

        self.prune_expired_backups();

        Ok(())
    }

    /// Move `N` to `N+1` for every existing backup, newest last, deleting
    /// those that would fall beyond `max_backups`
    fn shift_backups(&self) -> Result<()> {
        let mut indices: Vec<usize> = self.existing_backups().into_iter().map(|(i, _)| i).collect();
        indices.sort_unstable();
        indices.dedup();

        for index in indices.into_iter().rev() {
            let old_plain = self.backup_path(index);
            let old_gz = gz_path(&old_plain);

            if self.policy.max_backups != 0 && index >= self.policy.max_backups {
                remove_backup(&old_plain);
                remove_backup(&old_gz);
                continue;
            }

            let new_plain = self.backup_path(index + 1);
            for (from, to) in [(old_gz, gz_path(&new_plain)), (old_plain, new_plain)] {
                if !from.exists() {
                    continue;
                }
                if let Err(first) = fs::rename(&from, &to) {
                    // Some platforms refuse to rename over an existing file
                    if to.exists() {
                        let _ = fs::remove_file(&to);
                    }
                    fs::rename(&from, &to).map_err(|e| {
                        LoggerError::file_rotation(
                            from.display().to_string(),
                            format!("Failed to rotate backup files: {} (first attempt: {})", e, first),
                        )
                    })?;
                }
            }
        }

        Ok(())
    }

    fn prune_expired_backups(&self) {
        let Some(max_age) = self.policy.max_age else {
            return;
        };
        let Some(cutoff) = SystemTime::now().checked_sub(max_age) else {
            return;
        };

        for (_, path) in self.existing_backups() {
            let expired = fs::metadata(&path)
                .and_then(|m| m.modified())
                .map(|modified| modified < cutoff)
                .unwrap_or(false);
            if expired {
                remove_backup(&path);
            }
        }
    }

    /// Backups next to the active file as `(index, path)`, compressed or not
    fn existing_backups(&self) -> Vec<(usize, PathBuf)> {
        let dir = match self.base_path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let prefix = format!("{}.", self.file_name());

        let Ok(entries) = fs::read_dir(&dir) else {
            return Vec::new();
        };

        entries
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| {
                let name = entry.file_name().into_string().ok()?;
                let suffix = name.strip_prefix(&prefix)?;
                let index = suffix.strip_suffix(".gz").unwrap_or(suffix);
                let index: usize = index.parse().ok()?;
                (index > 0).then(|| (index, entry.path()))
            })
            .collect()
    }

    fn file_name(&self) -> String {
        self.base_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("app.log")
            .to_string()
    }

    /// Get backup file path for given index
    fn backup_path(&self, index: usize) -> PathBuf {
        let mut path = self.base_path.clone();
        path.set_file_name(format!("{}.{}", self.file_name(), index));
        path
    }

    /// Gzip `path` into `path.gz`, removing the original only once the
    /// compressed file is complete
    fn compress_file(&self, path: &Path) -> Result<()> {
        let gz = gz_path(path);
        let mut temp_name = gz.clone().into_os_string();
        temp_name.push(".tmp");
        let temp_gz = PathBuf::from(temp_name);

        let input = File::open(path).map_err(|e| {
            LoggerError::io_operation(
                "compress log file",
                format!("Failed to open file for compression: {}", path.display()),
                e,
            )
        })?;
        let mut reader = BufReader::with_capacity(64 * 1024, input);

        let output = File::create(&temp_gz).map_err(|e| {
            LoggerError::io_operation(
                "compress log file",
                format!("Failed to create temporary compressed file: {}", temp_gz.display()),
                e,
            )
        })?;
        let mut encoder = flate2::write::GzEncoder::new(
            BufWriter::with_capacity(64 * 1024, output),
            flate2::Compression::default(),
        );

        let streamed = std::io::copy(&mut reader, &mut encoder)
            .and_then(|_| encoder.finish())
            .and_then(|mut inner| inner.flush());
        if let Err(e) = streamed {
            let _ = fs::remove_file(&temp_gz);
            return Err(LoggerError::io_operation(
                "compress log file",
                format!("Failed to compress {}", path.display()),
                e,
            ));
        }

        fs::rename(&temp_gz, &gz).map_err(|e| {
            let _ = fs::remove_file(&temp_gz);
            LoggerError::io_operation(
                "compress log file",
                format!("Failed to rename compressed file to: {}", gz.display()),
                e,
            )
        })?;

        if let Err(e) = fs::remove_file(path) {
            eprintln!(
                "[WARN] Compression succeeded but failed to remove original file {}: {}",
                path.display(),
                e
            );
        }

        Ok(())
    }

    /// Get current file size
    #[must_use]
    pub fn current_size(&self) -> u64 {
        self.current_size
    }

    /// Get base path
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.base_path
    }

    /// Get rotation policy
    #[must_use]
    pub fn policy(&self) -> &RotationPolicy {
        &self.policy
    }
}

fn gz_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".gz");
    PathBuf::from(name)
}

fn remove_backup(path: &Path) {
    if !path.exists() {
        return;
    }
    if let Err(e) = fs::remove_file(path) {
        eprintln!("[WARN] Failed to remove old backup {}: {}", path.display(), e);
    }
}

impl Appender for RotatingFileAppender {
    fn name(&self) -> &str {
        "rotating_file"
    }

    fn append(&mut self, line: &[u8]) -> Result<()> {
        let incoming = line.len() as u64;

        if self.should_rotate(incoming) {
            if let Err(e) = self.rotate() {
                eprintln!(
                    "[WARN] Log rotation failed: {}. Continuing with current file.",
                    e
                );

                if self.writer.is_none() {
                    match Self::open_file(&self.base_path) {
                        Ok((file, _)) => self.writer = Some(file),
                        Err(reopen_err) => {
                            eprintln!(
                                "[ERROR] Failed to reopen log file after rotation failure: {}",
                                reopen_err
                            );
                            return Err(e);
                        }
                    }
                }

                // Let the file grow past the limit instead of retrying every line
                self.current_size = 0;
            }
        }

        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| LoggerError::writer("Writer not initialized"))?;

        writer.write_all(line).map_err(|e| {
            LoggerError::file_appender(
                self.base_path.display().to_string(),
                format!("Failed to write log entry: {}", e),
            )
        })?;
        self.current_size += incoming;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        if let Some(ref mut writer) = self.writer {
            writer.flush().map_err(|e| {
                LoggerError::file_appender(
                    self.base_path.display().to_string(),
                    format!("Failed to flush: {}", e),
                )
            })?;
        }
        Ok(())
    }
}
