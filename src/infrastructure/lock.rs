//! File Run Lock
//!
//! Advisory per-environment lock at `.deploy/locks/<env>.lock`, held with
//! `fs2` for the lifetime of the guard. The file body names the holder so a
//! second run can report who is deploying.

use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;
use fs2::FileExt;

use crate::config::STATE_DIR;
use crate::domain::ports::{LockError, LockGuard, RunLock};
use crate::domain::value_objects::Environment;

pub struct FileRunLock {
    dir: PathBuf,
}

impl FileRunLock {
    pub fn new(project_root: &Path) -> Self {
        Self {
            dir: project_root.join(STATE_DIR).join("locks"),
        }
    }

    pub fn lock_path(&self, environment: Environment) -> PathBuf {
        self.dir.join(format!("{}.lock", environment.as_str()))
    }
}

struct FileLockGuard {
    file: File,
}

impl LockGuard for FileLockGuard {}

impl Drop for FileLockGuard {
    fn drop(&mut self) {
        let _ = self.file.set_len(0);
        let _ = self.file.unlock();
    }
}

fn access(e: std::io::Error) -> LockError {
    LockError::Access(e.to_string())
}

impl RunLock for FileRunLock {
    fn acquire(&self, environment: Environment) -> Result<Box<dyn LockGuard>, LockError> {
        fs::create_dir_all(&self.dir).map_err(access)?;
        let path = self.lock_path(environment);

        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
            .map_err(access)?;

        if let Err(e) = file.try_lock_exclusive() {
            if e.kind() == fs2::lock_contended_error().kind() {
                let mut holder = String::new();
                let _ = file.read_to_string(&mut holder);
                let holder = holder.trim();
                return Err(LockError::Held {
                    holder: if holder.is_empty() {
                        "another process".to_string()
                    } else {
                        holder.to_string()
                    },
                });
            }
            return Err(access(e));
        }

        file.set_len(0).map_err(access)?;
        file.seek(SeekFrom::Start(0)).map_err(access)?;
        write!(
            file,
            "pid {} since {}",
            std::process::id(),
            Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
        )
        .map_err(access)?;
        file.flush().map_err(access)?;

        Ok(Box::new(FileLockGuard { file }))
    }
}
