use anyhow::Context;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

// Guards against two screening runs writing into the same output directory at once.
const LOCK_FILE_NAME: &str = ".run.lock";

/// Holds `.run.lock` until dropped. The file carries the holder's PID so a lock left behind by
/// a killed run can be reclaimed.
#[derive(Debug)]
pub struct RunLock {
    path: PathBuf,
}

impl Drop for RunLock {
    fn drop(&mut self) {
        if let Err(err) = std::fs::remove_file(&self.path) {
            tracing::warn!(path = %self.path.display(), error = %err, "failed to release run lock");
        }
    }
}

/// Returns `Ok(None)` when a live process already holds the lock.
pub fn try_acquire_run_lock(dir: &Path) -> anyhow::Result<Option<RunLock>> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create output dir {}", dir.display()))?;

    let path = dir.join(LOCK_FILE_NAME);
    if let Some(lock) = create_lock_file(&path)? {
        return Ok(Some(lock));
    }

    match read_holder_pid(&path) {
        Some(pid) if !process_alive(pid) => {
            tracing::warn!(path = %path.display(), pid, "reclaiming run lock left by a dead process");
            match std::fs::remove_file(&path) {
                Ok(()) => {}
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
                Err(err) => {
                    return Err(err).with_context(|| {
                        format!("failed to remove stale run lock {}", path.display())
                    });
                }
            }
            create_lock_file(&path)
        }
        // Unreadable or empty: the holder may still be writing its PID.
        _ => Ok(None),
    }
}

fn create_lock_file(path: &Path) -> anyhow::Result<Option<RunLock>> {
    let mut file = match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(f) => f,
        Err(err) if err.kind() == std::io::ErrorKind::AlreadyExists => return Ok(None),
        Err(err) => {
            return Err(err)
                .with_context(|| format!("failed to acquire run lock {}", path.display()));
        }
    };

    // Constructed before the write so a failed write still removes the file.
    let lock = RunLock {
        path: path.to_path_buf(),
    };
    writeln!(file, "{}", std::process::id())
        .and_then(|()| file.sync_all())
        .with_context(|| format!("failed to write run lock {}", path.display()))?;

    Ok(Some(lock))
}

fn read_holder_pid(path: &Path) -> Option<u32> {
    std::fs::read_to_string(path).ok()?.trim().parse().ok()
}

#[cfg(unix)]
fn process_alive(pid: u32) -> bool {
    let Ok(pid) = libc::pid_t::try_from(pid) else {
        return false;
    };
    if pid <= 0 {
        return false;
    }
    // Signal 0 only checks that the process exists and may be signalled.
    let rc = unsafe { libc::kill(pid, 0) };
    rc == 0 || std::io::Error::last_os_error().raw_os_error() == Some(libc::EPERM)
}

#[cfg(not(unix))]
fn process_alive(_pid: u32) -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_acquire_fails_until_release() {
        let dir = tempfile::tempdir().unwrap();

        let first = try_acquire_run_lock(dir.path()).unwrap();
        assert!(first.is_some());
        assert!(try_acquire_run_lock(dir.path()).unwrap().is_none());

        drop(first);
        assert!(!dir.path().join(LOCK_FILE_NAME).exists());
        assert!(try_acquire_run_lock(dir.path()).unwrap().is_some());
    }

    #[test]
    fn lock_file_records_holder_pid() {
        let dir = tempfile::tempdir().unwrap();
        let _lock = try_acquire_run_lock(dir.path()).unwrap().unwrap();
        assert_eq!(
            read_holder_pid(&dir.path().join(LOCK_FILE_NAME)),
            Some(std::process::id())
        );
    }

    #[test]
    fn leaked_lock_of_live_process_is_still_held() {
        let dir = tempfile::tempdir().unwrap();
        std::mem::forget(try_acquire_run_lock(dir.path()).unwrap().unwrap());

        assert!(try_acquire_run_lock(dir.path()).unwrap().is_none());
        std::fs::remove_file(dir.path().join(LOCK_FILE_NAME)).unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn lock_left_by_dead_process_is_reclaimed() {
        let dir = tempfile::tempdir().unwrap();

        let mut child = std::process::Command::new("true").spawn().unwrap();
        let dead_pid = child.id();
        child.wait().unwrap();
        std::fs::write(dir.path().join(LOCK_FILE_NAME), format!("{dead_pid}\n")).unwrap();

        for _ in 0..3 {
            let lock = try_acquire_run_lock(dir.path()).unwrap();
            assert!(lock.is_some());
            assert_eq!(
                read_holder_pid(&dir.path().join(LOCK_FILE_NAME)),
                Some(std::process::id())
            );
        }
        assert!(!dir.path().join(LOCK_FILE_NAME).exists());
    }

    #[test]
    fn unreadable_lock_is_treated_as_held() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(LOCK_FILE_NAME), "").unwrap();
        assert!(try_acquire_run_lock(dir.path()).unwrap().is_none());
    }
}
