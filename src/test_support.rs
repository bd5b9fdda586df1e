//! Helpers shared by unit tests that spawn fake implementation binaries.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

static SPAWN_LOCK: Mutex<()> = Mutex::new(());

/// Serializes tests that write and execute scripts.
///
/// Executing a file while another thread's fork still holds it open for
/// writing fails with ETXTBSY.
pub(crate) fn spawn_guard() -> MutexGuard<'static, ()> {
    SPAWN_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Write an executable `/bin/sh` script at `path`
#[cfg(unix)]
pub(crate) fn write_script(path: &Path, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, format!("#!/bin/sh\n{}\n", body)).unwrap();
    fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
    path.to_path_buf()
}

/// Install a fake ACVP binary for `level` under `build_root`
#[cfg(unix)]
pub(crate) fn install_fake_iut(build_root: &Path, level: u16, body: &str) -> PathBuf {
    let path = build_root
        .join(format!("mlkem{}", level))
        .join("bin")
        .join(format!("acvp_mlkem{}", level));
    write_script(&path, body)
}
