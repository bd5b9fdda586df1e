//! Shared fixtures for the end-to-end tests: vector files in a temporary
//! directory and fake ACVP binaries written as shell scripts.

#![allow(dead_code)]

use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use tempfile::TempDir;

static SPAWN_LOCK: Mutex<()> = Mutex::new(());

/// Scripts are written and executed under this lock; a concurrent fork can
/// otherwise keep a fresh script open for writing (ETXTBSY).
pub fn spawn_guard() -> MutexGuard<'static, ()> {
    SPAWN_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

pub struct Workspace {
    pub dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    pub fn vector_dir(&self) -> PathBuf {
        self.dir.path().join("acvp_data")
    }

    pub fn build_root(&self) -> PathBuf {
        self.dir.path().join("build")
    }

    pub fn write_vectors(&self, keygen: &Value, encap_decap: &Value) {
        let dir = self.vector_dir();
        fs::create_dir_all(&dir).unwrap();
        fs::write(
            dir.join("acvp_keygen_internalProjection.json"),
            serde_json::to_vec_pretty(keygen).unwrap(),
        )
        .unwrap();
        fs::write(
            dir.join("acvp_encapDecap_internalProjection.json"),
            serde_json::to_vec_pretty(encap_decap).unwrap(),
        )
        .unwrap();
    }

    /// Install a fake binary answering each argument string with its stdout.
    /// Unknown invocations exit 2. Every invocation leaves a marker file.
    #[cfg(unix)]
    pub fn install_iut(&self, level: u16, answers: &[(&str, &str)]) -> PathBuf {
        let mut body = String::from("touch \"$(dirname \"$0\")/invoked\"\ncase \"$*\" in\n");
        for (args, stdout) in answers {
            body.push_str(&format!("  \"{}\") printf '{}\\n' ;;\n", args, stdout.replace('\n', "\\n")));
        }
        body.push_str("  *) echo \"unexpected invocation: $*\" >&2; exit 2 ;;\nesac\n");
        self.install_script(level, &body)
    }

    #[cfg(unix)]
    pub fn install_script(&self, level: u16, body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let bin = self.build_root().join(format!("mlkem{}", level)).join("bin");
        fs::create_dir_all(&bin).unwrap();
        let path = bin.join(format!("acvp_mlkem{}", level));
        fs::write(&path, format!("#!/bin/sh\n{}", body)).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    pub fn was_invoked(&self, level: u16) -> bool {
        self.build_root()
            .join(format!("mlkem{}", level))
            .join("bin")
            .join("invoked")
            .exists()
    }
}

pub fn keygen_vectors(groups: Value) -> Value {
    json!({
        "vsId": 1,
        "algorithm": "ML-KEM",
        "mode": "keyGen",
        "revision": "FIPS203",
        "testGroups": groups
    })
}

pub fn encap_decap_vectors(groups: Value) -> Value {
    json!({
        "vsId": 2,
        "algorithm": "ML-KEM",
        "mode": "encapDecap",
        "revision": "FIPS203",
        "testGroups": groups
    })
}

pub fn empty(vectors: fn(Value) -> Value) -> Value {
    vectors(json!([]))
}

pub fn output_lines(out: &[u8]) -> Vec<String> {
    String::from_utf8(out.to_vec())
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

pub fn path_str(path: &Path) -> &str {
    path.to_str().unwrap()
}
