use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use uuid::Uuid;

use super::reporter::CaseIdentity;
use crate::error::{AcvpError, AcvpResult};
use crate::parameter_set::ParameterSet;
use crate::vectors::{Function, VectorFile, VectorSuite};

/// One failed case, flattened for the console and the JSON report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailureRecord {
    pub suite: VectorSuite,
    pub function: Function,
    pub parameter_set: ParameterSet,
    pub tg_id: Option<u32>,
    pub tc_id: u32,
    pub error_type: String,
    pub error_code: u32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stderr: Option<String>,
}

impl FailureRecord {
    pub fn new(identity: &CaseIdentity, err: &AcvpError) -> Self {
        Self {
            suite: identity.suite,
            function: identity.function,
            parameter_set: identity.parameter_set,
            tg_id: identity.tg_id,
            tc_id: identity.tc_id,
            error_type: err.error_type().to_string(),
            error_code: err.error_code(),
            message: err.to_string(),
            stderr: err
                .captured_stderr()
                .filter(|stderr| !stderr.is_empty())
                .map(str::to_string),
        }
    }
}

/// Final tally of a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub planned: usize,
    pub dispatched: usize,
    pub passed: usize,
    pub failed: usize,
    /// Cases skipped because an earlier failure aborted the run
    pub not_dispatched: usize,
    pub failures: Vec<FailureRecord>,
}

impl RunSummary {
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.failed == 0 && self.passed == self.planned
    }

    /// Process exit status: 0 only if every planned case passed
    pub fn exit_code(&self) -> u8 {
        if self.all_passed() {
            0
        } else {
            1
        }
    }
}

/// A vector file as recorded in the report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VectorFileRecord {
    pub suite: VectorSuite,
    pub path: PathBuf,
    pub sha256: String,
    pub groups: usize,
    pub skipped_groups: usize,
    pub cases: usize,
}

impl From<&VectorFile> for VectorFileRecord {
    fn from(file: &VectorFile) -> Self {
        Self {
            suite: file.suite,
            path: file.source.clone(),
            sha256: file.sha256.clone(),
            groups: file.groups.len(),
            skipped_groups: file.skipped_groups,
            cases: file.case_count(),
        }
    }
}

/// Settings that influence verdicts, recorded for reproducibility
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSettings {
    pub build_root: PathBuf,
    pub jobs: usize,
    pub timeout_ms: Option<u64>,
    pub failure_mode: String,
    pub missing_field_policy: String,
}

impl RunSettings {
    pub fn timeout_ms(timeout: Option<Duration>) -> Option<u64> {
        timeout.map(|limit| u64::try_from(limit.as_millis()).unwrap_or(u64::MAX))
    }
}

/// JSON run report
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub settings: RunSettings,
    pub vector_files: Vec<VectorFileRecord>,
    pub summary: RunSummary,
}

/// Write a run report as pretty JSON, creating parent directories.
pub fn write_run_report(path: &Path, report: &RunReport) -> AcvpResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|err| {
                AcvpError::io_error(&format!("failed creating {}: {}", parent.display(), err))
            })?;
        }
    }

    let raw = serde_json::to_string_pretty(report)?;
    fs::write(path, raw)
        .map_err(|err| AcvpError::io_error(&format!("failed writing {}: {}", path.display(), err)))
}
