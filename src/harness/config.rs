use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{error_codes, AcvpError, AcvpResult};
use crate::executor::DEFAULT_TIMEOUT;
use crate::resolver::DEFAULT_BUILD_ROOT;
use crate::verifier::MissingFieldPolicy;
use crate::vectors::VectorSuite;

/// Default location of the ACVP vector files, relative to the working directory
pub const DEFAULT_VECTOR_DIR: &str = "test/acvp_data";

/// How the driver reacts to a failing case
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureMode {
    /// Stop dispatching after the first failure; in-flight cases still finish
    #[default]
    AbortOnFirst,
    /// Run every case and collect all failures
    ContinueAndCollect,
}

/// Configuration for a harness run
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    pub vector_dir: PathBuf,
    /// Overrides `<vector_dir>/acvp_keygen_internalProjection.json`
    pub keygen_file: Option<PathBuf>,
    /// Overrides `<vector_dir>/acvp_encapDecap_internalProjection.json`
    pub encap_decap_file: Option<PathBuf>,
    pub build_root: PathBuf,
    /// Number of cases run concurrently; 1 runs strictly in file order
    pub jobs: usize,
    /// Per-case limit; `None` waits forever
    pub timeout: Option<Duration>,
    pub failure_mode: FailureMode,
    pub missing_field_policy: MissingFieldPolicy,
    /// Where to write the JSON run report, if anywhere
    pub report_path: Option<PathBuf>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            vector_dir: PathBuf::from(DEFAULT_VECTOR_DIR),
            keygen_file: None,
            encap_decap_file: None,
            build_root: PathBuf::from(DEFAULT_BUILD_ROOT),
            jobs: 1,
            timeout: Some(DEFAULT_TIMEOUT),
            failure_mode: FailureMode::default(),
            missing_field_policy: MissingFieldPolicy::default(),
            report_path: None,
        }
    }
}

impl HarnessConfig {
    pub fn with_vector_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.vector_dir = dir.into();
        self
    }

    pub fn with_build_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.build_root = root.into();
        self
    }

    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_failure_mode(mut self, mode: FailureMode) -> Self {
        self.failure_mode = mode;
        self
    }

    pub fn with_missing_field_policy(mut self, policy: MissingFieldPolicy) -> Self {
        self.missing_field_policy = policy;
        self
    }

    pub fn with_report_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.report_path = Some(path.into());
        self
    }

    /// Path of the vector file for `suite`
    pub fn vector_path(&self, suite: VectorSuite) -> PathBuf {
        let explicit = match suite {
            VectorSuite::KeyGen => self.keygen_file.as_deref(),
            VectorSuite::EncapDecap => self.encap_decap_file.as_deref(),
        };
        explicit
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.vector_dir.join(suite.default_file_name()))
    }

    /// Reject settings that cannot drive a run
    pub fn validate(&self) -> AcvpResult<()> {
        if self.jobs == 0 {
            return Err(AcvpError::configuration_error(
                "jobs",
                "at least one worker is required",
                error_codes::INVALID_SETTING,
            ));
        }
        if self.timeout == Some(Duration::ZERO) {
            return Err(AcvpError::configuration_error(
                "timeout",
                "a zero timeout would fail every case; use None to disable it",
                error_codes::INVALID_SETTING,
            ));
        }
        Ok(())
    }
}
