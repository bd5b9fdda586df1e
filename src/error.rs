/*!
 * Error Handling for the ACVP Harness
 *
 * Every failure the harness can hit is one variant of [`AcvpError`]. Each
 * variant carries a numeric error code, enough context to diagnose the
 * failure without re-running, and a suggested remediation.
 */

use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;

/// Error type for every stage of the harness pipeline
#[derive(Debug, Error)]
pub enum AcvpError {
    #[error("Configuration error: {subject} - {cause}")]
    ConfigurationError {
        subject: String,
        cause: String,
        error_code: u32,
        context: HashMap<String, String>,
    },

    #[error("Execution failed: {command} - {cause}")]
    ExecutionError {
        command: String,
        cause: String,
        exit_code: Option<i32>,
        stderr: String,
        error_code: u32,
    },

    #[error("Execution timed out after {}s: {command}", timeout.as_secs_f64())]
    TimeoutError {
        command: String,
        timeout: Duration,
        stderr: String,
        error_code: u32,
    },

    #[error("Malformed output on line {line_number}: {line:?}")]
    MalformedOutputError {
        line_number: usize,
        line: String,
        error_code: u32,
    },

    #[error("Mismatching result for {key}: expected {expected}, got {observed}")]
    VerificationMismatch {
        key: String,
        expected: String,
        observed: String,
        error_code: u32,
    },

    #[error("Missing result for {key}: expected {expected}, got nothing")]
    MissingOutputField {
        key: String,
        expected: String,
        error_code: u32,
    },

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("IO error: {0}")]
    IoError(String),
}

/// Error code constants for different error categories
pub mod error_codes {
    // Configuration errors: 1000-1999
    pub const VECTOR_FILE_UNREADABLE: u32 = 1001;
    pub const VECTOR_FILE_MALFORMED: u32 = 1002;
    pub const UNKNOWN_PARAMETER_SET: u32 = 1003;
    pub const MISSING_GROUP_FIELD: u32 = 1005;
    pub const INVALID_TEST_CASE: u32 = 1006;
    pub const INVALID_SETTING: u32 = 1007;

    // Execution errors: 2000-2999
    pub const SPAWN_FAILED: u32 = 2001;
    pub const NONZERO_EXIT: u32 = 2002;
    pub const EXECUTION_TIMEOUT: u32 = 2003;
    pub const OUTPUT_CAPTURE_FAILED: u32 = 2004;

    // Output errors: 3000-3999
    pub const MALFORMED_OUTPUT_LINE: u32 = 3001;

    // Verification errors: 4000-4999
    pub const RESULT_MISMATCH: u32 = 4001;
    pub const RESULT_MISSING: u32 = 4002;

    // Miscellaneous: 9000-9999
    pub const SERIALIZATION_FAILED: u32 = 9001;
    pub const IO_FAILED: u32 = 9002;
}

impl AcvpError {
    /// Get the numeric error code for this error
    pub fn error_code(&self) -> u32 {
        match self {
            AcvpError::ConfigurationError { error_code, .. } => *error_code,
            AcvpError::ExecutionError { error_code, .. } => *error_code,
            AcvpError::TimeoutError { error_code, .. } => *error_code,
            AcvpError::MalformedOutputError { error_code, .. } => *error_code,
            AcvpError::VerificationMismatch { error_code, .. } => *error_code,
            AcvpError::MissingOutputField { error_code, .. } => *error_code,
            AcvpError::SerializationError(_) => error_codes::SERIALIZATION_FAILED,
            AcvpError::IoError(_) => error_codes::IO_FAILED,
        }
    }

    /// Get the error category as a string
    pub fn error_type(&self) -> &'static str {
        match self {
            AcvpError::ConfigurationError { .. } => "ConfigurationError",
            AcvpError::ExecutionError { .. } => "ExecutionError",
            AcvpError::TimeoutError { .. } => "TimeoutError",
            AcvpError::MalformedOutputError { .. } => "MalformedOutputError",
            AcvpError::VerificationMismatch { .. } => "VerificationMismatch",
            AcvpError::MissingOutputField { .. } => "MissingOutputField",
            AcvpError::SerializationError(_) => "SerializationError",
            AcvpError::IoError(_) => "IoError",
        }
    }

    /// Whether this error invalidates the whole run rather than one case.
    ///
    /// Configuration errors are raised while loading vectors or resolving
    /// binaries, before any child process exists.
    pub fn is_configuration(&self) -> bool {
        matches!(self, AcvpError::ConfigurationError { .. })
    }

    /// Captured standard error of the implementation under test, if any
    pub fn captured_stderr(&self) -> Option<&str> {
        match self {
            AcvpError::ExecutionError { stderr, .. } | AcvpError::TimeoutError { stderr, .. } => {
                Some(stderr.as_str())
            }
            _ => None,
        }
    }

    /// Get technical details for debugging
    pub fn technical_details(&self) -> HashMap<String, String> {
        let mut details = HashMap::new();

        details.insert("error_code".to_string(), self.error_code().to_string());
        details.insert("error_type".to_string(), self.error_type().to_string());
        details.insert("timestamp".to_string(), chrono::Utc::now().to_rfc3339());

        match self {
            AcvpError::ConfigurationError {
                subject,
                cause,
                context,
                ..
            } => {
                details.insert("subject".to_string(), subject.clone());
                details.insert("cause".to_string(), cause.clone());
                details.extend(context.clone());
            }
            AcvpError::ExecutionError {
                command,
                cause,
                exit_code,
                ..
            } => {
                details.insert("command".to_string(), command.clone());
                details.insert("cause".to_string(), cause.clone());
                if let Some(code) = exit_code {
                    details.insert("exit_code".to_string(), code.to_string());
                }
            }
            AcvpError::TimeoutError {
                command, timeout, ..
            } => {
                details.insert("command".to_string(), command.clone());
                details.insert("timeout_ms".to_string(), timeout.as_millis().to_string());
            }
            AcvpError::MalformedOutputError {
                line_number, line, ..
            } => {
                details.insert("line_number".to_string(), line_number.to_string());
                details.insert("line".to_string(), line.clone());
            }
            AcvpError::VerificationMismatch {
                key,
                expected,
                observed,
                ..
            } => {
                details.insert("key".to_string(), key.clone());
                details.insert("expected".to_string(), expected.clone());
                details.insert("observed".to_string(), observed.clone());
            }
            AcvpError::MissingOutputField { key, expected, .. } => {
                details.insert("key".to_string(), key.clone());
                details.insert("expected".to_string(), expected.clone());
            }
            _ => {
                details.insert("details".to_string(), format!("{:?}", self));
            }
        }

        details
    }

    /// Get suggested remediation steps
    pub fn suggested_remediation(&self) -> Option<String> {
        match self {
            AcvpError::ConfigurationError { error_code, .. } => match *error_code {
                error_codes::UNKNOWN_PARAMETER_SET => Some(
                    "Use a supported parameter set (ML-KEM-512, ML-KEM-768 or ML-KEM-1024)."
                        .to_string(),
                ),
                error_codes::VECTOR_FILE_UNREADABLE => Some(
                    "Check --vector-dir and that the ACVP internalProjection files were fetched."
                        .to_string(),
                ),
                _ => Some("Check that the vector files are unmodified ACVP JSON.".to_string()),
            },
            AcvpError::ExecutionError { error_code, .. } => match *error_code {
                error_codes::SPAWN_FAILED => Some(
                    "Build the ACVP binaries first and check --build-root.".to_string(),
                ),
                _ => Some(
                    "The implementation under test crashed; inspect its stderr above.".to_string(),
                ),
            },
            AcvpError::TimeoutError { .. } => Some(
                "Raise --timeout-secs or check the implementation for hangs.".to_string(),
            ),
            AcvpError::MalformedOutputError { .. } => Some(
                "The implementation must print exactly one key=value line per result."
                    .to_string(),
            ),
            AcvpError::MissingOutputField { .. } => Some(
                "The implementation did not print every result field for this case.".to_string(),
            ),
            _ => None,
        }
    }
}

/// Convenience constructors for common error types
impl AcvpError {
    pub fn configuration_error(subject: &str, cause: &str, error_code: u32) -> Self {
        AcvpError::ConfigurationError {
            subject: subject.to_string(),
            cause: cause.to_string(),
            error_code,
            context: HashMap::new(),
        }
    }

    /// Configuration error with extra key/value context (file, tgId, ...)
    pub fn configuration_error_with(
        subject: &str,
        cause: &str,
        error_code: u32,
        context: &[(&str, String)],
    ) -> Self {
        AcvpError::ConfigurationError {
            subject: subject.to_string(),
            cause: cause.to_string(),
            error_code,
            context: context
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
        }
    }

    pub fn unknown_parameter_set(identifier: &str) -> Self {
        Self::configuration_error_with(
            "parameterSet",
            &format!("unknown parameter set '{}'", identifier),
            error_codes::UNKNOWN_PARAMETER_SET,
            &[("parameter_set", identifier.to_string())],
        )
    }

    pub fn spawn_failed(command: &str, cause: &str) -> Self {
        AcvpError::ExecutionError {
            command: command.to_string(),
            cause: cause.to_string(),
            exit_code: None,
            stderr: String::new(),
            error_code: error_codes::SPAWN_FAILED,
        }
    }

    pub fn nonzero_exit(command: &str, exit_code: Option<i32>, stderr: &str) -> Self {
        let cause = match exit_code {
            Some(code) => format!("failed with error code {}", code),
            None => "terminated by signal".to_string(),
        };
        AcvpError::ExecutionError {
            command: command.to_string(),
            cause,
            exit_code,
            stderr: stderr.to_string(),
            error_code: error_codes::NONZERO_EXIT,
        }
    }

    pub fn timeout(command: &str, timeout: Duration, stderr: &str) -> Self {
        AcvpError::TimeoutError {
            command: command.to_string(),
            timeout,
            stderr: stderr.to_string(),
            error_code: error_codes::EXECUTION_TIMEOUT,
        }
    }

    pub fn malformed_output(line_number: usize, line: &str) -> Self {
        AcvpError::MalformedOutputError {
            line_number,
            line: line.to_string(),
            error_code: error_codes::MALFORMED_OUTPUT_LINE,
        }
    }

    pub fn mismatch(key: &str, expected: &str, observed: &str) -> Self {
        AcvpError::VerificationMismatch {
            key: key.to_string(),
            expected: expected.to_string(),
            observed: observed.to_string(),
            error_code: error_codes::RESULT_MISMATCH,
        }
    }

    pub fn missing_field(key: &str, expected: &str) -> Self {
        AcvpError::MissingOutputField {
            key: key.to_string(),
            expected: expected.to_string(),
            error_code: error_codes::RESULT_MISSING,
        }
    }

    pub fn io_error(cause: &str) -> Self {
        AcvpError::IoError(cause.to_string())
    }
}

// From implementations for automatic error conversion
impl From<std::io::Error> for AcvpError {
    fn from(err: std::io::Error) -> Self {
        AcvpError::io_error(&format!("IO operation failed: {}", err))
    }
}

impl From<serde_json::Error> for AcvpError {
    fn from(err: serde_json::Error) -> Self {
        AcvpError::SerializationError(err.to_string())
    }
}

/// Result type alias for harness operations
pub type AcvpResult<T> = Result<T, AcvpError>;
