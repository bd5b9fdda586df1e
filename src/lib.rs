/*!
 * ML-KEM ACVP conformance harness
 *
 * Drives per-parameter-set ACVP test binaries of an ML-KEM (FIPS 203)
 * implementation with the cases of two ACVP internal-projection vector
 * files and compares the reported values against the expected ones.
 *
 * The pipeline is:
 *
 * - [`vectors`] loads the keyGen and encapDecap vector files
 * - [`resolver`] maps each group's parameter set to a binary
 * - [`executor`] runs one case as a child process and parses its output
 * - [`verifier`] compares observed values with the expected ones
 * - [`report`] prints the per-case verdicts and the run summary
 * - [`harness`] ties the stages together
 */

/// Error types shared by every stage
pub mod error;

/// The three ML-KEM parameter sets
pub mod parameter_set;

/// ACVP vector file model and loading
pub mod vectors;

/// Parameter set to binary path mapping
pub mod resolver;

/// Child process execution and output parsing
pub mod executor;

/// Comparison of observed and expected results
pub mod verifier;

/// Console verdicts, run summary and JSON run report
pub mod report;

/// Run configuration and driver
pub mod harness;

/// Log output for the command-line driver
pub mod logging;

#[cfg(test)]
mod test_support;

pub use error::{AcvpError, AcvpResult};
pub use executor::{parse_output, CaseExecutor, ObservedFields};
pub use harness::{FailureMode, Harness, HarnessConfig};
pub use parameter_set::ParameterSet;
pub use report::{Reporter, RunSummary};
pub use resolver::BinaryResolver;
pub use vectors::{Function, TestCase, TestGroup, VectorFile, VectorRepository, VectorSuite};
pub use verifier::{verify, MissingFieldPolicy, Verdict};
