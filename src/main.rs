//! mlkem-acvp - run ACVP vectors against an ML-KEM implementation
//!
//! Prints one verdict line per case on stdout and exits 0 only when every
//! case passed.

use clap::Parser;
use mlkem_acvp::logging::init_logging;
use mlkem_acvp::{AcvpError, FailureMode, Harness, HarnessConfig, MissingFieldPolicy};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

/// Command-line interface definition
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about,
    long_about = "Runs the ACVP keyGen and encapDecap vectors against the per-parameter-set \
                  ACVP binaries of an ML-KEM implementation and checks every reported value."
)]
struct Cli {
    /// Directory holding the ACVP internalProjection vector files
    #[arg(long, default_value = mlkem_acvp::harness::DEFAULT_VECTOR_DIR)]
    vector_dir: PathBuf,

    /// keyGen vector file, overriding the one in --vector-dir
    #[arg(long)]
    keygen_file: Option<PathBuf>,

    /// encapDecap vector file, overriding the one in --vector-dir
    #[arg(long)]
    encap_decap_file: Option<PathBuf>,

    /// Root of the per-parameter-set build trees
    #[arg(long, env = "MLKEM_ACVP_BUILD_ROOT", default_value = mlkem_acvp::resolver::DEFAULT_BUILD_ROOT)]
    build_root: PathBuf,

    /// Number of cases run concurrently
    #[arg(short, long, default_value_t = 1)]
    jobs: usize,

    /// Per-case timeout in seconds; 0 disables it
    #[arg(long, default_value_t = 300)]
    timeout_secs: u64,

    /// Run every case and collect all failures instead of stopping at the first
    #[arg(long)]
    keep_going: bool,

    /// Fail a case when a result field is missing from the output
    #[arg(long)]
    require_all_fields: bool,

    /// Write a JSON run report to this file
    #[arg(long)]
    report: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn into_config(self) -> HarnessConfig {
        let timeout = match self.timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        };
        let failure_mode = if self.keep_going {
            FailureMode::ContinueAndCollect
        } else {
            FailureMode::AbortOnFirst
        };
        let policy = if self.require_all_fields {
            MissingFieldPolicy::Require
        } else {
            MissingFieldPolicy::Ignore
        };

        let mut config = HarnessConfig::default()
            .with_vector_dir(self.vector_dir)
            .with_build_root(self.build_root)
            .with_jobs(self.jobs)
            .with_timeout(timeout)
            .with_failure_mode(failure_mode)
            .with_missing_field_policy(policy);
        config.keygen_file = self.keygen_file;
        config.encap_decap_file = self.encap_decap_file;
        if let Some(path) = self.report {
            config = config.with_report_path(path);
        }
        config
    }
}

fn report_error(err: &AcvpError) {
    eprintln!("Error: {}", err);
    if let Some(stderr) = err.captured_stderr() {
        if !stderr.is_empty() {
            eprintln!("{}", stderr.trim_end());
        }
    }
    if let Some(remediation) = err.suggested_remediation() {
        eprintln!("Hint: {}", remediation);
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let harness = Harness::new(cli.into_config());
    match harness.run(io::stdout()) {
        Ok(summary) => {
            if !summary.all_passed() {
                eprintln!(
                    "{} of {} case(s) failed, {} not run",
                    summary.failed, summary.planned, summary.not_dispatched
                );
            }
            ExitCode::from(summary.exit_code())
        }
        Err(err) => {
            report_error(&err);
            ExitCode::FAILURE
        }
    }
}
