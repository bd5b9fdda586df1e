use std::fmt::Write as _;
use std::io::Write;
use std::sync::Mutex;

use super::summary::{FailureRecord, RunSummary};
use crate::error::AcvpError;
use crate::parameter_set::ParameterSet;
use crate::verifier::Verdict;
use crate::vectors::{Function, VectorSuite};

/// Where a case came from; enough to find it again in the vector file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseIdentity {
    pub suite: VectorSuite,
    pub function: Function,
    pub parameter_set: ParameterSet,
    pub tg_id: Option<u32>,
    pub tc_id: u32,
}

impl CaseIdentity {
    /// `Running <kind> test case <tcId> (<detail>) ... `
    ///
    /// keyGen lines carry no detail; encapDecap lines name the function.
    pub fn running_prefix(&self) -> String {
        match self.suite {
            VectorSuite::KeyGen => {
                format!("Running {} test case {} ... ", self.suite, self.tc_id)
            }
            VectorSuite::EncapDecap => format!(
                "Running {} test case {} ({}) ... ",
                self.suite, self.tc_id, self.function
            ),
        }
    }
}

#[derive(Debug, Default)]
struct Tally {
    dispatched: usize,
    passed: usize,
    failures: Vec<FailureRecord>,
}

/// Writes verdict lines and keeps the pass/fail tally.
///
/// A buffered reporter writes each case with a single `write_all` followed by
/// a flush, so lines from parallel workers never interleave. A streaming
/// reporter (sequential runs only) writes the `Running ...` prefix as soon as
/// the case is dispatched and the verdict once it completes.
pub struct Reporter<W: Write> {
    out: Mutex<W>,
    tally: Mutex<Tally>,
    streaming: bool,
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
            tally: Mutex::new(Tally::default()),
            streaming: false,
        }
    }

    /// Reporter for a single worker: prefixes appear before the case runs
    pub fn streaming(out: W) -> Self {
        Self {
            streaming: true,
            ..Self::new(out)
        }
    }

    /// Announce a case about to be dispatched.
    ///
    /// Streaming reporters write and flush the prefix; buffered ones do
    /// nothing until [`record`](Self::record).
    pub fn begin(&self, identity: &CaseIdentity) {
        if self.streaming {
            self.emit(identity.tc_id, &identity.running_prefix());
        }
    }

    /// Record the result of one dispatched case.
    ///
    /// Returns `true` if the case passed.
    pub fn record(&self, identity: &CaseIdentity, result: &Result<Verdict, AcvpError>) -> bool {
        let mut text = if self.streaming {
            String::new()
        } else {
            identity.running_prefix()
        };
        match result {
            Ok(_) => text.push_str("OK\n"),
            Err(err) => {
                text.push_str("FAIL!\n");
                append_failure_detail(&mut text, err);
            }
        }

        {
            let mut tally = self.tally.lock().unwrap_or_else(|p| p.into_inner());
            tally.dispatched += 1;
            match result {
                Ok(_) => tally.passed += 1,
                Err(err) => tally.failures.push(FailureRecord::new(identity, err)),
            }
        }

        self.emit(identity.tc_id, &text);
        result.is_ok()
    }

    fn emit(&self, tc_id: u32, text: &str) {
        let mut out = self.out.lock().unwrap_or_else(|p| p.into_inner());
        if let Err(err) = out.write_all(text.as_bytes()).and_then(|_| out.flush()) {
            log::warn!("Failed to write verdict for tcId {}: {}", tc_id, err);
        }
    }

    /// Number of cases recorded so far
    pub fn dispatched(&self) -> usize {
        self.tally.lock().unwrap_or_else(|p| p.into_inner()).dispatched
    }

    /// Close the tally; `planned` is the number of cases the run intended to
    /// dispatch.
    pub fn summary(&self, planned: usize) -> RunSummary {
        let tally = self.tally.lock().unwrap_or_else(|p| p.into_inner());
        RunSummary {
            planned,
            dispatched: tally.dispatched,
            passed: tally.passed,
            failed: tally.failures.len(),
            not_dispatched: planned.saturating_sub(tally.dispatched),
            failures: tally.failures.clone(),
        }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(|p| p.into_inner())
    }
}

fn append_failure_detail(text: &mut String, err: &AcvpError) {
    match err {
        AcvpError::ExecutionError {
            command,
            cause,
            stderr,
            ..
        } => {
            let _ = writeln!(text, "{} {}", command, cause);
            append_stderr(text, stderr);
        }
        AcvpError::TimeoutError { stderr, .. } => {
            let _ = writeln!(text, "{}", err);
            append_stderr(text, stderr);
        }
        _ => {
            let _ = writeln!(text, "{}", err);
        }
    }
}

fn append_stderr(text: &mut String, stderr: &str) {
    let trimmed = stderr.trim_end();
    if !trimmed.is_empty() {
        text.push_str(trimmed);
        text.push('\n');
    }
}
