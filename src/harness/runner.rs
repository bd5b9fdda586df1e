use chrono::Utc;
use std::io::Write;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::thread;
use uuid::Uuid;

use super::config::{FailureMode, HarnessConfig};
use crate::error::AcvpResult;
use crate::executor::CaseExecutor;
use crate::report::{
    write_run_report, CaseIdentity, Reporter, RunReport, RunSettings, RunSummary,
    VectorFileRecord,
};
use crate::resolver::{BinaryResolver, ResolvedBinary};
use crate::verifier::{verify, Verdict};
use crate::vectors::{TestCase, TestGroup, VectorRepository, VectorSuite};

/// One case with its binary resolved, ready to dispatch
#[derive(Debug, Clone)]
pub struct PlannedCase<'a> {
    pub suite: VectorSuite,
    pub group: &'a TestGroup,
    pub binary: ResolvedBinary,
    pub case: TestCase<'a>,
}

impl PlannedCase<'_> {
    pub fn identity(&self) -> CaseIdentity {
        CaseIdentity {
            suite: self.suite,
            function: self.case.function(),
            parameter_set: self.binary.parameter_set,
            tg_id: self.group.tg_id,
            tc_id: self.case.tc_id(),
        }
    }
}

/// Resolve every group's binary and flatten the cases in processing order.
///
/// All parameter sets are resolved here, so an unknown one fails the run
/// before any process is spawned.
pub fn plan<'a>(
    repository: &'a VectorRepository,
    resolver: &BinaryResolver,
) -> AcvpResult<Vec<PlannedCase<'a>>> {
    let mut planned = Vec::with_capacity(repository.case_count());
    for file in repository.suites() {
        for group in &file.groups {
            let binary = resolver.resolve(group)?;
            log::debug!(
                "{} group {:?} ({}, {}) -> {}",
                file.suite,
                group.tg_id,
                group.function(),
                binary.parameter_set,
                binary.path.display()
            );
            planned.extend(group.cases().map(|case| PlannedCase {
                suite: file.suite,
                group,
                binary: binary.clone(),
                case,
            }));
        }
    }
    Ok(planned)
}

/// Drives the whole pipeline: load, plan, execute, verify, report
#[derive(Debug, Clone)]
pub struct Harness {
    config: HarnessConfig,
    resolver: BinaryResolver,
    executor: CaseExecutor,
}

impl Harness {
    pub fn new(config: HarnessConfig) -> Self {
        let resolver = BinaryResolver::new(config.build_root.clone());
        let executor = CaseExecutor::new(config.timeout);
        Self {
            config,
            resolver,
            executor,
        }
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Load both vector files and run every case.
    ///
    /// # Errors
    ///
    /// Only configuration errors (and report I/O errors) are returned; case
    /// failures are part of the returned summary.
    pub fn run<W: Write + Send>(&self, out: W) -> AcvpResult<RunSummary> {
        self.config.validate()?;
        let repository = VectorRepository::load(
            &self.config.vector_path(VectorSuite::KeyGen),
            &self.config.vector_path(VectorSuite::EncapDecap),
        )?;
        self.run_repository(&repository, out)
    }

    /// Run every case of an already loaded repository.
    pub fn run_repository<W: Write + Send>(
        &self,
        repository: &VectorRepository,
        out: W,
    ) -> AcvpResult<RunSummary> {
        self.config.validate()?;
        let started_at = Utc::now();
        let planned = plan(repository, &self.resolver)?;
        log::info!(
            "Dispatching {} cases with {} worker(s), timeout {:?}",
            planned.len(),
            self.config.jobs,
            self.config.timeout
        );

        let reporter = if self.config.jobs == 1 {
            Reporter::streaming(out)
        } else {
            Reporter::new(out)
        };
        self.execute(&planned, &reporter);
        let summary = reporter.summary(planned.len());

        if summary.not_dispatched > 0 {
            log::warn!(
                "Run aborted after first failure; {} case(s) not dispatched",
                summary.not_dispatched
            );
        }
        log::info!(
            "{} passed, {} failed, {} not dispatched",
            summary.passed,
            summary.failed,
            summary.not_dispatched
        );

        if let Some(path) = &self.config.report_path {
            let report = RunReport {
                run_id: Uuid::new_v4(),
                started_at,
                finished_at: Utc::now(),
                settings: self.settings(),
                vector_files: repository
                    .suites()
                    .iter()
                    .map(|file| VectorFileRecord::from(*file))
                    .collect(),
                summary: summary.clone(),
            };
            write_run_report(path, &report)?;
            log::info!("Wrote run report to {}", path.display());
        }

        Ok(summary)
    }

    fn settings(&self) -> RunSettings {
        let failure_mode = match self.config.failure_mode {
            FailureMode::AbortOnFirst => "abort_on_first",
            FailureMode::ContinueAndCollect => "continue_and_collect",
        };
        RunSettings {
            build_root: self.config.build_root.clone(),
            jobs: self.config.jobs,
            timeout_ms: RunSettings::timeout_ms(self.config.timeout),
            failure_mode: failure_mode.to_string(),
            missing_field_policy: format!("{:?}", self.config.missing_field_policy)
                .to_lowercase(),
        }
    }

    /// Run one planned case through executor and verifier
    pub fn run_case(&self, planned: &PlannedCase<'_>) -> AcvpResult<Verdict> {
        let outcome = self.executor.execute(&planned.binary.path, &planned.case)?;
        log::trace!(
            "tcId {} finished in {:?}: {} field(s)",
            planned.case.tc_id(),
            outcome.elapsed,
            outcome.fields.len()
        );
        verify(
            &planned.case,
            &outcome.fields,
            self.config.missing_field_policy,
        )
    }

    // Workers pull from a shared cursor. Once a failure cancels the run no
    // new case is taken; cases already running finish and are reported.
    fn execute<W: Write + Send>(&self, planned: &[PlannedCase<'_>], reporter: &Reporter<W>) {
        let cursor = AtomicUsize::new(0);
        let cancelled = AtomicBool::new(false);
        let abort = self.config.failure_mode == FailureMode::AbortOnFirst;
        let workers = self.config.jobs.clamp(1, planned.len().max(1));

        let worker = || loop {
            if cancelled.load(Ordering::SeqCst) {
                break;
            }
            let index = cursor.fetch_add(1, Ordering::SeqCst);
            let Some(case) = planned.get(index) else {
                break;
            };
            if cancelled.load(Ordering::SeqCst) {
                break;
            }

            let identity = case.identity();
            reporter.begin(&identity);
            let result = self.run_case(case);
            let passed = reporter.record(&identity, &result);
            if !passed && abort {
                cancelled.store(true, Ordering::SeqCst);
            }
        };

        if workers == 1 {
            worker();
            return;
        }

        thread::scope(|scope| {
            for _ in 0..workers {
                scope.spawn(&worker);
            }
        });
    }
}
