/*!
 * Verdict reporting
 *
 * Prints one verdict line per case, keeps the run tally and produces the
 * summary that decides the process exit status. An optional JSON report
 * records the same information for CI.
 */

mod reporter;
mod summary;

pub use reporter::{CaseIdentity, Reporter};
pub use summary::{
    write_run_report, FailureRecord, RunReport, RunSettings, RunSummary, VectorFileRecord,
};
