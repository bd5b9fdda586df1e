/*!
 * Case execution
 *
 * Builds the command line for one test case, runs the implementation under
 * test as a child process and parses its `key=value` output.
 */

mod command;
mod output;
mod process;

pub use command::{invocation_args, render_command};
pub use output::{parse_output, ObservedFields};
pub use process::{run_command, CaseExecutor, ExecutionOutcome, ProcessOutput, DEFAULT_TIMEOUT};
