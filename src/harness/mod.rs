/*!
 * Harness driver
 *
 * Owns the run configuration, plans every case before anything is spawned
 * and executes the plan sequentially or on a worker pool.
 */

mod config;
mod runner;

pub use config::{FailureMode, HarnessConfig, DEFAULT_VECTOR_DIR};
pub use runner::{plan, Harness, PlannedCase};
