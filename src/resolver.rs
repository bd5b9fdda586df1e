/*!
 * Binary resolution
 *
 * One ACVP binary is built per parameter set, laid out as
 * `<build-root>/mlkem<level>/bin/acvp_mlkem<level>`.
 */

use std::path::{Path, PathBuf};

use crate::error::AcvpResult;
use crate::parameter_set::ParameterSet;
use crate::vectors::TestGroup;

/// Default build root, relative to the working directory
pub const DEFAULT_BUILD_ROOT: &str = "test/build";

/// A resolved implementation binary for one parameter set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedBinary {
    pub parameter_set: ParameterSet,
    pub path: PathBuf,
}

/// Maps test groups to the implementation binary that serves them
#[derive(Debug, Clone)]
pub struct BinaryResolver {
    build_root: PathBuf,
}

impl BinaryResolver {
    pub fn new(build_root: impl Into<PathBuf>) -> Self {
        Self {
            build_root: build_root.into(),
        }
    }

    pub fn build_root(&self) -> &Path {
        &self.build_root
    }

    /// Resolve the binary for a test group.
    ///
    /// The binary is not checked for existence; a missing binary surfaces
    /// as an execution error when the first case is run.
    ///
    /// # Errors
    ///
    /// A configuration error if the group's parameter set is unknown.
    pub fn resolve(&self, group: &TestGroup) -> AcvpResult<ResolvedBinary> {
        self.resolve_identifier(&group.parameter_set)
    }

    pub fn resolve_identifier(&self, identifier: &str) -> AcvpResult<ResolvedBinary> {
        let parameter_set = ParameterSet::from_identifier(identifier)?;
        Ok(ResolvedBinary {
            parameter_set,
            path: self.binary_path(parameter_set),
        })
    }

    pub fn binary_path(&self, parameter_set: ParameterSet) -> PathBuf {
        let level = parameter_set.level();
        self.build_root
            .join(format!("mlkem{}", level))
            .join("bin")
            .join(format!("acvp_mlkem{}", level))
    }
}

impl Default for BinaryResolver {
    fn default() -> Self {
        Self::new(DEFAULT_BUILD_ROOT)
    }
}
