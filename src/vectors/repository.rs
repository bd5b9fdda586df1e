use serde::de::DeserializeOwned;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};

use super::model::{
    DecapsulationCase, EncapsulationCase, Function, GroupCases, KeyGenCase, TestGroup,
    VectorSuite,
};
use crate::error::{error_codes, AcvpError, AcvpResult};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawVectorFile {
    test_groups: Vec<RawTestGroup>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTestGroup {
    #[serde(default)]
    tg_id: Option<u32>,
    #[serde(default)]
    function: Option<String>,
    parameter_set: String,
    #[serde(default)]
    dk: Option<String>,
    tests: Vec<serde_json::Value>,
}

/// One parsed ACVP vector file
#[derive(Debug, Clone)]
pub struct VectorFile {
    pub suite: VectorSuite,
    pub source: PathBuf,
    /// Lower-case hex SHA-256 of the raw file bytes
    pub sha256: String,
    pub groups: Vec<TestGroup>,
    /// Groups whose `function` the harness does not dispatch
    pub skipped_groups: usize,
}

impl VectorFile {
    /// Read and parse a vector file.
    ///
    /// # Errors
    ///
    /// Any failure (missing file, unreadable file, malformed JSON, a group
    /// that cannot be dispatched) is a configuration error; there is no
    /// partial load.
    pub fn load(path: &Path, suite: VectorSuite) -> AcvpResult<Self> {
        let raw = fs::read(path).map_err(|err| {
            AcvpError::configuration_error_with(
                "vector file",
                &format!("cannot read {}: {}", path.display(), err),
                error_codes::VECTOR_FILE_UNREADABLE,
                &[("file", path.display().to_string())],
            )
        })?;
        let file = Self::from_json_slice(&raw, suite, path)?;
        log::info!(
            "Loaded {} vectors from {}: {} groups, {} cases",
            suite,
            path.display(),
            file.groups.len(),
            file.case_count()
        );
        Ok(file)
    }

    /// Parse vector JSON that has already been read; `origin` is used for
    /// diagnostics only.
    pub fn from_json_str(raw: &str, suite: VectorSuite, origin: &Path) -> AcvpResult<Self> {
        Self::from_json_slice(raw.as_bytes(), suite, origin)
    }

    fn from_json_slice(raw: &[u8], suite: VectorSuite, origin: &Path) -> AcvpResult<Self> {
        let parsed: RawVectorFile = serde_json::from_slice(raw).map_err(|err| {
            AcvpError::configuration_error_with(
                "vector file",
                &format!("{} is not a valid ACVP vector file: {}", origin.display(), err),
                error_codes::VECTOR_FILE_MALFORMED,
                &[("file", origin.display().to_string())],
            )
        })?;

        let mut groups = Vec::with_capacity(parsed.test_groups.len());
        let mut skipped_groups = 0;
        for (index, group) in parsed.test_groups.into_iter().enumerate() {
            match convert_group(group, index, suite, origin)? {
                Some(group) => groups.push(group),
                None => skipped_groups += 1,
            }
        }

        Ok(VectorFile {
            suite,
            source: origin.to_path_buf(),
            sha256: hex::encode(Sha256::digest(raw)),
            groups,
            skipped_groups,
        })
    }

    pub fn case_count(&self) -> usize {
        self.groups.iter().map(TestGroup::len).sum()
    }
}

fn group_label(group: &RawTestGroup, index: usize) -> String {
    match group.tg_id {
        Some(tg_id) => format!("tgId {}", tg_id),
        None => format!("group #{}", index),
    }
}

// `Ok(None)` for a group with a function outside keyGen, encapsulation and
// decapsulation (e.g. the ACVP key-check groups); it is skipped, not fatal.
fn convert_group(
    group: RawTestGroup,
    index: usize,
    suite: VectorSuite,
    origin: &Path,
) -> AcvpResult<Option<TestGroup>> {
    let label = group_label(&group, index);
    let context = || [("file", origin.display().to_string()), ("group", label.clone())];

    // The published keyGen projection has no `function` on its groups.
    let function = match (group.function.as_deref(), suite) {
        (Some(name), _) => match Function::from_name(name) {
            Some(function) => function,
            None => {
                log::warn!(
                    "{}: skipping {} group with unsupported function '{}' ({} cases)",
                    origin.display(),
                    label,
                    name,
                    group.tests.len()
                );
                return Ok(None);
            }
        },
        (None, VectorSuite::KeyGen) => Function::KeyGen,
        (None, VectorSuite::EncapDecap) => {
            return Err(AcvpError::configuration_error_with(
                "function",
                &format!("{}: encapDecap group without a function", label),
                error_codes::MISSING_GROUP_FIELD,
                &context(),
            ))
        }
    };

    let cases = match function {
        Function::KeyGen => GroupCases::KeyGen(convert_cases::<KeyGenCase>(
            group.tests,
            &label,
            function,
            origin,
        )?),
        Function::Encapsulation => GroupCases::Encapsulation(
            convert_cases::<EncapsulationCase>(group.tests, &label, function, origin)?,
        ),
        Function::Decapsulation => {
            let dk = group.dk.ok_or_else(|| {
                AcvpError::configuration_error_with(
                    "dk",
                    &format!("{}: decapsulation group without a group dk", label),
                    error_codes::MISSING_GROUP_FIELD,
                    &context(),
                )
            })?;
            GroupCases::Decapsulation {
                dk,
                tests: convert_cases::<DecapsulationCase>(group.tests, &label, function, origin)?,
            }
        }
    };

    Ok(Some(TestGroup {
        tg_id: group.tg_id,
        parameter_set: group.parameter_set,
        cases,
    }))
}

fn convert_cases<T: DeserializeOwned>(
    tests: Vec<serde_json::Value>,
    label: &str,
    function: Function,
    origin: &Path,
) -> AcvpResult<Vec<T>> {
    tests
        .into_iter()
        .enumerate()
        .map(|(position, value)| {
            serde_json::from_value(value).map_err(|err| {
                AcvpError::configuration_error_with(
                    "test case",
                    &format!("{}: {} case #{} is invalid: {}", label, function, position, err),
                    error_codes::INVALID_TEST_CASE,
                    &[
                        ("file", origin.display().to_string()),
                        ("group", label.to_string()),
                        ("position", position.to_string()),
                    ],
                )
            })
        })
        .collect()
}

/// Both vector files, loaded once and immutable for the run
#[derive(Debug, Clone)]
pub struct VectorRepository {
    encap_decap: VectorFile,
    keygen: VectorFile,
}

impl VectorRepository {
    /// Load the keyGen and encapDecap vector files.
    ///
    /// # Errors
    ///
    /// Fails with a configuration error if either file cannot be loaded.
    pub fn load(keygen_path: &Path, encap_decap_path: &Path) -> AcvpResult<Self> {
        let keygen = VectorFile::load(keygen_path, VectorSuite::KeyGen)?;
        let encap_decap = VectorFile::load(encap_decap_path, VectorSuite::EncapDecap)?;
        Ok(Self::from_files(keygen, encap_decap))
    }

    pub fn from_files(keygen: VectorFile, encap_decap: VectorFile) -> Self {
        Self {
            encap_decap,
            keygen,
        }
    }

    pub fn keygen(&self) -> &VectorFile {
        &self.keygen
    }

    pub fn encap_decap(&self) -> &VectorFile {
        &self.encap_decap
    }

    /// Files in processing order: encapDecap first, then keyGen
    pub fn suites(&self) -> [&VectorFile; 2] {
        [&self.encap_decap, &self.keygen]
    }

    pub fn case_count(&self) -> usize {
        self.suites().iter().map(|file| file.case_count()).sum()
    }
}
