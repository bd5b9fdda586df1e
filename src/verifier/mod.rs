/*!
 * Result verification
 *
 * Compares the fields an implementation printed against the expected values
 * of its test case. Values are compared as exact strings: no hex decoding,
 * no case folding, leading zeros significant.
 */

use serde::{Deserialize, Serialize};

use crate::error::{AcvpError, AcvpResult};
use crate::executor::ObservedFields;
use crate::vectors::{ResultField, TestCase};

/// What to do when an expected result field is absent from the output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingFieldPolicy {
    /// Only fields the implementation printed are checked
    #[default]
    Ignore,
    /// Every field of the case's result schema must be printed
    Require,
}

/// Outcome of a passing verification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub tc_id: u32,
    /// Schema fields that were printed and matched
    pub checked: Vec<ResultField>,
    /// Printed keys outside the result schema, e.g. `status`
    pub unchecked: Vec<String>,
    /// Schema fields that were not printed (only possible under `Ignore`)
    pub missing: Vec<ResultField>,
}

/// Verify observed output against a test case.
///
/// # Errors
///
/// * `VerificationMismatch` for the first printed field whose value differs
/// * `MissingOutputField` for the first absent field under `Require`
pub fn verify(
    case: &TestCase<'_>,
    observed: &ObservedFields,
    policy: MissingFieldPolicy,
) -> AcvpResult<Verdict> {
    let mut checked = Vec::new();
    let mut unchecked = Vec::new();

    for (key, value) in observed.iter() {
        match case.expected_for_key(key) {
            Some((field, expected)) => {
                if value != expected {
                    return Err(AcvpError::mismatch(key, expected, value));
                }
                checked.push(field);
            }
            None => {
                log::debug!(
                    "tcId {}: ignoring output field '{}' outside the {} result schema",
                    case.tc_id(),
                    key,
                    case.function()
                );
                unchecked.push(key.to_string());
            }
        }
    }

    let mut missing = Vec::new();
    for (field, expected) in case.expected_fields() {
        if observed.contains_key(field.key()) {
            continue;
        }
        match policy {
            MissingFieldPolicy::Require => {
                return Err(AcvpError::missing_field(field.key(), expected));
            }
            MissingFieldPolicy::Ignore => {
                log::debug!("tcId {}: result field '{}' not printed", case.tc_id(), field);
                missing.push(field);
            }
        }
    }

    Ok(Verdict {
        tc_id: case.tc_id(),
        checked,
        unchecked,
        missing,
    })
}
