/*!
 * ML-KEM parameter set registry
 *
 * Maps the `parameterSet` identifiers used by ACVP test groups onto the
 * numeric level that names the implementation binary for that parameter set.
 */

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{AcvpError, AcvpResult};

/// ML-KEM parameter sets with different security levels
///
/// # Security Levels
///
/// * ML-KEM-512: NIST category 1
/// * ML-KEM-768: NIST category 3
/// * ML-KEM-1024: NIST category 5
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ParameterSet {
    #[serde(rename = "ML-KEM-512")]
    MlKem512,
    #[serde(rename = "ML-KEM-768")]
    MlKem768,
    #[serde(rename = "ML-KEM-1024")]
    MlKem1024,
}

impl ParameterSet {
    /// Every parameter set the registry knows about, in ascending level order
    pub const ALL: [ParameterSet; 3] = [
        ParameterSet::MlKem512,
        ParameterSet::MlKem768,
        ParameterSet::MlKem1024,
    ];

    /// Resolve an ACVP `parameterSet` identifier.
    ///
    /// Identifiers are matched exactly; `ml-kem-768` is not `ML-KEM-768`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for any identifier outside the registry.
    pub fn from_identifier(identifier: &str) -> AcvpResult<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|set| set.identifier() == identifier)
            .ok_or_else(|| AcvpError::unknown_parameter_set(identifier))
    }

    /// The ACVP identifier, e.g. `ML-KEM-768`
    pub fn identifier(&self) -> &'static str {
        match self {
            ParameterSet::MlKem512 => "ML-KEM-512",
            ParameterSet::MlKem768 => "ML-KEM-768",
            ParameterSet::MlKem1024 => "ML-KEM-1024",
        }
    }

    /// Numeric level tag used in the binary naming convention
    pub fn level(&self) -> u16 {
        match self {
            ParameterSet::MlKem512 => 512,
            ParameterSet::MlKem768 => 768,
            ParameterSet::MlKem1024 => 1024,
        }
    }

    /// NIST security category (1, 3 or 5)
    pub fn security_category(&self) -> u8 {
        match self {
            ParameterSet::MlKem512 => 1,
            ParameterSet::MlKem768 => 3,
            ParameterSet::MlKem1024 => 5,
        }
    }
}

impl fmt::Display for ParameterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifier())
    }
}

impl FromStr for ParameterSet {
    type Err = AcvpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_identifier(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::error_codes;

    #[test]
    fn test_registry_levels() {
        let levels: Vec<u16> = ParameterSet::ALL.iter().map(|set| set.level()).collect();
        assert_eq!(levels, vec![512, 768, 1024]);
    }

    #[test]
    fn test_identifier_resolution() {
        for set in ParameterSet::ALL {
            assert_eq!(ParameterSet::from_identifier(set.identifier()).unwrap(), set);
            assert_eq!(set.to_string().parse::<ParameterSet>().unwrap(), set);
        }
    }

    #[test]
    fn test_unknown_identifier_is_configuration_error() {
        for bad in ["ML-KEM-2048", "ml-kem-768", "ML-KEM-768 ", "Kyber768", ""] {
            let err = ParameterSet::from_identifier(bad).unwrap_err();
            assert!(err.is_configuration());
            assert_eq!(err.error_code(), error_codes::UNKNOWN_PARAMETER_SET);
        }
    }

    #[test]
    fn test_serde_uses_acvp_identifiers() {
        let json = serde_json::to_string(&ParameterSet::MlKem1024).unwrap();
        assert_eq!(json, "\"ML-KEM-1024\"");
        let back: ParameterSet = serde_json::from_str("\"ML-KEM-512\"").unwrap();
        assert_eq!(back, ParameterSet::MlKem512);
    }
}
