use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the two ACVP vector files the harness consumes.
///
/// The files are loaded and processed independently and never merged.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum VectorSuite {
    #[serde(rename = "keyGen")]
    KeyGen,
    #[serde(rename = "encapDecap")]
    EncapDecap,
}

impl VectorSuite {
    /// Name used on the console and as the IUT sub-command
    pub fn name(&self) -> &'static str {
        match self {
            VectorSuite::KeyGen => "keyGen",
            VectorSuite::EncapDecap => "encapDecap",
        }
    }

    /// File name of the published internal projection for this suite
    pub fn default_file_name(&self) -> &'static str {
        match self {
            VectorSuite::KeyGen => "acvp_keygen_internalProjection.json",
            VectorSuite::EncapDecap => "acvp_encapDecap_internalProjection.json",
        }
    }
}

impl fmt::Display for VectorSuite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The `function` of a test group
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Function {
    #[serde(rename = "keyGen")]
    KeyGen,
    #[serde(rename = "encapsulation")]
    Encapsulation,
    #[serde(rename = "decapsulation")]
    Decapsulation,
}

impl Function {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "keyGen" => Some(Function::KeyGen),
            "encapsulation" => Some(Function::Encapsulation),
            "decapsulation" => Some(Function::Decapsulation),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Function::KeyGen => "keyGen",
            Function::Encapsulation => "encapsulation",
            Function::Decapsulation => "decapsulation",
        }
    }

    /// The vector suite (and IUT sub-command) this function belongs to
    pub fn suite(&self) -> VectorSuite {
        match self {
            Function::KeyGen => VectorSuite::KeyGen,
            Function::Encapsulation | Function::Decapsulation => VectorSuite::EncapDecap,
        }
    }

    /// ACVP test type token passed to the IUT.
    ///
    /// Decapsulation runs the inverse operation against the group key and is a
    /// validation (`VAL`) test; the forward operations are functional (`AFT`).
    pub fn mode_token(&self) -> &'static str {
        match self {
            Function::KeyGen | Function::Encapsulation => "AFT",
            Function::Decapsulation => "VAL",
        }
    }

    /// Result fields the IUT reports for this function, in output order
    pub fn result_schema(&self) -> &'static [ResultField] {
        match self {
            Function::KeyGen => &[ResultField::Ek, ResultField::Dk],
            Function::Encapsulation => &[ResultField::C, ResultField::K],
            Function::Decapsulation => &[ResultField::K],
        }
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A named result field printed by the IUT as `key=value`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResultField {
    /// Encapsulation key
    Ek,
    /// Decapsulation key
    Dk,
    /// Ciphertext
    C,
    /// Shared secret
    K,
}

impl ResultField {
    pub fn key(&self) -> &'static str {
        match self {
            ResultField::Ek => "ek",
            ResultField::Dk => "dk",
            ResultField::C => "c",
            ResultField::K => "k",
        }
    }
}

impl fmt::Display for ResultField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

// All hex fields stay `String`: they are compared byte-exact and never decoded.

/// keyGen test case: seeds `z`, `d` in; `ek`, `dk` expected
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct KeyGenCase {
    pub tc_id: u32,
    pub z: String,
    pub d: String,
    pub ek: String,
    pub dk: String,
}

/// Encapsulation test case: `ek`, randomness `m` in; `c`, `k` expected
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EncapsulationCase {
    pub tc_id: u32,
    pub ek: String,
    pub m: String,
    pub c: String,
    pub k: String,
}

/// Decapsulation test case: ciphertext `c` in; `k` expected.
///
/// The decapsulation key lives on the owning group.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DecapsulationCase {
    pub tc_id: u32,
    pub c: String,
    pub k: String,
}

/// Typed cases of one group; the variant is the group's `function`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupCases {
    KeyGen(Vec<KeyGenCase>),
    Encapsulation(Vec<EncapsulationCase>),
    Decapsulation {
        dk: String,
        tests: Vec<DecapsulationCase>,
    },
}

/// A batch of test cases sharing function and parameter set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestGroup {
    pub tg_id: Option<u32>,
    /// Raw `parameterSet` identifier, resolved later by the binary resolver
    pub parameter_set: String,
    pub cases: GroupCases,
}

impl TestGroup {
    pub fn function(&self) -> Function {
        match &self.cases {
            GroupCases::KeyGen(_) => Function::KeyGen,
            GroupCases::Encapsulation(_) => Function::Encapsulation,
            GroupCases::Decapsulation { .. } => Function::Decapsulation,
        }
    }

    pub fn len(&self) -> usize {
        match &self.cases {
            GroupCases::KeyGen(tests) => tests.len(),
            GroupCases::Encapsulation(tests) => tests.len(),
            GroupCases::Decapsulation { tests, .. } => tests.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Cases of this group in file order.
    ///
    /// Decapsulation views carry the group `dk`, so every case of the group
    /// is invoked with the same key.
    pub fn cases(&self) -> Box<dyn Iterator<Item = TestCase<'_>> + '_> {
        match &self.cases {
            GroupCases::KeyGen(tests) => Box::new(tests.iter().map(TestCase::KeyGen)),
            GroupCases::Encapsulation(tests) => {
                Box::new(tests.iter().map(TestCase::Encapsulation))
            }
            GroupCases::Decapsulation { dk, tests } => Box::new(
                tests
                    .iter()
                    .map(move |case| TestCase::Decapsulation { dk: dk.as_str(), case }),
            ),
        }
    }
}

/// Borrowed view of one test case, ready to dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestCase<'a> {
    KeyGen(&'a KeyGenCase),
    Encapsulation(&'a EncapsulationCase),
    Decapsulation {
        dk: &'a str,
        case: &'a DecapsulationCase,
    },
}

impl<'a> TestCase<'a> {
    pub fn tc_id(&self) -> u32 {
        match self {
            TestCase::KeyGen(case) => case.tc_id,
            TestCase::Encapsulation(case) => case.tc_id,
            TestCase::Decapsulation { case, .. } => case.tc_id,
        }
    }

    pub fn function(&self) -> Function {
        match self {
            TestCase::KeyGen(_) => Function::KeyGen,
            TestCase::Encapsulation(_) => Function::Encapsulation,
            TestCase::Decapsulation { .. } => Function::Decapsulation,
        }
    }

    /// Expected value of one result field
    pub fn expected(&self, field: ResultField) -> Option<&'a str> {
        match (*self, field) {
            (TestCase::KeyGen(case), ResultField::Ek) => Some(case.ek.as_str()),
            (TestCase::KeyGen(case), ResultField::Dk) => Some(case.dk.as_str()),
            (TestCase::Encapsulation(case), ResultField::C) => Some(case.c.as_str()),
            (TestCase::Encapsulation(case), ResultField::K) => Some(case.k.as_str()),
            (TestCase::Decapsulation { case, .. }, ResultField::K) => Some(case.k.as_str()),
            _ => None,
        }
    }

    /// Expected result fields in schema order
    pub fn expected_fields(&self) -> Vec<(ResultField, &'a str)> {
        self.function()
            .result_schema()
            .iter()
            .filter_map(|field| self.expected(*field).map(|value| (*field, value)))
            .collect()
    }

    /// Look up a result field by the key the IUT printed
    pub fn expected_for_key(&self, key: &str) -> Option<(ResultField, &'a str)> {
        self.function()
            .result_schema()
            .iter()
            .find(|field| field.key() == key)
            .and_then(|field| self.expected(*field).map(|value| (*field, value)))
    }
}
