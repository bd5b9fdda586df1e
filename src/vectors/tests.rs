use super::*;
use crate::error::error_codes;
use std::path::Path;

const KEYGEN_JSON: &str = include_str!("../../tests/fixtures/acvp_keygen_internalProjection.json");
const ENCAP_DECAP_JSON: &str =
    include_str!("../../tests/fixtures/acvp_encapDecap_internalProjection.json");

fn parse(raw: &str, suite: VectorSuite) -> crate::error::AcvpResult<VectorFile> {
    VectorFile::from_json_str(raw, suite, Path::new("inline.json"))
}

#[test]
fn test_keygen_groups_default_to_keygen_function() {
    let file = parse(KEYGEN_JSON, VectorSuite::KeyGen).unwrap();
    assert_eq!(file.groups.len(), 2);
    assert!(file
        .groups
        .iter()
        .all(|group| group.function() == Function::KeyGen));
    assert_eq!(file.case_count(), 3);
    assert_eq!(file.groups[1].parameter_set, "ML-KEM-1024");
}

#[test]
fn test_hex_fields_are_kept_verbatim() {
    let file = parse(KEYGEN_JSON, VectorSuite::KeyGen).unwrap();
    let second = file.groups[0].cases().nth(1).unwrap();
    match second {
        TestCase::KeyGen(case) => {
            // Leading zeros and upper case must survive loading untouched.
            assert_eq!(case.ek, "00AB00CD");
            assert_eq!(case.d, "0000000000000000000000000000000000000000000000000000000000000001");
        }
        other => panic!("unexpected case {:?}", other),
    }
}

#[test]
fn test_decapsulation_cases_share_group_dk() {
    let file = parse(ENCAP_DECAP_JSON, VectorSuite::EncapDecap).unwrap();
    let decap = &file.groups[1];
    assert_eq!(decap.function(), Function::Decapsulation);

    let dks: Vec<&str> = decap
        .cases()
        .map(|case| match case {
            TestCase::Decapsulation { dk, .. } => dk,
            other => panic!("unexpected case {:?}", other),
        })
        .collect();
    assert_eq!(dks, vec!["D0D1D2D3D4D5", "D0D1D2D3D4D5"]);
}

#[test]
fn test_expected_fields_follow_schema_order() {
    let file = parse(ENCAP_DECAP_JSON, VectorSuite::EncapDecap).unwrap();
    let encap = file.groups[0].cases().next().unwrap();
    assert_eq!(
        encap.expected_fields(),
        vec![(ResultField::C, "C0FFEE00"), (ResultField::K, "0BADF00D")]
    );
    // `dk` is present in the JSON but is not an encapsulation result.
    assert_eq!(encap.expected_for_key("dk"), None);
    assert_eq!(encap.expected_for_key("k"), Some((ResultField::K, "0BADF00D")));
}

#[test]
fn test_file_digest_is_stable() {
    let first = parse(KEYGEN_JSON, VectorSuite::KeyGen).unwrap();
    let second = parse(KEYGEN_JSON, VectorSuite::KeyGen).unwrap();
    assert_eq!(first.sha256, second.sha256);
    assert_eq!(first.sha256.len(), 64);
}

#[test]
fn test_malformed_json_is_configuration_error() {
    let err = parse("{\"testGroups\": [", VectorSuite::KeyGen).unwrap_err();
    assert!(err.is_configuration());
    assert_eq!(err.error_code(), error_codes::VECTOR_FILE_MALFORMED);
}

#[test]
fn test_missing_test_groups_is_configuration_error() {
    let err = parse("{\"vsId\": 1}", VectorSuite::KeyGen).unwrap_err();
    assert_eq!(err.error_code(), error_codes::VECTOR_FILE_MALFORMED);
}

#[test]
fn test_unsupported_function_group_is_skipped() {
    let raw = r#"{"testGroups": [
        {"tgId": 7, "function": "encapsulationKeyCheck", "parameterSet": "ML-KEM-512",
         "tests": [{"tcId": 1, "ek": "00", "testPassed": true}]},
        {"tgId": 8, "function": "decapsulation", "parameterSet": "ML-KEM-512", "dk": "DD",
         "tests": [{"tcId": 2, "c": "01", "k": "02"}]}
    ]}"#;
    let file = parse(raw, VectorSuite::EncapDecap).unwrap();
    assert_eq!(file.skipped_groups, 1);
    assert_eq!(file.groups.len(), 1);
    assert_eq!(file.groups[0].tg_id, Some(8));
    assert_eq!(file.case_count(), 1);
}

#[test]
fn test_encap_decap_group_requires_function() {
    let raw = r#"{"testGroups": [{"parameterSet": "ML-KEM-512", "tests": []}]}"#;
    let err = parse(raw, VectorSuite::EncapDecap).unwrap_err();
    assert_eq!(err.error_code(), error_codes::MISSING_GROUP_FIELD);
}

#[test]
fn test_decapsulation_group_requires_dk() {
    let raw = r#"{"testGroups": [{"tgId": 3, "function": "decapsulation",
        "parameterSet": "ML-KEM-768", "tests": [{"tcId": 1, "c": "00", "k": "11"}]}]}"#;
    let err = parse(raw, VectorSuite::EncapDecap).unwrap_err();
    assert_eq!(err.error_code(), error_codes::MISSING_GROUP_FIELD);
}

#[test]
fn test_case_missing_field_is_rejected() {
    let raw = r#"{"testGroups": [{"tgId": 1, "parameterSet": "ML-KEM-512",
        "tests": [{"tcId": 1, "z": "00", "d": "11", "ek": "22"}]}]}"#;
    let err = parse(raw, VectorSuite::KeyGen).unwrap_err();
    assert_eq!(err.error_code(), error_codes::INVALID_TEST_CASE);
}

#[test]
fn test_unknown_parameter_set_loads_but_is_not_resolved_here() {
    // Resolution is the binary resolver's job; loading keeps the raw identifier.
    let raw = r#"{"testGroups": [{"tgId": 1, "parameterSet": "ML-KEM-2048",
        "tests": [{"tcId": 1, "z": "00", "d": "11", "ek": "22", "dk": "33"}]}]}"#;
    let file = parse(raw, VectorSuite::KeyGen).unwrap();
    assert_eq!(file.groups[0].parameter_set, "ML-KEM-2048");
}

#[test]
fn test_missing_file_is_configuration_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = VectorFile::load(&dir.path().join("absent.json"), VectorSuite::KeyGen).unwrap_err();
    assert_eq!(err.error_code(), error_codes::VECTOR_FILE_UNREADABLE);
}

#[test]
fn test_repository_processes_encap_decap_first() {
    let repo = VectorRepository::from_files(
        parse(KEYGEN_JSON, VectorSuite::KeyGen).unwrap(),
        parse(ENCAP_DECAP_JSON, VectorSuite::EncapDecap).unwrap(),
    );
    let order: Vec<VectorSuite> = repo.suites().iter().map(|file| file.suite).collect();
    assert_eq!(order, vec![VectorSuite::EncapDecap, VectorSuite::KeyGen]);
    assert_eq!(repo.case_count(), 6);
}
