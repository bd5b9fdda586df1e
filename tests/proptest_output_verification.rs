//! Property-based tests for output parsing and result verification.

use mlkem_acvp::error::error_codes;
use mlkem_acvp::vectors::KeyGenCase;
use mlkem_acvp::{parse_output, verify, MissingFieldPolicy, ObservedFields, TestCase};
use proptest::prelude::*;

fn arb_key() -> impl Strategy<Value = String> {
    "[a-zA-Z_][a-zA-Z0-9_]{0,7}"
}

fn arb_hex() -> impl Strategy<Value = String> {
    "[0-9A-Fa-f]{0,64}"
}

fn arb_pairs() -> impl Strategy<Value = Vec<(String, String)>> {
    prop::collection::vec((arb_key(), arb_hex()), 0..8)
}

fn keygen_case(ek: String, dk: String) -> KeyGenCase {
    KeyGenCase {
        tc_id: 1,
        z: "00".to_string(),
        d: "11".to_string(),
        ek,
        dk,
    }
}

proptest! {
    #[test]
    fn well_formed_output_parses_in_order(pairs in arb_pairs(), crlf in any::<bool>()) {
        let newline = if crlf { "\r\n" } else { "\n" };
        let stdout: String = pairs
            .iter()
            .map(|(k, v)| format!("{}={}{}", k, v, newline))
            .collect();

        let fields = parse_output(&stdout).unwrap();
        let parsed: Vec<(String, String)> = fields
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        prop_assert_eq!(parsed, pairs);
    }

    #[test]
    fn line_without_separator_is_rejected(
        before in arb_pairs(),
        junk in "[a-zA-Z0-9 ]{1,16}",
    ) {
        let mut stdout: String = before.iter().map(|(k, v)| format!("{}={}\n", k, v)).collect();
        stdout.push_str(&junk);
        stdout.push('\n');

        let err = parse_output(&stdout).unwrap_err();
        prop_assert_eq!(err.error_code(), error_codes::MALFORMED_OUTPUT_LINE);
    }

    #[test]
    fn exact_output_always_verifies(ek in arb_hex(), dk in arb_hex(), status in "[A-Z]{1,6}") {
        let case = keygen_case(ek.clone(), dk.clone());
        let observed: ObservedFields = vec![
            ("status".to_string(), status),
            ("ek".to_string(), ek),
            ("dk".to_string(), dk),
        ]
        .into_iter()
        .collect();

        let verdict = verify(&TestCase::KeyGen(&case), &observed, MissingFieldPolicy::Require).unwrap();
        prop_assert_eq!(verdict.checked.len(), 2);
        prop_assert_eq!(verdict.unchecked, vec!["status".to_string()]);
    }

    #[test]
    fn any_differing_value_is_a_mismatch(expected in arb_hex(), observed in arb_hex()) {
        prop_assume!(expected != observed);
        let case = keygen_case(expected, "DD".to_string());
        let fields: ObservedFields = vec![("ek".to_string(), observed)].into_iter().collect();

        let err = verify(&TestCase::KeyGen(&case), &fields, MissingFieldPolicy::Ignore).unwrap_err();
        prop_assert_eq!(err.error_code(), error_codes::RESULT_MISMATCH);
    }
}
