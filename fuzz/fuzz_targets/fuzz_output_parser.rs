#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use mlkem_acvp::vectors::DecapsulationCase;
use mlkem_acvp::{parse_output, verify, MissingFieldPolicy, TestCase};

#[derive(Arbitrary, Debug)]
struct OutputFuzzInput {
    stdout: String,
    expected_k: String,
    require_all: bool,
}

fuzz_target!(|input: OutputFuzzInput| {
    let fields = match parse_output(&input.stdout) {
        Ok(fields) => fields,
        Err(err) => {
            assert!(err.error_code() != 0);
            return;
        }
    };

    // Every parsed pair must come from one line of the input
    for (key, value) in fields.iter() {
        assert!(!key.is_empty());
        assert!(!value.contains('='));
        assert!(input.stdout.contains(&format!("{}={}", key, value)));
    }

    let case = DecapsulationCase {
        tc_id: 1,
        c: "00".to_string(),
        k: input.expected_k.clone(),
    };
    let policy = if input.require_all {
        MissingFieldPolicy::Require
    } else {
        MissingFieldPolicy::Ignore
    };
    let case = TestCase::Decapsulation { dk: "11", case: &case };
    let first = verify(&case, &fields, policy).map_err(|err| err.to_string());
    let second = verify(&case, &fields, policy).map_err(|err| err.to_string());
    assert_eq!(first, second);
});
