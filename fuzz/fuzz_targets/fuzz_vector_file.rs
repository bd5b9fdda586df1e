#![no_main]

use libfuzzer_sys::fuzz_target;
use mlkem_acvp::{BinaryResolver, VectorFile, VectorSuite};
use std::path::Path;

fuzz_target!(|data: &[u8]| {
    let Ok(raw) = std::str::from_utf8(data) else {
        return;
    };

    for suite in [VectorSuite::KeyGen, VectorSuite::EncapDecap] {
        let Ok(file) = VectorFile::from_json_str(raw, suite, Path::new("fuzz")) else {
            continue;
        };

        let resolver = BinaryResolver::default();
        let mut cases = 0;
        for group in &file.groups {
            let _ = resolver.resolve(group);
            for case in group.cases() {
                let _ = case.expected_fields();
                cases += 1;
            }
        }
        assert_eq!(cases, file.case_count());
    }
});
