use std::path::Path;

use crate::vectors::{Function, TestCase};

/// Argument vector (without the binary) for one test case.
///
/// ```text
/// keyGen AFT z=<z> d=<d>
/// encapDecap AFT encapsulation ek=<ek> m=<m>
/// encapDecap VAL decapsulation dk=<group dk> c=<c>
/// ```
pub fn invocation_args(case: &TestCase<'_>) -> Vec<String> {
    let function = case.function();
    let suite = function.suite().name().to_string();
    let mode = function.mode_token().to_string();

    match case {
        TestCase::KeyGen(case) => vec![
            suite,
            mode,
            format!("z={}", case.z),
            format!("d={}", case.d),
        ],
        TestCase::Encapsulation(case) => vec![
            suite,
            mode,
            Function::Encapsulation.name().to_string(),
            format!("ek={}", case.ek),
            format!("m={}", case.m),
        ],
        TestCase::Decapsulation { dk, case } => vec![
            suite,
            mode,
            Function::Decapsulation.name().to_string(),
            format!("dk={}", dk),
            format!("c={}", case.c),
        ],
    }
}

/// Human-readable command line for diagnostics
pub fn render_command(binary: &Path, args: &[String]) -> String {
    let mut rendered = binary.display().to_string();
    for arg in args {
        rendered.push(' ');
        rendered.push_str(arg);
    }
    rendered
}
