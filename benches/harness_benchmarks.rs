use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use mlkem_acvp::vectors::KeyGenCase;
use mlkem_acvp::{
    parse_output, verify, MissingFieldPolicy, ParameterSet, TestCase, VectorFile, VectorSuite,
};
use std::path::Path;

const KEYGEN_JSON: &str = include_str!("../tests/fixtures/acvp_keygen_internalProjection.json");
const ENCAP_DECAP_JSON: &str =
    include_str!("../tests/fixtures/acvp_encapDecap_internalProjection.json");

// Hex lengths of ek/dk as printed by a real implementation.
fn keygen_stdout(parameter_set: ParameterSet) -> String {
    let (ek_len, dk_len) = match parameter_set {
        ParameterSet::MlKem512 => (800, 1632),
        ParameterSet::MlKem768 => (1184, 2400),
        ParameterSet::MlKem1024 => (1568, 3168),
    };
    format!(
        "status=PASS\nek={}\ndk={}\n",
        "A5".repeat(ek_len),
        "5A".repeat(dk_len)
    )
}

fn output_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("output");

    for parameter_set in ParameterSet::ALL.iter() {
        let stdout = keygen_stdout(*parameter_set);
        group.bench_with_input(
            BenchmarkId::new("parse_output", parameter_set.identifier()),
            &stdout,
            |b, stdout| b.iter(|| parse_output(stdout)),
        );

        let fields = parse_output(&stdout).unwrap();
        let case = KeyGenCase {
            tc_id: 1,
            z: "00".to_string(),
            d: "11".to_string(),
            ek: fields.get("ek").unwrap().to_string(),
            dk: fields.get("dk").unwrap().to_string(),
        };
        group.bench_with_input(
            BenchmarkId::new("verify", parameter_set.identifier()),
            &fields,
            |b, fields| {
                b.iter(|| verify(&TestCase::KeyGen(&case), fields, MissingFieldPolicy::Require))
            },
        );
    }

    group.finish();
}

fn vector_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("vectors");

    group.bench_function("load_keygen", |b| {
        b.iter(|| VectorFile::from_json_str(KEYGEN_JSON, VectorSuite::KeyGen, Path::new("bench")))
    });
    group.bench_function("load_encap_decap", |b| {
        b.iter(|| {
            VectorFile::from_json_str(ENCAP_DECAP_JSON, VectorSuite::EncapDecap, Path::new("bench"))
        })
    });

    group.finish();
}

criterion_group!(benches, output_benchmarks, vector_benchmarks);
criterion_main!(benches);
