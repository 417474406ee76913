use criterion::{black_box, criterion_group, criterion_main, Criterion};
use talos_core::{canonical, Identity, Value};

fn sample_document() -> Value {
    let entries = (0..64).map(|i| {
        (
            format!("key-{:03}", 63 - i),
            Value::object([
                ("index", Value::from(i)),
                ("ratio", Value::from(f64::from(i) / 7.0)),
                ("label", Value::from(format!("entry \"{i}\"\n"))),
            ]),
        )
    });
    Value::object(entries)
}

fn bench_encode(c: &mut Criterion) {
    let doc = sample_document();
    c.bench_function("canonical_encode_64_entries", |b| {
        b.iter(|| canonical::encode(black_box(&doc)))
    });
}

fn bench_did(c: &mut Criterion) {
    let seed = [0x42u8; 32];
    c.bench_function("derive_identity_and_did", |b| {
        b.iter(|| {
            Identity::from_seed(black_box(&seed), None)
                .map(|identity| identity.did())
        })
    });
}

criterion_group!(benches, bench_encode, bench_did);
criterion_main!(benches);
