use criterion::{black_box, criterion_group, criterion_main, Criterion};
use hello_webgpu::{compute::BUFFER_SIZE, cpu_ref, readback::decode_f32};

fn benchmark_decode(c: &mut Criterion) {
    let values = cpu_ref::expected_output(BUFFER_SIZE as usize / 4);
    let bytes: Vec<u8> = values.iter().flat_map(|v| v.to_le_bytes()).collect();

    c.bench_function("decode_f32_1000_bytes", |b| {
        b.iter(|| decode_f32(black_box(&bytes)));
    });
}

fn benchmark_reference(c: &mut Criterion) {
    c.bench_function("expected_output_250", |b| {
        b.iter(|| cpu_ref::expected_output(black_box(250)));
    });
}

criterion_group!(benches, benchmark_decode, benchmark_reference);
criterion_main!(benches);
