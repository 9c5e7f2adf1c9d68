// Copyright 2026 The Chatline Project
// SPDX-License-Identifier: Apache-2.0

//! Decode throughput benchmarks.
//!
//! Measures:
//! - Frame decoding of a long well-formed stream fed in network-sized chunks
//! - The same stream fed byte by byte (worst-case chunk boundaries)
//! - Recovery cost when every frame is malformed
//!
//! Run: cargo bench --bench decode_throughput

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use chatline::stream::{decode_chunks, FrameDecoder, NullDiagnostics};

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

fn well_formed_stream(frames: usize) -> Vec<u8> {
    let mut body = String::from("data: {\"choices\":[{\"delta\":{\"role\":\"assistant\"}}]}\n\n");
    for i in 0..frames {
        body.push_str(&format!(
            "data: {{\"choices\":[{{\"delta\":{{\"content\":\"token {i} caf\u{e9} \"}}}}]}}\n\n"
        ));
    }
    body.push_str("data: [DONE]\n\n");
    body.into_bytes()
}

fn malformed_stream(frames: usize) -> Vec<u8> {
    let mut body = String::new();
    for i in 0..frames {
        body.push_str(&format!("data: {{\"delta\":{{\"content\":\"cut {i}\n\n"));
    }
    body.into_bytes()
}

fn decoder() -> FrameDecoder {
    FrameDecoder::new(Arc::new(NullDiagnostics))
}

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

fn bench_chunked(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_chunked");
    let decoder = decoder();
    for frames in [16usize, 256, 2048] {
        let body = well_formed_stream(frames);
        group.throughput(Throughput::Bytes(body.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(frames), &body, |b, body| {
            b.iter(|| decode_chunks(body.chunks(1024), black_box(&decoder)))
        });
    }
    group.finish();
}

fn bench_byte_by_byte(c: &mut Criterion) {
    let decoder = decoder();
    let body = well_formed_stream(256);
    c.bench_function("decode_byte_by_byte_256", |b| {
        b.iter(|| decode_chunks(body.chunks(1), black_box(&decoder)))
    });
}

fn bench_malformed(c: &mut Criterion) {
    let decoder = decoder();
    let body = malformed_stream(256);
    c.bench_function("decode_malformed_256", |b| {
        b.iter(|| decode_chunks(body.chunks(1024), black_box(&decoder)))
    });
}

criterion_group!(benches, bench_chunked, bench_byte_by_byte, bench_malformed);
criterion_main!(benches);
