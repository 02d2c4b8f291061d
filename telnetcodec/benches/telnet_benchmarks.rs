//
// Copyright 2017-2026 Hans W. Uhlig. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//

//! Benchmarks for telnetcodec performance

use bbslink_telnetcodec::{
    Negotiator, TelnetCodec, TelnetFrame, TelnetOption, decode, encode_text, naws,
};
use bytes::{Bytes, BytesMut};
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;
use std::time::Instant;
use tokio_util::codec::{Decoder, Encoder};

// ============================================================================
// Encoding Benchmarks
// ============================================================================

fn bench_encode_text_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode_text_sizes");

    for size in [10, 100, 1000, 10000].iter() {
        group.throughput(Throughput::Bytes(*size as u64));

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            let data: Vec<u8> = (0..size).map(|i| (i % 256) as u8).collect();

            b.iter(|| encode_text(black_box(&data)));
        });
    }

    group.finish();
}

fn bench_encode_negotiation(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode_negotiation");

    group.bench_function("will_naws", |b| {
        let mut codec = TelnetCodec::new();
        let mut buffer = BytesMut::with_capacity(1024);

        b.iter(|| {
            buffer.clear();
            codec
                .encode(black_box(TelnetFrame::Will(TelnetOption::NAWS)), &mut buffer)
                .unwrap();
        });
    });

    group.bench_function("naws_subnegotiation", |b| {
        let mut codec = TelnetCodec::new();
        let mut buffer = BytesMut::with_capacity(1024);
        let size = naws::WindowSize::new(255, 255);

        b.iter(|| {
            buffer.clear();
            codec
                .encode(
                    black_box(bbslink_telnetcodec::TelnetArgument::NAWSWindowSize(size)),
                    &mut buffer,
                )
                .unwrap();
        });
    });

    group.finish();
}

// ============================================================================
// Decoding Benchmarks
// ============================================================================

fn bench_decode_text_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_text_sizes");

    for size in [10, 100, 1000, 10000].iter() {
        group.throughput(Throughput::Bytes(*size as u64));

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            let data: Vec<u8> = (0..size).map(|i| (i % 256) as u8).collect();
            let wire = encode_text(&data);

            b.iter(|| decode(black_box(&wire), &[]));
        });
    }

    group.finish();
}

fn bench_decode_mixed_content(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_mixed_content");

    let mut wire = BytesMut::new();
    for _ in 0..32 {
        wire.extend_from_slice(b"\x1B[1;33mWelcome to the board\x1B[0m\r\n");
        wire.extend_from_slice(b"\xFF\xFB\x01\xFF\xF9");
        wire.extend_from_slice(b"\xFF\xFA\x18\x01\xFF\xF0");
    }
    let wire = wire.freeze();
    group.throughput(Throughput::Bytes(wire.len() as u64));

    group.bench_function("whole_buffer", |b| {
        b.iter(|| decode(black_box(&wire), &[]));
    });

    group.bench_function("16_byte_reads", |b| {
        b.iter(|| {
            let mut carry = BytesMut::new();
            for chunk in wire.chunks(16) {
                carry = decode(black_box(chunk), &carry).carry;
            }
            carry
        });
    });

    group.finish();
}

// ============================================================================
// Negotiation Benchmarks
// ============================================================================

fn bench_negotiation(c: &mut Criterion) {
    let mut group = c.benchmark_group("negotiation");

    group.bench_function("login_handshake", |b| {
        let server = Bytes::from_static(
            b"\xFF\xFD\x1F\xFF\xFD\x18\xFF\xFB\x03\xFF\xFB\x01\xFF\xFA\x18\x01\xFF\xF0Login: ",
        );

        b.iter(|| {
            let mut codec = TelnetCodec::new();
            let mut negotiator = Negotiator::default();
            let mut outbound = BytesMut::new();
            let mut inbound = BytesMut::from(&server[..]);
            for frame in negotiator.start(Instant::now()).replies {
                codec.encode(frame, &mut outbound).unwrap();
            }
            while let Some(unit) = codec.decode(&mut inbound).unwrap() {
                if let bbslink_telnetcodec::DecodedUnit::Negotiation(frame) = unit {
                    for reply in negotiator.receive(frame).unwrap().replies {
                        codec.encode(reply, &mut outbound).unwrap();
                    }
                }
            }
            outbound
        });
    });

    group.bench_function("resolve_timeouts", |b| {
        let mut negotiator = Negotiator::default();
        let now = Instant::now();
        negotiator.start(now);

        b.iter(|| negotiator.resolve_timeouts(black_box(now)));
    });

    group.finish();
}

// ============================================================================
// Benchmark Groups
// ============================================================================

criterion_group!(encoding_benches, bench_encode_text_sizes, bench_encode_negotiation);

criterion_group!(decoding_benches, bench_decode_text_sizes, bench_decode_mixed_content);

criterion_group!(negotiation_benches, bench_negotiation);

criterion_main!(encoding_benches, decoding_benches, negotiation_benches);
