//! Adler-32 benchmarks.
//!
//! Run: `cargo bench -p adler -- adler32`
//! Native: `RUSTFLAGS='-C target-cpu=native' cargo bench -p adler -- adler32`
//!
//! This benchmarks:
//! - Main dispatch path (auto-selects best backend)
//! - Streaming updates in small pieces
//! - The `adler2` crate on the same inputs

use adler::Adler32;
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};

/// Standard benchmark sizes.
const SIZES: [usize; 8] = [16, 64, 256, 1024, 4096, 16384, 65536, 1048576];

/// Benchmark the main Adler-32 dispatch path.
fn bench_dispatch(c: &mut Criterion) {
  let mut group = c.benchmark_group("adler32/dispatch");
  eprintln!("adler32 backend: {}", Adler32::backend_name());

  for size in SIZES {
    let data = vec![0xABu8; size];
    group.throughput(Throughput::Bytes(size as u64));

    group.bench_with_input(BenchmarkId::from_parameter(size), &data, |b, data| {
      b.iter(|| core::hint::black_box(Adler32::checksum(data)));
    });
  }

  group.finish();
}

/// Benchmark streaming updates in 31-byte pieces (every call hits the tail).
fn bench_streaming(c: &mut Criterion) {
  let mut group = c.benchmark_group("adler32/streaming");

  for size in [1024usize, 65536] {
    let data = vec![0x5Au8; size];
    group.throughput(Throughput::Bytes(size as u64));

    group.bench_with_input(BenchmarkId::from_parameter(size), &data, |b, data| {
      b.iter(|| {
        let mut hasher = Adler32::new();
        for piece in data.chunks(31) {
          hasher.update(piece);
        }
        core::hint::black_box(hasher.finalize())
      });
    });
  }

  group.finish();
}

/// Benchmark the `adler2` crate for comparison.
fn bench_adler2(c: &mut Criterion) {
  let mut group = c.benchmark_group("adler32/adler2");

  for size in SIZES {
    let data = vec![0xABu8; size];
    group.throughput(Throughput::Bytes(size as u64));

    group.bench_with_input(BenchmarkId::from_parameter(size), &data, |b, data| {
      b.iter(|| core::hint::black_box(adler2::adler32_slice(data)));
    });
  }

  group.finish();
}

criterion_group!(benches, bench_dispatch, bench_streaming, bench_adler2);
criterion_main!(benches);
