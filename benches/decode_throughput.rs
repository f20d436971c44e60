//! Decode and narration throughput
//!
//! ## Benchmark Categories
//!
//! | Prefix | What It Measures |
//! |--------|------------------|
//! | `decode/*` | Header, frame and attribute decoding with and without lineage |
//! | `narrate/*` | Per-path narration of an already decoded stream |
//! | `frames/*` | Frame walking alone, no attribute decoding |
//!
//! ## Running
//!
//! ```bash
//! cargo bench --bench decode_throughput
//! cargo bench --bench decode_throughput -- "decode/"
//! ```

use criterion::{
    black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput,
};
use snapdiff::testing::StreamBuilder;
use snapdiff::{decode, narrate, DecodeOptions, NarrateOptions, Operation, SendStream, Timespec};
use std::time::Duration;

// =============================================================================
// Stream generation
// =============================================================================

/// Stream sizes, in files touched
const FILE_COUNTS: [usize; 3] = [100, 1_000, 10_000];

/// An incremental send touching `files` files.
///
/// Each file goes through the usual sequence: created under a temporary
/// name, renamed into place, a few extent updates, then mode and times.
fn incremental_stream(files: usize) -> Vec<u8> {
    let mut builder = StreamBuilder::new(1);
    for i in 0..files {
        let temp = format!("o{}-7-0", 257 + i);
        let path = format!("dir{}/file{}.dat", i % 32, i);
        builder = builder
            .command(&Operation::MakeFile { path: temp.clone() })
            .command(&Operation::Rename {
                path: temp,
                destination: path.clone(),
            });
        for chunk in 0..4u64 {
            builder = builder.command(&Operation::UpdateExtent {
                path: path.clone(),
                offset: chunk * 131_072,
                length: 131_072,
            });
        }
        builder = builder
            .command(&Operation::ChangeMode {
                path: path.clone(),
                mode: 0o644,
            })
            .command(&Operation::SetTimes {
                path,
                atime: Timespec::new(1_700_000_000, 0),
                mtime: Timespec::new(1_700_000_000, 0),
                ctime: Timespec::new(1_700_000_000, 0),
            });
    }
    builder.end().build()
}

// =============================================================================
// Benchmarks
// =============================================================================

fn decode_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");

    for files in FILE_COUNTS {
        let buf = incremental_stream(files);
        group.throughput(Throughput::Bytes(buf.len() as u64));

        for lineage in [false, true] {
            let options = DecodeOptions::new().with_lineage(lineage);
            let label = if lineage { "lineage" } else { "plain" };
            group.bench_with_input(BenchmarkId::new(label, files), &buf, |b, buf| {
                b.iter(|| black_box(decode(black_box(buf), &options)))
            });
        }
    }

    group.finish();
}

fn frame_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("frames");

    for files in FILE_COUNTS {
        let buf = incremental_stream(files);
        group.throughput(Throughput::Bytes(buf.len() as u64));

        group.bench_with_input(BenchmarkId::from_parameter(files), &buf, |b, buf| {
            b.iter(|| match SendStream::parse(black_box(buf)) {
                Ok(stream) => stream.frames().count(),
                Err(_) => 0,
            })
        });
    }

    group.finish();
}

fn narrate_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("narrate");

    for files in FILE_COUNTS {
        let buf = incremental_stream(files);
        let Ok(decoded) = decode(&buf, &DecodeOptions::new().with_lineage(true)) else {
            panic!("benchmark stream must decode");
        };
        group.throughput(Throughput::Elements(decoded.commands.len() as u64));

        group.bench_with_input(BenchmarkId::new("raw", files), &decoded, |b, decoded| {
            b.iter(|| black_box(narrate(decoded, &NarrateOptions::default())))
        });
        group.bench_with_input(
            BenchmarkId::new("heuristic", files),
            &decoded,
            |b, decoded| b.iter(|| black_box(narrate(decoded, &NarrateOptions::heuristic()))),
        );
    }

    group.finish();
}

criterion_group!(
    name = benches;
    config = Criterion::default().measurement_time(Duration::from_secs(5));
    targets = decode_benchmarks, frame_benchmarks, narrate_benchmarks
);
criterion_main!(benches);
