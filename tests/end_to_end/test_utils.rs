//! Shared helpers for the end-to-end suite

use snapdiff::testing::StreamBuilder;
use snapdiff::{decode, DecodeOptions, DecodedStream, Operation};

/// Encode `ops` followed by the terminal frame.
pub fn stream_bytes(ops: &[Operation]) -> Vec<u8> {
    ops.iter()
        .fold(StreamBuilder::new(1), |b, op| b.command(op))
        .end()
        .build()
}

/// Encode and decode `ops`.
pub fn decode_ops(ops: &[Operation], lineage: bool) -> DecodedStream {
    decode(
        &stream_bytes(ops),
        &DecodeOptions::new().with_lineage(lineage),
    )
    .unwrap()
}

pub fn mkfile(path: &str) -> Operation {
    Operation::MakeFile {
        path: path.to_string(),
    }
}

pub fn rename(from: &str, to: &str) -> Operation {
    Operation::Rename {
        path: from.to_string(),
        destination: to.to_string(),
    }
}

pub fn extent(path: &str, offset: u64, length: u64) -> Operation {
    Operation::UpdateExtent {
        path: path.to_string(),
        offset,
        length,
    }
}
