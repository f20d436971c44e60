//! Exact-output scenarios

use crate::test_utils::*;
use snapdiff::testing::StreamBuilder;
use snapdiff::{
    decode, narrate, DecodeError, DecodeOptions, NarrateOptions, Opcode, Operation, PathRef,
};

#[test]
fn make_directory_end_to_end() {
    let buf = stream_bytes(&[Operation::MakeDirectory {
        path: "foo".to_string(),
    }]);
    let decoded = decode(&buf, &DecodeOptions::default()).unwrap();

    assert_eq!(decoded.version(), 1);
    assert_eq!(
        decoded.commands.iter().map(|c| c.op.clone()).collect::<Vec<_>>(),
        vec![
            Operation::MakeDirectory {
                path: "foo".to_string()
            },
            Operation::End {
                end_offset: buf.len() as u64,
                stream_length: buf.len() as u64,
            },
        ]
    );
    assert_eq!(decoded.paths.len(), 1);
    assert_eq!(decoded.paths.get("foo").unwrap(), &[PathRef::primary(0)]);

    let narration = narrate(&decoded, &NarrateOptions::default());
    assert_eq!(narration.paths.len(), 1);
    assert_eq!(narration.paths[0].path, "foo");
    assert_eq!(narration.paths[0].actions, vec!["mkdir"]);
}

#[test]
fn extent_runs_coalesce() {
    let decoded = decode_ops(&[extent("f", 0, 100), extent("f", 100, 50)], false);
    let narration = narrate(&decoded, &NarrateOptions::default());
    assert_eq!(narration.paths[0].actions, vec!["update extents 0 -> 150"]);
}

#[test]
fn temporary_create_rename_is_hidden() {
    let ops = [mkfile("o123-45-0"), rename("o123-45-0", "report.pdf")];
    let decoded = decode_ops(&ops, true);
    let narration = narrate(&decoded, &NarrateOptions::heuristic());

    assert!(narration.get("o123-45-0").is_none());
    assert_eq!(narration.get("report.pdf").unwrap().actions, vec!["created"]);
}

#[test]
fn lineage_toggles_destination_entry() {
    let ops = [rename("a", "b")];
    assert_eq!(decode_ops(&ops, false).paths.ref_count(), 1);
    assert_eq!(decode_ops(&ops, true).paths.ref_count(), 2);
}

#[test]
fn short_or_foreign_buffers_fail_without_output() {
    for buf in [&b""[..], &b"btrfs-stream"[..], &b"btrfs-stream\0\x01\0\0"[..]] {
        assert!(matches!(
            decode(buf, &DecodeOptions::default()),
            Err(DecodeError::TruncatedInput { offset: 0, .. })
        ));
    }

    let mut foreign = stream_bytes(&[]);
    foreign[..12].copy_from_slice(b"not-a-stream");
    assert!(matches!(
        decode(&foreign, &DecodeOptions::default()),
        Err(DecodeError::BadMagic { .. })
    ));
}

#[test]
fn trailing_bytes_after_end() {
    let mut buf = stream_bytes(&[mkfile("a")]);
    let end_offset = buf.len();
    buf.push(0);
    assert_eq!(
        decode(&buf, &DecodeOptions::default()).unwrap_err(),
        DecodeError::TrailingGarbage {
            end_offset,
            stream_length: end_offset + 1,
        }
    );
}

#[test]
fn unspecified_frames_take_a_sequence() {
    let buf = StreamBuilder::new(1)
        .frame(Opcode::Unspecified, Vec::new())
        .command(&mkfile("a"))
        .end()
        .build();
    let decoded = decode(&buf, &DecodeOptions::default()).unwrap();

    assert_eq!(decoded.commands[0].op, Operation::Unspecified);
    assert_eq!(decoded.paths.get("a").unwrap(), &[PathRef::primary(1)]);
}

#[test]
fn error_reports_offset() {
    let ok = StreamBuilder::new(1).command(&mkfile("a"));
    let offset = ok.len();
    let buf = ok.raw_frame(1000, &[]).build();

    let err = decode(&buf, &DecodeOptions::default()).unwrap_err();
    assert_eq!(err.offset(), offset);
    assert!(err.to_string().contains("1000"));
}

#[test]
fn malformed_streams() {
    let mut foreign = b"btrfs-streaX\0".to_vec();
    foreign.extend_from_slice(&1u32.to_le_bytes());
    let buf = StreamBuilder::from_bytes(&foreign).end().build();
    assert_eq!(
        decode(&buf, &DecodeOptions::default()).unwrap_err(),
        DecodeError::BadMagic {
            found: *b"btrfs-streaX"
        }
    );

    let buf = StreamBuilder::new(1).raw(&[5, 0, 0]).build();
    assert!(matches!(
        decode(&buf, &DecodeOptions::default()),
        Err(DecodeError::TruncatedInput { offset: 17, .. })
    ));
}

#[test]
fn resumed_builder_decodes() {
    let prefix = StreamBuilder::new(1).command(&mkfile("a")).build();
    let buf = StreamBuilder::from_bytes(&prefix).end().build();

    let decoded = decode(&buf, &DecodeOptions::default()).unwrap();
    assert_eq!(decoded.commands.len(), 2);
    assert_eq!(decoded.end(), Some((buf.len() as u64, buf.len() as u64)));
}

#[test]
fn narration_json_through_facade() {
    let ops = [mkfile("o7-1-0"), rename("o7-1-0", "notes.txt")];
    let decoded = decode_ops(&ops, true);
    let narration = narrate(&decoded, &NarrateOptions::heuristic());

    assert_eq!(
        serde_json::to_value(&narration).unwrap(),
        serde_json::json!({
            "version": 1,
            "paths": [{"path": "notes.txt", "actions": ["created"]}],
            "elided": [],
        })
    );
}
