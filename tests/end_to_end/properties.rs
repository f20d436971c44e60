//! Invariants over generated streams

use crate::test_utils::*;
use proptest::prelude::*;
use snapdiff::{decode, is_temporary, narrate, DecodeOptions, NarrateOptions, Operation};

fn arb_name() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z]{1,5}",
        (1u32..100).prop_map(|ino| format!("o{}-1-0", ino)),
    ]
}

fn arb_op() -> impl Strategy<Value = Operation> {
    prop_oneof![
        arb_name().prop_map(|path| Operation::MakeFile { path }),
        arb_name().prop_map(|path| Operation::MakeDirectory { path }),
        arb_name().prop_map(|path| Operation::Unlink { path }),
        arb_name().prop_map(|path| Operation::RemoveDirectory { path }),
        (arb_name(), arb_name()).prop_map(|(a, b)| rename(&a, &b)),
        (arb_name(), 0u64..1 << 32, 1u64..1 << 16).prop_map(|(p, o, l)| extent(&p, o, l)),
        (arb_name(), any::<u64>()).prop_map(|(path, secs)| {
            let t = snapdiff::Timespec::new(secs % (1 << 34), 0);
            Operation::SetTimes {
                path,
                atime: t,
                mtime: t,
                ctime: t,
            }
        }),
    ]
}

proptest! {
    #[test]
    fn decode_is_deterministic(ops in proptest::collection::vec(arb_op(), 0..32)) {
        let buf = stream_bytes(&ops);
        let options = DecodeOptions::new().with_lineage(true);
        prop_assert_eq!(decode(&buf, &options).unwrap(), decode(&buf, &options).unwrap());
    }

    #[test]
    fn end_matches_length(ops in proptest::collection::vec(arb_op(), 0..32)) {
        let buf = stream_bytes(&ops);
        let decoded = decode(&buf, &DecodeOptions::default()).unwrap();
        prop_assert_eq!(decoded.end(), Some((buf.len() as u64, buf.len() as u64)));
    }

    #[test]
    fn path_bearing_commands_expose_paths(ops in proptest::collection::vec(arb_op(), 0..32)) {
        let decoded = decode_ops(&ops, false);
        for command in &decoded.commands {
            prop_assert_eq!(command.path().is_some(), command.opcode().has_path());
        }
    }

    #[test]
    fn heuristic_output_never_lists_temporary_paths(ops in proptest::collection::vec(arb_op(), 0..32)) {
        let decoded = decode_ops(&ops, true);
        let narration = narrate(&decoded, &NarrateOptions::heuristic());
        for entry in &narration.paths {
            prop_assert!(!is_temporary(&entry.path), "{}", entry.path);
        }
    }

    #[test]
    fn collapsed_times_leave_at_most_one_line(ops in proptest::collection::vec(arb_op(), 0..32)) {
        let decoded = decode_ops(&ops, false);
        let narration = narrate(&decoded, &NarrateOptions::new().with_collapse_times(true));
        for entry in &narration.paths {
            let times = entry.actions.iter().filter(|l| l.starts_with("times ")).count();
            prop_assert!(times <= 1);
        }
    }
}
