//! Temporary path detection
//!
//! The send tool first creates new inodes under an orphan name
//! `o<ino>-<gen>-0` in the subvolume root and renames them into place later.

use once_cell::sync::Lazy;
use regex::Regex;

static TEMPORARY_PATH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^o\d+-\d+-0$").expect("valid regex"));

/// Whether `path` is a send-tool orphan name.
pub fn is_temporary(path: &str) -> bool {
    TEMPORARY_PATH.is_match(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_orphan_names() {
        assert!(is_temporary("o257-5-0"));
        assert!(is_temporary("o1-1-0"));
        assert!(is_temporary("o123-45-0"));
    }

    #[test]
    fn test_regular_names() {
        assert!(!is_temporary(""));
        assert!(!is_temporary("o257-5-1"));
        assert!(!is_temporary("o257-5-0.bak"));
        assert!(!is_temporary("dir/o257-5-0"));
        assert!(!is_temporary("o-5-0"));
        assert!(!is_temporary("x257-5-0"));
    }

    proptest! {
        #[test]
        fn generated_orphan_names_match(ino in any::<u64>(), gen in any::<u64>()) {
            let name = format!("o{}-{}-0", ino, gen);
            prop_assert!(is_temporary(&name));
        }

        #[test]
        fn nested_names_never_match(dir in "[a-z]{1,8}", ino in 0u64..10_000) {
            let name = format!("{}/o{}-1-0", dir, ino);
            prop_assert!(!is_temporary(&name));
        }
    }
}
