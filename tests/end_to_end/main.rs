//! End-to-end test suite
//!
//! Drives the public facade from raw bytes to narration.
//!
//! ## Test Groups
//!
//! - **scenarios**: hand-built streams with exact expected output
//! - **properties**: invariants that hold for every stream
//! - **files**: stream files on disk, read and deleted through the source API
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test --test end_to_end
//! ```

mod test_utils;

mod files;
mod properties;
mod scenarios;
