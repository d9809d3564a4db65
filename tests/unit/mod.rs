//! Unit tests for ringflow modules
//!
//! These tests cover the buffer operations, the observation contract and the
//! error paths without any I/O.

mod test_observe;
