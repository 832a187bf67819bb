//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that exercises a specific subsystem
//! against the recording mock board. All tests run on the host with no
//! real hardware required.

mod bone_tests;
mod fixture_tests;
mod installation_tests;
mod mock_board;
