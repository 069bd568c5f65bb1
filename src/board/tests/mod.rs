//! Board module tests.
//!
//! Tests are organized into separate files by category:
//! - `perft.rs` - Move generation counts against known positions
//! - `edge_cases.rs` - Special moves, check, mate and stalemate positions
//! - `persistence.rs` - Applying moves never disturbs earlier positions
//! - `proptest.rs` - Property-based tests over random playouts

mod edge_cases;
