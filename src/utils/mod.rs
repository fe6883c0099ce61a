//! Internal helpers shared by the graph operations.

pub mod parallel;
