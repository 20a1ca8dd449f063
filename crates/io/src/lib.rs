// File I/O operations

pub mod applicants;
pub mod csv;
pub mod xlsx;

pub use applicants::{export_targets, load_input, SourcePaths};
