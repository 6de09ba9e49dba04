//! Constants shared across crates

pub mod limits;

pub use limits::*;
