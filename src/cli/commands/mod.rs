//! CLI command implementations

pub mod inspect;
pub mod stats;
pub mod train;
