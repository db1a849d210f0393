//! Per-table query modules.

pub mod applications;
pub mod participants;
pub mod plans;
