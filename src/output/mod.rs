//! Report rendering for downstream consumers

pub mod report;
