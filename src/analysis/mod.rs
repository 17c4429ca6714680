//! Analysis layer: inventories, requirements, match scoring, gap clustering

pub mod clusterer;
pub mod inventory;
pub mod requirements;
pub mod scoring;
