//! Skillscope: semantic skill matching and gap scoring engine
//!
//! Compares free-text skill mentions from a resume against job-posting
//! requirements in embedding space, clusters synonymous mentions, and ranks
//! matches with a quality tier and gap report.

pub mod analysis;
pub mod cli;
pub mod config;
pub mod embedding;
pub mod error;
pub mod output;
pub mod semantic;

pub use config::Config;
pub use error::{Result, SkillScopeError};
