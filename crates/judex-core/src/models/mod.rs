//! Data models and configuration.

pub mod case;
pub mod classe;
pub mod config;

pub use case::*;
pub use classe::{CaseClass, CASE_CLASSES};
pub use config::JudexConfig;
