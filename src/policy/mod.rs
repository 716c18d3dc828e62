pub mod config;
pub mod engine;
pub mod linter;
pub mod parser;
pub mod types;

pub use config::{GateConfig, UnparsableHost};
pub use engine::PolicyEngine;
pub use types::*;
