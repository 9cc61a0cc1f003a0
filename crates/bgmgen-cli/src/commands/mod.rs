//! CLI command implementations

pub mod generate;
pub mod generate_all;
pub mod json_output;
pub mod plan;
pub mod validate;

mod reporting;
