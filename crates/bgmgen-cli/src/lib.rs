//! bgmgen CLI library.
//!
//! This crate provides the command implementations behind the `bgmgen`
//! binary: document loading, atomic output, logging setup, and the
//! validate, generate, generate-all and plan commands.

pub mod commands;
pub mod input;
pub mod logging;
pub mod output;
