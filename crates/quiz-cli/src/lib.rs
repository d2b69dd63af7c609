//! Quiz runner CLI library.
//!
//! This crate provides the terminal front-end for the quiz core: argument
//! parsing, configuration, input bindings and screen rendering.

mod cli;
pub mod commands;
mod config;
pub mod input;
pub mod render;

pub use cli::{Cli, Commands};
pub use config::Config;
