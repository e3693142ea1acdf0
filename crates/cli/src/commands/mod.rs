//! CLI task implementations.

pub mod help;
pub mod install;
pub mod package;
pub mod service;
