//! Command implementations
//!
//! Every operation lives under `porcelain`, one file per command.

pub mod porcelain;
