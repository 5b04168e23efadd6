#![allow(dead_code)]

pub mod file;
pub mod library;

/// Timestamp pinned through `TWIG_COMMIT_DATE` so digests are reproducible
pub const PINNED_COMMIT_DATE: &str = "2024-03-01 12:30:00 +0200";
