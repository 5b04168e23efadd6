//! twig: a miniature version control engine
//!
//! The crate is organised the same way a real VCS is layered:
//!
//! - `areas`: the on-disk areas of a repository (object database, refs,
//!   staging pointer, working tree) and the `Repository` that ties them together
//! - `artifacts`: the value types stored in those areas (blobs, commits,
//!   staged changes) and the algorithms over them (ancestry, merge, status)
//! - `commands`: the user-facing operations, implemented on `Repository`
//! - `errors`: the error taxonomy surfaced by the commands

/// Debug logging for the ancestry and merge algorithms, compiled in only with
/// the `debug_merge` feature.
macro_rules! debug_log {
    ($($arg:tt)*) => {
        #[cfg(feature = "debug_merge")]
        {
            eprintln!($($arg)*);
        }
    };
}

pub mod areas;
pub mod artifacts;
pub mod commands;
pub mod errors;
