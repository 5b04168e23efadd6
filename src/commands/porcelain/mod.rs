//! Porcelain commands (user-facing operations)
//!
//! Each command is an `impl Repository` block printing through the
//! repository's writer. Failures are [`RepositoryError`](crate::errors::RepositoryError)s
//! raised through `anyhow`.
//!
//! ## Commands
//!
//! - `init`: Initialize a new repository
//! - `add`, `rm`: Stage and unstage files
//! - `commit`: Create a new commit
//! - `log`: Show commit history (`log`, `global_log`, `find`)
//! - `status`: Show working tree status
//! - `branch`: Create or delete branches
//! - `checkout`: Switch branches or restore files
//! - `reset`: Move the current branch to any commit
//! - `merge`: Three-way merge of another branch

pub mod add;
pub mod branch;
pub mod checkout;
pub mod commit;
pub mod init;
pub mod log;
pub mod merge;
pub mod reset;
pub mod rm;
pub mod status;
