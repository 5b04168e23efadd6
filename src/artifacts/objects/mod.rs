//! Stored object types
//!
//! Every object lives in the database under the SHA-1 digest of its serialized
//! form, `<type> <size>\0<content>`. There are three kinds:
//!
//! - **Blob**: the bytes of one file version
//! - **Commit**: a snapshot of every tracked path plus parent links
//! - **Staged**: the pending additions and removals of the staging index

pub mod blob;
pub mod commit;
pub mod object;
pub mod object_id;
pub mod object_type;
pub mod staged;

/// Length of a SHA-1 digest in hexadecimal format
pub const OBJECT_ID_LENGTH: usize = 40;

/// Length of the abbreviated digest used in human-facing output
pub const SHORT_OBJECT_ID_LENGTH: usize = 7;
