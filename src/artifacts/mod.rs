//! Value types and algorithms
//!
//! - `branch`: Branch names and revision parsing
//! - `core`: Shared utilities (pager wrapper)
//! - `merge`: Ancestry search and three-way resolution
//! - `objects`: Object types (blob, commit, staged changes)
//! - `status`: Working tree status inspection

pub mod branch;
pub mod core;
pub mod merge;
pub mod objects;
pub mod status;
