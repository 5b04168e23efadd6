//! Core repository components
//!
//! This module contains the on-disk areas of a repository:
//!
//! - `database`: Object database for storing blobs, commits and staging indexes
//! - `refs`: Reference management (branches, HEAD)
//! - `repository`: High-level repository operations and coordination
//! - `staging`: Pointer to the live staging index
//! - `workspace`: Working directory file system operations

pub mod database;
pub mod refs;
pub mod repository;
pub mod staging;
pub mod workspace;
