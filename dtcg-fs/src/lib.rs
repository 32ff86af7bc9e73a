//! Filesystem abstraction for the conformance harness.
//!
//! This crate provides:
//! - Filesystem trait for reads, recursive directory walks and atomic writes
//! - RealFilesystem backed by `std::fs`
//! - MockFilesystem for deterministic tests

pub mod filesystem;

pub use filesystem::{Filesystem, FsError, MockFilesystem, RealFilesystem};
