// src/fetch/mod.rs

//! Cached, atomic acquisition of remote resources.
//!
//! - [`download`] owns the cache lookup, the streaming HTTP transfer and
//!   the temp-file/rename atomicity that backs it.
//! - [`archive`] extracts a single member from a (possibly compressed) tar
//!   archive in streaming mode.

pub mod archive;
pub mod download;

pub use archive::extract_member;
pub use download::{cached_file_name, fetch_cached, install_from_cache, store_stream};
