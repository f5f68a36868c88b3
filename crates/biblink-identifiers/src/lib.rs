//! ISBN handling for the biblink suite
//!
//! This crate provides the ISBN plumbing the synchronizer needs:
//! - normalization of raw ISBN strings
//! - ISBN-10 and ISBN-13 checksum validation
//! - conversion between the two forms, used to retry catalog lookups under
//!   the alternate form when the primary form yields nothing

pub mod isbn;

pub use isbn::*;
