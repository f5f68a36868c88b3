//! MARC21 record mutation for the biblink suite
//!
//! This crate owns the non-trivial half of record synchronization: deciding
//! whether a link is already represented on a bibliographic record, building
//! the 856/956 datafield that represents it, and inserting that field at the
//! position MARC tag ordering mandates without corrupting malformed input.
//!
//! Records are modeled as an explicit element tree parsed with quick-xml;
//! serialization is deterministic single-line XML without a declaration, so
//! repeated applications of the same update are byte-for-byte no-ops.

pub mod error;
pub mod record;
pub mod xml;

pub use error::MarcError;
pub use record::*;
pub use xml::*;
