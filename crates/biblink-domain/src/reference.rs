//! Catalog record references returned by the ISBN search service

use serde::{Deserialize, Serialize};

/// One catalog record identifier matching a searched ISBN. A single ISBN may
/// resolve to several references (print and electronic copies are separate
/// records).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    pub id: String,
}
