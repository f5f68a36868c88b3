//! Error type for MARC document handling

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MarcError {
    #[error("xml error: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("unbalanced element structure in document")]
    Unbalanced,
    #[error("document has no element content")]
    EmptyDocument,
    #[error("document has no record element to insert into")]
    MissingRecord,
}
