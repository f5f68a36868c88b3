//! Catalog record synchronization for the biblink suite
//!
//! Ties the pure pieces together: a change event from the content store is
//! turned into link updates, the affected catalog records are resolved by
//! ISBN (falling back to the alternate ISBN form), and each record is
//! fetched, mutated and stored with bounded retries. Work that permanently
//! fails is escalated to a dead-letter collaborator instead of being lost.
//!
//! Remote collaborators are reached through the [`store::RecordStore`],
//! [`resolver::SearchTransport`] and [`dlq::DeadLetterQueue`] traits so the
//! orchestration is testable without a network.

pub mod config;
pub mod dlq;
pub mod error;
pub mod handler;
pub mod http;
pub mod interactive;
pub mod links;
pub mod resolver;
pub mod retry;
pub mod store;
pub mod syncer;

pub use config::{ConfigError, SyncConfig};
pub use dlq::{DeadLetterError, DeadLetterQueue, LoggingDeadLetter, DEAD_LETTER_DELAY};
pub use error::SyncError;
pub use handler::{ChangeEventHandler, RunOutcome};
pub use http::{HttpClient, HttpError, HttpResponse};
pub use interactive::{InteractiveHandler, UpdateRequest, UpdateResponse};
pub use links::{ContentKind, ImageSize, LinkBuilder};
pub use resolver::{parse_reference_list, ReferenceResolver, SearchTransport, SruSearch};
pub use retry::{with_retries, RetryPolicy, RetryResult};
pub use store::{ApiRecordStore, RecordStore};
pub use syncer::{RecordOutcome, RecordStatus, RecordSyncer, RunStatus, RunSummary};
