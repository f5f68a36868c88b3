//! Batch path: apply one change event to every affected catalog record

use tracing::{info, warn};

use biblink_domain::ChangeEvent;

use crate::dlq::{DeadLetterQueue, DEAD_LETTER_DELAY};
use crate::error::SyncError;
use crate::links::LinkBuilder;
use crate::resolver::{ReferenceResolver, SearchTransport};
use crate::store::RecordStore;
use crate::syncer::{RecordSyncer, RunSummary};

/// How an invocation ended. Failures local to single records live inside
/// the summary; these variants describe the run as a whole.
#[derive(Debug)]
pub enum RunOutcome {
    /// The event carried nothing that maps to a link; skipped silently.
    NothingToDo,
    /// Neither ISBN form resolved to a record; the event was dead-lettered.
    NoReferenceFound,
    Completed(RunSummary),
}

pub struct ChangeEventHandler<T, S, D> {
    resolver: ReferenceResolver<T>,
    syncer: RecordSyncer<S>,
    links: LinkBuilder,
    dlq: D,
}

impl<T, S, D> ChangeEventHandler<T, S, D>
where
    T: SearchTransport,
    S: RecordStore,
    D: DeadLetterQueue,
{
    pub fn new(
        resolver: ReferenceResolver<T>,
        syncer: RecordSyncer<S>,
        links: LinkBuilder,
        dlq: D,
    ) -> Self {
        Self {
            resolver,
            syncer,
            links,
            dlq,
        }
    }

    /// Process one change event, given as the raw payload so that exactly
    /// this payload can be forwarded to the dead-letter channel.
    ///
    /// A record that fails never aborts its siblings; the payload is
    /// escalated at most once per invocation.
    pub async fn handle(&self, event_body: &str) -> Result<RunOutcome, SyncError> {
        let event: ChangeEvent = serde_json::from_str(event_body)
            .map_err(|error| SyncError::InvalidEvent(error.to_string()))?;

        let updates = self.links.links_for(&event.effective_item());
        if updates.is_empty() {
            info!(isbn = event.keys.isbn.as_str(), "event carries no linkable content");
            return Ok(RunOutcome::NothingToDo);
        }

        let isbn = &event.keys.isbn;
        let references = match self.resolver.resolve_with_fallback(isbn).await {
            Some(references) => references,
            None => {
                warn!(isbn = isbn.as_str(), "no reference found under either isbn form");
                self.dlq.enqueue(event_body, DEAD_LETTER_DELAY).await?;
                return Ok(RunOutcome::NoReferenceFound);
            }
        };
        info!(
            isbn = isbn.as_str(),
            records = references.len(),
            "resolved catalog records"
        );

        let mut outcomes = Vec::with_capacity(references.len());
        for reference in &references {
            outcomes.push(self.syncer.sync_record(&reference.id, &updates).await);
        }

        let summary = RunSummary { outcomes };
        if summary.any_failed() {
            warn!(isbn = isbn.as_str(), "run left permanent failures, escalating payload");
            self.dlq.enqueue(event_body, DEAD_LETTER_DELAY).await?;
        }
        Ok(RunOutcome::Completed(summary))
    }
}
