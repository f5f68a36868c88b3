//! Fetch, mutate and store one record at a time

use tracing::{info, warn};

use biblink_domain::LinkUpdate;
use biblink_marc::MarcDocument;

use crate::retry::{with_retries, RetryPolicy, RetryResult};
use crate::store::RecordStore;

/// What happened to one record during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordStatus {
    /// The record was mutated and stored.
    Updated { inserted: usize },
    /// Every link was already represented; nothing was stored.
    AlreadyUpToDate,
    /// The fetch never answered success within the retry bound.
    FetchFailed { last_status: Option<u16> },
    /// The record was mutated but the store never answered success.
    StoreFailed { last_status: Option<u16> },
    /// The fetched document could not be parsed or mutated; not retried.
    Malformed { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordOutcome {
    pub record_id: String,
    pub status: RecordStatus,
    /// Attempts used by the last remote operation on this record.
    pub attempts: u32,
}

impl RecordOutcome {
    pub fn succeeded(&self) -> bool {
        matches!(
            self.status,
            RecordStatus::Updated { .. } | RecordStatus::AlreadyUpToDate
        )
    }

    pub fn describe(&self) -> String {
        match &self.status {
            RecordStatus::Updated { inserted } => {
                format!("record {}: updated, {} link(s) added", self.record_id, inserted)
            }
            RecordStatus::AlreadyUpToDate => {
                format!("record {}: already up to date", self.record_id)
            }
            RecordStatus::FetchFailed { last_status } => format!(
                "record {}: fetch failed after {} attempts{}",
                self.record_id,
                self.attempts,
                describe_status(last_status)
            ),
            RecordStatus::StoreFailed { last_status } => format!(
                "record {}: store failed after {} attempts{}",
                self.record_id,
                self.attempts,
                describe_status(last_status)
            ),
            RecordStatus::Malformed { message } => {
                format!("record {}: unusable record, {}", self.record_id, message)
            }
        }
    }
}

fn describe_status(last_status: &Option<u16>) -> String {
    match last_status {
        Some(status) => format!(" (last status {})", status),
        None => " (no response)".to_string(),
    }
}

/// Aggregated result of one invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    AllSucceeded,
    PartiallySucceeded,
    AllFailed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub outcomes: Vec<RecordOutcome>,
}

impl RunSummary {
    pub fn status(&self) -> RunStatus {
        let succeeded = self.outcomes.iter().filter(|o| o.succeeded()).count();
        let failed = self.outcomes.len() - succeeded;
        match (succeeded, failed) {
            (_, 0) => RunStatus::AllSucceeded,
            (0, _) => RunStatus::AllFailed,
            _ => RunStatus::PartiallySucceeded,
        }
    }

    pub fn any_failed(&self) -> bool {
        self.outcomes.iter().any(|o| !o.succeeded())
    }

    /// One line per record, for logs and the interactive response body.
    pub fn describe(&self) -> String {
        self.outcomes
            .iter()
            .map(RecordOutcome::describe)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Applies a set of link updates to one record in the remote store.
pub struct RecordSyncer<S> {
    pub(crate) store: S,
    policy: RetryPolicy,
}

impl<S: RecordStore> RecordSyncer<S> {
    pub fn new(store: S) -> Self {
        Self::with_policy(store, RetryPolicy::default())
    }

    pub fn with_policy(store: S, policy: RetryPolicy) -> Self {
        Self { store, policy }
    }

    /// GET the record, fold the updates into it, PUT it back.
    ///
    /// A failed fetch abandons the record; a failed store does not refetch,
    /// only the PUT itself is retried. Parse failures are terminal for this
    /// record and never retried.
    pub async fn sync_record(&self, record_id: &str, updates: &[LinkUpdate]) -> RecordOutcome {
        let (xml, fetch_attempts) =
            match with_retries(&self.policy, || self.store.fetch(record_id)).await {
                RetryResult::Success { response, attempts } => (response.body, attempts),
                RetryResult::Exhausted {
                    last_status,
                    attempts,
                } => {
                    warn!(record_id, "giving up fetching record");
                    return RecordOutcome {
                        record_id: record_id.to_string(),
                        status: RecordStatus::FetchFailed { last_status },
                        attempts,
                    };
                }
            };

        let mut document = match MarcDocument::parse(&xml) {
            Ok(document) => document,
            Err(error) => {
                return RecordOutcome {
                    record_id: record_id.to_string(),
                    status: RecordStatus::Malformed {
                        message: error.to_string(),
                    },
                    attempts: fetch_attempts,
                }
            }
        };

        let inserted = match document.apply_updates(updates) {
            Ok(inserted) => inserted,
            Err(error) => {
                return RecordOutcome {
                    record_id: record_id.to_string(),
                    status: RecordStatus::Malformed {
                        message: error.to_string(),
                    },
                    attempts: fetch_attempts,
                }
            }
        };

        if inserted == 0 {
            info!(record_id, "every link already represented");
            return RecordOutcome {
                record_id: record_id.to_string(),
                status: RecordStatus::AlreadyUpToDate,
                attempts: fetch_attempts,
            };
        }

        let body = match document.to_xml() {
            Ok(body) => body,
            Err(error) => {
                return RecordOutcome {
                    record_id: record_id.to_string(),
                    status: RecordStatus::Malformed {
                        message: error.to_string(),
                    },
                    attempts: fetch_attempts,
                }
            }
        };

        match with_retries(&self.policy, || self.store.store(record_id, &body)).await {
            RetryResult::Success { attempts, .. } => {
                info!(record_id, inserted, "record updated");
                RecordOutcome {
                    record_id: record_id.to_string(),
                    status: RecordStatus::Updated { inserted },
                    attempts,
                }
            }
            RetryResult::Exhausted {
                last_status,
                attempts,
            } => {
                warn!(record_id, "giving up storing record");
                RecordOutcome {
                    record_id: record_id.to_string(),
                    status: RecordStatus::StoreFailed { last_status },
                    attempts,
                }
            }
        }
    }
}
