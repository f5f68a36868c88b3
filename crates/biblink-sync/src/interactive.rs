//! Synchronous path: apply one caller-supplied link to a title's records

use serde::Deserialize;
use tracing::info;

use biblink_domain::LinkUpdate;

use crate::resolver::{ReferenceResolver, SearchTransport};
use crate::store::RecordStore;
use crate::syncer::{RecordStatus, RecordSyncer, RunSummary};

/// Caller-supplied update: a link plus its material label for one ISBN.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateRequest {
    #[serde(default)]
    pub isbn: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub url: String,
}

/// Structured response for the synchronous caller: a numeric status and a
/// human-readable multi-line body summarizing per-record outcomes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateResponse {
    pub status: u16,
    pub body: String,
}

const STATUS_OK: u16 = 200;
const STATUS_MULTI: u16 = 207;
const STATUS_BAD_REQUEST: u16 = 400;
const STATUS_CONFLICT: u16 = 409;
const STATUS_ERROR: u16 = 500;

pub struct InteractiveHandler<T, S> {
    resolver: ReferenceResolver<T>,
    syncer: RecordSyncer<S>,
}

impl<T, S> InteractiveHandler<T, S>
where
    T: SearchTransport,
    S: RecordStore,
{
    pub fn new(resolver: ReferenceResolver<T>, syncer: RecordSyncer<S>) -> Self {
        Self { resolver, syncer }
    }

    /// Validate, resolve, and apply the link to every resolved record.
    ///
    /// 200 when everything went through (at least one record newly updated),
    /// 409 when every record already carried the link, 207 on mixed
    /// outcomes, 400 on bad input or an unresolvable isbn, 500 when every
    /// record failed remotely.
    pub async fn handle(&self, request: &UpdateRequest) -> UpdateResponse {
        if let Some(missing) = first_missing_parameter(request) {
            return UpdateResponse {
                status: STATUS_BAD_REQUEST,
                body: format!("missing required parameter: {}", missing),
            };
        }

        let references = match self.resolver.resolve_with_fallback(&request.isbn).await {
            Some(references) => references,
            None => {
                return UpdateResponse {
                    status: STATUS_BAD_REQUEST,
                    body: format!("no catalog record found for isbn {}", request.isbn),
                }
            }
        };
        info!(
            isbn = request.isbn.as_str(),
            records = references.len(),
            "resolved catalog records"
        );

        let update = LinkUpdate::new(&request.isbn, &request.url, &request.description);
        let mut outcomes = Vec::with_capacity(references.len());
        for reference in &references {
            outcomes.push(
                self.syncer
                    .sync_record(&reference.id, std::slice::from_ref(&update))
                    .await,
            );
        }

        let summary = RunSummary { outcomes };
        UpdateResponse {
            status: response_status(&summary),
            body: summary.describe(),
        }
    }
}

fn first_missing_parameter(request: &UpdateRequest) -> Option<&'static str> {
    if request.isbn.trim().is_empty() {
        Some("isbn")
    } else if request.description.trim().is_empty() {
        Some("description")
    } else if request.url.trim().is_empty() {
        Some("url")
    } else {
        None
    }
}

fn response_status(summary: &RunSummary) -> u16 {
    let succeeded = summary.outcomes.iter().filter(|o| o.succeeded()).count();
    let failed = summary.outcomes.len() - succeeded;
    let all_current = summary
        .outcomes
        .iter()
        .all(|o| o.status == RecordStatus::AlreadyUpToDate);

    if failed == 0 && all_current {
        STATUS_CONFLICT
    } else if failed == 0 {
        STATUS_OK
    } else if succeeded > 0 {
        STATUS_MULTI
    } else {
        STATUS_ERROR
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::time::Duration;

    use crate::http::{HttpError, HttpResponse};
    use crate::retry::RetryPolicy;

    const RECORD: &str = concat!(
        r#"<bib><mms_id>991</mms_id><record>"#,
        r#"<datafield ind1=" " ind2=" " tag="020"><subfield code="a">9788205377547</subfield></datafield>"#,
        r#"<datafield ind1=" " ind2=" " tag="913"><subfield code="a">Norbok</subfield></datafield>"#,
        r#"</record></bib>"#
    );

    struct OneHitSearch;

    #[async_trait]
    impl SearchTransport for OneHitSearch {
        async fn lookup(&self, isbn: &str) -> Result<HttpResponse, HttpError> {
            let body = if isbn == "9788205377547" {
                r#"[{"id": "991"}]"#.to_string()
            } else {
                String::new()
            };
            Ok(HttpResponse { status: 200, body })
        }
    }

    struct EmptySearch;

    #[async_trait]
    impl SearchTransport for EmptySearch {
        async fn lookup(&self, _isbn: &str) -> Result<HttpResponse, HttpError> {
            Ok(HttpResponse {
                status: 200,
                body: String::new(),
            })
        }
    }

    struct FixedRecordStore {
        record: String,
        puts: Mutex<Vec<String>>,
        fail_puts: bool,
    }

    #[async_trait]
    impl RecordStore for FixedRecordStore {
        async fn fetch(&self, _record_id: &str) -> Result<HttpResponse, HttpError> {
            Ok(HttpResponse {
                status: 200,
                body: self.record.clone(),
            })
        }

        async fn store(&self, _record_id: &str, xml: &str) -> Result<HttpResponse, HttpError> {
            if self.fail_puts {
                return Ok(HttpResponse {
                    status: 500,
                    body: String::new(),
                });
            }
            self.puts.lock().unwrap().push(xml.to_string());
            Ok(HttpResponse {
                status: 200,
                body: String::new(),
            })
        }
    }

    fn request() -> UpdateRequest {
        UpdateRequest {
            isbn: "9788205377547".to_string(),
            description: "Omslagsbilde".to_string(),
            url: "http://img/large/7/4/9788205377547.jpg".to_string(),
        }
    }

    fn syncer(record: &str, fail_puts: bool) -> RecordSyncer<FixedRecordStore> {
        RecordSyncer::with_policy(
            FixedRecordStore {
                record: record.to_string(),
                puts: Mutex::new(Vec::new()),
                fail_puts,
            },
            RetryPolicy {
                max_attempts: 3,
                backoff: Duration::ZERO,
            },
        )
    }

    #[tokio::test]
    async fn test_missing_parameter_is_rejected_before_any_call() {
        let handler = InteractiveHandler::new(
            ReferenceResolver::new(OneHitSearch),
            syncer(RECORD, false),
        );
        let mut request = request();
        request.url = "  ".to_string();
        let response = handler.handle(&request).await;
        assert_eq!(response.status, 400);
        assert_eq!(response.body, "missing required parameter: url");
    }

    #[tokio::test]
    async fn test_unresolvable_isbn_is_a_client_error() {
        let handler = InteractiveHandler::new(
            ReferenceResolver::new(EmptySearch),
            syncer(RECORD, false),
        );
        let response = handler.handle(&request()).await;
        assert_eq!(response.status, 400);
        assert!(response.body.contains("no catalog record found"));
    }

    #[tokio::test]
    async fn test_successful_update_answers_200() {
        let handler = InteractiveHandler::new(
            ReferenceResolver::new(OneHitSearch),
            syncer(RECORD, false),
        );
        let response = handler.handle(&request()).await;
        assert_eq!(response.status, 200);
        assert!(response.body.contains("record 991: updated"));
    }

    #[tokio::test]
    async fn test_already_applied_answers_409() {
        // a record that already carries the exact link and label
        let applied = RECORD.replace(
            r#"<datafield ind1=" " ind2=" " tag="913">"#,
            concat!(
                r#"<datafield ind1="4" ind2="2" tag="856">"#,
                r#"<subfield code="3">Omslagsbilde</subfield>"#,
                r#"<subfield code="u">http://img/large/7/4/9788205377547.jpg</subfield>"#,
                r#"<subfield code="q">image/jpeg</subfield>"#,
                r#"</datafield>"#,
                r#"<datafield ind1=" " ind2=" " tag="913">"#
            ),
        );
        let handler = InteractiveHandler::new(
            ReferenceResolver::new(OneHitSearch),
            syncer(&applied, false),
        );
        let response = handler.handle(&request()).await;
        assert_eq!(response.status, 409);
        assert!(response.body.contains("already up to date"));
    }

    struct TwoHitSearch;

    #[async_trait]
    impl SearchTransport for TwoHitSearch {
        async fn lookup(&self, isbn: &str) -> Result<HttpResponse, HttpError> {
            let body = if isbn == "9788205377547" {
                r#"[{"id": "991"}, {"id": "992"}]"#.to_string()
            } else {
                String::new()
            };
            Ok(HttpResponse { status: 200, body })
        }
    }

    struct PerIdStore {
        record: String,
        fail_id: &'static str,
    }

    #[async_trait]
    impl RecordStore for PerIdStore {
        async fn fetch(&self, _record_id: &str) -> Result<HttpResponse, HttpError> {
            Ok(HttpResponse {
                status: 200,
                body: self.record.clone(),
            })
        }

        async fn store(&self, record_id: &str, _xml: &str) -> Result<HttpResponse, HttpError> {
            let status = if record_id == self.fail_id { 500 } else { 200 };
            Ok(HttpResponse {
                status,
                body: String::new(),
            })
        }
    }

    #[tokio::test]
    async fn test_mixed_outcomes_answer_207() {
        let handler = InteractiveHandler::new(
            ReferenceResolver::new(TwoHitSearch),
            RecordSyncer::with_policy(
                PerIdStore {
                    record: RECORD.to_string(),
                    fail_id: "992",
                },
                RetryPolicy {
                    max_attempts: 3,
                    backoff: Duration::ZERO,
                },
            ),
        );
        let response = handler.handle(&request()).await;
        assert_eq!(response.status, 207);
        assert!(response.body.contains("record 991: updated"));
        assert!(response.body.contains("record 992: store failed"));
    }

    #[tokio::test]
    async fn test_all_remote_failures_answer_500() {
        let handler = InteractiveHandler::new(
            ReferenceResolver::new(OneHitSearch),
            syncer(RECORD, true),
        );
        let response = handler.handle(&request()).await;
        assert_eq!(response.status, 500);
        assert!(response.body.contains("store failed"));
    }
}
