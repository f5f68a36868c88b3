//! ISBN-to-record resolution through the SRU search collaborator

use async_trait::async_trait;
use tracing::{info, warn};

use biblink_domain::Reference;
use biblink_identifiers::opposite_form;

use crate::config::SyncConfig;
use crate::http::{HttpClient, HttpError, HttpResponse};

/// Transport for the reference search; answers with the raw response of
/// `GET {endpoint}{isbn}`.
#[async_trait]
pub trait SearchTransport {
    async fn lookup(&self, isbn: &str) -> Result<HttpResponse, HttpError>;
}

pub struct SruSearch {
    http: HttpClient,
    endpoint: String,
}

impl SruSearch {
    pub fn new(config: &SyncConfig) -> Self {
        Self {
            http: HttpClient::new(),
            endpoint: config.sru_endpoint.clone(),
        }
    }
}

#[async_trait]
impl SearchTransport for SruSearch {
    async fn lookup(&self, isbn: &str) -> Result<HttpResponse, HttpError> {
        let url = format!("{}{}", self.endpoint, urlencoding::encode(isbn));
        self.http.get(&url, &[]).await
    }
}

/// Parse a search response body into references.
///
/// An empty body, an empty array, or a body that does not parse all mean
/// "no answer" here; a malformed answer must not abort the invocation.
pub fn parse_reference_list(body: &str) -> Option<Vec<Reference>> {
    if body.trim().is_empty() {
        return None;
    }
    match serde_json::from_str::<Vec<Reference>>(body) {
        Ok(list) if list.is_empty() => None,
        Ok(list) => Some(list),
        Err(error) => {
            warn!(%error, "search answered with an unparseable reference list");
            None
        }
    }
}

/// Resolves an ISBN to catalog record references, retrying under the
/// alternate ISBN form when the primary form yields nothing.
pub struct ReferenceResolver<T> {
    transport: T,
}

impl<T: SearchTransport> ReferenceResolver<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    async fn lookup(&self, isbn: &str) -> Option<Vec<Reference>> {
        match self.transport.lookup(isbn).await {
            Ok(response) if response.is_ok() => parse_reference_list(&response.body),
            Ok(response) => {
                warn!(isbn, status = response.status, "reference search answered non-success");
                None
            }
            Err(error) => {
                warn!(isbn, %error, "reference search failed");
                None
            }
        }
    }

    /// Resolve `isbn`, falling back to its checksum-alternate form.
    ///
    /// When the primary form answers, the alternate form is searched as well
    /// and its references are unioned in; some titles are cataloged under
    /// both forms at once. Returns None only when both forms yield nothing.
    pub async fn resolve_with_fallback(&self, isbn: &str) -> Option<Vec<Reference>> {
        let alternate = match opposite_form(isbn) {
            Ok(alternate) => Some(alternate),
            Err(error) => {
                warn!(isbn, %error, "isbn has no alternate form");
                None
            }
        };

        match self.lookup(isbn).await {
            Some(mut references) => {
                if let Some(alternate) = alternate {
                    match self.lookup(&alternate).await {
                        Some(more) => references.extend(more),
                        None => info!(isbn = alternate.as_str(), "no references under alternate form"),
                    }
                }
                dedup_by_id(&mut references);
                Some(references)
            }
            None => {
                info!(isbn, "no references under primary form");
                let alternate = alternate?;
                self.lookup(&alternate).await
            }
        }
    }
}

fn dedup_by_id(references: &mut Vec<Reference>) {
    let mut seen = std::collections::HashSet::new();
    references.retain(|r| seen.insert(r.id.clone()));
}
