//! Record store access: GET and PUT of bibliographic records by id

use async_trait::async_trait;

use crate::config::SyncConfig;
use crate::http::{HttpClient, HttpError, HttpResponse};

const AUTHORIZATION_HEADER: &str = "Authorization";
const CONTENT_TYPE_HEADER: &str = "Content-Type";
const XML_CONTENT_TYPE: &str = "application/xml";

/// Remote store holding the bibliographic records, addressed by record id.
#[async_trait]
pub trait RecordStore {
    async fn fetch(&self, record_id: &str) -> Result<HttpResponse, HttpError>;
    async fn store(&self, record_id: &str, xml: &str) -> Result<HttpResponse, HttpError>;
}

/// The real record store API: `GET/PUT {base}/bibs/{id}` with an api-key
/// authorization header.
pub struct ApiRecordStore {
    http: HttpClient,
    base_url: String,
    api_key: String,
}

impl ApiRecordStore {
    pub fn new(config: &SyncConfig) -> Self {
        Self {
            http: HttpClient::new(),
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        }
    }

    fn record_url(&self, record_id: &str) -> String {
        format!("{}/bibs/{}", self.base_url, record_id)
    }

    fn authorization(&self) -> String {
        format!("apikey {}", self.api_key)
    }
}

#[async_trait]
impl RecordStore for ApiRecordStore {
    async fn fetch(&self, record_id: &str) -> Result<HttpResponse, HttpError> {
        let authorization = self.authorization();
        self.http
            .get(
                &self.record_url(record_id),
                &[(AUTHORIZATION_HEADER, authorization.as_str())],
            )
            .await
    }

    async fn store(&self, record_id: &str, xml: &str) -> Result<HttpResponse, HttpError> {
        let authorization = self.authorization();
        self.http
            .put(
                &self.record_url(record_id),
                xml.to_string(),
                &[
                    (AUTHORIZATION_HEADER, authorization.as_str()),
                    (CONTENT_TYPE_HEADER, XML_CONTENT_TYPE),
                ],
            )
            .await
    }
}
