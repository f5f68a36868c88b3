//! Thin HTTP client wrapper used by the record store and search transports

use reqwest::Client;
use std::time::Duration;
use thiserror::Error;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Error, Debug)]
pub enum HttpError {
    #[error("request failed: {message}")]
    RequestFailed { message: String },
    #[error("invalid url: {url}")]
    InvalidUrl { url: String },
    #[error("timeout")]
    Timeout,
}

#[derive(Clone, Debug)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    pub fn new() -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client");
        Self { client }
    }

    pub async fn get(
        &self,
        url: &str,
        headers: &[(&str, &str)],
    ) -> Result<HttpResponse, HttpError> {
        let mut request = self.client.get(url);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }
        Self::into_response(request.send().await).await
    }

    pub async fn put(
        &self,
        url: &str,
        body: String,
        headers: &[(&str, &str)],
    ) -> Result<HttpResponse, HttpError> {
        let mut request = self.client.put(url).body(body);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }
        Self::into_response(request.send().await).await
    }

    async fn into_response(
        sent: Result<reqwest::Response, reqwest::Error>,
    ) -> Result<HttpResponse, HttpError> {
        let response = sent.map_err(map_error)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(map_error)?;
        Ok(HttpResponse { status, body })
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

fn map_error(error: reqwest::Error) -> HttpError {
    if error.is_timeout() {
        HttpError::Timeout
    } else if error.is_builder() {
        HttpError::InvalidUrl {
            url: error.url().map(|u| u.to_string()).unwrap_or_default(),
        }
    } else {
        HttpError::RequestFailed {
            message: error.to_string(),
        }
    }
}
