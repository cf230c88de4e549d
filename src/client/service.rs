// file: src/client/service.rs
// description: HTTP calls against the /indexing, /search and /delete endpoints
// reference: https://docs.rs/reqwest

use crate::client::documents::load_documents;
use crate::config::{EnvelopeConfig, QueryConfig, ServiceConfig};
use crate::error::{HarnessError, Result};
use crate::models::{
    DeleteOutput, DeleteRequest, Envelope, IndexingOutput, IndexingRequest, SearchOutput,
    SearchRequest, ServiceResponse,
};
use crate::utils::logging::format_banner;
use crate::utils::Validator;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde_json::Value;
use std::io::Write;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

pub const INDEXING_ENDPOINT: &str = "/indexing";
pub const SEARCH_ENDPOINT: &str = "/search";
pub const DELETE_ENDPOINT: &str = "/delete";

const SEARCH_STATUS_MESSAGE: &str = "Response Error!";
const PREDICTION_BANNER: &str = "Prediction Output";

/// Client bound to one service address and one set of envelope identifiers.
#[derive(Debug, Clone)]
pub struct ServiceClient {
    client: Client,
    base_url: String,
    envelope: Envelope,
}

impl ServiceClient {
    pub fn new(service: &ServiceConfig, envelope: &EnvelopeConfig) -> Result<Self> {
        Self::with_base_url(
            service.base_url(),
            Envelope::from(envelope),
            Duration::from_secs(service.timeout_secs),
        )
    }

    pub fn with_base_url(
        base_url: impl Into<String>,
        envelope: Envelope,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Ok(Self {
            client,
            base_url,
            envelope,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn envelope(&self) -> &Envelope {
        &self.envelope
    }

    pub fn indexing_request(&self, documents: Vec<Value>) -> IndexingRequest {
        IndexingRequest::new(self.envelope.clone(), documents)
    }

    pub fn search_request(&self, query: &QueryConfig) -> SearchRequest {
        SearchRequest::new(self.envelope.clone(), query)
    }

    pub fn delete_request(&self, document_id: &str) -> DeleteRequest {
        DeleteRequest::new(self.envelope.clone(), document_id)
    }

    /// Posts `body` as JSON. The body is not parsed here so callers can
    /// check the status first.
    async fn post<T: Serialize + ?Sized>(&self, endpoint: &str, body: &T) -> Result<(u16, String)> {
        let url = format!("{}{}", self.base_url, endpoint);
        debug!("POST {}", url);

        let response = self.client.post(&url).json(body).send().await?;
        let status = response.status().as_u16();
        let text = response.text().await?;

        debug!(
            "{} answered {}: {}",
            endpoint,
            status,
            Validator::truncate_text(&text, 200)
        );

        Ok((status, text))
    }
}

fn ensure_ok(endpoint: &str, status: u16, message: &str) -> Result<()> {
    if status != StatusCode::OK.as_u16() {
        return Err(HarnessError::StatusAssertion {
            endpoint: endpoint.to_string(),
            status,
            message: message.to_string(),
        });
    }
    Ok(())
}

fn parse_body(endpoint: &str, status: u16, text: String) -> Result<ServiceResponse> {
    let body = serde_json::from_str(&text).map_err(|e| {
        HarnessError::Parse(format!("Response from {} is not JSON: {}", endpoint, e))
    })?;

    Ok(ServiceResponse { status, text, body })
}

/// Loads `document_path` and posts it to `/indexing`.
///
/// Prints the status code, fails unless it is 200, then prints the body.
pub async fn run_indexing<W: Write>(
    client: &ServiceClient,
    document_path: &Path,
    out: &mut W,
) -> Result<ServiceResponse> {
    let documents = load_documents(document_path)?;
    info!(
        "Indexing {} documents from {} into {}",
        documents.len(),
        document_path.display(),
        client.base_url()
    );

    let request = client.indexing_request(documents);
    let (status, text) = client.post(INDEXING_ENDPOINT, &request).await?;

    writeln!(out, "{}", status)?;
    ensure_ok(
        INDEXING_ENDPOINT,
        status,
        "Indexing request was not accepted",
    )?;

    let response = parse_body(INDEXING_ENDPOINT, status, text)?;
    writeln!(out, "{}", response.body)?;

    if let Some(output) = response.decode::<IndexingOutput>() {
        info!("Index saved at {}", output.save_path);
    }

    Ok(response)
}

/// Searches the index built from `document_path`.
///
/// Search assumes indexing has just completed, so the documents are indexed
/// again before the query is sent.
pub async fn run_search<W: Write>(
    client: &ServiceClient,
    document_path: &Path,
    query: &QueryConfig,
    out: &mut W,
) -> Result<ServiceResponse> {
    run_indexing(client, document_path, out).await?;

    let request = client.search_request(query);
    info!(
        "Searching {:?} (top_k = {})",
        request.query.text, request.top_k
    );

    let (status, text) = client.post(SEARCH_ENDPOINT, &request).await?;

    writeln!(out, "{}", text)?;
    ensure_ok(SEARCH_ENDPOINT, status, SEARCH_STATUS_MESSAGE)?;

    let response = parse_body(SEARCH_ENDPOINT, status, text)?;
    writeln!(out, "{}", format_banner(PREDICTION_BANNER))?;
    writeln!(out, "{}", response.pretty_body())?;

    if let Some(output) = response.decode::<SearchOutput>() {
        info!("{} related documents", output.related_documents.len());
    }

    Ok(response)
}

pub async fn run_delete<W: Write>(
    client: &ServiceClient,
    document_id: &str,
    out: &mut W,
) -> Result<ServiceResponse> {
    Validator::validate_content_not_empty(document_id)
        .map_err(|_| HarnessError::Validation("document_id must not be empty".to_string()))?;

    let request = client.delete_request(document_id);
    info!("Deleting document {}", document_id);

    let (status, text) = client.post(DELETE_ENDPOINT, &request).await?;

    writeln!(out, "{}", status)?;
    ensure_ok(DELETE_ENDPOINT, status, "Delete request was not accepted")?;

    let response = parse_body(DELETE_ENDPOINT, status, text)?;
    writeln!(out, "{}", response.body)?;

    if let Some(output) = response.decode::<DeleteOutput>() {
        info!("Deleted: {}", output.deleted);
    }

    Ok(response)
}
