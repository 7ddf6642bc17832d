//! Queue service client trait and NFZ implementation.
//!
//! The [`QueueApi`] trait abstracts the queues endpoint so pagination and
//! orchestration can run against scripted pages in tests. The
//! [`NfzClient`] implementation talks to the National Health Fund's
//! public itl API via `reqwest`.

use std::future::Future;
use std::time::Duration;

use super::error::FetchError;
use super::models::{ApiResponse, BenefitsResponse};
use crate::region::Voivodeship;

/// Records per page. The service caps `limit` at 25; every fetch asks
/// for exactly that, and a shorter page means the last page.
pub const PAGE_SIZE: u32 = 25;

/// API version the models in this crate are written against.
const API_VERSION: &str = "1.3";

/// Case urgency sent with every queue query: 1 = stable.
const CASE_STABLE: u8 = 1;

/// Default HTTP timeout for a single page fetch.
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// User agent sent with every request.
const USER_AGENT: &str = concat!("kolejka/", env!("CARGO_PKG_VERSION"));

/// One page worth of query: which region, which benefit, which page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageQuery {
    /// Region whose queues are being listed.
    pub region: Voivodeship,
    /// Benefit search term, matched by the service as a substring.
    pub benefit: String,
    /// 1-based page number.
    pub page: u32,
    /// Restrict listings to services for children.
    pub for_children: bool,
}

impl PageQuery {
    /// First page of a (region, benefit) stream.
    pub fn first(region: Voivodeship, benefit: impl Into<String>, for_children: bool) -> Self {
        Self {
            region,
            benefit: benefit.into(),
            page: 1,
            for_children,
        }
    }
}

/// Trait for fetching queue listings and benefit names.
pub trait QueueApi: Send + Sync {
    /// Fetch one page of queue listings.
    fn fetch_queue_page(
        &self,
        query: &PageQuery,
    ) -> impl Future<Output = Result<ApiResponse, FetchError>> + Send;

    /// Fetch one page of benefit names matching a fragment.
    fn fetch_benefit_names(
        &self,
        fragment: &str,
        page: u32,
    ) -> impl Future<Output = Result<BenefitsResponse, FetchError>> + Send;
}

/// NFZ itl API client using direct HTTP requests.
///
/// Uses a reusable `reqwest::Client` with connection pooling and
/// timeouts. The base URL is injected so tests and mirrors can point
/// elsewhere.
pub struct NfzClient {
    /// Reusable HTTP client with connection pooling.
    http: reqwest::Client,

    /// Base URL of the itl API, without a trailing slash.
    base_url: String,
}

impl NfzClient {
    /// Create a new client against the given API base URL.
    pub fn new(base_url: String) -> Self {
        let http = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
            .expect("Failed to build HTTP client");

        Self { http, base_url }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: String,
        query: &[(&str, String)],
    ) -> Result<T, FetchError> {
        let response = self
            .http
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| FetchError::HttpError(e.to_string()))?;

        let status = response.status().as_u16();
        match status {
            200 => {}
            429 => return Err(FetchError::Throttled),
            other => return Err(FetchError::BadStatus(other)),
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| FetchError::HttpError(e.to_string()))?;

        serde_json::from_slice(&bytes).map_err(|e| FetchError::Decode(e.to_string()))
    }
}

impl QueueApi for NfzClient {
    async fn fetch_queue_page(&self, query: &PageQuery) -> Result<ApiResponse, FetchError> {
        let url = format!("{}/queues", self.base_url);
        let params = [
            ("page", query.page.to_string()),
            ("limit", PAGE_SIZE.to_string()),
            ("format", "json".to_string()),
            ("case", CASE_STABLE.to_string()),
            ("province", query.region.code().to_string()),
            ("benefit", query.benefit.clone()),
            ("benefitForChildren", query.for_children.to_string()),
            ("api-version", API_VERSION.to_string()),
        ];

        let page: ApiResponse = self.get_json(url, &params).await?;

        tracing::debug!(
            province = query.region.code(),
            page = query.page,
            total = page.meta.count,
            records = page.data.len(),
            "queue page fetched"
        );

        Ok(page)
    }

    async fn fetch_benefit_names(
        &self,
        fragment: &str,
        page: u32,
    ) -> Result<BenefitsResponse, FetchError> {
        let url = format!("{}/benefits", self.base_url);
        let params = [
            ("page", page.to_string()),
            ("limit", PAGE_SIZE.to_string()),
            ("format", "json".to_string()),
            ("name", fragment.to_string()),
            ("api-version", API_VERSION.to_string()),
        ];

        self.get_json(url, &params).await
    }
}
