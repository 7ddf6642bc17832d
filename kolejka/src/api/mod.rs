//! Queue service access.
//!
//! Serde models for the queues and benefit-name endpoints, the
//! [`QueueApi`] abstraction, and the reqwest-backed [`NfzClient`].
//! Pagination policy lives in [`crate::fetch`]; this module only knows
//! how to issue a single request and decode what comes back.

mod client;
mod error;
mod models;

pub use client::{NfzClient, PageQuery, QueueApi, PAGE_SIZE};
pub use error::FetchError;
pub use models::{
    ApiResponse, Attributes, BenefitsProvided, BenefitsResponse, ComputedData, Dates, Links, Meta,
    ProviderData, QueueRecord, Statistics,
};

#[cfg(test)]
pub use client::tests::{id_range, queue_page, MockQueueApi};
