//! Resilient network layer
//!
//! Backend API calls go through `FetchClient`, which owns the timeout,
//! retry/backoff, and fallback semantics. See `client` for the policy and
//! `error` for the failure taxonomy.

pub mod client;
pub mod error;

pub use client::{
    FetchClient, Fetched, RequestOptions, DEFAULT_BASE_RETRY_DELAY, DEFAULT_MAX_RETRIES,
    DEFAULT_TIMEOUT,
};
pub use error::FetchError;
