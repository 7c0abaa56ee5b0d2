//! HTTP client module.

mod client;

pub use client::{GITHUB_JSON, HttpClient};
