//! API Module
//!
//! HTTP client for the study backend.

mod client;

pub use client::*;
