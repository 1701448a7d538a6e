//! Study Backend API
//!
//! - [`paths`]: endpoint routes under `/api/v1`
//! - [`envelope`]: response normalization and error-body parsing
//! - [`body`]: JSON / multipart request bodies
//! - `client`, `resources`: the `reqwest` client and its typed calls
//!   (native builds; the web front end has its own `gloo-net` client over
//!   the same paths and envelopes)

pub mod body;
pub mod envelope;
pub mod paths;

#[cfg(feature = "native")]
mod client;
#[cfg(feature = "native")]
mod resources;

pub use body::{FormPart, FormValue, RequestBody};
pub use envelope::{ItemEnvelope, ListEnvelope, MessageResponse};
pub use paths::DEFAULT_API_BASE;

#[cfg(feature = "native")]
pub use client::ApiClient;
