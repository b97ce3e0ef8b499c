//! HTTP plumbing for the pydex PyPI client.
//!
//! This crate owns the process-wide blocking [`ureq`] agent that every
//! remote call in pydex goes through. The agent is configured once with
//! sane defaults (user agent, global timeout) and can be swapped at
//! runtime with [`configure_http_client`], e.g. to install a proxy.
//!
//! The agent is built with status errors disabled: a 404 comes back as a
//! regular response, not an `Err`, so callers decide what each status
//! means for their endpoint.

pub mod client;

pub use client::{configure_http_client, ClientConfig, SharedAgent, SHARED_AGENT};
