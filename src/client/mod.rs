//! Client Module
//!
//! Outbound HTTP plumbing for the rotation client and upstream lookups.

pub mod http;

pub use http::{HttpClient, HttpReply};
