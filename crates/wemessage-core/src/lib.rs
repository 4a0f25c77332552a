//! # wemessage-core
//!
//! Configuration, error handling, and the response envelope shared by every
//! WeCom endpoint.

pub mod config;
pub mod envelope;
pub mod error;
