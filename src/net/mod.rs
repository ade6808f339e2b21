//! Networking for the job-tracker REST API.
//!
//! SYSTEM CONTEXT
//! ==============
//! `api` owns request building and response checking, `types` defines the
//! wire schema.

pub mod api;
pub mod types;
