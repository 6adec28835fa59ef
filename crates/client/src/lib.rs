//! HTTP gateway to the bug-tracker backend.
//!
//! Wraps every REST endpoint the dashboard uses with typed requests and
//! raw, all-optional responses. Raw records are handed to
//! [`bugdesk_core::normalize`] by the caller; nothing in here interprets
//! them.

pub mod api;
pub mod config;
pub mod error;
pub mod paths;
