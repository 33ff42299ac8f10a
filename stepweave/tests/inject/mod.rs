//! End-to-end injection tests
//!
//! Requests go through the public pipeline and assertions are made on the patched text,
//! the preview, or the wire response.

mod dialects;
mod response;
mod scenarios;
