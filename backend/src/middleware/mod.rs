//! Request middleware.
//!
//! Purpose: correlate every request with a trace identifier shared by logs,
//! response headers and error payloads.

pub mod trace;

pub use trace::Trace;
