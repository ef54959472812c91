//! Ready-made [`crate::SubmitOperation`] implementations.

pub mod http;

pub use http::HttpSubmitter;
