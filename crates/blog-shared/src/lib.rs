//! # Blog Shared
//!
//! Request and response types of the blog posts API.
//! Kept free of domain dependencies so clients can use them directly.

pub mod dto;
pub mod response;

pub use response::ErrorResponse;
