//! Galleria directory client.
//!
//! Retrieves the complete contributor listing of a repository from a
//! paginated directory (the GitHub REST API) and downloads avatar assets.
//! Every request goes through the explicit [`retry::with_retry`] combinator
//! with a bounded number of attempts.

pub mod client;
pub mod error;
pub mod link;
pub mod retry;

pub use client::{ClientOptions, DirectoryClient, DEFAULT_API_BASE, PAGE_SIZE};
pub use error::DirectoryError;
pub use retry::{RetryPolicy, with_retry};
