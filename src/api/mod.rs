//! HTTP execution layer
//!
//! Everything between a resource manager and the wire: token
//! injection, request logging with redaction, bounded retry, typed
//! error translation, and cursor pagination.
//!
//! # Module Structure
//!
//! - [`auth`] - The [`TokenProvider`] factory contract and stock providers
//! - [`session`] - [`ApiSession`], the per-API-family request executor
//! - [`pager`] - Sequential cursor pagination over both wire dialects

pub mod auth;
pub mod pager;
pub mod session;

pub use auth::{EnvTokenProvider, StaticTokenProvider, TokenProvider};
pub use pager::{PageBatch, PageDialect};
pub use session::{ApiSession, RequestBody};
