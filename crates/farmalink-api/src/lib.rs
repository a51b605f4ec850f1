//! # farmalink-api: Backend HTTP Client for the Farmalink Workbench
//!
//! Every request to the Farmalink backend goes through this crate. The
//! backend is an external collaborator: it speaks JSON over HTTP with
//! Spanish field names, answers mutations with a `{success, message}`
//! envelope, and recomputes all prices server-side. This crate wraps that
//! contract in typed Rust.
//!
//! ## Modules
//!
//! - [`client`] - [`ApiClient`]: reqwest wrapper, envelope handling, ping
//! - [`config`] - [`ApiConfig`]: base URL and timeout (env > TOML > defaults)
//! - [`dto`] - Wire DTOs with serde renames to the server's field names
//! - [`error`] - [`ApiError`]: the transport / rejection / decode taxonomy
//! - [`orders`] - Order workflow endpoints (search, detail, CRUD, status)
//! - [`clients`] - Client directory endpoints
//! - [`products`] - Product directory endpoints (incl. low-stock listing)
//! - [`invoices`] - Invoice endpoints (generate from order, mark sent)
//!
//! ## Error Taxonomy
//!
//! Three failure classes, and every caller handles them the same way:
//!
//! 1. **Transport** - the request never completed (connection refused,
//!    timeout). Surfaced as a generic failure; the operation is abandoned.
//! 2. **Rejected** - the backend answered `{success: false, message}`.
//!    The message is surfaced verbatim.
//! 3. **Decode** - the response body was not the expected shape.
//!
//! No failure class is retried automatically.

pub mod client;
pub mod clients;
pub mod config;
pub mod dto;
pub mod error;
pub mod invoices;
pub mod orders;
pub mod products;

pub use client::ApiClient;
pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
