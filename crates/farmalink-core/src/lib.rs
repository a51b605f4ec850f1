//! # farmalink-core: Pure Business Logic for the Farmalink Client
//!
//! This crate is the **heart** of the Farmalink client workbench. It contains
//! all business logic as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Farmalink Client Architecture                      │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    View Layer (typed frontend)                  │   │
//! │  │    Search UI ──► Order Table ──► Totals Panel ──► Submit        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ render models                          │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  Workbench Controllers                          │   │
//! │  │    order form, entity directories, notifications                │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ farmalink-core (THIS CRATE) ★                   │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   draft   │  │ validation│  │   │
//! │  │   │  Product  │  │   Money   │  │OrderDraft │  │   rules   │  │   │
//! │  │   │  Client   │  │  TaxRate  │  │ LineItem  │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • NO TIMERS • PURE FUNCTIONS             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                farmalink-api (HTTP JSON client)                 │   │
//! │  │          search, order CRUD, entity CRUD, connectivity          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Client, OrderStatus, TaxRate)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`draft`] - The order draft state machine (line items, totals)
//! - [`policy`] - Shared VAT → equivalence-surcharge table
//! - [`error`] - Domain error types
//! - [`validation`] - Field and business rule validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Network, file system and timer access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in euro cents (i64) to avoid float errors
//! 4. **Explicit Errors**: All errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use farmalink_core::money::Money;
//! use farmalink_core::types::TaxRate;
//!
//! // Create money from cents (never from floats!)
//! let price = Money::from_cents(1000); // 10.00 €
//!
//! // Apply a VAT rate with half-up integer rounding
//! let vat_rate = TaxRate::from_bps(2100); // 21%
//! let vat = price.apply_rate(vat_rate);
//!
//! // 21% of 10.00 € is 2.10 €
//! assert_eq!(vat.cents(), 210);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod draft;
pub mod error;
pub mod money;
pub mod policy;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use farmalink_core::Money` instead of
// `use farmalink_core::money::Money`

pub use draft::{LineItem, LineItemSeed, OrderDraft, OrderTotals, SelectedClient};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum line items allowed in a single order draft
///
/// ## Business Reason
/// Prevents runaway drafts and keeps the composed order reviewable.
/// Can be made configurable per deployment in future versions.
pub const MAX_DRAFT_LINES: usize = 100;

/// Maximum quantity of a single line item
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10).
pub const MAX_LINE_QUANTITY: i64 = 999;
