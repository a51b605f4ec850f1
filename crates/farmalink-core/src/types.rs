//! # Domain Types
//!
//! Core domain types used throughout the Farmalink client.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │     Client      │   │   OrderStatus   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (backend)   │   │  id (backend)   │   │  Pending        │       │
//! │  │  code           │   │  code           │   │  Confirmed      │       │
//! │  │  unit_price     │   │  surcharge_rate │   │  Delivered      │       │
//! │  │  vat_rate, stock│   │  contact fields │   │  Invoiced       │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐                             │
//! │  │    TaxRate      │   │   StockLevel    │                             │
//! │  │  ─────────────  │   │  ─────────────  │                             │
//! │  │  bps (u32)      │   │  Exhausted      │                             │
//! │  │  2100 = 21%     │   │  Low / Ok       │                             │
//! │  └─────────────────┘   └─────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Entity identity comes from the backend as integers; the client never
//! mints ids for server-side entities.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Tax Rate
// =============================================================================

/// A percentage rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 2100 bps = 21% (Spanish general VAT)
/// 520 bps = 5.2% (equivalence surcharge paired with 21% VAT)
///
/// The same type carries VAT rates and equivalence-surcharge rates so both
/// flow through the one rounding rule in [`Money::apply_rate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Creates a rate from a percentage (for wire values like `21.0`).
    pub fn from_percentage(pct: f64) -> Self {
        TaxRate((pct * 100.0).round() as u32)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero rate.
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }

    /// Checks if the rate is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::zero()
    }
}

// =============================================================================
// Client
// =============================================================================

/// A client (pharmacy) the orders are composed for.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Client {
    /// Backend identifier.
    pub id: i64,

    /// Business code - human-readable identifier, unique per client.
    pub code: String,

    /// Display name.
    pub name: String,

    /// Delivery address.
    pub address: Option<String>,

    /// Contact phone.
    pub phone: Option<String>,

    /// Contact email.
    pub email: Option<String>,

    /// Fiscal (invoicing) name when it differs from the display name.
    pub fiscal_name: Option<String>,

    /// Spanish tax id (NIF/CIF).
    pub tax_id: Option<String>,

    /// Bank account (IBAN) for invoicing.
    pub bank_account: Option<String>,

    /// Equivalence surcharge rate in basis points (520 = 5.2%).
    /// Zero when the client is not under the equivalence regime.
    pub surcharge_rate_bps: u32,

    /// Whether the client is active (soft delete).
    pub is_active: bool,
}

impl Client {
    /// Returns the equivalence surcharge rate.
    #[inline]
    pub fn surcharge_rate(&self) -> TaxRate {
        TaxRate::from_bps(self.surcharge_rate_bps)
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product available for ordering.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Product {
    /// Backend identifier.
    pub id: i64,

    /// Business code - human-readable identifier, unique per product.
    pub code: String,

    /// Display name shown in search results and on order lines.
    pub name: String,

    /// Optional description for search result details.
    pub description: Option<String>,

    /// Pharmacy sale price excluding VAT, in cents.
    pub unit_price_cents: i64,

    /// VAT rate in basis points (2100 = 21%).
    pub vat_rate_bps: u32,

    /// Last-known stock level.
    pub stock: i64,

    /// Threshold below which stock counts as low.
    pub stock_minimum: i64,

    /// Consignment flag: consignment products have no stock limit.
    pub is_consignment: bool,

    /// Whether the product is active (soft delete).
    pub is_active: bool,
}

impl Product {
    /// Returns the unit price (excluding VAT) as a Money type.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Returns the VAT rate.
    #[inline]
    pub fn vat_rate(&self) -> TaxRate {
        TaxRate::from_bps(self.vat_rate_bps)
    }

    /// Classifies the current stock level for display and gating.
    pub fn stock_level(&self) -> StockLevel {
        if self.stock <= 0 {
            StockLevel::Exhausted
        } else if self.stock <= self.stock_minimum {
            StockLevel::Low
        } else {
            StockLevel::Ok
        }
    }

    /// Checks whether the requested quantity can be filled.
    ///
    /// Consignment products carry no stock limit; everything else is
    /// capped at the last-known stock figure.
    pub fn can_fill(&self, quantity: i64) -> bool {
        self.is_consignment || self.stock >= quantity
    }
}

// =============================================================================
// Stock Level
// =============================================================================

/// Stock classification for a product.
///
/// Drives both the search-result badge and the quantity prompt gating:
/// `Exhausted` non-consignment products cannot be added at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum StockLevel {
    /// No stock left.
    Exhausted,
    /// At or below the configured minimum.
    Low,
    /// Comfortably in stock.
    Ok,
}

// =============================================================================
// Order Status
// =============================================================================

/// The lifecycle status of an order.
///
/// Wire values are the backend's Spanish status strings - the contract is
/// fixed by the server, the Rust names are ours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum OrderStatus {
    /// Freshly composed, awaiting confirmation.
    #[serde(rename = "pendiente")]
    Pending,
    /// Confirmed by the supplier.
    #[serde(rename = "confirmado")]
    Confirmed,
    /// Delivered to the client.
    #[serde(rename = "entregado")]
    Delivered,
    /// Invoiced - terminal state.
    #[serde(rename = "facturado")]
    Invoiced,
}

impl OrderStatus {
    /// All statuses, in lifecycle order (for filters and selectors).
    pub const ALL: [OrderStatus; 4] = [
        OrderStatus::Pending,
        OrderStatus::Confirmed,
        OrderStatus::Delivered,
        OrderStatus::Invoiced,
    ];

    /// The backend wire value for this status.
    pub const fn wire_value(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pendiente",
            OrderStatus::Confirmed => "confirmado",
            OrderStatus::Delivered => "entregado",
            OrderStatus::Invoiced => "facturado",
        }
    }

    /// Whether the order can still be edited (items changed, resubmitted).
    pub const fn is_editable(&self) -> bool {
        matches!(self, OrderStatus::Pending | OrderStatus::Confirmed)
    }
}

impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::Pending
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.wire_value())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = crate::error::CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pendiente" => Ok(OrderStatus::Pending),
            "confirmado" => Ok(OrderStatus::Confirmed),
            "entregado" => Ok(OrderStatus::Delivered),
            "facturado" => Ok(OrderStatus::Invoiced),
            other => Err(crate::error::CoreError::UnknownStatus(other.to_string())),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
