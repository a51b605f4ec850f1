//! # Order Draft
//!
//! The order composition state machine: line items, merge-on-add,
//! synchronous derived-field recalculation and order totals.
//!
//! ## Draft Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Order Draft Operations                              │
//! │                                                                         │
//! │  View Action              Controller Call          Draft State Change   │
//! │  ───────────              ───────────────          ──────────────────   │
//! │                                                                         │
//! │  Pick client ───────────► select_client() ───────► client = Some(...)  │
//! │                                                                         │
//! │  Confirm quantity ──────► add_product() ─────────► merge or append     │
//! │                                                                         │
//! │  Edit row quantity ─────► set_quantity() ────────► quantity = n        │
//! │                                                                         │
//! │  Accept removal ────────► remove_item() ─────────► items.retain(...)   │
//! │                                                                         │
//! │  Hydrate existing ──────► load_items() ──────────► full reset + seed   │
//! │                                                                         │
//! │  NOTE: Every mutation recomputes the affected line's derived fields     │
//! │        before returning, so no caller can observe an inconsistent row.  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - Items are unique by `product_id` (adding the same product merges quantity)
//! - `id` values are minted by a monotonic counter and never reused,
//!   not even after a removal
//! - `subtotal_excl_vat`, `vat_amount` and `subtotal_incl_vat` are always
//!   consistent with `quantity`, `unit_price` and `vat_rate`
//! - Maximum lines: 100, maximum quantity per line: 999 (crate constants)

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{Client, Product, TaxRate};
use crate::{MAX_DRAFT_LINES, MAX_LINE_QUANTITY};

// =============================================================================
// Selected Client
// =============================================================================

/// The client the draft is being composed for.
///
/// A denormalized snapshot of the fields the workflow needs - the full
/// [`Client`] record stays with the directory controllers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SelectedClient {
    /// Backend client id.
    pub id: i64,

    /// Business code, shown next to the name in the selector.
    pub code: String,

    /// Display name.
    pub name: String,

    /// Equivalence surcharge rate applied to the untaxed subtotal.
    pub surcharge_rate: TaxRate,
}

impl From<&Client> for SelectedClient {
    fn from(client: &Client) -> Self {
        SelectedClient {
            id: client.id,
            code: client.code.clone(),
            name: client.name.clone(),
            surcharge_rate: client.surcharge_rate(),
        }
    }
}

// =============================================================================
// Line Item
// =============================================================================

/// A line in the order draft.
///
/// ## Snapshot Pattern
/// `unit_price` and `vat_rate` are frozen at selection time. If the
/// product is repriced on the backend afterwards, this line keeps the
/// price the user saw; the server recomputes authoritative prices on
/// submission anyway (only product id and quantity are sent).
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// Draft-local id, minted by the draft's monotonic counter.
    pub id: u64,

    /// Backend product id.
    pub product_id: i64,

    /// Product code at selection time (frozen).
    pub product_code: String,

    /// Product name at selection time (frozen).
    pub product_name: String,

    /// Units ordered (always >= 1).
    pub quantity: i64,

    /// Unit price excluding VAT at selection time (frozen).
    pub unit_price: Money,

    /// VAT rate at selection time (frozen).
    pub vat_rate: TaxRate,

    /// Consignment flag - consignment lines ignore stock limits.
    pub is_consignment: bool,

    /// Derived: quantity × unit_price.
    pub subtotal_excl_vat: Money,

    /// Derived: subtotal_excl_vat × vat_rate.
    pub vat_amount: Money,

    /// Derived: subtotal_excl_vat + vat_amount.
    pub subtotal_incl_vat: Money,
}

impl LineItem {
    fn from_product(id: u64, product: &Product, quantity: i64) -> Self {
        let mut item = LineItem {
            id,
            product_id: product.id,
            product_code: product.code.clone(),
            product_name: product.name.clone(),
            quantity,
            unit_price: product.unit_price(),
            vat_rate: product.vat_rate(),
            is_consignment: product.is_consignment,
            subtotal_excl_vat: Money::zero(),
            vat_amount: Money::zero(),
            subtotal_incl_vat: Money::zero(),
        };
        item.recalculate();
        item
    }

    /// Recomputes all three derived fields from the inputs.
    ///
    /// Called by every mutation before the draft returns to the caller.
    fn recalculate(&mut self) {
        self.subtotal_excl_vat = self.unit_price.multiply_quantity(self.quantity);
        self.vat_amount = self.subtotal_excl_vat.apply_rate(self.vat_rate);
        self.subtotal_incl_vat = self.subtotal_excl_vat + self.vat_amount;
    }
}

// =============================================================================
// Line Item Seed (hydration input)
// =============================================================================

/// Input row for bulk-loading an existing order's items into the draft.
///
/// Produced by the API layer from the order-detail response; the draft
/// re-derives all computed fields rather than trusting stored ones.
#[derive(Debug, Clone)]
pub struct LineItemSeed {
    pub product_id: i64,
    pub product_code: String,
    pub product_name: String,
    pub quantity: i64,
    pub unit_price: Money,
    pub vat_rate: TaxRate,
    pub is_consignment: bool,
}

// =============================================================================
// Order Totals
// =============================================================================

/// Totals derived from a draft. Never stored, always recomputed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OrderTotals {
    /// Sum of line subtotals excluding VAT.
    pub subtotal: Money,

    /// Sum of line VAT amounts.
    pub total_vat: Money,

    /// Client equivalence surcharge on the untaxed subtotal
    /// (zero without a selected client or with a zero rate).
    pub surcharge: Money,

    /// subtotal + total_vat + surcharge.
    pub grand_total: Money,
}

// =============================================================================
// Order Draft
// =============================================================================

/// The in-memory draft of an order being composed.
///
/// Owned by the order form controller and passed by reference to
/// handlers - there is deliberately no global instance. The draft dies
/// with the view: it is rebuilt empty on entry and repopulated only by
/// hydration of an existing order.
#[derive(Debug, Clone, Default)]
pub struct OrderDraft {
    client: Option<SelectedClient>,
    items: Vec<LineItem>,
    item_counter: u64,
}

impl OrderDraft {
    /// Creates a new empty draft.
    pub fn new() -> Self {
        OrderDraft::default()
    }

    // -------------------------------------------------------------------------
    // Client selection
    // -------------------------------------------------------------------------

    /// The currently selected client, if any.
    pub fn client(&self) -> Option<&SelectedClient> {
        self.client.as_ref()
    }

    /// Selects the client the order is composed for.
    ///
    /// Changing the client does not touch the items; only the surcharge
    /// term of the totals changes.
    pub fn select_client(&mut self, client: SelectedClient) {
        self.client = Some(client);
    }

    /// Clears the client selection.
    pub fn clear_client(&mut self) {
        self.client = None;
    }

    // -------------------------------------------------------------------------
    // Item access
    // -------------------------------------------------------------------------

    /// The draft's line items, in insertion order.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Looks up a line item by its draft-local id.
    pub fn item(&self, id: u64) -> Option<&LineItem> {
        self.items.iter().find(|i| i.id == id)
    }

    /// Number of lines in the draft.
    pub fn line_count(&self) -> usize {
        self.items.len()
    }

    /// Checks if the draft has no lines.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Current value of the id counter (equals the highest id ever minted).
    pub fn item_counter(&self) -> u64 {
        self.item_counter
    }

    // -------------------------------------------------------------------------
    // Mutations
    // -------------------------------------------------------------------------

    /// Adds a product to the draft, merging with an existing line.
    ///
    /// ## Behavior
    /// - Product already in the draft: its quantity is incremented - the
    ///   draft never holds two lines for the same product. The existing
    ///   price/VAT snapshot is kept.
    /// - New product: a fresh id is minted, price and VAT rate are
    ///   snapshotted from the product, and the line is appended.
    ///
    /// ## Returns
    /// The id of the affected line.
    pub fn add_product(&mut self, product: &Product, quantity: i64) -> CoreResult<u64> {
        if quantity <= 0 {
            return Err(CoreError::Validation(
                crate::error::ValidationError::MustBePositive {
                    field: "quantity".to_string(),
                },
            ));
        }

        if let Some(item) = self.items.iter_mut().find(|i| i.product_id == product.id) {
            let new_quantity = item.quantity + quantity;
            if new_quantity > MAX_LINE_QUANTITY {
                return Err(CoreError::QuantityTooLarge {
                    requested: new_quantity,
                    max: MAX_LINE_QUANTITY,
                });
            }
            item.quantity = new_quantity;
            item.recalculate();
            return Ok(item.id);
        }

        if self.items.len() >= MAX_DRAFT_LINES {
            return Err(CoreError::DraftTooLarge {
                max: MAX_DRAFT_LINES,
            });
        }
        if quantity > MAX_LINE_QUANTITY {
            return Err(CoreError::QuantityTooLarge {
                requested: quantity,
                max: MAX_LINE_QUANTITY,
            });
        }

        self.item_counter += 1;
        let id = self.item_counter;
        self.items.push(LineItem::from_product(id, product, quantity));
        Ok(id)
    }

    /// Replaces the quantity of a line item.
    ///
    /// ## Behavior
    /// - `quantity <= 0` is a no-op: the row keeps its current value.
    ///   (Removal is an explicit, confirmed operation - never a side
    ///   effect of a quantity edit.)
    /// - Unknown id: error.
    pub fn set_quantity(&mut self, id: u64, quantity: i64) -> CoreResult<()> {
        if quantity <= 0 {
            return Ok(());
        }
        if quantity > MAX_LINE_QUANTITY {
            return Err(CoreError::QuantityTooLarge {
                requested: quantity,
                max: MAX_LINE_QUANTITY,
            });
        }

        let item = self
            .items
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or(CoreError::LineItemNotFound(id))?;
        item.quantity = quantity;
        item.recalculate();
        Ok(())
    }

    /// Removes a line item by id.
    ///
    /// Remaining ids are not renumbered and the counter is not reset, so
    /// re-adding a removed product mints a fresh id.
    ///
    /// ## Returns
    /// The removed line (for the confirmation notification).
    pub fn remove_item(&mut self, id: u64) -> CoreResult<LineItem> {
        let position = self
            .items
            .iter()
            .position(|i| i.id == id)
            .ok_or(CoreError::LineItemNotFound(id))?;
        Ok(self.items.remove(position))
    }

    /// Bulk-loads an existing order's items, replacing the draft contents.
    ///
    /// This is the hydration path: the item list and the id counter are
    /// reset entirely (not appended to), and the counter ends up equal to
    /// the number of loaded rows. Derived fields are recomputed from the
    /// seeds' inputs.
    pub fn load_items<I>(&mut self, seeds: I)
    where
        I: IntoIterator<Item = LineItemSeed>,
    {
        self.items.clear();
        self.item_counter = 0;

        for seed in seeds {
            self.item_counter += 1;
            let mut item = LineItem {
                id: self.item_counter,
                product_id: seed.product_id,
                product_code: seed.product_code,
                product_name: seed.product_name,
                quantity: seed.quantity,
                unit_price: seed.unit_price,
                vat_rate: seed.vat_rate,
                is_consignment: seed.is_consignment,
                subtotal_excl_vat: Money::zero(),
                vat_amount: Money::zero(),
                subtotal_incl_vat: Money::zero(),
            };
            item.recalculate();
            self.items.push(item);
        }
    }

    // -------------------------------------------------------------------------
    // Totals
    // -------------------------------------------------------------------------

    /// Computes the order totals from the current lines and client.
    ///
    /// Pure function of the draft - totals are never cached, so they can
    /// never drift from the line items they derive from.
    pub fn totals(&self) -> OrderTotals {
        let subtotal = self
            .items
            .iter()
            .fold(Money::zero(), |acc, i| acc + i.subtotal_excl_vat);
        let total_vat = self
            .items
            .iter()
            .fold(Money::zero(), |acc, i| acc + i.vat_amount);

        let surcharge = match &self.client {
            Some(client) if !client.surcharge_rate.is_zero() => {
                subtotal.apply_rate(client.surcharge_rate)
            }
            _ => Money::zero(),
        };

        OrderTotals {
            subtotal,
            total_vat,
            surcharge,
            grand_total: subtotal + total_vat + surcharge,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn test_product(id: i64, price_cents: i64, vat_bps: u32) -> Product {
        Product {
            id,
            code: format!("P-{id:03}"),
            name: format!("Product {id}"),
            description: None,
            unit_price_cents: price_cents,
            vat_rate_bps: vat_bps,
            stock: 100,
            stock_minimum: 5,
            is_consignment: false,
            is_active: true,
        }
    }

    fn farmacia_sur() -> SelectedClient {
        SelectedClient {
            id: 7,
            code: "C07".to_string(),
            name: "Farmacia Sur".to_string(),
            surcharge_rate: TaxRate::from_percentage(5.2),
        }
    }

    fn assert_derived_consistent(draft: &OrderDraft) {
        for item in draft.items() {
            assert_eq!(
                item.subtotal_excl_vat,
                item.unit_price.multiply_quantity(item.quantity)
            );
            assert_eq!(item.vat_amount, item.subtotal_excl_vat.apply_rate(item.vat_rate));
            assert_eq!(item.subtotal_incl_vat, item.subtotal_excl_vat + item.vat_amount);
        }
        let totals = draft.totals();
        let incl_sum = draft
            .items()
            .iter()
            .fold(Money::zero(), |acc, i| acc + i.subtotal_incl_vat);
        assert_eq!(totals.grand_total, incl_sum + totals.surcharge);
    }

    #[test]
    fn test_add_product() {
        let mut draft = OrderDraft::new();
        let product = test_product(1, 999, 2100);

        let id = draft.add_product(&product, 2).unwrap();

        assert_eq!(id, 1);
        assert_eq!(draft.line_count(), 1);
        assert_eq!(draft.items()[0].quantity, 2);
        assert_eq!(draft.items()[0].subtotal_excl_vat.cents(), 1998);
        assert_derived_consistent(&draft);
    }

    #[test]
    fn test_add_same_product_merges() {
        let mut draft = OrderDraft::new();
        let product = test_product(1, 999, 2100);

        draft.add_product(&product, 2).unwrap();
        draft.add_product(&product, 3).unwrap();

        // Still one line, quantity accumulated - never a duplicate row
        assert_eq!(draft.line_count(), 1);
        assert_eq!(draft.items()[0].quantity, 5);
        assert_eq!(draft.item_counter(), 1);
        assert_derived_consistent(&draft);
    }

    #[test]
    fn test_merge_keeps_original_price_snapshot() {
        let mut draft = OrderDraft::new();
        let product = test_product(1, 1000, 2100);
        draft.add_product(&product, 1).unwrap();

        // Same product, repriced upstream: the snapshot must win
        let repriced = Product {
            unit_price_cents: 9999,
            ..test_product(1, 1000, 2100)
        };
        draft.add_product(&repriced, 1).unwrap();

        assert_eq!(draft.items()[0].unit_price.cents(), 1000);
        assert_eq!(draft.items()[0].subtotal_excl_vat.cents(), 2000);
    }

    #[test]
    fn test_counter_never_reuses_ids() {
        let mut draft = OrderDraft::new();
        let first = test_product(1, 500, 400);
        let second = test_product(2, 700, 1000);

        let id1 = draft.add_product(&first, 1).unwrap();
        let id2 = draft.add_product(&second, 1).unwrap();
        draft.remove_item(id1).unwrap();

        // Re-adding the removed product mints a fresh id
        let id3 = draft.add_product(&first, 1).unwrap();

        assert_eq!((id1, id2, id3), (1, 2, 3));
        assert_eq!(draft.item_counter(), 3);
    }

    #[test]
    fn test_set_quantity_zero_or_negative_is_noop() {
        let mut draft = OrderDraft::new();
        let product = test_product(1, 999, 2100);
        let id = draft.add_product(&product, 4).unwrap();

        draft.set_quantity(id, 0).unwrap();
        draft.set_quantity(id, -3).unwrap();

        assert_eq!(draft.items()[0].quantity, 4);
        assert_derived_consistent(&draft);
    }

    #[test]
    fn test_set_quantity_recomputes_derived_fields() {
        let mut draft = OrderDraft::new();
        let product = test_product(1, 1000, 2100);
        let id = draft.add_product(&product, 1).unwrap();

        draft.set_quantity(id, 3).unwrap();

        let item = draft.item(id).unwrap();
        assert_eq!(item.subtotal_excl_vat.cents(), 3000);
        assert_eq!(item.vat_amount.cents(), 630);
        assert_eq!(item.subtotal_incl_vat.cents(), 3630);
    }

    #[test]
    fn test_set_quantity_unknown_id() {
        let mut draft = OrderDraft::new();
        assert!(matches!(
            draft.set_quantity(42, 1),
            Err(CoreError::LineItemNotFound(42))
        ));
    }

    #[test]
    fn test_remove_item_returns_line() {
        let mut draft = OrderDraft::new();
        let product = test_product(1, 999, 2100);
        let id = draft.add_product(&product, 2).unwrap();

        let removed = draft.remove_item(id).unwrap();
        assert_eq!(removed.product_name, "Product 1");
        assert!(draft.is_empty());
        assert!(matches!(
            draft.remove_item(id),
            Err(CoreError::LineItemNotFound(_))
        ));
    }

    /// The full worked scenario: client at 5.2% surcharge, 3 × 10.00 € at
    /// 21% VAT (added as 2 then 1 more of the same product).
    #[test]
    fn test_composition_scenario() {
        let mut draft = OrderDraft::new();
        draft.select_client(farmacia_sur());

        let product = test_product(3, 1000, 2100); // 10.00 € excl, 21%
        draft.add_product(&product, 2).unwrap();
        draft.add_product(&product, 1).unwrap();

        assert_eq!(draft.line_count(), 1);
        let item = &draft.items()[0];
        assert_eq!(item.quantity, 3);
        assert_eq!(item.subtotal_excl_vat.cents(), 3000);
        assert_eq!(item.vat_amount.cents(), 630);
        assert_eq!(item.subtotal_incl_vat.cents(), 3630);

        let totals = draft.totals();
        assert_eq!(totals.subtotal.cents(), 3000);
        assert_eq!(totals.total_vat.cents(), 630);
        assert_eq!(totals.surcharge.cents(), 156);
        assert_eq!(totals.grand_total.cents(), 3786);
    }

    #[test]
    fn test_totals_without_client_have_no_surcharge() {
        let mut draft = OrderDraft::new();
        draft.add_product(&test_product(1, 1000, 2100), 1).unwrap();

        let totals = draft.totals();
        assert!(totals.surcharge.is_zero());
        assert_eq!(totals.grand_total.cents(), 1210);
    }

    #[test]
    fn test_selecting_client_only_changes_surcharge_term() {
        let mut draft = OrderDraft::new();
        draft.add_product(&test_product(1, 1000, 2100), 1).unwrap();
        let before = draft.totals();

        draft.select_client(farmacia_sur());
        let after = draft.totals();

        assert_eq!(before.subtotal, after.subtotal);
        assert_eq!(before.total_vat, after.total_vat);
        assert_eq!(after.surcharge.cents(), 52); // 5.2% of 10.00 €
        assert_derived_consistent(&draft);
    }

    #[test]
    fn test_load_items_replaces_and_seeds_counter() {
        let mut draft = OrderDraft::new();
        // Pre-existing content that hydration must replace, not extend
        draft.add_product(&test_product(9, 123, 400), 1).unwrap();

        let seeds = vec![
            LineItemSeed {
                product_id: 1,
                product_code: "P-001".to_string(),
                product_name: "Ibuprofeno 600".to_string(),
                quantity: 2,
                unit_price: Money::from_cents(450),
                vat_rate: TaxRate::from_bps(400),
                is_consignment: false,
            },
            LineItemSeed {
                product_id: 2,
                product_code: "P-002".to_string(),
                product_name: "Crema solar".to_string(),
                quantity: 1,
                unit_price: Money::from_cents(1550),
                vat_rate: TaxRate::from_bps(2100),
                is_consignment: true,
            },
        ];
        draft.load_items(seeds);

        assert_eq!(draft.line_count(), 2);
        assert_eq!(draft.item_counter(), 2);
        assert_eq!(draft.items()[0].id, 1);
        assert_eq!(draft.items()[1].id, 2);
        // Derived fields recomputed from seed inputs
        assert_eq!(draft.items()[0].subtotal_excl_vat.cents(), 900);
        assert_eq!(draft.items()[0].vat_amount.cents(), 36);
        assert_derived_consistent(&draft);
    }

    /// Derived-field consistency must hold after any mutation sequence.
    #[test]
    fn test_consistency_across_mutation_sequences() {
        let mut draft = OrderDraft::new();
        draft.select_client(farmacia_sur());
        let a = test_product(1, 350, 400);
        let b = test_product(2, 1299, 2100);
        let c = test_product(3, 80, 1000);

        let ia = draft.add_product(&a, 5).unwrap();
        assert_derived_consistent(&draft);
        let ib = draft.add_product(&b, 1).unwrap();
        assert_derived_consistent(&draft);
        draft.add_product(&a, 2).unwrap();
        assert_derived_consistent(&draft);
        draft.set_quantity(ib, 7).unwrap();
        assert_derived_consistent(&draft);
        draft.remove_item(ia).unwrap();
        assert_derived_consistent(&draft);
        draft.add_product(&c, 12).unwrap();
        assert_derived_consistent(&draft);
        draft.set_quantity(ib, 0).unwrap(); // no-op
        assert_derived_consistent(&draft);
    }

    #[test]
    fn test_quantity_limits() {
        let mut draft = OrderDraft::new();
        let product = test_product(1, 100, 2100);

        assert!(matches!(
            draft.add_product(&product, MAX_LINE_QUANTITY + 1),
            Err(CoreError::QuantityTooLarge { .. })
        ));

        draft.add_product(&product, MAX_LINE_QUANTITY).unwrap();
        assert!(matches!(
            draft.add_product(&product, 1),
            Err(CoreError::QuantityTooLarge { .. })
        ));
    }

    #[test]
    fn test_add_rejects_nonpositive_quantity() {
        let mut draft = OrderDraft::new();
        let product = test_product(1, 100, 2100);
        assert!(draft.add_product(&product, 0).is_err());
        assert!(draft.add_product(&product, -1).is_err());
        assert!(draft.is_empty());
    }
}
