//! # Order Form Controller
//!
//! The order composition workflow: client/product lookup, quantity
//! confirmation, line-item mutations, submission and hydration of
//! existing orders.
//!
//! ## Workflow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Order Composition Workflow                           │
//! │                                                                         │
//! │  type in client box ──► lookup_clients ──► select_client                │
//! │                                                │                        │
//! │  type in product box ─► lookup_products ─► select_product               │
//! │                                                │ (pending candidate)    │
//! │                                                ▼                        │
//! │                                       quantity_prompt()                 │
//! │                                                │                        │
//! │                             confirm_quantity(n) │ cancel_pending()      │
//! │                                                ▼                        │
//! │                          draft.add_product (merge by product)           │
//! │                                                │                        │
//! │        set_item_quantity / request_removal → confirm_removal            │
//! │                                                │                        │
//! │                                                ▼                        │
//! │                      submit(as_draft) ──► create or update              │
//! │                                                │                        │
//! │                       success: redirect to list after 1.5 s             │
//! │                       failure: notification, form stays editable        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every mutation goes through [`OrderDraft`], which recomputes the
//! affected line's derived amounts before control returns here - the
//! render model can never observe a stale subtotal.

use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info, warn};
use ts_rs::TS;

use farmalink_api::dto::{ClientHit, OrderDetail, OrderItemPayload, OrderPayload, ProductHit};
use farmalink_api::ApiClient;
use farmalink_core::validation::validate_quantity;
use farmalink_core::{
    CoreError, OrderDraft, OrderStatus, OrderTotals, LineItem, Product, SelectedClient,
};

use crate::debounce::{SearchDirective, SearchPolicy};
use crate::error::FlowError;
use crate::notify::{Notifier, Severity};

/// Delay before navigating to the list view after a successful submit,
/// long enough for the success notification to register.
pub const REDIRECT_DELAY: Duration = Duration::from_millis(1500);

// =============================================================================
// Prompts and Outcomes
// =============================================================================

/// Constraints the quantity dialog must enforce for a pending candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct QuantityPrompt {
    pub product_name: String,

    /// Last-known stock, for the dialog's availability line.
    pub stock: i64,

    /// Consignment candidates have no stock cap.
    pub is_consignment: bool,

    /// Upper input bound; `None` for consignment products.
    pub max: Option<i64>,

    /// True when the candidate is exhausted (non-consignment, stock <= 0):
    /// quantity entry is disabled entirely.
    pub disabled: bool,
}

impl QuantityPrompt {
    fn for_product(product: &Product) -> Self {
        let exhausted = !product.is_consignment && product.stock <= 0;
        QuantityPrompt {
            product_name: product.name.clone(),
            stock: product.stock,
            is_consignment: product.is_consignment,
            max: (!product.is_consignment).then_some(product.stock),
            disabled: exhausted,
        }
    }
}

/// The two-step removal confirmation, naming the product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct RemovalPrompt {
    pub line_id: u64,
    pub product_name: String,
}

/// A successful submission: what to show and where to go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitOutcome {
    /// Backend confirmation message (already shown as a notification).
    pub message: String,
    /// Navigate to the order list after this delay.
    pub redirect_after: Duration,
}

/// Render model of the composition form.
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OrderFormView {
    pub client: Option<SelectedClient>,
    pub items: Vec<LineItem>,
    pub totals: OrderTotals,
    /// The add button is enabled only while a candidate is pending.
    pub can_add: bool,
    /// The submit controls are disabled and show a busy label while true.
    pub is_submitting: bool,
    /// Field-level error on the client selector, if any.
    pub client_error: Option<String>,
}

// =============================================================================
// Controller
// =============================================================================

/// Controller of the order composition view.
///
/// Owns the draft and all transient selection state. One instance per
/// page session; dropped state is simply garbage (nothing to undo,
/// nothing persisted locally).
#[derive(Debug)]
pub struct OrderFormController {
    api: ApiClient,
    notifier: Notifier,
    search: SearchPolicy,

    draft: OrderDraft,
    /// Product picked from the results, awaiting quantity confirmation.
    /// Not yet part of the draft.
    pending: Option<Product>,

    /// Present when editing an existing order; selects create vs update.
    editing_order_id: Option<i64>,
    status: OrderStatus,
    notes: String,
    pending_products_note: String,

    client_error: Option<String>,
    is_submitting: bool,
}

impl OrderFormController {
    /// Controller for composing a new order.
    pub fn new(api: ApiClient, notifier: Notifier) -> Self {
        OrderFormController {
            api,
            notifier,
            search: SearchPolicy::default(),
            draft: OrderDraft::new(),
            pending: None,
            editing_order_id: None,
            status: OrderStatus::default(),
            notes: String::new(),
            pending_products_note: String::new(),
            client_error: None,
            is_submitting: false,
        }
    }

    /// Controller for editing an existing order.
    ///
    /// The draft starts empty; call [`hydrate`](Self::hydrate) right
    /// after construction to pull the stored items.
    pub fn for_order(api: ApiClient, notifier: Notifier, order_id: i64) -> Self {
        let mut controller = Self::new(api, notifier);
        controller.editing_order_id = Some(order_id);
        controller
    }

    // -------------------------------------------------------------------------
    // Lookup (§ product/client search)
    // -------------------------------------------------------------------------

    /// The pure scheduling decision for a lookup keystroke.
    ///
    /// The view wires this together with a `Debouncer`: `Clear` hides the
    /// results and cancels the pending timer, `Schedule` re-arms it.
    pub fn evaluate_query(&self, raw: &str) -> SearchDirective {
        self.search.evaluate(raw)
    }

    /// Searches clients for the selector.
    ///
    /// Infrastructure failures produce a generic danger notification and
    /// an empty result list (the dropdown just hides).
    pub async fn search_clients(&self, query: &str) -> Result<Vec<ClientHit>, FlowError> {
        debug!(query, "order form client lookup");
        match self.api.lookup_clients(query).await {
            Ok(hits) => Ok(hits),
            Err(e) => {
                warn!(error = %e, "client lookup failed");
                self.notifier
                    .push(Severity::Danger, "Error de conexión con el servidor");
                Err(e.into())
            }
        }
    }

    /// Searches products for the selector.
    pub async fn search_products(&self, query: &str) -> Result<Vec<ProductHit>, FlowError> {
        debug!(query, "order form product lookup");
        match self.api.lookup_products(query).await {
            Ok(hits) => Ok(hits),
            Err(e) => {
                warn!(error = %e, "product lookup failed");
                self.notifier
                    .push(Severity::Danger, "Error de conexión con el servidor");
                Err(e.into())
            }
        }
    }

    /// Sets the client the order is composed for and clears any error on
    /// the selector. Totals pick up the surcharge on the next render.
    pub fn select_client(&mut self, hit: &ClientHit) {
        debug!(client_id = hit.id, code = %hit.code, "client selected");
        self.draft.select_client(hit.to_selected());
        self.client_error = None;
    }

    /// Stores a product hit as the pending candidate for quantity entry.
    /// The draft is not touched until the quantity is confirmed.
    pub fn select_product(&mut self, hit: &ProductHit) {
        debug!(product_id = hit.id, code = %hit.code, "product candidate selected");
        self.pending = Some(hit.to_product());
    }

    /// The pending candidate, if any.
    pub fn pending_product(&self) -> Option<&Product> {
        self.pending.as_ref()
    }

    // -------------------------------------------------------------------------
    // Quantity confirmation
    // -------------------------------------------------------------------------

    /// The quantity dialog constraints for the pending candidate.
    pub fn quantity_prompt(&self) -> Option<QuantityPrompt> {
        self.pending.as_ref().map(QuantityPrompt::for_product)
    }

    /// Abandons the pending candidate (dialog closed, no side effects).
    pub fn cancel_pending(&mut self) {
        self.pending = None;
    }

    /// Turns the pending candidate into exactly one draft mutation.
    ///
    /// On success the candidate is cleared; on a validation or stock
    /// failure it stays pending so the dialog can be corrected.
    pub fn confirm_quantity(&mut self, quantity: i64) -> Result<(), FlowError> {
        let Some(product) = self.pending.clone() else {
            return Err(FlowError::form("No hay ningún producto seleccionado"));
        };

        validate_quantity(quantity)?;

        if !product.can_fill(quantity) {
            return Err(CoreError::InsufficientStock {
                code: product.code.clone(),
                available: product.stock,
                requested: quantity,
            }
            .into());
        }

        self.draft.add_product(&product, quantity)?;
        self.pending = None;

        info!(product_id = product.id, quantity, "line added to draft");
        self.notifier.push(
            Severity::Success,
            format!("Producto {} agregado al pedido", product.name),
        );
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Line mutations
    // -------------------------------------------------------------------------

    /// Replaces a line's quantity (no-op for zero/negative input).
    pub fn set_item_quantity(&mut self, line_id: u64, quantity: i64) -> Result<(), FlowError> {
        self.draft.set_quantity(line_id, quantity)?;
        Ok(())
    }

    /// First step of removal: the confirmation dialog naming the product.
    pub fn request_removal(&self, line_id: u64) -> Option<RemovalPrompt> {
        self.draft.item(line_id).map(|item| RemovalPrompt {
            line_id,
            product_name: item.product_name.clone(),
        })
    }

    /// Second step of removal: the user accepted the confirmation.
    pub fn confirm_removal(&mut self, line_id: u64) -> Result<(), FlowError> {
        let removed = self.draft.remove_item(line_id)?;
        info!(product_id = removed.product_id, "line removed from draft");
        self.notifier
            .push(Severity::Success, "Producto eliminado del pedido");
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Header fields
    // -------------------------------------------------------------------------

    pub fn set_status(&mut self, status: OrderStatus) {
        self.status = status;
    }

    pub fn set_notes(&mut self, notes: impl Into<String>) {
        self.notes = notes.into();
    }

    pub fn set_pending_products_note(&mut self, note: impl Into<String>) {
        self.pending_products_note = note.into();
    }

    // -------------------------------------------------------------------------
    // Submission
    // -------------------------------------------------------------------------

    /// Client-side validation gate. Sets the field-level error on the
    /// client selector and/or a danger notification; returns whether the
    /// draft may be submitted. Nothing reaches the network on failure.
    pub fn validate(&mut self) -> bool {
        let mut valid = true;

        if self.draft.client().is_none() {
            self.client_error = Some("Debe seleccionar un cliente".to_string());
            valid = false;
        } else {
            self.client_error = None;
        }

        if self.draft.is_empty() {
            self.notifier.push(
                Severity::Danger,
                "El pedido debe tener al menos un producto",
            );
            valid = false;
        }

        valid
    }

    /// Builds the submission body. Only product ids and quantities are
    /// sent; the backend recomputes prices from its own product data.
    ///
    /// `as_draft` forces the pending status regardless of the selected
    /// one ("save as draft" reuses the same call).
    pub fn build_payload(&self, as_draft: bool) -> OrderPayload {
        OrderPayload {
            client_id: self.draft.client().map(|c| c.id).unwrap_or_default(),
            status: if as_draft {
                OrderStatus::Pending
            } else {
                self.status
            },
            notes: self.notes.clone(),
            pending_products_note: self.pending_products_note.clone(),
            items: self
                .draft
                .items()
                .iter()
                .map(|item| OrderItemPayload {
                    product_id: item.product_id,
                    quantity: item.quantity,
                })
                .collect(),
        }
    }

    /// Validates and submits the draft: exactly one network call, create
    /// or update depending on whether an existing order is being edited.
    ///
    /// While the call is in flight the submit control is busy
    /// (`is_submitting` in the render model); a second activation gets
    /// [`FlowError::Busy`]. On failure the form stays editable and
    /// nothing is retried.
    pub async fn submit(&mut self, as_draft: bool) -> Result<SubmitOutcome, FlowError> {
        if self.is_submitting {
            return Err(FlowError::Busy);
        }
        if !self.validate() {
            return Err(FlowError::form("El pedido no es válido"));
        }

        let payload = self.build_payload(as_draft);
        debug!(
            order_id = ?self.editing_order_id,
            items = payload.items.len(),
            as_draft,
            "submitting order"
        );

        self.is_submitting = true;
        let result = match self.editing_order_id {
            Some(id) => self.api.update_order(id, &payload).await,
            None => self.api.create_order(&payload).await,
        };
        self.is_submitting = false;

        match result {
            Ok(ack) => {
                info!(order_id = ?self.editing_order_id, "order submitted");
                self.notifier.push(Severity::Success, ack.message.clone());
                Ok(SubmitOutcome {
                    message: ack.message,
                    redirect_after: REDIRECT_DELAY,
                })
            }
            Err(e) => {
                warn!(error = %e, "order submission failed");
                let message = if e.is_infrastructure() {
                    "Error al guardar pedido".to_string()
                } else {
                    e.to_string()
                };
                self.notifier.push(Severity::Danger, message);
                Err(e.into())
            }
        }
    }

    /// Whether a submission is currently in flight.
    pub fn is_submitting(&self) -> bool {
        self.is_submitting
    }

    // -------------------------------------------------------------------------
    // Hydration
    // -------------------------------------------------------------------------

    /// Loads the stored items of the order being edited.
    ///
    /// A failed fetch is logged and swallowed: an empty draft is an
    /// acceptable degraded state, the user can still compose from
    /// scratch. This is the one place a failure is not surfaced.
    pub async fn hydrate(&mut self) {
        let Some(order_id) = self.editing_order_id else {
            return;
        };

        match self.api.order_detail(order_id).await {
            Ok(detail) => {
                self.apply_hydration(&detail);
                info!(order_id, lines = self.draft.line_count(), "draft hydrated");
            }
            Err(e) => {
                warn!(order_id, error = %e, "hydration failed, composing from scratch");
            }
        }
    }

    /// Replays a detail response into the draft: full reset, not append.
    pub fn apply_hydration(&mut self, detail: &OrderDetail) {
        self.draft
            .load_items(detail.items.iter().map(|row| row.to_seed()));

        // Restore the client reference when the detail carries one. The
        // detail response has no surcharge rate; it comes back with an
        // explicit re-selection of the client.
        if let (Some(id), Some(code), Some(name)) =
            (detail.client_id, &detail.client_code, &detail.client_name)
        {
            self.draft.select_client(SelectedClient {
                id,
                code: code.clone(),
                name: name.clone(),
                surcharge_rate: farmalink_core::TaxRate::zero(),
            });
        }

        self.status = detail.status;
        self.notes = detail.notes.clone().unwrap_or_default();
        self.pending_products_note = detail.pending_products_note.clone().unwrap_or_default();
    }

    // -------------------------------------------------------------------------
    // Render model
    // -------------------------------------------------------------------------

    /// Snapshot the view layer renders from.
    pub fn view(&self) -> OrderFormView {
        OrderFormView {
            client: self.draft.client().cloned(),
            items: self.draft.items().to_vec(),
            totals: self.draft.totals(),
            can_add: self.pending.is_some(),
            is_submitting: self.is_submitting,
            client_error: self.client_error.clone(),
        }
    }

    /// Read access to the draft (tests and the totals panel).
    pub fn draft(&self) -> &OrderDraft {
        &self.draft
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
