//! # Order List Controller
//!
//! Operations on stored orders from the list page: the detail modal,
//! lifecycle status changes and deletion behind a blocking confirmation.

use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info, warn};
use ts_rs::TS;

use farmalink_api::dto::{eur_to_cents, OrderDetail};
use farmalink_api::ApiClient;
use farmalink_core::{Money, OrderStatus, TaxRate};

use crate::error::FlowError;
use crate::notify::{Notifier, Severity};

/// Delay before refreshing the list after a successful mutation, long
/// enough for the confirmation notification to register.
pub const REFRESH_DELAY: Duration = Duration::from_millis(1000);

// =============================================================================
// Render Models
// =============================================================================

/// One row of the detail modal's item table.
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineView {
    pub product_code: String,
    pub product_name: String,
    pub quantity: i64,
    pub vat_rate: TaxRate,
    pub unit_price: Money,
    pub subtotal_excl_vat: Money,
    pub vat_amount: Money,
    pub subtotal_incl_vat: Money,
}

/// Render model of the order detail modal.
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetailView {
    pub id: i64,
    pub number: String,
    pub client_name: String,
    pub client_code: String,
    /// ISO timestamp; formatted by the view layer.
    pub ordered_at: Option<String>,
    pub status: OrderStatus,
    pub items_count: usize,
    pub items: Vec<OrderLineView>,
    pub subtotal: Money,
    pub total_vat: Money,
    pub total_surcharge: Money,
    pub total: Money,
    pub notes: Option<String>,
    pub pending_products_note: Option<String>,
    /// Editing is offered only while the lifecycle allows it.
    pub can_edit: bool,
}

impl From<&OrderDetail> for OrderDetailView {
    fn from(detail: &OrderDetail) -> Self {
        OrderDetailView {
            id: detail.id,
            number: detail.number.clone(),
            client_name: detail.client_name.clone().unwrap_or_default(),
            client_code: detail.client_code.clone().unwrap_or_default(),
            ordered_at: detail.ordered_at.clone(),
            status: detail.status,
            items_count: detail.items_count,
            items: detail
                .items
                .iter()
                .map(|row| OrderLineView {
                    product_code: row.product_code.clone(),
                    product_name: row.product_name.clone(),
                    quantity: row.quantity,
                    vat_rate: TaxRate::from_percentage(row.vat_percent),
                    unit_price: Money::from_cents(eur_to_cents(row.unit_price_eur)),
                    subtotal_excl_vat: Money::from_cents(eur_to_cents(row.subtotal_excl_vat_eur)),
                    vat_amount: Money::from_cents(eur_to_cents(row.vat_amount_eur)),
                    subtotal_incl_vat: Money::from_cents(eur_to_cents(row.subtotal_incl_vat_eur)),
                })
                .collect(),
            subtotal: Money::from_cents(eur_to_cents(detail.subtotal_eur)),
            total_vat: Money::from_cents(eur_to_cents(detail.total_vat_eur)),
            total_surcharge: Money::from_cents(eur_to_cents(detail.total_surcharge_eur)),
            total: Money::from_cents(eur_to_cents(detail.total_eur)),
            notes: detail.notes.clone().filter(|n| !n.is_empty()),
            pending_products_note: detail
                .pending_products_note
                .clone()
                .filter(|n| !n.is_empty()),
            can_edit: detail.status.is_editable(),
        }
    }
}

/// The blocking confirmation shown before a delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletePrompt {
    pub order_id: i64,
    pub order_number: String,
    pub message: String,
}

/// A successful list mutation: what happened and when to refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListOutcome {
    pub message: String,
    pub refresh_after: Duration,
}

// =============================================================================
// Controller
// =============================================================================

/// Controller of the order list page.
#[derive(Debug, Clone)]
pub struct OrderListController {
    api: ApiClient,
    notifier: Notifier,
}

impl OrderListController {
    pub fn new(api: ApiClient, notifier: Notifier) -> Self {
        OrderListController { api, notifier }
    }

    /// Loads an order for the detail modal.
    ///
    /// The modal renders its own failure state; the notification only
    /// signals that the load failed.
    pub async fn load_detail(&self, order_id: i64) -> Result<OrderDetailView, FlowError> {
        debug!(order_id, "loading order detail");
        match self.api.order_detail(order_id).await {
            Ok(detail) => Ok(OrderDetailView::from(&detail)),
            Err(e) => {
                warn!(order_id, error = %e, "order detail load failed");
                self.notifier.push(
                    Severity::Danger,
                    "Error al cargar la información del pedido",
                );
                Err(e.into())
            }
        }
    }

    /// Moves an order to a new lifecycle status.
    pub async fn change_status(
        &self,
        order_id: i64,
        status: OrderStatus,
    ) -> Result<ListOutcome, FlowError> {
        debug!(order_id, %status, "changing order status");
        match self.api.change_order_status(order_id, status).await {
            Ok(ack) => {
                info!(order_id, %status, "order status changed");
                self.notifier.push(Severity::Success, ack.message.clone());
                Ok(ListOutcome {
                    message: ack.message,
                    refresh_after: REFRESH_DELAY,
                })
            }
            Err(e) => {
                warn!(order_id, error = %e, "status change failed");
                let message = if e.is_infrastructure() {
                    "Error al cambiar estado del pedido".to_string()
                } else {
                    e.to_string()
                };
                self.notifier.push(Severity::Danger, message);
                Err(e.into())
            }
        }
    }

    /// First step of deletion: the blocking confirmation naming the order.
    pub fn request_delete(&self, order_id: i64, order_number: &str) -> DeletePrompt {
        DeletePrompt {
            order_id,
            order_number: order_number.to_string(),
            message: format!(
                "¿Estás seguro de que deseas eliminar el pedido \"{order_number}\"?\n\n\
                 Esta acción no se puede deshacer."
            ),
        }
    }

    /// Second step of deletion: the user accepted the confirmation.
    /// The backend deactivates the order (soft delete).
    pub async fn confirm_delete(&self, order_id: i64) -> Result<ListOutcome, FlowError> {
        match self.api.delete_order(order_id).await {
            Ok(ack) => {
                info!(order_id, "order deleted");
                self.notifier.push(Severity::Success, ack.message.clone());
                Ok(ListOutcome {
                    message: ack.message,
                    refresh_after: REFRESH_DELAY,
                })
            }
            Err(e) => {
                warn!(order_id, error = %e, "order delete failed");
                let message = if e.is_infrastructure() {
                    "Error al eliminar pedido".to_string()
                } else {
                    e.to_string()
                };
                self.notifier.push(Severity::Danger, message);
                Err(e.into())
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use farmalink_api::ApiConfig;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn controller_for(uri: &str) -> (OrderListController, Notifier) {
        let api = ApiClient::new(&ApiConfig::with_base_url(uri)).unwrap();
        let notifier = Notifier::new();
        (OrderListController::new(api, notifier.clone()), notifier)
    }

    #[tokio::test]
    async fn test_detail_view_converts_amounts_to_cents() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/pedidos/api/detalle/42"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true,
                "pedido": {
                    "id": 42,
                    "numero_pedido": "PED-2025-0042",
                    "cliente_codigo": "C07",
                    "cliente_nombre": "Farmacia Sur",
                    "estado": "facturado",
                    "subtotal": 30.0,
                    "total_iva": 6.3,
                    "total_recargo": 1.56,
                    "total": 37.86,
                    "items_count": 1,
                    "items": [{
                        "producto_id": 3,
                        "producto_codigo": "P-003",
                        "producto_nombre": "Ibuprofeno 600",
                        "cantidad": 3,
                        "precio_unitario_sin_iva": 10.0,
                        "iva_porcentaje": 21.0,
                        "subtotal_sin_iva": 30.0,
                        "total_iva": 6.3,
                        "subtotal_con_iva": 36.3
                    }]
                }
            })))
            .mount(&server)
            .await;

        let (controller, _) = controller_for(&server.uri());
        let view = controller.load_detail(42).await.unwrap();

        assert_eq!(view.total.cents(), 3786);
        assert_eq!(view.items[0].subtotal_incl_vat.cents(), 3630);
        // Invoiced orders can no longer be edited
        assert!(!view.can_edit);
    }

    #[tokio::test]
    async fn test_change_status_sends_wire_value() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/pedidos/api/cambiar-estado/42"))
            .and(body_json(&serde_json::json!({ "estado": "entregado" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true,
                "message": "Estado actualizado correctamente"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let (controller, notifier) = controller_for(&server.uri());
        let outcome = controller
            .change_status(42, OrderStatus::Delivered)
            .await
            .unwrap();

        assert_eq!(outcome.refresh_after, REFRESH_DELAY);
        assert_eq!(notifier.snapshot().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_prompt_names_the_order() {
        let (controller, _) = controller_for("http://127.0.0.1:1");
        let prompt = controller.request_delete(42, "PED-2025-0042");
        assert!(prompt.message.contains("PED-2025-0042"));
        assert!(prompt.message.contains("no se puede deshacer"));
    }

    #[tokio::test]
    async fn test_delete_failure_surfaces_backend_message() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/pedidos/api/eliminar/42"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "success": false,
                "message": "No se puede eliminar un pedido facturado"
            })))
            .mount(&server)
            .await;

        let (controller, notifier) = controller_for(&server.uri());
        assert!(controller.confirm_delete(42).await.is_err());

        let messages = notifier.snapshot();
        assert_eq!(messages[0].message, "No se puede eliminar un pedido facturado");
        assert_eq!(messages[0].severity, Severity::Danger);
    }
}
