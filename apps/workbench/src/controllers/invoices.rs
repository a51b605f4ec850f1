//! # Invoice Controller
//!
//! Invoice actions reachable from the order detail modal and the
//! invoice list: generation from a delivered order, and the
//! sent-by-email flag.

use serde::Serialize;
use tracing::{info, warn};
use ts_rs::TS;

use farmalink_api::dto::eur_to_cents;
use farmalink_api::ApiClient;
use farmalink_core::Money;

use crate::error::FlowError;
use crate::notify::{Notifier, Severity};

/// Render model of a freshly generated invoice.
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceView {
    pub id: i64,
    pub number: String,
    pub total: Money,
    pub issued_at: Option<String>,
}

/// Controller for invoice operations.
#[derive(Debug, Clone)]
pub struct InvoiceController {
    api: ApiClient,
    notifier: Notifier,
}

impl InvoiceController {
    pub fn new(api: ApiClient, notifier: Notifier) -> Self {
        InvoiceController { api, notifier }
    }

    /// Generates an invoice from an order.
    ///
    /// The backend refuses orders that are already invoiced or have no
    /// items; its message is surfaced verbatim.
    pub async fn generate_from_order(&self, order_id: i64) -> Result<InvoiceView, FlowError> {
        match self.api.generate_invoice_from_order(order_id).await {
            Ok(invoice) => {
                info!(order_id, number = %invoice.number, "invoice generated");
                self.notifier.push(
                    Severity::Success,
                    format!("Factura {} generada correctamente", invoice.number),
                );
                Ok(InvoiceView {
                    id: invoice.id,
                    number: invoice.number,
                    total: Money::from_cents(eur_to_cents(invoice.total_eur)),
                    issued_at: invoice.issued_at,
                })
            }
            Err(e) => {
                warn!(order_id, error = %e, "invoice generation failed");
                let message = if e.is_infrastructure() {
                    "Error al generar factura".to_string()
                } else {
                    e.to_string()
                };
                self.notifier.push(Severity::Danger, message);
                Err(e.into())
            }
        }
    }

    /// Marks an invoice as sent by email.
    pub async fn mark_sent(&self, invoice_id: i64) -> Result<(), FlowError> {
        match self.api.mark_invoice_sent(invoice_id).await {
            Ok(ack) => {
                info!(invoice_id, "invoice marked as sent");
                self.notifier.push(Severity::Success, ack.message);
                Ok(())
            }
            Err(e) => {
                warn!(invoice_id, error = %e, "mark sent failed");
                let message = if e.is_infrastructure() {
                    "Error al actualizar factura".to_string()
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
