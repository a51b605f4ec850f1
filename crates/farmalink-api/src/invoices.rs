//! # Invoice Endpoints
//!
//! Invoices are generated server-side from delivered orders; the client
//! only triggers generation and tracks the sent-by-email flag.

use tracing::debug;

use crate::client::ApiClient;
use crate::dto::{Ack, InvoiceResponse, InvoiceSummary};
use crate::error::{ApiError, ApiResult};

impl ApiClient {
    /// Generates an invoice from an order.
    ///
    /// `POST /facturas/api/generar-desde-pedido/:order_id`
    ///
    /// Rejected when the order already carries an invoice or has no
    /// items; the backend's message says which.
    pub async fn generate_invoice_from_order(&self, order_id: i64) -> ApiResult<InvoiceSummary> {
        let url = self.endpoint(&format!("/facturas/api/generar-desde-pedido/{order_id}"))?;
        debug!(%url, "POST");
        let response = self
            .http
            .post(url)
            .send()
            .await
            .map_err(ApiError::Transport)?;

        let body: InvoiceResponse = response.json().await.map_err(ApiError::Decode)?;
        if !body.success {
            return Err(ApiError::Rejected {
                message: body.message,
            });
        }
        body.invoice.ok_or_else(|| ApiError::Rejected {
            message: "backend acknowledged without invoice data".to_string(),
        })
    }

    /// Marks an invoice as sent by email.
    ///
    /// `PUT /facturas/api/marcar-enviada/:id`
    pub async fn mark_invoice_sent(&self, id: i64) -> ApiResult<Ack> {
        self.put_ack(&format!("/facturas/api/marcar-enviada/{id}"), &())
            .await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::client::ApiClient;
    use crate::config::ApiConfig;
    use crate::error::ApiError;

    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_generate_invoice_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/facturas/api/generar-desde-pedido/42"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true,
                "message": "Factura generada correctamente",
                "factura": {
                    "id": 9,
                    "numero_factura": "FAC-2025-0009",
                    "total": 37.86,
                    "fecha_factura": "2025-06-10T10:00:00"
                }
            })))
            .mount(&server)
            .await;

        let client = ApiClient::new(&ApiConfig::with_base_url(server.uri())).unwrap();
        let invoice = client.generate_invoice_from_order(42).await.unwrap();

        assert_eq!(invoice.number, "FAC-2025-0009");
    }

    #[tokio::test]
    async fn test_generate_invoice_already_invoiced() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/facturas/api/generar-desde-pedido/42"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "success": false,
                "message": "Este pedido ya tiene una factura generada"
            })))
            .mount(&server)
            .await;

        let client = ApiClient::new(&ApiConfig::with_base_url(server.uri())).unwrap();
        match client.generate_invoice_from_order(42).await.unwrap_err() {
            ApiError::Rejected { message } => {
                assert_eq!(message, "Este pedido ya tiene una factura generada");
            }
            other => panic!("expected Rejected, got {other:?}"),
        }
    }
}
