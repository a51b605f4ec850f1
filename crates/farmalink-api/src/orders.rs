//! # Order Endpoints
//!
//! The order-workflow slice of the backend API: the lookup endpoints
//! feeding the composition form, order detail for hydration, and the
//! create/update/status/delete mutations.

use farmalink_core::OrderStatus;

use crate::client::ApiClient;
use crate::dto::{
    Ack, ClientHit, ClientSearchResponse, OrderDetail, OrderDetailResponse, OrderPayload,
    ProductHit, ProductSearchResponse, StatusChangePayload,
};
use crate::error::ApiResult;

impl ApiClient {
    /// Searches clients for the order form's client selector.
    ///
    /// `GET /pedidos/api/buscar-clientes?q=`
    ///
    /// The minimum-length and debounce rules live with the caller; this
    /// method fires exactly one request per call.
    pub async fn lookup_clients(&self, query: &str) -> ApiResult<Vec<ClientHit>> {
        let response: ClientSearchResponse = self
            .get_json("/pedidos/api/buscar-clientes", &[("q", query)])
            .await?;
        Ok(response.clients)
    }

    /// Searches products for the order form's product selector.
    ///
    /// `GET /pedidos/api/buscar-productos?q=`
    pub async fn lookup_products(&self, query: &str) -> ApiResult<Vec<ProductHit>> {
        let response: ProductSearchResponse = self
            .get_json("/pedidos/api/buscar-productos", &[("q", query)])
            .await?;
        Ok(response.products)
    }

    /// Fetches an order with its items.
    ///
    /// `GET /pedidos/api/detalle/:id`
    pub async fn order_detail(&self, id: i64) -> ApiResult<OrderDetail> {
        let response: OrderDetailResponse = self
            .get_json(&format!("/pedidos/api/detalle/{id}"), &[])
            .await?;
        Ok(response.pedido)
    }

    /// Creates a new order.
    ///
    /// `POST /pedidos/api/crear`
    pub async fn create_order(&self, payload: &OrderPayload) -> ApiResult<Ack> {
        self.post_ack("/pedidos/api/crear", payload).await
    }

    /// Updates an existing order.
    ///
    /// `PUT /pedidos/api/actualizar/:id`
    pub async fn update_order(&self, id: i64, payload: &OrderPayload) -> ApiResult<Ack> {
        self.put_ack(&format!("/pedidos/api/actualizar/{id}"), payload)
            .await
    }

    /// Moves an order to a new lifecycle status.
    ///
    /// `PUT /pedidos/api/cambiar-estado/:id`
    pub async fn change_order_status(&self, id: i64, status: OrderStatus) -> ApiResult<Ack> {
        self.put_ack(
            &format!("/pedidos/api/cambiar-estado/{id}"),
            &StatusChangePayload { status },
        )
        .await
    }

    /// Deletes an order (soft delete server-side).
    ///
    /// `DELETE /pedidos/api/eliminar/:id`
    pub async fn delete_order(&self, id: i64) -> ApiResult<Ack> {
        self.delete_ack(&format!("/pedidos/api/eliminar/{id}")).await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::client::ApiClient;
    use crate::config::ApiConfig;
    use crate::dto::OrderItemPayload;
    use crate::error::ApiError;

    use super::*;

    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn client_for(server: &MockServer) -> ApiClient {
        ApiClient::new(&ApiConfig::with_base_url(server.uri())).unwrap()
    }

    #[tokio::test]
    async fn test_lookup_products_encodes_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/pedidos/api/buscar-productos"))
            .and(query_param("q", "ibuprofeno 600"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "productos": [{
                    "id": 3,
                    "codigo": "P-003",
                    "nombre": "Ibuprofeno 600",
                    "pvf_sin_iva": 10.0,
                    "iva_porcentaje": 21.0,
                    "stock": 25,
                    "stock_minimo": 5,
                    "es_deposito": false
                }]
            })))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let hits = client.lookup_products("ibuprofeno 600").await.unwrap();

        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].code, "P-003");
    }

    #[tokio::test]
    async fn test_lookup_clients_empty_result() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/pedidos/api/buscar-clientes"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "clientes": [] })),
            )
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let hits = client.lookup_clients("zz").await.unwrap();
        assert!(hits.is_empty());
    }

    #[tokio::test]
    async fn test_create_order_sends_contract_body() {
        let server = MockServer::start().await;
        let expected_body = serde_json::json!({
            "cliente_id": 7,
            "estado": "pendiente",
            "observaciones": "",
            "productos_pendientes": "",
            "items": [{ "producto_id": 3, "cantidad": 2 }]
        });
        Mock::given(method("POST"))
            .and(path("/pedidos/api/crear"))
            .and(body_json(&expected_body))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true,
                "message": "Pedido creado correctamente"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let payload = OrderPayload {
            client_id: 7,
            status: OrderStatus::Pending,
            notes: String::new(),
            pending_products_note: String::new(),
            items: vec![OrderItemPayload {
                product_id: 3,
                quantity: 2,
            }],
        };

        let client = client_for(&server).await;
        let ack = client.create_order(&payload).await.unwrap();
        assert_eq!(ack.message, "Pedido creado correctamente");
    }

    #[tokio::test]
    async fn test_create_order_rejection_surfaces_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/pedidos/api/crear"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "success": false,
                "message": "Stock insuficiente para Ibuprofeno 600. Disponible: 1"
            })))
            .mount(&server)
            .await;

        let payload = OrderPayload {
            client_id: 7,
            status: OrderStatus::Pending,
            notes: String::new(),
            pending_products_note: String::new(),
            items: vec![OrderItemPayload {
                product_id: 3,
                quantity: 5,
            }],
        };

        let client = client_for(&server).await;
        match client.create_order(&payload).await.unwrap_err() {
            ApiError::Rejected { message } => {
                assert!(message.starts_with("Stock insuficiente"));
            }
            other => panic!("expected Rejected, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_change_order_status_wire_shape() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/pedidos/api/cambiar-estado/42"))
            .and(body_json(&serde_json::json!({ "estado": "confirmado" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true,
                "message": "Estado actualizado"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        client
            .change_order_status(42, OrderStatus::Confirmed)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_order_detail_returns_items() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/pedidos/api/detalle/42"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true,
                "pedido": {
                    "id": 42,
                    "numero_pedido": "PED-2025-0042",
                    "estado": "confirmado",
                    "items": [
                        {
                            "producto_id": 1,
                            "producto_codigo": "P-001",
                            "producto_nombre": "Paracetamol 1g",
                            "cantidad": 2,
                            "precio_unitario_sin_iva": 3.5,
                            "iva_porcentaje": 4.0
                        },
                        {
                            "producto_id": 2,
                            "producto_codigo": "P-002",
                            "producto_nombre": "Crema solar",
                            "cantidad": 1,
                            "precio_unitario_sin_iva": 15.5,
                            "iva_porcentaje": 21.0,
                            "es_deposito": true
                        }
                    ]
                }
            })))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let detail = client.order_detail(42).await.unwrap();

        assert_eq!(detail.status, OrderStatus::Confirmed);
        assert_eq!(detail.items.len(), 2);
        assert!(detail.items[1].is_consignment);
    }
}
