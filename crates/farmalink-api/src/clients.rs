//! # Client Directory Endpoints
//!
//! CRUD triad for the client directory pages. Deletion is a soft delete
//! server-side (deactivation); the blocking confirmation lives with the
//! controller, not here.

use crate::client::ApiClient;
use crate::dto::{Ack, ClientDetailResponse, ClientHit, ClientPayload, ClientSearchResponse};
use crate::error::ApiResult;

impl ApiClient {
    /// Searches clients by code, name or phone.
    ///
    /// `GET /clientes/api/buscar?q=&limit=`
    pub async fn search_clients(&self, query: &str, limit: u32) -> ApiResult<Vec<ClientHit>> {
        let limit = limit.to_string();
        let response: ClientSearchResponse = self
            .get_json("/clientes/api/buscar", &[("q", query), ("limit", &limit)])
            .await?;
        Ok(response.clients)
    }

    /// Fetches one client with its order statistics.
    ///
    /// `GET /clientes/api/detalle/:id`
    pub async fn client_detail(&self, id: i64) -> ApiResult<ClientDetailResponse> {
        self.get_json(&format!("/clientes/api/detalle/{id}"), &[])
            .await
    }

    /// Creates a client.
    ///
    /// `POST /clientes/api/crear`
    pub async fn create_client(&self, payload: &ClientPayload) -> ApiResult<Ack> {
        self.post_ack("/clientes/api/crear", payload).await
    }

    /// Updates a client.
    ///
    /// `PUT /clientes/api/actualizar/:id`
    pub async fn update_client(&self, id: i64, payload: &ClientPayload) -> ApiResult<Ack> {
        self.put_ack(&format!("/clientes/api/actualizar/{id}"), payload)
            .await
    }

    /// Deactivates a client (soft delete).
    ///
    /// `DELETE /clientes/api/eliminar/:id`
    pub async fn delete_client(&self, id: i64) -> ApiResult<Ack> {
        self.delete_ack(&format!("/clientes/api/eliminar/{id}")).await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
