//! # Product Directory Endpoints
//!
//! CRUD triad for the product directory pages, plus the low-stock
//! listing that feeds the replenishment view.

use crate::client::ApiClient;
use crate::dto::{Ack, ProductDetailResponse, ProductHit, ProductPayload, ProductSearchResponse};
use crate::error::ApiResult;

impl ApiClient {
    /// Searches products by code, name, description or supplier fields.
    ///
    /// `GET /productos/api/buscar?q=&limit=`
    pub async fn search_products(&self, query: &str, limit: u32) -> ApiResult<Vec<ProductHit>> {
        let limit = limit.to_string();
        let response: ProductSearchResponse = self
            .get_json("/productos/api/buscar", &[("q", query), ("limit", &limit)])
            .await?;
        Ok(response.products)
    }

    /// Fetches one product.
    ///
    /// `GET /productos/api/detalle/:id`
    pub async fn product_detail(&self, id: i64) -> ApiResult<ProductHit> {
        let response: ProductDetailResponse = self
            .get_json(&format!("/productos/api/detalle/{id}"), &[])
            .await?;
        Ok(response.product)
    }

    /// Lists active products at or below their minimum stock.
    ///
    /// `GET /productos/api/stock-bajo`
    pub async fn low_stock_products(&self) -> ApiResult<Vec<ProductHit>> {
        let response: ProductSearchResponse =
            self.get_json("/productos/api/stock-bajo", &[]).await?;
        Ok(response.products)
    }

    /// Creates a product.
    ///
    /// `POST /productos/api/crear`
    pub async fn create_product(&self, payload: &ProductPayload) -> ApiResult<Ack> {
        self.post_ack("/productos/api/crear", payload).await
    }

    /// Updates a product.
    ///
    /// `PUT /productos/api/actualizar/:id`
    pub async fn update_product(&self, id: i64, payload: &ProductPayload) -> ApiResult<Ack> {
        self.put_ack(&format!("/productos/api/actualizar/{id}"), payload)
            .await
    }

    /// Deactivates a product (soft delete).
    ///
    /// `DELETE /productos/api/eliminar/:id`
    pub async fn delete_product(&self, id: i64) -> ApiResult<Ack> {
        self.delete_ack(&format!("/productos/api/eliminar/{id}"))
            .await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
