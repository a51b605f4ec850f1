//! # Wire DTOs
//!
//! Data transfer objects for the backend's JSON contract.
//!
//! ## Why DTOs?
//! - The wire format uses Spanish field names and float euro amounts;
//!   the domain uses English names and integer cents. The rename happens
//!   here, in exactly one place.
//! - Floats never cross this boundary: every monetary field converts to
//!   [`Money`] cents on the way in.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                   Wire ↔ Domain Boundary                                │
//! │                                                                         │
//! │  {"pvf_sin_iva": 10.0, "iva_porcentaje": 21.0}                         │
//! │                    │ serde rename + eur_to_cents                        │
//! │                    ▼                                                    │
//! │  Product { unit_price_cents: 1000, vat_rate_bps: 2100 }                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};

use farmalink_core::{
    Client, LineItemSeed, Money, OrderStatus, Product, SelectedClient, TaxRate,
};

// =============================================================================
// Boundary Conversion
// =============================================================================

/// Converts a wire euro amount to integer cents.
///
/// The backend serializes decimals as JSON numbers; rounding here absorbs
/// the float representation error (10.00 may arrive as 9.999999...).
pub fn eur_to_cents(eur: f64) -> i64 {
    (eur * 100.0).round() as i64
}

// =============================================================================
// Response Envelope
// =============================================================================

/// The `{success, message}` envelope every mutation answers with.
#[derive(Debug, Clone, Deserialize)]
pub struct Ack {
    pub success: bool,
    #[serde(default)]
    pub message: String,
}

/// Response of the startup connectivity check (`GET /api/test`).
#[derive(Debug, Clone, Deserialize)]
pub struct PingResponse {
    pub status: String,
}

// =============================================================================
// Search Hits
// =============================================================================

/// A client row from the lookup endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientHit {
    pub id: i64,
    #[serde(rename = "codigo")]
    pub code: String,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "direccion", default)]
    pub address: Option<String>,
    #[serde(rename = "telefono", default)]
    pub phone: Option<String>,
    #[serde(rename = "email", default)]
    pub email: Option<String>,
    /// Equivalence surcharge percentage (e.g. 5.2); absent or null when
    /// the client is not under the equivalence regime.
    #[serde(rename = "recargo_equivalencia", default)]
    pub surcharge_percent: Option<f64>,
}

impl ClientHit {
    /// The domain client this hit describes. Search only returns active
    /// clients, and fiscal fields don't travel on the lookup endpoints.
    pub fn to_client(&self) -> Client {
        Client {
            id: self.id,
            code: self.code.clone(),
            name: self.name.clone(),
            address: self.address.clone(),
            phone: self.phone.clone(),
            email: self.email.clone(),
            fiscal_name: None,
            tax_id: None,
            bank_account: None,
            surcharge_rate_bps: self
                .surcharge_percent
                .map(|pct| TaxRate::from_percentage(pct).bps())
                .unwrap_or(0),
            is_active: true,
        }
    }

    /// The draft-side snapshot of this client.
    pub fn to_selected(&self) -> SelectedClient {
        SelectedClient::from(&self.to_client())
    }
}

/// Body of `GET /pedidos/api/buscar-clientes` and `/clientes/api/buscar`.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientSearchResponse {
    #[serde(rename = "clientes", default)]
    pub clients: Vec<ClientHit>,
}

/// A product row from the lookup endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductHit {
    pub id: i64,
    #[serde(rename = "codigo")]
    pub code: String,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "descripcion", default)]
    pub description: Option<String>,
    /// Pharmacy sale price excluding VAT, in euros.
    #[serde(rename = "pvf_sin_iva")]
    pub unit_price_eur: f64,
    /// VAT percentage: 4, 10 or 21.
    #[serde(rename = "iva_porcentaje")]
    pub vat_percent: f64,
    pub stock: i64,
    #[serde(rename = "stock_minimo", default)]
    pub stock_minimum: i64,
    /// Consignment flag - consignment products have no stock limit.
    #[serde(rename = "es_deposito", default)]
    pub is_consignment: bool,
}

impl ProductHit {
    /// The domain product this hit describes. Search only returns active
    /// products, so the flag is always true here.
    pub fn to_product(&self) -> Product {
        Product {
            id: self.id,
            code: self.code.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            unit_price_cents: eur_to_cents(self.unit_price_eur),
            vat_rate_bps: TaxRate::from_percentage(self.vat_percent).bps(),
            stock: self.stock,
            stock_minimum: self.stock_minimum,
            is_consignment: self.is_consignment,
            is_active: true,
        }
    }
}

/// Body of `GET /pedidos/api/buscar-productos`, `/productos/api/buscar`
/// and `/productos/api/stock-bajo`.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductSearchResponse {
    #[serde(rename = "productos", default)]
    pub products: Vec<ProductHit>,
}

// =============================================================================
// Order Detail
// =============================================================================

/// A stored order line as returned by the detail endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderItemRow {
    #[serde(rename = "producto_id")]
    pub product_id: i64,
    #[serde(rename = "producto_codigo")]
    pub product_code: String,
    #[serde(rename = "producto_nombre")]
    pub product_name: String,
    #[serde(rename = "cantidad")]
    pub quantity: i64,
    #[serde(rename = "precio_unitario_sin_iva")]
    pub unit_price_eur: f64,
    #[serde(rename = "iva_porcentaje")]
    pub vat_percent: f64,
    #[serde(rename = "subtotal_sin_iva", default)]
    pub subtotal_excl_vat_eur: f64,
    #[serde(rename = "total_iva", default)]
    pub vat_amount_eur: f64,
    #[serde(rename = "subtotal_con_iva", default)]
    pub subtotal_incl_vat_eur: f64,
    #[serde(rename = "es_deposito", default)]
    pub is_consignment: bool,
}

impl OrderItemRow {
    /// The hydration seed for this row. Stored derived amounts are
    /// ignored: the draft recomputes them from quantity, price and rate.
    pub fn to_seed(&self) -> LineItemSeed {
        LineItemSeed {
            product_id: self.product_id,
            product_code: self.product_code.clone(),
            product_name: self.product_name.clone(),
            quantity: self.quantity,
            unit_price: Money::from_cents(eur_to_cents(self.unit_price_eur)),
            vat_rate: TaxRate::from_percentage(self.vat_percent),
            is_consignment: self.is_consignment,
        }
    }
}

/// An order as returned by `GET /pedidos/api/detalle/:id`.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderDetail {
    pub id: i64,
    #[serde(rename = "numero_pedido")]
    pub number: String,
    #[serde(rename = "cliente_id", default)]
    pub client_id: Option<i64>,
    #[serde(rename = "cliente_codigo", default)]
    pub client_code: Option<String>,
    #[serde(rename = "cliente_nombre", default)]
    pub client_name: Option<String>,
    /// ISO timestamp string; display formatting is a frontend concern.
    #[serde(rename = "fecha_pedido", default)]
    pub ordered_at: Option<String>,
    #[serde(rename = "estado")]
    pub status: OrderStatus,
    #[serde(rename = "observaciones", default)]
    pub notes: Option<String>,
    #[serde(rename = "productos_pendientes", default)]
    pub pending_products_note: Option<String>,
    #[serde(rename = "subtotal", default)]
    pub subtotal_eur: f64,
    #[serde(rename = "total_iva", default)]
    pub total_vat_eur: f64,
    #[serde(rename = "total_recargo", default)]
    pub total_surcharge_eur: f64,
    #[serde(rename = "total", default)]
    pub total_eur: f64,
    #[serde(rename = "items_count", default)]
    pub items_count: usize,
    #[serde(default)]
    pub items: Vec<OrderItemRow>,
}

/// Body of `GET /pedidos/api/detalle/:id`.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderDetailResponse {
    #[serde(default)]
    pub success: bool,
    pub pedido: OrderDetail,
}

// =============================================================================
// Order Submission
// =============================================================================

/// A submitted order line: only product identity and quantity travel.
/// Price and VAT snapshots stay on the client; the server recomputes
/// authoritative amounts from its own product data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderItemPayload {
    #[serde(rename = "producto_id")]
    pub product_id: i64,
    #[serde(rename = "cantidad")]
    pub quantity: i64,
}

/// Body of `POST /pedidos/api/crear` and `PUT /pedidos/api/actualizar/:id`.
#[derive(Debug, Clone, Serialize)]
pub struct OrderPayload {
    #[serde(rename = "cliente_id")]
    pub client_id: i64,
    #[serde(rename = "estado")]
    pub status: OrderStatus,
    #[serde(rename = "observaciones")]
    pub notes: String,
    #[serde(rename = "productos_pendientes")]
    pub pending_products_note: String,
    pub items: Vec<OrderItemPayload>,
}

/// Body of `PUT /pedidos/api/cambiar-estado/:id`.
#[derive(Debug, Clone, Serialize)]
pub struct StatusChangePayload {
    #[serde(rename = "estado")]
    pub status: OrderStatus,
}

// =============================================================================
// Client / Product Directory Payloads
// =============================================================================

/// Body of `POST /clientes/api/crear` and `PUT /clientes/api/actualizar/:id`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ClientPayload {
    #[serde(rename = "codigo")]
    pub code: String,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "direccion")]
    pub address: String,
    #[serde(rename = "telefono")]
    pub phone: String,
    pub email: String,
    #[serde(rename = "nombre_fiscal")]
    pub fiscal_name: String,
    #[serde(rename = "cif")]
    pub tax_id: String,
    #[serde(rename = "cuenta_bancaria")]
    pub bank_account: String,
    #[serde(rename = "notas")]
    pub notes: String,
}

/// Body of `POST /productos/api/crear` and `PUT /productos/api/actualizar/:id`.
///
/// The surcharge percentage is derived from the VAT rate through the
/// shared policy table, never entered by hand.
#[derive(Debug, Clone, Serialize)]
pub struct ProductPayload {
    #[serde(rename = "codigo")]
    pub code: String,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "descripcion")]
    pub description: String,
    /// Price excluding VAT, in euros (the wire is decimal).
    #[serde(rename = "precio")]
    pub price_eur: f64,
    #[serde(rename = "iva_porcentaje")]
    pub vat_percent: f64,
    #[serde(rename = "recargo_equivalencia")]
    pub surcharge_percent: f64,
    pub stock: i64,
    #[serde(rename = "stock_minimo")]
    pub stock_minimum: i64,
    #[serde(rename = "es_deposito")]
    pub is_consignment: bool,
}

/// Body of `GET /productos/api/detalle/:id`.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductDetailResponse {
    #[serde(rename = "producto")]
    pub product: ProductHit,
}

/// Body of `GET /clientes/api/detalle/:id`.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientDetailResponse {
    #[serde(rename = "cliente")]
    pub client: ClientHit,
    #[serde(rename = "estadisticas", default)]
    pub statistics: Option<ClientStatistics>,
}

/// Aggregates the backend attaches to a client detail.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientStatistics {
    #[serde(rename = "total_pedidos", default)]
    pub total_orders: i64,
    #[serde(rename = "fecha_ultimo_pedido", default)]
    pub last_order_at: Option<String>,
}

// =============================================================================
// Invoices
// =============================================================================

/// The invoice summary returned by generate-from-order.
#[derive(Debug, Clone, Deserialize)]
pub struct InvoiceSummary {
    pub id: i64,
    #[serde(rename = "numero_factura")]
    pub number: String,
    #[serde(rename = "total")]
    pub total_eur: f64,
    #[serde(rename = "fecha_factura", default)]
    pub issued_at: Option<String>,
}

/// Body of `POST /facturas/api/generar-desde-pedido/:id`.
#[derive(Debug, Clone, Deserialize)]
pub struct InvoiceResponse {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(rename = "factura", default)]
    pub invoice: Option<InvoiceSummary>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eur_to_cents_rounding() {
        assert_eq!(eur_to_cents(10.0), 1000);
        assert_eq!(eur_to_cents(10.005), 1001);
        assert_eq!(eur_to_cents(9.999999999), 1000);
        assert_eq!(eur_to_cents(0.0), 0);
    }

    #[test]
    fn test_client_hit_wire_shape() {
        let json = r#"{
            "id": 7,
            "codigo": "C07",
            "nombre": "Farmacia Sur",
            "direccion": "Calle Real 12",
            "recargo_equivalencia": 5.2
        }"#;
        let hit: ClientHit = serde_json::from_str(json).unwrap();
        assert_eq!(hit.code, "C07");

        let selected = hit.to_selected();
        assert_eq!(selected.id, 7);
        assert_eq!(selected.surcharge_rate.bps(), 520);
    }

    #[test]
    fn test_client_hit_without_surcharge() {
        let json = r#"{"id": 1, "codigo": "C01", "nombre": "Farmacia Norte"}"#;
        let hit: ClientHit = serde_json::from_str(json).unwrap();
        assert!(hit.to_selected().surcharge_rate.is_zero());
    }

    #[test]
    fn test_product_hit_wire_shape() {
        let json = r#"{
            "id": 3,
            "codigo": "P-003",
            "nombre": "Ibuprofeno 600",
            "descripcion": "Caja de 40 comprimidos",
            "pvf_sin_iva": 10.0,
            "iva_porcentaje": 21.0,
            "stock": 25,
            "stock_minimo": 5,
            "es_deposito": false
        }"#;
        let hit: ProductHit = serde_json::from_str(json).unwrap();
        let product = hit.to_product();

        assert_eq!(product.unit_price_cents, 1000);
        assert_eq!(product.vat_rate_bps, 2100);
        assert!(product.is_active);
    }

    #[test]
    fn test_order_detail_wire_shape() {
        let json = r#"{
            "success": true,
            "pedido": {
                "id": 42,
                "numero_pedido": "PED-2025-0042",
                "cliente_id": 7,
                "cliente_codigo": "C07",
                "cliente_nombre": "Farmacia Sur",
                "fecha_pedido": "2025-06-10T09:30:00",
                "estado": "pendiente",
                "observaciones": "Entregar por la mañana",
                "productos_pendientes": "",
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
        }"#;
        let response: OrderDetailResponse = serde_json::from_str(json).unwrap();
        let order = response.pedido;

        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.items.len(), 1);

        let seed = order.items[0].to_seed();
        assert_eq!(seed.quantity, 3);
        assert_eq!(seed.unit_price.cents(), 1000);
        assert_eq!(seed.vat_rate.bps(), 2100);
    }

    #[test]
    fn test_order_payload_wire_shape() {
        let payload = OrderPayload {
            client_id: 7,
            status: OrderStatus::Pending,
            notes: "".to_string(),
            pending_products_note: "".to_string(),
            items: vec![OrderItemPayload {
                product_id: 3,
                quantity: 2,
            }],
        };

        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["cliente_id"], 7);
        assert_eq!(value["estado"], "pendiente");
        assert_eq!(value["items"][0]["producto_id"], 3);
        assert_eq!(value["items"][0]["cantidad"], 2);
        // Snapshots must NOT travel: the server owns pricing
        assert!(value["items"][0].get("precio_unitario_sin_iva").is_none());
    }

    #[test]
    fn test_ack_defaults_message() {
        let ack: Ack = serde_json::from_str(r#"{"success": true}"#).unwrap();
        assert!(ack.success);
        assert!(ack.message.is_empty());
    }
}
