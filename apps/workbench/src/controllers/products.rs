//! # Product Directory Controller
//!
//! Search-as-you-type over the product directory, the product form
//! (with the VAT → surcharge default pulled from the shared policy
//! table), the low-stock listing and soft deletion.

use serde::Serialize;
use tracing::{debug, info, warn};
use ts_rs::TS;

use farmalink_api::dto::{eur_to_cents, ProductHit, ProductPayload};
use farmalink_api::ApiClient;
use farmalink_core::policy::{equivalence_surcharge, is_standard_vat_rate};
use farmalink_core::validation::{validate_code, validate_name, validate_price_cents};
use farmalink_core::{Money, StockLevel, TaxRate};

use crate::debounce::{SearchDirective, SearchPolicy};
use crate::error::{FieldError, FlowError};
use crate::notify::{Notifier, Severity};

/// Directory search result page size.
const SEARCH_LIMIT: u32 = 10;

// =============================================================================
// Form
// =============================================================================

/// Raw product form input.
#[derive(Debug, Clone, Default)]
pub struct ProductForm {
    pub code: String,
    pub name: String,
    pub description: String,
    /// Price excluding VAT, in euros as typed.
    pub price_eur: f64,
    /// VAT percentage; must be one of the standard set (4/10/21).
    pub vat_percent: f64,
    pub stock: i64,
    pub stock_minimum: i64,
    pub is_consignment: bool,
}

impl ProductForm {
    /// Validates the form and builds the submission payload.
    ///
    /// The equivalence surcharge is never typed by the user: it is
    /// derived from the VAT rate through the shared policy table, so
    /// the form and the totals can never disagree about the pairing.
    pub fn validate(&self) -> Result<ProductPayload, Vec<FieldError>> {
        let mut errors = Vec::new();

        if let Err(e) = validate_code(&self.code) {
            errors.push(FieldError {
                field: "codigo",
                message: e.to_string(),
            });
        }
        if let Err(e) = validate_name(&self.name) {
            errors.push(FieldError {
                field: "nombre",
                message: e.to_string(),
            });
        }
        if validate_price_cents(eur_to_cents(self.price_eur)).is_err() {
            errors.push(FieldError {
                field: "precio",
                message: "El precio debe ser un número válido mayor o igual a 0".to_string(),
            });
        }

        let vat_rate = TaxRate::from_percentage(self.vat_percent);
        if !is_standard_vat_rate(vat_rate) {
            errors.push(FieldError {
                field: "iva_porcentaje",
                message: "El IVA debe ser 4%, 10% o 21%".to_string(),
            });
        }

        if self.stock < 0 || self.stock_minimum < 0 {
            errors.push(FieldError {
                field: "stock",
                message: "El stock no puede ser negativo".to_string(),
            });
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(ProductPayload {
            code: self.code.trim().to_uppercase(),
            name: self.name.trim().to_string(),
            description: self.description.trim().to_string(),
            price_eur: self.price_eur,
            vat_percent: self.vat_percent,
            surcharge_percent: equivalence_surcharge(vat_rate).percentage(),
            stock: self.stock,
            stock_minimum: self.stock_minimum,
            is_consignment: self.is_consignment,
        })
    }
}

// =============================================================================
// Render Models
// =============================================================================

/// One row of the product search results or the low-stock listing.
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProductRow {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub unit_price: Money,
    pub vat_rate: TaxRate,
    pub stock: i64,
    pub stock_level: StockLevel,
    pub is_consignment: bool,
}

impl From<&ProductHit> for ProductRow {
    fn from(hit: &ProductHit) -> Self {
        let product = hit.to_product();
        ProductRow {
            id: product.id,
            code: product.code.clone(),
            name: product.name.clone(),
            description: product.description.clone(),
            unit_price: product.unit_price(),
            vat_rate: product.vat_rate(),
            stock: product.stock,
            stock_level: product.stock_level(),
            is_consignment: product.is_consignment,
        }
    }
}

/// The blocking confirmation shown before a delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductDeletePrompt {
    pub product_id: i64,
    pub message: String,
}

// =============================================================================
// Controller
// =============================================================================

/// Controller of the product directory pages.
#[derive(Debug, Clone)]
pub struct ProductDirectoryController {
    api: ApiClient,
    notifier: Notifier,
    search: SearchPolicy,
}

impl ProductDirectoryController {
    pub fn new(api: ApiClient, notifier: Notifier) -> Self {
        ProductDirectoryController {
            api,
            notifier,
            search: SearchPolicy::default(),
        }
    }

    /// The pure scheduling decision for a search keystroke.
    pub fn evaluate_query(&self, raw: &str) -> SearchDirective {
        self.search.evaluate(raw)
    }

    /// Searches the directory.
    pub async fn search(&self, query: &str) -> Result<Vec<ProductRow>, FlowError> {
        debug!(query, "product directory search");
        match self.api.search_products(query, SEARCH_LIMIT).await {
            Ok(hits) => Ok(hits.iter().map(ProductRow::from).collect()),
            Err(e) => {
                warn!(error = %e, "product search failed");
                self.notifier
                    .push(Severity::Danger, "Error de conexión con el servidor");
                Err(e.into())
            }
        }
    }

    /// Loads one product for the detail panel or the edit form.
    pub async fn detail(&self, product_id: i64) -> Result<ProductRow, FlowError> {
        match self.api.product_detail(product_id).await {
            Ok(hit) => Ok(ProductRow::from(&hit)),
            Err(e) => {
                warn!(product_id, error = %e, "product detail load failed");
                self.notifier.push(
                    Severity::Danger,
                    "Error al cargar la información del producto",
                );
                Err(e.into())
            }
        }
    }

    /// The replenishment view: active products at or below minimum stock.
    pub async fn low_stock(&self) -> Result<Vec<ProductRow>, FlowError> {
        match self.api.low_stock_products().await {
            Ok(hits) => Ok(hits.iter().map(ProductRow::from).collect()),
            Err(e) => {
                warn!(error = %e, "low stock listing failed");
                self.notifier
                    .push(Severity::Danger, "Error de conexión con el servidor");
                Err(e.into())
            }
        }
    }

    /// Validates and saves the form: create when `existing_id` is None,
    /// update otherwise.
    pub async fn save(
        &self,
        form: &ProductForm,
        existing_id: Option<i64>,
    ) -> Result<String, Vec<FieldError>> {
        let payload = form.validate()?;

        let result = match existing_id {
            Some(id) => self.api.update_product(id, &payload).await,
            None => self.api.create_product(&payload).await,
        };

        match result {
            Ok(ack) => {
                info!(code = %payload.code, "product saved");
                self.notifier.push(Severity::Success, ack.message.clone());
                Ok(ack.message)
            }
            Err(e) => {
                warn!(error = %e, "product save failed");
                let message = if e.is_infrastructure() {
                    "Error al guardar producto".to_string()
                } else {
                    e.to_string()
                };
                self.notifier.push(Severity::Danger, message.clone());
                Err(vec![FieldError {
                    field: "form",
                    message,
                }])
            }
        }
    }

    /// First step of deletion: the blocking confirmation naming the product.
    pub fn request_delete(&self, row: &ProductRow) -> ProductDeletePrompt {
        ProductDeletePrompt {
            product_id: row.id,
            message: format!(
                "¿Estás seguro de que deseas desactivar el producto \"{}\"?",
                row.name
            ),
        }
    }

    /// Second step of deletion (soft delete server-side).
    pub async fn confirm_delete(&self, product_id: i64) -> Result<(), FlowError> {
        match self.api.delete_product(product_id).await {
            Ok(ack) => {
                info!(product_id, "product deactivated");
                self.notifier.push(Severity::Success, ack.message);
                Ok(())
            }
            Err(e) => {
                warn!(product_id, error = %e, "product delete failed");
                let message = if e.is_infrastructure() {
                    "Error al eliminar producto".to_string()
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
