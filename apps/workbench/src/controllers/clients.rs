//! # Client Directory Controller
//!
//! Search-as-you-type over the client directory, the client form with
//! field-level validation, and soft deletion behind a blocking
//! confirmation.

use serde::Serialize;
use tracing::{debug, info, warn};
use ts_rs::TS;

use farmalink_api::dto::{ClientHit, ClientPayload, ClientStatistics};
use farmalink_api::ApiClient;
use farmalink_core::validation::{
    validate_code, validate_email, validate_iban, validate_name, validate_phone,
    validate_tax_id,
};

use crate::debounce::{SearchDirective, SearchPolicy};
use crate::error::{FieldError, FlowError};
use crate::notify::{Notifier, Severity};

/// Directory search result page size.
const SEARCH_LIMIT: u32 = 10;

// =============================================================================
// Form
// =============================================================================

/// Raw client form input, exactly as typed.
///
/// `validate` turns it into the wire payload; every finding is
/// field-addressed so the view highlights the offending input in place.
#[derive(Debug, Clone, Default)]
pub struct ClientForm {
    pub code: String,
    pub name: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub fiscal_name: String,
    pub tax_id: String,
    pub bank_account: String,
    pub notes: String,
}

impl ClientForm {
    /// Validates the form and builds the submission payload.
    ///
    /// Code and name are required; contact and fiscal fields are only
    /// pattern-checked when non-empty, matching the backend's rules.
    pub fn validate(&self) -> Result<ClientPayload, Vec<FieldError>> {
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
        if !self.email.trim().is_empty() && validate_email(&self.email).is_err() {
            errors.push(FieldError {
                field: "email",
                message: "El formato del email no es válido".to_string(),
            });
        }
        if !self.phone.trim().is_empty() && validate_phone(&self.phone).is_err() {
            errors.push(FieldError {
                field: "telefono",
                message: "El formato del teléfono no es válido".to_string(),
            });
        }
        if !self.tax_id.trim().is_empty() && validate_tax_id(&self.tax_id).is_err() {
            errors.push(FieldError {
                field: "cif",
                message: "El formato del CIF/NIF no es válido".to_string(),
            });
        }
        if !self.bank_account.trim().is_empty() && validate_iban(&self.bank_account).is_err() {
            errors.push(FieldError {
                field: "cuenta_bancaria",
                message: "El formato del IBAN no es válido".to_string(),
            });
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(ClientPayload {
            code: self.code.trim().to_uppercase(),
            name: self.name.trim().to_string(),
            address: self.address.trim().to_string(),
            phone: self.phone.trim().to_string(),
            email: self.email.trim().to_lowercase(),
            fiscal_name: self.fiscal_name.trim().to_string(),
            tax_id: self.tax_id.trim().to_uppercase(),
            bank_account: self.bank_account.split_whitespace().collect(),
            notes: self.notes.trim().to_string(),
        })
    }
}

// =============================================================================
// Render Models
// =============================================================================

/// Render model of the client detail panel.
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ClientDetailView {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub total_orders: i64,
    pub last_order_at: Option<String>,
}

/// The blocking confirmation shown before a delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientDeletePrompt {
    pub client_id: i64,
    pub message: String,
}

// =============================================================================
// Controller
// =============================================================================

/// Controller of the client directory pages.
#[derive(Debug, Clone)]
pub struct ClientDirectoryController {
    api: ApiClient,
    notifier: Notifier,
    search: SearchPolicy,
}

impl ClientDirectoryController {
    pub fn new(api: ApiClient, notifier: Notifier) -> Self {
        ClientDirectoryController {
            api,
            notifier,
            search: SearchPolicy::default(),
        }
    }

    /// The pure scheduling decision for a search keystroke.
    pub fn evaluate_query(&self, raw: &str) -> SearchDirective {
        self.search.evaluate(raw)
    }

    /// Searches the directory by code, name or phone.
    pub async fn search(&self, query: &str) -> Result<Vec<ClientHit>, FlowError> {
        debug!(query, "client directory search");
        match self.api.search_clients(query, SEARCH_LIMIT).await {
            Ok(hits) => Ok(hits),
            Err(e) => {
                warn!(error = %e, "client search failed");
                self.notifier
                    .push(Severity::Danger, "Error de conexión con el servidor");
                Err(e.into())
            }
        }
    }

    /// Loads a client with its order statistics for the detail panel.
    pub async fn detail(&self, client_id: i64) -> Result<ClientDetailView, FlowError> {
        match self.api.client_detail(client_id).await {
            Ok(response) => {
                let stats = response.statistics.unwrap_or(ClientStatistics {
                    total_orders: 0,
                    last_order_at: None,
                });
                let client = response.client;
                Ok(ClientDetailView {
                    id: client.id,
                    code: client.code,
                    name: client.name,
                    address: client.address,
                    phone: client.phone,
                    email: client.email,
                    total_orders: stats.total_orders,
                    last_order_at: stats.last_order_at,
                })
            }
            Err(e) => {
                warn!(client_id, error = %e, "client detail load failed");
                self.notifier
                    .push(Severity::Danger, "Error al cargar la información del cliente");
                Err(e.into())
            }
        }
    }

    /// Validates and saves the form: create when `existing_id` is None,
    /// update otherwise. Validation failures never reach the network.
    pub async fn save(
        &self,
        form: &ClientForm,
        existing_id: Option<i64>,
    ) -> Result<String, Vec<FieldError>> {
        let payload = form.validate()?;

        let result = match existing_id {
            Some(id) => self.api.update_client(id, &payload).await,
            None => self.api.create_client(&payload).await,
        };

        match result {
            Ok(ack) => {
                info!(code = %payload.code, "client saved");
                self.notifier.push(Severity::Success, ack.message.clone());
                Ok(ack.message)
            }
            Err(e) => {
                warn!(error = %e, "client save failed");
                let message = if e.is_infrastructure() {
                    "Error al guardar cliente".to_string()
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

    /// First step of deletion: the blocking confirmation naming the client.
    pub fn request_delete(&self, hit: &ClientHit) -> ClientDeletePrompt {
        ClientDeletePrompt {
            client_id: hit.id,
            message: format!(
                "¿Estás seguro de que deseas desactivar el cliente \"{}\"?",
                hit.name
            ),
        }
    }

    /// Second step of deletion (soft delete server-side).
    pub async fn confirm_delete(&self, client_id: i64) -> Result<(), FlowError> {
        match self.api.delete_client(client_id).await {
            Ok(ack) => {
                info!(client_id, "client deactivated");
                self.notifier.push(Severity::Success, ack.message);
                Ok(())
            }
            Err(e) => {
                warn!(client_id, error = %e, "client delete failed");
                let message = if e.is_infrastructure() {
                    "Error al eliminar cliente".to_string()
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

    fn valid_form() -> ClientForm {
        ClientForm {
            code: "farm-007".to_string(),
            name: "  Farmacia Sur  ".to_string(),
            address: "Calle Real 12".to_string(),
            phone: "958 12 34 56".to_string(),
            email: "Pedidos@FarmaciaSur.es".to_string(),
            fiscal_name: "Farmacia Sur S.L.".to_string(),
            tax_id: "b1234567a".to_string(),
            bank_account: "ES91 2100 0418 4502 0005 1332".to_string(),
            notes: String::new(),
        }
    }

    #[test]
    fn test_form_normalizes_on_validate() {
        let payload = valid_form().validate().unwrap();
        assert_eq!(payload.code, "FARM-007");
        assert_eq!(payload.name, "Farmacia Sur");
        assert_eq!(payload.email, "pedidos@farmaciasur.es");
        assert_eq!(payload.tax_id, "B1234567A");
        assert_eq!(payload.bank_account, "ES9121000418450200051332");
    }

    #[test]
    fn test_form_requires_code_and_name() {
        let form = ClientForm::default();
        let errors = form.validate().unwrap_err();

        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert!(fields.contains(&"codigo"));
        assert!(fields.contains(&"nombre"));
    }

    #[test]
    fn test_optional_fields_only_checked_when_present() {
        let mut form = ClientForm {
            code: "C01".to_string(),
            name: "Farmacia Norte".to_string(),
            ..ClientForm::default()
        };
        assert!(form.validate().is_ok());

        form.email = "not-an-email".to_string();
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "email");
    }

    #[test]
    fn test_bad_iban_is_field_addressed() {
        let mut form = valid_form();
        form.bank_account = "ES91".to_string();
        let errors = form.validate().unwrap_err();
        assert_eq!(errors[0].field, "cuenta_bancaria");
    }
}
