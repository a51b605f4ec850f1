//! # Farmalink Workbench Library
//!
//! The application layer of the Farmalink client: it wires the pure
//! domain logic (farmalink-core) and the backend client (farmalink-api)
//! into view controllers a typed frontend drives.
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Application Startup                               │
//! │                                                                         │
//! │  1. Initialize Logging ───────────────────────────────────────────────► │
//! │     • tracing-subscriber with env filter                                │
//! │     • Default: INFO, can be overridden with RUST_LOG                    │
//! │                                                                         │
//! │  2. Resolve API Configuration ────────────────────────────────────────► │
//! │     • FARMALINK_API_URL env var, else api.toml, else localhost          │
//! │                                                                         │
//! │  3. Build the App Context ────────────────────────────────────────────► │
//! │     • ApiClient (shared connection pool)                                │
//! │     • Notifier (shared notification center)                             │
//! │                                                                         │
//! │  4. Connectivity Check ───────────────────────────────────────────────► │
//! │     • GET /api/test                                                     │
//! │     • success notification, or persistent danger on failure            │
//! │                                                                         │
//! │  5. Hand controllers to the view layer ───────────────────────────────► │
//! │     • order_form(), order_list(), clients(), products(), invoices()    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod controllers;
pub mod debounce;
pub mod error;
pub mod notify;

use std::process::ExitCode;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use farmalink_api::{ApiClient, ApiConfig};

use crate::error::FlowError;
use crate::notify::{Notifier, Severity};

/// Shared services every controller is built from.
///
/// One context per page session: controllers each get a clone of the
/// API client (shared connection pool) and of the notifier handle
/// (shared notification list).
#[derive(Debug, Clone)]
pub struct AppContext {
    api: ApiClient,
    notifier: Notifier,
}

impl AppContext {
    /// Builds the context from resolved configuration.
    pub fn initialize(config: &ApiConfig) -> Result<Self, FlowError> {
        let api = ApiClient::new(config)?;
        Ok(AppContext {
            api,
            notifier: Notifier::new(),
        })
    }

    /// The shared notification handle (for the rendering layer).
    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    /// The backend client (for view wiring that needs raw access).
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Startup connectivity check against the backend.
    ///
    /// A reachable backend produces a transient success notification;
    /// an unreachable one produces a persistent danger notification -
    /// connection problems must stay visible until acted on.
    pub async fn check_connection(&self) -> bool {
        match self.api.ping().await {
            Ok(()) => {
                info!(base_url = %self.api.base_url(), "Backend connection verified");
                self.notifier
                    .push(Severity::Success, "Sistema conectado correctamente");
                true
            }
            Err(e) => {
                error!(base_url = %self.api.base_url(), error = %e, "Backend connection failed");
                self.notifier
                    .push_persistent(Severity::Danger, "Error de conexión con el servidor");
                false
            }
        }
    }

    // -------------------------------------------------------------------------
    // Controller factories
    // -------------------------------------------------------------------------

    /// Controller for composing a new order.
    pub fn order_form(&self) -> controllers::OrderFormController {
        controllers::OrderFormController::new(self.api.clone(), self.notifier.clone())
    }

    /// Controller for editing an existing order (call `hydrate()` next).
    pub fn order_form_for(&self, order_id: i64) -> controllers::OrderFormController {
        controllers::OrderFormController::for_order(
            self.api.clone(),
            self.notifier.clone(),
            order_id,
        )
    }

    /// Controller for the order list page.
    pub fn order_list(&self) -> controllers::OrderListController {
        controllers::OrderListController::new(self.api.clone(), self.notifier.clone())
    }

    /// Controller for the client directory pages.
    pub fn clients(&self) -> controllers::ClientDirectoryController {
        controllers::ClientDirectoryController::new(self.api.clone(), self.notifier.clone())
    }

    /// Controller for the product directory pages.
    pub fn products(&self) -> controllers::ProductDirectoryController {
        controllers::ProductDirectoryController::new(self.api.clone(), self.notifier.clone())
    }

    /// Controller for invoice operations.
    pub fn invoices(&self) -> controllers::InvoiceController {
        controllers::InvoiceController::new(self.api.clone(), self.notifier.clone())
    }
}

/// Runs the workbench bootstrap and connectivity check.
///
/// The view layer embeds this crate as a library; the binary exists so
/// deployments can verify a terminal's configuration from the shell.
pub async fn run() -> ExitCode {
    init_tracing();

    info!("Starting Farmalink workbench");

    let config = ApiConfig::load();
    let context = match AppContext::initialize(&config) {
        Ok(context) => context,
        Err(e) => {
            error!(error = %e, "Could not build application context");
            return ExitCode::FAILURE;
        }
    };

    if context.check_connection().await {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=farmalink=trace` - Show trace for farmalink crates only
/// - Default: INFO level
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,farmalink=debug"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}
