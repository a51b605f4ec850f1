//! # View Controllers
//!
//! One controller per page. Controllers own their state explicitly (no
//! module globals), talk to the backend through `farmalink-api`, and
//! expose render models - plain serializable structs the view layer
//! draws. All event handling is explicit method dispatch; there is no
//! implicit global namespace for the view to reach into.
//!
//! ## Controller Map
//! ```text
//! controllers/
//! ├── order_form.rs  ◄─── Order composition workflow (draft, prompts,
//! │                       submission, hydration)
//! ├── order_list.rs  ◄─── Order list page (status, delete, detail modal)
//! ├── clients.rs     ◄─── Client directory (search, form, soft delete)
//! ├── products.rs    ◄─── Product directory (search, form, low stock)
//! └── invoices.rs    ◄─── Invoice actions (generate, mark sent)
//! ```

pub mod clients;
pub mod invoices;
pub mod order_form;
pub mod order_list;
pub mod products;

pub use clients::ClientDirectoryController;
pub use invoices::InvoiceController;
pub use order_form::OrderFormController;
pub use order_list::OrderListController;
pub use products::ProductDirectoryController;
