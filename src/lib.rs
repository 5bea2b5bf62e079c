//! Admin backend for campus merchandise pre-orders: students, products, admins,
//! pre-orders and invoices behind one `entity` + `action` dispatch endpoint.

pub mod config;
pub mod dispatch;
pub mod entities;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod ids;
pub mod model;
pub mod response;
pub mod routes;
pub mod schema;
pub mod service;
pub mod sql;
pub mod state;
pub mod store;
pub mod uploads;

pub use config::AppConfig;
pub use dispatch::{dispatch, Action, Entity};
pub use error::{AppError, ConfigError};
pub use response::{Envelope, Reply};
pub use routes::app;
pub use service::{CrudService, Payload, UploadedFile};
pub use state::AppState;
pub use store::{MemoryStore, PgStore, Store};
pub use uploads::FileStore;
