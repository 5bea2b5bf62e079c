//! CrudService and request field access shared by the entity handlers.

mod crud;
mod fields;
pub use crud::{CrudService, MAX_KEY_ATTEMPTS};
pub use fields::{Payload, UploadedFile};
