//! One handler module per managed entity, each exposing create, read, update and delete.

pub mod admin;
pub mod invoice;
pub mod preorder;
pub mod product;
pub mod student;

/// Default for order and invoice dates.
pub(crate) fn today() -> chrono::NaiveDate {
    chrono::Local::now().date_naive()
}
