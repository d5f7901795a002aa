//! Core types for the Webstore gateway.

pub mod document;
pub mod id;
pub mod order;

pub use document::{Document, DocumentError, ID_FIELD};
pub use id::{DocumentId, IdError};
pub use order::{ORDERS_COLLECTION, Order, OrderError};
