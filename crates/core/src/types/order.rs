//! Order submissions.
//!
//! An order is an ordinary [`Document`] that carries a customer name and a
//! non-empty cart. Cart entries are opaque; only the overall shape is checked.

use serde_json::Value;

use super::document::Document;

/// Collection every order is written to.
pub const ORDERS_COLLECTION: &str = "orders";

/// Ways an order submission can fail the shape check.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderError {
    /// `customerName` is absent, null, false, zero, or an empty string.
    #[error("order must include a customer name")]
    MissingCustomerName,
    /// `cart` is absent or not an array.
    #[error("order cart must be a list")]
    CartNotAList,
    /// `cart` is an empty array.
    #[error("order cart cannot be empty")]
    EmptyCart,
}

/// A document that passed order validation.
///
/// ## Examples
///
/// ```
/// use serde_json::json;
/// use webstore_core::{Document, Order, OrderError};
///
/// let doc = Document::from_value(json!({"customerName": "Alice", "cart": [{"sku": "x"}]})).unwrap();
/// assert!(Order::validate(doc).is_ok());
///
/// let doc = Document::from_value(json!({"customerName": "Alice", "cart": []})).unwrap();
/// assert_eq!(Order::validate(doc), Err(OrderError::EmptyCart));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Order(Document);

impl Order {
    /// Field holding the customer's name.
    pub const CUSTOMER_NAME_FIELD: &'static str = "customerName";
    /// Field holding the cart entries.
    pub const CART_FIELD: &'static str = "cart";

    /// Check that a document has the order shape.
    ///
    /// # Errors
    ///
    /// Returns an error if `customerName` is missing or blank, or if `cart`
    /// is not a non-empty array.
    pub fn validate(document: Document) -> Result<Self, OrderError> {
        if !document
            .get(Self::CUSTOMER_NAME_FIELD)
            .is_some_and(is_present)
        {
            return Err(OrderError::MissingCustomerName);
        }

        match document.get(Self::CART_FIELD) {
            Some(Value::Array(items)) if items.is_empty() => Err(OrderError::EmptyCart),
            Some(Value::Array(_)) => Ok(Self(document)),
            _ => Err(OrderError::CartNotAList),
        }
    }

    /// Consume the order and return the document to store.
    #[must_use]
    pub fn into_document(self) -> Document {
        self.0
    }
}

/// Whether a field value counts as supplied.
fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
