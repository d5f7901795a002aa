//! Order placement.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::instrument;
use webstore_core::{ID_FIELD, ORDERS_COLLECTION, Order};

use crate::error::{AppError, Result};
use crate::middleware::{Collection, JsonBody};
use crate::state::AppState;

/// Response for an accepted order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPlaced {
    pub msg: String,
    pub order_id: Value,
}

/// Validate the order shape and store it in `orders`.
#[instrument(skip_all)]
pub async fn place_order(
    State(state): State<AppState>,
    body: JsonBody,
) -> Result<Json<OrderPlaced>> {
    let activity = state.activity();
    tracing::debug!(order = %body.0, "Received order");

    let order = match body
        .into_document()
        .map_err(|e| AppError::InvalidOrder(e.to_string()))
        .and_then(|document| Order::validate(document).map_err(AppError::from))
    {
        Ok(order) => order,
        Err(e) => {
            activity.log("Invalid order data received");
            return Err(e);
        }
    };

    let orders = Collection::resolve(state.store(), ORDERS_COLLECTION);
    let stored = orders
        .insert_one(order.into_document())
        .await
        .inspect_err(|e| activity.log(format!("Error inserting order: {e}")))?;

    activity.log(format!("Order placed successfully - Data: {stored}"));
    Ok(Json(OrderPlaced {
        msg: "Order placed successfully".to_string(),
        order_id: stored.get(ID_FIELD).cloned().unwrap_or(Value::Null),
    }))
}
