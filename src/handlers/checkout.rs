use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::db::DbPool;
use crate::errors::AppError;
use crate::session::ShopperSession;
use crate::store::checkout::{place_order, AddressInput, ShippingAddress};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CheckoutRequest {
    /// Reuse a stored address by id; submitted fields are ignored when set.
    pub existing_address: Option<Uuid>,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub address_line_1: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub zipcode: String,
    #[serde(default)]
    pub phone: String,
}

/// POST /checkout
///
/// Converts the authenticated user's cart into an order: resolves the
/// shipping address, snapshots totals and unit prices, writes the order
/// with its lines and clears the cart, all in one transaction. On success
/// the Location header points at the order confirmation.
#[utoipa::path(
    post,
    path = "/checkout",
    request_body = CheckoutRequest,
    responses(
        (status = 201, description = "Order placed; body carries the order id"),
        (status = 400, description = "Empty cart or invalid address fields"),
        (status = 401, description = "Anonymous caller"),
        (status = 404, description = "Unknown existing address"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "storefront"
)]
pub async fn checkout(
    pool: web::Data<DbPool>,
    session: ShopperSession,
    body: web::Json<CheckoutRequest>,
) -> Result<HttpResponse, AppError> {
    let user_id = session.require_user()?;
    let body = body.into_inner();

    let shipping = match body.existing_address {
        Some(id) => ShippingAddress::Existing(id),
        None => ShippingAddress::New(AddressInput {
            first_name: body.first_name,
            last_name: body.last_name,
            email: body.email,
            address_line_1: body.address_line_1,
            country: body.country,
            state: body.state,
            city: body.city,
            zipcode: body.zipcode,
            phone: body.phone,
        }),
    };

    let order_id = web::block(move || {
        let mut conn = pool.get()?;
        place_order(&mut conn, user_id, shipping)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    let mut builder = HttpResponse::Created();
    builder.insert_header(("Location", format!("/orders/{order_id}")));
    Ok(session.respond_json(builder, &json!({ "id": order_id })))
}
