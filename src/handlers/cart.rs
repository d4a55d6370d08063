use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::db::DbPool;
use crate::errors::AppError;
use crate::session::ShopperSession;
use crate::store;
use crate::store::carts::{CartAction, CartSummary};

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateCartRequest {
    pub product_id: Option<Uuid>,
    /// One of "add", "remove", "update".
    pub action: Option<String>,
    /// Defaults to 1 when omitted.
    pub quantity: Option<i32>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartProductResponse {
    pub id: Uuid,
    pub name: String,
    /// Decimal price as a string to avoid floating-point issues, e.g. "9.99"
    pub price: String,
    pub image_url: String,
    pub quantity: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartSummaryResponse {
    pub total_items: i64,
    pub cart_subtotal: String,
    pub products: Vec<CartProductResponse>,
}

impl From<CartSummary> for CartSummaryResponse {
    fn from(summary: CartSummary) -> Self {
        Self {
            total_items: summary.total_items,
            cart_subtotal: summary.subtotal.to_string(),
            products: summary
                .lines
                .into_iter()
                .map(|line| CartProductResponse {
                    id: line.product_id,
                    name: line.name,
                    price: line.price.to_string(),
                    image_url: line.image_url,
                    quantity: line.quantity,
                })
                .collect(),
        }
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /cart
///
/// Applies one add/remove/update action to the caller's cart and returns
/// the recomputed summary. The cart is resolved (and created if absent)
/// from the request identity; the line change and the summary read share
/// one transaction.
#[utoipa::path(
    post,
    path = "/cart",
    request_body = UpdateCartRequest,
    responses(
        (status = 200, description = "Updated cart summary", body = CartSummaryResponse),
        (status = 400, description = "Missing or invalid product_id, action, or quantity"),
        (status = 404, description = "Unknown product"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "storefront"
)]
pub async fn update_cart(
    pool: web::Data<DbPool>,
    session: ShopperSession,
    form: web::Form<UpdateCartRequest>,
) -> Result<HttpResponse, AppError> {
    let form = form.into_inner();
    let identity = session.identity();
    let token = session.token;

    let summary = web::block(move || {
        let product_id = form
            .product_id
            .ok_or_else(|| AppError::Validation("missing product_id".to_string()))?;
        let action: CartAction = form
            .action
            .as_deref()
            .ok_or_else(|| AppError::Validation("missing action".to_string()))?
            .parse()?;
        let quantity = form.quantity.unwrap_or(1);

        let mut conn = pool.get()?;
        let rate = store::sessions::conversion_rate(&mut conn, token)?;
        let cart = store::carts::resolve_cart(&mut conn, &identity)?;
        store::carts::update_cart(&mut conn, cart.id, product_id, action, quantity, &rate)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(session.respond_json(HttpResponse::Ok(), &CartSummaryResponse::from(summary)))
}

/// GET /cart
///
/// Current cart summary with prices converted to the session currency.
#[utoipa::path(
    get,
    path = "/cart",
    responses(
        (status = 200, description = "Cart summary", body = CartSummaryResponse),
        (status = 500, description = "Internal server error"),
    ),
    tag = "storefront"
)]
pub async fn get_cart(
    pool: web::Data<DbPool>,
    session: ShopperSession,
) -> Result<HttpResponse, AppError> {
    let identity = session.identity();
    let token = session.token;

    let summary = web::block(move || {
        let mut conn = pool.get()?;
        let rate = store::sessions::conversion_rate(&mut conn, token)?;
        let cart = store::carts::resolve_cart(&mut conn, &identity)?;
        store::carts::summary(&mut conn, cart.id, &rate)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(session.respond_json(HttpResponse::Ok(), &CartSummaryResponse::from(summary)))
}
