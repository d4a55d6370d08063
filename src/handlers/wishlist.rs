use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::db::DbPool;
use crate::errors::AppError;
use crate::session::ShopperSession;
use crate::store;

use super::products::ProductResponse;

#[derive(Debug, Deserialize, ToSchema)]
pub struct ToggleWishlistRequest {
    pub product_id: Option<Uuid>,
}

/// POST /wishlist/toggle
///
/// Toggles the product on the caller's wishlist: present entries are
/// removed, absent ones created. The response reports which way it went.
#[utoipa::path(
    post,
    path = "/wishlist/toggle",
    request_body = ToggleWishlistRequest,
    responses(
        (status = 200, description = "Toggled; body reports {\"added\": bool}"),
        (status = 400, description = "Malformed body or missing product_id"),
        (status = 404, description = "Unknown product"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "storefront"
)]
pub async fn toggle_wishlist(
    pool: web::Data<DbPool>,
    session: ShopperSession,
    body: web::Json<ToggleWishlistRequest>,
) -> Result<HttpResponse, AppError> {
    let product_id = body
        .into_inner()
        .product_id
        .ok_or_else(|| AppError::Validation("missing product_id".to_string()))?;
    let identity = session.identity();

    let added = web::block(move || {
        let mut conn = pool.get()?;
        store::wishlists::toggle(&mut conn, &identity, product_id)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(session.respond_json(HttpResponse::Ok(), &json!({ "added": added })))
}

/// GET /wishlist
///
/// Products on the caller's wishlist, priced in the session currency.
#[utoipa::path(
    get,
    path = "/wishlist",
    responses(
        (status = 200, description = "Wishlist products", body = [ProductResponse]),
        (status = 500, description = "Internal server error"),
    ),
    tag = "storefront"
)]
pub async fn list_wishlist(
    pool: web::Data<DbPool>,
    session: ShopperSession,
) -> Result<HttpResponse, AppError> {
    let identity = session.identity();
    let token = session.token;

    let items = web::block(move || {
        let mut conn = pool.get()?;
        let rate = store::sessions::conversion_rate(&mut conn, token)?;
        let products = store::wishlists::list(&mut conn, &identity)?;
        Ok::<_, AppError>(
            products
                .into_iter()
                .map(|p| ProductResponse::from_product(p, &rate))
                .collect::<Vec<_>>(),
        )
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(session.respond_json(HttpResponse::Ok(), &items))
}
