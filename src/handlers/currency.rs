use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use utoipa::ToSchema;

use crate::db::DbPool;
use crate::errors::AppError;
use crate::session::ShopperSession;
use crate::store;

#[derive(Debug, Deserialize, ToSchema)]
pub struct ChangeCurrencyRequest {
    pub currency: Option<String>,
}

/// POST /currency
///
/// Selects the session currency. The code, display name and stringified
/// conversion rate are persisted on the session; subsequent reads convert
/// displayed prices with that rate.
#[utoipa::path(
    post,
    path = "/currency",
    request_body = ChangeCurrencyRequest,
    responses(
        (status = 200, description = "Currency selected"),
        (status = 400, description = "Missing currency code"),
        (status = 404, description = "Unknown currency code"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "storefront"
)]
pub async fn change_currency(
    pool: web::Data<DbPool>,
    session: ShopperSession,
    form: web::Form<ChangeCurrencyRequest>,
) -> Result<HttpResponse, AppError> {
    let code = form
        .into_inner()
        .currency
        .ok_or_else(|| AppError::Validation("missing currency".to_string()))?;
    let token = session.token;

    web::block(move || {
        let mut conn = pool.get()?;
        store::sessions::change_currency(&mut conn, token, &code)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(session.respond_json(HttpResponse::Ok(), &json!({ "success": true })))
}
