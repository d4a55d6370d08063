use actix_web::{web, HttpResponse};
use diesel::prelude::*;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::db::DbPool;
use crate::errors::AppError;
use crate::models::address::Address;
use crate::schema::addresses;
use crate::session::ShopperSession;

/// Address field snapshot, shaped for checkout form prefills.
#[derive(Debug, Serialize, ToSchema)]
pub struct AddressResponse {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub address_line_1: String,
    pub country: String,
    pub state: String,
    pub city: String,
    pub zipcode: String,
    pub phone: String,
}

/// GET /addresses/{id}
///
/// One of the authenticated user's stored addresses; other users' addresses
/// are indistinguishable from absent ones.
#[utoipa::path(
    get,
    path = "/addresses/{id}",
    params(
        ("id" = Uuid, Path, description = "Address UUID"),
    ),
    responses(
        (status = 200, description = "Address found", body = AddressResponse),
        (status = 401, description = "Anonymous caller"),
        (status = 404, description = "Address not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "storefront"
)]
pub async fn get_address_details(
    pool: web::Data<DbPool>,
    session: ShopperSession,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let user_id = session.require_user()?;
    let address_id = path.into_inner();

    let result = web::block(move || {
        let mut conn = pool.get()?;
        let address = addresses::table
            .filter(addresses::id.eq(address_id))
            .filter(addresses::user_id.eq(user_id))
            .select(Address::as_select())
            .first(&mut conn)
            .optional()?;
        Ok::<_, AppError>(address)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    let Some(address) = result else {
        return Err(AppError::NotFound);
    };

    Ok(HttpResponse::Ok().json(AddressResponse {
        first_name: address.first_name,
        last_name: address.last_name,
        email: address.email,
        address_line_1: address.address_line_1,
        country: address.country,
        state: address.state,
        city: address.city,
        zipcode: address.zipcode,
        phone: address.phone,
    }))
}
