use actix_web::{web, HttpResponse};
use bigdecimal::BigDecimal;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::db::DbPool;
use crate::errors::AppError;
use crate::models::product::Product;
use crate::schema::products;
use crate::session::ShopperSession;
use crate::store::{pricing, sessions};

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductResponse {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    /// Decimal price as a string, converted to the session currency.
    pub price: String,
    pub image_url: String,
}

impl ProductResponse {
    pub(crate) fn from_product(product: Product, rate: &BigDecimal) -> Self {
        Self {
            id: product.id,
            name: product.name,
            description: product.description,
            price: pricing::convert(&product.price, rate).to_string(),
            image_url: product.image_url,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SearchParams {
    /// Free-text query matched against name and description.
    #[serde(default)]
    pub q: String,
}

/// GET /products
///
/// The full catalogue, priced in the session currency.
#[utoipa::path(
    get,
    path = "/products",
    responses(
        (status = 200, description = "All products", body = [ProductResponse]),
        (status = 500, description = "Internal server error"),
    ),
    tag = "storefront"
)]
pub async fn list_products(
    pool: web::Data<DbPool>,
    session: ShopperSession,
) -> Result<HttpResponse, AppError> {
    let token = session.token;

    let items = web::block(move || {
        let mut conn = pool.get()?;
        let rate = sessions::conversion_rate(&mut conn, token)?;
        let rows = products::table
            .order(products::name.asc())
            .select(Product::as_select())
            .load(&mut conn)?;
        Ok::<_, AppError>(
            rows.into_iter()
                .map(|p| ProductResponse::from_product(p, &rate))
                .collect::<Vec<_>>(),
        )
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(session.respond_json(HttpResponse::Ok(), &items))
}

/// GET /products/{id}
#[utoipa::path(
    get,
    path = "/products/{id}",
    params(("id" = Uuid, Path, description = "Product UUID")),
    responses(
        (status = 200, description = "Product found", body = ProductResponse),
        (status = 404, description = "Product not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "storefront"
)]
pub async fn get_product(
    pool: web::Data<DbPool>,
    session: ShopperSession,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let product_id = path.into_inner();
    let token = session.token;

    let result = web::block(move || {
        let mut conn = pool.get()?;
        let rate = sessions::conversion_rate(&mut conn, token)?;
        let product = products::table
            .find(product_id)
            .select(Product::as_select())
            .first(&mut conn)
            .optional()?;
        Ok::<_, AppError>(product.map(|p| ProductResponse::from_product(p, &rate)))
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    match result {
        Some(product) => Ok(session.respond_json(HttpResponse::Ok(), &product)),
        None => Err(AppError::NotFound),
    }
}

/// GET /search
///
/// Case-insensitive substring match over product names and descriptions,
/// most expensive first. An empty query returns the whole catalogue.
#[utoipa::path(
    get,
    path = "/search",
    params(("q" = Option<String>, Query, description = "Free-text query")),
    responses(
        (status = 200, description = "Matching products", body = [ProductResponse]),
        (status = 500, description = "Internal server error"),
    ),
    tag = "storefront"
)]
pub async fn search(
    pool: web::Data<DbPool>,
    session: ShopperSession,
    params: web::Query<SearchParams>,
) -> Result<HttpResponse, AppError> {
    let query = params.into_inner().q;
    let token = session.token;

    let items = web::block(move || {
        let mut conn = pool.get()?;
        let rate = sessions::conversion_rate(&mut conn, token)?;

        let mut statement = products::table
            .select(Product::as_select())
            .order(products::price.desc())
            .into_boxed();
        if !query.is_empty() {
            let pattern = format!("%{query}%");
            statement = statement.filter(
                products::name
                    .ilike(pattern.clone())
                    .or(products::description.ilike(pattern)),
            );
        }

        let rows = statement.load(&mut conn)?;
        Ok::<_, AppError>(
            rows.into_iter()
                .map(|p| ProductResponse::from_product(p, &rate))
                .collect::<Vec<_>>(),
        )
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(session.respond_json(HttpResponse::Ok(), &items))
}
