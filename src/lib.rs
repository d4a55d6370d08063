pub mod db;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod schema;
pub mod session;
pub mod store;

use actix_web::{middleware::Logger, web, App, HttpServer};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub use db::{create_pool, DbPool};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Run any pending Diesel migrations against the pool's database.
pub fn run_migrations(pool: &DbPool) {
    let mut conn = pool.get().expect("Failed to get DB connection for migrations");
    conn.run_pending_migrations(MIGRATIONS)
        .expect("Failed to run database migrations");
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::currency::change_currency,
        handlers::cart::get_cart,
        handlers::cart::update_cart,
        handlers::wishlist::toggle_wishlist,
        handlers::wishlist::list_wishlist,
        handlers::products::list_products,
        handlers::products::get_product,
        handlers::products::search,
        handlers::checkout::checkout,
        handlers::orders::get_order,
        handlers::orders::list_orders,
        handlers::addresses::get_address_details,
    ),
    components(schemas(
        handlers::currency::ChangeCurrencyRequest,
        handlers::cart::UpdateCartRequest,
        handlers::cart::CartProductResponse,
        handlers::cart::CartSummaryResponse,
        handlers::wishlist::ToggleWishlistRequest,
        handlers::products::ProductResponse,
        handlers::products::SearchParams,
        handlers::checkout::CheckoutRequest,
        handlers::orders::OrderLineResponse,
        handlers::orders::OrderResponse,
        handlers::orders::ListOrdersParams,
        handlers::orders::ListOrdersResponse,
        handlers::addresses::AddressResponse,
    )),
    tags(
        (name = "storefront", description = "Storefront request-handling API")
    )
)]
struct ApiDoc;

/// Build and return an actix-web `Server` bound to `host:port`.
///
/// The caller is responsible for `.await`-ing (or `tokio::spawn`-ing) the
/// returned server.
pub fn build_server(
    pool: DbPool,
    host: &str,
    port: u16,
) -> std::io::Result<actix_web::dev::Server> {
    Ok(HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .wrap(Logger::default())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", ApiDoc::openapi()),
            )
            .route(
                "/currency",
                web::post().to(handlers::currency::change_currency),
            )
            .service(
                web::resource("/cart")
                    .route(web::get().to(handlers::cart::get_cart))
                    .route(web::post().to(handlers::cart::update_cart)),
            )
            .route(
                "/wishlist",
                web::get().to(handlers::wishlist::list_wishlist),
            )
            .route(
                "/wishlist/toggle",
                web::post().to(handlers::wishlist::toggle_wishlist),
            )
            .route(
                "/products",
                web::get().to(handlers::products::list_products),
            )
            .route(
                "/products/{id}",
                web::get().to(handlers::products::get_product),
            )
            .route("/search", web::get().to(handlers::products::search))
            .route("/checkout", web::post().to(handlers::checkout::checkout))
            .service(
                web::scope("/orders")
                    .route("", web::get().to(handlers::orders::list_orders))
                    .route("/{id}", web::get().to(handlers::orders::get_order)),
            )
            .route(
                "/addresses/{id}",
                web::get().to(handlers::addresses::get_address_details),
            )
    })
    .bind((host.to_string(), port))?
    .run())
}
