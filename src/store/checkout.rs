//! Order finalization: the cart's lines become an immutable order inside a
//! single transaction.

use bigdecimal::BigDecimal;
use diesel::prelude::*;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::address::NewAddress;
use crate::models::cart::CartLine;
use crate::models::order::NewOrder;
use crate::models::order_line::NewOrderLine;
use crate::models::product::Product;
use crate::schema::{addresses, cart_lines, order_lines, orders};
use crate::session::Identity;

use super::carts::resolve_cart;

/// Submitted shipping address fields.
#[derive(Debug, Clone)]
pub struct AddressInput {
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

/// Shipping destination: a stored address by id, or fields to persist.
#[derive(Debug, Clone)]
pub enum ShippingAddress {
    Existing(Uuid),
    New(AddressInput),
}

fn validate_address(input: &AddressInput) -> Result<(), AppError> {
    let required = [
        ("first_name", &input.first_name),
        ("last_name", &input.last_name),
        ("email", &input.email),
        ("address_line_1", &input.address_line_1),
        ("country", &input.country),
        ("state", &input.state),
        ("city", &input.city),
        ("zipcode", &input.zipcode),
        ("phone", &input.phone),
    ];
    for (field, value) in required {
        if value.trim().is_empty() {
            return Err(AppError::Validation(format!(
                "missing required address field '{field}'"
            )));
        }
    }
    if !input.email.contains('@') {
        return Err(AppError::Validation("invalid email address".to_string()));
    }
    Ok(())
}

/// Convert the user's cart into an order.
///
/// One transaction covers address resolution, the order and order-line
/// inserts, and the cart clear; any failure rolls everything back and the
/// cart keeps its lines. Totals and unit prices are snapshotted from the
/// products as they are right now.
pub fn place_order(
    conn: &mut PgConnection,
    user_id: Uuid,
    shipping: ShippingAddress,
) -> Result<Uuid, AppError> {
    conn.transaction::<_, AppError, _>(|conn| {
        let cart = resolve_cart(conn, &Identity::User(user_id))?;

        let lines: Vec<(CartLine, Product)> = cart_lines::table
            .inner_join(crate::schema::products::table)
            .filter(cart_lines::cart_id.eq(cart.id))
            .select((CartLine::as_select(), Product::as_select()))
            .load(conn)?;
        if lines.is_empty() {
            return Err(AppError::Validation("cart is empty".to_string()));
        }

        let address_id = match shipping {
            ShippingAddress::Existing(id) => {
                let found: Option<Uuid> = addresses::table
                    .filter(addresses::id.eq(id))
                    .filter(addresses::user_id.eq(user_id))
                    .select(addresses::id)
                    .first(conn)
                    .optional()?;
                found.ok_or(AppError::NotFound)?
            }
            ShippingAddress::New(input) => {
                validate_address(&input)?;
                let id = Uuid::new_v4();
                diesel::insert_into(addresses::table)
                    .values(&NewAddress {
                        id,
                        user_id,
                        first_name: input.first_name,
                        last_name: input.last_name,
                        email: input.email,
                        address_line_1: input.address_line_1,
                        country: input.country,
                        state: input.state,
                        city: input.city,
                        zipcode: input.zipcode,
                        phone: input.phone,
                    })
                    .execute(conn)?;
                id
            }
        };

        let total: BigDecimal = lines
            .iter()
            .map(|(line, product)| &product.price * BigDecimal::from(line.quantity))
            .sum::<BigDecimal>()
            .with_scale(2);

        let order_id = Uuid::new_v4();
        diesel::insert_into(orders::table)
            .values(&NewOrder {
                id: order_id,
                user_id,
                address_id,
                total_price: total,
                status: "pending".to_string(),
                // No payment gateway behind this; recorded as settled.
                payment_status: "paid".to_string(),
            })
            .execute(conn)?;

        let new_lines: Vec<NewOrderLine> = lines
            .iter()
            .map(|(line, product)| NewOrderLine {
                id: Uuid::new_v4(),
                order_id,
                product_id: line.product_id,
                quantity: line.quantity,
                unit_price: product.price.clone(),
            })
            .collect();
        diesel::insert_into(order_lines::table)
            .values(&new_lines)
            .execute(conn)?;

        // The cart record itself survives for reuse; only its lines go.
        diesel::delete(cart_lines::table.filter(cart_lines::cart_id.eq(cart.id)))
            .execute(conn)?;

        log::debug!(
            "placed order {} for user {} ({} lines)",
            order_id,
            user_id,
            new_lines.len()
        );
        Ok(order_id)
    })
}
