//! Cart resolution and line mutation.

use bigdecimal::BigDecimal;
use diesel::prelude::*;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::cart::{Cart, CartLine, NewCart, NewCartLine};
use crate::models::product::Product;
use crate::schema::{cart_lines, carts, products};
use crate::session::Identity;

use super::pricing;

/// Cart line action requested by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartAction {
    Add,
    Remove,
    Update,
}

impl std::str::FromStr for CartAction {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "add" => Ok(CartAction::Add),
            "remove" => Ok(CartAction::Remove),
            "update" => Ok(CartAction::Update),
            other => Err(AppError::Validation(format!("invalid action '{other}'"))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CartLineView {
    pub product_id: Uuid,
    pub name: String,
    pub price: BigDecimal,
    pub image_url: String,
    pub quantity: i32,
}

#[derive(Debug, Clone)]
pub struct CartSummary {
    pub total_items: i64,
    pub subtotal: BigDecimal,
    pub lines: Vec<CartLineView>,
}

/// The single cart for `identity`, created lazily on first access.
///
/// Insert-on-conflict-do-nothing followed by a select, so two racing first
/// requests converge on the same row through the partial unique indexes.
pub fn resolve_cart(conn: &mut PgConnection, identity: &Identity) -> Result<Cart, AppError> {
    let (user_id, session_token) = match *identity {
        Identity::User(id) => (Some(id), None),
        Identity::Session(token) => (None, Some(token)),
    };

    diesel::insert_into(carts::table)
        .values(&NewCart {
            id: Uuid::new_v4(),
            user_id,
            session_token,
        })
        .on_conflict_do_nothing()
        .execute(conn)?;

    let cart = match *identity {
        Identity::User(id) => carts::table
            .filter(carts::user_id.eq(id))
            .select(Cart::as_select())
            .first(conn)?,
        Identity::Session(token) => carts::table
            .filter(carts::session_token.eq(token))
            .select(Cart::as_select())
            .first(conn)?,
    };
    Ok(cart)
}

/// Apply one action to the cart's line items and return the fresh summary.
///
/// Runs in a single transaction; validation happens before any write, so a
/// rejected call leaves every line exactly as it was.
pub fn update_cart(
    conn: &mut PgConnection,
    cart_id: Uuid,
    product_id: Uuid,
    action: CartAction,
    quantity: i32,
    rate: &BigDecimal,
) -> Result<CartSummary, AppError> {
    if matches!(action, CartAction::Add | CartAction::Update) && quantity <= 0 {
        return Err(AppError::Validation(
            "quantity must be greater than 0".to_string(),
        ));
    }

    conn.transaction::<_, AppError, _>(|conn| {
        let product_exists: bool =
            diesel::select(diesel::dsl::exists(products::table.find(product_id)))
                .get_result(conn)?;
        if !product_exists {
            return Err(AppError::NotFound);
        }

        match action {
            CartAction::Add => {
                diesel::insert_into(cart_lines::table)
                    .values(&NewCartLine {
                        id: Uuid::new_v4(),
                        cart_id,
                        product_id,
                        quantity,
                    })
                    .on_conflict((cart_lines::cart_id, cart_lines::product_id))
                    .do_update()
                    .set(cart_lines::quantity.eq(cart_lines::quantity + quantity))
                    .execute(conn)?;
            }
            CartAction::Remove => {
                let line: Option<CartLine> = cart_lines::table
                    .filter(cart_lines::cart_id.eq(cart_id))
                    .filter(cart_lines::product_id.eq(product_id))
                    .select(CartLine::as_select())
                    .first(conn)
                    .optional()?;
                if let Some(line) = line {
                    if line.quantity > 1 {
                        diesel::update(cart_lines::table.find(line.id))
                            .set(cart_lines::quantity.eq(line.quantity - 1))
                            .execute(conn)?;
                    } else {
                        // A quantity reaching zero deletes the line.
                        diesel::delete(cart_lines::table.find(line.id)).execute(conn)?;
                    }
                }
            }
            CartAction::Update => {
                diesel::insert_into(cart_lines::table)
                    .values(&NewCartLine {
                        id: Uuid::new_v4(),
                        cart_id,
                        product_id,
                        quantity,
                    })
                    .on_conflict((cart_lines::cart_id, cart_lines::product_id))
                    .do_update()
                    .set(cart_lines::quantity.eq(quantity))
                    .execute(conn)?;
            }
        }

        summary(conn, cart_id, rate)
    })
}

/// Current cart contents with prices converted at `rate`.
///
/// The subtotal is recomputed from the live lines on every call, never
/// cached.
pub fn summary(
    conn: &mut PgConnection,
    cart_id: Uuid,
    rate: &BigDecimal,
) -> Result<CartSummary, AppError> {
    let rows: Vec<(CartLine, Product)> = cart_lines::table
        .inner_join(products::table)
        .filter(cart_lines::cart_id.eq(cart_id))
        .order(cart_lines::created_at.asc())
        .select((CartLine::as_select(), Product::as_select()))
        .load(conn)?;

    let mut subtotal = BigDecimal::from(0);
    let lines: Vec<CartLineView> = rows
        .into_iter()
        .map(|(line, product)| {
            let price = pricing::convert(&product.price, rate);
            subtotal += &price * BigDecimal::from(line.quantity);
            CartLineView {
                product_id: product.id,
                name: product.name,
                price,
                image_url: product.image_url,
                quantity: line.quantity,
            }
        })
        .collect();

    Ok(CartSummary {
        total_items: lines.len() as i64,
        subtotal: subtotal.with_scale(2),
        lines,
    })
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::{resolve_cart, summary, update_cart, CartAction};
    use crate::errors::AppError;
    use crate::session::Identity;
    use crate::store::testutil::{decimal, seed_product, setup_db};

    #[tokio::test]
    async fn resolve_cart_reuses_existing_cart() {
        let (_container, pool) = setup_db().await;
        let mut conn = pool.get().expect("conn");

        let user = Identity::User(Uuid::new_v4());
        let first = resolve_cart(&mut conn, &user).expect("resolve failed");
        let second = resolve_cart(&mut conn, &user).expect("resolve failed");
        assert_eq!(first.id, second.id);

        let anon = Identity::Session(Uuid::new_v4());
        let third = resolve_cart(&mut conn, &anon).expect("resolve failed");
        assert_ne!(first.id, third.id);
        assert_eq!(third.id, resolve_cart(&mut conn, &anon).expect("resolve failed").id);
    }

    #[tokio::test]
    async fn add_accumulates_quantity() {
        let (_container, pool) = setup_db().await;
        let mut conn = pool.get().expect("conn");
        let product = seed_product(&mut conn, "mug", "10.00");
        let cart = resolve_cart(&mut conn, &Identity::Session(Uuid::new_v4())).expect("resolve");
        let rate = decimal("1");

        update_cart(&mut conn, cart.id, product, CartAction::Add, 2, &rate).expect("add failed");
        let after = update_cart(&mut conn, cart.id, product, CartAction::Add, 2, &rate)
            .expect("add failed");

        assert_eq!(after.total_items, 1);
        assert_eq!(after.lines[0].quantity, 4);
        assert_eq!(after.subtotal, decimal("40.00"));
    }

    #[tokio::test]
    async fn two_adds_then_remove_leaves_three() {
        let (_container, pool) = setup_db().await;
        let mut conn = pool.get().expect("conn");
        let product = seed_product(&mut conn, "mug", "10.00");
        let cart = resolve_cart(&mut conn, &Identity::Session(Uuid::new_v4())).expect("resolve");
        let rate = decimal("1");

        update_cart(&mut conn, cart.id, product, CartAction::Add, 2, &rate).expect("add failed");
        update_cart(&mut conn, cart.id, product, CartAction::Add, 2, &rate).expect("add failed");
        let after = update_cart(&mut conn, cart.id, product, CartAction::Remove, 1, &rate)
            .expect("remove failed");

        assert_eq!(after.lines[0].quantity, 3);
    }

    #[tokio::test]
    async fn remove_at_quantity_one_deletes_line() {
        let (_container, pool) = setup_db().await;
        let mut conn = pool.get().expect("conn");
        let product = seed_product(&mut conn, "mug", "10.00");
        let cart = resolve_cart(&mut conn, &Identity::Session(Uuid::new_v4())).expect("resolve");
        let rate = decimal("1");

        update_cart(&mut conn, cart.id, product, CartAction::Add, 1, &rate).expect("add failed");
        let after = update_cart(&mut conn, cart.id, product, CartAction::Remove, 1, &rate)
            .expect("remove failed");

        assert_eq!(after.total_items, 0);
        assert!(after.lines.is_empty());
        assert_eq!(after.subtotal, decimal("0.00"));
    }

    #[tokio::test]
    async fn remove_without_line_is_a_noop() {
        let (_container, pool) = setup_db().await;
        let mut conn = pool.get().expect("conn");
        let product = seed_product(&mut conn, "mug", "10.00");
        let cart = resolve_cart(&mut conn, &Identity::Session(Uuid::new_v4())).expect("resolve");

        let after = update_cart(&mut conn, cart.id, product, CartAction::Remove, 1, &decimal("1"))
            .expect("remove failed");
        assert_eq!(after.total_items, 0);
    }

    #[tokio::test]
    async fn update_sets_quantity_directly() {
        let (_container, pool) = setup_db().await;
        let mut conn = pool.get().expect("conn");
        let product = seed_product(&mut conn, "mug", "10.00");
        let cart = resolve_cart(&mut conn, &Identity::Session(Uuid::new_v4())).expect("resolve");
        let rate = decimal("1");

        update_cart(&mut conn, cart.id, product, CartAction::Add, 5, &rate).expect("add failed");
        let after = update_cart(&mut conn, cart.id, product, CartAction::Update, 2, &rate)
            .expect("update failed");

        assert_eq!(after.lines[0].quantity, 2);
        assert_eq!(after.subtotal, decimal("20.00"));
    }

    #[tokio::test]
    async fn non_positive_quantity_is_rejected_before_mutation() {
        let (_container, pool) = setup_db().await;
        let mut conn = pool.get().expect("conn");
        let product = seed_product(&mut conn, "mug", "10.00");
        let cart = resolve_cart(&mut conn, &Identity::Session(Uuid::new_v4())).expect("resolve");
        let rate = decimal("1");

        update_cart(&mut conn, cart.id, product, CartAction::Add, 3, &rate).expect("add failed");

        let err = update_cart(&mut conn, cart.id, product, CartAction::Update, 0, &rate)
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        let err = update_cart(&mut conn, cart.id, product, CartAction::Add, -1, &rate)
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        // Prior quantity is untouched.
        let current = summary(&mut conn, cart.id, &rate).expect("summary failed");
        assert_eq!(current.lines[0].quantity, 3);
    }

    #[tokio::test]
    async fn unknown_product_is_not_found() {
        let (_container, pool) = setup_db().await;
        let mut conn = pool.get().expect("conn");
        let cart = resolve_cart(&mut conn, &Identity::Session(Uuid::new_v4())).expect("resolve");

        let err = update_cart(
            &mut conn,
            cart.id,
            Uuid::new_v4(),
            CartAction::Add,
            1,
            &decimal("1"),
        )
        .unwrap_err();
        assert!(matches!(err, AppError::NotFound));
    }

    #[tokio::test]
    async fn summary_converts_prices_with_session_rate() {
        let (_container, pool) = setup_db().await;
        let mut conn = pool.get().expect("conn");
        let product = seed_product(&mut conn, "mug", "10.00");
        let cart = resolve_cart(&mut conn, &Identity::Session(Uuid::new_v4())).expect("resolve");

        update_cart(&mut conn, cart.id, product, CartAction::Add, 2, &decimal("1"))
            .expect("add failed");

        let eur = summary(&mut conn, cart.id, &decimal("0.9")).expect("summary failed");
        assert_eq!(eur.lines[0].price, decimal("9.00"));
        assert_eq!(eur.subtotal, decimal("18.00"));

        // Base price in storage is untouched by the conversion.
        let base = summary(&mut conn, cart.id, &decimal("1")).expect("summary failed");
        assert_eq!(base.lines[0].price, decimal("10.00"));
    }

    #[test]
    fn action_parses_known_values_only() {
        assert_eq!("add".parse::<CartAction>().expect("parse"), CartAction::Add);
        assert_eq!(
            "remove".parse::<CartAction>().expect("parse"),
            CartAction::Remove
        );
        assert_eq!(
            "update".parse::<CartAction>().expect("parse"),
            CartAction::Update
        );
        assert!(matches!(
            "destroy".parse::<CartAction>(),
            Err(AppError::Validation(_))
        ));
    }
}
