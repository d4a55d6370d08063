//! Wishlist toggling.

use diesel::prelude::*;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::product::Product;
use crate::models::wishlist::NewWishlistEntry;
use crate::schema::{products, wishlist_entries};
use crate::session::Identity;

/// Toggle `product_id` on the identity's wishlist.
///
/// Returns `true` when an entry was added, `false` when an existing entry
/// was removed. Alternates state on every call.
pub fn toggle(
    conn: &mut PgConnection,
    identity: &Identity,
    product_id: Uuid,
) -> Result<bool, AppError> {
    let product_exists: bool =
        diesel::select(diesel::dsl::exists(products::table.find(product_id))).get_result(conn)?;
    if !product_exists {
        return Err(AppError::NotFound);
    }

    let deleted = match *identity {
        Identity::User(id) => diesel::delete(
            wishlist_entries::table
                .filter(wishlist_entries::user_id.eq(id))
                .filter(wishlist_entries::product_id.eq(product_id)),
        )
        .execute(conn)?,
        Identity::Session(token) => diesel::delete(
            wishlist_entries::table
                .filter(wishlist_entries::session_token.eq(token))
                .filter(wishlist_entries::product_id.eq(product_id)),
        )
        .execute(conn)?,
    };
    if deleted > 0 {
        return Ok(false);
    }

    let (user_id, session_token) = match *identity {
        Identity::User(id) => (Some(id), None),
        Identity::Session(token) => (None, Some(token)),
    };
    diesel::insert_into(wishlist_entries::table)
        .values(&NewWishlistEntry {
            id: Uuid::new_v4(),
            user_id,
            session_token,
            product_id,
        })
        .on_conflict_do_nothing()
        .execute(conn)?;
    Ok(true)
}

/// Products currently on the identity's wishlist, oldest first.
pub fn list(conn: &mut PgConnection, identity: &Identity) -> Result<Vec<Product>, AppError> {
    let rows = match *identity {
        Identity::User(id) => wishlist_entries::table
            .inner_join(products::table)
            .filter(wishlist_entries::user_id.eq(id))
            .order(wishlist_entries::created_at.asc())
            .select(Product::as_select())
            .load(conn)?,
        Identity::Session(token) => wishlist_entries::table
            .inner_join(products::table)
            .filter(wishlist_entries::session_token.eq(token))
            .order(wishlist_entries::created_at.asc())
            .select(Product::as_select())
            .load(conn)?,
    };
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::{list, toggle};
    use crate::errors::AppError;
    use crate::session::Identity;
    use crate::store::testutil::{seed_product, setup_db};

    #[tokio::test]
    async fn toggle_alternates_presence() {
        let (_container, pool) = setup_db().await;
        let mut conn = pool.get().expect("conn");
        let product = seed_product(&mut conn, "mug", "10.00");
        let identity = Identity::Session(Uuid::new_v4());

        assert!(toggle(&mut conn, &identity, product).expect("toggle failed"));
        assert_eq!(list(&mut conn, &identity).expect("list failed").len(), 1);

        // Toggling twice is an involution: back to the original state.
        assert!(!toggle(&mut conn, &identity, product).expect("toggle failed"));
        assert!(list(&mut conn, &identity).expect("list failed").is_empty());

        assert!(toggle(&mut conn, &identity, product).expect("toggle failed"));
    }

    #[tokio::test]
    async fn identities_have_separate_wishlists() {
        let (_container, pool) = setup_db().await;
        let mut conn = pool.get().expect("conn");
        let product = seed_product(&mut conn, "mug", "10.00");
        let user = Identity::User(Uuid::new_v4());
        let anon = Identity::Session(Uuid::new_v4());

        toggle(&mut conn, &user, product).expect("toggle failed");

        assert_eq!(list(&mut conn, &user).expect("list failed").len(), 1);
        assert!(list(&mut conn, &anon).expect("list failed").is_empty());
    }

    #[tokio::test]
    async fn unknown_product_is_not_found() {
        let (_container, pool) = setup_db().await;
        let mut conn = pool.get().expect("conn");
        let identity = Identity::Session(Uuid::new_v4());

        let err = toggle(&mut conn, &identity, Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, AppError::NotFound));
    }
}
