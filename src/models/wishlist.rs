use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schema::wishlist_entries;

/// Saved-for-later marker. Exactly one of `user_id` / `session_token` is
/// set; unique per (identity, product).
#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = wishlist_entries)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct WishlistEntry {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub session_token: Option<Uuid>,
    pub product_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = wishlist_entries)]
pub struct NewWishlistEntry {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub session_token: Option<Uuid>,
    pub product_id: Uuid,
}
