use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schema::sessions;

/// Server-side session state keyed by the anonymous session token.
///
/// The conversion rate is stored stringified, exactly as it is handed back
/// to clients; it is parsed on read.
#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = sessions)]
#[diesel(primary_key(token))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Session {
    pub token: Uuid,
    pub currency_code: Option<String>,
    pub currency_name: Option<String>,
    pub conversion_rate: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = sessions)]
pub struct NewSession {
    pub token: Uuid,
    pub currency_code: Option<String>,
    pub currency_name: Option<String>,
    pub conversion_rate: Option<String>,
}
