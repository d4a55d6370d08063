//! Session-persisted currency selection.

use std::str::FromStr;

use bigdecimal::BigDecimal;
use diesel::prelude::*;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::currency::Currency;
use crate::models::session::NewSession;
use crate::schema::{currencies, sessions};

/// Select `code` as the session currency.
///
/// Persists the code, display name and stringified conversion rate on the
/// session row, creating the row on first use. Unknown codes are rejected
/// before anything is written.
pub fn change_currency(
    conn: &mut PgConnection,
    token: Uuid,
    code: &str,
) -> Result<Currency, AppError> {
    let currency = currencies::table
        .find(code)
        .select(Currency::as_select())
        .first(conn)
        .optional()?
        .ok_or(AppError::NotFound)?;

    diesel::insert_into(sessions::table)
        .values(&NewSession {
            token,
            currency_code: Some(currency.code.clone()),
            currency_name: Some(currency.name.clone()),
            conversion_rate: Some(currency.conversion_rate.to_string()),
        })
        .on_conflict(sessions::token)
        .do_update()
        .set((
            sessions::currency_code.eq(currency.code.clone()),
            sessions::currency_name.eq(currency.name.clone()),
            sessions::conversion_rate.eq(currency.conversion_rate.to_string()),
        ))
        .execute(conn)?;

    Ok(currency)
}

/// Conversion rate selected by this session, or the base rate 1 when the
/// session has not picked a currency.
pub fn conversion_rate(conn: &mut PgConnection, token: Uuid) -> Result<BigDecimal, AppError> {
    let stored: Option<Option<String>> = sessions::table
        .find(token)
        .select(sessions::conversion_rate)
        .first(conn)
        .optional()?;

    match stored.flatten() {
        Some(raw) => BigDecimal::from_str(&raw)
            .map_err(|e| AppError::Internal(format!("corrupt conversion rate '{raw}': {e}"))),
        None => Ok(BigDecimal::from(1)),
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::{change_currency, conversion_rate};
    use crate::errors::AppError;
    use crate::store::testutil::{decimal, seed_currency, setup_db};

    #[tokio::test]
    async fn defaults_to_base_rate_without_selection() {
        let (_container, pool) = setup_db().await;
        let mut conn = pool.get().expect("conn");

        let rate = conversion_rate(&mut conn, Uuid::new_v4()).expect("rate failed");
        assert_eq!(rate, decimal("1"));
    }

    #[tokio::test]
    async fn selection_persists_currency_fields() {
        let (_container, pool) = setup_db().await;
        let mut conn = pool.get().expect("conn");
        seed_currency(&mut conn, "EUR", "Euro", "0.9");
        let token = Uuid::new_v4();

        let currency = change_currency(&mut conn, token, "EUR").expect("change failed");
        assert_eq!(currency.name, "Euro");

        let rate = conversion_rate(&mut conn, token).expect("rate failed");
        assert_eq!(rate, decimal("0.9"));
    }

    #[tokio::test]
    async fn reselection_overwrites_previous_choice() {
        let (_container, pool) = setup_db().await;
        let mut conn = pool.get().expect("conn");
        seed_currency(&mut conn, "EUR", "Euro", "0.9");
        seed_currency(&mut conn, "GBP", "Pound Sterling", "0.8");
        let token = Uuid::new_v4();

        change_currency(&mut conn, token, "EUR").expect("change failed");
        change_currency(&mut conn, token, "GBP").expect("change failed");

        let rate = conversion_rate(&mut conn, token).expect("rate failed");
        assert_eq!(rate, decimal("0.8"));
    }

    #[tokio::test]
    async fn unknown_code_is_not_found() {
        let (_container, pool) = setup_db().await;
        let mut conn = pool.get().expect("conn");

        let err = change_currency(&mut conn, Uuid::new_v4(), "XXX").unwrap_err();
        assert!(matches!(err, AppError::NotFound));
    }
}
