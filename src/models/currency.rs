use bigdecimal::BigDecimal;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::schema::currencies;

/// Reference-table row: conversion rate relative to the base currency.
#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = currencies)]
#[diesel(primary_key(code))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Currency {
    pub code: String,
    pub name: String,
    pub conversion_rate: BigDecimal,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = currencies)]
pub struct NewCurrency {
    pub code: String,
    pub name: String,
    pub conversion_rate: BigDecimal,
}
