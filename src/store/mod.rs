//! Core storefront operations.
//!
//! Synchronous functions over `&mut PgConnection`; handlers run them on the
//! actix blocking pool. Anything multi-step mutating runs inside a single
//! Diesel transaction.

pub mod carts;
pub mod checkout;
pub mod pricing;
pub mod sessions;
pub mod wishlists;

#[cfg(test)]
pub(crate) mod testutil;
