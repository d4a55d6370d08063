pub mod addresses;
pub mod cart;
pub mod checkout;
pub mod currency;
pub mod orders;
pub mod products;
pub mod wishlist;
