//! Shopping rules the storefront and the API must agree on: store opening
//! hours and cart arithmetic/revalidation.

pub mod cart;
pub mod hours;
