pub mod admin;
pub mod auth;
pub mod banners;
pub mod cart;
pub mod categories;
pub mod orders;
pub mod products;
pub mod reviews;
