pub mod admin_service;
pub mod auth_service;
pub mod banner_service;
pub mod cart_service;
pub mod category_service;
pub mod order_service;
pub mod product_service;
pub mod review_service;
