pub mod audit_logs;
pub mod banners;
pub mod cart_items;
pub mod categories;
pub mod order_items;
pub mod order_timeline;
pub mod orders;
pub mod products;
pub mod reviews;
pub mod sub_categories;
pub mod users;

pub use audit_logs::Entity as AuditLogs;
pub use banners::Entity as Banners;
pub use cart_items::Entity as CartItems;
pub use categories::Entity as Categories;
pub use order_items::Entity as OrderItems;
pub use order_timeline::Entity as OrderTimeline;
pub use orders::Entity as Orders;
pub use products::Entity as Products;
pub use reviews::Entity as Reviews;
pub use sub_categories::Entity as SubCategories;
pub use users::Entity as Users;
