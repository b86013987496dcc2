use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        admin::{
            AdminProductList, AdminUser, AdminUserList, Dashboard, DashboardStatistics,
            SalesAnalytics, TopProduct, TopProductList,
        },
        auth::{
            AuthResponse, LoginRequest, LogoutRequest, RefreshRequest, RefreshResponse,
            RegisterRequest, UserProfile,
        },
        banners::{BannerList, CreateBannerRequest, UpdateBannerRequest},
        cart::{AddToCartRequest, CartItemData, CartLine, CartProduct, CartSummary, CartView,
            UpdateCartItemRequest},
        categories::{
            CategoryDetail, CategoryList, CategoryProduct, CategoryWithSubs,
            CreateCategoryRequest, CreateSubCategoryRequest, SubCategoryList,
            UpdateCategoryRequest,
        },
        orders::{
            CreateOrderRequest, CustomerInfo, OrderItemRequest, OrderList, OrderWithItems,
            UpdateOrderStatusRequest,
        },
        products::{
            CreateProductRequest, ProductList, SearchResult, SearchResultList,
            UpdateProductRequest,
        },
        reviews::{
            CreateReviewRequest, ReviewData, ReviewList, ReviewWithProduct, ReviewWithUser,
            UpdateReviewRequest, UserReviewList,
        },
    },
    error::ErrorBody,
    models::{
        Banner, BannerStatus, CartItem, Category, Order, OrderItem, OrderStatus, PaymentMethod,
        PaymentStatus, Product, Review, SubCategory, TimelineEntry,
    },
    response::{ApiResponse, Meta},
    routes::{admin, auth, banners, cart, categories, health, orders, products, reviews},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::register,
        auth::login,
        auth::refresh,
        auth::logout,
        auth::me,
        products::list_products,
        products::search_products,
        products::get_product,
        products::create_product,
        products::update_product,
        products::delete_product,
        categories::list_categories,
        categories::get_category,
        categories::create_category,
        categories::update_category,
        categories::delete_category,
        categories::list_sub_categories,
        categories::create_sub_category,
        cart::get_cart,
        cart::add_to_cart,
        cart::update_cart_item,
        cart::remove_cart_item,
        cart::clear_cart,
        orders::create_order,
        orders::list_orders,
        orders::get_order,
        orders::track_order,
        orders::update_order_status,
        orders::cancel_order,
        reviews::create_review,
        reviews::list_product_reviews,
        reviews::list_user_reviews,
        reviews::update_review,
        reviews::delete_review,
        banners::list_banners,
        banners::get_banner,
        banners::create_banner,
        banners::update_banner,
        banners::delete_banner,
        admin::dashboard,
        admin::list_users,
        admin::list_orders,
        admin::list_products,
        admin::sales_analytics,
        admin::top_products,
    ),
    components(
        schemas(
            Product,
            Category,
            SubCategory,
            CartItem,
            Order,
            OrderItem,
            TimelineEntry,
            Review,
            Banner,
            OrderStatus,
            PaymentMethod,
            PaymentStatus,
            BannerStatus,
            RegisterRequest,
            LoginRequest,
            RefreshRequest,
            LogoutRequest,
            UserProfile,
            AuthResponse,
            RefreshResponse,
            CreateProductRequest,
            UpdateProductRequest,
            ProductList,
            SearchResult,
            SearchResultList,
            CreateCategoryRequest,
            UpdateCategoryRequest,
            CreateSubCategoryRequest,
            CategoryWithSubs,
            CategoryList,
            CategoryDetail,
            CategoryProduct,
            SubCategoryList,
            AddToCartRequest,
            UpdateCartItemRequest,
            CartLine,
            CartProduct,
            CartSummary,
            CartView,
            CartItemData,
            CreateOrderRequest,
            OrderItemRequest,
            CustomerInfo,
            UpdateOrderStatusRequest,
            OrderWithItems,
            OrderList,
            CreateReviewRequest,
            UpdateReviewRequest,
            ReviewWithUser,
            ReviewWithProduct,
            ReviewData,
            ReviewList,
            UserReviewList,
            CreateBannerRequest,
            UpdateBannerRequest,
            BannerList,
            DashboardStatistics,
            Dashboard,
            TopProduct,
            TopProductList,
            AdminUser,
            AdminUserList,
            AdminProductList,
            SalesAnalytics,
            Meta,
            ErrorBody,
            ApiResponse<Product>,
            ApiResponse<ProductList>,
            ApiResponse<OrderWithItems>,
            ApiResponse<OrderList>,
            ApiResponse<CartView>,
            ApiResponse<Dashboard>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Authentication endpoints"),
        (name = "Products", description = "Catalog endpoints"),
        (name = "Categories", description = "Category endpoints"),
        (name = "Cart", description = "Cart endpoints"),
        (name = "Orders", description = "Order endpoints"),
        (name = "Reviews", description = "Review endpoints"),
        (name = "Banners", description = "Banner endpoints"),
        (name = "Admin", description = "Admin endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
