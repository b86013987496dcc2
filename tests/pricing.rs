use axum_storefront_api::models::{OrderStatus, PaymentMethod};
use axum_storefront_api::pricing::{
    FLAT_SHIPPING_FEE, aggregate_rating, order_total, shipping_fee,
};
use axum_storefront_api::response::Meta;
use axum_storefront_api::routes::params::{Pagination, ProductSort};
use axum_storefront_api::validation::{is_valid_email, missing_fields};

#[test]
fn shipping_is_free_only_above_threshold() {
    assert_eq!(shipping_fee(499_999), FLAT_SHIPPING_FEE);
    assert_eq!(shipping_fee(500_000), FLAT_SHIPPING_FEE);
    assert_eq!(shipping_fee(500_001), 0);
}

#[test]
fn order_total_is_subtotal_plus_fee() {
    // Two items at 100_000 and 450_000 clear the free-shipping threshold.
    let (fee, total) = order_total(550_000);
    assert_eq!(fee, 0);
    assert_eq!(total, 550_000);

    let (fee, total) = order_total(120_000);
    assert_eq!(fee, FLAT_SHIPPING_FEE);
    assert_eq!(total, 150_000);
}

#[test]
fn rating_rounds_to_one_decimal() {
    assert_eq!(aggregate_rating(&[4, 5]), (4.5, 2));
    assert_eq!(aggregate_rating(&[3, 4, 4]), (3.7, 3));
    assert_eq!(aggregate_rating(&[5]), (5.0, 1));
}

#[test]
fn empty_ratings_reset_to_zero() {
    assert_eq!(aggregate_rating(&[]), (0.0, 0));
}

#[test]
fn order_status_round_trips_and_rejects_unknown() {
    for status in [
        OrderStatus::Pending,
        OrderStatus::Confirmed,
        OrderStatus::Shipping,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ] {
        assert_eq!(OrderStatus::parse(status.as_str()), Some(status));
    }
    assert_eq!(OrderStatus::parse("paid"), None);
    assert_eq!(OrderStatus::parse(""), None);
}

#[test]
fn only_pending_orders_can_be_cancelled() {
    assert!(OrderStatus::Pending.can_cancel());
    assert!(!OrderStatus::Confirmed.can_cancel());
    assert!(!OrderStatus::Shipping.can_cancel());
    assert!(!OrderStatus::Delivered.can_cancel());
    assert!(!OrderStatus::Cancelled.can_cancel());
}

#[test]
fn payment_method_parses_known_values() {
    assert_eq!(PaymentMethod::parse("cod"), Some(PaymentMethod::Cod));
    assert_eq!(PaymentMethod::parse("transfer"), Some(PaymentMethod::Transfer));
    assert_eq!(PaymentMethod::parse("card"), Some(PaymentMethod::Card));
    assert_eq!(PaymentMethod::parse("paypal"), None);
}

#[test]
fn pagination_clamps_page_and_limit() {
    let p = Pagination {
        page: Some(0),
        limit: Some(1000),
    };
    assert_eq!(p.normalize(), (1, 100, 0));

    let p = Pagination {
        page: Some(3),
        limit: Some(10),
    };
    assert_eq!(p.normalize(), (3, 10, 20));

    let p = Pagination {
        page: None,
        limit: None,
    };
    assert_eq!(p.normalize(), (1, 20, 0));
}

#[test]
fn paged_meta_computes_pages_and_has_more() {
    let meta = Meta::paged(1, 20, 45);
    assert_eq!(meta.total_pages, Some(3));
    assert_eq!(meta.has_more, Some(true));

    let meta = Meta::paged(3, 20, 45);
    assert_eq!(meta.has_more, Some(false));

    let meta = Meta::paged(1, 20, 0);
    assert_eq!(meta.total_pages, Some(0));
    assert_eq!(meta.has_more, Some(false));
}

#[test]
fn email_validation_rejects_malformed_addresses() {
    assert!(is_valid_email("user@example.com"));
    assert!(!is_valid_email("user@example"));
    assert!(!is_valid_email("user example@foo.com"));
    assert!(!is_valid_email("@example.com"));
    assert!(!is_valid_email("plainaddress"));
}

#[test]
fn missing_fields_reports_blank_and_absent() {
    let missing = missing_fields(&[
        ("name", Some("Alice")),
        ("email", Some("  ")),
        ("phone", None),
    ]);
    assert_eq!(missing, Some(vec!["email", "phone"]));

    assert!(missing_fields(&[("name", Some("Alice"))]).is_none());
}

#[test]
fn product_sort_parses_query_spelling() {
    assert_eq!(ProductSort::parse("price-asc"), Some(ProductSort::PriceAsc));
    assert_eq!(ProductSort::parse("price-desc"), Some(ProductSort::PriceDesc));
    assert_eq!(ProductSort::parse("rating"), Some(ProductSort::Rating));
    assert_eq!(ProductSort::parse("newest"), Some(ProductSort::Newest));
    assert_eq!(ProductSort::parse("best-seller"), Some(ProductSort::BestSeller));
    assert_eq!(ProductSort::parse("price"), None);
}
