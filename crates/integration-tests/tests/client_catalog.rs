//! Integration tests for catalog, stock and order endpoints.

#![allow(clippy::unwrap_used)]

use chrono::Utc;
use httpmock::prelude::*;
use serde_json::json;
use stock_dashboard_client::ApiError;
use stock_dashboard_core::stats::{dashboard_stats, low_stock_products};
use stock_dashboard_core::wire::{NewOrder, NewOrderItem, StockUpdate};
use stock_dashboard_core::{MovementKind, OrderStatus, PaymentStatus, ProductId, search};
use stock_dashboard_integration_tests::{BEARER, client_for, orders_json, products_json, session};

// ============================================================================
// Products
// ============================================================================

#[tokio::test]
async fn test_products_are_adapted_from_both_wire_shapes() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/products")
                .query_param("active_only", "true")
                .header("Authorization", BEARER);
            then.status(200).json_body(products_json());
        })
        .await;

    let products = client_for(&server).products(&session(), true).await.unwrap();
    mock.assert_async().await;

    assert_eq!(products.len(), 2);
    assert_eq!(products[0].id.as_str(), "1");
    assert_eq!(products[0].stock_available, 5);
    assert_eq!(products[0].stock_total, 150);
    assert_eq!(products[0].display_name("ar"), "كوكا كولا 33cl");
    assert_eq!(products[1].id.as_str(), "2");
    assert_eq!(products[1].stock_available, 85);
    assert_eq!(products[1].stock_reserved, 15);
    assert_eq!(products[1].price.to_string(), "4.00");

    let stats = dashboard_stats(&products, &[], Utc::now());
    assert_eq!(stats.total_products, 2);
    assert_eq!(stats.total_stock, 250);
    assert_eq!(stats.low_stock_products, 1);
    assert_eq!(low_stock_products(&products)[0].code, "CC33");
}

#[tokio::test]
async fn test_products_include_inactive() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/products")
                .query_param("active_only", "false");
            then.status(200).json_body(json!([]));
        })
        .await;

    let products = client_for(&server).products(&session(), false).await.unwrap();

    assert!(products.is_empty());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_one_odd_product_does_not_hide_the_catalog() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/products");
            then.status(200).json_body(json!([
                {"id": 1, "code": "CC33", "stock_quantity": 150, "stock_total": 1, "available_quantity": 5},
                {"id": 2, "code": "FO33", "name": 33, "is_active": 1, "stock_available": 85},
                {"id": 3, "code": "SP33", "is_active": "maybe", "unit_type": ["can"]}
            ]));
        })
        .await;

    let products = client_for(&server).products(&session(), true).await.unwrap();

    let codes: Vec<_> = products.iter().map(|p| p.code.as_str()).collect();
    assert_eq!(codes, ["CC33", "FO33", "SP33"]);
    assert_eq!(products[0].stock_total, 150);
    assert_eq!(products[1].name, "33");
    assert_eq!(products[1].stock_available, 85);
    assert!(products[2].is_active);
    assert!(products[2].unit_type.is_none());
}

#[tokio::test]
async fn test_missing_available_quantity_means_zero() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/products");
            then.status(200)
                .json_body(json!([{"id": 5, "code": "SP33", "name": "Sprite 33cl"}]));
        })
        .await;

    let products = client_for(&server).products(&session(), true).await.unwrap();

    assert_eq!(products[0].stock_available, 0);
    assert_eq!(products[0].stock_total, 0);
}

#[tokio::test]
async fn test_product_not_found_surfaces_detail() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/products/99");
            then.status(404).json_body(json!({"detail": "Produit non trouvé"}));
        })
        .await;

    let err = client_for(&server)
        .product(&session(), &ProductId::from(99))
        .await
        .unwrap_err();

    assert!(matches!(&err, ApiError::NotFound(message) if message == "Produit non trouvé"));
}

#[tokio::test]
async fn test_search_products_sends_term_and_language() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/products/search/coca")
                .query_param("language", "fr");
            then.status(200).json_body(products_json());
        })
        .await;

    let products = client_for(&server)
        .search_products(&session(), "coca")
        .await
        .unwrap();

    assert_eq!(products.len(), 2);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_local_search_over_fetched_products() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/products");
            then.status(200).json_body(products_json());
        })
        .await;

    let products = client_for(&server).products(&session(), true).await.unwrap();

    let by_name = search::filter(&products, "FANTA");
    assert_eq!(by_name.len(), 1);
    assert_eq!(by_name[0].code, "FO33");
    assert_eq!(search::filter(&products, "33").len(), 2);
    assert_eq!(search::filter(&products, "").len(), 2);
}

// ============================================================================
// Stock
// ============================================================================

#[tokio::test]
async fn test_check_stock() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/stock/check/1")
                .query_param("language", "fr")
                .header("Authorization", BEARER);
            then.status(200).json_body(json!({
                "product_id": 1,
                "available": true,
                "quantity": 5,
                "product_name": "Coca-Cola 33cl"
            }));
        })
        .await;

    let check = client_for(&server)
        .check_stock(&session(), &ProductId::from(1))
        .await
        .unwrap();

    assert!(check.available);
    assert_eq!(check.quantity, 5);
    assert_eq!(check.product_name_local, None);
}

#[tokio::test]
async fn test_update_stock_sends_body() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(PUT)
                .path("/api/stock/1")
                .json_body(json!({"quantity": 200, "notes": "livraison"}));
            then.status(200).json_body(json!({"message": "Stock mis à jour"}));
        })
        .await;

    let update = StockUpdate {
        quantity: 200,
        reserved_quantity: None,
        notes: Some("livraison".to_string()),
    };
    client_for(&server)
        .update_stock(&session(), &ProductId::from(1), &update)
        .await
        .unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn test_update_stock_rejected() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(PUT).path("/api/stock/1");
            then.status(400)
                .json_body(json!({"detail": "La quantité ne peut pas être négative"}));
        })
        .await;

    let update = StockUpdate {
        quantity: -1,
        reserved_quantity: None,
        notes: None,
    };
    let err = client_for(&server)
        .update_stock(&session(), &ProductId::from(1), &update)
        .await
        .unwrap_err();

    assert!(matches!(
        &err,
        ApiError::Server { status: 400, message } if message.contains("négative")
    ));
}

#[tokio::test]
async fn test_stock_movements_for_one_product() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/stock/movements")
                .query_param("product_id", "1");
            then.status(200).json_body(json!([
                {
                    "id": 1,
                    "product_id": 1,
                    "product": {"id": 1, "code": "CC33", "name": "Coca-Cola 33cl"},
                    "movement_type": "in",
                    "quantity": 120,
                    "reason": "Livraison fournisseur",
                    "created_at": "2024-03-01T08:30:00"
                },
                {
                    "id": 2,
                    "product_id": 1,
                    "movement_type": "out",
                    "quantity": 24,
                    "notes": "Commande CMD-2024-001"
                }
            ]));
        })
        .await;

    let movements = client_for(&server)
        .stock_movements(&session(), Some(&ProductId::from(1)))
        .await
        .unwrap();
    mock.assert_async().await;

    assert_eq!(movements.len(), 2);
    assert_eq!(movements[0].kind, MovementKind::In);
    assert_eq!(movements[0].product_name.as_deref(), Some("Coca-Cola 33cl"));
    assert!(movements[0].created_at.is_some());
    assert_eq!(movements[1].kind, MovementKind::Out);
    assert_eq!(movements[1].reason, "Commande CMD-2024-001");
}

// ============================================================================
// Orders
// ============================================================================

#[tokio::test]
async fn test_all_orders_with_limit() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/orders/all")
                .query_param("limit", "50")
                .header("Authorization", BEARER);
            then.status(200).json_body(orders_json(Utc::now()));
        })
        .await;

    let orders = client_for(&server).all_orders(&session(), 50).await.unwrap();
    mock.assert_async().await;

    assert_eq!(orders.len(), 2);
    assert_eq!(orders[0].total.to_string(), "240.00");
    assert_eq!(orders[0].status, OrderStatus::Confirmed);
    assert_eq!(orders[0].payment_status, PaymentStatus::Paid);
    assert_eq!(orders[0].items.len(), 1);
    assert_eq!(orders[0].unit_count(), 24);
    // `total` is accepted when `total_amount` is absent
    assert_eq!(orders[1].total.to_string(), "89.50");
    assert_eq!(orders[1].customer_name, None);

    let stats = dashboard_stats(&[], &orders, Utc::now());
    assert_eq!(stats.recent_orders, 1);

    assert_eq!(search::filter(&orders, "0687").len(), 1);
    assert_eq!(search::filter(&orders, "idrissi").len(), 1);
    assert_eq!(search::filter(&orders, "cmd-2024").len(), 2);
}

#[tokio::test]
async fn test_customer_orders() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/orders/0612345678")
                .query_param("limit", "10");
            then.status(200).json_body(json!([]));
        })
        .await;

    let orders = client_for(&server)
        .customer_orders(&session(), "0612345678", 10)
        .await
        .unwrap();

    assert!(orders.is_empty());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_create_order() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/orders")
                .header("Authorization", BEARER)
                .json_body(json!({
                    "customer_phone": "0612345678",
                    "customer_name": "Hanane El Idrissi",
                    "language": "fr",
                    "items": [{"product_id": 1, "quantity": 24}]
                }));
            then.status(201).json_body(json!({
                "id": 12,
                "order_number": "CMD-2024-003",
                "customer_phone": "0612345678",
                "customer_name": "Hanane El Idrissi",
                "total_amount": 108,
                "status": "pending",
                "payment_status": "pending",
                "items": [
                    {"product_id": 1, "quantity": 24, "unit_price": 4.5, "total_price": 108}
                ]
            }));
        })
        .await;

    let new_order = NewOrder {
        customer_phone: "0612345678".to_string(),
        customer_name: Some("Hanane El Idrissi".to_string()),
        customer_address: None,
        language: "fr".to_string(),
        items: vec![NewOrderItem {
            product_id: 1,
            quantity: 24,
        }],
        notes: None,
    };
    let order = client_for(&server)
        .create_order(&session(), &new_order)
        .await
        .unwrap();
    mock.assert_async().await;

    assert_eq!(order.reference(), "CMD-2024-003");
    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.items_total(), order.total);
}

#[tokio::test]
async fn test_malformed_body_is_a_parse_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/orders/all");
            then.status(200).json_body(json!({"orders": []}));
        })
        .await;

    let err = client_for(&server).all_orders(&session(), 50).await.unwrap_err();
    assert!(matches!(err, ApiError::Parse(_)));
}
