//! 端到端：顾客下单 → 前台登录 → 预览 / 审批整桌账单 → 下载发票

mod common;

use common::*;
use http::{StatusCode, header};
use serde_json::json;

#[tokio::test]
async fn test_health() {
    let app = spawn_app().await;
    let res = app.get("/health", None).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.json()["status"], "ok");
}

#[tokio::test]
async fn test_staff_routes_require_token() {
    let app = spawn_app().await;

    let res = app.get("/api/orders", None).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);

    let res = app.get("/api/bills/tables/1/preview", Some("not-a-jwt")).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_public_menu_and_qr_resolution() {
    let app = spawn_app().await;
    let seed = app.seed_table_five().await;

    let res = app.get("/api/menu/dishes", None).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.json().as_array().unwrap().len(), 3);

    let payload = format!("{ORIGIN}/customer?table={}", seed.table_id);
    let res = app
        .get(&format!("/api/tables/resolve?payload={}", payload.replace('?', "%3F").replace('=', "%3D")), None)
        .await;
    assert_eq!(res.status, StatusCode::OK, "{}", res.text());
    assert_eq!(res.json()["number"], "T5");

    let res = app
        .get("/api/tables/resolve?payload=https%3A%2F%2Fevil.test%2Fcustomer%3Ftable%3D1", None)
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_otp_rejected_for_unknown_phone() {
    let app = spawn_app().await;
    let res = app
        .post("/api/auth/otp/request", None, Some(json!({ "phone": "9555555555" })))
        .await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_table_five_bill_flow() {
    let app = spawn_app().await;
    let seed = app.seed_table_five().await;

    let order_a = app.place_order(seed.table_id, &[(seed.salmon, 2)]).await;
    let order_b = app
        .place_order(seed.table_id, &[(seed.salad, 1), (seed.fish_and_chips, 3)])
        .await;
    assert_eq!(order_a["total_amount"], 1700.0);
    assert_eq!(order_a["tax_amount"], 0.0);
    assert_eq!(order_a["status"], "pending");
    assert_eq!(order_b["total_amount"], 2370.0);

    let res = app
        .get(&format!("/api/orders/mine?phone={CUSTOMER_PHONE}"), None)
        .await;
    assert_eq!(res.json().as_array().unwrap().len(), 2);

    let token = app.login_with_otp(RECEPTIONIST_PHONE).await;

    let res = app
        .get(&format!("/api/bills/tables/{}/preview", seed.table_id), Some(&token))
        .await;
    assert_eq!(res.status, StatusCode::OK, "{}", res.text());
    let preview = res.json();
    assert_eq!(preview["subtotal"], 4070.0);
    assert_eq!(preview["total_tax"], 732.6);
    assert_eq!(preview["final_amount"], 4802.6);

    let res = app
        .post(&format!("/api/bills/tables/{}/approve", seed.table_id), Some(&token), None)
        .await;
    assert_eq!(res.status, StatusCode::OK, "{}", res.text());
    let bill = res.json();
    assert_eq!(bill["final_amount"], 4802.6);
    assert_eq!(bill["approved_by"], RECEPTIONIST_PHONE);
    assert_eq!(bill["order_ids"].as_array().unwrap().len(), 2);

    let order_id = order_a["id"].as_i64().unwrap();
    let res = app.get(&format!("/api/orders/{order_id}"), Some(&token)).await;
    let approved = res.json();
    assert_eq!(approved["status"], "approved");
    assert_eq!(approved["bill_amount"], 4070.0);
    assert_eq!(approved["final_amount"], 4802.6);

    // 已全部审批，再次审批无待审批订单
    let res = app
        .post(&format!("/api/bills/tables/{}/approve", seed.table_id), Some(&token), None)
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);

    let res = app.get(&format!("/api/bill?orderId={order_id}"), None).await;
    assert_eq!(res.status, StatusCode::OK, "{}", res.text());
    assert_eq!(res.header(header::CONTENT_TYPE), "application/pdf");
    let disposition = res.header(header::CONTENT_DISPOSITION);
    assert!(disposition.starts_with("attachment; filename=\"SeaTaleRestaurant_Bill_T5_"));
    assert!(disposition.ends_with(".pdf\""));
    assert!(res.bytes.starts_with(b"%PDF"));

    let res = app
        .get(&format!("/api/bill?orderId={order_id}&variant=gst"), None)
        .await;
    assert!(res
        .header(header::CONTENT_DISPOSITION)
        .contains("SeaTaleRestaurant_GST_Invoice_TT5_"));

    let res = app
        .post(&format!("/api/orders/{order_id}/complete"), Some(&token), None)
        .await;
    assert_eq!(res.status, StatusCode::OK, "{}", res.text());
    assert_eq!(res.json()["status"], "completed");
}

#[tokio::test]
async fn test_remove_line_item_over_http() {
    let app = spawn_app().await;
    let seed = app.seed_table_five().await;
    let order = app
        .place_order(seed.table_id, &[(seed.salad, 1), (seed.fish_and_chips, 3)])
        .await;
    let id = order["id"].as_i64().unwrap();
    let token = app.login_with_otp(RECEPTIONIST_PHONE).await;

    let res = app.delete(&format!("/api/orders/{id}/items/1"), Some(&token)).await;
    assert_eq!(res.status, StatusCode::OK, "{}", res.text());
    assert_eq!(res.json()["total_amount"], 420.0);

    let res = app.delete(&format!("/api/orders/{id}/items/0"), Some(&token)).await;
    assert_eq!(res.json()["total_amount"], 0.0);
    assert_eq!(res.json()["items"].as_array().unwrap().len(), 0);

    let res = app.delete(&format!("/api/orders/{id}/items/0"), Some(&token)).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_remove_item_rejected_after_approval() {
    let app = spawn_app().await;
    let seed = app.seed_table_five().await;
    let order = app.place_order(seed.table_id, &[(seed.salmon, 2)]).await;
    let id = order["id"].as_i64().unwrap();
    let token = app.login_with_otp(RECEPTIONIST_PHONE).await;

    let res = app
        .post(&format!("/api/bills/tables/{}/approve", seed.table_id), Some(&token), None)
        .await;
    assert_eq!(res.status, StatusCode::OK);

    let res = app.delete(&format!("/api/orders/{id}/items/0"), Some(&token)).await;
    assert_eq!(res.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_subset_approval_with_approved_member_conflicts() {
    let app = spawn_app().await;
    let seed = app.seed_table_five().await;
    let first = app.place_order(seed.table_id, &[(seed.salmon, 2)]).await;
    let first_id = first["id"].as_i64().unwrap();
    let token = app.login_with_otp(RECEPTIONIST_PHONE).await;
    let approve_uri = format!("/api/bills/tables/{}/approve", seed.table_id);

    let res = app.post(&approve_uri, Some(&token), None).await;
    assert_eq!(res.status, StatusCode::OK);

    let second = app.place_order(seed.table_id, &[(seed.salad, 1)]).await;
    let second_id = second["id"].as_i64().unwrap();

    let res = app
        .post(
            &approve_uri,
            Some(&token),
            Some(json!({ "order_ids": [first_id, second_id] })),
        )
        .await;
    assert_eq!(res.status, StatusCode::CONFLICT);
    assert_eq!(res.error_code(), 4009);

    let res = app.get(&format!("/api/orders/{second_id}"), Some(&token)).await;
    assert_eq!(res.json()["status"], "pending");
}

#[tokio::test]
async fn test_invoice_request_errors() {
    let app = spawn_app().await;

    let res = app.get("/api/bill", None).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);

    let res = app.get("/api/bill?orderId=abc", None).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);

    let res = app.get("/api/bill?orderId=424242", None).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_receptionist_cannot_manage_settings() {
    let app = spawn_app().await;
    let token = app.login_with_otp(RECEPTIONIST_PHONE).await;

    let res = app.get("/api/settings", Some(&token)).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.json()["receptionist_phone"], RECEPTIONIST_PHONE);

    let res = app
        .put("/api/settings", Some(&token), json!({ "gstin": "29ABCDE1234F1Z5" }))
        .await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);

    let admin = app.login_with_otp(ADMIN_PHONE).await;
    let res = app
        .put("/api/settings", Some(&admin), json!({ "restaurant_phone": "08012345678" }))
        .await;
    assert_eq!(res.status, StatusCode::OK, "{}", res.text());
    assert_eq!(res.json()["restaurant_phone"], "08012345678");
}

#[tokio::test]
async fn test_logout_revokes_session() {
    let app = spawn_app().await;
    let token = app.login_with_otp(RECEPTIONIST_PHONE).await;

    let res = app.get("/api/auth/me", Some(&token)).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.json()["role"], "receptionist");

    let res = app.post("/api/auth/logout", Some(&token), None).await;
    assert_eq!(res.status, StatusCode::OK);

    let res = app.get("/api/auth/me", Some(&token)).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_table_with_orders_cannot_be_deleted() {
    let app = spawn_app().await;
    let seed = app.seed_table_five().await;
    app.place_order(seed.table_id, &[(seed.salmon, 1)]).await;
    let admin = app.login_with_otp(ADMIN_PHONE).await;

    let res = app
        .delete(&format!("/api/tables/{}", seed.table_id), Some(&admin))
        .await;
    assert_eq!(res.status, StatusCode::CONFLICT);

    let res = app
        .post("/api/tables", Some(&admin), Some(json!({ "number": "T6" })))
        .await;
    assert_eq!(res.status, StatusCode::OK, "{}", res.text());
    let table = res.json();
    let id = table["id"].as_i64().unwrap();
    assert_eq!(
        table["qr_payload"],
        format!("{ORIGIN}/customer?table={id}")
    );

    let res = app.delete(&format!("/api/tables/{id}"), Some(&admin)).await;
    assert_eq!(res.status, StatusCode::OK);
}
