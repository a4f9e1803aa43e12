//! 集成测试公共工具：内存库 + 完整路由

#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use dine_server::core::{BrandingConfig, build_app};
use dine_server::db::DbService;
use dine_server::db::repository::{dining_table, dish, tax_config};
use dine_server::{Config, ServerState};
use http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::Value;
use shared::models::{DishCreate, SettingsUpdate, TaxConfigCreate};
use tower::ServiceExt;

pub const ORIGIN: &str = "https://dine.test";
pub const RECEPTIONIST_PHONE: &str = "9876543210";
pub const ADMIN_PHONE: &str = "9123456780";
pub const CUSTOMER_PHONE: &str = "9000000001";

pub struct TestApp {
    pub state: ServerState,
    pub app: Router,
}

/// 菜单与 T5 桌台
pub struct Seed {
    pub table_id: i64,
    pub salmon: i64,
    pub salad: i64,
    pub fish_and_chips: i64,
}

pub async fn spawn_app() -> TestApp {
    let mut config = Config::default();
    config.environment = "development".into();
    config.public_origin = ORIGIN.into();
    config.branding = BrandingConfig::default();
    config.admin_password_hash = None;

    let db = DbService::in_memory().await.unwrap();
    let state = ServerState::with_pool(config, db.pool);
    state
        .settings
        .update(SettingsUpdate {
            receptionist_phone: Some(RECEPTIONIST_PHONE.into()),
            admin_phones: Some(vec![ADMIN_PHONE.into()]),
            ..Default::default()
        })
        .await
        .unwrap();

    let app = build_app(state.clone());
    TestApp { state, app }
}

impl TestApp {
    pub async fn seed_table_five(&self) -> Seed {
        let pool = &self.state.pool;
        let table = dining_table::create(pool, "T5", ORIGIN).await.unwrap();
        tax_config::create(
            pool,
            TaxConfigCreate {
                name: "GST".into(),
                percentage: 18.0,
                is_active: Some(true),
                sort_order: None,
            },
        )
        .await
        .unwrap();

        let create = |name: &str, price: f64| DishCreate {
            name: name.into(),
            description: String::new(),
            price,
            image_url: String::new(),
            is_spicy: false,
            tags: vec![],
            category_id: None,
        };
        let salmon = dish::create(pool, create("Salmon", 850.0)).await.unwrap();
        let salad = dish::create(pool, create("Salad", 420.0)).await.unwrap();
        let fish = dish::create(pool, create("Fish&Chips", 650.0)).await.unwrap();

        Seed {
            table_id: table.id,
            salmon: salmon.id,
            salad: salad.id,
            fish_and_chips: fish.id,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        TestResponse {
            status,
            headers,
            bytes: bytes.to_vec(),
        }
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> TestResponse {
        self.send(request("GET", uri, token, None)).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Option<Value>) -> TestResponse {
        self.send(request("POST", uri, token, body)).await
    }

    pub async fn put(&self, uri: &str, token: Option<&str>, body: Value) -> TestResponse {
        self.send(request("PUT", uri, token, Some(body))).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> TestResponse {
        self.send(request("DELETE", uri, token, None)).await
    }

    /// OTP 登录，返回令牌 (开发环境响应中带验证码)
    pub async fn login_with_otp(&self, phone: &str) -> String {
        let res = self
            .post(
                "/api/auth/otp/request",
                None,
                Some(serde_json::json!({ "phone": phone })),
            )
            .await;
        assert_eq!(res.status, StatusCode::OK, "{}", res.text());
        let code = res.json()["dev_code"].as_str().unwrap().to_string();

        let res = self
            .post(
                "/api/auth/otp/verify",
                None,
                Some(serde_json::json!({ "phone": phone, "code": code })),
            )
            .await;
        assert_eq!(res.status, StatusCode::OK, "{}", res.text());
        res.json()["token"].as_str().unwrap().to_string()
    }

    /// 顾客下单，返回订单 JSON
    pub async fn place_order(&self, table_id: i64, items: &[(i64, i32)]) -> Value {
        let items: Vec<Value> = items
            .iter()
            .map(|(dish_id, quantity)| serde_json::json!({ "dish_id": dish_id, "quantity": quantity }))
            .collect();
        let res = self
            .post(
                "/api/orders",
                None,
                Some(serde_json::json!({
                    "table_id": table_id,
                    "customer_phone": CUSTOMER_PHONE,
                    "items": items,
                })),
            )
            .await;
        assert_eq!(res.status, StatusCode::OK, "{}", res.text());
        res.json()
    }
}

pub fn request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: http::HeaderMap,
    pub bytes: Vec<u8>,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.bytes).unwrap()
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }

    pub fn header(&self, name: header::HeaderName) -> &str {
        self.headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
    }

    /// 错误响应中的业务错误码
    pub fn error_code(&self) -> u64 {
        self.json()["code"].as_u64().unwrap_or_default()
    }
}
