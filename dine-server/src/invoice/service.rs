//! 发票服务
//!
//! 加载订单所需的全部数据并渲染 PDF：
//! - 订单属于已审批账单时，列出该账单所有订单的菜品，金额使用账单冻结值
//! - 否则按当前生效税率对该订单单独做临时计算

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use chrono_tz::Tz;
use shared::models::Order;
use sqlx::SqlitePool;

use super::renderer::{InvoiceData, InvoiceLine, InvoiceRenderer};
use crate::billing::estimate_order_bill;
use crate::billing::money::{line_total, to_decimal};
use crate::core::BrandingConfig;
use crate::db::repository::{dining_table, order, table_bill, tax_config};
use crate::settings::SettingsService;
use crate::utils::{AppError, AppResult, ErrorCode};

/// 发票文件名样式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InvoiceVariant {
    /// `<brand>_Bill_<table>_<YYYY-MM-DD>.pdf`
    #[default]
    Bill,
    /// `<brand>_GST_Invoice_T<table>_<YYYY-MM-DDTHH-MM-SS>.pdf`
    Gst,
}

impl InvoiceVariant {
    /// 解析查询参数 `variant`，未知值按普通账单处理
    pub fn from_query(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_ascii_lowercase()) {
            Some(v) if v == "gst" => Self::Gst,
            _ => Self::Bill,
        }
    }
}

/// 渲染结果
#[derive(Debug, Clone)]
pub struct RenderedInvoice {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// 发票文件名，品牌名去除空白
pub fn invoice_filename(
    brand_name: &str,
    table_number: &str,
    variant: InvoiceVariant,
    at: DateTime<Tz>,
) -> String {
    let brand: String = brand_name.chars().filter(|c| !c.is_whitespace()).collect();
    match variant {
        InvoiceVariant::Bill => format!(
            "{brand}_Bill_{table_number}_{}.pdf",
            at.format("%Y-%m-%d")
        ),
        InvoiceVariant::Gst => format!(
            "{brand}_GST_Invoice_T{table_number}_{}.pdf",
            at.format("%Y-%m-%dT%H-%M-%S")
        ),
    }
}

#[derive(Clone)]
pub struct InvoiceService {
    pool: SqlitePool,
    settings: Arc<dyn SettingsService>,
    branding: BrandingConfig,
    renderer: Arc<InvoiceRenderer>,
}

impl InvoiceService {
    pub fn new(
        pool: SqlitePool,
        settings: Arc<dyn SettingsService>,
        branding: BrandingConfig,
    ) -> Self {
        let renderer = Arc::new(InvoiceRenderer::new(branding.clone()));
        Self {
            pool,
            settings,
            branding,
            renderer,
        }
    }

    /// 生成订单发票
    ///
    /// 订单或桌台不存在返回 404 类错误；渲染失败返回 `InvoiceRenderFailed`。
    pub async fn render_order_invoice(
        &self,
        order_id: i64,
        variant: InvoiceVariant,
    ) -> AppResult<RenderedInvoice> {
        let now = Utc::now().with_timezone(&self.branding.timezone);
        let data = self.load_invoice_data(order_id, now).await?;

        let bytes = self.renderer.render(&data).map_err(|e| {
            tracing::error!(order_id, error = %e, "Invoice rendering failed");
            AppError::with_message(
                ErrorCode::InvoiceRenderFailed,
                format!("Failed to render invoice for order {order_id}"),
            )
            .with_detail("order_id", order_id)
        })?;

        let filename = invoice_filename(
            &self.branding.brand_name,
            &data.table_number,
            variant,
            now,
        );
        tracing::info!(order_id, filename = %filename, bytes = bytes.len(), "Invoice rendered");
        Ok(RenderedInvoice { filename, bytes })
    }

    /// 装配发票数据
    pub async fn load_invoice_data(
        &self,
        order_id: i64,
        now: DateTime<Tz>,
    ) -> AppResult<InvoiceData> {
        let current = order::find_by_id(&self.pool, order_id)
            .await?
            .ok_or_else(|| AppError::order_not_found(order_id))?;

        let table = dining_table::find_by_id(&self.pool, current.table_id)
            .await?
            .ok_or_else(|| AppError::table_not_found(current.table_id))?;

        let settings = self.settings.get().await?;

        let bill = match current.bill_id {
            Some(bill_id) => table_bill::find_by_id(&self.pool, bill_id).await?,
            None => None,
        };

        let (lines, subtotal, taxes, total_tax, final_amount) = match &bill {
            Some(bill) => {
                let orders = order::find_by_bill(&self.pool, bill.id).await?;
                (
                    invoice_lines(&orders),
                    to_decimal(bill.subtotal),
                    bill.breakdown.clone(),
                    to_decimal(bill.total_tax),
                    to_decimal(bill.final_amount),
                )
            }
            None => {
                let taxes = tax_config::find_active(&self.pool).await?;
                let estimate = estimate_order_bill(&current, &taxes).map_err(AppError::from)?;
                (
                    invoice_lines(std::slice::from_ref(&current)),
                    estimate.subtotal,
                    estimate.breakdown,
                    estimate.total_tax,
                    estimate.final_amount,
                )
            }
        };

        let ordered_at = self
            .branding
            .timezone
            .timestamp_millis_opt(current.created_at)
            .single()
            .unwrap_or(now);

        Ok(InvoiceData {
            order_id: current.id,
            bill_id: bill.map(|b| b.id),
            table_number: table.number,
            customer_phone: current.customer_phone,
            status: current.status,
            ordered_at,
            generated_at: now,
            restaurant_phone: settings.restaurant_phone,
            gstin: settings.gstin,
            lines,
            subtotal,
            taxes,
            total_tax,
            final_amount,
        })
    }
}

fn invoice_lines(orders: &[Order]) -> Vec<InvoiceLine> {
    orders
        .iter()
        .flat_map(|o| o.items.iter())
        .map(|item| InvoiceLine {
            name: item.dish_name.clone(),
            quantity: item.quantity,
            rate: to_decimal(item.dish_price),
            amount: line_total(item),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::billing::BillingService;
    use crate::db::DbService;
    use crate::db::retry::RetryPolicy;
    use crate::realtime::OrderStatusHub;
    use crate::settings::MemorySettingsService;
    use rust_decimal::Decimal;
    use shared::models::{
        LineItem, OrderStatus, RestaurantSettings, TaxConfigCreate,
    };
    use tokio_util::sync::CancellationToken;

    fn kolkata(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Tz> {
        chrono_tz::Asia::Kolkata
            .with_ymd_and_hms(y, m, d, h, min, s)
            .unwrap()
    }

    #[test]
    fn test_filenames() {
        let at = kolkata(2025, 1, 22, 19, 5, 9);
        assert_eq!(
            invoice_filename("Sea Tale Restaurant", "T5", InvoiceVariant::Bill, at),
            "SeaTaleRestaurant_Bill_T5_2025-01-22.pdf"
        );
        assert_eq!(
            invoice_filename("Sea Tale", "12", InvoiceVariant::Gst, at),
            "SeaTale_GST_Invoice_T12_2025-01-22T19-05-09.pdf"
        );
    }

    #[test]
    fn test_variant_from_query() {
        assert_eq!(InvoiceVariant::from_query(Some("GST")), InvoiceVariant::Gst);
        assert_eq!(InvoiceVariant::from_query(Some("bill")), InvoiceVariant::Bill);
        assert_eq!(InvoiceVariant::from_query(None), InvoiceVariant::Bill);
    }

    struct Fixture {
        pool: SqlitePool,
        service: InvoiceService,
        table_id: i64,
    }

    async fn setup() -> Fixture {
        let pool = DbService::in_memory().await.unwrap().pool;
        let settings = Arc::new(MemorySettingsService::new(RestaurantSettings {
            restaurant_phone: "080-4000-1234".into(),
            gstin: "29ABCDE1234F1Z5".into(),
            ..Default::default()
        }));
        let service = InvoiceService::new(pool.clone(), settings, BrandingConfig::default());
        let table = dining_table::create(&pool, "T5", "http://localhost:3000")
            .await
            .unwrap();
        tax_config::create(
            &pool,
            TaxConfigCreate {
                name: "GST".into(),
                percentage: 18.0,
                is_active: Some(true),
                sort_order: None,
            },
        )
        .await
        .unwrap();
        Fixture {
            pool,
            service,
            table_id: table.id,
        }
    }

    async fn seed_order(pool: &SqlitePool, table_id: i64, items: Vec<(&str, f64, i32)>) -> Order {
        let items: Vec<LineItem> = items
            .into_iter()
            .map(|(name, price, quantity)| LineItem {
                dish_id: 1,
                quantity,
                dish_name: name.into(),
                dish_price: price,
            })
            .collect();
        let total: Decimal = items.iter().map(line_total).sum();
        let now = shared::util::now_millis();
        let created = Order {
            id: shared::util::snowflake_id(),
            table_id,
            customer_phone: "9845012345".into(),
            items,
            total_amount: crate::billing::money::to_f64(total),
            tax_amount: 0.0,
            bill_amount: None,
            final_amount: None,
            bill_id: None,
            status: OrderStatus::Pending,
            created_at: now,
            updated_at: now,
        };
        order::insert(pool, &created).await.unwrap();
        created
    }

    #[tokio::test]
    async fn test_pending_order_gets_provisional_invoice() {
        let fx = setup().await;
        let b = seed_order(
            &fx.pool,
            fx.table_id,
            vec![("Salad", 420.0, 1), ("Fish&Chips", 650.0, 3)],
        )
        .await;

        let data = fx
            .service
            .load_invoice_data(b.id, kolkata(2025, 1, 22, 20, 0, 0))
            .await
            .unwrap();
        assert!(data.bill_id.is_none());
        assert_eq!(data.lines.len(), 2);
        assert_eq!(data.subtotal, Decimal::from(2370));
        assert_eq!(data.final_amount, Decimal::new(279660, 2));
        assert_eq!(data.gstin, "29ABCDE1234F1Z5");

        let rendered = fx
            .service
            .render_order_invoice(b.id, InvoiceVariant::Bill)
            .await
            .unwrap();
        assert!(rendered.bytes.starts_with(b"%PDF-1.4"));
        assert!(rendered.filename.starts_with("SeaTaleRestaurant_Bill_T5_"));
        assert!(rendered.filename.ends_with(".pdf"));
    }

    #[tokio::test]
    async fn test_approved_order_lists_whole_bill() {
        let fx = setup().await;
        let a = seed_order(&fx.pool, fx.table_id, vec![("Salmon", 850.0, 2)]).await;
        seed_order(
            &fx.pool,
            fx.table_id,
            vec![("Salad", 420.0, 1), ("Fish&Chips", 650.0, 3)],
        )
        .await;

        let billing = BillingService::new(
            fx.pool.clone(),
            Arc::new(OrderStatusHub::new()),
            RetryPolicy::no_retry(),
            CancellationToken::new(),
        );
        let bill = billing
            .approve_table_bill(fx.table_id, None, "admin")
            .await
            .unwrap();

        let data = fx
            .service
            .load_invoice_data(a.id, kolkata(2025, 1, 22, 20, 0, 0))
            .await
            .unwrap();
        assert_eq!(data.bill_id, Some(bill.id));
        assert_eq!(data.status, OrderStatus::Approved);
        assert_eq!(data.lines.len(), 3);
        assert_eq!(data.subtotal, Decimal::from(4070));
        assert_eq!(data.total_tax, Decimal::new(73260, 2));
        assert_eq!(data.final_amount, Decimal::new(480260, 2));
    }

    #[tokio::test]
    async fn test_missing_order_is_not_found() {
        let fx = setup().await;
        let err = fx
            .service
            .render_order_invoice(404, InvoiceVariant::Gst)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::OrderNotFound);
        assert_eq!(err.http_status(), http::StatusCode::NOT_FOUND);
    }
}
