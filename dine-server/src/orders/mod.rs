//! 订单服务
//!
//! 顾客下单：校验桌台与菜品，快照菜品名称和单价，计算小计后以 pending
//! 状态写入。之后的状态变化 (审批、完成、删行) 由 [`crate::billing`] 负责。

use std::sync::Arc;

use shared::message::OrderStatusEvent;
use shared::models::{LineItem, Order, OrderCreate, OrderQuery, OrderStatus, normalize_phone};
use sqlx::SqlitePool;
use tokio_util::sync::CancellationToken;

use crate::billing::money::{items_total, to_f64};
use crate::billing::{BillingError, OrderEventSink};
use crate::db::repository::{dining_table, dish, order};
use crate::db::retry::{RetryPolicy, with_retry};
use crate::utils::validation::{MAX_ITEMS_PER_ORDER, MAX_QUANTITY, validate_phone};

pub type OrderResult<T> = Result<T, BillingError>;

#[derive(Clone)]
pub struct OrderService {
    pool: SqlitePool,
    events: Arc<dyn OrderEventSink>,
    retry: RetryPolicy,
    shutdown: CancellationToken,
}

impl OrderService {
    pub fn new(
        pool: SqlitePool,
        events: Arc<dyn OrderEventSink>,
        retry: RetryPolicy,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            pool,
            events,
            retry,
            shutdown,
        }
    }

    /// 顾客下单
    pub async fn place_order(&self, input: OrderCreate) -> OrderResult<Order> {
        validate_order(&input)?;

        let this = self;
        let input = &input;
        let created = with_retry(self.retry, &self.shutdown, "place_order", move || {
            this.try_place_order(input)
        })
        .await?;

        tracing::info!(
            order_id = created.id,
            table_id = created.table_id,
            items = created.items.len(),
            total_amount = created.total_amount,
            "Order placed"
        );
        self.events
            .emit(OrderStatusEvent::from_order(&created, created.created_at));
        Ok(created)
    }

    async fn try_place_order(&self, input: &OrderCreate) -> OrderResult<Order> {
        let mut tx = self.pool.begin().await?;

        dining_table::find_by_id(&mut *tx, input.table_id)
            .await?
            .ok_or(BillingError::TableNotFound(input.table_id))?;

        let mut items = Vec::with_capacity(input.items.len());
        for line in &input.items {
            let dish = dish::find_by_id(&mut *tx, line.dish_id)
                .await?
                .ok_or(BillingError::DishNotFound(line.dish_id))?;
            items.push(LineItem {
                dish_id: dish.id,
                quantity: line.quantity,
                dish_name: dish.name,
                dish_price: dish.price,
            });
        }

        let now = shared::util::now_millis();
        let created = Order {
            id: shared::util::snowflake_id(),
            table_id: input.table_id,
            customer_phone: normalize_phone(&input.customer_phone),
            total_amount: to_f64(items_total(&items)),
            items,
            tax_amount: 0.0,
            bill_amount: None,
            final_amount: None,
            bill_id: None,
            status: OrderStatus::Pending,
            created_at: now,
            updated_at: now,
        };
        order::insert(&mut *tx, &created).await?;
        tx.commit().await?;
        Ok(created)
    }

    pub async fn get(&self, order_id: i64) -> OrderResult<Order> {
        order::find_by_id(&self.pool, order_id)
            .await?
            .ok_or(BillingError::OrderNotFound(order_id))
    }

    /// 员工订单列表，最新在前
    pub async fn list(&self, query: &OrderQuery) -> OrderResult<Vec<Order>> {
        Ok(order::find_all(&self.pool, query).await?)
    }

    /// 顾客自己的订单
    pub async fn list_by_phone(&self, phone: &str) -> OrderResult<Vec<Order>> {
        let phone = normalize_phone(phone);
        if phone.is_empty() {
            return Ok(vec![]);
        }
        Ok(order::find_by_phone(&self.pool, &phone).await?)
    }
}

fn validate_order(input: &OrderCreate) -> OrderResult<()> {
    validate_phone(&input.customer_phone, "customer_phone")
        .map_err(|e| BillingError::Validation(e.message))?;

    if input.items.is_empty() {
        return Err(BillingError::Validation(
            "Order must contain at least one item".into(),
        ));
    }
    if input.items.len() > MAX_ITEMS_PER_ORDER {
        return Err(BillingError::Validation(format!(
            "Order has too many items (max {MAX_ITEMS_PER_ORDER})"
        )));
    }
    if let Some(line) = input
        .items
        .iter()
        .find(|l| l.quantity < 1 || l.quantity > MAX_QUANTITY)
    {
        return Err(BillingError::Validation(format!(
            "Quantity for dish {} must be between 1 and {MAX_QUANTITY}",
            line.dish_id
        )));
    }
    Ok(())
}
