//! 账单服务
//!
//! 负责整桌审批的原子性：读取待审批订单、计算、写入 `table_bill`、
//! 逐单条件更新 (`status = 'pending'`)，任一行不匹配则整笔回滚。
//! 瞬时数据库错误按 [`RetryPolicy`] 重试，领域错误不重试。

use std::sync::Arc;

use shared::message::OrderStatusEvent;
use shared::models::{BillPreview, Order, OrderStatus, TableBill};
use sqlx::{SqliteConnection, SqlitePool};
use tokio_util::sync::CancellationToken;

use super::aggregator::{BillComputation, compute_table_bill, remove_line_item};
use super::error::BillingError;
use super::money::to_f64;
use super::OrderEventSink;
use crate::db::repository::order::ApprovalAmounts;
use crate::db::repository::{dining_table, order, table_bill, tax_config};
use crate::db::retry::{RetryPolicy, with_retry};

pub type BillingResult<T> = Result<T, BillingError>;

/// 账单服务，克隆共享连接池与事件出口
#[derive(Clone)]
pub struct BillingService {
    pool: SqlitePool,
    events: Arc<dyn OrderEventSink>,
    retry: RetryPolicy,
    shutdown: CancellationToken,
}

impl BillingService {
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

    /// 预览整桌账单 (不落库)
    pub async fn preview_table_bill(&self, table_id: i64) -> BillingResult<BillPreview> {
        let this = self;
        let preview = with_retry(self.retry, &self.shutdown, "preview_table_bill", move || {
            this.try_preview(table_id)
        })
        .await?;
        Ok(preview)
    }

    async fn try_preview(&self, table_id: i64) -> BillingResult<BillPreview> {
        dining_table::find_by_id(&self.pool, table_id)
            .await?
            .ok_or(BillingError::TableNotFound(table_id))?;

        let pending = order::find_pending_by_table(&self.pool, table_id).await?;
        if pending.is_empty() {
            return Err(BillingError::NoPendingOrders(table_id));
        }
        let taxes = tax_config::find_active(&self.pool).await?;
        let computation = compute_table_bill(&pending, &taxes)?;
        let order_ids = pending.iter().map(|o| o.id).collect();
        Ok(computation.into_preview(table_id, order_ids))
    }

    /// 审批整桌账单
    ///
    /// `order_ids` 为空时审批该桌全部待审批订单；否则只审批指定订单，
    /// 这些订单必须属于该桌且处于 pending。
    pub async fn approve_table_bill(
        &self,
        table_id: i64,
        order_ids: Option<&[i64]>,
        approved_by: &str,
    ) -> BillingResult<TableBill> {
        let this = self;
        let (bill, orders) = with_retry(self.retry, &self.shutdown, "approve_table_bill", move || {
            this.try_approve(table_id, order_ids, approved_by)
        })
        .await?;

        tracing::info!(
            table_id,
            bill_id = bill.id,
            orders = orders.len(),
            subtotal = bill.subtotal,
            total_tax = bill.total_tax,
            final_amount = bill.final_amount,
            approved_by = %bill.approved_by,
            "Table bill approved"
        );

        for order in &orders {
            self.events
                .emit(OrderStatusEvent::from_order(order, bill.created_at));
        }
        Ok(bill)
    }

    async fn try_approve(
        &self,
        table_id: i64,
        order_ids: Option<&[i64]>,
        approved_by: &str,
    ) -> BillingResult<(TableBill, Vec<Order>)> {
        let mut tx = self.pool.begin().await?;

        dining_table::find_by_id(&mut *tx, table_id)
            .await?
            .ok_or(BillingError::TableNotFound(table_id))?;

        let selected = match order_ids {
            None => {
                let pending = order::find_pending_by_table(&mut *tx, table_id).await?;
                if pending.is_empty() {
                    return Err(BillingError::NoPendingOrders(table_id));
                }
                pending
            }
            Some(ids) => {
                if ids.is_empty() {
                    return Err(BillingError::Validation("order_ids must not be empty".into()));
                }
                let mut ids = ids.to_vec();
                ids.sort_unstable();
                ids.dedup();

                let mut selected = Vec::with_capacity(ids.len());
                for id in ids {
                    let order = order::find_by_id(&mut *tx, id)
                        .await?
                        .ok_or(BillingError::OrderNotFound(id))?;
                    if order.table_id != table_id {
                        return Err(BillingError::PreconditionFailed(format!(
                            "order {id} belongs to table {}, not table {table_id}",
                            order.table_id
                        )));
                    }
                    if !order.is_pending() {
                        return Err(BillingError::InvalidStateTransition(format!(
                            "order {id} is {}, no longer pending",
                            order.status
                        )));
                    }
                    selected.push(order);
                }
                selected
            }
        };

        let taxes = tax_config::find_active(&mut *tx).await?;
        let computation = compute_table_bill(&selected, &taxes)?;
        let now = shared::util::now_millis();

        let (bill, approved) =
            commit_approval(&mut tx, table_id, &selected, computation, approved_by, now).await?;

        tx.commit()
            .await
            .map_err(|e| match BillingError::from(e) {
                BillingError::Busy(msg) => BillingError::Busy(msg),
                other => BillingError::PersistenceFailure(other.to_string()),
            })?;

        Ok((bill, approved))
    }

    /// approved → completed
    pub async fn complete_order(&self, order_id: i64) -> BillingResult<Order> {
        let this = self;
        let completed = with_retry(self.retry, &self.shutdown, "complete_order", move || {
            this.try_complete(order_id)
        })
        .await?;

        tracing::info!(order_id, "Order completed");
        self.events
            .emit(OrderStatusEvent::from_order(&completed, completed.updated_at));
        Ok(completed)
    }

    async fn try_complete(&self, order_id: i64) -> BillingResult<Order> {
        let mut current = order::find_by_id(&self.pool, order_id)
            .await?
            .ok_or(BillingError::OrderNotFound(order_id))?;

        if !current.status.can_transition_to(OrderStatus::Completed) {
            return Err(BillingError::InvalidStateTransition(format!(
                "order {order_id} is {}, only approved orders can be completed",
                current.status
            )));
        }

        let now = shared::util::now_millis();
        let updated = order::transition_status(
            &self.pool,
            order_id,
            OrderStatus::Approved,
            OrderStatus::Completed,
            now,
        )
        .await?;
        if !updated {
            return Err(BillingError::InvalidStateTransition(format!(
                "order {order_id} changed state concurrently"
            )));
        }

        current.status = OrderStatus::Completed;
        current.updated_at = now;
        Ok(current)
    }

    /// 删除待审批订单的第 `index` 个菜品行 (从 0 开始) 并重算小计
    pub async fn remove_line_item(&self, order_id: i64, index: usize) -> BillingResult<Order> {
        let this = self;
        let updated = with_retry(self.retry, &self.shutdown, "remove_line_item", move || {
            this.try_remove_line_item(order_id, index)
        })
        .await?;

        tracing::info!(
            order_id,
            index,
            total_amount = updated.total_amount,
            "Line item removed"
        );
        self.events
            .emit(OrderStatusEvent::from_order(&updated, updated.updated_at));
        Ok(updated)
    }

    async fn try_remove_line_item(&self, order_id: i64, index: usize) -> BillingResult<Order> {
        let mut current = order::find_by_id(&self.pool, order_id)
            .await?
            .ok_or(BillingError::OrderNotFound(order_id))?;

        if !current.is_pending() {
            return Err(BillingError::OrderNotPending {
                order_id,
                status: current.status,
            });
        }

        let (items, total) = remove_line_item(&current.items, index)?;
        let total_amount = to_f64(total);
        let now = shared::util::now_millis();

        let updated =
            order::update_items_if_pending(&self.pool, order_id, &items, total_amount, now).await?;
        if !updated {
            // 读取与写入之间被审批
            let status = order::find_by_id(&self.pool, order_id)
                .await?
                .map(|o| o.status)
                .ok_or(BillingError::OrderNotFound(order_id))?;
            return Err(BillingError::OrderNotPending { order_id, status });
        }

        current.items = items;
        current.total_amount = total_amount;
        current.updated_at = now;
        Ok(current)
    }

    /// 读取已审批账单
    pub async fn get_bill(&self, bill_id: i64) -> BillingResult<TableBill> {
        table_bill::find_by_id(&self.pool, bill_id)
            .await?
            .ok_or(BillingError::BillNotFound(bill_id))
    }

    /// 某桌的历史账单，最新在前
    pub async fn list_table_bills(&self, table_id: i64) -> BillingResult<Vec<TableBill>> {
        Ok(table_bill::find_by_table(&self.pool, table_id).await?)
    }
}

/// 在事务内写入账单并逐单条件审批
///
/// 任一订单已不在 pending 时返回 `InvalidStateTransition`；调用方丢弃
/// 事务即回滚此前的所有写入。
pub(crate) async fn commit_approval(
    conn: &mut SqliteConnection,
    table_id: i64,
    orders: &[Order],
    computation: BillComputation,
    approved_by: &str,
    now: i64,
) -> BillingResult<(TableBill, Vec<Order>)> {
    let bill = TableBill {
        id: shared::util::snowflake_id(),
        table_id,
        order_ids: orders.iter().map(|o| o.id).collect(),
        subtotal: computation.subtotal_f64(),
        total_tax: computation.total_tax_f64(),
        final_amount: computation.final_amount_f64(),
        breakdown: computation.breakdown,
        approved_by: approved_by.to_string(),
        created_at: now,
    };
    table_bill::insert(&mut *conn, &bill).await?;

    let amounts = ApprovalAmounts {
        bill_id: bill.id,
        bill_amount: bill.subtotal,
        tax_amount: bill.total_tax,
        final_amount: bill.final_amount,
    };

    let mut approved = Vec::with_capacity(orders.len());
    for order in orders {
        if !order::approve_if_pending(&mut *conn, order.id, amounts, now).await? {
            tracing::warn!(
                table_id,
                order_id = order.id,
                "Order left pending before approval committed, rolling back"
            );
            return Err(BillingError::InvalidStateTransition(format!(
                "order {} is no longer pending",
                order.id
            )));
        }
        let mut updated = order.clone();
        updated.status = OrderStatus::Approved;
        updated.bill_id = Some(bill.id);
        updated.bill_amount = Some(amounts.bill_amount);
        updated.tax_amount = amounts.tax_amount;
        updated.final_amount = Some(amounts.final_amount);
        updated.updated_at = now;
        approved.push(updated);
    }

    Ok((bill, approved))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::billing::money::items_total;
    use crate::db::DbService;
    use crate::realtime::OrderStatusHub;
    use shared::models::{LineItem, TaxConfigCreate};

    struct Fixture {
        pool: SqlitePool,
        hub: OrderStatusHub,
        service: BillingService,
    }

    async fn setup() -> Fixture {
        let pool = DbService::in_memory().await.unwrap().pool;
        let hub = OrderStatusHub::new();
        let service = BillingService::new(
            pool.clone(),
            Arc::new(hub.clone()),
            RetryPolicy::no_retry(),
            CancellationToken::new(),
        );
        Fixture { pool, hub, service }
    }

    fn item(name: &str, price: f64, quantity: i32) -> LineItem {
        LineItem {
            dish_id: 1,
            quantity,
            dish_name: name.into(),
            dish_price: price,
        }
    }

    async fn seed_order(pool: &SqlitePool, table_id: i64, items: Vec<LineItem>) -> Order {
        let total = to_f64(items_total(&items));
        let now = shared::util::now_millis();
        let order = Order {
            id: shared::util::snowflake_id(),
            table_id,
            customer_phone: "9845012345".into(),
            items,
            total_amount: total,
            tax_amount: 0.0,
            bill_amount: None,
            final_amount: None,
            bill_id: None,
            status: OrderStatus::Pending,
            created_at: now,
            updated_at: now,
        };
        order::insert(pool, &order).await.unwrap();
        order
    }

    /// T5：订单 A (Salmon ×2) 与订单 B (Salad, Fish&Chips ×3)，GST 18%
    async fn seed_table_five(pool: &SqlitePool) -> (i64, Order, Order) {
        let table = dining_table::create(pool, "T5", "http://localhost:3000")
            .await
            .unwrap();
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
        let a = seed_order(pool, table.id, vec![item("Salmon", 850.0, 2)]).await;
        let b = seed_order(
            pool,
            table.id,
            vec![item("Salad", 420.0, 1), item("Fish&Chips", 650.0, 3)],
        )
        .await;
        (table.id, a, b)
    }

    async fn reload(pool: &SqlitePool, id: i64) -> Order {
        order::find_by_id(pool, id).await.unwrap().unwrap()
    }

    #[tokio::test]
    async fn test_approve_table_five() {
        let f = setup().await;
        let (table_id, a, b) = seed_table_five(&f.pool).await;
        let mut rx = f.hub.subscribe("9845012345");

        let bill = f
            .service
            .approve_table_bill(table_id, None, "admin")
            .await
            .unwrap();

        assert_eq!(bill.subtotal, 4070.0);
        assert_eq!(bill.total_tax, 732.6);
        assert_eq!(bill.final_amount, 4802.6);
        assert_eq!(bill.order_ids.len(), 2);

        for id in [a.id, b.id] {
            let o = reload(&f.pool, id).await;
            assert_eq!(o.status, OrderStatus::Approved);
            assert_eq!(o.bill_amount, Some(4070.0));
            assert_eq!(o.tax_amount, 732.6);
            assert_eq!(o.final_amount, Some(4802.6));
            assert_eq!(o.bill_id, Some(bill.id));
        }

        let stored = f.service.get_bill(bill.id).await.unwrap();
        assert_eq!(stored.breakdown[0].name, "GST");

        // 每个订单一条事件
        assert_eq!(rx.recv().await.unwrap().status, OrderStatus::Approved);
        assert_eq!(rx.recv().await.unwrap().status, OrderStatus::Approved);
    }

    #[tokio::test]
    async fn test_preview_does_not_persist() {
        let f = setup().await;
        let (table_id, a, _) = seed_table_five(&f.pool).await;

        let preview = f.service.preview_table_bill(table_id).await.unwrap();
        assert_eq!(preview.final_amount, 4802.6);
        assert_eq!(reload(&f.pool, a.id).await.status, OrderStatus::Pending);
        assert!(f.service.list_table_bills(table_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_batch_with_non_pending_order_commits_nothing() {
        let f = setup().await;
        let (table_id, a, b) = seed_table_five(&f.pool).await;
        order::transition_status(&f.pool, b.id, OrderStatus::Pending, OrderStatus::Approved, 1)
            .await
            .unwrap();

        let err = f
            .service
            .approve_table_bill(table_id, Some(&[a.id, b.id]), "admin")
            .await
            .unwrap_err();
        assert!(matches!(err, BillingError::InvalidStateTransition(_)));

        let app: shared::error::AppError = err.into();
        assert_eq!(app.code, shared::error::ErrorCode::InvalidStateTransition);
        assert_eq!(app.http_status(), http::StatusCode::CONFLICT);

        assert_eq!(reload(&f.pool, a.id).await.status, OrderStatus::Pending);
        assert!(f.service.list_table_bills(table_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_transition_rolls_back_whole_batch() {
        let f = setup().await;
        let (table_id, a, b) = seed_table_five(&f.pool).await;
        let stale = vec![a.clone(), b.clone()];
        let computation = compute_table_bill(&stale, &[]).unwrap();

        // B 在快照之后被其他请求审批
        order::transition_status(&f.pool, b.id, OrderStatus::Pending, OrderStatus::Approved, 1)
            .await
            .unwrap();

        let mut tx = f.pool.begin().await.unwrap();
        let err = commit_approval(&mut tx, table_id, &stale, computation, "admin", 2)
            .await
            .unwrap_err();
        assert!(matches!(err, BillingError::InvalidStateTransition(_)));
        tx.rollback().await.unwrap();

        let a_after = reload(&f.pool, a.id).await;
        assert_eq!(a_after.status, OrderStatus::Pending);
        assert_eq!(a_after.bill_id, None);
        assert!(f.service.list_table_bills(table_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_approve_without_pending_orders() {
        let f = setup().await;
        let table = dining_table::create(&f.pool, "T9", "http://localhost:3000")
            .await
            .unwrap();
        let err = f
            .service
            .approve_table_bill(table.id, None, "admin")
            .await
            .unwrap_err();
        assert!(matches!(err, BillingError::NoPendingOrders(_)));

        let err = f
            .service
            .approve_table_bill(424242, None, "admin")
            .await
            .unwrap_err();
        assert!(matches!(err, BillingError::TableNotFound(424242)));
    }

    #[tokio::test]
    async fn test_subset_from_other_table_rejected() {
        let f = setup().await;
        let (table_id, a, _) = seed_table_five(&f.pool).await;
        let other = dining_table::create(&f.pool, "T6", "http://localhost:3000")
            .await
            .unwrap();
        let foreign = seed_order(&f.pool, other.id, vec![item("Tea", 30.0, 1)]).await;

        let err = f
            .service
            .approve_table_bill(table_id, Some(&[a.id, foreign.id]), "admin")
            .await
            .unwrap_err();
        assert!(matches!(err, BillingError::PreconditionFailed(_)));
        assert_eq!(reload(&f.pool, a.id).await.status, OrderStatus::Pending);
    }

    #[tokio::test]
    async fn test_remove_line_item_recomputes_total() {
        let f = setup().await;
        let (_, _, b) = seed_table_five(&f.pool).await;

        let updated = f.service.remove_line_item(b.id, 1).await.unwrap();
        assert_eq!(updated.total_amount, 420.0);
        assert_eq!(updated.items.len(), 1);

        let stored = reload(&f.pool, b.id).await;
        assert_eq!(stored.total_amount, 420.0);
        assert_eq!(stored.items[0].dish_name, "Salad");

        let emptied = f.service.remove_line_item(b.id, 0).await.unwrap();
        assert_eq!(emptied.total_amount, 0.0);
        assert!(reload(&f.pool, b.id).await.items.is_empty());
    }

    #[tokio::test]
    async fn test_remove_line_item_rejected_when_not_pending() {
        let f = setup().await;
        let (table_id, _, b) = seed_table_five(&f.pool).await;
        f.service
            .approve_table_bill(table_id, None, "admin")
            .await
            .unwrap();

        let err = f.service.remove_line_item(b.id, 0).await.unwrap_err();
        assert!(matches!(
            err,
            BillingError::OrderNotPending {
                status: OrderStatus::Approved,
                ..
            }
        ));

        let stored = reload(&f.pool, b.id).await;
        assert_eq!(stored.items.len(), 2);
        assert_eq!(stored.total_amount, 2370.0);
    }

    #[tokio::test]
    async fn test_remove_line_item_out_of_range() {
        let f = setup().await;
        let (_, a, _) = seed_table_five(&f.pool).await;
        let err = f.service.remove_line_item(a.id, 5).await.unwrap_err();
        assert!(matches!(err, BillingError::Validation(_)));
    }

    #[tokio::test]
    async fn test_complete_order_lifecycle() {
        let f = setup().await;
        let (table_id, a, _) = seed_table_five(&f.pool).await;

        // pending 不能直接完成
        let err = f.service.complete_order(a.id).await.unwrap_err();
        assert!(matches!(err, BillingError::InvalidStateTransition(_)));

        f.service
            .approve_table_bill(table_id, None, "admin")
            .await
            .unwrap();
        let done = f.service.complete_order(a.id).await.unwrap();
        assert_eq!(done.status, OrderStatus::Completed);
        assert_eq!(reload(&f.pool, a.id).await.status, OrderStatus::Completed);

        let err = f.service.complete_order(a.id).await.unwrap_err();
        assert!(matches!(err, BillingError::InvalidStateTransition(_)));
    }

    #[tokio::test]
    async fn test_cancelled_service_refuses_work() {
        let f = setup().await;
        let (table_id, _, _) = seed_table_five(&f.pool).await;
        let token = CancellationToken::new();
        let service = BillingService::new(
            f.pool.clone(),
            Arc::new(f.hub.clone()),
            RetryPolicy::default(),
            token.clone(),
        );
        token.cancel();

        let err = service
            .approve_table_bill(table_id, None, "admin")
            .await
            .unwrap_err();
        assert!(matches!(err, BillingError::Cancelled));
    }
}
