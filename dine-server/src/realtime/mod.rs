//! OrderStatusHub — 订单状态实时分发
//!
//! 按顾客手机号分频道的发布/订阅，至多一次投递，不回放历史。
//!
//! ```text
//! BillingService / OrderService
//!       │ OrderStatusEvent
//!       ▼
//! OrderStatusHub
//!   └── channels: phone → broadcast::Sender
//!         │
//!         ▼
//!   WS handler (/api/realtime/orders?phone=)
//! ```

pub mod ws;

use dashmap::DashMap;
use shared::message::OrderStatusEvent;
use shared::models::normalize_phone;
use std::sync::Arc;
use tokio::sync::broadcast;

use crate::billing::OrderEventSink;

/// Broadcast channel 容量，慢订阅者超出后丢事件 (Lagged)
const BROADCAST_CAPACITY: usize = 256;

/// 订单状态 hub，克隆共享同一份频道表
#[derive(Clone, Default)]
pub struct OrderStatusHub {
    /// 规范化手机号 → 广播频道
    channels: Arc<DashMap<String, broadcast::Sender<OrderStatusEvent>>>,
}

impl OrderStatusHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// 订阅某个手机号的订单事件
    pub fn subscribe(&self, phone: &str) -> broadcast::Receiver<OrderStatusEvent> {
        self.channels
            .entry(normalize_phone(phone))
            .or_insert_with(|| broadcast::channel(BROADCAST_CAPACITY).0)
            .subscribe()
    }

    /// 发布事件，返回收到事件的订阅者数量
    ///
    /// 无订阅者时直接丢弃。
    pub fn publish(&self, event: OrderStatusEvent) -> usize {
        let key = normalize_phone(&event.customer_phone);
        let Some(tx) = self.channels.get(&key) else {
            return 0;
        };
        // 无订阅者时 send 返回 Err，安全忽略
        tx.send(event).unwrap_or(0)
    }

    /// 当前订阅者数量
    pub fn subscriber_count(&self, phone: &str) -> usize {
        self.channels
            .get(&normalize_phone(phone))
            .map(|tx| tx.receiver_count())
            .unwrap_or(0)
    }

    /// 清理没有订阅者的频道 (WS 断开后调用)
    pub fn prune(&self, phone: &str) {
        self.channels
            .remove_if(&normalize_phone(phone), |_, tx| tx.receiver_count() == 0);
    }
}

impl OrderEventSink for OrderStatusHub {
    fn emit(&self, event: OrderStatusEvent) {
        let order_id = event.order_id;
        let delivered = self.publish(event);
        tracing::debug!(order_id, delivered, "Order status event published");
    }
}
