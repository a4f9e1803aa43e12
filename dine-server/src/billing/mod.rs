//! 账单模块
//!
//! - [`aggregator`] - 整桌账单纯计算 (小计、税、合计)
//! - [`service`] - 审批、预览、完成订单、删除菜品行 (带事务与重试)
//! - [`money`] - Decimal 金额工具
//! - [`error`] - [`BillingError`]

pub mod aggregator;
pub mod error;
pub mod money;
pub mod service;

pub use aggregator::{BillComputation, compute_table_bill, estimate_order_bill, remove_line_item};
pub use error::BillingError;
pub use service::BillingService;

use shared::message::OrderStatusEvent;

/// 订单状态事件出口
///
/// 服务层在事务提交后调用；实现方不得阻塞。
pub trait OrderEventSink: Send + Sync {
    fn emit(&self, event: OrderStatusEvent);
}
