//! 账单错误

use shared::error::{AppError, ErrorCode};
use shared::models::OrderStatus;
use thiserror::Error;

use crate::db::repository::RepoError;
use crate::db::retry::{RetryError, Transient};

/// 账单聚合与订单生命周期错误
///
/// 状态冲突分两类，都映射为 409：
/// - [`BillingError::InvalidStateTransition`]：审批集合中有订单已不在 pending、
///   条件更新未命中或非法的状态跳转
/// - [`BillingError::OrderNotPending`]：删除菜品行时订单已不在 pending。
///   它是 `InvalidStateTransition` 的细分，额外携带订单 id 和当前状态
#[derive(Debug, Error)]
pub enum BillingError {
    /// 输入不可计费 (空集合、跨桌、金额非法)
    #[error("Bill precondition failed: {0}")]
    PreconditionFailed(String),

    #[error("Table {0} has no pending orders")]
    NoPendingOrders(i64),

    #[error("Order {order_id} is {status}, expected pending")]
    OrderNotPending { order_id: i64, status: OrderStatus },

    /// 订单已离开 pending、条件更新未命中或非法跳转
    #[error("Invalid state transition: {0}")]
    InvalidStateTransition(String),

    #[error("Bill persistence failed: {0}")]
    PersistenceFailure(String),

    #[error("Order {0} not found")]
    OrderNotFound(i64),

    #[error("Table {0} not found")]
    TableNotFound(i64),

    #[error("Bill {0} not found")]
    BillNotFound(i64),

    #[error("Dish {0} not found")]
    DishNotFound(i64),

    #[error("Validation error: {0}")]
    Validation(String),

    /// 瞬时数据库错误，由服务层重试
    #[error("Database busy: {0}")]
    Busy(String),

    #[error("Operation cancelled")]
    Cancelled,
}

impl Transient for BillingError {
    fn is_transient(&self) -> bool {
        matches!(self, BillingError::Busy(_))
    }
}

impl From<RepoError> for BillingError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::Busy(msg) => BillingError::Busy(msg),
            RepoError::Validation(msg) => BillingError::Validation(msg),
            RepoError::NotFound(msg) | RepoError::Duplicate(msg) | RepoError::Database(msg) => {
                BillingError::PersistenceFailure(msg)
            }
        }
    }
}

impl From<sqlx::Error> for BillingError {
    fn from(err: sqlx::Error) -> Self {
        RepoError::from(err).into()
    }
}

impl From<RetryError<BillingError>> for BillingError {
    fn from(err: RetryError<BillingError>) -> Self {
        match err {
            RetryError::Cancelled => BillingError::Cancelled,
            RetryError::Inner(e) => e,
        }
    }
}

impl From<BillingError> for AppError {
    fn from(err: BillingError) -> Self {
        let message = err.to_string();
        match err {
            BillingError::PreconditionFailed(_) => {
                AppError::with_message(ErrorCode::BillPreconditionFailed, message)
            }
            BillingError::NoPendingOrders(table_id) => {
                AppError::with_message(ErrorCode::NoPendingOrders, message)
                    .with_detail("table_id", table_id)
            }
            BillingError::OrderNotPending { order_id, status } => {
                AppError::with_message(ErrorCode::OrderNotPending, message)
                    .with_detail("order_id", order_id)
                    .with_detail("status", status.as_str())
            }
            BillingError::InvalidStateTransition(_) => {
                AppError::with_message(ErrorCode::InvalidStateTransition, message)
            }
            BillingError::PersistenceFailure(_) => {
                AppError::with_message(ErrorCode::BillPersistenceFailed, message)
            }
            BillingError::OrderNotFound(id) => AppError::order_not_found(id),
            BillingError::TableNotFound(id) => AppError::table_not_found(id),
            BillingError::BillNotFound(id) => {
                AppError::with_message(ErrorCode::BillNotFound, message).with_detail("bill_id", id)
            }
            BillingError::DishNotFound(id) => {
                AppError::with_message(ErrorCode::DishNotFound, message).with_detail("dish_id", id)
            }
            BillingError::Validation(_) => AppError::validation(message),
            BillingError::Busy(_) => AppError::with_message(ErrorCode::SystemBusy, message),
            BillingError::Cancelled => AppError::with_message(ErrorCode::Cancelled, message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::StatusCode;

    #[test]
    fn test_error_code_mapping() {
        let app: AppError = BillingError::PreconditionFailed("no orders".into()).into();
        assert_eq!(app.code, ErrorCode::BillPreconditionFailed);
        assert_eq!(app.http_status(), StatusCode::BAD_REQUEST);

        let app: AppError = BillingError::OrderNotPending {
            order_id: 7,
            status: OrderStatus::Approved,
        }
        .into();
        assert_eq!(app.code, ErrorCode::OrderNotPending);
        assert_eq!(app.http_status(), StatusCode::CONFLICT);
        assert_eq!(app.message, "Order 7 is approved, expected pending");

        let app: AppError = BillingError::InvalidStateTransition("order 7".into()).into();
        assert_eq!(app.http_status(), StatusCode::CONFLICT);

        let app: AppError = BillingError::PersistenceFailure("disk".into()).into();
        assert_eq!(app.code, ErrorCode::BillPersistenceFailed);
        assert_eq!(app.http_status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_order_not_pending_is_a_state_conflict() {
        let not_pending: AppError = BillingError::OrderNotPending {
            order_id: 9,
            status: OrderStatus::Completed,
        }
        .into();
        let transition: AppError =
            BillingError::InvalidStateTransition("order 9 is completed".into()).into();

        assert_eq!(not_pending.http_status(), transition.http_status());
        assert_eq!(not_pending.code.category(), transition.code.category());
        let details = not_pending.details.unwrap();
        assert_eq!(details.get("order_id").unwrap(), 9);
        assert_eq!(details.get("status").unwrap(), "completed");
    }

    #[test]
    fn test_only_busy_is_transient() {
        assert!(BillingError::Busy("locked".into()).is_transient());
        assert!(!BillingError::InvalidStateTransition("x".into()).is_transient());
        assert!(!BillingError::PreconditionFailed("x".into()).is_transient());
    }

    #[test]
    fn test_repo_busy_stays_transient() {
        let err: BillingError = RepoError::Busy("database is locked".into()).into();
        assert!(err.is_transient());
    }
}
