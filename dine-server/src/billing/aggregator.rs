//! 账单聚合
//!
//! 由一桌的待审批订单和有序的生效税率纯计算出整桌账单。不做 I/O，
//! 输入由服务层加载，结果由服务层持久化。
//!
//! ```text
//! subtotal = Σ order.total_amount
//! tax_i    = round(subtotal × rate_i / 100)
//! total    = Σ tax_i
//! final    = subtotal + total
//! ```

use rust_decimal::Decimal;
use shared::models::{BillPreview, LineItem, Order, TaxConfig, TaxLine};

use super::error::BillingError;
use super::money::{items_total, percent_of, round_money, to_decimal, to_f64};

/// [`compute_table_bill`] 的计算结果
#[derive(Debug, Clone, PartialEq)]
pub struct BillComputation {
    pub subtotal: Decimal,
    pub total_tax: Decimal,
    pub final_amount: Decimal,
    /// 每个税一行，按计税顺序
    pub breakdown: Vec<TaxLine>,
}

impl BillComputation {
    pub fn subtotal_f64(&self) -> f64 {
        to_f64(self.subtotal)
    }

    pub fn total_tax_f64(&self) -> f64 {
        to_f64(self.total_tax)
    }

    pub fn final_amount_f64(&self) -> f64 {
        to_f64(self.final_amount)
    }

    pub fn into_preview(self, table_id: i64, order_ids: Vec<i64>) -> BillPreview {
        BillPreview {
            table_id,
            order_ids,
            subtotal: to_f64(self.subtotal),
            total_tax: to_f64(self.total_tax),
            final_amount: to_f64(self.final_amount),
            breakdown: self.breakdown,
        }
    }
}

/// 计算同一桌一组待审批订单的账单
///
/// `taxes` 须已过滤为生效税率并排好序，每一项都会计入。
/// 订单不在 pending 时返回 `InvalidStateTransition`，其余不可计费的输入
/// (空集合、跨桌、金额非法) 返回 `PreconditionFailed`。
pub fn compute_table_bill(
    orders: &[Order],
    taxes: &[TaxConfig],
) -> Result<BillComputation, BillingError> {
    let first = orders
        .first()
        .ok_or_else(|| BillingError::PreconditionFailed("no orders to bill".into()))?;

    let mut subtotal = Decimal::ZERO;
    for order in orders {
        if order.table_id != first.table_id {
            return Err(BillingError::PreconditionFailed(format!(
                "order {} belongs to table {}, expected table {}",
                order.id, order.table_id, first.table_id
            )));
        }
        if !order.is_pending() {
            return Err(BillingError::InvalidStateTransition(format!(
                "order {} is {}, no longer pending",
                order.id, order.status
            )));
        }
        if !order.total_amount.is_finite() || order.total_amount < 0.0 {
            return Err(BillingError::PreconditionFailed(format!(
                "order {} has invalid total {}",
                order.id, order.total_amount
            )));
        }
        subtotal += to_decimal(order.total_amount);
    }
    let subtotal = round_money(subtotal);

    let (breakdown, total_tax) = apply_taxes(subtotal, taxes)?;
    let final_amount = subtotal + total_tax;

    Ok(BillComputation {
        subtotal,
        total_tax,
        final_amount,
        breakdown,
    })
}

/// 单笔订单的税额估算，不看订单状态
///
/// 用于尚未进入已审批账单的订单发票。
pub fn estimate_order_bill(
    order: &Order,
    taxes: &[TaxConfig],
) -> Result<BillComputation, BillingError> {
    let subtotal = round_money(to_decimal(order.total_amount));
    let (breakdown, total_tax) = apply_taxes(subtotal, taxes)?;
    Ok(BillComputation {
        subtotal,
        total_tax,
        final_amount: subtotal + total_tax,
        breakdown,
    })
}

/// 各税在 `subtotal` 上的金额及其合计
fn apply_taxes(
    subtotal: Decimal,
    taxes: &[TaxConfig],
) -> Result<(Vec<TaxLine>, Decimal), BillingError> {
    let mut breakdown = Vec::with_capacity(taxes.len());
    let mut total = Decimal::ZERO;

    for tax in taxes {
        if !tax.percentage.is_finite() || tax.percentage < 0.0 {
            return Err(BillingError::PreconditionFailed(format!(
                "tax '{}' has invalid percentage {}",
                tax.name, tax.percentage
            )));
        }
        let amount = percent_of(subtotal, to_decimal(tax.percentage));
        total += amount;
        breakdown.push(TaxLine {
            name: tax.name.clone(),
            percentage: tax.percentage,
            amount: to_f64(amount),
        });
    }

    Ok((breakdown, total))
}

/// 删除第 `index` 行并用剩余行重算订单小计
pub fn remove_line_item(
    items: &[LineItem],
    index: usize,
) -> Result<(Vec<LineItem>, Decimal), BillingError> {
    if index >= items.len() {
        return Err(BillingError::Validation(format!(
            "item index {index} out of range (order has {} items)",
            items.len()
        )));
    }
    let mut remaining = items.to_vec();
    remaining.remove(index);
    let total = items_total(&remaining);
    Ok((remaining, total))
}
