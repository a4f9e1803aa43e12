//! 金额计算工具 (rust_decimal)
//!
//! 所有运算都在 `Decimal` 上进行，只在存储和序列化时转回 `f64`
//! (四舍五入到 2 位小数)。

use rust_decimal::prelude::*;
use shared::models::LineItem;

/// 金额舍入策略 (2 位小数，四舍五入)
const DECIMAL_PLACES: u32 = 2;

/// 金额比较容差 (0.01)
pub const MONEY_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// f64 转 Decimal
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Decimal 转回 f64 (先舍入到 2 位小数)
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    round_money(value).to_f64().unwrap_or_default()
}

/// 远离零方向四舍五入到 2 位小数
#[inline]
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// `dish_price × quantity`，已舍入
pub fn line_total(item: &LineItem) -> Decimal {
    round_money(to_decimal(item.dish_price) * Decimal::from(item.quantity))
}

/// 由菜品快照计算订单小计
pub fn items_total(items: &[LineItem]) -> Decimal {
    items.iter().map(line_total).sum()
}

/// `amount × percentage / 100`，已舍入
pub fn percent_of(amount: Decimal, percentage: Decimal) -> Decimal {
    round_money(amount * percentage / Decimal::ONE_HUNDRED)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(price: f64, quantity: i32) -> LineItem {
        LineItem {
            dish_id: 1,
            quantity,
            dish_name: "Dish".into(),
            dish_price: price,
        }
    }

    #[test]
    fn test_to_f64_rounds_half_up() {
        assert_eq!(to_f64(Decimal::new(1005, 3)), 1.01);
        assert_eq!(to_f64(Decimal::new(1004, 3)), 1.0);
        assert_eq!(to_f64(Decimal::new(-1005, 3)), -1.01);
    }

    #[test]
    fn test_float_noise_does_not_leak() {
        // f64 中 0.1 + 0.2 = 0.30000000000000004
        let sum = to_decimal(0.1) + to_decimal(0.2);
        assert_eq!(to_f64(sum), 0.3);
    }

    #[test]
    fn test_items_total() {
        let items = vec![item(420.0, 1), item(650.0, 3)];
        assert_eq!(items_total(&items), Decimal::from(2370));
        assert_eq!(items_total(&[]), Decimal::ZERO);
    }

    #[test]
    fn test_percent_of() {
        assert_eq!(
            percent_of(Decimal::from(4070), Decimal::from(18)),
            Decimal::new(73260, 2)
        );
        // 0.50 × 5% = 0.025 → 0.03
        assert_eq!(
            percent_of(Decimal::new(50, 2), Decimal::from(5)),
            Decimal::new(3, 2)
        );
    }
}
