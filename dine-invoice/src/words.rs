//! Amount in words (Indian numbering: Thousand, Lakh, Crore)

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

const ONES: [&str; 10] = [
    "", "One", "Two", "Three", "Four", "Five", "Six", "Seven", "Eight", "Nine",
];
const TEENS: [&str; 10] = [
    "Ten",
    "Eleven",
    "Twelve",
    "Thirteen",
    "Fourteen",
    "Fifteen",
    "Sixteen",
    "Seventeen",
    "Eighteen",
    "Nineteen",
];
const TENS: [&str; 10] = [
    "", "", "Twenty", "Thirty", "Forty", "Fifty", "Sixty", "Seventy", "Eighty", "Ninety",
];

const CRORE: u64 = 10_000_000;
const LAKH: u64 = 100_000;
const THOUSAND: u64 = 1_000;

/// Words for 0..=999, without a trailing space
fn below_thousand(n: u64, out: &mut Vec<&'static str>) {
    let hundreds = n / 100;
    let rest = n % 100;
    if hundreds > 0 {
        out.push(ONES[hundreds as usize]);
        out.push("Hundred");
    }
    match rest {
        0 => {}
        1..=9 => out.push(ONES[rest as usize]),
        10..=19 => out.push(TEENS[(rest - 10) as usize]),
        _ => {
            out.push(TENS[(rest / 10) as usize]);
            if rest % 10 > 0 {
                out.push(ONES[(rest % 10) as usize]);
            }
        }
    }
}

fn push_words(n: u64, out: &mut Vec<&'static str>) {
    if n >= CRORE {
        push_words(n / CRORE, out);
        out.push("Crore");
    }
    let n = n % CRORE;
    let lakhs = n / LAKH;
    if lakhs > 0 {
        below_thousand(lakhs, out);
        out.push("Lakh");
    }
    let thousands = (n % LAKH) / THOUSAND;
    if thousands > 0 {
        below_thousand(thousands, out);
        out.push("Thousand");
    }
    below_thousand(n % THOUSAND, out);
}

/// Spell out a whole number
///
/// ```
/// assert_eq!(dine_invoice::number_in_words(150_000), "One Lakh Fifty Thousand");
/// ```
pub fn number_in_words(n: u64) -> String {
    if n == 0 {
        return "Zero".to_string();
    }
    let mut words = Vec::new();
    push_words(n, &mut words);
    words.join(" ")
}

/// Spell out a rupee amount for the invoice footer
///
/// The amount is rounded half-up to paise first; paise are only mentioned
/// when non-zero. Negative amounts are spelled as their absolute value.
pub fn amount_in_words(amount: Decimal) -> String {
    let amount = amount
        .abs()
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let rupees = amount.trunc().to_u64().unwrap_or(0);
    let paise = ((amount - amount.trunc()) * Decimal::ONE_HUNDRED)
        .to_u64()
        .unwrap_or(0);

    if paise == 0 {
        format!("{} Rupees Only", number_in_words(rupees))
    } else {
        format!(
            "{} Rupees and {} Paise Only",
            number_in_words(rupees),
            number_in_words(paise)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_small_numbers() {
        assert_eq!(number_in_words(0), "Zero");
        assert_eq!(number_in_words(7), "Seven");
        assert_eq!(number_in_words(15), "Fifteen");
        assert_eq!(number_in_words(40), "Forty");
        assert_eq!(number_in_words(99), "Ninety Nine");
        assert_eq!(number_in_words(100), "One Hundred");
        assert_eq!(number_in_words(420), "Four Hundred Twenty");
    }

    #[test]
    fn test_indian_grouping() {
        assert_eq!(number_in_words(4802), "Four Thousand Eight Hundred Two");
        assert_eq!(number_in_words(100_000), "One Lakh");
        assert_eq!(
            number_in_words(12_345_678),
            "One Crore Twenty Three Lakh Forty Five Thousand Six Hundred Seventy Eight"
        );
        assert_eq!(number_in_words(1_000_000_000), "One Hundred Crore");
    }

    #[test]
    fn test_amount_with_paise() {
        let amount = Decimal::from_str("4802.60").unwrap();
        assert_eq!(
            amount_in_words(amount),
            "Four Thousand Eight Hundred Two Rupees and Sixty Paise Only"
        );
    }

    #[test]
    fn test_amount_without_paise() {
        assert_eq!(
            amount_in_words(Decimal::from(4070)),
            "Four Thousand Seventy Rupees Only"
        );
        assert_eq!(amount_in_words(Decimal::ZERO), "Zero Rupees Only");
    }

    #[test]
    fn test_amount_rounds_half_up_to_paise() {
        let amount = Decimal::from_str("10.005").unwrap();
        assert_eq!(amount_in_words(amount), "Ten Rupees and One Paise Only");
    }
}
