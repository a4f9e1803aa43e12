//! Dining Table Model

use serde::{Deserialize, Serialize};

/// Path of the customer ordering page encoded in table QR codes
pub const CUSTOMER_PAGE_PATH: &str = "/customer";

/// Dining table entity (桌台)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct DiningTable {
    pub id: i64,
    /// Display number printed on the table (e.g. "T5")
    pub number: String,
    /// Content of the table's QR code: `<origin>/customer?table=<id>`
    pub qr_payload: String,
    pub created_at: i64,
}

/// Create dining table payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiningTableCreate {
    pub number: String,
}

/// Update dining table payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiningTableUpdate {
    pub number: Option<String>,
}

/// Build the QR payload for a table
///
/// Trailing slashes on `origin` are ignored so `https://x.io/` and
/// `https://x.io` produce the same payload.
pub fn qr_payload(origin: &str, table_id: i64) -> String {
    format!(
        "{}{}?table={}",
        origin.trim_end_matches('/'),
        CUSTOMER_PAGE_PATH,
        table_id
    )
}

/// Extract the table id from a scanned QR payload
///
/// Accepts `<origin>/customer?table=<id>` with optional extra query
/// parameters. When `expected_origin` is given the payload must start with it.
pub fn parse_qr_payload(payload: &str, expected_origin: Option<&str>) -> Option<i64> {
    let payload = payload.trim();
    let (base, query) = payload.split_once('?')?;

    let origin = base.strip_suffix(CUSTOMER_PAGE_PATH)?;
    if let Some(expected) = expected_origin
        && origin != expected.trim_end_matches('/')
    {
        return None;
    }

    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == "table")
        .and_then(|(_, value)| value.parse::<i64>().ok())
        .filter(|id| *id > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qr_payload_format() {
        assert_eq!(
            qr_payload("https://seatale.in/", 7311),
            "https://seatale.in/customer?table=7311"
        );
        assert_eq!(
            qr_payload("http://localhost:3000", 1),
            "http://localhost:3000/customer?table=1"
        );
    }

    #[test]
    fn test_parse_roundtrips_generated_payload() {
        let payload = qr_payload("https://seatale.in", 99);
        assert_eq!(parse_qr_payload(&payload, Some("https://seatale.in")), Some(99));
        assert_eq!(parse_qr_payload(&payload, None), Some(99));
    }

    #[test]
    fn test_parse_accepts_extra_params() {
        assert_eq!(
            parse_qr_payload("https://seatale.in/customer?utm=qr&table=12", None),
            Some(12)
        );
    }

    #[test]
    fn test_parse_rejects_foreign_or_malformed() {
        assert_eq!(
            parse_qr_payload("https://evil.example/customer?table=3", Some("https://seatale.in")),
            None
        );
        assert_eq!(parse_qr_payload("https://seatale.in/admin?table=3", None), None);
        assert_eq!(parse_qr_payload("https://seatale.in/customer?table=abc", None), None);
        assert_eq!(parse_qr_payload("https://seatale.in/customer", None), None);
        assert_eq!(parse_qr_payload("https://seatale.in/customer?table=-4", None), None);
    }
}
