//! Restaurant Settings
//!
//! Typed view over the `system_config` key/value rows.

use serde::{Deserialize, Serialize};

pub const KEY_RESTAURANT_PHONE: &str = "restaurant_phone";
pub const KEY_RECEPTIONIST_PHONE: &str = "receptionist_phone";
pub const KEY_ADMIN_PHONES: &str = "admin_phones";
pub const KEY_GSTIN: &str = "gstin";

/// Every key the settings service accepts
pub const SETTING_KEYS: [&str; 4] = [
    KEY_RESTAURANT_PHONE,
    KEY_RECEPTIONIST_PHONE,
    KEY_ADMIN_PHONES,
    KEY_GSTIN,
];

/// Restaurant-wide settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RestaurantSettings {
    pub restaurant_phone: String,
    pub receptionist_phone: String,
    pub admin_phones: Vec<String>,
    /// Tax registration id printed on invoices
    pub gstin: String,
}

impl RestaurantSettings {
    pub fn is_admin_phone(&self, phone: &str) -> bool {
        let phone = normalize_phone(phone);
        !phone.is_empty() && self.admin_phones.iter().any(|p| normalize_phone(p) == phone)
    }

    pub fn is_receptionist_phone(&self, phone: &str) -> bool {
        let phone = normalize_phone(phone);
        !phone.is_empty() && normalize_phone(&self.receptionist_phone) == phone
    }
}

/// Partial settings update; absent fields are left untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettingsUpdate {
    pub restaurant_phone: Option<String>,
    pub receptionist_phone: Option<String>,
    pub admin_phones: Option<Vec<String>>,
    pub gstin: Option<String>,
}

impl SettingsUpdate {
    /// Flatten into `(key, stored value)` pairs
    pub fn into_pairs(self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(v) = self.restaurant_phone {
            pairs.push((KEY_RESTAURANT_PHONE, v.trim().to_string()));
        }
        if let Some(v) = self.receptionist_phone {
            pairs.push((KEY_RECEPTIONIST_PHONE, v.trim().to_string()));
        }
        if let Some(v) = self.admin_phones {
            pairs.push((KEY_ADMIN_PHONES, join_phone_list(&v)));
        }
        if let Some(v) = self.gstin {
            pairs.push((KEY_GSTIN, v.trim().to_uppercase()));
        }
        pairs
    }
}

/// Strip separators so `+91 98450-12345` and `+919845012345` compare equal
pub fn normalize_phone(phone: &str) -> String {
    phone
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '+')
        .collect()
}

/// Parse the comma-separated `admin_phones` value
pub fn parse_phone_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

pub fn join_phone_list(phones: &[String]) -> String {
    phones
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(",")
}
