//! 餐厅设置服务
//!
//! `system_config` 键值表只通过 [`SettingsService`] 访问，调用方拿到的是
//! 类型化的 [`RestaurantSettings`]。实现通过 `Arc<dyn SettingsService>`
//! 注入 [`ServerState`](crate::core::ServerState)。

use std::collections::HashMap;

use async_trait::async_trait;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{
    KEY_ADMIN_PHONES, KEY_GSTIN, KEY_RECEPTIONIST_PHONE, KEY_RESTAURANT_PHONE,
    RestaurantSettings, SettingsUpdate, parse_phone_list,
};
use sqlx::SqlitePool;
use tokio::sync::RwLock;

use crate::db::repository::system_config;
use crate::utils::validation::validate_phone;

/// GSTIN 长度 (2 位州代码 + 10 位 PAN + 3 位校验)
const GSTIN_LEN: usize = 15;

/// 设置读写接口
#[async_trait]
pub trait SettingsService: Send + Sync {
    /// 读取当前设置 (缺失的键为空值)
    async fn get(&self) -> AppResult<RestaurantSettings>;

    /// 部分更新，返回更新后的设置
    async fn update(&self, update: SettingsUpdate) -> AppResult<RestaurantSettings>;
}

/// 校验更新内容；空字符串表示清除
pub fn validate_update(update: &SettingsUpdate) -> AppResult<()> {
    for (field, value) in [
        (KEY_RESTAURANT_PHONE, &update.restaurant_phone),
        (KEY_RECEPTIONIST_PHONE, &update.receptionist_phone),
    ] {
        if let Some(phone) = value
            && !phone.trim().is_empty()
        {
            validate_phone(phone, field)?;
        }
    }

    if let Some(phones) = &update.admin_phones {
        for phone in phones.iter().filter(|p| !p.trim().is_empty()) {
            validate_phone(phone, KEY_ADMIN_PHONES)?;
        }
    }

    if let Some(gstin) = &update.gstin {
        let gstin = gstin.trim();
        if !gstin.is_empty()
            && (gstin.len() != GSTIN_LEN || !gstin.chars().all(|c| c.is_ascii_alphanumeric()))
        {
            return Err(AppError::with_message(
                ErrorCode::SettingValueInvalid,
                format!("GSTIN must be {GSTIN_LEN} letters or digits"),
            )
            .with_detail("key", KEY_GSTIN));
        }
    }

    Ok(())
}

fn from_pairs(pairs: &HashMap<String, String>) -> RestaurantSettings {
    let value = |key: &str| pairs.get(key).cloned().unwrap_or_default();
    RestaurantSettings {
        restaurant_phone: value(KEY_RESTAURANT_PHONE),
        receptionist_phone: value(KEY_RECEPTIONIST_PHONE),
        admin_phones: parse_phone_list(&value(KEY_ADMIN_PHONES)),
        gstin: value(KEY_GSTIN),
    }
}

/// SQLite 实现
#[derive(Clone)]
pub struct SqliteSettingsService {
    pool: SqlitePool,
}

impl SqliteSettingsService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SettingsService for SqliteSettingsService {
    async fn get(&self) -> AppResult<RestaurantSettings> {
        let rows = system_config::find_all(&self.pool).await?;
        Ok(from_pairs(&rows.into_iter().collect()))
    }

    async fn update(&self, update: SettingsUpdate) -> AppResult<RestaurantSettings> {
        validate_update(&update)?;
        let pairs = update.into_pairs();
        if !pairs.is_empty() {
            system_config::upsert_many(&self.pool, &pairs).await?;
            let keys: Vec<&str> = pairs.iter().map(|(k, _)| *k).collect();
            tracing::info!(keys = ?keys, "Restaurant settings updated");
        }
        self.get().await
    }
}

/// 内存实现 (测试与无数据库场景)
#[derive(Default)]
pub struct MemorySettingsService {
    values: RwLock<HashMap<String, String>>,
}

impl MemorySettingsService {
    pub fn new(initial: RestaurantSettings) -> Self {
        let values = SettingsUpdate {
            restaurant_phone: Some(initial.restaurant_phone),
            receptionist_phone: Some(initial.receptionist_phone),
            admin_phones: Some(initial.admin_phones),
            gstin: Some(initial.gstin),
        }
        .into_pairs()
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();
        Self {
            values: RwLock::new(values),
        }
    }
}

#[async_trait]
impl SettingsService for MemorySettingsService {
    async fn get(&self) -> AppResult<RestaurantSettings> {
        Ok(from_pairs(&*self.values.read().await))
    }

    async fn update(&self, update: SettingsUpdate) -> AppResult<RestaurantSettings> {
        validate_update(&update)?;
        let mut values = self.values.write().await;
        for (key, value) in update.into_pairs() {
            values.insert(key.to_string(), value);
        }
        Ok(from_pairs(&values))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;

    #[tokio::test]
    async fn test_sqlite_defaults_from_migration() {
        let pool = DbService::in_memory().await.unwrap().pool;
        let service = SqliteSettingsService::new(pool);

        let settings = service.get().await.unwrap();
        assert_eq!(settings.gstin, "29ABCDE1234F1Z5");
        assert!(settings.admin_phones.is_empty());
        assert!(settings.receptionist_phone.is_empty());
    }

    #[tokio::test]
    async fn test_sqlite_partial_update() {
        let pool = DbService::in_memory().await.unwrap().pool;
        let service = SqliteSettingsService::new(pool);

        let updated = service
            .update(SettingsUpdate {
                receptionist_phone: Some(" 9845012345 ".into()),
                admin_phones: Some(vec!["9900011122".into(), "+91 99000 33344".into()]),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(updated.receptionist_phone, "9845012345");
        assert_eq!(updated.admin_phones.len(), 2);
        assert!(updated.is_admin_phone("+919900033344"));
        // 未提供的键保持不变
        assert_eq!(updated.gstin, "29ABCDE1234F1Z5");
    }

    #[tokio::test]
    async fn test_invalid_values_rejected() {
        let service = MemorySettingsService::default();

        let err = service
            .update(SettingsUpdate {
                gstin: Some("SHORT".into()),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::SettingValueInvalid);

        let err = service
            .update(SettingsUpdate {
                restaurant_phone: Some("call-me".into()),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidFormat);
    }

    #[tokio::test]
    async fn test_memory_service_round_trip() {
        let service = MemorySettingsService::new(RestaurantSettings {
            restaurant_phone: "08041234567".into(),
            gstin: "29abcde1234f1z5".into(),
            ..Default::default()
        });

        let settings = service.get().await.unwrap();
        assert_eq!(settings.gstin, "29ABCDE1234F1Z5");

        let settings = service
            .update(SettingsUpdate {
                gstin: Some(String::new()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(settings.gstin.is_empty());
        assert_eq!(settings.restaurant_phone, "08041234567");
    }
}
