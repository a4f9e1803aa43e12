//! Settings Handlers

use axum::{
    Json,
    extract::{Extension, State},
};
use shared::models::{RestaurantSettings, SettingsUpdate, normalize_phone};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::staff_session;
use crate::security_log;
use crate::utils::AppResult;

/// GET /api/settings - 当前餐厅设置
pub async fn get(State(state): State<ServerState>) -> AppResult<Json<RestaurantSettings>> {
    let settings = state.settings.get().await?;
    Ok(Json(settings))
}

/// PUT /api/settings - 部分更新设置
///
/// 被移出前台 / 管理员名单的手机号，其已有会话立即撤销。
pub async fn update(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<SettingsUpdate>,
) -> AppResult<Json<RestaurantSettings>> {
    let staff_changed = payload.receptionist_phone.is_some() || payload.admin_phones.is_some();
    let before = state.settings.get().await?;
    let settings = state.settings.update(payload).await?;

    if staff_changed {
        for phone in removed_staff_phones(&before, &settings) {
            let revoked = staff_session::revoke_by_phone(&state.pool, &normalize_phone(&phone)).await?;
            security_log!(
                "INFO",
                "staff_access_removed",
                phone = phone.clone(),
                sessions_revoked = revoked,
                by = current_user.subject.clone()
            );
        }
    }
    tracing::info!(by = %current_user.subject, "Restaurant settings updated");
    Ok(Json(settings))
}

/// 更新前有员工权限、更新后失去权限的手机号
fn removed_staff_phones(before: &RestaurantSettings, after: &RestaurantSettings) -> Vec<String> {
    let mut previous: Vec<&String> = before.admin_phones.iter().collect();
    if !before.receptionist_phone.is_empty() {
        previous.push(&before.receptionist_phone);
    }

    let mut removed: Vec<String> = previous
        .into_iter()
        .filter(|phone| !after.is_admin_phone(phone) && !after.is_receptionist_phone(phone))
        .cloned()
        .collect();
    removed.sort();
    removed.dedup();
    removed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(receptionist: &str, admins: &[&str]) -> RestaurantSettings {
        RestaurantSettings {
            restaurant_phone: String::new(),
            receptionist_phone: receptionist.into(),
            admin_phones: admins.iter().map(|p| p.to_string()).collect(),
            gstin: String::new(),
        }
    }

    #[test]
    fn test_removed_staff_phones() {
        let before = settings("9876543210", &["9123456780", "9000000002"]);
        let after = settings("9111111111", &["9123456780"]);
        assert_eq!(
            removed_staff_phones(&before, &after),
            vec!["9000000002".to_string(), "9876543210".to_string()]
        );
    }

    #[test]
    fn test_promoted_receptionist_keeps_access() {
        let before = settings("9876543210", &[]);
        let after = settings("", &["9876543210"]);
        assert!(removed_staff_phones(&before, &after).is_empty());
    }
}
