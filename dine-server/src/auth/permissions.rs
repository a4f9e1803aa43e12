//! Permission Definitions
//!
//! 两个角色：
//! - `admin` - 全部权限
//! - `receptionist` - 订单与账单操作，其余只读

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_RECEPTIONIST: &str = "receptionist";

/// Default role permissions
pub const DEFAULT_ADMIN_PERMISSIONS: &[&str] = &["all"];

/// 前台默认权限
pub const DEFAULT_RECEPTIONIST_PERMISSIONS: &[&str] = &[
    "orders:*",
    "bills:*",
    "menu:read",
    "tables:read",
    "taxes:read",
    "events:read",
    "settings:read",
];

/// Get permissions for a role name
pub fn get_default_permissions(role_name: &str) -> Vec<String> {
    let permissions = match role_name {
        ROLE_ADMIN => DEFAULT_ADMIN_PERMISSIONS,
        ROLE_RECEPTIONIST => DEFAULT_RECEPTIONIST_PERMISSIONS,
        _ => &[],
    };
    permissions.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_permissions() {
        assert_eq!(get_default_permissions(ROLE_ADMIN), vec!["all"]);
        assert!(
            get_default_permissions(ROLE_RECEPTIONIST).contains(&"bills:*".to_string())
        );
        assert!(get_default_permissions("guest").is_empty());
    }
}
