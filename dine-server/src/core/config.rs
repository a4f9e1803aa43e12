use chrono_tz::Tz;

use crate::auth::JwtConfig;
use crate::db::retry::RetryPolicy;

/// 服务器配置 - 所有配置项
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | DATABASE_PATH | dine.db | SQLite 数据库文件 |
/// | PUBLIC_ORIGIN | http://localhost:3000 | 二维码中的站点地址 |
/// | BRAND_NAME | Sea Tale Restaurant | 发票抬头 |
/// | INVOICE_PREFIX | ST | 发票号前缀 |
/// | CURRENCY_LABEL | Rs. | 发票金额标签 |
/// | PLACE_OF_SUPPLY | Karnataka | 供应地 |
/// | TIMEZONE | Asia/Kolkata | 发票日期时区 |
/// | ENVIRONMENT | development | 运行环境 |
/// | LOG_LEVEL / LOG_JSON / LOG_DIR | info / false / - | 日志 |
/// | ADMIN_PASSWORD_HASH | - | 管理员密码 (argon2 PHC 串) |
/// | OTP_TTL_SECS / OTP_MAX_ATTEMPTS | 300 / 5 | 验证码 |
/// | DB_RETRY_MAX / DB_RETRY_BASE_MS / DB_RETRY_MAX_MS | 3 / 50 / 1000 | 数据库重试 |
///
/// # 示例
///
/// ```ignore
/// HTTP_PORT=8080 DATABASE_PATH=/data/dine.db cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP API 服务端口
    pub http_port: u16,
    /// SQLite 数据库路径 (`:memory:` 用于测试)
    pub database_path: String,
    /// 顾客页面的站点地址，写入桌台二维码
    pub public_origin: String,
    /// 发票品牌信息
    pub branding: BrandingConfig,
    /// 运行环境: development | staging | production
    pub environment: String,
    /// 日志级别
    pub log_level: String,
    /// 是否输出 JSON 日志
    pub log_json: bool,
    /// 日志目录 (设置后按天滚动写文件)
    pub log_dir: Option<String>,
    /// 管理员密码哈希；未设置时禁用密码登录
    pub admin_password_hash: Option<String>,
    /// 验证码有效期 (秒)
    pub otp_ttl_secs: u64,
    /// 验证码最大尝试次数
    pub otp_max_attempts: u32,
    /// 数据库瞬时错误重试策略
    pub retry: RetryPolicy,
    /// JWT 认证配置
    pub jwt: JwtConfig,
}

/// 发票抬头、编号与地区信息
#[derive(Debug, Clone)]
pub struct BrandingConfig {
    pub brand_name: String,
    pub invoice_prefix: String,
    pub currency_label: String,
    pub place_of_supply: String,
    pub timezone: Tz,
}

impl Default for BrandingConfig {
    fn default() -> Self {
        Self {
            brand_name: "Sea Tale Restaurant".into(),
            invoice_prefix: "ST".into(),
            currency_label: "Rs.".into(),
            place_of_supply: "Karnataka".into(),
            timezone: chrono_tz::Asia::Kolkata,
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.into())
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        let defaults = BrandingConfig::default();
        let timezone = std::env::var("TIMEZONE")
            .ok()
            .and_then(|tz| match tz.parse::<Tz>() {
                Ok(tz) => Some(tz),
                Err(_) => {
                    tracing::warn!(timezone = %tz, "Unknown TIMEZONE, falling back to Asia/Kolkata");
                    None
                }
            })
            .unwrap_or(defaults.timezone);

        Self {
            http_port: env_parse("HTTP_PORT", 3000),
            database_path: env_or("DATABASE_PATH", "dine.db"),
            public_origin: env_or("PUBLIC_ORIGIN", "http://localhost:3000"),
            branding: BrandingConfig {
                brand_name: env_or("BRAND_NAME", &defaults.brand_name),
                invoice_prefix: env_or("INVOICE_PREFIX", &defaults.invoice_prefix),
                currency_label: env_or("CURRENCY_LABEL", &defaults.currency_label),
                place_of_supply: env_or("PLACE_OF_SUPPLY", &defaults.place_of_supply),
                timezone,
            },
            environment: env_or("ENVIRONMENT", "development"),
            log_level: env_or("LOG_LEVEL", "info"),
            log_json: env_parse("LOG_JSON", false),
            log_dir: std::env::var("LOG_DIR").ok().filter(|d| !d.is_empty()),
            admin_password_hash: std::env::var("ADMIN_PASSWORD_HASH")
                .ok()
                .filter(|h| !h.is_empty()),
            otp_ttl_secs: env_parse("OTP_TTL_SECS", 300),
            otp_max_attempts: env_parse("OTP_MAX_ATTEMPTS", 5),
            retry: RetryPolicy {
                max_retries: env_parse("DB_RETRY_MAX", 3),
                base_delay_ms: env_parse("DB_RETRY_BASE_MS", 50),
                max_delay_ms: env_parse("DB_RETRY_MAX_MS", 1000),
            },
            jwt: JwtConfig::default(),
        }
    }

    /// 是否开发环境
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
